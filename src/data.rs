//! Transaction loading and one-hot basket encoding

use std::collections::BTreeSet;
use std::fs::File;

use anyhow::Context;
use ndarray::Array2;

/// Encoded basket data: item vocabulary plus a boolean membership matrix
#[derive(Debug, Clone)]
pub struct BasketData {
    /// Distinct item labels, sorted lexicographically
    pub items: Vec<String>,
    /// Membership matrix (n_transactions, n_items); true = item in transaction
    pub matrix: Array2<bool>,
}

impl BasketData {
    /// Number of transactions (matrix rows)
    pub fn n_transactions(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of distinct items (matrix columns)
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// True if the dataset holds no transactions or no items
    pub fn is_empty(&self) -> bool {
        self.n_transactions() == 0 || self.n_items() == 0
    }

    /// Column index of an item label, if present in the vocabulary
    pub fn item_index(&self, label: &str) -> Option<usize> {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }
}

/// Read raw transactions from a headerless CSV file
///
/// Each row is one transaction; rows may have different lengths and fields
/// may be blank. Blank fields are preserved here and dropped by the encoder.
pub fn read_transactions(file_path: &str) -> crate::Result<Vec<Vec<String>>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open transaction file: {}", file_path))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("Failed to read transaction row from: {}", file_path))?;
        transactions.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(transactions)
}

/// Encode raw transactions into a `BasketData` membership matrix
///
/// Blank and whitespace-only labels are ignored, duplicate items within one
/// transaction collapse, and the vocabulary is sorted so column indices are
/// reproducible across runs regardless of input order.
pub fn encode_transactions(transactions: &[Vec<String>]) -> BasketData {
    let mut vocabulary = BTreeSet::new();
    for transaction in transactions {
        for label in transaction {
            let label = label.trim();
            if !label.is_empty() {
                vocabulary.insert(label.to_string());
            }
        }
    }
    let items: Vec<String> = vocabulary.into_iter().collect();

    let mut matrix = Array2::from_elem((transactions.len(), items.len()), false);
    for (row, transaction) in transactions.iter().enumerate() {
        for label in transaction {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            if let Ok(col) = items.binary_search_by(|probe| probe.as_str().cmp(label)) {
                matrix[[row, col]] = true;
            }
        }
    }

    BasketData { items, matrix }
}

/// Load a transaction CSV and encode it in one step
pub fn load_baskets(file_path: &str) -> crate::Result<BasketData> {
    let transactions = read_transactions(file_path)?;
    Ok(encode_transactions(&transactions))
}
