//! Itemset representation and levelwise Apriori frequent-itemset mining

use std::collections::HashSet;
use std::fmt;

use anyhow::bail;
use ndarray::Array2;

use crate::data::BasketData;

/// An ordered set of distinct item labels
///
/// Items are kept sorted so that equal sets compare equal, hash identically
/// and print in a stable order regardless of construction order. Itemsets
/// are used as map keys for support lookups during rule derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset {
    items: Vec<String>,
}

impl Itemset {
    /// Create an itemset from arbitrary labels; duplicates collapse
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = labels.into_iter().map(Into::into).collect();
        items.sort();
        items.dedup();
        Itemset { items }
    }

    /// Single-item constructor
    pub fn single(label: impl Into<String>) -> Self {
        Itemset {
            items: vec![label.into()],
        }
    }

    /// Number of items in the set
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the set holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item labels in sorted order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// True if `label` is a member of this set
    pub fn contains(&self, label: &str) -> bool {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .is_ok()
    }

    /// True if every item of `self` is also in `other`
    pub fn is_subset(&self, other: &Itemset) -> bool {
        self.items.iter().all(|label| other.contains(label))
    }

    /// Union of two itemsets
    pub fn union(&self, other: &Itemset) -> Itemset {
        Itemset::new(self.items.iter().chain(other.items.iter()).cloned())
    }

    /// Items of `self` that are not in `other`
    pub fn difference(&self, other: &Itemset) -> Itemset {
        Itemset {
            items: self
                .items
                .iter()
                .filter(|label| !other.contains(label))
                .cloned()
                .collect(),
        }
    }

    /// All non-empty proper subsets, in a stable enumeration order
    pub fn proper_subsets(&self) -> Vec<Itemset> {
        let n = self.items.len();
        let mut subsets = Vec::new();
        for mask in 1u32..(1u32 << n) - 1 {
            let items = self
                .items
                .iter()
                .enumerate()
                .filter(|(position, _)| mask & (1 << position) != 0)
                .map(|(_, label)| label.clone())
                .collect();
            subsets.push(Itemset { items });
        }
        subsets
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.join(", "))
    }
}

/// Mining thresholds, validated before any computation starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningConfig {
    /// Minimum itemset frequency to be considered frequent, in (0, 1]
    pub min_support: f64,
    /// Maximum itemset size enumerated by the miner, at least 1
    pub max_len: usize,
    /// Minimum rule confidence to retain, in [0, 1]
    pub min_confidence: f64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            min_support: 0.01,
            max_len: 2,
            min_confidence: 0.06,
        }
    }
}

impl MiningConfig {
    /// Reject out-of-range thresholds up front; invalid configuration is
    /// fatal to the run, not retried
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            bail!(
                "min_support must be a fraction in (0, 1], got {}",
                self.min_support
            );
        }
        if !(self.min_confidence >= 0.0 && self.min_confidence <= 1.0) {
            bail!(
                "min_confidence must be a fraction in [0, 1], got {}",
                self.min_confidence
            );
        }
        if self.max_len < 1 {
            bail!("max_len must be at least 1, got {}", self.max_len);
        }
        Ok(())
    }
}

/// A frequent itemset tagged with its support
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    /// Fraction of transactions containing every item in the set
    pub support: f64,
}

/// Mine all itemsets of size 1..=max_len whose support meets the threshold
///
/// Levelwise Apriori: level 1 is a single pass over the matrix columns;
/// each later level extends the previous level's itemsets with
/// lexicographically greater frequent items, pruning any candidate with an
/// infrequent subset before its support is counted. Itemsets are emitted
/// per level in lexicographic order, so identical input yields identical
/// output ordering.
///
/// Zero transactions or no frequent single items yield an empty result,
/// not an error.
pub fn mine_frequent_itemsets(
    baskets: &BasketData,
    config: &MiningConfig,
) -> crate::Result<Vec<FrequentItemset>> {
    config.validate()?;

    let n_transactions = baskets.n_transactions();
    if n_transactions == 0 {
        return Ok(Vec::new());
    }
    let total = n_transactions as f64;

    let mut frequent = Vec::new();

    // Level 1: per-column membership counts
    let mut current_level: Vec<Vec<usize>> = Vec::new();
    for (col, label) in baskets.items.iter().enumerate() {
        let count = baskets
            .matrix
            .column(col)
            .iter()
            .filter(|&&present| present)
            .count();
        let support = count as f64 / total;
        if support >= config.min_support {
            frequent.push(FrequentItemset {
                itemset: Itemset::single(label.clone()),
                support,
            });
            current_level.push(vec![col]);
        }
    }
    let frequent_columns: Vec<usize> = current_level.iter().map(|cols| cols[0]).collect();

    // Levels 2..=max_len: extend, prune, count
    for _ in 2..=config.max_len {
        if current_level.is_empty() {
            break;
        }
        let prior: HashSet<&[usize]> = current_level.iter().map(|cols| cols.as_slice()).collect();

        let mut next_level = Vec::new();
        for base in &current_level {
            let last = *base.last().unwrap_or(&0);
            for &extension in frequent_columns.iter().filter(|&&col| col > last) {
                let mut candidate = base.clone();
                candidate.push(extension);

                // Anti-monotonicity: every (k-1)-subset must be frequent
                if !all_subsets_frequent(&candidate, &prior) {
                    continue;
                }

                let count = support_count(&baskets.matrix, &candidate);
                let support = count as f64 / total;
                if support >= config.min_support {
                    frequent.push(FrequentItemset {
                        itemset: Itemset::new(
                            candidate.iter().map(|&col| baskets.items[col].clone()),
                        ),
                        support,
                    });
                    next_level.push(candidate);
                }
            }
        }
        current_level = next_level;
    }

    Ok(frequent)
}

/// Check that every subset obtained by dropping one column is frequent
fn all_subsets_frequent(candidate: &[usize], prior: &HashSet<&[usize]>) -> bool {
    let mut subset = Vec::with_capacity(candidate.len() - 1);
    for drop in 0..candidate.len() {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(position, _)| position != drop)
                .map(|(_, &col)| col),
        );
        if !prior.contains(subset.as_slice()) {
            return false;
        }
    }
    true
}

/// Count transactions containing every column in `columns`
fn support_count(matrix: &Array2<bool>, columns: &[usize]) -> usize {
    matrix
        .outer_iter()
        .filter(|row| columns.iter().all(|&col| row[col]))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encode_transactions;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn baskets(transactions: &[&[&str]]) -> BasketData {
        let raw: Vec<Vec<String>> = transactions
            .iter()
            .map(|t| t.iter().map(|s| s.to_string()).collect())
            .collect();
        encode_transactions(&raw)
    }

    #[test]
    fn test_itemset_sorts_and_dedups() {
        let set = Itemset::new(["milk", "bread", "milk"]);
        assert_eq!(set.items(), &["bread".to_string(), "milk".to_string()]);
        assert_eq!(set, Itemset::new(["bread", "milk"]));
    }

    #[test]
    fn test_itemset_subset_union_difference() {
        let pair = Itemset::new(["bread", "milk"]);
        let milk = Itemset::single("milk");

        assert!(milk.is_subset(&pair));
        assert!(!pair.is_subset(&milk));
        assert_eq!(milk.union(&Itemset::single("bread")), pair);
        assert_eq!(pair.difference(&milk), Itemset::single("bread"));
    }

    #[test]
    fn test_proper_subsets_of_pair() {
        let pair = Itemset::new(["bread", "milk"]);
        let subsets = pair.proper_subsets();
        assert_eq!(
            subsets,
            vec![Itemset::single("bread"), Itemset::single("milk")]
        );
    }

    #[test]
    fn test_proper_subsets_of_triple() {
        let triple = Itemset::new(["a", "b", "c"]);
        let subsets = triple.proper_subsets();
        assert_eq!(subsets.len(), 6);
        assert!(subsets.contains(&Itemset::new(["a", "b"])));
        assert!(subsets.iter().all(|s| !s.is_empty() && s.len() < 3));
    }

    #[test]
    fn test_config_validation() {
        assert!(MiningConfig::default().validate().is_ok());

        let bad_support = MiningConfig {
            min_support: 0.0,
            ..MiningConfig::default()
        };
        assert!(bad_support.validate().is_err());

        let bad_confidence = MiningConfig {
            min_confidence: 1.1,
            ..MiningConfig::default()
        };
        assert!(bad_confidence.validate().is_err());

        let bad_len = MiningConfig {
            max_len: 0,
            ..MiningConfig::default()
        };
        assert!(bad_len.validate().is_err());
    }

    #[test]
    fn test_mine_small_basket_supports() {
        let data = baskets(&[
            &["milk", "bread"],
            &["milk", "eggs"],
            &["milk", "bread", "eggs"],
            &["bread"],
        ]);
        let config = MiningConfig {
            min_support: 0.25,
            max_len: 2,
            min_confidence: 0.0,
        };
        let frequent = mine_frequent_itemsets(&data, &config).unwrap();

        let supports: HashMap<&Itemset, f64> =
            frequent.iter().map(|f| (&f.itemset, f.support)).collect();

        assert_abs_diff_eq!(supports[&Itemset::single("milk")], 0.75);
        assert_abs_diff_eq!(supports[&Itemset::single("bread")], 0.75);
        assert_abs_diff_eq!(supports[&Itemset::single("eggs")], 0.5);
        assert_abs_diff_eq!(supports[&Itemset::new(["milk", "bread"])], 0.5);
    }

    #[test]
    fn test_mine_emits_deterministic_order() {
        let data = baskets(&[
            &["milk", "bread"],
            &["milk", "eggs"],
            &["milk", "bread", "eggs"],
            &["bread"],
        ]);
        let config = MiningConfig {
            min_support: 0.25,
            max_len: 2,
            min_confidence: 0.0,
        };
        let first = mine_frequent_itemsets(&data, &config).unwrap();
        let second = mine_frequent_itemsets(&data, &config).unwrap();
        assert_eq!(first, second);

        // Singles come first in vocabulary order, then pairs
        assert_eq!(first[0].itemset, Itemset::single("bread"));
        assert_eq!(first[1].itemset, Itemset::single("eggs"));
        assert_eq!(first[2].itemset, Itemset::single("milk"));
        assert!(first[3..].iter().all(|f| f.itemset.len() == 2));
    }

    #[test]
    fn test_mine_high_threshold_yields_empty() {
        let data = baskets(&[&["milk", "bread"], &["eggs"]]);
        let config = MiningConfig {
            min_support: 0.9,
            max_len: 2,
            min_confidence: 0.0,
        };
        let frequent = mine_frequent_itemsets(&data, &config).unwrap();
        assert!(frequent.is_empty());
    }

    #[test]
    fn test_mine_empty_dataset() {
        let data = encode_transactions(&[]);
        let frequent = mine_frequent_itemsets(&data, &MiningConfig::default()).unwrap();
        assert!(frequent.is_empty());
    }

    #[test]
    fn test_mine_max_len_one_skips_pairs() {
        let data = baskets(&[&["milk", "bread"], &["milk", "bread"]]);
        let config = MiningConfig {
            min_support: 0.5,
            max_len: 1,
            min_confidence: 0.0,
        };
        let frequent = mine_frequent_itemsets(&data, &config).unwrap();
        assert!(frequent.iter().all(|f| f.itemset.len() == 1));
    }

    #[test]
    fn test_mine_three_itemsets() {
        let data = baskets(&[
            &["bread", "eggs", "milk"],
            &["bread", "eggs", "milk"],
            &["bread", "milk"],
            &["tea"],
        ]);
        let config = MiningConfig {
            min_support: 0.5,
            max_len: 3,
            min_confidence: 0.0,
        };
        let frequent = mine_frequent_itemsets(&data, &config).unwrap();

        let triple = frequent
            .iter()
            .find(|f| f.itemset == Itemset::new(["bread", "eggs", "milk"]))
            .expect("triple should be frequent");
        assert_abs_diff_eq!(triple.support, 0.5);
    }

    proptest! {
        // Superset support can never exceed subset support
        #[test]
        fn prop_support_is_monotone(
            transactions in proptest::collection::vec(
                proptest::collection::vec(0usize..6, 0..5),
                1..40,
            )
        ) {
            let labels = ["apples", "bread", "cheese", "eggs", "milk", "tea"];
            let raw: Vec<Vec<String>> = transactions
                .iter()
                .map(|t| t.iter().map(|&i| labels[i].to_string()).collect())
                .collect();
            let data = encode_transactions(&raw);
            let config = MiningConfig {
                min_support: 0.05,
                max_len: 3,
                min_confidence: 0.0,
            };
            let frequent = mine_frequent_itemsets(&data, &config).unwrap();
            let supports: HashMap<&Itemset, f64> =
                frequent.iter().map(|f| (&f.itemset, f.support)).collect();

            for entry in frequent.iter().filter(|f| f.itemset.len() >= 2) {
                for subset in entry.itemset.proper_subsets() {
                    let subset_support = supports
                        .get(&subset)
                        .expect("subset of a frequent itemset must be frequent");
                    prop_assert!(*subset_support >= entry.support - 1e-12);
                }
            }
        }

        // The mined set is a function of the transaction multiset, not its order
        #[test]
        fn prop_mining_ignores_transaction_order(
            shuffled in Just(vec![
                vec!["milk", "bread"],
                vec!["milk", "eggs"],
                vec!["milk", "bread", "eggs"],
                vec!["bread"],
                vec!["tea", "bread"],
            ]).prop_shuffle()
        ) {
            let base: Vec<Vec<String>> = vec![
                vec!["milk".into(), "bread".into()],
                vec!["milk".into(), "eggs".into()],
                vec!["milk".into(), "bread".into(), "eggs".into()],
                vec!["bread".into()],
                vec!["tea".into(), "bread".into()],
            ];
            let reordered: Vec<Vec<String>> = shuffled
                .iter()
                .map(|t| t.iter().map(|s| s.to_string()).collect())
                .collect();

            let config = MiningConfig {
                min_support: 0.2,
                max_len: 2,
                min_confidence: 0.0,
            };
            let expected =
                mine_frequent_itemsets(&encode_transactions(&base), &config).unwrap();
            let actual =
                mine_frequent_itemsets(&encode_transactions(&reordered), &config).unwrap();
            prop_assert_eq!(expected, actual);
        }
    }
}
