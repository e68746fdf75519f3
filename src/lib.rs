//! BasketForge: A Rust CLI application for market basket analysis
//!
//! This library mines directional association rules ("customers who buy X
//! also buy Y") from transactional purchase data using levelwise Apriori
//! frequent-itemset mining, then ranks the rules by conviction and
//! confidence for reporting.

pub mod cli;
pub mod data;
pub mod model;
pub mod rules;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{encode_transactions, load_baskets, read_transactions, BasketData};
pub use model::{mine_frequent_itemsets, FrequentItemset, Itemset, MiningConfig};
pub use rules::{derive_rules, ItemView, Rule, RuleSet};
pub use viz::generate_report;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
