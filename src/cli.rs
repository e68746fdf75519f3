//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::model::MiningConfig;

/// Market basket analysis CLI using Apriori association rule mining
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file (one transaction per row, ragged rows allowed)
    #[arg(short, long, default_value = "groceries.csv")]
    pub input: String,

    /// Minimum itemset support as a fraction of all transactions
    #[arg(short = 's', long, default_value = "0.01")]
    pub min_support: f64,

    /// Maximum itemset size considered by the miner
    #[arg(long, default_value = "2")]
    pub max_len: usize,

    /// Minimum rule confidence to retain
    #[arg(short = 'c', long, default_value = "0.06")]
    pub min_confidence: f64,

    /// Number of rules shown in the global conviction ranking
    #[arg(short = 'n', long, default_value = "25")]
    pub top_rules: usize,

    /// Number of rules drawn in the confidence bar chart
    #[arg(long, default_value = "10")]
    pub chart_rules: usize,

    /// Number of consequents summarized in single-item analysis
    #[arg(short = 'k', long, default_value = "3")]
    pub top_consequents: usize,

    /// Single-item analysis mode: report only rules with this antecedent item
    /// Example: --item "whole milk"
    #[arg(long)]
    pub item: Option<String>,

    /// Output path for the confidence bar chart
    #[arg(short, long, default_value = "rules_chart.png")]
    pub output: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the mining configuration from the parsed flags, rejecting
    /// out-of-range thresholds before any computation starts
    pub fn mining_config(&self) -> crate::Result<MiningConfig> {
        let config = MiningConfig {
            min_support: self.min_support,
            max_len: self.max_len,
            min_confidence: self.min_confidence,
        };
        config.validate()?;
        Ok(config)
    }
}
