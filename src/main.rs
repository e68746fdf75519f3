//! BasketForge: Market basket analysis CLI using Apriori association rules
//!
//! This is the main entrypoint that orchestrates transaction loading,
//! frequent-itemset mining, rule derivation and reporting.

use anyhow::Result;
use basketforge::{
    derive_rules, load_baskets, mine_frequent_itemsets, viz, Args, MiningConfig,
};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("BasketForge - Market Basket Analysis using Apriori");
        println!("==================================================\n");
    }

    // Invalid thresholds are fatal before any data is touched
    let config = args.mining_config()?;

    if let Some(ref item) = args.item {
        run_item_analysis(&args, &config, item)?;
    } else {
        run_full_pipeline(&args, &config)?;
    }

    Ok(())
}

/// Run the full pipeline: load, mine, derive rules, report and chart
fn run_full_pipeline(args: &Args, config: &MiningConfig) -> Result<()> {
    println!("=== Full Analysis Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load and encode transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let baskets = load_baskets(&args.input)?;
    let data_time = data_start.elapsed();

    println!(
        "✓ Data loaded: {} transactions, {} distinct items",
        baskets.n_transactions(),
        baskets.n_items()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
        println!("  Matrix shape: {:?}", baskets.matrix.shape());
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Min support: {}", config.min_support);
        println!("  Max itemset size: {}", config.max_len);
    }

    let mine_start = Instant::now();
    let frequent = mine_frequent_itemsets(&baskets, config)?;
    let mine_time = mine_start.elapsed();

    println!("✓ Frequent itemsets mined: {}", frequent.len());
    if args.verbose {
        println!("  Mining time: {:.2}s", mine_time.as_secs_f64());
    }

    // Step 3: Derive association rules
    if args.verbose {
        println!("\nStep 3: Deriving association rules");
        println!("  Min confidence: {}", config.min_confidence);
    }

    let rules_start = Instant::now();
    let rules = derive_rules(&frequent, config)?;
    let rules_time = rules_start.elapsed();

    println!("✓ Rules derived: {}", rules.len());
    if args.verbose {
        println!("  Derivation time: {:.2}s", rules_time.as_secs_f64());
    }

    // Step 4: Report and chart
    viz::generate_report(&rules, args.top_rules, args.chart_rules, &args.output)?;

    let total_time = start_time.elapsed();
    println!("\n=== Analysis Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}

/// Run single-item analysis for one antecedent item
fn run_item_analysis(args: &Args, config: &MiningConfig, item: &str) -> Result<()> {
    println!("=== Single Item Analysis ===");
    println!("Antecedent item: {}", item);

    let start_time = Instant::now();

    if args.verbose {
        println!("\nLoading transactions from: {}", args.input);
    }
    let baskets = load_baskets(&args.input)?;

    if args.verbose {
        println!("Loaded {} transactions", baskets.n_transactions());
        println!(
            "\nMining rules (min support {}, min confidence {})...",
            config.min_support, config.min_confidence
        );
    }

    let frequent = mine_frequent_itemsets(&baskets, config)?;
    let rules = derive_rules(&frequent, config)?;
    let view = rules.for_antecedent(item);

    let elapsed = start_time.elapsed();

    viz::print_item_summary(&view, args.top_consequents);

    if view.is_empty() {
        let known = rules.antecedent_items();
        if known.is_empty() {
            println!("No rules were derived at all; try lowering min-support or min-confidence.");
        } else {
            println!("Items with rules available: {}", known.join(", "));
        }
    } else {
        println!("\nAll rules for {}:", item);
        viz::print_rule_table(view.rules());
    }

    println!("\n  Processing time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
