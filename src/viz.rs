//! Console reporting and chart rendering for ranked rules using Plotters

use plotters::prelude::*;

use crate::rules::{ItemView, Rule, RuleSet};

/// Print a ranked rule table with aligned columns
pub fn print_rule_table(rules: &[&Rule]) {
    if rules.is_empty() {
        println!("No rules met the thresholds (try lowering min-support or min-confidence).");
        return;
    }

    println!(
        "  {:<45} | {:>10} | {:>6} | {:>10}",
        "Rule", "Confidence", "Lift", "Conviction"
    );
    println!("  {:-<45}-|-{:-<10}-|-{:-<6}-|-{:-<10}", "", "", "", "");
    for rule in rules {
        println!(
            "  {:<45} | {:>10} | {:>6.2} | {:>10}",
            rule.label(),
            rule.confidence_pct(),
            rule.lift,
            format_conviction(rule.conviction)
        );
    }
}

/// Render conviction for display; the infinite sentinel prints as "inf"
fn format_conviction(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Create a bar chart of rule confidences, strongest first
///
/// Bars are indexed by rank; `print_chart_legend` maps ranks back to rule
/// labels on the console. An empty rule list skips the chart entirely.
pub fn render_confidence_chart(
    rules: &[&Rule],
    output_path: &str,
    title: &str,
) -> crate::Result<()> {
    if rules.is_empty() {
        println!("No rules to chart; skipping {}", output_path);
        return Ok(());
    }

    let max_confidence = rules
        .iter()
        .map(|rule| rule.confidence)
        .fold(0.0f64, f64::max);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(rules.len() as f64), 0f64..(max_confidence * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Rule Rank")
        .y_desc("Confidence")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Draw one bar per rule in rank order
    for (rank, rule) in rules.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(rank as f64 + 0.1, 0.0), (rank as f64 + 0.9, rule.confidence)],
            BLUE.filled(),
        )))?;
    }

    root.present()?;
    println!("Confidence chart saved to: {}", output_path);

    Ok(())
}

/// Print the rank-to-rule legend that accompanies the confidence chart
pub fn print_chart_legend(rules: &[&Rule]) {
    for (rank, rule) in rules.iter().enumerate() {
        println!("  {:>2}. {} ({})", rank + 1, rule.label(), rule.confidence_pct());
    }
}

/// Print the single-item drill-down summary
///
/// Reports at most `k` consequents and notes how many rules actually exist
/// when the view holds fewer than requested.
pub fn print_item_summary(view: &ItemView, k: usize) {
    println!("\n=== Single Item Analysis: {} ===", view.item());

    if view.is_empty() {
        println!("No rules with lift > 1 found for \"{}\".", view.item());
        return;
    }
    if view.available() < k {
        println!(
            "Only {} rule(s) available (requested top {}).",
            view.available(),
            k
        );
    }

    for rule in view.top(k) {
        println!(
            "  {} of customers who bought {} also bought {}",
            rule.confidence_pct(),
            view.item(),
            rule.consequent
        );
    }
}

/// Generate the full analysis report: ranked table, chart and legend
pub fn generate_report(
    rules: &RuleSet,
    top_rules: usize,
    chart_rules: usize,
    output_path: &str,
) -> crate::Result<()> {
    println!("\n=== Top {} Rules (by Conviction) ===", top_rules);
    let ranked = rules.top_by_conviction(top_rules);
    print_rule_table(&ranked);

    let chart = rules.chart_rules(chart_rules);
    render_confidence_chart(
        &chart,
        output_path,
        &format!("Confidence of Top {} Rules", chart_rules),
    )?;
    print_chart_legend(&chart);

    Ok(())
}
