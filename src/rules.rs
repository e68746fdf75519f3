//! Association rule derivation, strength metrics and ranking views

use std::collections::HashMap;
use std::fmt;

use crate::model::{FrequentItemset, Itemset, MiningConfig};

/// A directional association rule with its strength metrics
///
/// Antecedent and consequent are disjoint and their union is a frequent
/// itemset. Conviction carries `f64::INFINITY` when confidence is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of antecedent and consequent together
    pub support: f64,
    /// P(consequent | antecedent)
    pub confidence: f64,
    /// Observed co-occurrence over that expected under independence
    pub lift: f64,
    /// (1 - support(consequent)) / (1 - confidence)
    pub conviction: f64,
}

impl Rule {
    /// "antecedent -> consequent" display label
    pub fn label(&self) -> String {
        format!("{} -> {}", self.antecedent, self.consequent)
    }

    /// Confidence formatted as a percentage with two decimals
    pub fn confidence_pct(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (confidence {})", self.label(), self.confidence_pct())
    }
}

/// The full derived rule set, in deterministic emission order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Number of rules derived
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no rule passed the thresholds
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules with lift > 1 ranked by conviction descending, truncated to `n`
    ///
    /// Infinite conviction sorts first; ties keep emission order.
    pub fn top_by_conviction(&self, n: usize) -> Vec<&Rule> {
        let mut ranked: Vec<&Rule> = self.rules.iter().filter(|r| r.lift > 1.0).collect();
        ranked.sort_by(|a, b| b.conviction.total_cmp(&a.conviction));
        ranked.truncate(n);
        ranked
    }

    /// The top `n` rules by conviction, re-sorted by confidence descending
    ///
    /// This is the bar-chart view over the head of the global ranking.
    pub fn chart_rules(&self, n: usize) -> Vec<&Rule> {
        let mut ranked = self.top_by_conviction(n);
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }

    /// Drill-down view: rules whose antecedent is exactly `item`,
    /// lift > 1, sorted by confidence descending
    pub fn for_antecedent(&self, item: &str) -> ItemView<'_> {
        let mut rules: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.lift > 1.0 && r.antecedent.len() == 1 && r.antecedent.contains(item))
            .collect();
        rules.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ItemView {
            item: item.to_string(),
            rules,
        }
    }

    /// Distinct single-item antecedent labels with at least one lift > 1
    /// rule, sorted; useful for telling callers what can be drilled into
    pub fn antecedent_items(&self) -> Vec<&str> {
        let mut items: Vec<&str> = self
            .rules
            .iter()
            .filter(|r| r.lift > 1.0 && r.antecedent.len() == 1)
            .map(|r| r.antecedent.items()[0].as_str())
            .collect();
        items.sort_unstable();
        items.dedup();
        items
    }
}

/// Confidence-ranked rules for one antecedent item
///
/// Exposes the actual rule count so callers never index past the view;
/// `top(k)` clamps to what is available.
#[derive(Debug, Clone)]
pub struct ItemView<'a> {
    item: String,
    rules: Vec<&'a Rule>,
}

impl<'a> ItemView<'a> {
    /// The antecedent item this view was filtered to
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Number of rules actually available in this view
    pub fn available(&self) -> usize {
        self.rules.len()
    }

    /// True if no rule has this antecedent
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Up to `k` strongest rules by confidence
    pub fn top(&self, k: usize) -> &[&'a Rule] {
        &self.rules[..k.min(self.rules.len())]
    }

    /// All rules in the view, strongest first
    pub fn rules(&self) -> &[&'a Rule] {
        &self.rules
    }
}

/// Derive directional rules from the mined frequent itemsets
///
/// Every frequent itemset of size >= 2 is split into each non-empty
/// antecedent with the complement as consequent. Metrics come from the
/// already-computed itemset supports only; transactions are never
/// re-scanned. Rules below `min_confidence` are dropped. Emission order
/// mirrors the itemset order, so identical input yields identical output.
pub fn derive_rules(
    frequent: &[FrequentItemset],
    config: &MiningConfig,
) -> crate::Result<RuleSet> {
    config.validate()?;

    let supports: HashMap<&Itemset, f64> = frequent
        .iter()
        .map(|entry| (&entry.itemset, entry.support))
        .collect();

    let mut rules = Vec::new();
    for entry in frequent.iter().filter(|entry| entry.itemset.len() >= 2) {
        for antecedent in entry.itemset.proper_subsets() {
            let consequent = entry.itemset.difference(&antecedent);

            // Every subset of a frequent itemset is itself frequent, so both
            // sides must already carry a support entry.
            let antecedent_support = match supports.get(&antecedent) {
                Some(&support) => support,
                None => {
                    debug_assert!(false, "antecedent {} missing a support entry", antecedent);
                    continue;
                }
            };
            let consequent_support = match supports.get(&consequent) {
                Some(&support) => support,
                None => {
                    debug_assert!(false, "consequent {} missing a support entry", consequent);
                    continue;
                }
            };
            debug_assert!(antecedent_support > 0.0);

            let confidence = entry.support / antecedent_support;
            if confidence < config.min_confidence {
                continue;
            }

            let lift = confidence / consequent_support;
            let conviction = if confidence >= 1.0 {
                f64::INFINITY
            } else {
                (1.0 - consequent_support) / (1.0 - confidence)
            };

            rules.push(Rule {
                antecedent,
                consequent,
                support: entry.support,
                confidence,
                lift,
                conviction,
            });
        }
    }

    Ok(RuleSet { rules })
}
