use serde::{Deserialize, Serialize};

use super::investment::Investment;

/// One table row: the record plus its derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub investment: Investment,

    /// quantity × purchase price
    pub initial_value: f64,

    /// quantity × (current price ?? purchase price)
    pub current_value: f64,
}

/// Aggregate figures shown under the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub total_initial_value: f64,
    pub total_current_value: f64,
    pub investment_count: usize,
}

impl PortfolioTotals {
    /// Absolute gain/loss: current − initial
    pub fn gain_loss(&self) -> f64 {
        self.total_current_value - self.total_initial_value
    }

    /// Percentage return, 0 when nothing was invested.
    pub fn return_pct(&self) -> f64 {
        if self.total_initial_value > 0.0 {
            self.gain_loss() / self.total_initial_value * 100.0
        } else {
            0.0
        }
    }
}

/// A category and its summed current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub category: String,
    pub value: f64,
}

/// Category → summed current value, in order of first appearance.
///
/// Order matters: it fixes wedge and legend order in the pie chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    entries: Vec<DistributionEntry>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to `category`, appending the category if it is new.
    pub fn add(&mut self, category: &str, value: f64) {
        match self.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => entry.value += value,
            None => self.entries.push(DistributionEntry {
                category: category.to_string(),
                value,
            }),
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.value)
    }

    pub fn entries(&self) -> &[DistributionEntry] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value.max(0.0)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut distribution = Distribution::new();
        for (category, value) in iter {
            distribution.add(category.as_ref(), value);
        }
        distribution
    }
}

/// Everything a front end needs to redraw the portfolio page.
/// Rebuilt from scratch after every load or mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioView {
    pub rows: Vec<PortfolioRow>,
    pub totals: PortfolioTotals,
    pub distribution: Distribution,
}
