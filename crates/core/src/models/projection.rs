use serde::{Deserialize, Serialize};

/// Simulator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Starting capital (must be ≥ 0)
    pub initial_amount: f64,

    /// Amount added at the start of every month
    pub monthly_contribution: f64,

    /// Yearly rate in percent (6.0 means 6 %)
    pub annual_rate: f64,

    /// Horizon in whole years (must be > 0)
    pub duration_years: u32,
}

impl ProjectionParams {
    pub fn new(
        initial_amount: f64,
        monthly_contribution: f64,
        annual_rate: f64,
        duration_years: u32,
    ) -> Self {
        Self {
            initial_amount,
            monthly_contribution,
            annual_rate,
            duration_years,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }

    pub fn total_months(&self) -> usize {
        self.duration_years as usize * 12
    }
}

/// Capital at the end of a given month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based month index
    pub month: u32,

    /// Capital after this month, rounded to cents
    pub capital: f64,
}

/// Month-by-month capital trajectory for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub params: ProjectionParams,
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    /// Capital after the last month.
    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.capital)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.capital).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total money put in: initial amount plus every contribution.
    pub fn total_contributed(&self) -> f64 {
        self.params.initial_amount
            + self.params.monthly_contribution * self.params.total_months() as f64
    }
}
