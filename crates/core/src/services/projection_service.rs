use crate::errors::CoreError;
use crate::models::projection::{ProjectionParams, ProjectionPoint, ProjectionSeries};

/// Longest horizon the simulator accepts (1200 monthly points).
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Compound-interest simulator with monthly contributions.
///
/// Pure computation: no I/O, no randomness.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// Run the simulation month by month.
    ///
    /// Each month the contribution is added first and interest applied
    /// second: `capital = (capital + contribution) × (1 + annual_rate/100/12)`.
    /// The running capital is carried at full precision; every emitted point
    /// is rounded to cents on its own.
    pub fn project(&self, params: &ProjectionParams) -> Result<ProjectionSeries, CoreError> {
        Self::validate(params)?;

        let monthly_rate = params.monthly_rate();
        let mut capital = params.initial_amount;
        let mut points = Vec::with_capacity(params.total_months());

        for month in 1..=params.duration_years * 12 {
            capital += params.monthly_contribution;
            capital *= 1.0 + monthly_rate;
            if !capital.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "The projection overflows after {month} months"
                )));
            }
            points.push(ProjectionPoint {
                month,
                capital: round_to_cents(capital),
            });
        }

        Ok(ProjectionSeries {
            params: *params,
            points,
        })
    }

    fn validate(params: &ProjectionParams) -> Result<(), CoreError> {
        let inputs = [
            ("initial amount", params.initial_amount),
            ("monthly contribution", params.monthly_contribution),
            ("annual rate", params.annual_rate),
        ];
        for (field, value) in inputs {
            if !value.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "The {field} must be a number, got {value}"
                )));
            }
        }
        if params.initial_amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "The initial amount must not be negative, got {}",
                params.initial_amount
            )));
        }
        if params.duration_years == 0 {
            return Err(CoreError::ValidationError(
                "The duration must be at least one year".into(),
            ));
        }
        if params.duration_years > MAX_PROJECTION_YEARS {
            return Err(CoreError::ValidationError(format!(
                "A duration of {} years exceeds the maximum of {MAX_PROJECTION_YEARS} years",
                params.duration_years
            )));
        }
        Ok(())
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to two decimals the way a `toFixed(2)` display does: nearest cent
/// of the exact binary value, with exact midpoints going away from zero.
///
/// Only values whose fractional part is an odd multiple of 1/8 can sit exactly
/// on a midpoint (x.125, x.375, x.625, x.875); everything else is decided
/// by the exact decimal expansion that `{:.2}` already rounds correctly.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let eighths = value.abs() * 8.0;
    let is_midpoint = eighths.fract() == 0.0 && (eighths % 2.0) == 1.0;
    if !is_midpoint {
        return format!("{value:.2}").parse().unwrap_or(value);
    }
    // x.yz5 exactly: drop the 5 and step one cent away from zero.
    let magnitude = value.abs();
    let truncated = (magnitude * 100.0).floor() / 100.0;
    let rounded: f64 = format!("{:.2}", truncated + 0.01).parse().unwrap_or(magnitude);
    rounded.copysign(value)
}
