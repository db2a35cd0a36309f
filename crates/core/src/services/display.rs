use comfy_table::{presets::UTF8_FULL, Table};

use crate::models::portfolio::PortfolioView;
use crate::models::projection::ProjectionSeries;
use crate::services::projection_service::round_to_cents;

const NARROW_NO_BREAK_SPACE: char = '\u{202F}';
const NO_BREAK_SPACE: char = '\u{00A0}';

/// Two decimals, midpoints away from zero (`1.125` → `"1.13"`).
pub fn fixed2(value: f64) -> String {
    format!("{:.2}", round_to_cents(value))
}

/// Plain amount with a euro suffix, e.g. `"1234.50 €"`.
pub fn format_amount(value: f64) -> String {
    format!("{} €", fixed2(value))
}

/// French-locale euro amount, e.g. `"2 301,40 €"`.
///
/// Thousands are grouped with a narrow no-break space and the symbol is
/// separated by a no-break space, matching the fr-FR currency format.
pub fn format_eur(value: f64) -> String {
    let fixed = fixed2(value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(NARROW_NO_BREAK_SPACE);
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && round_to_cents(value) != 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}{NO_BREAK_SPACE}€")
}

/// Sentence shown under the simulator form.
pub fn projection_summary(series: &ProjectionSeries) -> Option<String> {
    series.final_value().map(|value| {
        format!(
            "Estimated final value after {} years: {}",
            series.params.duration_years,
            format_eur(value)
        )
    })
}

/// Summary lines shown under the investment table.
pub fn summary_lines(view: &PortfolioView) -> Vec<String> {
    vec![
        format!("Total initial value: {}", format_amount(view.totals.total_initial_value)),
        format!("Total current value: {}", format_amount(view.totals.total_current_value)),
        format!("Number of investments: {}", view.totals.investment_count),
    ]
}

/// Investment table as text.
pub fn portfolio_table(view: &PortfolioView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Asset",
        "Quantity",
        "Purchase price (€)",
        "Current price (€)",
        "Purchase date",
        "Initial value (€)",
        "Current value (€)",
    ]);
    for row in &view.rows {
        let inv = &row.investment;
        table.add_row(vec![
            inv.asset.clone(),
            inv.quantity.to_string(),
            fixed2(inv.purchase_price),
            inv.current_price.map(fixed2).unwrap_or_else(|| "-".to_string()),
            inv.purchase_date.clone(),
            fixed2(row.initial_value),
            fixed2(row.current_value),
        ]);
    }
    table.to_string()
}
