// ═══════════════════════════════════════════════════════════════════
// Service Tests — projection, portfolio view, chart geometry, display
// ═══════════════════════════════════════════════════════════════════

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use investment_tracker_core::errors::CoreError;
use investment_tracker_core::models::chart::ChartSize;
use investment_tracker_core::models::investment::{Investment, InvestmentDraft};
use investment_tracker_core::models::portfolio::Distribution;
use investment_tracker_core::models::projection::ProjectionParams;
use investment_tracker_core::services::chart_service::{palette_color, ChartService};
use investment_tracker_core::services::display::{
    fixed2, format_amount, format_eur, portfolio_table, projection_summary, summary_lines,
};
use investment_tracker_core::services::portfolio_service::PortfolioService;
use investment_tracker_core::services::projection_service::{
    round_to_cents, ProjectionService, MAX_PROJECTION_YEARS,
};

const EPS: f64 = 1e-9;

fn inv(asset: &str, quantity: f64, purchase: f64, current: Option<f64>) -> Investment {
    Investment::new(InvestmentDraft::new(asset, quantity, purchase, current, "2024-01-01").unwrap())
}

fn sample_portfolio() -> Vec<Investment> {
    vec![
        inv("ETF", 2.0, 10.0, Some(12.0)),
        inv("Gold", 1.0, 100.0, None),
        inv("ETF", 1.0, 5.0, Some(6.0)),
    ]
}

/// The recurrence written out longhand, for comparison.
fn reference_projection(initial: f64, monthly: f64, annual_rate: f64, years: u32) -> Vec<f64> {
    let rate = annual_rate / 100.0 / 12.0;
    let mut capital = initial;
    let mut out = Vec::new();
    for _ in 0..years * 12 {
        capital = (capital + monthly) * (1.0 + rate);
        out.push(round_to_cents(capital));
    }
    out
}

// ═══════════════════════════════════════════════════════════════════
// Projection
// ═══════════════════════════════════════════════════════════════════

mod projection {
    use super::*;

    #[test]
    fn length_is_twelve_per_year() {
        let service = ProjectionService::new();
        for years in [1, 2, 10, 30] {
            let series = service
                .project(&ProjectionParams::new(1000.0, 100.0, 5.0, years))
                .unwrap();
            assert_eq!(series.len(), years as usize * 12);
            assert_eq!(series.points[0].month, 1);
            assert_eq!(series.points.last().unwrap().month, years * 12);
        }
    }

    #[test]
    fn one_year_example_matches_recurrence() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(1000.0, 100.0, 6.0, 1))
            .unwrap();
        assert_eq!(series.values(), reference_projection(1000.0, 100.0, 6.0, 1));
        assert_eq!(series.final_value(), Some(2301.40));
    }

    #[test]
    fn ten_year_example_matches_recurrence() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(1000.0, 100.0, 5.0, 10))
            .unwrap();
        assert_eq!(series.values(), reference_projection(1000.0, 100.0, 5.0, 10));
        assert_eq!(series.final_value(), Some(17239.94));
    }

    #[test]
    fn zero_rate_is_plain_sum() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(0.0, 100.0, 0.0, 1))
            .unwrap();
        let expected: Vec<f64> = (1..=12).map(|m| f64::from(m) * 100.0).collect();
        assert_eq!(series.values(), expected);
    }

    #[test]
    fn monotonic_with_positive_inputs() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(500.0, 50.0, 4.0, 5))
            .unwrap();
        assert!(series.values().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn first_month_adds_contribution_before_interest() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(1000.0, 100.0, 12.0, 1))
            .unwrap();
        assert_eq!(series.points[0].capital, 1111.0);
    }

    #[test]
    fn zero_duration_rejected() {
        let err = ProjectionService::new()
            .project(&ProjectionParams::new(1000.0, 100.0, 5.0, 0))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn negative_initial_amount_rejected() {
        assert!(ProjectionService::new()
            .project(&ProjectionParams::new(-1.0, 100.0, 5.0, 1))
            .is_err());
    }

    #[test]
    fn non_finite_inputs_rejected() {
        let service = ProjectionService::new();
        assert!(service.project(&ProjectionParams::new(f64::NAN, 1.0, 1.0, 1)).is_err());
        assert!(service.project(&ProjectionParams::new(1.0, f64::INFINITY, 1.0, 1)).is_err());
        assert!(service.project(&ProjectionParams::new(1.0, 1.0, f64::NAN, 1)).is_err());
    }

    #[test]
    fn duration_cap() {
        let service = ProjectionService::new();
        assert!(service
            .project(&ProjectionParams::new(1.0, 1.0, 1.0, MAX_PROJECTION_YEARS))
            .is_ok());
        assert!(service
            .project(&ProjectionParams::new(1.0, 1.0, 1.0, MAX_PROJECTION_YEARS + 1))
            .is_err());
    }

    #[test]
    fn overflow_is_an_error_not_infinity() {
        let err = ProjectionService::new()
            .project(&ProjectionParams::new(1e300, 0.0, 1e6, 100))
            .unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Rounding & formatting
// ═══════════════════════════════════════════════════════════════════

mod rounding {
    use super::*;

    #[test]
    fn exact_midpoints_round_away_from_zero() {
        assert_eq!(round_to_cents(1.125), 1.13);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(-1.125), -1.13);
    }

    #[test]
    fn decimal_looking_midpoints_follow_binary_value() {
        // 2.675 and 1.005 are stored slightly below the midpoint.
        assert_eq!(round_to_cents(2.675), 2.67);
        assert_eq!(round_to_cents(1.005), 1.0);
    }

    #[test]
    fn ordinary_values() {
        assert_eq!(round_to_cents(2301.4018303409393), 2301.40);
        assert_eq!(round_to_cents(0.5), 0.5);
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round_to_cents(f64::NAN).is_nan());
        assert_eq!(round_to_cents(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn fixed_two_decimals() {
        assert_eq!(fixed2(1.125), "1.13");
        assert_eq!(fixed2(3.0), "3.00");
        assert_eq!(format_amount(1234.5), "1234.50 €");
    }

    #[test]
    fn french_euro_format() {
        assert_eq!(format_eur(2301.4), "2\u{202F}301,40\u{00A0}€");
        assert_eq!(format_eur(1234567.891), "1\u{202F}234\u{202F}567,89\u{00A0}€");
        assert_eq!(format_eur(12.5), "12,50\u{00A0}€");
        assert_eq!(format_eur(-5.0), "-5,00\u{00A0}€");
        assert_eq!(format_eur(-0.001), "0,00\u{00A0}€");
    }

    #[test]
    fn projection_sentence() {
        let series = ProjectionService::new()
            .project(&ProjectionParams::new(1000.0, 100.0, 6.0, 1))
            .unwrap();
        assert_eq!(
            projection_summary(&series).unwrap(),
            "Estimated final value after 1 years: 2\u{202F}301,40\u{00A0}€"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio view
// ═══════════════════════════════════════════════════════════════════

mod portfolio_view {
    use super::*;

    #[test]
    fn rows_and_totals() {
        let view = PortfolioService::new().build_view(&sample_portfolio());
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0].initial_value, 20.0);
        assert_eq!(view.rows[0].current_value, 24.0);
        assert_eq!(view.rows[1].current_value, 100.0);
        assert_eq!(view.totals.total_initial_value, 125.0);
        assert_eq!(view.totals.total_current_value, 130.0);
        assert_eq!(view.totals.investment_count, 3);
    }

    #[test]
    fn distribution_groups_by_asset_in_first_seen_order() {
        let dist = PortfolioService::new().distribution(&sample_portfolio());
        let entries: Vec<(&str, f64)> = dist
            .entries()
            .iter()
            .map(|e| (e.category.as_str(), e.value))
            .collect();
        assert_eq!(entries, vec![("ETF", 30.0), ("Gold", 100.0)]);
    }

    #[test]
    fn view_distribution_matches_standalone_distribution() {
        let service = PortfolioService::new();
        let portfolio = sample_portfolio();
        assert_eq!(service.build_view(&portfolio).distribution, service.distribution(&portfolio));
    }

    #[test]
    fn empty_portfolio() {
        let view = PortfolioService::new().build_view(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.totals.investment_count, 0);
        assert!(view.distribution.is_empty());
    }

    #[test]
    fn summary_lines_text() {
        let view = PortfolioService::new().build_view(&sample_portfolio());
        assert_eq!(
            summary_lines(&view),
            vec![
                "Total initial value: 125.00 €".to_string(),
                "Total current value: 130.00 €".to_string(),
                "Number of investments: 3".to_string(),
            ]
        );
    }

    #[test]
    fn table_lists_every_row() {
        let view = PortfolioService::new().build_view(&sample_portfolio());
        let table = portfolio_table(&view);
        assert!(table.contains("Asset"));
        assert!(table.contains("Current value (€)"));
        assert!(table.contains("Gold"));
        assert!(table.contains("12.00"));
        assert!(table.contains("24.00"));
        // Gold has no current price.
        assert!(table.contains(" - "));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Pie geometry
// ═══════════════════════════════════════════════════════════════════

mod pie_layout {
    use super::*;

    fn size() -> ChartSize {
        ChartSize::new(400.0, 300.0)
    }

    #[test]
    fn two_equal_halves() {
        let dist: Distribution = vec![("A", 50.0), ("B", 50.0)].into_iter().collect();
        let layout = ChartService::new().pie_layout(size(), &dist).unwrap();

        assert_eq!(layout.center.x, 200.0);
        assert_eq!(layout.center.y, 150.0);
        assert_eq!(layout.radius, 140.0);
        assert_eq!(layout.wedges.len(), 2);
        assert!((layout.wedges[0].start_angle + FRAC_PI_2).abs() < EPS);
        assert!((layout.wedges[0].sweep - PI).abs() < EPS);
        assert!((layout.wedges[1].sweep - PI).abs() < EPS);
        assert!((layout.wedges[1].start_angle - layout.wedges[0].end_angle()).abs() < EPS);
        assert_eq!(layout.legend[0].text(), "A (50.0%)");
        assert_eq!(layout.legend[1].text(), "B (50.0%)");
    }

    #[test]
    fn sweeps_cover_the_full_circle() {
        let dist: Distribution = vec![("A", 1.0), ("B", 2.0), ("C", 3.5), ("D", 0.25)]
            .into_iter()
            .collect();
        let layout = ChartService::new().pie_layout(size(), &dist).unwrap();
        let total: f64 = layout.wedges.iter().map(|w| w.sweep).sum();
        assert!((total - TAU).abs() < EPS);
        let percent: f64 = layout.legend.iter().map(|l| l.percent).sum();
        assert!((percent - 100.0).abs() < EPS);
    }

    #[test]
    fn legend_positions() {
        let dist: Distribution = vec![("A", 1.0), ("B", 1.0), ("C", 1.0)].into_iter().collect();
        let layout = ChartService::new().pie_layout(size(), &dist).unwrap();
        for (i, entry) in layout.legend.iter().enumerate() {
            let y = 20.0 + 18.0 * i as f64;
            assert_eq!(entry.swatch.x, 250.0);
            assert_eq!(entry.swatch.y, y);
            assert_eq!(entry.label_at.x, 270.0);
            assert_eq!(entry.label_at.y, y + 10.0);
        }
    }

    #[test]
    fn single_category_is_full_disc() {
        let dist: Distribution = vec![("Only", 42.0)].into_iter().collect();
        let layout = ChartService::new().pie_layout(size(), &dist).unwrap();
        assert!((layout.wedges[0].sweep - TAU).abs() < EPS);
        assert_eq!(layout.legend[0].text(), "Only (100.0%)");
    }

    #[test]
    fn zero_total_has_no_layout() {
        let dist: Distribution = vec![("A", 0.0), ("B", 0.0)].into_iter().collect();
        assert!(ChartService::new().pie_layout(size(), &dist).is_none());
    }

    #[test]
    fn empty_distribution_has_no_layout() {
        assert!(ChartService::new().pie_layout(size(), &Distribution::new()).is_none());
    }

    #[test]
    fn negative_values_count_as_zero() {
        let dist: Distribution = vec![("Up", 10.0), ("Down", -5.0)].into_iter().collect();
        let layout = ChartService::new().pie_layout(size(), &dist).unwrap();
        assert!((layout.wedges[0].sweep - TAU).abs() < EPS);
        assert_eq!(layout.wedges[1].sweep, 0.0);
        assert!(layout.wedges.iter().all(|w| w.sweep.is_finite()));
    }

    #[test]
    fn tiny_surface_clamps_radius() {
        let dist: Distribution = vec![("A", 1.0)].into_iter().collect();
        let layout = ChartService::new()
            .pie_layout(ChartSize::new(10.0, 10.0), &dist)
            .unwrap();
        assert_eq!(layout.radius, 0.0);
    }

    #[test]
    fn colors_are_deterministic_and_distinct() {
        let colors: Vec<_> = (0..20).map(palette_color).collect();
        assert_eq!(colors, (0..20).map(palette_color).collect::<Vec<_>>());
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Line geometry
// ═══════════════════════════════════════════════════════════════════

mod line_layout {
    use super::*;

    fn size() -> ChartSize {
        ChartSize::new(800.0, 400.0)
    }

    #[test]
    fn plotting_area_and_scale() {
        let layout = ChartService::new().line_layout(size(), &[100.0, 200.0], 2);
        assert_eq!(layout.margin, 50.0);
        assert_eq!(layout.chart_width, 700.0);
        assert_eq!(layout.chart_height, 300.0);
        assert!((layout.max_y - 220.0).abs() < EPS);
    }

    #[test]
    fn points_span_the_width() {
        let layout = ChartService::new().line_layout(size(), &[100.0, 150.0, 200.0], 1);
        assert_eq!(layout.points[0].x, 50.0);
        assert_eq!(layout.points[1].x, 400.0);
        assert_eq!(layout.points[2].x, 750.0);
        let expected_y = 350.0 - (200.0 / 220.0) * 300.0;
        assert!((layout.points[2].y - expected_y).abs() < 1e-6);
    }

    #[test]
    fn y_ticks() {
        let layout = ChartService::new().line_layout(size(), &[100.0, 200.0], 2);
        let labels: Vec<&str> = layout.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "44", "88", "132", "176", "220"]);
        assert_eq!(layout.y_ticks[0].at.y, 350.0);
        assert!((layout.y_ticks[5].at.y - 50.0).abs() < EPS);
    }

    #[test]
    fn x_ticks_mark_whole_years() {
        let layout = ChartService::new().line_layout(size(), &[1.0; 24], 2);
        let labels: Vec<&str> = layout.x_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "1", "2"]);
        assert_eq!(layout.x_ticks[1].at.x, 400.0);
        assert_eq!(layout.x_ticks[2].at.x, 750.0);
    }

    #[test]
    fn single_point_sits_on_the_y_axis() {
        let layout = ChartService::new().line_layout(size(), &[500.0], 1);
        assert_eq!(layout.points.len(), 1);
        assert_eq!(layout.points[0].x, 50.0);
        assert!(layout.points[0].y.is_finite());
    }

    #[test]
    fn all_zero_series_keeps_a_finite_scale() {
        let layout = ChartService::new().line_layout(size(), &[0.0; 12], 1);
        assert_eq!(layout.max_y, 1.0);
        assert!(layout.points.iter().all(|p| p.x.is_finite() && p.y == 350.0));
    }

    #[test]
    fn empty_series_has_axes_only() {
        let layout = ChartService::new().line_layout(size(), &[], 3);
        assert!(layout.points.is_empty());
        assert_eq!(layout.y_ticks.len(), 6);
        assert_eq!(layout.x_ticks.len(), 4);
    }

    #[test]
    fn labels() {
        let layout = ChartService::new().line_layout(size(), &[1.0], 10);
        assert_eq!(layout.title, "Monthly projection over 10 years");
        assert_eq!(layout.y_label, "Amount (€)");
        assert_eq!(layout.x_label, "Years");
    }
}
