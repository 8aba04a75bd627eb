use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::analytics::category::{CategorySummary, CategoryTotal};
use crate::analytics::correlation::{review_score_span, PricePoint};
use crate::analytics::customers::{CustomerRfm, RfmTable};
use crate::analytics::geo::StateRevenue;
use crate::analytics::orders::StatusCount;
use crate::analytics::timeseries::{Granularity, OrderBucket};
use crate::color::{generate_palette, ReviewColorScale, BAR_COLOR};
use crate::format::format_brl;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Placeholder shown instead of a chart when the view is empty.
pub fn no_data(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.label(RichText::new("No data for the current selection.").weak().italics());
    ui.add_space(8.0);
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_label(value: f64, format: &str) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format(format).to_string())
        .unwrap_or_default()
}

/// Label for an integer grid position, or nothing between positions.
fn slot_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 0.01 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id.to_owned())
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_boxed_zoom(true)
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One line chart over time buckets.
struct SeriesChart {
    id: &'static str,
    title: &'static str,
    granularity: Granularity,
    y_label: &'static str,
    value: fn(&OrderBucket) -> f64,
    /// Only money-denominated series get the currency axis.
    money_axis: bool,
}

const MONTHLY_ORDERS: SeriesChart = SeriesChart {
    id: "monthly_orders",
    title: "Monthly Sales Count",
    granularity: Granularity::Month,
    y_label: "Sales Count",
    value: |b| b.orders as f64,
    money_axis: false,
};

const MONTHLY_REVENUE: SeriesChart = SeriesChart {
    id: "monthly_revenue",
    title: "Monthly Revenue",
    granularity: Granularity::Month,
    y_label: "Revenue",
    value: |b| b.revenue,
    money_axis: true,
};

const DAILY_ORDERS: SeriesChart = SeriesChart {
    id: "daily_orders",
    title: "Daily Sales Count",
    granularity: Granularity::Day,
    y_label: "Sales Count",
    value: |b| b.orders as f64,
    money_axis: false,
};

fn time_series(ui: &mut Ui, chart: &SeriesChart, buckets: &[OrderBucket]) {
    ui.strong(chart.title);
    if buckets.is_empty() {
        no_data(ui);
        return;
    }

    let points: PlotPoints = buckets
        .iter()
        .map(|b| [day_number(b.start), (chart.value)(b)])
        .collect();
    let format = chart.granularity.label_format();

    let mut plot = base_plot(chart.id)
        .x_axis_label("Date")
        .y_axis_label(chart.y_label)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range| date_label(mark.value, format));
    if chart.money_axis {
        plot = plot.y_axis_formatter(|mark: GridMark, _range| format_brl(mark.value));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.line(Line::new(points).color(BAR_COLOR).width(2.0));
    });
}

/// Distinct orders per month.
pub fn monthly_orders(ui: &mut Ui, buckets: &[OrderBucket]) {
    time_series(ui, &MONTHLY_ORDERS, buckets);
}

pub fn monthly_revenue(ui: &mut Ui, buckets: &[OrderBucket]) {
    time_series(ui, &MONTHLY_REVENUE, buckets);
}

pub fn daily_orders(ui: &mut Ui, buckets: &[OrderBucket]) {
    time_series(ui, &DAILY_ORDERS, buckets);
}

// ---------------------------------------------------------------------------
// Ranked bar charts
// ---------------------------------------------------------------------------

/// Horizontal bars, `items[0]` drawn at the top.
fn horizontal_bars(ui: &mut Ui, id: &str, items: &[(String, f64)], value_label: &str, money: bool) {
    if items.is_empty() {
        no_data(ui);
        return;
    }

    let n = items.len();
    // Bar i sits at position n-1-i so the first item is on top.
    let labels: Vec<String> = items.iter().rev().map(|(name, _)| name.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            Bar::new((n - 1 - i) as f64, *value)
                .name(name)
                .fill(BAR_COLOR)
                .width(0.6)
        })
        .collect();

    let mut plot = base_plot(id)
        .height((n as f32 * 28.0).max(140.0))
        .x_axis_label(value_label)
        .include_x(0.0)
        .y_axis_formatter(move |mark: GridMark, _range| slot_label(&labels, mark.value));
    if money {
        plot = plot.x_axis_formatter(|mark: GridMark, _range| format_brl(mark.value));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
    });
}

/// Vertical bars in the given order, left to right.
fn vertical_bars(
    ui: &mut Ui,
    id: &str,
    items: &[(String, f64)],
    colors: &[Color32],
    value_label: &str,
    money: bool,
) {
    if items.is_empty() {
        no_data(ui);
        return;
    }

    let labels: Vec<String> = items.iter().map(|(name, _)| name.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            Bar::new(i as f64, *value)
                .name(name)
                .fill(colors.get(i).copied().unwrap_or(BAR_COLOR))
                .width(0.6)
        })
        .collect();

    let mut plot = base_plot(id)
        .y_axis_label(value_label)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range| slot_label(&labels, mark.value));
    if money {
        plot = plot.y_axis_formatter(|mark: GridMark, _range| format_brl(mark.value));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
    });
}

/// Top-n best and worst selling categories by quantity.
pub fn best_worst_categories(ui: &mut Ui, summary: &CategorySummary, top_n: usize) {
    fn to_items(ranked: Vec<&CategoryTotal>) -> Vec<(String, f64)> {
        ranked
            .into_iter()
            .map(|t| (t.category.clone(), t.quantity as f64))
            .collect()
    }

    ui.strong(format!("Top {top_n} Best-Selling Categories"));
    horizontal_bars(
        ui,
        "best_categories",
        &to_items(summary.best(top_n)),
        "Quantity Ordered",
        false,
    );
    ui.add_space(12.0);
    ui.strong(format!("Top {top_n} Worst-Selling Categories"));
    horizontal_bars(
        ui,
        "worst_categories",
        &to_items(summary.worst(top_n)),
        "Quantity Ordered",
        false,
    );
}

/// Three panels: most recent, most frequent and highest spending customers.
pub fn rfm_panels(ui: &mut Ui, rfm: &RfmTable, top_n: usize) {
    if rfm.is_empty() {
        no_data(ui);
        return;
    }

    fn items(ranked: Vec<&CustomerRfm>, value: impl Fn(&CustomerRfm) -> f64) -> Vec<(String, f64)> {
        ranked
            .into_iter()
            .map(|r| (format!("#{}", r.label), value(r)))
            .collect()
    }

    let recency = items(rfm.most_recent(top_n), |r| r.recency_days as f64);
    let frequency = items(rfm.most_frequent(top_n), |r| r.frequency as f64);
    let monetary = items(rfm.highest_monetary(top_n), |r| r.monetary);

    ui.columns(3, |cols| {
        cols[0].strong("Recency (days)");
        vertical_bars(&mut cols[0], "rfm_recency", &recency, &[], "Days", false);
        cols[1].strong("Purchase Frequency");
        vertical_bars(&mut cols[1], "rfm_frequency", &frequency, &[], "Orders", false);
        cols[2].strong("Total Monetary Value");
        vertical_bars(&mut cols[2], "rfm_monetary", &monetary, &[], "Monetary", true);
    });
    ui.label(
        RichText::new("Customer labels are numbered in first-seen order for this selection.")
            .small()
            .weak(),
    );
}

/// Row count per order status.
pub fn status_breakdown(ui: &mut Ui, statuses: &[StatusCount]) {
    ui.strong("Orders by Status");
    let items: Vec<(String, f64)> = statuses
        .iter()
        .map(|s| (s.status.clone(), s.rows as f64))
        .collect();
    let colors = generate_palette(items.len());
    vertical_bars(ui, "orders_by_status", &items, &colors, "Order Count", false);
}

/// Revenue per state, the highest on top.
pub fn sales_by_state(ui: &mut Ui, states: &[StateRevenue]) {
    ui.strong("Sales by State");
    let items: Vec<(String, f64)> = states
        .iter()
        .rev()
        .map(|s| (s.state.clone(), s.revenue))
        .collect();
    horizontal_bars(ui, "sales_by_state", &items, "Total Sales", true);
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Price against freight, coloured by review score.
pub fn price_freight_scatter(ui: &mut Ui, points: &[PricePoint]) {
    ui.strong("Price vs Freight Cost vs Review Score");
    if points.is_empty() {
        no_data(ui);
        return;
    }

    let scale = review_score_span(points)
        .map(|(lo, hi)| ReviewColorScale::new(lo, hi))
        .unwrap_or_else(|| ReviewColorScale::new(0.0, 0.0));

    // One series per distinct score so the legend doubles as a colour bar.
    let mut series: BTreeMap<Option<i64>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        let key = p.review_score.map(|s| (s * 10.0).round() as i64);
        series.entry(key).or_default().push([p.price, p.freight]);
    }

    base_plot("price_freight")
        .height(CHART_HEIGHT * 1.5)
        .legend(Legend::default())
        .allow_drag(true)
        .allow_zoom(true)
        .x_axis_label("Product Price")
        .y_axis_label("Freight Cost")
        .x_axis_formatter(|mark: GridMark, _range| format_brl(mark.value))
        .y_axis_formatter(|mark: GridMark, _range| format_brl(mark.value))
        .show(ui, |plot_ui| {
            for (key, coords) in series {
                let score = key.map(|k| k as f64 / 10.0);
                let color = scale.color_for(score);
                let name = match score {
                    Some(s) => format!("Review {s:.1}"),
                    None => "No review".to_string(),
                };
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .radius(2.5)
                        .color(color.gamma_multiply(0.6))
                        .name(name),
                );
            }
        });
}
