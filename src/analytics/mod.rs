//! Aggregators over a [`FilteredView`].
//!
//! Every function here is pure and independent of the others: each one takes
//! the current view and returns a fresh table. An empty view produces empty
//! tables, never an error.

pub mod category;
pub mod correlation;
pub mod customers;
pub mod geo;
pub mod orders;
pub mod timeseries;

use crate::data::filter::FilteredView;

use category::CategorySummary;
use correlation::PricePoint;
use customers::RfmTable;
use geo::StateRevenue;
use orders::{OrderStats, StatusCount};
use timeseries::{Granularity, OrderBucket};

/// Every aggregate the dashboard renders, computed from one view.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub stats: OrderStats,
    pub monthly: Vec<OrderBucket>,
    pub daily: Vec<OrderBucket>,
    pub categories: CategorySummary,
    pub rfm: RfmTable,
    pub statuses: Vec<StatusCount>,
    pub states: Vec<StateRevenue>,
    pub price_points: Vec<PricePoint>,
}

impl Dashboard {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let dashboard = Dashboard {
            stats: orders::order_stats(view),
            monthly: timeseries::orders_over_time(view, Granularity::Month),
            daily: timeseries::orders_over_time(view, Granularity::Day),
            categories: category::category_summary(view),
            rfm: customers::rfm_analysis(view),
            statuses: orders::orders_by_status(view),
            states: geo::sales_by_state(view),
            price_points: correlation::price_freight_points(view),
        };
        log::debug!(
            "Dashboard recomputed: {} rows, {} orders, {} customers, {} states",
            view.len(),
            dashboard.stats.distinct_orders,
            dashboard.rfm.len(),
            dashboard.states.len()
        );
        dashboard
    }
}
