use chrono::NaiveDate;

use crate::analytics::Dashboard;
use crate::config::DashboardConfig;
use crate::data::filter::{
    self, full_range, status_options, DateRange, FilterSelection, FilteredView, StatusFilter,
};
use crate::data::model::OrderDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Section shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Sales,
    Products,
    Customers,
    Geography,
    Correlation,
    Records,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 6] = [
        DashboardTab::Sales,
        DashboardTab::Products,
        DashboardTab::Customers,
        DashboardTab::Geography,
        DashboardTab::Correlation,
        DashboardTab::Records,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::Sales => "Sales",
            DashboardTab::Products => "Products",
            DashboardTab::Customers => "Customers",
            DashboardTab::Geography => "Geography",
            DashboardTab::Correlation => "Price & Freight",
            DashboardTab::Records => "Order Data",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset.
    pub dataset: Option<OrderDataset>,

    /// Current date range and status; `None` until a non-empty dataset is
    /// loaded.
    pub selection: Option<FilterSelection>,

    /// `ALL` followed by the dataset's statuses.
    pub status_options: Vec<String>,

    /// Indices of rows passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Aggregates of the current view, replaced on every selection change.
    pub dashboard: Dashboard,

    pub active_tab: DashboardTab,

    /// Entries shown in each ranked chart.
    pub top_n: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            selection: None,
            status_options: Vec::new(),
            visible_indices: Vec::new(),
            dashboard: Dashboard::default(),
            active_tab: DashboardTab::default(),
            top_n: config.ui.top_n,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the selection to everything.
    pub fn set_dataset(&mut self, dataset: OrderDataset) {
        self.selection = FilterSelection::full(&dataset);
        self.status_options = status_options(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Earliest and latest purchase date of the loaded data.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.dataset.as_ref().and_then(full_range)
    }

    /// The current view over the loaded dataset.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// Recompute the view and every aggregate from the current selection.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(selection)) = (&self.dataset, &self.selection) else {
            self.visible_indices.clear();
            self.dashboard = Dashboard::default();
            return;
        };
        let view = filter::apply(ds, selection);
        self.dashboard = Dashboard::compute(&view);
        self.visible_indices = view.indices().to_vec();
    }

    /// Change the date range. A range overlapping the data is clamped to its
    /// extent; one wholly outside it is kept as given and selects nothing.
    /// An inverted range is rejected and the previous selection kept.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let Some(bounds) = self.date_bounds() else {
            return;
        };
        let range = match DateRange::new(start, end) {
            Ok(range) if range.overlaps(bounds) => range.clamp_to(bounds),
            Ok(range) => range,
            Err(e) => {
                log::warn!("Ignoring date range: {e}");
                self.status_message = Some(format!("Invalid date range: {e}"));
                return;
            }
        };
        if let Some(selection) = &mut self.selection {
            if selection.range == range {
                return;
            }
            selection.range = range;
            self.status_message = None;
            self.refilter();
        }
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        if let Some(selection) = &mut self.selection {
            if selection.status == status {
                return;
            }
            selection.status = status;
            self.refilter();
        }
    }

    /// Back to the whole date span and `ALL`.
    pub fn reset_filters(&mut self) {
        self.selection = self.dataset.as_ref().and_then(FilterSelection::full);
        self.status_message = None;
        self.refilter();
    }

    /// Label of the status currently selected.
    pub fn status_label(&self) -> &str {
        self.selection
            .as_ref()
            .map(|s| s.status.label())
            .unwrap_or(filter::STATUS_ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(OrderDataset::from_records(vec![
            record("o1", "c1", "delivered", "2018-01-01 10:00:00", 10.0),
            record("o1", "c1", "delivered", "2018-01-01 10:00:00", 15.0),
            record("o2", "c2", "shipped", "2018-01-10 10:00:00", 20.0),
            record("o3", "c3", "delivered", "2018-01-20 10:00:00", 30.0),
        ]));
        state
    }

    #[test]
    fn test_set_dataset_selects_everything() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        assert_eq!(state.status_options, vec!["ALL", "delivered", "shipped"]);
        assert_eq!(state.status_label(), "ALL");
        assert_eq!(state.dashboard.stats.distinct_orders, 3);
        assert_eq!(state.dashboard.stats.total_revenue, 75.0);
    }

    #[test]
    fn test_status_change_recomputes() {
        let mut state = loaded_state();
        state.set_status(StatusFilter::from_choice("shipped"));
        assert_eq!(state.visible_indices, vec![2]);
        assert_eq!(state.dashboard.stats.distinct_orders, 1);
        assert_eq!(state.dashboard.rfm.rows()[0].customer_id, "c2");
        assert_eq!(state.dashboard.rfm.rows()[0].label, 1);
    }

    #[test]
    fn test_inverted_range_keeps_previous_selection() {
        let mut state = loaded_state();
        state.set_date_range(day(2018, 1, 10), day(2018, 1, 20));
        assert_eq!(state.visible_indices, vec![2, 3]);

        state.set_date_range(day(2018, 1, 15), day(2018, 1, 5));
        assert_eq!(state.visible_indices, vec![2, 3]);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_range_clamped_to_data() {
        let mut state = loaded_state();
        state.set_date_range(day(2017, 1, 1), day(2019, 1, 1));
        let range = state.selection.as_ref().unwrap().range;
        assert_eq!(range.start(), day(2018, 1, 1));
        assert_eq!(range.end(), day(2018, 1, 20));
    }

    #[test]
    fn test_range_outside_data_selects_nothing() {
        let mut state = loaded_state();
        state.set_date_range(day(2017, 1, 1), day(2017, 6, 30));
        let range = state.selection.as_ref().unwrap().range;
        assert_eq!(range.start(), day(2017, 1, 1));
        assert_eq!(range.end(), day(2017, 6, 30));
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.dashboard.stats.distinct_orders, 0);

        state.set_date_range(day(2018, 2, 1), day(2018, 3, 1));
        assert!(state.visible_indices.is_empty());
    }

    #[test]
    fn test_empty_selection_gives_empty_dashboard() {
        let mut state = loaded_state();
        state.set_date_range(day(2018, 1, 2), day(2018, 1, 9));
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.dashboard.stats.distinct_orders, 0);
        assert!(state.dashboard.daily.is_empty());
        assert!(state.view().unwrap().is_empty());
    }

    #[test]
    fn test_reset_filters() {
        let mut state = loaded_state();
        state.set_status(StatusFilter::from_choice("shipped"));
        state.set_date_range(day(2018, 1, 10), day(2018, 1, 10));
        state.reset_filters();
        assert_eq!(state.visible_indices.len(), 4);
        assert_eq!(state.status_label(), "ALL");
    }

    #[test]
    fn test_no_dataset() {
        let mut state = AppState::default();
        state.refilter();
        assert!(state.view().is_none());
        assert!(state.date_bounds().is_none());
        state.set_date_range(day(2018, 1, 1), day(2018, 1, 2));
        assert!(state.selection.is_none());
    }
}
