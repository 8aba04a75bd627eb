use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::model::OrderDataset;
use crate::state::{AppState, DashboardTab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct OrderScopeApp {
    pub state: AppState,
}

impl OrderScopeApp {
    pub fn new(config: &DashboardConfig, dataset: OrderDataset) -> Self {
        let mut state = AppState::new(config);
        state.set_dataset(dataset);
        Self { state }
    }
}

impl eframe::App for OrderScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics + active section ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Order Data Analysis");
            panels::metrics(ui, &self.state);
            ui.separator();
            panels::tab_strip(ui, &mut self.state);
            ui.separator();

            if self.state.active_tab == DashboardTab::Records {
                // The table scrolls itself.
                records(ui, &self.state);
            } else {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui: &mut Ui| section(ui, &self.state));
            }
        });
    }
}

fn section(ui: &mut Ui, state: &AppState) {
    let d = &state.dashboard;
    match state.active_tab {
        DashboardTab::Sales => {
            charts::monthly_orders(ui, &d.monthly);
            ui.add_space(12.0);
            charts::monthly_revenue(ui, &d.monthly);
            ui.add_space(12.0);
            charts::daily_orders(ui, &d.daily);
            ui.add_space(12.0);
            charts::status_breakdown(ui, &d.statuses);
        }
        DashboardTab::Products => {
            charts::best_worst_categories(ui, &d.categories, state.top_n);
        }
        DashboardTab::Customers => {
            ui.strong("Best Customers Based on RFM Analysis");
            charts::rfm_panels(ui, &d.rfm, state.top_n);
        }
        DashboardTab::Geography => charts::sales_by_state(ui, &d.states),
        DashboardTab::Correlation => charts::price_freight_scatter(ui, &d.price_points),
        DashboardTab::Records => records(ui, state),
    }
}

fn records(ui: &mut Ui, state: &AppState) {
    match state.view() {
        Some(view) => table::records_table(ui, &view),
        None => charts::no_data(ui),
    }
}
