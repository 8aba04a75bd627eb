use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::StatusFilter;
use crate::format::{format_brl, format_count};
use crate::state::{AppState, DashboardTab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(bounds), Some(selection)) = (state.date_bounds(), state.selection.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date Range");
            let mut start = selection.range.start();
            let mut end = selection.range.end();
            egui::Grid::new("date_range")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut start).id_salt("range_start"));
                    ui.end_row();

                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut end).id_salt("range_end"));
                    ui.end_row();
                });
            if start != selection.range.start() || end != selection.range.end() {
                state.set_date_range(start, end);
            }
            ui.label(
                RichText::new(format!("Data spans {} to {}", bounds.start(), bounds.end()))
                    .small()
                    .weak(),
            );
            ui.separator();

            // ---- Order status ----
            ui.strong("Select Order Status:");
            let mut choice = selection.status.label().to_string();
            for option in &state.status_options {
                ui.radio_value(&mut choice, option.clone(), option.as_str());
            }
            if choice != selection.status.label() {
                state.set_status(StatusFilter::from_choice(&choice));
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} in view",
                format_count(ds.len()),
                format_count(state.visible_indices.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Headline metrics and tab strip
// ---------------------------------------------------------------------------

/// Total orders and total revenue side by side.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    ui.heading(format!("Data Visualization for Status: {}", state.status_label()));
    let stats = state.dashboard.stats;
    ui.columns(2, |cols| {
        metric(&mut cols[0], "Total Orders", &format_count(stats.distinct_orders));
        metric(&mut cols[1], "Total Revenue", &format_brl(stats.total_revenue));
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(28.0).strong());
}

pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in DashboardTab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the dataset with a user-picked file. On failure the current
/// dataset stays loaded.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open order data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
