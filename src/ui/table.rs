use chrono::NaiveDateTime;
use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::{columns, OrderRecord};
use crate::ui::charts::no_data;

const ROW_HEIGHT: f32 = 18.0;

fn timestamp_cell(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn number_cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Display text for each column of a record, in [`columns::ALL`] order.
/// Missing values render as empty cells.
pub fn record_cells(rec: &OrderRecord) -> [String; 15] {
    [
        rec.order_id.clone(),
        rec.customer_id.clone(),
        rec.order_status.clone(),
        timestamp_cell(Some(rec.purchased_at)),
        timestamp_cell(rec.approved_at),
        timestamp_cell(rec.delivered_carrier_at),
        timestamp_cell(rec.delivered_customer_at),
        timestamp_cell(rec.estimated_delivery_at),
        rec.customer_state.clone(),
        rec.product_category.clone().unwrap_or_default(),
        rec.qty_order.map(|q| q.to_string()).unwrap_or_default(),
        number_cell(rec.price),
        number_cell(rec.freight_value),
        number_cell(rec.payment_value),
        rec.review_score.map(|s| format!("{s}")).unwrap_or_default(),
    ]
}

/// Scrollable dump of every row in the view. Rows are laid out lazily, so
/// large views stay cheap to draw.
pub fn records_table(ui: &mut Ui, view: &FilteredView<'_>) {
    ui.strong("Order Data");
    if view.is_empty() {
        no_data(ui);
        return;
    }

    let rows: Vec<&OrderRecord> = view.iter().collect();
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), columns::ALL.len())
            .header(20.0, |mut header| {
                for name in columns::ALL {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let rec = rows[row.index()];
                    for cell in record_cells(rec) {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
