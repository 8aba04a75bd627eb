use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::data::filter::FilteredView;

/// Recency / frequency / monetary metrics for one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRfm {
    /// Dense 1-based display label in first-seen order. Only meaningful
    /// within the table it came from; never use it to join.
    pub label: usize,
    pub customer_id: String,
    /// Whole days between the view's latest purchase and this customer's.
    pub recency_days: i64,
    /// Number of item rows for the customer.
    pub frequency: usize,
    /// Sum of payment values.
    pub monetary: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RfmTable {
    rows: Vec<CustomerRfm>,
}

impl RfmTable {
    /// Rows in label order.
    pub fn rows(&self) -> &[CustomerRfm] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, customer_id: &str) -> Option<&CustomerRfm> {
        self.rows.iter().find(|r| r.customer_id == customer_id)
    }

    /// Smallest recency first.
    pub fn most_recent(&self, n: usize) -> Vec<&CustomerRfm> {
        let mut ranked: Vec<&CustomerRfm> = self.rows.iter().collect();
        ranked.sort_by_key(|r| r.recency_days);
        ranked.truncate(n);
        ranked
    }

    pub fn most_frequent(&self, n: usize) -> Vec<&CustomerRfm> {
        let mut ranked: Vec<&CustomerRfm> = self.rows.iter().collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        ranked.truncate(n);
        ranked
    }

    pub fn highest_monetary(&self, n: usize) -> Vec<&CustomerRfm> {
        let mut ranked: Vec<&CustomerRfm> = self.rows.iter().collect();
        ranked.sort_by(|a, b| b.monetary.total_cmp(&a.monetary));
        ranked.truncate(n);
        ranked
    }
}

struct Accumulator<'a> {
    customer_id: &'a str,
    last_purchase: NaiveDateTime,
    frequency: usize,
    monetary: f64,
}

/// Per-customer RFM over the view. Recency is measured against the latest
/// purchase in the whole view, not the wall clock.
pub fn rfm_analysis(view: &FilteredView<'_>) -> RfmTable {
    let Some(reference) = view.iter().map(|r| r.purchased_at).max() else {
        return RfmTable::default();
    };

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<Accumulator<'_>> = Vec::new();
    for rec in view.iter() {
        let payment = rec.payment_value.unwrap_or(0.0);
        match slots.get(rec.customer_id.as_str()) {
            Some(&slot) => {
                let a = &mut acc[slot];
                a.last_purchase = a.last_purchase.max(rec.purchased_at);
                a.frequency += 1;
                a.monetary += payment;
            }
            None => {
                slots.insert(rec.customer_id.as_str(), acc.len());
                acc.push(Accumulator {
                    customer_id: rec.customer_id.as_str(),
                    last_purchase: rec.purchased_at,
                    frequency: 1,
                    monetary: payment,
                });
            }
        }
    }

    RfmTable {
        rows: acc
            .into_iter()
            .enumerate()
            .map(|(i, a)| CustomerRfm {
                label: i + 1,
                customer_id: a.customer_id.to_string(),
                recency_days: (reference - a.last_purchase).num_days(),
                frequency: a.frequency,
                monetary: a.monetary,
            })
            .collect(),
    }
}
