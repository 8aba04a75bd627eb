use std::collections::HashSet;

use crate::data::filter::FilteredView;

/// Headline metrics of the view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderStats {
    /// Distinct order ids; an order with several items counts once.
    pub distinct_orders: usize,
    pub total_revenue: f64,
}

pub fn order_stats(view: &FilteredView<'_>) -> OrderStats {
    let mut orders: HashSet<&str> = HashSet::new();
    let mut total_revenue = 0.0;
    for rec in view.iter() {
        orders.insert(rec.order_id.as_str());
        total_revenue += rec.payment_value.unwrap_or(0.0);
    }
    OrderStats {
        distinct_orders: orders.len(),
        total_revenue,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    /// Item rows carrying this status.
    pub rows: usize,
}

/// Row count per order status, most frequent first. Ties keep first-seen
/// order.
pub fn orders_by_status(view: &FilteredView<'_>) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for rec in view.iter() {
        match counts.iter_mut().find(|c| c.status == rec.order_status) {
            Some(entry) => entry.rows += 1,
            None => counts.push(StatusCount {
                status: rec.order_status.clone(),
                rows: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.rows.cmp(&a.rows));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::OrderDataset;

    fn dataset() -> OrderDataset {
        OrderDataset::from_records(vec![
            record("o1", "c1", "shipped", "2018-01-01 10:00:00", 10.0),
            record("o2", "c2", "delivered", "2018-01-01 11:00:00", 20.0),
            record("o2", "c2", "delivered", "2018-01-01 11:00:00", 25.0),
            record("o3", "c3", "delivered", "2018-01-02 10:00:00", 5.0),
        ])
    }

    #[test]
    fn test_distinct_orders_not_rows() {
        let ds = dataset();
        let stats = order_stats(&FilteredView::all(&ds));
        assert_eq!(stats.distinct_orders, 3);
        assert_eq!(stats.total_revenue, 60.0);
    }

    #[test]
    fn test_status_counts_descending() {
        let ds = dataset();
        let counts = orders_by_status(&FilteredView::all(&ds));
        assert_eq!(
            counts,
            vec![
                StatusCount { status: "delivered".into(), rows: 3 },
                StatusCount { status: "shipped".into(), rows: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_view() {
        let ds = OrderDataset::default();
        let view = FilteredView::all(&ds);
        assert_eq!(order_stats(&view), OrderStats::default());
        assert!(orders_by_status(&view).is_empty());
    }
}
