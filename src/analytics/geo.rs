use std::collections::BTreeMap;

use crate::data::filter::FilteredView;

#[derive(Debug, Clone, PartialEq)]
pub struct StateRevenue {
    pub state: String,
    pub revenue: f64,
}

/// Payment value per customer state, smallest first.
pub fn sales_by_state(view: &FilteredView<'_>) -> Vec<StateRevenue> {
    let mut grouped: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in view.iter() {
        *grouped.entry(rec.customer_state.as_str()).or_insert(0.0) +=
            rec.payment_value.unwrap_or(0.0);
    }

    let mut states: Vec<StateRevenue> = grouped
        .into_iter()
        .map(|(state, revenue)| StateRevenue {
            state: state.to_string(),
            revenue,
        })
        .collect();
    states.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::{OrderDataset, OrderRecord};

    fn sale(state: &str, payment: Option<f64>) -> OrderRecord {
        OrderRecord {
            customer_state: state.to_string(),
            payment_value: payment,
            ..record("o1", "c1", "delivered", "2018-01-01 10:00:00", 0.0)
        }
    }

    #[test]
    fn test_sorted_ascending_by_revenue() {
        let ds = OrderDataset::from_records(vec![
            sale("SP", Some(100.0)),
            sale("RJ", Some(40.0)),
            sale("SP", Some(50.0)),
            sale("MG", Some(70.0)),
            sale("RJ", None),
        ]);
        let states = sales_by_state(&FilteredView::all(&ds));
        let pairs: Vec<(&str, f64)> = states
            .iter()
            .map(|s| (s.state.as_str(), s.revenue))
            .collect();
        assert_eq!(pairs, vec![("RJ", 40.0), ("MG", 70.0), ("SP", 150.0)]);
        assert!(states.windows(2).all(|w| w[0].revenue <= w[1].revenue));
    }

    #[test]
    fn test_empty_view() {
        let ds = OrderDataset::default();
        assert!(sales_by_state(&FilteredView::all(&ds)).is_empty());
    }
}
