use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Column contract of the source file
// ---------------------------------------------------------------------------

/// Header names the loader looks up. Any other column in the file is ignored.
pub mod columns {
    pub const ORDER_ID: &str = "order_id";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const ORDER_STATUS: &str = "order_status";
    pub const PURCHASED_AT: &str = "order_purchase_timestamp";
    pub const APPROVED_AT: &str = "order_approved_at";
    pub const DELIVERED_CARRIER_AT: &str = "order_delivered_carrier_date";
    pub const DELIVERED_CUSTOMER_AT: &str = "order_delivered_customer_date";
    pub const ESTIMATED_DELIVERY_AT: &str = "order_estimated_delivery_date";
    pub const CUSTOMER_STATE: &str = "customer_state";
    pub const PRODUCT_CATEGORY: &str = "product_category_name_english";
    pub const QTY_ORDER: &str = "qty_order";
    pub const PRICE: &str = "price";
    pub const FREIGHT_VALUE: &str = "freight_value";
    pub const PAYMENT_VALUE: &str = "payment_value";
    pub const REVIEW_SCORE: &str = "review_score";

    /// Every required column, in canonical order.
    pub const ALL: [&str; 15] = [
        ORDER_ID,
        CUSTOMER_ID,
        ORDER_STATUS,
        PURCHASED_AT,
        APPROVED_AT,
        DELIVERED_CARRIER_AT,
        DELIVERED_CUSTOMER_AT,
        ESTIMATED_DELIVERY_AT,
        CUSTOMER_STATE,
        PRODUCT_CATEGORY,
        QTY_ORDER,
        PRICE,
        FREIGHT_VALUE,
        PAYMENT_VALUE,
        REVIEW_SCORE,
    ];

    /// The columns parsed as timestamps.
    pub const TIMESTAMPS: [&str; 5] = [
        PURCHASED_AT,
        APPROVED_AT,
        DELIVERED_CARRIER_AT,
        DELIVERED_CUSTOMER_AT,
        ESTIMATED_DELIVERY_AT,
    ];

    /// Position of `column` inside [`ALL`].
    pub fn position(column: &str) -> Option<usize> {
        ALL.iter().position(|c| *c == column)
    }
}

// ---------------------------------------------------------------------------
// OrderRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One order item. An order with several items spans several records that
/// share `order_id`.
///
/// Optional fields hold `None` where the source cell was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub purchased_at: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_carrier_at: Option<NaiveDateTime>,
    pub delivered_customer_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    pub customer_state: String,
    pub product_category: Option<String>,
    pub qty_order: Option<u32>,
    pub price: Option<f64>,
    pub freight_value: Option<f64>,
    pub payment_value: Option<f64>,
    pub review_score: Option<f64>,
}

impl OrderRecord {
    /// Calendar date of the purchase, used by the date-range filter.
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset plus the few facts the sidebar needs up front.
#[derive(Debug, Clone, Default)]
pub struct OrderDataset {
    /// All records, in file order. Never mutated after load.
    pub records: Vec<OrderRecord>,
    /// Distinct `order_status` values in first-seen order.
    pub statuses: Vec<String>,
    /// Earliest and latest purchase date (`None` for an empty table).
    pub purchase_span: Option<(NaiveDate, NaiveDate)>,
}

impl OrderDataset {
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        let mut statuses: Vec<String> = Vec::new();
        let mut purchase_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            if !statuses.iter().any(|s| *s == rec.order_status) {
                statuses.push(rec.order_status.clone());
            }
            let day = rec.purchase_date();
            purchase_span = Some(match purchase_span {
                Some((lo, hi)) => (lo.min(day), hi.max(day)),
                None => (day, day),
            });
        }

        OrderDataset {
            records,
            statuses,
            purchase_span,
        }
    }

    /// Number of records (item rows, not orders).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal record builder for unit tests across the crate.
    pub(crate) fn record(
        order_id: &str,
        customer_id: &str,
        status: &str,
        purchased_at: &str,
        payment: f64,
    ) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            order_status: status.to_string(),
            purchased_at: NaiveDateTime::parse_from_str(purchased_at, "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            approved_at: None,
            delivered_carrier_at: None,
            delivered_customer_at: None,
            estimated_delivery_at: None,
            customer_state: "SP".to_string(),
            product_category: None,
            qty_order: Some(1),
            price: Some(payment),
            freight_value: Some(0.0),
            payment_value: Some(payment),
            review_score: None,
        }
    }

    #[test]
    fn test_statuses_keep_first_seen_order() {
        let ds = OrderDataset::from_records(vec![
            record("o1", "c1", "shipped", "2018-01-02 10:00:00", 1.0),
            record("o2", "c1", "delivered", "2018-01-01 10:00:00", 1.0),
            record("o3", "c2", "shipped", "2018-01-03 10:00:00", 1.0),
        ]);
        assert_eq!(ds.statuses, vec!["shipped", "delivered"]);
    }

    #[test]
    fn test_purchase_span() {
        let ds = OrderDataset::from_records(vec![
            record("o1", "c1", "delivered", "2018-03-02 23:59:59", 1.0),
            record("o2", "c1", "delivered", "2017-11-20 00:00:01", 1.0),
        ]);
        let (lo, hi) = ds.purchase_span.unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2017, 11, 20).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2018, 3, 2).unwrap());
    }

    #[test]
    fn test_empty_dataset_has_no_span() {
        let ds = OrderDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.purchase_span.is_none());
        assert!(ds.statuses.is_empty());
    }

    #[test]
    fn test_column_positions() {
        assert_eq!(columns::position(columns::ORDER_ID), Some(0));
        assert_eq!(columns::position(columns::REVIEW_SCORE), Some(14));
        assert_eq!(columns::position("product_weight_g"), None);
    }
}
