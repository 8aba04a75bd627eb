use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

use crate::data::filter::FilteredView;

/// Resampling granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    /// First calendar day of the bucket containing `ts`.
    pub fn bucket_start(self, ts: NaiveDateTime) -> NaiveDate {
        let date = ts.date();
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    fn next_bucket(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.succ_opt(),
            Granularity::Month => start.checked_add_months(Months::new(1)),
        }
    }

    /// strftime pattern used to label a bucket.
    pub fn label_format(self) -> &'static str {
        match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
        }
    }
}

/// Orders and revenue for one time bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBucket {
    pub start: NaiveDate,
    /// Distinct order ids purchased in the bucket.
    pub orders: usize,
    /// Sum of payment values in the bucket.
    pub revenue: f64,
}

/// Resample the view by purchase timestamp.
///
/// Buckets run contiguously from the first to the last populated one, so a
/// quiet day or month shows up as a zero bucket rather than a gap.
pub fn orders_over_time(view: &FilteredView<'_>, granularity: Granularity) -> Vec<OrderBucket> {
    let mut grouped: BTreeMap<NaiveDate, (HashSet<&str>, f64)> = BTreeMap::new();
    for rec in view.iter() {
        let (orders, revenue) = grouped
            .entry(granularity.bucket_start(rec.purchased_at))
            .or_default();
        orders.insert(rec.order_id.as_str());
        *revenue += rec.payment_value.unwrap_or(0.0);
    }

    let (Some(&first), Some(&last)) = (grouped.keys().next(), grouped.keys().next_back()) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor.filter(|d| *d <= last) {
        let bucket = match grouped.remove(&start) {
            Some((orders, revenue)) => OrderBucket {
                start,
                orders: orders.len(),
                revenue,
            },
            None => OrderBucket {
                start,
                orders: 0,
                revenue: 0.0,
            },
        };
        buckets.push(bucket);
        cursor = granularity.next_bucket(start);
    }
    buckets
}
