use chrono::NaiveDate;

use super::model::{OrderDataset, OrderRecord};
use crate::error::FilterError;

/// Status choice meaning "no status filter".
pub const STATUS_ALL: &str = "ALL";

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Pull both ends inside `bounds`. Ordering is preserved.
    pub fn clamp_to(&self, bounds: DateRange) -> DateRange {
        DateRange {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

/// Order status predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// Interpret a control choice; [`STATUS_ALL`] disables the predicate.
    pub fn from_choice(choice: &str) -> Self {
        if choice == STATUS_ALL {
            StatusFilter::All
        } else {
            StatusFilter::Only(choice.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => STATUS_ALL,
            StatusFilter::Only(status) => status,
        }
    }

    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// The complete set of user selections, passed explicitly to [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub range: DateRange,
    pub status: StatusFilter,
}

impl FilterSelection {
    /// The whole purchase span with no status filter. `None` for an empty
    /// dataset.
    pub fn full(dataset: &OrderDataset) -> Option<Self> {
        full_range(dataset).map(|range| FilterSelection {
            range,
            status: StatusFilter::All,
        })
    }

    pub fn matches(&self, rec: &OrderRecord) -> bool {
        self.range.contains(rec.purchase_date()) && self.status.matches(&rec.order_status)
    }
}

/// Min/max purchase date of the dataset as a range.
pub fn full_range(dataset: &OrderDataset) -> Option<DateRange> {
    dataset
        .purchase_span
        .map(|(start, end)| DateRange { start, end })
}

/// Choices for the status control: [`STATUS_ALL`] followed by every status
/// present in the data, in first-seen order.
pub fn status_options(dataset: &OrderDataset) -> Vec<String> {
    std::iter::once(STATUS_ALL.to_string())
        .chain(dataset.statuses.iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a dataset selected by a [`FilterSelection`], in source order.
/// Borrows the dataset; nothing is copied or mutated.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a OrderDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every row of the dataset.
    pub fn all(dataset: &'a OrderDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from indices previously taken with [`Self::indices`].
    /// Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a OrderDataset, indices: &[usize]) -> Self {
        Self {
            dataset,
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderRecord> + '_ {
        let records: &'a [OrderRecord] = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Return the view of rows passing both the date-range and status predicates.
pub fn apply<'a>(dataset: &'a OrderDataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Filter {}..={} status={} kept {}/{} rows",
        selection.range.start(),
        selection.range.end(),
        selection.status.label(),
        indices.len(),
        dataset.len()
    );

    FilteredView { dataset, indices }
}
