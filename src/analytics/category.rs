use std::collections::BTreeMap;

use crate::data::filter::FilteredView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub quantity: u64,
}

/// Quantity ordered per product category.
///
/// Rows without a category are skipped; a missing quantity counts as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySummary {
    totals: Vec<CategoryTotal>,
}

impl CategorySummary {
    /// Totals in category name order. Callers rank with [`Self::best`] and
    /// [`Self::worst`].
    pub fn totals(&self) -> &[CategoryTotal] {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The `n` categories with the highest quantity, highest first.
    pub fn best(&self, n: usize) -> Vec<&CategoryTotal> {
        let mut ranked: Vec<&CategoryTotal> = self.totals.iter().collect();
        ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        ranked.truncate(n);
        ranked
    }

    /// The `n` categories with the lowest quantity, lowest first.
    pub fn worst(&self, n: usize) -> Vec<&CategoryTotal> {
        let mut ranked: Vec<&CategoryTotal> = self.totals.iter().collect();
        ranked.sort_by_key(|t| t.quantity);
        ranked.truncate(n);
        ranked
    }
}

pub fn category_summary(view: &FilteredView<'_>) -> CategorySummary {
    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in view.iter() {
        if let Some(category) = rec.product_category.as_deref() {
            *grouped.entry(category).or_insert(0) += u64::from(rec.qty_order.unwrap_or(0));
        }
    }
    CategorySummary {
        totals: grouped
            .into_iter()
            .map(|(category, quantity)| CategoryTotal {
                category: category.to_string(),
                quantity,
            })
            .collect(),
    }
}
