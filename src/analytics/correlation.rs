use crate::data::filter::FilteredView;

/// One item plotted on the price vs freight chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub freight: f64,
    pub review_score: Option<f64>,
}

/// Items with both a price and a freight value.
pub fn price_freight_points(view: &FilteredView<'_>) -> Vec<PricePoint> {
    view.iter()
        .filter_map(|rec| {
            Some(PricePoint {
                price: rec.price?,
                freight: rec.freight_value?,
                review_score: rec.review_score,
            })
        })
        .collect()
}

/// Lowest and highest review score among the points, for the colour scale.
pub fn review_score_span(points: &[PricePoint]) -> Option<(f64, f64)> {
    points
        .iter()
        .filter_map(|p| p.review_score)
        .fold(None, |span, score| match span {
            None => Some((score, score)),
            Some((lo, hi)) => Some((f64::min(lo, score), f64::max(hi, score))),
        })
}
