use serde::Serialize;

use threatlens_proto::inference::Detection;

use crate::histogram::{class_histogram, ClassHistogram};

/// Aggregate figures for one batch. `per_class` is an empty mapping (not
/// absent) on an empty batch; `average_confidence` is `None` rather than NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total: usize,
    pub average_confidence: Option<f32>,
    pub per_class: ClassHistogram,
}

pub fn aggregate_stats(dets: &[Detection]) -> AggregateStats {
    aggregate_stats_with(dets, class_histogram(dets).unwrap_or_default())
}

// Lets `summarize` reuse a class histogram it already built instead of
// walking the batch a second time.
pub(crate) fn aggregate_stats_with(dets: &[Detection], per_class: ClassHistogram) -> AggregateStats {
    let total = dets.len();
    let average_confidence = if total == 0 {
        None
    } else {
        let sum: f64 = dets.iter().map(|d| d.confidence as f64).sum();
        Some((sum / total as f64) as f32)
    };
    AggregateStats {
        total,
        average_confidence,
        per_class,
    }
}
