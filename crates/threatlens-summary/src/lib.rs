pub mod histogram;
pub mod series;
pub mod state;
pub mod stats;

use serde::Serialize;
use tracing::debug;

use threatlens_proto::inference::Detection;

pub use histogram::{class_histogram, confidence_histogram, ClassHistogram, ConfidenceHistogram};
pub use series::{frame_series, FramePoint, FrameSeries, DEFAULT_SERIES_CAP};
pub use stats::{aggregate_stats, AggregateStats};

/// One chart-ready dataset: category labels plus their numeric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Everything a rendering surface needs for one inference response: the raw
/// histograms and series plus their chart-ready projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionSummary {
    pub stats: AggregateStats,
    pub confidence: Option<ConfidenceHistogram>,
    pub classes: Option<ClassHistogram>,
    pub series: FrameSeries,
    pub confidence_chart: Option<ChartData>,
    pub class_chart: Option<ChartData>,
    pub series_chart: Option<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

/// Builds the full summary in one pass over the batch. The frame series is
/// only produced when at least one detection carries a frame index; image
/// batches get an empty series and no series chart.
pub fn summarize(dets: &[Detection], cap: usize) -> DetectionSummary {
    let confidence = histogram::confidence_histogram(dets);
    let classes = histogram::class_histogram(dets);
    let series = if dets.iter().any(|d| d.frame.is_some()) {
        series::frame_series(dets, cap)
    } else {
        Vec::new()
    };
    debug!(
        "summarize: {} detections, {} series points",
        dets.len(),
        series.len()
    );
    DetectionSummary {
        stats: stats::aggregate_stats_with(dets, classes.clone().unwrap_or_default()),
        confidence_chart: confidence.as_ref().map(ConfidenceHistogram::to_chart),
        class_chart: classes.as_ref().map(ClassHistogram::to_chart),
        series_chart: if series.is_empty() {
            None
        } else {
            Some(series::series_chart(&series))
        },
        confidence,
        classes,
        series,
        processing_time: None,
    }
}
