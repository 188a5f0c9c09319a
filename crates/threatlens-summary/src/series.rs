use std::collections::HashMap;

use serde::Serialize;

use threatlens_proto::inference::Detection;

use crate::ChartData;

/// Default cap on emitted chart points for the per-frame confidence series.
pub const DEFAULT_SERIES_CAP: usize = 50;

/// Mean confidence of one sampled frame group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePoint {
    pub label: String,
    pub value: f32,
}

pub type FrameSeries = Vec<FramePoint>;

struct FrameGroup {
    frame: u64,
    sum: f64,
    n: u32,
}

/// Groups the batch by frame index (first-encounter order, assumed ascending
/// as produced by the inference service), averages confidence per group, and
/// subsamples the groups with a fixed stride.
///
/// The stride is floored: when the group count is not an exact multiple of
/// `min(cap, groups)`, the walk emits MORE than `cap` points (120 groups at
/// cap 50 gives stride 2 and 60 points). Downstream chart output depends on
/// the exact emitted indices, so the overshoot is kept as-is.
///
/// A detection without a frame index is grouped under frame 0.
pub fn frame_series(dets: &[Detection], cap: usize) -> FrameSeries {
    let mut groups: Vec<FrameGroup> = Vec::new();
    let mut by_frame: HashMap<u64, usize> = HashMap::new();

    for d in dets {
        let frame = d.frame.unwrap_or(0);
        let i = *by_frame.entry(frame).or_insert_with(|| {
            groups.push(FrameGroup {
                frame,
                sum: 0.0,
                n: 0,
            });
            groups.len() - 1
        });
        groups[i].sum += d.confidence as f64;
        groups[i].n += 1;
    }

    let total = groups.len();
    if total == 0 {
        return Vec::new();
    }

    let sample_size = cap.min(total).max(1);
    let step = (total / sample_size).max(1);

    let mut out = Vec::with_capacity(total / step + 1);
    let mut i = 0;
    while i < total {
        let g = &groups[i];
        out.push(FramePoint {
            label: format!("Frame {}", g.frame),
            value: (g.sum / g.n as f64) as f32,
        });
        i += step;
    }
    out
}

/// Chart projection of a sampled series.
pub fn series_chart(series: &FrameSeries) -> ChartData {
    ChartData {
        label: "Confidence Score".into(),
        labels: series.iter().map(|p| p.label.clone()).collect(),
        values: series.iter().map(|p| p.value as f64).collect(),
    }
}
