use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use threatlens_proto::inference::Detection;

use crate::ChartData;

/// Bucket labels, low to high; index-aligned with `ConfidenceHistogram::counts`.
pub const CONFIDENCE_BUCKETS: [&str; 5] = ["0-20%", "21-40%", "41-60%", "61-80%", "81-100%"];

/// Five-bucket confidence distribution. Serializes as an ordered
/// label -> count map.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceHistogram {
    pub counts: [u32; 5],
}

impl ConfidenceHistogram {
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn to_chart(&self) -> ChartData {
        ChartData {
            label: "Number of Detections".into(),
            labels: CONFIDENCE_BUCKETS.iter().map(|s| s.to_string()).collect(),
            values: self.counts.iter().map(|&n| n as f64).collect(),
        }
    }
}

impl Serialize for ConfidenceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CONFIDENCE_BUCKETS.len()))?;
        for (label, n) in CONFIDENCE_BUCKETS.iter().zip(self.counts.iter()) {
            map.serialize_entry(label, n)?;
        }
        map.end()
    }
}

// Boundary values land in the lower bucket: 0.40 -> "21-40%".
fn bucket_index(confidence: f32) -> usize {
    let pct = confidence * 100.0;
    if pct <= 20.0 {
        0
    } else if pct <= 40.0 {
        1
    } else if pct <= 60.0 {
        2
    } else if pct <= 80.0 {
        3
    } else {
        4
    }
}

/// `None` on an empty batch; otherwise the bucket counts sum to `dets.len()`.
pub fn confidence_histogram(dets: &[Detection]) -> Option<ConfidenceHistogram> {
    if dets.is_empty() {
        return None;
    }
    let mut counts = [0u32; 5];
    for d in dets {
        counts[bucket_index(d.confidence)] += 1;
    }
    Some(ConfidenceHistogram { counts })
}

/// Class label -> count, first-seen insertion order. Labels are compared
/// by exact string equality. Serializes as an ordered map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassHistogram {
    entries: Vec<(String, u32)>,
}

impl ClassHistogram {
    pub fn increment(&mut self, class: &str) {
        if let Some((_, n)) = self.entries.iter_mut().find(|(c, _)| c == class) {
            *n += 1;
        } else {
            self.entries.push((class.to_string(), 1));
        }
    }

    pub fn get(&self, class: &str) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| c == class)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(c, n)| (c.as_str(), *n))
    }

    pub fn to_chart(&self) -> ChartData {
        ChartData {
            label: "Number of Detections".into(),
            labels: self.entries.iter().map(|(c, _)| c.clone()).collect(),
            values: self.entries.iter().map(|(_, n)| *n as f64).collect(),
        }
    }
}

impl Serialize for ClassHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (class, n) in &self.entries {
            map.serialize_entry(class, n)?;
        }
        map.end()
    }
}

/// `None` on an empty batch; otherwise exact multiplicities per class.
pub fn class_histogram(dets: &[Detection]) -> Option<ClassHistogram> {
    if dets.is_empty() {
        return None;
    }
    let mut hist = ClassHistogram::default();
    for d in dets {
        hist.increment(&d.class);
    }
    Some(hist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class: &str, confidence: f32) -> Detection {
        Detection {
            class: class.into(),
            confidence,
            frame: None,
        }
    }

    #[test]
    fn empty_batch_yields_none() {
        assert_eq!(confidence_histogram(&[]), None);
        assert_eq!(class_histogram(&[]), None);
    }

    #[test]
    fn bucket_counts_sum_to_batch_length() {
        let dets: Vec<Detection> = (0..100)
            .map(|i| det("pistol", i as f32 / 100.0))
            .collect();
        let hist = confidence_histogram(&dets).unwrap();
        assert_eq!(hist.total(), 100);
    }

    #[test]
    fn boundary_values_fall_in_lower_bucket() {
        let hist = confidence_histogram(&[det("pistol", 0.40)]).unwrap();
        assert_eq!(hist.counts, [0, 1, 0, 0, 0]);

        let hist = confidence_histogram(&[det("pistol", 0.4000001)]).unwrap();
        assert_eq!(hist.counts, [0, 0, 1, 0, 0]);

        let hist = confidence_histogram(&[det("pistol", 0.20)]).unwrap();
        assert_eq!(hist.counts, [1, 0, 0, 0, 0]);
    }

    #[test]
    fn every_detection_lands_in_exactly_one_bucket() {
        let dets = [
            det("a", 0.05),
            det("b", 0.35),
            det("c", 0.55),
            det("d", 0.75),
            det("e", 0.99),
        ];
        let hist = confidence_histogram(&dets).unwrap();
        assert_eq!(hist.counts, [1, 1, 1, 1, 1]);
    }

    #[test]
    fn class_counts_keep_first_seen_order() {
        let dets = [det("pistol", 0.9), det("knife", 0.3), det("pistol", 0.95)];
        let hist = class_histogram(&dets).unwrap();
        let order: Vec<&str> = hist.iter().map(|(c, _)| c).collect();
        assert_eq!(order, ["pistol", "knife"]);
        assert_eq!(hist.get("pistol"), 2);
        assert_eq!(hist.get("knife"), 1);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn class_labels_are_case_sensitive() {
        let dets = [det("Pistol", 0.9), det("pistol", 0.8)];
        let hist = class_histogram(&dets).unwrap();
        assert_eq!(hist.len(), 2);
        assert_eq!(hist.get("Pistol"), 1);
        assert_eq!(hist.get("pistol"), 1);
    }

    #[test]
    fn chart_projection_is_index_aligned() {
        let dets = [det("pistol", 0.9), det("knife", 0.3)];
        let chart = class_histogram(&dets).unwrap().to_chart();
        assert_eq!(chart.labels, ["pistol", "knife"]);
        assert_eq!(chart.values, [1.0, 1.0]);
    }
}
