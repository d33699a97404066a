use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::frame::Frame;
use super::id::MarkerId;
use crate::error::Result;

/// サンプリングレートが欠損・不正なときの既定値 (Hz)
pub const DEFAULT_CAPTURE_RATE: f32 = 100.0;

/// 取り込み済みのモーションキャプチャ列（読み込み後は不変）
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    frames: Vec<Frame>,
    capture_rate: f32,
}

/// 前処理済みJSONの形
/// `{"frames": [{"LASI": [x, y, z], "RASI": null, ...}], "original_fps": 100}`
#[derive(Debug, Deserialize)]
struct RawSequence {
    frames: Vec<BTreeMap<String, Option<Vec<Option<f32>>>>>,
    #[serde(default)]
    original_fps: Option<f32>,
}

impl AnimationSequence {
    pub fn new(frames: Vec<Frame>, capture_rate: f32) -> Self {
        let capture_rate = if capture_rate.is_finite() && capture_rate > 0.0 {
            capture_rate
        } else {
            DEFAULT_CAPTURE_RATE
        };
        Self { frames, capture_rate }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawSequence = serde_json::from_str(json)?;
        let mut unknown: HashMap<String, usize> = HashMap::new();

        let frames = raw
            .frames
            .into_iter()
            .map(|entries| {
                let mut frame = Frame::new();
                // 同じマーカーに複数ラベルがある場合: 正規名 > エイリアス、同格ならラベル順で先勝ち
                let mut from_alias = [false; MarkerId::COUNT];
                for (label, coords) in entries {
                    let Some(id) = MarkerId::from_label(&label) else {
                        *unknown.entry(label).or_insert(0) += 1;
                        continue;
                    };
                    let Some(p) = coords.as_deref().and_then(parse_point) else {
                        continue;
                    };
                    let canonical = MarkerId::is_canonical_label(&label);
                    if frame.is_present(id) && !(canonical && from_alias[id.index()]) {
                        log::debug!("label '{}' ignored: {} already set", label, id);
                        continue;
                    }
                    frame.set(id, p);
                    from_alias[id.index()] = !canonical;
                }
                frame
            })
            .collect();

        if !unknown.is_empty() {
            let mut labels: Vec<&String> = unknown.keys().collect();
            labels.sort();
            log::warn!(
                "{} unrecognised marker label(s) dropped: {:?}",
                labels.len(),
                labels
            );
        }

        Ok(Self::new(frames, raw.original_fps.unwrap_or(DEFAULT_CAPTURE_RATE)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn capture_rate(&self) -> f32 {
        self.capture_rate
    }

    /// フレーム index の時刻（秒）
    pub fn time_of(&self, index: usize) -> f32 {
        index as f32 / self.capture_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.time_of(self.frames.len())
    }

    /// マーカーごとの存在フレーム数（定義順）
    pub fn coverage(&self) -> Vec<(MarkerId, usize)> {
        let mut counts = [0usize; MarkerId::COUNT];
        for frame in &self.frames {
            for (id, _) in frame.iter() {
                counts[id.index()] += 1;
            }
        }
        MarkerId::ALL
            .iter()
            .map(|&id| (id, counts[id.index()]))
            .collect()
    }
}

/// ちょうど3成分が揃っている場合のみ座標とみなす
fn parse_point(coords: &[Option<f32>]) -> Option<[f32; 3]> {
    match coords {
        [Some(x), Some(y), Some(z)] if x.is_finite() && y.is_finite() && z.is_finite() => {
            Some([*x, *y, *z])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "frames": [
            {"LASI": [-0.1, 1.0, 0.0], "RASI": [0.1, 1.0, 0.0], "Vicon:C7": [0.0, 1.5, -0.05]},
            {"LASI": null, "RASI": [0.1, 1.0, 0.0], "RANK": [0.1, null, 0.0]},
            {"LFWT": [-0.1, 1.0, 0.0], "*17": [0.0, 0.0, 0.0], "RTOE": []}
        ],
        "original_fps": 120,
        "duration_seconds": 0.025
    }"#;

    #[test]
    fn test_from_json_str() {
        let seq = AnimationSequence::from_json_str(SAMPLE).unwrap();
        assert_eq!(seq.len(), 3);
        assert!((seq.capture_rate() - 120.0).abs() < 1e-6);

        let f0 = seq.frame(0).unwrap();
        assert!(f0.is_present(MarkerId::LASI));
        assert!(f0.is_present(MarkerId::C7));

        let f1 = seq.frame(1).unwrap();
        assert!(!f1.is_present(MarkerId::LASI));
        assert!(!f1.is_present(MarkerId::RANK), "partial coordinates are absent");

        let f2 = seq.frame(2).unwrap();
        assert!(f2.is_present(MarkerId::LASI), "alias resolves to canonical name");
        assert!(!f2.is_present(MarkerId::RTOE));
        assert_eq!(f2.present_count(), 1);
    }

    #[test]
    fn test_missing_rate_falls_back() {
        let seq = AnimationSequence::from_json_str(r#"{"frames": []}"#).unwrap();
        assert!(seq.is_empty());
        assert!((seq.capture_rate() - DEFAULT_CAPTURE_RATE).abs() < 1e-6);

        let seq = AnimationSequence::new(Vec::new(), -5.0);
        assert!((seq.capture_rate() - DEFAULT_CAPTURE_RATE).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(AnimationSequence::from_json_str("{\"frames\": 3}").is_err());
    }

    #[test]
    fn test_timing() {
        let seq = AnimationSequence::new(vec![Frame::new(); 50], 100.0);
        assert!((seq.time_of(10) - 0.1).abs() < 1e-6);
        assert!((seq.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_coverage() {
        let seq = AnimationSequence::from_json_str(SAMPLE).unwrap();
        let coverage: HashMap<MarkerId, usize> = seq.coverage().into_iter().collect();
        assert_eq!(coverage[&MarkerId::LASI], 2);
        assert_eq!(coverage[&MarkerId::RASI], 2);
        assert_eq!(coverage[&MarkerId::C7], 1);
        assert_eq!(coverage[&MarkerId::RANK], 0);
        assert_eq!(coverage.len(), MarkerId::COUNT);
    }

    #[test]
    fn test_canonical_label_beats_alias() {
        let json = r#"{"frames": [
            {"LASI": [0, 0, 0], "LFWT": [1, 1, 1]},
            {"LFWT": [1, 1, 1], "Subject:LASI": [0, 0, 0]},
            {"LFWT": [1, 1, 1], "L_ASIS": [2, 2, 2]},
            {"LASI": null, "LFWT": [1, 1, 1]}
        ]}"#;
        for _ in 0..20 {
            let seq = AnimationSequence::from_json_str(json).unwrap();
            assert_eq!(seq.frame(0).unwrap().get(MarkerId::LASI), Some(Vector3::zeros()));
            assert_eq!(seq.frame(1).unwrap().get(MarkerId::LASI), Some(Vector3::zeros()));
            // 別名同士はラベル順で先勝ち
            assert_eq!(seq.frame(2).unwrap().get(MarkerId::LASI), Some(Vector3::new(1.0, 1.0, 1.0)));
            // 正規名が欠損なら別名の値を使う
            assert_eq!(seq.frame(3).unwrap().get(MarkerId::LASI), Some(Vector3::new(1.0, 1.0, 1.0)));
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let seq = AnimationSequence::load(file.path()).unwrap();
        assert_eq!(seq.len(), 3);
    }
}
