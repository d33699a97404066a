use nalgebra::Vector3;

use super::id::MarkerId;

/// 単一マーカーの観測値: 存在すれば位置、欠損・不正値なら None
pub type MarkerSample = Option<Vector3<f32>>;

/// 1フレーム分のマーカー位置
///
/// 欠損と数値不正 (NaN/Inf) は区別しない。どちらも挿入時点で None になる。
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    samples: [MarkerSample; MarkerId::COUNT],
}

impl Frame {
    pub fn new() -> Self {
        Self {
            samples: [None; MarkerId::COUNT],
        }
    }

    /// (id, 座標) の列から構築
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (MarkerId, [f32; 3])>,
    {
        let mut frame = Self::new();
        for (id, p) in points {
            frame.set(id, p);
        }
        frame
    }

    /// 座標を設定する。非有限値を含む場合は欠損として扱う
    pub fn set(&mut self, id: MarkerId, p: [f32; 3]) {
        let v = Vector3::new(p[0], p[1], p[2]);
        self.samples[id.index()] = if v.iter().all(|c| c.is_finite()) {
            Some(v)
        } else {
            None
        };
    }

    pub fn clear(&mut self, id: MarkerId) {
        self.samples[id.index()] = None;
    }

    pub fn get(&self, id: MarkerId) -> MarkerSample {
        self.samples[id.index()]
    }

    pub fn is_present(&self, id: MarkerId) -> bool {
        self.samples[id.index()].is_some()
    }

    /// 2マーカーが両方存在する場合のみ両方を返す
    pub fn pair(&self, a: MarkerId, b: MarkerId) -> Option<(Vector3<f32>, Vector3<f32>)> {
        Some((self.get(a)?, self.get(b)?))
    }

    /// 2マーカーの中点（両方存在する場合のみ）
    pub fn midpoint(&self, a: MarkerId, b: MarkerId) -> MarkerSample {
        self.pair(a, b).map(|(pa, pb)| (pa + pb) * 0.5)
    }

    /// 集合中の存在するマーカーの平均と個数
    pub fn average(&self, ids: &[MarkerId]) -> Option<(Vector3<f32>, usize)> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for p in ids.iter().filter_map(|&id| self.get(id)) {
            sum += p;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some((sum / count as f32, count))
        }
    }

    /// 集合中で最も低い（y最小）マーカー
    pub fn lowest(&self, ids: &[MarkerId]) -> Option<(MarkerId, Vector3<f32>)> {
        ids.iter()
            .filter_map(|&id| self.get(id).map(|p| (id, p)))
            .fold(None, |best: Option<(MarkerId, Vector3<f32>)>, (id, p)| match best {
                Some((_, b)) if b.y <= p.y => best,
                _ => Some((id, p)),
            })
    }

    /// 存在するマーカーを定義順に列挙
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, Vector3<f32>)> + '_ {
        MarkerId::ALL
            .iter()
            .filter_map(move |&id| self.get(id).map(|p| (id, p)))
    }

    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_empty() {
        let frame = Frame::new();
        assert!(frame.is_empty());
        assert_eq!(frame.get(MarkerId::SACR), None);
    }

    #[test]
    fn test_non_finite_is_absent() {
        let mut frame = Frame::new();
        frame.set(MarkerId::C7, [f32::NAN, 1.0, 0.0]);
        frame.set(MarkerId::T10, [0.0, f32::INFINITY, 0.0]);
        assert!(!frame.is_present(MarkerId::C7));
        assert!(!frame.is_present(MarkerId::T10));
    }

    #[test]
    fn test_invalid_overwrites_previous_value() {
        let mut frame = Frame::from_points([(MarkerId::C7, [0.0, 1.0, 0.0])]);
        frame.set(MarkerId::C7, [f32::NAN, f32::NAN, f32::NAN]);
        assert_eq!(frame.get(MarkerId::C7), None);
    }

    #[test]
    fn test_midpoint_requires_both() {
        let frame = Frame::from_points([
            (MarkerId::C7, [0.0, 1.0, 0.0]),
            (MarkerId::CLAV, [0.0, 1.2, 0.2]),
        ]);
        let mid = frame.midpoint(MarkerId::C7, MarkerId::CLAV).unwrap();
        assert!((mid - Vector3::new(0.0, 1.1, 0.1)).norm() < 1e-6);
        assert_eq!(frame.midpoint(MarkerId::C7, MarkerId::STRN), None);
    }

    #[test]
    fn test_average_counts_only_present() {
        let frame = Frame::from_points([
            (MarkerId::RASI, [1.0, 1.0, 0.0]),
            (MarkerId::LASI, [-1.0, 1.0, 0.0]),
        ]);
        let (avg, n) = frame
            .average(&[MarkerId::RASI, MarkerId::LASI, MarkerId::SACR])
            .unwrap();
        assert_eq!(n, 2);
        assert!((avg - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert_eq!(frame.average(&[MarkerId::SACR]), None);
    }

    #[test]
    fn test_lowest() {
        let frame = Frame::from_points([
            (MarkerId::LHEE, [0.0, 0.05, 0.0]),
            (MarkerId::RTOE, [0.0, 0.02, 0.0]),
            (MarkerId::RANK, [0.0, 0.08, 0.0]),
        ]);
        let (id, p) = frame
            .lowest(&[MarkerId::LHEE, MarkerId::RTOE, MarkerId::RANK, MarkerId::LANK])
            .unwrap();
        assert_eq!(id, MarkerId::RTOE);
        assert!((p.y - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_iter_in_definition_order() {
        let frame = Frame::from_points([
            (MarkerId::HEAD, [0.0, 1.8, 0.0]),
            (MarkerId::C7, [0.0, 1.5, 0.0]),
        ]);
        let ids: Vec<MarkerId> = frame.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![MarkerId::C7, MarkerId::HEAD]);
        assert_eq!(frame.present_count(), 2);
    }
}
