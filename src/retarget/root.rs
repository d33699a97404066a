use nalgebra::Vector3;

use crate::marker::taxonomy::{FOOT_MARKERS, HEAD_MARKERS, PELVIS_MARKERS};
use crate::marker::{Frame, MarkerId};
use crate::skeleton::Skeleton;

/// ルート候補位置の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    /// 骨盤マーカーの平均（使用数）
    Pelvis(usize),
    /// 頭部マーカーの平均から下方オフセット（使用数）
    Head(usize),
}

/// 接地補正の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundSource {
    /// 最も低い足部マーカー
    Foot(MarkerId),
    /// 足部マーカー無し: 候補高さ − 脚長
    LegLength,
}

/// ルート候補位置を求める
///
/// 骨盤マーカーがあればその平均、無ければ頭部マーカーの平均から
/// `head_to_pelvis` だけ下げた位置。どちらも無ければ None。
pub fn locate_root(frame: &Frame, head_to_pelvis: f32) -> Option<(Vector3<f32>, RootSource)> {
    if let Some((center, count)) = frame.average(&PELVIS_MARKERS) {
        return Some((center, RootSource::Pelvis(count)));
    }
    let (center, count) = frame.average(&HEAD_MARKERS)?;
    log::trace!("root from {} head markers", count);
    Some((center - Vector3::new(0.0, head_to_pelvis, 0.0), RootSource::Head(count)))
}

/// ルート位置を書き込み、高さを足部マーカーで補正する
///
/// 水平成分は候補のまま。高さは足部マーカーの最小y、無ければ
/// 候補の高さから `leg_length` を引いた値（浮き上がり防止の簡易処理）。
pub fn ground_root(
    skeleton: &mut Skeleton,
    frame: &Frame,
    candidate: &Vector3<f32>,
    leg_length: f32,
) -> GroundSource {
    let (y, source) = match frame.lowest(&FOOT_MARKERS) {
        Some((id, p)) => (p.y, GroundSource::Foot(id)),
        None => (candidate.y - leg_length, GroundSource::LegLength),
    };
    skeleton.set_root_position(Vector3::new(candidate.x, y, candidate.z));
    source
}
