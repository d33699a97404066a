use nalgebra::{Unit, Vector3};

use super::align::look_at;
use crate::marker::taxonomy::FACING_PAIRS;
use crate::marker::Frame;
use crate::skeleton::Skeleton;

/// 正面方向を決めたマーカー対
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingSource {
    Hips,
    Shoulders,
    Head,
}

const SOURCES: [FacingSource; 3] = [FacingSource::Hips, FacingSource::Shoulders, FacingSource::Head];

/// 左右マーカー対から正面方向を求める
///
/// forward = (左 − 右) × 上。腰 → 肩 → 前頭の順に、両方揃った最初の対を使う。
/// 長さ二乗が `min_length_sq` 未満なら None。
pub fn forward_direction(
    frame: &Frame,
    min_length_sq: f32,
) -> Option<(Unit<Vector3<f32>>, FacingSource)> {
    let (left, right, source) = FACING_PAIRS
        .iter()
        .zip(SOURCES)
        .find_map(|(&(l, r), source)| frame.pair(l, r).map(|(pl, pr)| (pl, pr, source)))?;

    // 頭部は水平成分のみ
    let mut across = left - right;
    if source == FacingSource::Head {
        across.y = 0.0;
    }
    let forward = across.cross(&Vector3::y());
    if forward.norm_squared() < min_length_sq {
        log::trace!("facing from {:?} too short ({:.5})", source, forward.norm_squared());
        return None;
    }
    Some((Unit::new_normalize(forward), source))
}

/// ルートを正面方向へ向ける（yawのみ）
///
/// 目標点はルートの1単位前方、高さはルートと同じに固定する。
pub fn orient_root(skeleton: &mut Skeleton, frame: &Frame, min_length_sq: f32) -> Option<FacingSource> {
    let (forward, source) = forward_direction(frame, min_length_sq)?;
    let root = skeleton.root();
    let origin = skeleton.world_position(root);
    let mut target = origin + forward.into_inner();
    target.y = origin.y;
    look_at(skeleton, root, &target).then_some(source)
}
