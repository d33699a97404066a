//! 体幹・頭・四肢のボーンを順に合わせる
//!
//! 各ボーンは独立に判定し、必要なマーカーが欠けたボーンだけ前フレームの
//! 回転を保つ。親の回転を先に確定させるため、呼び出し順は
//! 背骨 → 頭 → 腕 → 脚。

use nalgebra::{Unit, Vector3};

use super::align::{align_segment, look_at};
use crate::marker::taxonomy::{self, HEAD_QUAD, SACRUM, SPINE_TOP};
use crate::marker::{first_available, Frame, Side};
use crate::skeleton::{BoneId, BoneRole, Skeleton};

/// 役割に対応するボーンを start→end に合わせ、書き込めば `written` に積む
///
/// 点が欠けている、ボーンが無い、長さゼロのいずれかならスキップ。
pub(crate) fn align_role(
    skeleton: &mut Skeleton,
    role: BoneRole,
    axis: &Unit<Vector3<f32>>,
    start: Option<Vector3<f32>>,
    end: Option<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) -> bool {
    let Some(bone) = skeleton.bone(role) else {
        log::trace!("{}: no bone bound", role);
        return false;
    };
    let (Some(start), Some(end)) = (start, end) else {
        log::trace!("{}: markers missing", role);
        return false;
    };
    if align_segment(skeleton, bone, axis, &start, &end) {
        written.push(bone);
        true
    } else {
        false
    }
}

/// 背骨3本を同じ区間に合わせる
///
/// 始点は SACR、無ければ `fallback_start`（ルート候補）、それも無ければ
/// 現在のルート位置。終点は背骨上端のフォールバック表。
pub fn solve_spine(
    skeleton: &mut Skeleton,
    frame: &Frame,
    axis: &Unit<Vector3<f32>>,
    fallback_start: Option<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) {
    let Some(end) = first_available(frame, SPINE_TOP) else {
        log::debug!("spine: no top marker");
        return;
    };
    let start = first_available(frame, SACRUM)
        .or(fallback_start)
        .unwrap_or_else(|| skeleton.world_position(skeleton.root()));

    for role in BoneRole::SPINE {
        align_role(skeleton, role, axis, Some(start), Some(end), written);
    }
}

/// 頭を後頭中点→前頭中点の方向へ向ける（4マーカー必須）
pub fn solve_head(skeleton: &mut Skeleton, frame: &Frame, written: &mut Vec<BoneId>) {
    let Some(head) = skeleton.bone(BoneRole::Head) else {
        return;
    };
    let [rf, lf, rb, lb] = HEAD_QUAD;
    let (Some(front), Some(back)) = (frame.midpoint(rf, lf), frame.midpoint(rb, lb)) else {
        log::debug!("head: needs all four head markers");
        return;
    };
    let Some(look) = (front - back).try_normalize(1e-6) else {
        return;
    };
    let target = skeleton.world_position(head) + look;
    if look_at(skeleton, head, &target) {
        written.push(head);
    }
}

/// 上腕 → 前腕 → 手
pub fn solve_arm(
    skeleton: &mut Skeleton,
    frame: &Frame,
    side: Side,
    axis: &Unit<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) {
    let markers = taxonomy::arm(side);
    let shoulder = frame.get(markers.shoulder);
    let elbow = frame.get(markers.elbow);
    let forearm_end = first_available(frame, markers.forearm_end);
    let wrist = first_available(frame, markers.wrist);
    let hand_end = first_available(frame, markers.hand_end);

    align_role(skeleton, BoneRole::Arm(side), axis, shoulder, elbow, written);
    align_role(skeleton, BoneRole::ForeArm(side), axis, elbow, forearm_end, written);
    align_role(skeleton, BoneRole::Hand(side), axis, wrist, hand_end, written);
}

/// 大腿 → 下腿 → 足 → つま先
///
/// 股関節マーカーは無いため、大腿の始点はボーン自身の現在のワールド位置。
pub fn solve_leg(
    skeleton: &mut Skeleton,
    frame: &Frame,
    side: Side,
    axis: &Unit<Vector3<f32>>,
    ankle_height: f32,
    written: &mut Vec<BoneId>,
) {
    let markers = taxonomy::leg(side);
    let knee = frame.get(markers.knee);
    let ankle = frame.get(markers.ankle);
    let toe = first_available(frame, markers.toe);
    let hip = skeleton.bone(BoneRole::UpLeg(side)).map(|b| skeleton.world_position(b));

    align_role(skeleton, BoneRole::UpLeg(side), axis, hip, knee, written);
    align_role(skeleton, BoneRole::Leg(side), axis, knee, ankle, written);
    let raised_ankle = ankle.map(|a| a + Vector3::new(0.0, ankle_height, 0.0));
    align_role(skeleton, BoneRole::Foot(side), axis, raised_ankle, toe, written);
    align_role(skeleton, BoneRole::ToeBase(side), axis, frame.get(markers.heel), toe, written);
}
