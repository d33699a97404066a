use nalgebra::{Unit, Vector3};

use super::chain::align_role;
use crate::marker::taxonomy::{finger_chain, palm};
use crate::marker::{Digit, Frame, Side};
use crate::skeleton::{BoneId, BoneRole, Skeleton};

/// 手のひらマーカーがあれば上腕・前腕を手のひらへ向け直す
///
/// 腕チェーンで肘から求めた回転も上書きする（前腕データ欠落時に
/// レスト姿勢が残らないようにするため）。上腕を先に合わせ、前腕は
/// 更新後の自身のワールド位置から合わせる。
pub fn override_arm_to_palm(
    skeleton: &mut Skeleton,
    frame: &Frame,
    side: Side,
    axis: &Unit<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) -> bool {
    let Some(target) = frame.get(palm(side)) else {
        return false;
    };
    let (Some(arm), Some(forearm)) = (
        skeleton.bone(BoneRole::Arm(side)),
        skeleton.bone(BoneRole::ForeArm(side)),
    ) else {
        return false;
    };

    let arm_start = skeleton.world_position(arm);
    align_role(skeleton, BoneRole::Arm(side), axis, Some(arm_start), Some(target), written);
    let forearm_start = skeleton.world_position(forearm);
    align_role(skeleton, BoneRole::ForeArm(side), axis, Some(forearm_start), Some(target), written);
    log::trace!("{} arm re-aimed at palm", side.as_str());
    true
}

/// 1本の指: 4マーカーで3節を合わせる。書き込んだ節の数を返す
pub fn solve_digit(
    skeleton: &mut Skeleton,
    frame: &Frame,
    side: Side,
    digit: Digit,
    axis: &Unit<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) -> usize {
    let markers = finger_chain(side, digit);
    let mut updated = 0;
    for (joint, pair) in (1u8..).zip(markers.windows(2)) {
        let role = BoneRole::Finger(side, digit, joint);
        if align_role(skeleton, role, axis, frame.get(pair[0]), frame.get(pair[1]), written) {
            updated += 1;
        }
    }
    updated
}

/// 片手ぶん: 腕の上書き → 5本の指
pub fn solve_hand(
    skeleton: &mut Skeleton,
    frame: &Frame,
    side: Side,
    axis: &Unit<Vector3<f32>>,
    written: &mut Vec<BoneId>,
) {
    override_arm_to_palm(skeleton, frame, side, axis, written);
    for digit in Digit::ALL {
        solve_digit(skeleton, frame, side, digit, axis, written);
    }
}
