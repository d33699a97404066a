use nalgebra::Vector3;

use super::bone::{Bone, BoneId, Skeleton};
use crate::marker::{Digit, Side};

const PREFIX: &str = "mixamorig:";

// 成人の平均的な体節長（メートル）
const HIP_HEIGHT: f32 = 0.95;
const SPINE_SEGMENT: f32 = 0.12;
const NECK_LENGTH: f32 = 0.12;
const SHOULDER_WIDTH: f32 = 0.07;
const CLAVICLE_LENGTH: f32 = 0.12;
const UPPER_ARM_LENGTH: f32 = 0.28;
const FOREARM_LENGTH: f32 = 0.26;
const HIP_WIDTH: f32 = 0.09;
const THIGH_LENGTH: f32 = 0.43;
const SHIN_LENGTH: f32 = 0.42;
const FOOT_LENGTH: f32 = 0.14;
const PHALANX_LENGTH: f32 = 0.03;

struct Builder {
    bones: Vec<Bone>,
}

impl Builder {
    fn add(&mut self, name: &str, parent: Option<BoneId>, offset: [f32; 3]) -> BoneId {
        let name = if parent.is_some() {
            format!("{}{}", PREFIX, name)
        } else {
            name.to_string()
        };
        self.bones.push(Bone::new(name, parent, Vector3::new(offset[0], offset[1], offset[2])));
        self.bones.len() - 1
    }
}

/// 組み込みの人型リグ（Mixamo命名、レスト回転はすべて単位回転）
///
/// 各ボーンの +Y が子ボーン方向（基準軸）になるよう、分岐点以外の子は
/// 親空間の +Y 上に置く。Tポーズではなく、レスト時は腕も脚も +Y を向く。
/// ルート原点は足元。
pub fn humanoid() -> Skeleton {
    let mut b = Builder { bones: Vec::new() };

    let root = b.add("Root", None, [0.0, 0.0, 0.0]);
    let hips = b.add("Hips", Some(root), [0.0, HIP_HEIGHT, 0.0]);
    let spine = b.add("Spine", Some(hips), [0.0, 0.10, 0.0]);
    let spine1 = b.add("Spine1", Some(spine), [0.0, SPINE_SEGMENT, 0.0]);
    let spine2 = b.add("Spine2", Some(spine1), [0.0, SPINE_SEGMENT, 0.0]);
    let neck = b.add("Neck", Some(spine2), [0.0, 0.15, 0.0]);
    b.add("Head", Some(neck), [0.0, NECK_LENGTH, 0.0]);

    for side in Side::BOTH {
        // 右は -X（+Z正面基準）
        let sx = match side {
            Side::Right => -1.0,
            Side::Left => 1.0,
        };
        let s = side.as_str();

        let shoulder = b.add(&format!("{s}Shoulder"), Some(spine2), [sx * SHOULDER_WIDTH, 0.10, 0.0]);
        let arm = b.add(&format!("{s}Arm"), Some(shoulder), [0.0, CLAVICLE_LENGTH, 0.0]);
        let forearm = b.add(&format!("{s}ForeArm"), Some(arm), [0.0, UPPER_ARM_LENGTH, 0.0]);
        let hand = b.add(&format!("{s}Hand"), Some(forearm), [0.0, FOREARM_LENGTH, 0.0]);

        for (i, digit) in Digit::ALL.into_iter().enumerate() {
            let spread = sx * (0.03 - 0.015 * i as f32);
            let base_offset = match digit {
                Digit::Thumb => [sx * 0.025, 0.03, 0.025],
                _ => [spread, 0.09, 0.0],
            };
            let d = digit.as_str();
            let mut parent = b.add(&format!("{s}Hand{d}1"), Some(hand), base_offset);
            for joint in 2..=4 {
                parent = b.add(&format!("{s}Hand{d}{joint}"), Some(parent), [0.0, PHALANX_LENGTH, 0.0]);
            }
        }

        let up_leg = b.add(&format!("{s}UpLeg"), Some(hips), [sx * HIP_WIDTH, -0.05, 0.0]);
        let leg = b.add(&format!("{s}Leg"), Some(up_leg), [0.0, THIGH_LENGTH, 0.0]);
        let foot = b.add(&format!("{s}Foot"), Some(leg), [0.0, SHIN_LENGTH, 0.0]);
        b.add(&format!("{s}ToeBase"), Some(foot), [0.0, FOOT_LENGTH, 0.0]);
    }

    Skeleton::from_ordered(b.bones)
}
