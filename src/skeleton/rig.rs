use std::fmt;

use crate::marker::{Digit, Side};

/// エンジンが回転を書き込むボーンの意味的な役割
///
/// スケルトン側に対応するボーンが無い役割は、そのサブチェーンごと
/// 黙ってスキップされる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRole {
    Hips,
    Spine,
    Spine1,
    Spine2,
    Neck,
    Head,
    /// 上腕
    Arm(Side),
    /// 前腕
    ForeArm(Side),
    Hand(Side),
    /// 大腿
    UpLeg(Side),
    /// 下腿
    Leg(Side),
    Foot(Side),
    ToeBase(Side),
    /// 指節。joint は根元から 1..=4
    Finger(Side, Digit, u8),
}

impl BoneRole {
    /// 背骨（同じアライメントを共有する3本）
    pub const SPINE: [BoneRole; 3] = [BoneRole::Spine, BoneRole::Spine1, BoneRole::Spine2];

    /// Mixamo系のボーン名から役割を推定する
    ///
    /// "mixamorig:RightArm", "mixamorig1RightArm", "RightHandIndex2" のいずれも受け付ける。
    pub fn from_bone_name(name: &str) -> Option<Self> {
        let name = name.rsplit(':').next().unwrap_or(name);
        let name = match name.strip_prefix("mixamorig") {
            Some(rest) => rest.trim_start_matches(|c: char| c.is_ascii_digit()),
            None => name,
        };

        match name {
            "Hips" => return Some(BoneRole::Hips),
            "Spine" => return Some(BoneRole::Spine),
            "Spine1" => return Some(BoneRole::Spine1),
            "Spine2" => return Some(BoneRole::Spine2),
            "Neck" => return Some(BoneRole::Neck),
            "Head" => return Some(BoneRole::Head),
            _ => {}
        }

        let (side, rest) = if let Some(rest) = name.strip_prefix("Right") {
            (Side::Right, rest)
        } else if let Some(rest) = name.strip_prefix("Left") {
            (Side::Left, rest)
        } else {
            return None;
        };

        match rest {
            "Arm" => Some(BoneRole::Arm(side)),
            "ForeArm" => Some(BoneRole::ForeArm(side)),
            "Hand" => Some(BoneRole::Hand(side)),
            "UpLeg" => Some(BoneRole::UpLeg(side)),
            "Leg" => Some(BoneRole::Leg(side)),
            "Foot" => Some(BoneRole::Foot(side)),
            "ToeBase" => Some(BoneRole::ToeBase(side)),
            _ => {
                let finger = rest.strip_prefix("Hand")?;
                let digit = Digit::ALL
                    .into_iter()
                    .find(|d| finger.starts_with(d.as_str()))?;
                let joint: u8 = finger[digit.as_str().len()..].parse().ok()?;
                (1..=4)
                    .contains(&joint)
                    .then_some(BoneRole::Finger(side, digit, joint))
            }
        }
    }

    /// 正規のボーン名（接頭辞なし）
    pub fn name(&self) -> String {
        match self {
            BoneRole::Hips => "Hips".to_string(),
            BoneRole::Spine => "Spine".to_string(),
            BoneRole::Spine1 => "Spine1".to_string(),
            BoneRole::Spine2 => "Spine2".to_string(),
            BoneRole::Neck => "Neck".to_string(),
            BoneRole::Head => "Head".to_string(),
            BoneRole::Arm(s) => format!("{}Arm", s.as_str()),
            BoneRole::ForeArm(s) => format!("{}ForeArm", s.as_str()),
            BoneRole::Hand(s) => format!("{}Hand", s.as_str()),
            BoneRole::UpLeg(s) => format!("{}UpLeg", s.as_str()),
            BoneRole::Leg(s) => format!("{}Leg", s.as_str()),
            BoneRole::Foot(s) => format!("{}Foot", s.as_str()),
            BoneRole::ToeBase(s) => format!("{}ToeBase", s.as_str()),
            BoneRole::Finger(s, d, j) => format!("{}Hand{}{}", s.as_str(), d.as_str(), j),
        }
    }
}

impl fmt::Display for BoneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
