//! 領域別マーカー集合と、部位ごとのフォールバック優先順位表
//!
//! 優先順位はすべてここにデータとして置く。ロジック側は先頭から順に
//! 評価して最初に得られた値を使うだけ。

use nalgebra::Vector3;

use super::frame::Frame;
use super::id::MarkerId::{self, *};

/// 左右
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Right, Side::Left];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Right => "Right",
            Side::Left => "Left",
        }
    }
}

/// 指
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digit {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Digit {
    pub const ALL: [Digit; 5] = [
        Digit::Thumb,
        Digit::Index,
        Digit::Middle,
        Digit::Ring,
        Digit::Pinky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Digit::Thumb => "Thumb",
            Digit::Index => "Index",
            Digit::Middle => "Middle",
            Digit::Ring => "Ring",
            Digit::Pinky => "Pinky",
        }
    }
}

/// アライメント目標点の候補
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 単一マーカー
    Marker(MarkerId),
    /// 2マーカーの中点（両方必要）
    Midpoint(MarkerId, MarkerId),
}

impl Target {
    pub fn resolve(&self, frame: &Frame) -> Option<Vector3<f32>> {
        match *self {
            Target::Marker(id) => frame.get(id),
            Target::Midpoint(a, b) => frame.midpoint(a, b),
        }
    }
}

/// 候補列を先頭から評価し、最初に得られた点を返す
pub fn first_available(frame: &Frame, ladder: &[Target]) -> Option<Vector3<f32>> {
    ladder.iter().find_map(|t| t.resolve(frame))
}

// --- 領域集合 ---

/// ルート位置の一次ソース
pub const PELVIS_MARKERS: [MarkerId; 5] = [SACR, RASI, LASI, RPSI, LPSI];

/// ルート位置の二次ソース
pub const HEAD_MARKERS: [MarkerId; 5] = [RFHD, LFHD, RBHD, LBHD, HEAD];

/// 接地補正に使う足部マーカー
pub const FOOT_MARKERS: [MarkerId; 8] = [LHEE, LTOE, LMT5, RHEE, RTOE, RMT5, LANK, RANK];

/// 向き推定に使う (左, 右) ペア。優先順
pub const FACING_PAIRS: [(MarkerId, MarkerId); 3] = [(LASI, RASI), (LSHO, RSHO), (LFHD, RFHD)];

// --- フォールバック表 ---

pub const SACRUM: &[Target] = &[Target::Marker(SACR)];

/// 背骨上端: C7/CLAV中点 → C7 → CLAV → 両肩中点
pub const SPINE_TOP: &[Target] = &[
    Target::Midpoint(C7, CLAV),
    Target::Marker(C7),
    Target::Marker(CLAV),
    Target::Midpoint(RSHO, LSHO),
];

pub const RIGHT_WRIST: &[Target] = &[
    Target::Midpoint(RWRA, RWRB),
    Target::Marker(RWRA),
    Target::Marker(RWRB),
    Target::Marker(RWRT),
];

// 左手首は単独マーカーの優先順が右と異なる（WRT優先）
pub const LEFT_WRIST: &[Target] = &[
    Target::Midpoint(LWRA, LWRB),
    Target::Marker(LWRT),
    Target::Marker(LWRA),
    Target::Marker(LWRB),
];

pub const RIGHT_FOREARM_END: &[Target] = &[
    Target::Marker(RFRM),
    Target::Midpoint(RWRA, RWRB),
    Target::Marker(RWRA),
    Target::Marker(RWRB),
    Target::Marker(RWRT),
];

pub const LEFT_FOREARM_END: &[Target] = &[
    Target::Marker(LFRM),
    Target::Midpoint(LWRA, LWRB),
    Target::Marker(LWRT),
    Target::Marker(LWRA),
    Target::Marker(LWRB),
];

pub const RIGHT_HAND_END: &[Target] = &[Target::Marker(RPLM), Target::Marker(RFIN)];
pub const LEFT_HAND_END: &[Target] = &[Target::Marker(LPLM), Target::Marker(LFIN)];

pub const RIGHT_TOE: &[Target] = &[Target::Marker(RTOE), Target::Marker(RMT5)];
pub const LEFT_TOE: &[Target] = &[Target::Marker(LTOE), Target::Marker(LMT5)];

/// 頭部4マーカー (右前, 左前, 右後, 左後)
pub const HEAD_QUAD: [MarkerId; 4] = [RFHD, LFHD, RBHD, LBHD];

/// 片腕ぶんのマーカー表
#[derive(Debug, Clone, Copy)]
pub struct ArmMarkers {
    pub shoulder: MarkerId,
    pub elbow: MarkerId,
    pub forearm_end: &'static [Target],
    pub wrist: &'static [Target],
    pub hand_end: &'static [Target],
}

pub fn arm(side: Side) -> ArmMarkers {
    match side {
        Side::Right => ArmMarkers {
            shoulder: RSHO,
            elbow: RELB,
            forearm_end: RIGHT_FOREARM_END,
            wrist: RIGHT_WRIST,
            hand_end: RIGHT_HAND_END,
        },
        Side::Left => ArmMarkers {
            shoulder: LSHO,
            elbow: LELB,
            forearm_end: LEFT_FOREARM_END,
            wrist: LEFT_WRIST,
            hand_end: LEFT_HAND_END,
        },
    }
}

/// 片脚ぶんのマーカー表
#[derive(Debug, Clone, Copy)]
pub struct LegMarkers {
    pub knee: MarkerId,
    pub ankle: MarkerId,
    pub heel: MarkerId,
    pub toe: &'static [Target],
}

pub fn leg(side: Side) -> LegMarkers {
    match side {
        Side::Right => LegMarkers {
            knee: RKNE,
            ankle: RANK,
            heel: RHEE,
            toe: RIGHT_TOE,
        },
        Side::Left => LegMarkers {
            knee: LKNE,
            ankle: LANK,
            heel: LHEE,
            toe: LEFT_TOE,
        },
    }
}

/// 腕上書きに使う手のひらマーカー
pub fn palm(side: Side) -> MarkerId {
    match side {
        Side::Right => RPLM,
        Side::Left => LPLM,
    }
}

/// 指ごとの4マーカー（根元 → 指先）
///
/// 遠位節 (?IDI 等) はチェーンに含めない。3本のボーンに対し4点で足りる。
pub fn finger_chain(side: Side, digit: Digit) -> [MarkerId; 4] {
    match (side, digit) {
        (Side::Right, Digit::Thumb) => [RTMC, RTPX, RTDI, RTTP],
        (Side::Right, Digit::Index) => [RIMC, RFIN, RIIM, RITP],
        (Side::Right, Digit::Middle) => [RMMC, RMPX, RMIM, RMTP],
        (Side::Right, Digit::Ring) => [RRMC, RRPX, RRIM, RRTP],
        (Side::Right, Digit::Pinky) => [RLMC, RLPX, RLIM, RLTP],
        (Side::Left, Digit::Thumb) => [LTMC, LTPX, LTDI, LTTP],
        (Side::Left, Digit::Index) => [LIMC, LFIN, LIIM, LITP],
        (Side::Left, Digit::Middle) => [LMMC, LMPX, LMIM, LMTP],
        (Side::Left, Digit::Ring) => [LRMC, LRPX, LRIM, LRTP],
        (Side::Left, Digit::Pinky) => [LLMC, LLPX, LLIM, LLTP],
    }
}
