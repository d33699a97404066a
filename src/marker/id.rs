use std::fmt;

/// マーカーが属する解剖学的領域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Torso,
    Pelvis,
    RightArm,
    LeftArm,
    RightHand,
    LeftHand,
    RightLeg,
    LeftLeg,
    Head,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Torso,
        Region::Pelvis,
        Region::RightArm,
        Region::LeftArm,
        Region::RightHand,
        Region::LeftHand,
        Region::RightLeg,
        Region::LeftLeg,
        Region::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Torso => "torso",
            Region::Pelvis => "pelvis",
            Region::RightArm => "right_arm",
            Region::LeftArm => "left_arm",
            Region::RightHand => "right_hand",
            Region::LeftHand => "left_hand",
            Region::RightLeg => "right_leg",
            Region::LeftLeg => "left_leg",
            Region::Head => "head",
        }
    }
}

/// 列挙子・正規名・領域を一括定義する
macro_rules! marker_ids {
    ($( $region:ident => [ $( $id:ident ),* $(,)? ] ),* $(,)?) => {
        /// 正規化済みマーカー名（閉じた語彙）
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        #[allow(clippy::upper_case_acronyms)]
        pub enum MarkerId {
            $( $( $id, )* )*
        }

        impl MarkerId {
            /// 全マーカー（定義順 = インデックス順）
            pub const ALL: &'static [MarkerId] = &[ $( $( MarkerId::$id, )* )* ];
            pub const COUNT: usize = Self::ALL.len();

            /// 正規名 (e.g. "LASI")
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $( MarkerId::$id => stringify!($id), )* )*
                }
            }

            pub fn region(&self) -> Region {
                match self {
                    $( $( MarkerId::$id => Region::$region, )* )*
                }
            }
        }
    };
}

marker_ids! {
    Torso => [C7, T10, CLAV, STRN, SACR],
    Pelvis => [RPSI, RASI, LPSI, LASI],
    RightArm => [RSHO, RUPA, RELB, RFRM, RWRB, RWRA, RWRT],
    LeftArm => [LSHO, LUPA, LELB, LFRM, LWRB, LWRA, LWRT],
    RightHand => [
        RTMC, RTPX, RTDI, RTTP,
        RIMC, RFIN, RIIM, RIDI, RITP,
        RMMC, RMPX, RMIM, RMDI, RMTP,
        RRMC, RRPX, RRIM, RRDI, RRTP,
        RLMC, RLPX, RLIM, RLDI, RLTP,
        RPLM,
    ],
    LeftHand => [
        LTMC, LTPX, LTDI, LTTP,
        LIMC, LFIN, LIIM, LIDI, LITP,
        LMMC, LMPX, LMIM, LMDI, LMTP,
        LRMC, LRPX, LRIM, LRDI, LRTP,
        LLMC, LLPX, LLIM, LLDI, LLTP,
        LPLM,
    ],
    RightLeg => [RTHI, RKNE, RSHN, RANK, RHEE, RTOE, RMT5],
    LeftLeg => [LTHI, LKNE, LSHN, LANK, LHEE, LTOE, LMT5],
    Head => [RBHD, LBHD, LFHD, RFHD, HEAD],
}

/// メーカー固有ラベル → 正規名
const ALIASES: &[(&str, MarkerId)] = &[
    ("C7_SPINE", MarkerId::C7),
    ("T10_SPINE", MarkerId::T10),
    ("CLAVICLE", MarkerId::CLAV),
    ("STERNUM", MarkerId::STRN),
    ("SACRAL", MarkerId::SACR),
    ("VSAC", MarkerId::SACR),
    ("LFWT", MarkerId::LASI),
    ("LAntInfIliacSpine", MarkerId::LASI),
    ("L_ASIS", MarkerId::LASI),
    ("RFWT", MarkerId::RASI),
    ("RAntInfIliacSpine", MarkerId::RASI),
    ("R_ASIS", MarkerId::RASI),
    ("LBWT", MarkerId::LPSI),
    ("LPostInfIliacSpine", MarkerId::LPSI),
    ("RBWT", MarkerId::RPSI),
    ("RPostInfIliacSpine", MarkerId::RPSI),
    ("L_SHOULDER", MarkerId::LSHO),
    ("L_UPPER_ARM", MarkerId::LUPA),
    ("L_ELBOW", MarkerId::LELB),
    ("L_FOREARM", MarkerId::LFRM),
    ("L_WRIST", MarkerId::LWRT),
    ("LWRIST", MarkerId::LWRT),
    ("LWRI", MarkerId::LWRT),
    ("R_SHOULDER", MarkerId::RSHO),
    ("R_UPPER_ARM", MarkerId::RUPA),
    ("R_ELBOW", MarkerId::RELB),
    ("R_FOREARM", MarkerId::RFRM),
    ("R_WRIST", MarkerId::RWRT),
    ("RWRIST", MarkerId::RWRT),
    ("RWRI", MarkerId::RWRT),
    ("L_THIGH", MarkerId::LTHI),
    ("L_KNEE", MarkerId::LKNE),
    ("L_SHIN", MarkerId::LSHN),
    ("LTIB", MarkerId::LSHN),
    ("L_ANKLE", MarkerId::LANK),
    ("L_HEEL", MarkerId::LHEE),
    ("L_TOE", MarkerId::LTOE),
    ("L_FOOT", MarkerId::LMT5),
    ("R_THIGH", MarkerId::RTHI),
    ("R_KNEE", MarkerId::RKNE),
    ("R_SHIN", MarkerId::RSHN),
    ("RTIB", MarkerId::RSHN),
    ("R_ANKLE", MarkerId::RANK),
    ("R_HEEL", MarkerId::RHEE),
    ("R_TOE", MarkerId::RTOE),
    ("R_FOOT", MarkerId::RMT5),
    ("R_BACK_HEAD", MarkerId::RBHD),
    ("L_BACK_HEAD", MarkerId::LBHD),
    ("L_FRONT_HEAD", MarkerId::LFHD),
    ("R_FRONT_HEAD", MarkerId::RFHD),
    ("RTHUMB_METACARPAL", MarkerId::RTMC),
    ("RTHUMB_PROXIMAL", MarkerId::RTPX),
    ("RTHUMB_DISTAL", MarkerId::RTDI),
    ("RTHUMB_TIP", MarkerId::RTTP),
    ("RINDEX_METACARPAL", MarkerId::RIMC),
    ("RINDEX_PROXIMAL", MarkerId::RFIN),
    ("RINDEX_INTERMEDIATE", MarkerId::RIIM),
    ("RINDEX_DISTAL", MarkerId::RIDI),
    ("RINDEX_TIP", MarkerId::RITP),
    ("RMIDDLE_METACARPAL", MarkerId::RMMC),
    ("RMIDDLE_PROXIMAL", MarkerId::RMPX),
    ("RMIDDLE_INTERMEDIATE", MarkerId::RMIM),
    ("RMIDDLE_DISTAL", MarkerId::RMDI),
    ("RMIDDLE_TIP", MarkerId::RMTP),
    ("RRING_METACARPAL", MarkerId::RRMC),
    ("RRING_PROXIMAL", MarkerId::RRPX),
    ("RRING_INTERMEDIATE", MarkerId::RRIM),
    ("RRING_DISTAL", MarkerId::RRDI),
    ("RRING_TIP", MarkerId::RRTP),
    ("RLITTLE_METACARPAL", MarkerId::RLMC),
    ("RLITTLE_PROXIMAL", MarkerId::RLPX),
    ("RLITTLE_INTERMEDIATE", MarkerId::RLIM),
    ("RLITTLE_DISTAL", MarkerId::RLDI),
    ("RLITTLE_TIP", MarkerId::RLTP),
    ("RPALM", MarkerId::RPLM),
    ("LTHUMB_METACARPAL", MarkerId::LTMC),
    ("LTHUMB_PROXIMAL", MarkerId::LTPX),
    ("LTHUMB_DISTAL", MarkerId::LTDI),
    ("LTHUMB_TIP", MarkerId::LTTP),
    ("LINDEX_METACARPAL", MarkerId::LIMC),
    ("LINDEX_PROXIMAL", MarkerId::LFIN),
    // 一部の収録ソフトが出力する綴り
    ("LINDEX_PLOXIMAL", MarkerId::LFIN),
    ("LINDEX_INTERMEDIATE", MarkerId::LIIM),
    ("LINDEX_DISTAL", MarkerId::LIDI),
    ("LINDEX_TIP", MarkerId::LITP),
    ("LMIDDLE_METACARPAL", MarkerId::LMMC),
    ("LMIDDLE_PROXIMAL", MarkerId::LMPX),
    ("LMIDDLE_INTERMEDIATE", MarkerId::LMIM),
    ("LMIDDLE_DISTAL", MarkerId::LMDI),
    ("LMIDDLE_TIP", MarkerId::LMTP),
    ("LRING_METACARPAL", MarkerId::LRMC),
    ("LRING_PROXIMAL", MarkerId::LRPX),
    ("LRING_INTERMEDIATE", MarkerId::LRIM),
    ("LRING_DISTAL", MarkerId::LRDI),
    ("LRING_TIP", MarkerId::LRTP),
    ("LLITTLE_METACARPAL", MarkerId::LLMC),
    ("LLITTLE_PROXIMAL", MarkerId::LLPX),
    ("LLITTLE_INTERMEDIATE", MarkerId::LLIM),
    ("LLITTLE_DISTAL", MarkerId::LLDI),
    ("LLITTLE_TIP", MarkerId::LLTP),
    ("LPALM", MarkerId::LPLM),
];

fn strip_subject(label: &str) -> &str {
    label.rsplit(':').next().unwrap_or(label).trim()
}

impl MarkerId {
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 正規名そのものに一致するか
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == name)
    }

    /// C3Dラベルを正規化して解決する
    ///
    /// - "Vicon:LASI" のようなサブジェクト接頭辞は最後の ':' まで除去
    /// - 正規名を優先し、次にエイリアス表を引く
    pub fn from_label(label: &str) -> Option<Self> {
        let name = strip_subject(label);
        if name.is_empty() {
            return None;
        }
        Self::from_canonical(name).or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|&(_, id)| id)
        })
    }

    /// ラベルがエイリアスではなく正規名そのものか（接頭辞は無視）
    pub fn is_canonical_label(label: &str) -> bool {
        Self::from_canonical(strip_subject(label)).is_some()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
