use nalgebra::{Unit, Vector3};

use super::chain::{solve_arm, solve_head, solve_leg, solve_spine};
use super::facing::{orient_root, FacingSource};
use super::fingers::solve_hand;
use super::root::{ground_root, locate_root, GroundSource, RootSource};
use crate::config::RetargetConfig;
use crate::marker::{Frame, Side};
use crate::skeleton::{BoneId, Skeleton};

/// 1回の solve で何が起きたか（診断用）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveReport {
    /// ルート候補の出どころ。None ならルート位置は据え置き
    pub root: Option<RootSource>,
    pub ground: Option<GroundSource>,
    /// None なら向きは据え置き
    pub facing: Option<FacingSource>,
    /// 回転を書き込んだボーン（書き込み順、上書きされたボーンは重複する）
    pub written: Vec<BoneId>,
}

impl SolveReport {
    /// 一度でも書き込まれたボーンか
    pub fn touched(&self, bone: BoneId) -> bool {
        self.written.contains(&bone)
    }
}

/// マーカーフレームからスケルトン姿勢を再構成する
///
/// 状態は設定のみ。毎回の solve はフレームと現在のスケルトンだけで
/// 決まり、書き込む回転は累積せず置き換える。
pub struct PoseEngine {
    head_to_pelvis: f32,
    leg_length: f32,
    ankle_height: f32,
    min_facing_length_sq: f32,
    rest_axis: Unit<Vector3<f32>>,
}

impl PoseEngine {
    pub fn new() -> Self {
        Self::from_config(&RetargetConfig::default())
    }

    /// 設定から作成
    pub fn from_config(config: &RetargetConfig) -> Self {
        Self {
            head_to_pelvis: config.head_to_pelvis,
            leg_length: config.leg_length,
            ankle_height: config.ankle_height,
            min_facing_length_sq: config.min_facing_length_sq,
            rest_axis: config.rest_axis(),
        }
    }

    /// ボーンの基準軸を変更
    pub fn with_rest_axis(mut self, axis: Unit<Vector3<f32>>) -> Self {
        self.rest_axis = axis;
        self
    }

    /// 1フレームぶんの姿勢を解く
    ///
    /// 順序: ルート位置 → 接地 → 向き → 背骨 → 頭 → 腕 → 脚 → 腕の上書き＋指。
    /// 親の回転は子より先に確定する。
    pub fn solve(&self, frame: &Frame, skeleton: &mut Skeleton) -> SolveReport {
        let mut report = SolveReport::default();
        let axis = &self.rest_axis;

        let candidate = match locate_root(frame, self.head_to_pelvis) {
            Some((candidate, source)) => {
                report.root = Some(source);
                report.ground = Some(ground_root(skeleton, frame, &candidate, self.leg_length));
                Some(candidate)
            }
            None => {
                log::debug!("root: no pelvis or head markers, position kept");
                None
            }
        };
        report.facing = orient_root(skeleton, frame, self.min_facing_length_sq);

        let written = &mut report.written;
        solve_spine(skeleton, frame, axis, candidate, written);
        solve_head(skeleton, frame, written);
        for side in Side::BOTH {
            solve_arm(skeleton, frame, side, axis, written);
        }
        for side in Side::BOTH {
            solve_leg(skeleton, frame, side, axis, self.ankle_height, written);
        }
        for side in Side::BOTH {
            solve_hand(skeleton, frame, side, axis, written);
        }

        log::trace!(
            "solved: root={:?} ground={:?} facing={:?} bones={}",
            report.root,
            report.ground,
            report.facing,
            report.written.len()
        );
        report
    }
}

impl Default for PoseEngine {
    fn default() -> Self {
        Self::new()
    }
}
