//! ボーン姿勢を決める2つの基本操作
//!
//! - [`align_segment`]: 始点→終点の方向に基準軸を合わせる（ローカル回転を置換）
//! - [`look_at`]: ボーン原点からワールド目標点へ +Z を向ける（頭部・ルート用）
//!
//! 2つは意図的に別操作として残している。look_at を align_segment で
//! 置き換えると頭の追従挙動が変わる。

use std::f32::consts::PI;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::skeleton::{BoneId, Skeleton};

/// これ未満の長さの方向ベクトルは無効
const MIN_DIRECTION: f32 = 1e-6;

/// `from` を `to` に写す最短回転
///
/// 正反対の場合は回転軸が定まらないため、`from` に直交する軸まわりの
/// 半回転を返す。結果は常に単位クォータニオン。
pub fn shortest_arc(from: &Unit<Vector3<f32>>, to: &Unit<Vector3<f32>>) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between_axis(from, to).unwrap_or_else(|| {
        let v = from.into_inner();
        let ortho = if v.x.abs() > v.z.abs() {
            Vector3::new(-v.y, v.x, 0.0)
        } else {
            Vector3::new(0.0, -v.z, v.y)
        };
        UnitQuaternion::from_axis_angle(&Unit::new_normalize(ortho), PI)
    })
}

/// ボーンの基準軸を start→end 方向に合わせる
///
/// 方向を親のワールド回転の逆で親空間に移し、基準軸からの最短回転を
/// ローカル回転として**置き換える**。start == end なら何もしない。
/// 回転を書き込んだ場合 true。
pub fn align_segment(
    skeleton: &mut Skeleton,
    bone: BoneId,
    axis: &Unit<Vector3<f32>>,
    start: &Vector3<f32>,
    end: &Vector3<f32>,
) -> bool {
    let Some(direction) = Unit::try_new(end - start, MIN_DIRECTION) else {
        log::trace!("align '{}': zero-length segment, keeping rotation", skeleton.bone_at(bone).name);
        return false;
    };
    let parent = skeleton.parent_world_rotation(bone);
    let local = parent.inverse_transform_unit_vector(&direction);
    skeleton.set_local_rotation(bone, shortest_arc(axis, &local));
    true
}

/// ボーンの +Z をワールド目標点に向ける（上方向はワールド +Y）
///
/// 目標がボーン原点と一致する場合、または真上・真下の場合は何もしない。
/// 回転を書き込んだ場合 true。
pub fn look_at(skeleton: &mut Skeleton, bone: BoneId, target: &Vector3<f32>) -> bool {
    let origin = skeleton.world_position(bone);
    let Some(forward) = Unit::try_new(target - origin, MIN_DIRECTION) else {
        return false;
    };
    let up = Vector3::y();
    if forward.cross(&up).norm_squared() < MIN_DIRECTION * MIN_DIRECTION {
        log::trace!("look_at '{}': target is straight up/down", skeleton.bone_at(bone).name);
        return false;
    }
    let world = UnitQuaternion::face_towards(&forward.into_inner(), &up);
    let parent = skeleton.parent_world_rotation(bone);
    skeleton.set_local_rotation(bone, parent.inverse() * world);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Bone;
    use std::f32::consts::FRAC_PI_2;

    fn two_bones() -> Skeleton {
        Skeleton::new(vec![
            Bone::new("Root", None, Vector3::zeros()),
            Bone::new("Child", Some(0), Vector3::new(0.0, 1.0, 0.0)),
        ])
        .unwrap()
    }

    fn assert_unit(q: &UnitQuaternion<f32>) {
        let n = q.into_inner().norm();
        assert!((n - 1.0).abs() < 1e-5, "not unit: {}", n);
        assert!(q.coords.iter().all(|c| c.is_finite()), "NaN in {:?}", q);
    }

    #[test]
    fn test_align_identity_when_already_aligned() {
        let mut skel = two_bones();
        let wrote = align_segment(
            &mut skel,
            1,
            &Vector3::y_axis(),
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
        );
        assert!(wrote);
        assert!(skel.local_rotation(1).angle() < 1e-6);
    }

    #[test]
    fn test_align_zero_length_keeps_rotation() {
        let mut skel = two_bones();
        let prior = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.7);
        skel.set_local_rotation(1, prior);
        let p = Vector3::new(0.3, 0.4, 0.5);
        assert!(!align_segment(&mut skel, 1, &Vector3::y_axis(), &p, &p));
        assert!(skel.local_rotation(1).angle_to(&prior) < 1e-6);
        assert_unit(&skel.local_rotation(1));
    }

    #[test]
    fn test_align_points_axis_at_target() {
        let mut skel = two_bones();
        let start = Vector3::new(0.0, 1.0, 0.0);
        let end = Vector3::new(1.0, 1.0, 1.0);
        align_segment(&mut skel, 1, &Vector3::y_axis(), &start, &end);
        let dir = skel.world_rotation(1) * Vector3::y();
        assert!((dir - (end - start).normalize()).norm() < 1e-5);
    }

    #[test]
    fn test_align_expressed_in_parent_space() {
        let mut skel = two_bones();
        // 親を Z軸まわりに90度 (+Y → -X)
        skel.set_local_rotation(0, UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2));
        let start = Vector3::zeros();
        let end = Vector3::new(0.0, 0.0, 1.0);
        align_segment(&mut skel, 1, &Vector3::y_axis(), &start, &end);

        let world_dir = skel.world_rotation(1) * Vector3::y();
        assert!((world_dir - Vector3::z()).norm() < 1e-5);
        // ローカル回転は親の回転を含まない
        let local_dir = skel.local_rotation(1) * Vector3::y();
        assert!((local_dir - Vector3::z()).norm() < 1e-5);
    }

    #[test]
    fn test_align_replaces_previous_rotation() {
        let mut skel = two_bones();
        skel.set_local_rotation(1, UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1.2));
        align_segment(&mut skel, 1, &Vector3::y_axis(), &Vector3::zeros(), &Vector3::y());
        assert!(skel.local_rotation(1).angle() < 1e-6);
    }

    #[test]
    fn test_align_antiparallel_is_finite_half_turn() {
        let mut skel = two_bones();
        align_segment(&mut skel, 1, &Vector3::y_axis(), &Vector3::zeros(), &Vector3::new(0.0, -2.0, 0.0));
        let q = skel.local_rotation(1);
        assert_unit(&q);
        assert!((q.angle() - PI).abs() < 1e-4);
        assert!((q * Vector3::y() - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_shortest_arc_antiparallel_any_axis() {
        for v in [Vector3::x_axis(), Vector3::y_axis(), Vector3::z_axis()] {
            let neg = Unit::new_unchecked(-v.into_inner());
            let q = shortest_arc(&v, &neg);
            assert_unit(&q);
            assert!((q * v.into_inner() + v.into_inner()).norm() < 1e-5);
        }
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut skel = two_bones();
        let target = skel.world_position(1) + Vector3::new(1.0, 0.0, 0.0);
        assert!(look_at(&mut skel, 1, &target));
        let forward = skel.world_rotation(1) * Vector3::z();
        assert!((forward - Vector3::x()).norm() < 1e-5);
        let up = skel.world_rotation(1) * Vector3::y();
        assert!((up - Vector3::y()).norm() < 1e-5);
    }

    #[test]
    fn test_look_at_compensates_parent() {
        let mut skel = two_bones();
        skel.set_local_rotation(0, UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.9));
        let target = skel.world_position(1) + Vector3::new(0.0, 0.0, -1.0);
        assert!(look_at(&mut skel, 1, &target));
        let forward = skel.world_rotation(1) * Vector3::z();
        assert!((forward - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_look_at_degenerate_keeps_rotation() {
        let mut skel = two_bones();
        let prior = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        skel.set_local_rotation(1, prior);
        let origin = skel.world_position(1);
        assert!(!look_at(&mut skel, 1, &origin));
        assert!(!look_at(&mut skel, 1, &(origin + Vector3::new(0.0, 1.0, 0.0))));
        assert!(skel.local_rotation(1).angle_to(&prior) < 1e-6);
    }
}
