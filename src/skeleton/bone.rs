use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};

use super::rig::BoneRole;
use crate::error::{Error, Result};

/// ボーン配列中のインデックス
pub type BoneId = usize;

/// スケルトンの1ノード
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// 親ボーン。ルートのみ None
    pub parent: Option<BoneId>,
    /// 親空間でのローカル位置
    pub position: Vector3<f32>,
    /// 親空間でのローカル回転
    pub rotation: UnitQuaternion<f32>,
    rest_position: Vector3<f32>,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<BoneId>, position: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            parent,
            position,
            rotation: UnitQuaternion::identity(),
            rest_position: position,
        }
    }

    pub fn rest_position(&self) -> Vector3<f32> {
        self.rest_position
    }
}

/// 親インデックスで表した木構造のスケルトン
///
/// - bones[0] がルート（親なし）で、他のルートは存在しない
/// - 親は常に子より前にある（循環は構築時点で排除される）
///
/// 階層そのものは不変。書き換わるのは回転とルート位置のみ。
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    roles: HashMap<BoneRole, BoneId>,
}

impl Skeleton {
    /// ボーン列を検証して構築し、名前から役割を割り当てる
    pub fn new(bones: Vec<Bone>) -> Result<Self> {
        let root = bones.first().ok_or(Error::EmptySkeleton)?;
        if root.parent.is_some() {
            return Err(Error::MissingRoot(root.name.clone()));
        }

        let mut seen: HashMap<&str, BoneId> = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            if seen.insert(bone.name.as_str(), i).is_some() {
                return Err(Error::DuplicateBone(bone.name.clone()));
            }
            if i == 0 {
                continue;
            }
            match bone.parent {
                None => {
                    return Err(Error::MultipleRoots {
                        root: root.name.clone(),
                        bone: bone.name.clone(),
                    })
                }
                Some(p) if p >= i => {
                    let parent = bones
                        .get(p)
                        .map(|b| b.name.clone())
                        .unwrap_or_else(|| format!("#{}", p));
                    return Err(Error::UnknownParent {
                        bone: bone.name.clone(),
                        parent,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self::from_ordered(bones))
    }

    /// 検証済み（親が子より前）のボーン列から構築
    pub(crate) fn from_ordered(bones: Vec<Bone>) -> Self {
        let mut roles = HashMap::new();
        for (i, bone) in bones.iter().enumerate() {
            let Some(role) = BoneRole::from_bone_name(&bone.name) else {
                continue;
            };
            // 同じ役割の名前が複数ある場合は先勝ち
            match roles.entry(role) {
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
                Entry::Occupied(_) => {
                    log::debug!("bone '{}' ignored for role {}: already bound", bone.name, role);
                }
            }
        }
        log::debug!("skeleton built: {} bones, {} roles bound", bones.len(), roles.len());
        Self { bones, roles }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_at(&self, id: BoneId) -> &Bone {
        &self.bones[id]
    }

    pub fn root(&self) -> BoneId {
        0
    }

    /// 役割に割り当てられたボーン
    pub fn bone(&self, role: BoneRole) -> Option<BoneId> {
        self.roles.get(&role).copied()
    }

    /// 役割を明示的に割り当てる（既存の割り当ては置き換え）
    pub fn bind(&mut self, role: BoneRole, id: BoneId) -> Result<()> {
        if id >= self.bones.len() {
            return Err(Error::BoneOutOfRange {
                index: id,
                len: self.bones.len(),
            });
        }
        self.roles.insert(role, id);
        Ok(())
    }

    pub fn unbind(&mut self, role: BoneRole) -> Option<BoneId> {
        self.roles.remove(&role)
    }

    pub fn bound_roles(&self) -> usize {
        self.roles.len()
    }

    pub fn local_rotation(&self, id: BoneId) -> UnitQuaternion<f32> {
        self.bones[id].rotation
    }

    /// ローカル回転を置き換える（累積しない）
    pub fn set_local_rotation(&mut self, id: BoneId, rotation: UnitQuaternion<f32>) {
        // 連続適用による誤差蓄積を避けるため毎回正規化
        self.bones[id].rotation = UnitQuaternion::new_normalize(rotation.into_inner());
    }

    /// ワールド回転 = 親のワールド回転 * ローカル回転
    pub fn world_rotation(&self, id: BoneId) -> UnitQuaternion<f32> {
        let mut rotation = self.bones[id].rotation;
        let mut current = self.bones[id].parent;
        while let Some(p) = current {
            rotation = self.bones[p].rotation * rotation;
            current = self.bones[p].parent;
        }
        rotation
    }

    /// 親のワールド回転（ルートは単位回転）
    pub fn parent_world_rotation(&self, id: BoneId) -> UnitQuaternion<f32> {
        match self.bones[id].parent {
            Some(p) => self.world_rotation(p),
            None => UnitQuaternion::identity(),
        }
    }

    /// ボーン原点のワールド位置
    pub fn world_position(&self, id: BoneId) -> Vector3<f32> {
        let mut position = self.bones[id].position;
        let mut current = self.bones[id].parent;
        while let Some(p) = current {
            let parent = &self.bones[p];
            position = parent.position + parent.rotation * position;
            current = parent.parent;
        }
        position
    }

    pub fn root_position(&self) -> Vector3<f32> {
        self.bones[0].position
    }

    pub fn set_root_position(&mut self, position: Vector3<f32>) {
        self.bones[0].position = position;
    }

    pub fn root_rotation(&self) -> UnitQuaternion<f32> {
        self.bones[0].rotation
    }

    /// 全ボーンを単位回転・レスト位置に戻す
    pub fn reset_to_rest(&mut self) {
        for bone in &mut self.bones {
            bone.rotation = UnitQuaternion::identity();
            bone.position = bone.rest_position();
        }
    }
}
