use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;

use super::bone::{Bone, Skeleton};
use crate::error::{Error, Result};

/// 外部ローダーが渡すスケルトン定義
///
/// ```toml
/// [[bones]]
/// name = "Root"
///
/// [[bones]]
/// name = "mixamorig:Hips"
/// parent = "Root"
/// position = [0.0, 0.95, 0.0]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SkeletonDef {
    pub bones: Vec<BoneDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoneDef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// 親空間でのレスト位置
    #[serde(default)]
    pub position: [f32; 3],
}

impl SkeletonDef {
    /// 拡張子で形式を判定して読み込む (.toml / それ以外はJSON)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }
}

impl Skeleton {
    /// 定義から構築。親は子より前に宣言されている必要がある
    pub fn from_def(def: &SkeletonDef) -> Result<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(def.bones.len());
        let mut bones = Vec::with_capacity(def.bones.len());

        for (i, bd) in def.bones.iter().enumerate() {
            let parent = match bd.parent.as_deref() {
                None => None,
                Some(name) => Some(*index.get(name).ok_or_else(|| Error::UnknownParent {
                    bone: bd.name.clone(),
                    parent: name.to_string(),
                })?),
            };
            if index.insert(bd.name.as_str(), i).is_some() {
                return Err(Error::DuplicateBone(bd.name.clone()));
            }
            let [x, y, z] = bd.position;
            bones.push(Bone::new(bd.name.clone(), parent, Vector3::new(x, y, z)));
        }

        Skeleton::new(bones)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_def(&SkeletonDef::load(path)?)
    }
}
