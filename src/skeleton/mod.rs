pub mod bone;
pub mod def;
pub mod humanoid;
pub mod rig;

pub use bone::{Bone, BoneId, Skeleton};
pub use def::{BoneDef, SkeletonDef};
pub use humanoid::humanoid;
pub use rig::BoneRole;
