pub mod config;
pub mod error;
pub mod marker;
pub mod retarget;
pub mod skeleton;

pub use error::{Error, Result};
pub use marker::{AnimationSequence, Frame, MarkerId};
pub use retarget::{PoseEngine, SolveReport};
pub use skeleton::{BoneRole, Skeleton};
