pub mod align;
pub mod chain;
pub mod engine;
pub mod facing;
pub mod fingers;
pub mod root;

pub use align::{align_segment, look_at, shortest_arc};
pub use engine::{PoseEngine, SolveReport};
pub use facing::FacingSource;
pub use root::{GroundSource, RootSource};
