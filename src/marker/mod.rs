pub mod frame;
pub mod id;
pub mod sequence;
pub mod taxonomy;

pub use frame::{Frame, MarkerSample};
pub use id::{MarkerId, Region};
pub use sequence::AnimationSequence;
pub use taxonomy::{first_available, Digit, Side, Target};
