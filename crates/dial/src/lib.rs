pub mod angle;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod scheduler;

pub use engine::{Cell, CellPlacement, DialEngine, Layout};
pub use error::DialError;
pub use geometry::{Point, Size};
pub use physics::{Physics, Transition};
pub use scheduler::{ManualScheduler, ManualTimer, Scheduler, Timer};
