pub mod app;
pub mod motion;
pub mod scheduler;
pub mod theme;
pub mod view;

use crate::config::CellLabel;
use dial::DialEngine;

pub use motion::Motion;
pub use scheduler::GlibScheduler;

pub type Engine = DialEngine<CellLabel, GlibScheduler>;

pub const WINDOW_SIZE: i32 = 480;
pub const SPIN_STEP: f64 = 0.3; // fling from arrow keys
pub const ORBIT_LINE_WIDTH: f64 = 2.0;
pub const MARKER_SIZE: f64 = 8.0; // top reference triangle
