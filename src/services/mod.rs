pub use articles::*;
pub use auth::*;
pub use autosave::*;
pub use scheduler::*;
pub use throttle::*;
pub use visibility::*;

pub mod lifecycle;

mod articles;
mod auth;
mod autosave;
mod scheduler;
mod throttle;
mod visibility;
