pub mod api;
pub mod forms;
pub mod handlers;
pub mod helpers;
pub mod middleware;
pub mod security;
pub mod state;
pub mod templates;

pub use state::AppState;
