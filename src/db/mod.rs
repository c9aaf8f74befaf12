pub use admins::*;
pub use articles::*;
pub use categories::*;
pub use db::*;
pub use store::*;

mod admins;
mod articles;
mod categories;
mod db;
mod store;
