pub use admin::*;
pub use article::*;
pub use category::*;
pub use publication::*;
pub use request::*;
pub use snapshot::*;

mod admin;
mod article;
mod category;
mod publication;
mod request;
mod snapshot;
