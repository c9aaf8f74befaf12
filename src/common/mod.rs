pub use errors::*;

mod errors;
#[macro_use]
mod macros;
