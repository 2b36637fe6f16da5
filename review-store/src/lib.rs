#![forbid(unsafe_code)]

mod engine;
mod error;
mod rating;
mod review;
mod store;

pub use engine::*;
pub use error::*;
pub use rating::*;
pub use review::*;
pub use store::*;
