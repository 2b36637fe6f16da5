#![forbid(unsafe_code)]

mod error;
mod extract;
mod router;

pub use error::*;
pub use extract::*;
pub use router::*;
