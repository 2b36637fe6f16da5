#![forbid(unsafe_code)]

mod batch;
mod client;
mod config;
mod error;

pub use batch::*;
pub use client::*;
pub use config::*;
pub use error::*;
