#![forbid(unsafe_code)]

mod auth;
mod body;
mod config;
mod error;
mod input;
mod reviews;

pub use auth::*;
pub use body::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use reviews::*;

pub use review_store as store;
pub use review_store::{ProductRating, Rating, Review};
