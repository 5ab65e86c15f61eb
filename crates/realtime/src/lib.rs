//! # Realtime Core
//!
//! Core modules shared by the realtime services: errors, replies and the
//! provider interfaces hosts implement.

mod error;
mod provider;
mod reply;

pub use crate::error::*;
pub use crate::provider::*;
pub use crate::reply::*;
