//! Document domain module

mod classify;
mod entity;
mod repository;
mod size;

pub use classify::*;
pub use entity::*;
pub use repository::*;
pub use size::{format_size, to_mib};
