pub mod composite;
pub mod domain;
pub mod error;
pub mod math;
pub mod mesh;
pub mod profile;
pub mod revolution;
pub mod sweep;

pub use error::{Result, SolidusError};
