pub mod config;
pub mod error;
pub mod interfaces;
pub mod lifecycle;
pub mod snapshot;

pub use error::{PetriError, PetriResult};
