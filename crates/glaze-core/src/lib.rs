pub mod audit;
pub mod catalog;
pub mod config;
pub mod cookies;
pub mod detect;
pub mod error;
pub mod fragments;
pub mod io;
pub mod manifest;
pub mod normalize;
pub mod patch;
pub mod paths;
pub mod probe;
pub mod report;
pub mod scan;
pub mod scrub;
pub mod verifier;
pub mod walker;

pub use error::{GlazeError, Result};
