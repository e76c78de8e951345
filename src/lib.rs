pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod git;
pub mod release;
pub mod ui;
pub mod warnings;

pub use error::{ReleaseError, Result};
