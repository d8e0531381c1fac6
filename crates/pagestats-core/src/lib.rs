pub mod audit;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod report;
pub mod stats;

pub use config::{Config, Platform};
pub use error::{Error, Result};
