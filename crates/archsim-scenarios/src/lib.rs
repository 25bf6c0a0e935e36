#![warn(missing_docs)]
#![doc = include_str!("../readme.md")]

pub mod comparison;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod workload;
