#![warn(missing_docs)]
#![doc = include_str!("../readme.md")]

pub mod pool;
pub mod vm;
