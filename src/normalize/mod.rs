//! Normalization of raw statement payloads into view models

pub mod builder;
pub mod ranking;
pub mod raw;

pub use builder::*;
pub use ranking::*;
pub use raw::*;
