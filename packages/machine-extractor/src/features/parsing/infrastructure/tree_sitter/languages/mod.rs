//! Grammar-specific constants

pub mod typescript;
