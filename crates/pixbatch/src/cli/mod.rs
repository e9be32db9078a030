//! Command handlers for the pixbatch CLI.

pub mod config;
pub mod inspect;
pub mod resize;
