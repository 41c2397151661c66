//! Common utility functions

pub mod duration;
