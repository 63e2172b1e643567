//! End-to-end procedures built on the engine.

pub mod stability;
