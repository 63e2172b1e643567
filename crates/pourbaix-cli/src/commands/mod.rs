pub mod analyze;
pub mod data;
pub mod screen;
