// Shared low-level utilities

pub mod math;
