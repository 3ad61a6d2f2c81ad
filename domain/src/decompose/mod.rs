//! Decomposition of model output into atomic work items

pub mod parser;
