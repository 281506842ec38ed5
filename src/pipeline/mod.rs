//! Pipeline module - assembly runs and their outputs

pub mod assemble;
