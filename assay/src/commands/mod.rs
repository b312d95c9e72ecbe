// assay/src/commands/mod.rs

pub mod clean;
pub mod inspect;
pub mod report;
pub mod run;
