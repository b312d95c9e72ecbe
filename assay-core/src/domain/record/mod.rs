// assay-core/src/domain/record/mod.rs

pub mod raw;
pub mod staged;
pub mod value;

pub use raw::{RawRecord, undeclared_columns};
pub use staged::{CleanRecord, RejectRecord, StandardizedRecord, ViolationKind};
pub use value::{RawValue, Value};
