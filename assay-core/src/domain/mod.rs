pub mod compliance;
pub mod entity;
pub mod error;
pub mod project;
pub mod quality;
pub mod record;

pub use error::DomainError;
