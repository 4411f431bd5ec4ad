pub mod content_types;
pub mod ooxml;
pub mod parts;
pub mod relationships;

pub use content_types::ContentTypes;
pub use ooxml::{CoreProperties, OoxmlPackage};
pub use relationships::{Relationship, TargetMode};
