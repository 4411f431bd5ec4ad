mod document;
pub mod notes;
pub mod shapes;
pub mod text;

pub use document::{LayoutRef, PmlDocument, SlideRef};
pub use shapes::{Emu, Geometry, PlaceholderInfo, PlaceholderRole, ShapeKind};
