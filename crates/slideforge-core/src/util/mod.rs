pub mod strings;

pub use strings::{make_valid_xml, normalize_line_breaks};
