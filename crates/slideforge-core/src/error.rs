use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideforgeError {
    #[error("Invalid OOXML package: {message}")]
    InvalidPackage { message: String },

    #[error("Missing required part '{part_path}' in {document_type} document")]
    MissingPart { part_path: String, document_type: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid relationship: {message}")]
    InvalidRelationship { message: String },

    #[error("Invalid content plan: {message}")]
    InvalidPlan { message: String },

    #[error("Content plan contains no slides")]
    EmptyPlan,

    #[error("Template contains no slides to clone from")]
    EmptyTemplate,

    #[error("Cloning template slide {slide_index} failed: {message}")]
    CloneFailed { slide_index: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SlideforgeError {
    pub(crate) fn invalid_package(message: impl Into<String>) -> Self {
        Self::InvalidPackage {
            message: message.into(),
        }
    }

    pub(crate) fn missing_part(part_path: &str) -> Self {
        Self::MissingPart {
            part_path: part_path.to_string(),
            document_type: "PowerPoint".to_string(),
        }
    }

    /// Whether the error aborts a synthesis request outright.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CloneFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, SlideforgeError>;
