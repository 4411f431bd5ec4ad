pub mod arena;
pub mod builder;
pub mod namespaces;
pub mod node;
pub mod parser;
pub mod xname;

pub use arena::XmlDocument;
pub use node::{XmlFragment, XmlNodeData};
pub use xname::{XAttribute, XName};
pub use namespaces::{A, CP, CT, DC, DCTERMS, EP, MC, P, P14, PR, R, XSI};
