extern crate url;

pub mod carrier;
pub mod component;
pub mod document;
pub mod driver;
pub mod error;
pub mod export;
pub mod feature;
pub mod gbk;
pub mod identified;
pub mod import;
pub mod legacy;
pub mod location;
pub mod ontologies;
pub mod ontology;
pub mod sequence;
pub mod toplevel;

pub use component::Component;
pub use document::{Collection, Document, TopLevelObject};
pub use driver::Driver;
pub use error::{ConversionError, Result};
pub use feature::*;
pub use identified::Identified;
pub use location::{Fuzz, Location, Orientation};
pub use ontology::OntologyBridge;
pub use sequence::Sequence;
pub use toplevel::TopLevel;
