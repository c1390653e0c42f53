use serde::{Deserialize, Serialize};
use url::Url;

use crate::identified::Identified;
use crate::ontologies::{Encoding, Ontology};
use crate::toplevel::TopLevel;

/// Represents the primary structure of a `Component` and the manner in which it is encoded.
///
/// Representation is accomplished by means of the `elements` property and `encoding` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub identity: Url,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,

    /// String of characters representing the constituents of a biological molecule, e.g.
    /// nucleotide bases. Stored lowercase on import; re-uppercased on GenBank export.
    pub elements: String,

    /// URI identifying from the textual-format branch of the EDAM ontology, e.g. IUPAC DNA.
    pub encoding: Url,
}

impl Sequence {
    pub fn new(identity: Url, elements: impl Into<String>, encoding: Encoding) -> Self {
        let display_id = identity.fragment().map(str::to_string).or_else(|| {
            identity
                .path_segments()
                .and_then(|mut segs| segs.next_back())
                .map(str::to_string)
        });
        Sequence {
            identity,
            display_id,
            name: None,
            description: None,
            elements: elements.into(),
            encoding: encoding.uri(),
        }
    }
}

impl Identified for Sequence {
    fn display_id(&self) -> Option<&str> {
        self.display_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TopLevel for Sequence {
    fn identity(&self) -> &Url {
        &self.identity
    }

    fn has_namespace(&self) -> Url {
        let mut ns = self.identity.clone();
        ns.set_fragment(None);
        ns
    }
}
