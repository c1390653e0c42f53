use serde::{Deserialize, Serialize};
use url::Url;

use crate::carrier::GbkExtras;
use crate::error::{ConversionError, Result};
use crate::feature::Feature;
use crate::identified::Identified;
use crate::toplevel::TopLevel;

/// Represents the structural and/or functional entities of a biological design.
///
/// The primary usage is to represent entities with designed sequences, such as DNA, RNA, and
/// proteins, but it can also be used to represent any other entity that is part of a design.
///
/// ## `type` and `role`
///
/// `types` describes the category of biochemical or physical entity (DNA/RNA/Protein, plus
/// linear/circular topology for nucleic acids, invariant 3). `roles` identifies terms consistent
/// with `types`: for DNA/RNA this is ordinarily a single Sequence Ontology term such as
/// `engineered_region`, a specific feature role, or `plasmid` (the term the legacy conversion's
/// plasmid pre-pass looks for).
///
/// `extras` carries every GenBank annotation field this crate's graph model otherwise has no
/// native slot for (see `GbkExtras`) — the "side-car over subclassing" strategy from the design
/// notes, expressed in Rust as `Component { core fields, extras: Option<GbkExtras> }` rather than
/// a runtime subclass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub identity: Url,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,

    pub types: Vec<Url>,
    pub roles: Vec<Url>,

    /// At most one entry; more than one is a hard [`crate::error::ConversionError::Structural`]
    /// (invariant 1).
    pub sequences: Vec<Url>,

    pub features: Vec<Feature>,

    pub extras: Option<GbkExtras>,
}

impl Component {
    pub fn new(identity: Url) -> Self {
        let display_id = identity
            .path_segments()
            .and_then(|mut segs| segs.next_back())
            .map(str::to_string);
        Component {
            identity,
            display_id,
            name: None,
            description: None,
            types: Vec::new(),
            roles: Vec::new(),
            sequences: Vec::new(),
            features: Vec::new(),
            extras: None,
        }
    }

    /// Returns the component's single sequence reference, or a hard error if it has more than
    /// one (invariant 1).
    pub fn single_sequence(&self) -> Result<Option<&Url>> {
        match self.sequences.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only)),
            _ => Err(ConversionError::Structural(format!(
                "Component `{}` has more than one Sequence ({})",
                self.display_id.as_deref().unwrap_or_else(|| self.identity.as_str()),
                self.sequences.len()
            ))),
        }
    }

    /// Whether this component or one of its owned `SubComponent`s carries the `plasmid` SO role
    /// — the test the legacy conversion's plasmid pre-pass uses (§4.6).
    pub fn has_plasmid_role(&self, plasmid_role: &Url) -> bool {
        self.roles.contains(plasmid_role)
    }
}

impl Identified for Component {
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

impl TopLevel for Component {
    fn identity(&self) -> &Url {
        &self.identity
    }

    fn has_namespace(&self) -> Url {
        let mut ns = self.identity.clone();
        ns.set_fragment(None);
        ns
    }
}
