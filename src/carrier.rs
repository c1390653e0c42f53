//! Carrier ("side-car") types smuggling GenBank-only data through the graph model.
//!
//! `GbkExtras` rides along on a `Component` (see `Component::extras`) rather than as a separate
//! top-level object, since it only ever makes sense attached to exactly one Component. The
//! Reference and StructuredComment side-cars are genuinely independent top-levels, associated to
//! their owning Component only by a `component` display-id back-pointer (invariant 5), so they
//! live in the `Document` alongside Components and Sequences.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::feature::SequenceFeature;
use crate::identified::Identified;
use crate::location::Location;
use crate::toplevel::TopLevel;

/// Every GenBank annotation field the base SGM data model has no native slot for.
///
/// `source` preserves the empty-string sentinel verbatim on import (invariant: re-emitted as the
/// GBK default `.` on export, never as an empty string) rather than using `None`, since GenBank
/// distinguishes "no source given" (absent field) from "source explicitly blank."
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GbkExtras {
    pub genbank_record_id: Option<String>,
    pub sequence_version: Option<u32>,
    pub date: Option<String>,
    pub division: Option<String>,
    pub locus: Option<String>,
    pub molecule_type: Option<String>,
    pub organism: Option<String>,
    pub source: Option<String>,
    pub topology: Option<String>,
    pub gi: Option<String>,
    pub comment: Option<String>,
    /// `"::"`-joined, per invariant 6.
    pub dbxrefs: Option<String>,
    /// Comma-joined, per invariant 7.
    pub taxonomy: Option<String>,
    /// Comma-joined, per invariant 7.
    pub keywords: Option<String>,
    pub accessions: Vec<String>,
    /// Features whose locations carry fuzz that the base `features` list cannot express.
    pub fuzzy_features: Vec<SequenceFeature>,
}

/// A single bibliographic reference, associated with its owning Component by display-id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSideCar {
    pub identity: Url,
    pub display_id: Option<String>,
    pub authors: Option<String>,
    pub comment: Option<String>,
    pub journal: Option<String>,
    pub consortium: Option<String>,
    pub title: Option<String>,
    pub medline_id: Option<String>,
    pub pubmed_id: Option<String>,
    pub locations: Vec<Location>,
    /// Display id of the owning Component, matched at export time (invariant 5).
    pub component: String,
}

impl ReferenceSideCar {
    pub fn new(identity: Url, component: impl Into<String>) -> Self {
        ReferenceSideCar {
            identity,
            display_id: None,
            authors: None,
            comment: None,
            journal: None,
            consortium: None,
            title: None,
            medline_id: None,
            pubmed_id: None,
            locations: Vec::new(),
            component: component.into(),
        }
    }
}

impl Identified for ReferenceSideCar {
    fn display_id(&self) -> Option<&str> {
        self.display_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }
}

impl TopLevel for ReferenceSideCar {
    fn identity(&self) -> &Url {
        &self.identity
    }

    fn has_namespace(&self) -> Url {
        let mut ns = self.identity.clone();
        ns.set_fragment(None);
        ns
    }
}

/// One NCBI "structured comment" block, associated with its owning Component by display-id.
///
/// `structured_keys`/`structured_values` are parallel lists, each entry prefixed `"N::"`
/// (1-based) to preserve key/value pair order (invariant 2); `heading` names the block, e.g.
/// `"Assembly-Data"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCommentSideCar {
    pub identity: Url,
    pub display_id: Option<String>,
    pub heading: String,
    pub component: String,
    pub structured_keys: Vec<String>,
    pub structured_values: Vec<String>,
}

impl StructuredCommentSideCar {
    pub fn new(identity: Url, heading: impl Into<String>, component: impl Into<String>) -> Self {
        StructuredCommentSideCar {
            identity,
            display_id: None,
            heading: heading.into(),
            component: component.into(),
            structured_keys: Vec::new(),
            structured_values: Vec::new(),
        }
    }
}

impl Identified for StructuredCommentSideCar {
    fn display_id(&self) -> Option<&str> {
        self.display_id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }
}

impl TopLevel for StructuredCommentSideCar {
    fn identity(&self) -> &Url {
        &self.identity
    }

    fn has_namespace(&self) -> Url {
        let mut ns = self.identity.clone();
        ns.set_fragment(None);
        ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_side_car_tracks_owning_component_by_display_id() {
        let identity = Url::parse("https://test.sbol3.genbank/pUC19/Reference_0").unwrap();
        let reference = ReferenceSideCar::new(identity, "pUC19");
        assert_eq!(reference.component, "pUC19");
        assert!(reference.locations.is_empty());
    }

    #[test]
    fn structured_comment_keys_and_values_start_parallel_and_empty() {
        let identity = Url::parse("https://test.sbol3.genbank/pUC19/StructuredComment_1").unwrap();
        let comment = StructuredCommentSideCar::new(identity, "Assembly-Data", "pUC19");
        assert_eq!(comment.structured_keys.len(), comment.structured_values.len());
    }
}
