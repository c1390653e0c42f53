use serde::{Deserialize, Serialize};
use url::Url;

use crate::location::{Location, Orientation};

/// Used to compose `Component` objects into a structural or functional hierarchy.
///
/// A `Component`'s owned feature list can hold either kind: `SequenceFeature` for an annotated
/// region of the component's own sequence, or `SubComponent` for an instance of another
/// `Component` nested within this one (used by the plasmid/legacy conversion path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Sequence(SequenceFeature),
    Sub(SubComponent),
}

impl Feature {
    pub fn identity(&self) -> &Url {
        match self {
            Feature::Sequence(f) => &f.identity,
            Feature::Sub(f) => &f.identity,
        }
    }

    /// Roles carried directly on this feature. A `SubComponent` has no roles of its own; its
    /// behavior is governed by the roles of the `Component` it instantiates (`instance_of`).
    pub fn roles(&self) -> &[Url] {
        match self {
            Feature::Sequence(f) => &f.roles,
            Feature::Sub(_) => &[],
        }
    }

    pub fn as_sequence_feature(&self) -> Option<&SequenceFeature> {
        match self {
            Feature::Sequence(f) => Some(f),
            Feature::Sub(_) => None,
        }
    }

    pub fn as_sub_component(&self) -> Option<&SubComponent> {
        match self {
            Feature::Sub(f) => Some(f),
            Feature::Sequence(_) => None,
        }
    }
}

/// A single annotated region of a `Component`'s sequence.
///
/// `qualifiers` merges the base SGM feature with the GenBank-only "Extended Feature" carrier:
/// rather than a separate type for features that came from a GBK qualifier bag, every feature
/// simply carries a (possibly empty) ordered list of qualifier pairs. See `DESIGN.md`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceFeature {
    pub identity: Url,
    pub name: Option<String>,
    pub roles: Vec<Url>,
    pub orientation: Orientation,
    pub locations: Vec<Location>,
    /// GenBank qualifier key/value pairs in original order. Only ever non-empty for features
    /// produced by the importer or destined for GenBank export.
    pub qualifiers: Vec<(String, String)>,
}

impl SequenceFeature {
    pub fn new(identity: Url, orientation: Orientation, locations: Vec<Location>) -> Self {
        SequenceFeature {
            identity,
            name: None,
            roles: Vec::new(),
            orientation,
            locations,
            qualifiers: Vec::new(),
        }
    }

    /// Whether any location on this feature carries non-`Exact` fuzz (see `Location::is_fuzzy`).
    pub fn is_fuzzy(&self) -> bool {
        self.locations.iter().any(Location::is_fuzzy)
    }
}

/// Subclass of `Feature` used to specify structural hierarchy: an instance of another
/// `Component`, optionally positioned by one or more `Location`s within the parent.
///
/// Carries no roles of its own; a lookup that cares about the role of a SubComponent must
/// resolve `instance_of` in the owning `Document` and check the referenced `Component`'s roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubComponent {
    pub identity: Url,
    pub instance_of: Url,
    pub locations: Vec<Location>,
}

impl SubComponent {
    pub fn new(identity: Url, instance_of: Url) -> Self {
        SubComponent {
            identity,
            instance_of,
            locations: Vec::new(),
        }
    }
}
