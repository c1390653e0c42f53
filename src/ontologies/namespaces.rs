//! Namespace prefixes for the ontologies used by the SGM graph.
//!
//! These are deliberately plain string constants rather than `Url` values: callers append a
//! bare term (e.g. `"0000316"`) and parse the result, since `Url::parse` is fallible and these
//! namespaces are always used as prefixes.

/// Systems Biology Ontology (component physical-entity types).
pub const SBO_NS: &str = "https://identifiers.org/SBO:";

/// Sequence Ontology (feature roles, topology, orientation).
pub const SO_NS: &str = "https://identifiers.org/SO:";

/// Chemical Entities of Biological Interest.
pub const CHEBI_NS: &str = "https://identifiers.org/CHEBI:";

/// Gene Ontology.
pub const GO_NS: &str = "https://identifiers.org/GO:";

/// EDAM format ontology (sequence encodings).
pub const EDAM_NS: &str = "https://identifiers.org/edam:";

/// SGM's own namespace, used for orientation terms that have no SO equivalent.
pub const SGM_NS: &str = "https://sbols.org/v3#";

/// GenBank carrier extension namespace (stable wire contract, see spec §6).
pub const GENBANK_NS: &str = "http://www.ncbi.nlm.nih.gov/genbank";

/// Default namespace for anonymous conversions.
pub const DEFAULT_NAMESPACE: &str = "https://test.sbol3.genbank/";
