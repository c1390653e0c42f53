//! SGM -> SGM-legacy conversion, and on to GBK via the same exporter the primary path uses.
//!
//! The legacy graph is a strictly simpler class hierarchy (no side-cars, no carrier extensions):
//! Collection, a ComponentDefinition with a single optional Sequence reference and owned
//! SequenceAnnotations, and a Sequence. `convert_toplevel` is a recursive, memoizing walk keyed
//! by appending `/1` to the source identity, mirroring the one-legacy-revision-per-object
//! convention the format this stands in for uses.

use std::io::Cursor;

use indexmap::IndexMap;
use url::Url;
use xml::writer::{EmitterConfig, XmlEvent};

use crate::component::Component;
use crate::document::{Collection, Document, TopLevelObject};
use crate::error::{ConversionError, Result};
use crate::export::{location_to_gbk_location, sort_features};
use crate::feature::Feature;
use crate::gbk::{Record, RecordFeature};
use crate::identified::Identified;
use crate::location::Location;
use crate::ontology::OntologyBridge;
use crate::sequence::Sequence;

/// BioPAX-style legacy type namespace. No authoritative legacy vocabulary is part of this
/// crate's dependency stack, so these are this crate's own stable constants (see `DESIGN.md`).
const LEGACY_TYPE_NS: &str = "http://www.biopax.org/release/biopax-level3.documented.owl#";
const LEGACY_ENCODING_NS: &str = "http://www.ncbi.nlm.nih.gov/genbank#legacyEncoding";

fn remap_type(type_uri: &Url) -> Url {
    let term = type_uri.as_str();
    let remapped = if term.ends_with("SBO:0000251") {
        format!("{LEGACY_TYPE_NS}DnaRegion")
    } else if term.ends_with("SBO:0000250") {
        format!("{LEGACY_TYPE_NS}RnaRegion")
    } else if term.ends_with("SBO:0000252") {
        format!("{LEGACY_TYPE_NS}Protein")
    } else if term.ends_with("edam:format_1207") {
        format!("{LEGACY_ENCODING_NS}#iupac")
    } else {
        return type_uri.clone();
    };
    Url::parse(&remapped).expect("legacy type remap produces a valid URI")
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacySequence {
    pub identity: Url,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub encoding: Url,
    pub elements: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacySequenceAnnotation {
    pub identity: Url,
    pub instance_of: Url,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyComponentDefinition {
    pub identity: Url,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub types: Vec<Url>,
    pub roles: Vec<Url>,
    pub sequence: Option<Url>,
    pub sub_components: Vec<LegacySequenceAnnotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCollection {
    pub identity: Url,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Vec<Url>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegacyObject {
    Component(LegacyComponentDefinition),
    Sequence(LegacySequence),
    Collection(LegacyCollection),
}

impl LegacyObject {
    fn identity(&self) -> &Url {
        match self {
            LegacyObject::Component(c) => &c.identity,
            LegacyObject::Sequence(s) => &s.identity,
            LegacyObject::Collection(c) => &c.identity,
        }
    }
}

/// The simplified legacy object store, keyed by identity exactly as [`Document`] is.
#[derive(Debug, Clone, Default)]
pub struct LegacyDocument {
    objects: IndexMap<Url, LegacyObject>,
}

impl LegacyDocument {
    pub fn new() -> Self {
        LegacyDocument::default()
    }

    pub fn find(&self, identity: &Url) -> Option<&LegacyObject> {
        self.objects.get(identity)
    }

    pub fn components(&self) -> impl Iterator<Item = &LegacyComponentDefinition> {
        self.objects.values().filter_map(|o| match o {
            LegacyObject::Component(c) => Some(c),
            _ => None,
        })
    }

    pub fn sequences(&self) -> impl Iterator<Item = &LegacySequence> {
        self.objects.values().filter_map(|o| match o {
            LegacyObject::Sequence(s) => Some(s),
            _ => None,
        })
    }

    fn insert(&mut self, object: LegacyObject) -> Url {
        let identity = object.identity().clone();
        self.objects.insert(identity.clone(), object);
        identity
    }
}

fn legacy_identity_of(source_identity: &Url) -> Result<Url> {
    Url::parse(&format!("{source_identity}/1"))
        .map_err(|e| ConversionError::Structural(format!("invalid legacy identity: {e}")))
}

/// Recursively convert `src_identity` (and everything it references) from `src` into `target`,
/// returning the legacy object's identity. Already-converted objects are returned from the
/// memoization table (`target.find`) rather than rebuilt.
pub fn convert_toplevel(target: &mut LegacyDocument, src: &Document, src_identity: &Url) -> Result<Url> {
    let legacy_identity = legacy_identity_of(src_identity)?;
    if target.find(&legacy_identity).is_some() {
        return Ok(legacy_identity);
    }

    let source = src.find(src_identity).ok_or_else(|| {
        ConversionError::Structural(format!("legacy conversion referenced missing object `{src_identity}`"))
    })?;

    match source {
        TopLevelObject::Collection(collection) => {
            convert_collection(target, src, legacy_identity, collection)
        }
        TopLevelObject::Component(component) => convert_component(target, src, legacy_identity, component),
        TopLevelObject::Sequence(sequence) => Ok(convert_sequence(target, legacy_identity, sequence)),
        other => Err(ConversionError::UnsupportedVariant(format!(
            "legacy conversion does not support top-level `{:?}`",
            std::mem::discriminant(other)
        ))),
    }
}

fn convert_collection(
    target: &mut LegacyDocument,
    src: &Document,
    legacy_identity: Url,
    collection: &Collection,
) -> Result<Url> {
    let mut members = Vec::new();
    for member in &collection.members {
        members.push(convert_toplevel(target, src, member)?);
    }
    let legacy = LegacyCollection {
        identity: legacy_identity,
        display_id: collection.display_id().map(str::to_string),
        name: collection.name().map(str::to_string),
        description: collection.description().map(str::to_string),
        members,
    };
    Ok(target.insert(LegacyObject::Collection(legacy)))
}

fn convert_component(
    target: &mut LegacyDocument,
    src: &Document,
    legacy_identity: Url,
    component: &Component,
) -> Result<Url> {
    let types = component.types.iter().map(remap_type).collect();
    let roles = component.roles.clone();

    let sequence = match component.single_sequence()? {
        Some(seq_identity) => Some(convert_toplevel(target, src, seq_identity)?),
        None => None,
    };

    let mut sub_components = Vec::new();
    for feature in &component.features {
        if let Feature::Sub(sub) = feature {
            let instance_of = convert_toplevel(target, src, &sub.instance_of)?;
            sub_components.push(LegacySequenceAnnotation {
                identity: legacy_identity_of(&sub.identity)?,
                instance_of,
                locations: sub.locations.clone(),
            });
        }
    }

    let legacy = LegacyComponentDefinition {
        identity: legacy_identity,
        display_id: component.display_id().map(str::to_string),
        name: component.name().map(str::to_string),
        description: component.description().map(str::to_string),
        types,
        roles,
        sequence,
        sub_components,
    };
    Ok(target.insert(LegacyObject::Component(legacy)))
}

fn convert_sequence(target: &mut LegacyDocument, legacy_identity: Url, sequence: &Sequence) -> Url {
    let legacy = LegacySequence {
        identity: legacy_identity,
        display_id: sequence.display_id().map(str::to_string),
        name: sequence.name().map(str::to_string),
        description: sequence.description().map(str::to_string),
        encoding: remap_type(&sequence.encoding),
        elements: sequence.elements.clone(),
    };
    target.insert(LegacyObject::Sequence(legacy))
}

/// Every Component referenced by a SequenceAnnotation must itself be present with at most one
/// Sequence; this is the legacy document's only structural invariant.
pub fn validate(doc: &LegacyDocument) -> Result<()> {
    for component in doc.components() {
        for sub in &component.sub_components {
            match doc.find(&sub.instance_of) {
                Some(LegacyObject::Component(referenced)) => {
                    if referenced.sequence.is_none() {
                        tracing::warn!(
                            component = %referenced.identity,
                            "legacy SequenceAnnotation references a Component with no Sequence"
                        );
                    }
                }
                _ => {
                    return Err(ConversionError::Structural(format!(
                        "legacy SequenceAnnotation references missing Component `{}`",
                        sub.instance_of
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Render the legacy document to its XML wire form via an XML-writing adapter, standing in for
/// the distilled spec's external legacy emitter.
pub fn to_xml(doc: &LegacyDocument) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(Cursor::new(&mut buffer));

        writer.write(XmlEvent::start_element("rdf:RDF"))?;
        for sequence in doc.sequences() {
            writer.write(XmlEvent::start_element("Sequence").attr("rdf:about", sequence.identity.as_str()))?;
            writer.write(XmlEvent::start_element("elements"))?;
            writer.write(XmlEvent::characters(&sequence.elements))?;
            writer.write(XmlEvent::end_element())?;
            writer.write(XmlEvent::end_element())?;
        }
        for component in doc.components() {
            writer.write(
                XmlEvent::start_element("ComponentDefinition").attr("rdf:about", component.identity.as_str()),
            )?;
            for t in &component.types {
                writer.write(XmlEvent::start_element("type").attr("rdf:resource", t.as_str()))?;
                writer.write(XmlEvent::end_element())?;
            }
            writer.write(XmlEvent::end_element())?;
        }
        writer.write(XmlEvent::end_element())?;
    }
    String::from_utf8(buffer).map_err(|e| ConversionError::Structural(format!("legacy XML was not valid UTF-8: {e}")))
}

/// Export every Sequence-bearing legacy Component to a GBK record, reusing the primary
/// exporter's location/feature-sort machinery against the legacy graph's simpler shape: a
/// SequenceAnnotation carries only a reference and locations, no qualifier bag.
pub fn export_to_gbk(doc: &LegacyDocument, bridge: &OntologyBridge) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for component in doc.components() {
        let Some(sequence_identity) = &component.sequence else {
            continue;
        };
        let sequence = match doc.find(sequence_identity) {
            Some(LegacyObject::Sequence(s)) => s,
            _ => {
                return Err(ConversionError::Structural(format!(
                    "legacy Component `{}` references a missing Sequence",
                    component.identity
                )));
            }
        };

        let mut features = Vec::new();
        for sub in &component.sub_components {
            let Some(location) = sub.locations.first() else {
                continue;
            };
            let (gbk_location, strand) = location_to_gbk_location(location);
            let label = doc
                .find(&sub.instance_of)
                .and_then(|o| match o {
                    LegacyObject::Component(c) => c.display_id.clone(),
                    _ => None,
                })
                .unwrap_or_default();
            let mut qualifiers = IndexMap::new();
            qualifiers.insert("label".to_string(), vec![label]);
            features.push(RecordFeature {
                kind: bridge.so_to_gb("SO:0000110"),
                qualifiers,
                location: gbk_location,
                strand,
            });
        }
        sort_features(&mut features);

        records.push(Record {
            id: component.display_id.clone().unwrap_or_default(),
            name: component.display_id.clone().unwrap_or_default(),
            description: component.description.clone().unwrap_or_default(),
            seq: sequence.elements.to_uppercase(),
            annotations: IndexMap::new(),
            dbxrefs: Vec::new(),
            features,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontologies::{ComponentTypeOntology, Encoding, Ontology};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn converting_a_component_memoizes_by_legacy_identity() {
        let mut src = Document::new();
        let identity = url("https://test.sbol3.genbank/pUC19");
        let mut component = Component::new(identity.clone());
        component.types.push(ComponentTypeOntology::DNA.uri());
        src.add(component);

        let mut target = LegacyDocument::new();
        let first = convert_toplevel(&mut target, &src, &identity).unwrap();
        let second = convert_toplevel(&mut target, &src, &identity).unwrap();
        assert_eq!(first, second);
        assert_eq!(target.components().count(), 1);
    }

    #[test]
    fn component_type_is_remapped_to_the_legacy_vocabulary() {
        let mut src = Document::new();
        let identity = url("https://test.sbol3.genbank/pUC19");
        let mut component = Component::new(identity.clone());
        component.types.push(ComponentTypeOntology::DNA.uri());
        src.add(component);

        let mut target = LegacyDocument::new();
        let legacy_identity = convert_toplevel(&mut target, &src, &identity).unwrap();
        let legacy = target.find(&legacy_identity).unwrap();
        match legacy {
            LegacyObject::Component(c) => assert!(c.types[0].as_str().ends_with("DnaRegion")),
            _ => panic!("expected a component"),
        }
    }

    #[test]
    fn validate_rejects_a_sub_component_referencing_nothing() {
        let mut target = LegacyDocument::new();
        let identity = url("https://test.sbol3.genbank/pUC19/1");
        target.insert(LegacyObject::Component(LegacyComponentDefinition {
            identity,
            display_id: Some("pUC19".to_string()),
            name: None,
            description: None,
            types: Vec::new(),
            roles: Vec::new(),
            sequence: None,
            sub_components: vec![LegacySequenceAnnotation {
                identity: url("https://test.sbol3.genbank/pUC19/insert_0/1"),
                instance_of: url("https://test.sbol3.genbank/missing/1"),
                locations: Vec::new(),
            }],
        }));
        assert!(validate(&target).is_err());
    }

    #[test]
    fn sequence_converts_with_remapped_encoding() {
        let mut src = Document::new();
        let identity = url("https://test.sbol3.genbank/pUC19_sequence");
        src.add(Sequence::new(identity.clone(), "acgt", Encoding::NucleicAcid));

        let mut target = LegacyDocument::new();
        let legacy_identity = convert_toplevel(&mut target, &src, &identity).unwrap();
        match target.find(&legacy_identity).unwrap() {
            LegacyObject::Sequence(s) => assert_eq!(s.elements, "acgt"),
            _ => panic!("expected a sequence"),
        }
    }
}
