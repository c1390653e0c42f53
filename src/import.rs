//! GBK -> SGM importer.
//!
//! Walks a flat [`crate::gbk::Record`] and populates a [`Document`] with an Extended Component,
//! its Sequence, any Reference/StructuredComment side-cars, and its features. Unmappable data is
//! parked into [`GbkExtras`] rather than dropped; an unrecognized annotation key is a hard error
//! (invariant: no silent loss of a GBK field the importer doesn't know how to carry).

use url::Url;

use crate::carrier::{GbkExtras, ReferenceSideCar, StructuredCommentSideCar};
use crate::component::Component;
use crate::document::Document;
use crate::error::{ConversionError, Result};
use crate::feature::{Feature, SequenceFeature};
use crate::gbk::{AnnotationValue, GbPosition, GbkLocation, Record};
use crate::location::{Fuzz, Location, Orientation};
use crate::ontologies::{ComponentRole, ComponentTypeOntology, Encoding, Ontology, TopologyOntology, SO_NS};
use crate::ontology::OntologyBridge;
use crate::sequence::Sequence;

/// Annotation keys the importer understands; anything else reaching a record is a hard error.
const KNOWN_ANNOTATION_KEYS: &[&str] = &[
    "date",
    "data_file_division",
    "topology",
    "molecule_type",
    "source",
    "organism",
    "taxonomy",
    "keywords",
    "accessions",
    "sequence_version",
    "comment",
    "structured_comment",
    "references",
    "gi",
];

/// Import a single GBK record into `doc`, returning the new Component's identity.
///
/// `namespace` must end in `/`; the new Component's identity is `<namespace><record.name>`.
pub fn import_record(
    doc: &mut Document,
    bridge: &OntologyBridge,
    namespace: &str,
    record: &Record,
) -> Result<Url> {
    for key in record.annotations.keys() {
        if !KNOWN_ANNOTATION_KEYS.contains(&key.as_str()) {
            return Err(ConversionError::Structural(format!(
                "unknown GenBank annotation key `{key}` on record `{}`",
                record.name
            )));
        }
    }

    let component_identity = Url::parse(&format!("{namespace}{}", record.name))
        .map_err(|e| ConversionError::Structural(format!("invalid component identity: {e}")))?;
    let mut component = Component::new(component_identity.clone());
    component.description = non_empty(record.description.clone());
    component.types.push(ComponentTypeOntology::DNA.uri());
    component.types.push(topology_term(record).uri());
    component.roles.push(ComponentRole::EngineeredRegion.uri());

    let sequence_identity = Url::parse(&format!("{component_identity}_sequence"))
        .map_err(|e| ConversionError::Structural(format!("invalid sequence identity: {e}")))?;
    let sequence = Sequence::new(sequence_identity.clone(), record.seq.to_lowercase(), Encoding::NucleicAcid);
    component.sequences.push(sequence_identity);

    let display_id = component.display_id.clone().unwrap_or_else(|| record.name.clone());
    let mut extras = build_extras(record);

    for (i, feature) in record.features.iter().enumerate() {
        let feature_identity = Url::parse(&format!("{component_identity}/feature_{i}"))
            .map_err(|e| ConversionError::Structural(format!("invalid feature identity: {e}")))?;
        let built = import_feature(bridge, feature_identity, feature, i)?;
        if built.is_fuzzy() {
            extras.fuzzy_features.push(built);
        } else {
            component.features.push(Feature::Sequence(built));
        }
    }

    if let Some(AnnotationValue::References(refs)) = record.annotations.get("references") {
        for (i, r) in refs.iter().enumerate() {
            let identity = Url::parse(&format!("{component_identity}/Reference_{i}"))
                .map_err(|e| ConversionError::Structural(format!("invalid reference identity: {e}")))?;
            let mut side_car = ReferenceSideCar::new(identity, display_id.clone());
            side_car.authors = r.authors.clone();
            side_car.comment = r.comment.clone();
            side_car.journal = r.journal.clone();
            side_car.consortium = r.consortium.clone();
            side_car.title = r.title.clone();
            side_car.medline_id = r.medline_id.clone();
            side_car.pubmed_id = r.pubmed_id.clone();
            side_car.locations = r
                .locations
                .iter()
                .map(|(start, end, strand)| {
                    Location::range(*start, *end, Orientation::from_gb_strand(*strand), Fuzz::Exact, Fuzz::Exact)
                })
                .collect();
            doc.add(side_car);
        }
    }

    if let Some(AnnotationValue::StructuredComment(sc)) = record.annotations.get("structured_comment") {
        for (i, (heading, kv)) in sc.iter().enumerate() {
            let n = i + 1;
            let identity = Url::parse(&format!("{component_identity}/StructuredComment_{n}"))
                .map_err(|e| ConversionError::Structural(format!("invalid structured comment identity: {e}")))?;
            let mut side_car = StructuredCommentSideCar::new(identity, heading.clone(), display_id.clone());
            for (j, (key, value)) in kv.iter().enumerate() {
                let prefix = j + 1;
                side_car.structured_keys.push(format!("{prefix}::{key}"));
                side_car.structured_values.push(format!("{prefix}::{value}"));
            }
            doc.add(side_car);
        }
    }

    component.extras = Some(extras);
    doc.add(component);
    doc.add(sequence);
    Ok(component_identity)
}

fn topology_term(record: &Record) -> TopologyOntology {
    if let Some(t) = record.annotations.get("topology").and_then(AnnotationValue::as_text) {
        if t == "circular" {
            return TopologyOntology::Circular;
        }
        return TopologyOntology::Linear;
    }
    match record.annotations.get("data_file_division").and_then(AnnotationValue::as_text) {
        Some("circular") => TopologyOntology::Circular,
        Some("linear") => TopologyOntology::Linear,
        _ => TopologyOntology::Linear,
    }
}

fn build_extras(record: &Record) -> GbkExtras {
    let get_text = |key: &str| record.annotations.get(key).and_then(AnnotationValue::as_text).map(str::to_string);
    let get_list = |key: &str| {
        record
            .annotations
            .get(key)
            .and_then(AnnotationValue::as_list)
            .map(|v| v.join(", "))
    };

    GbkExtras {
        genbank_record_id: non_empty(record.id.clone()),
        sequence_version: get_text("sequence_version").and_then(|v| v.parse().ok()),
        date: get_text("date"),
        division: get_text("data_file_division"),
        locus: non_empty(record.name.clone()),
        molecule_type: get_text("molecule_type"),
        organism: get_text("organism"),
        // Preserved verbatim, including an explicit empty string, so export can restore the
        // GenBank default `.` rather than writing nothing (invariant-adjacent boundary case).
        source: get_text("source"),
        topology: get_text("topology"),
        gi: get_text("gi"),
        comment: get_text("comment"),
        dbxrefs: non_empty(record.dbxrefs.join("::")),
        taxonomy: get_list("taxonomy"),
        keywords: get_list("keywords"),
        accessions: record
            .annotations
            .get("accessions")
            .and_then(AnnotationValue::as_list)
            .map(|v| v.to_vec())
            .unwrap_or_default(),
        fuzzy_features: Vec::new(),
    }
}

fn import_feature(
    bridge: &OntologyBridge,
    identity: Url,
    feature: &crate::gbk::RecordFeature,
    index: usize,
) -> Result<SequenceFeature> {
    let name = feature
        .qualifiers
        .get("label")
        .and_then(|values| values.first())
        .cloned()
        .unwrap_or_else(|| format!("_converted_feature_{index}"));

    let so_term = bridge.gb_to_so(&feature.kind);
    let role = Url::parse(&format!("{SO_NS}{}", so_term.trim_start_matches("SO:")))
        .map_err(|e| ConversionError::Structural(format!("invalid SO role URI: {e}")))?;

    let orientation = Orientation::from_gb_strand(feature.strand);
    let location = gbk_location_to_location(&feature.location, feature.strand);

    let mut built = SequenceFeature::new(identity, orientation, vec![location]);
    built.name = Some(name);
    built.roles.push(role);

    for (i, (key, values)) in feature.qualifiers.iter().enumerate() {
        if values.len() > 1 {
            tracing::warn!(
                qualifier = key.as_str(),
                feature_index = index,
                "multi-valued qualifier truncated to its first value on import"
            );
        }
        if let Some(value) = values.first() {
            built.qualifiers.push((format!("{i}:{key}"), value.clone()));
        }
    }

    Ok(built)
}

fn gbk_location_to_location(location: &GbkLocation, strand: i8) -> Location {
    let outer = Orientation::from_gb_strand(strand);

    fn inner(location: &GbkLocation, orientation: Orientation) -> Location {
        match location {
            GbkLocation::Range(start, end) => Location::range(
                position_value(*start),
                position_value(*end),
                orientation,
                fuzz_of(*start),
                fuzz_of(*end),
            ),
            GbkLocation::Between(at, _) => Location::Cut { at: *at, orientation },
            GbkLocation::Complement(inner_loc) => inner(inner_loc, orientation.flip()),
            GbkLocation::Join(parts) => Location::Compound {
                parts: parts.iter().map(|p| inner(p, orientation)).collect(),
                orientation,
            },
        }
    }

    inner(location, outer)
}

fn position_value(position: GbPosition) -> u64 {
    position.value()
}

fn fuzz_of(position: GbPosition) -> Fuzz {
    Fuzz::from_code(position.fuzz_code())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn bridge() -> OntologyBridge {
        let dir = tempfile::tempdir().unwrap();
        let gb2so = dir.path().join("gb2so.csv");
        let so2gb = dir.path().join("so2gb.csv");
        std::fs::write(&gb2so, "GenBank_Ontology,SO_Ontology\nCDS,SO:0000316\n").unwrap();
        std::fs::write(&so2gb, "SO_Ontology,GenBank_Ontology\nSO:0000316,CDS\n").unwrap();
        OntologyBridge::load(&gb2so, &so2gb).unwrap()
    }

    fn sample_record() -> Record {
        let mut qualifiers = IndexMap::new();
        qualifiers.insert("label".to_string(), vec!["lacZ".to_string()]);
        let feature = crate::gbk::RecordFeature {
            kind: "CDS".to_string(),
            qualifiers,
            location: GbkLocation::Range(GbPosition::Exact(1), GbPosition::Exact(300)),
            strand: 1,
        };
        let mut annotations = IndexMap::new();
        annotations.insert("topology".to_string(), AnnotationValue::Text("circular".to_string()));
        Record {
            id: "X00000".to_string(),
            name: "pUC19".to_string(),
            description: "a plasmid".to_string(),
            seq: "ACGT".to_string(),
            annotations,
            dbxrefs: Vec::new(),
            features: vec![feature],
        }
    }

    #[test]
    fn imports_a_circular_record_with_a_named_feature() {
        let mut doc = Document::new();
        let bridge = bridge();
        let identity = import_record(&mut doc, &bridge, "https://test.sbol3.genbank/", &sample_record()).unwrap();
        let component = doc.find(&identity).unwrap().as_component().unwrap();
        assert_eq!(component.sequences.len(), 1);
        assert!(component.types.iter().any(|t| t.as_str().ends_with("SO:0000988")));
        let feature = component.features[0].as_sequence_feature().unwrap();
        assert_eq!(feature.name.as_deref(), Some("lacZ"));
        assert!(!feature.is_fuzzy());
    }

    #[test]
    fn feature_without_a_label_gets_a_fallback_name() {
        let mut record = sample_record();
        record.features[0].qualifiers.shift_remove("label");
        let mut doc = Document::new();
        let bridge = bridge();
        let identity = import_record(&mut doc, &bridge, "https://test.sbol3.genbank/", &record).unwrap();
        let component = doc.find(&identity).unwrap().as_component().unwrap();
        let feature = component.features[0].as_sequence_feature().unwrap();
        assert_eq!(feature.name.as_deref(), Some("_converted_feature_0"));
    }

    #[test]
    fn fuzzy_feature_is_routed_to_extras_not_features() {
        let mut record = sample_record();
        record.features[0].location = GbkLocation::Range(GbPosition::Before(1), GbPosition::Exact(300));
        let mut doc = Document::new();
        let bridge = bridge();
        let identity = import_record(&mut doc, &bridge, "https://test.sbol3.genbank/", &record).unwrap();
        let component = doc.find(&identity).unwrap().as_component().unwrap();
        assert!(component.features.is_empty());
        assert_eq!(component.extras.as_ref().unwrap().fuzzy_features.len(), 1);
    }

    #[test]
    fn unknown_annotation_key_is_a_hard_error() {
        let mut record = sample_record();
        record
            .annotations
            .insert("totally_unknown_key".to_string(), AnnotationValue::Text("x".to_string()));
        let mut doc = Document::new();
        let bridge = bridge();
        let err = import_record(&mut doc, &bridge, "https://test.sbol3.genbank/", &record).unwrap_err();
        assert!(matches!(err, ConversionError::Structural(_)));
    }
}
