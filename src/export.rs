//! SGM -> GBK exporter.
//!
//! The inverse of [`crate::import`]: walks every Component with a Sequence and reconstructs a
//! flat [`Record`] from its core fields plus whatever the importer parked in [`GbkExtras`] and
//! the Reference/StructuredComment side-cars. Read-only with respect to the `Document`.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::carrier::{GbkExtras, ReferenceSideCar, StructuredCommentSideCar};
use crate::component::Component;
use crate::document::Document;
use crate::error::{ConversionError, Result};
use crate::feature::{Feature, SequenceFeature};
use crate::gbk::{AnnotationValue, GbPosition, GbkLocation, Record, RecordFeature, RecordReference};
use crate::location::{Location, Orientation};
use crate::ontology::OntologyBridge;
use crate::sequence::Sequence;

const DEFAULT_SOURCE: &str = ".";

/// Export every serializable (Sequence-bearing) Component in `doc` to a GBK record.
///
/// Returns one record per exported Component, in document order.
pub fn export_document(doc: &Document, bridge: &OntologyBridge) -> Result<Vec<Record>> {
    let references = index_references(doc);
    let structured_comments = index_structured_comments(doc);

    let mut records = Vec::new();
    for component in doc.components() {
        let Some(record) = export_component(doc, bridge, component, &references, &structured_comments)? else {
            continue;
        };
        records.push(record);
    }
    Ok(records)
}

fn index_references(doc: &Document) -> HashMap<String, Vec<&ReferenceSideCar>> {
    let mut index: HashMap<String, Vec<&ReferenceSideCar>> = HashMap::new();
    for reference in doc.references() {
        index.entry(reference.component.clone()).or_default().push(reference);
    }
    index
}

fn index_structured_comments(doc: &Document) -> HashMap<String, Vec<&StructuredCommentSideCar>> {
    let mut index: HashMap<String, Vec<&StructuredCommentSideCar>> = HashMap::new();
    for comment in doc.structured_comments() {
        index.entry(comment.component.clone()).or_default().push(comment);
    }
    index
}

fn export_component(
    doc: &Document,
    bridge: &OntologyBridge,
    component: &Component,
    references: &HashMap<String, Vec<&ReferenceSideCar>>,
    structured_comments: &HashMap<String, Vec<&StructuredCommentSideCar>>,
) -> Result<Option<Record>> {
    let Some(sequence_identity) = component.single_sequence()? else {
        return Ok(None);
    };
    let sequence = doc
        .find(sequence_identity)
        .and_then(|o| o.as_sequence())
        .ok_or_else(|| {
            ConversionError::Structural(format!(
                "Component `{}` references a Sequence not present in the document",
                component.display_id.as_deref().unwrap_or_default()
            ))
        })?;

    let empty_extras = GbkExtras::default();
    let extras = component.extras.as_ref().unwrap_or(&empty_extras);
    let display_id = component.display_id.clone().unwrap_or_default();

    let mut annotations = IndexMap::new();
    rehydrate_annotations(&mut annotations, extras);

    if let Some(refs) = references.get(&display_id) {
        annotations.insert(
            "references".to_string(),
            AnnotationValue::References(refs.iter().map(|r| export_reference(r)).collect()),
        );
    }
    if let Some(comments) = structured_comments.get(&display_id) {
        let mut rebuilt: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for comment in comments {
            rebuilt.insert(comment.heading.clone(), rebuild_structured_pairs(comment));
        }
        annotations.insert("structured_comment".to_string(), AnnotationValue::StructuredComment(rebuilt));
    }

    let mut features = Vec::new();
    for feature in &component.features {
        if let Feature::Sequence(seq_feature) = feature {
            features.push(export_feature(bridge, seq_feature)?);
        }
    }
    for fuzzy in &extras.fuzzy_features {
        features.push(export_feature(bridge, fuzzy)?);
    }
    sort_features(&mut features);

    let dbxrefs = extras
        .dbxrefs
        .as_deref()
        .map(|s| s.split("::").map(str::to_string).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    Ok(Some(Record {
        id: extras.genbank_record_id.clone().unwrap_or_else(|| display_id.clone()),
        name: display_id,
        description: component.description.clone().unwrap_or_default(),
        seq: sequence.elements.to_uppercase(),
        annotations,
        dbxrefs,
        features,
    }))
}

fn rehydrate_annotations(annotations: &mut IndexMap<String, AnnotationValue>, extras: &GbkExtras) {
    if let Some(date) = &extras.date {
        annotations.insert("date".to_string(), AnnotationValue::Text(date.clone()));
    }
    if let Some(division) = &extras.division {
        annotations.insert("data_file_division".to_string(), AnnotationValue::Text(division.clone()));
    }
    if let Some(topology) = &extras.topology {
        annotations.insert("topology".to_string(), AnnotationValue::Text(topology.clone()));
    }
    if let Some(molecule_type) = &extras.molecule_type {
        annotations.insert("molecule_type".to_string(), AnnotationValue::Text(molecule_type.clone()));
    }
    // Spec boundary behavior: an empty `source` exports as the GenBank default sentinel, never
    // as an empty string.
    let source = match extras.source.as_deref() {
        Some("") | None => DEFAULT_SOURCE.to_string(),
        Some(s) => s.to_string(),
    };
    annotations.insert("source".to_string(), AnnotationValue::Text(source));
    if let Some(organism) = &extras.organism {
        annotations.insert("organism".to_string(), AnnotationValue::Text(organism.clone()));
    }
    if let Some(taxonomy) = &extras.taxonomy {
        let list: Vec<String> = taxonomy.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        if !list.is_empty() {
            annotations.insert("taxonomy".to_string(), AnnotationValue::List(list));
        }
    }
    if let Some(keywords) = &extras.keywords {
        let list: Vec<String> = keywords.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        if !list.is_empty() {
            annotations.insert("keywords".to_string(), AnnotationValue::List(list));
        }
    }
    if let Some(gi) = &extras.gi {
        annotations.insert("gi".to_string(), AnnotationValue::Text(gi.clone()));
    }
    if let Some(comment) = &extras.comment {
        annotations.insert("comment".to_string(), AnnotationValue::Text(comment.clone()));
    }
    let mut accessions = extras.accessions.clone();
    accessions.sort();
    if !accessions.is_empty() {
        annotations.insert("accessions".to_string(), AnnotationValue::List(accessions));
    }
    // Exported sequence_version is always the constant default, per the round-trip contract.
    annotations.insert("sequence_version".to_string(), AnnotationValue::Text("1".to_string()));
}

fn export_reference(side_car: &ReferenceSideCar) -> RecordReference {
    RecordReference {
        authors: side_car.authors.clone(),
        comment: side_car.comment.clone(),
        journal: side_car.journal.clone(),
        consortium: side_car.consortium.clone(),
        title: side_car.title.clone(),
        medline_id: side_car.medline_id.clone(),
        pubmed_id: side_car.pubmed_id.clone(),
        locations: side_car
            .locations
            .iter()
            .map(|location| {
                let (start, end) = location.flattened_positions().first().copied().unwrap_or((0, 0));
                (start, end, location.orientation().to_gb_strand())
            })
            .collect(),
    }
}

fn rebuild_structured_pairs(side_car: &StructuredCommentSideCar) -> IndexMap<String, String> {
    let mut keys: Vec<(u64, String)> = side_car
        .structured_keys
        .iter()
        .filter_map(|entry| split_indexed_prefix(entry))
        .collect();
    let mut values: Vec<(u64, String)> = side_car
        .structured_values
        .iter()
        .filter_map(|entry| split_indexed_prefix(entry))
        .collect();
    keys.sort_by_key(|(n, _)| *n);
    values.sort_by_key(|(n, _)| *n);

    keys.into_iter()
        .zip(values)
        .map(|((_, key), (_, value))| (key, value))
        .collect()
}

fn split_indexed_prefix(entry: &str) -> Option<(u64, String)> {
    let (n, rest) = entry.split_once("::")?;
    Some((n.parse().ok()?, rest.to_string()))
}

fn export_feature(bridge: &OntologyBridge, feature: &SequenceFeature) -> Result<RecordFeature> {
    let location = feature
        .locations
        .first()
        .ok_or_else(|| ConversionError::Structural("feature has no locations".to_string()))?;
    let (gbk_location, strand) = location_to_gbk_location(location);

    let role = feature
        .roles
        .first()
        .map(|r| r.as_str())
        .unwrap_or("");
    let so_term = role.rsplit('/').next().unwrap_or(role);
    let kind = bridge.so_to_gb(so_term);

    let mut ordered: Vec<(u64, String, String)> = feature
        .qualifiers
        .iter()
        .filter_map(|(key, value)| {
            let (n, rest) = key.split_once(':')?;
            Some((n.parse().ok()?, rest.to_string(), value.clone()))
        })
        .collect();
    ordered.sort_by_key(|(n, _, _)| *n);

    let mut qualifiers: IndexMap<String, Vec<String>> = IndexMap::new();
    for (_, key, value) in ordered {
        qualifiers.entry(key).or_default().push(value);
    }

    Ok(RecordFeature {
        kind,
        qualifiers,
        location: gbk_location,
        strand,
    })
}

/// Shared with the legacy export path ([`crate::legacy`]), which reuses this conversion against
/// its own simpler `SequenceAnnotation` locations.
pub(crate) fn location_to_gbk_location(location: &Location) -> (GbkLocation, i8) {
    let strand = location.orientation().to_gb_strand();

    fn inner(location: &Location) -> GbkLocation {
        match location {
            Location::Cut { at, .. } => GbkLocation::Between(*at, *at + 1),
            Location::Range {
                start,
                end,
                start_fuzz,
                end_fuzz,
                ..
            } => GbkLocation::Range(
                GbPosition::from_value_and_code(*start, start_fuzz.code()),
                GbPosition::from_value_and_code(*end, end_fuzz.code()),
            ),
            Location::Compound { parts, orientation } => {
                let mut sorted = parts.clone();
                Location::sort_compound_parts(&mut sorted, *orientation);
                GbkLocation::Join(sorted.iter().map(inner).collect())
            }
        }
    }

    (inner(location), strand)
}

pub(crate) fn sort_features(features: &mut [RecordFeature]) {
    features.sort_by_key(|f| {
        let positions = location_positions(&f.location);
        (positions, f.strand, f.qualifiers.len(), f.kind.clone())
    });
}

fn location_positions(location: &GbkLocation) -> Vec<(u64, u64)> {
    match location {
        GbkLocation::Range(start, end) => vec![(start.value(), end.value())],
        GbkLocation::Between(a, b) => vec![(*a, *b)],
        GbkLocation::Complement(inner) => location_positions(inner),
        GbkLocation::Join(parts) => parts.iter().flat_map(location_positions).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::SequenceFeature;
    use crate::location::Fuzz;
    use crate::ontologies::Encoding;
    use url::Url;

    fn bridge() -> OntologyBridge {
        let dir = tempfile::tempdir().unwrap();
        let gb2so = dir.path().join("gb2so.csv");
        let so2gb = dir.path().join("so2gb.csv");
        std::fs::write(&gb2so, "GenBank_Ontology,SO_Ontology\nCDS,SO:0000316\n").unwrap();
        std::fs::write(&so2gb, "SO_Ontology,GenBank_Ontology\nSO:0000316,CDS\n").unwrap();
        OntologyBridge::load(&gb2so, &so2gb).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn component_with_empty_source_exports_genbank_default() {
        let mut doc = Document::new();
        let identity = url("https://test.sbol3.genbank/pUC19");
        let mut component = Component::new(identity.clone());
        let sequence_identity = url("https://test.sbol3.genbank/pUC19_sequence");
        component.sequences.push(sequence_identity.clone());
        let mut extras = GbkExtras::default();
        extras.source = Some(String::new());
        component.extras = Some(extras);

        doc.add(component);
        doc.add(Sequence::new(sequence_identity, "acgt", Encoding::NucleicAcid));

        let bridge = bridge();
        let records = export_document(&doc, &bridge).unwrap();
        assert_eq!(records.len(), 1);
        let source = records[0].annotations.get("source").and_then(AnnotationValue::as_text);
        assert_eq!(source, Some(DEFAULT_SOURCE));
    }

    #[test]
    fn component_without_a_sequence_is_skipped() {
        let mut doc = Document::new();
        doc.add(Component::new(url("https://test.sbol3.genbank/orphan")));
        let bridge = bridge();
        let records = export_document(&doc, &bridge).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn exported_sequence_version_is_always_one() {
        let mut doc = Document::new();
        let identity = url("https://test.sbol3.genbank/pUC19");
        let mut component = Component::new(identity);
        let sequence_identity = url("https://test.sbol3.genbank/pUC19_sequence");
        component.sequences.push(sequence_identity.clone());
        doc.add(component);
        doc.add(Sequence::new(sequence_identity, "acgt", Encoding::NucleicAcid));

        let bridge = bridge();
        let records = export_document(&doc, &bridge).unwrap();
        let version = records[0].annotations.get("sequence_version").and_then(AnnotationValue::as_text);
        assert_eq!(version, Some("1"));
    }

    #[test]
    fn imported_then_exported_record_round_trips_its_named_feature() {
        use crate::gbk::{AnnotationValue, GbPosition, GbkLocation, Record, RecordFeature};
        use indexmap::IndexMap;

        let mut qualifiers = IndexMap::new();
        qualifiers.insert("label".to_string(), vec!["lacZ".to_string()]);
        let feature = RecordFeature {
            kind: "CDS".to_string(),
            qualifiers,
            location: GbkLocation::Range(GbPosition::Exact(1), GbPosition::Exact(300)),
            strand: 1,
        };
        let mut annotations = IndexMap::new();
        annotations.insert("topology".to_string(), AnnotationValue::Text("linear".to_string()));
        let record = Record {
            id: "X00000".to_string(),
            name: "pUC19".to_string(),
            description: "a plasmid".to_string(),
            seq: "ACGTACGT".to_string(),
            annotations,
            dbxrefs: Vec::new(),
            features: vec![feature],
        };

        let bridge = bridge();
        let mut doc = Document::new();
        crate::import::import_record(&mut doc, &bridge, "https://test.sbol3.genbank/", &record).unwrap();

        let exported = export_document(&doc, &bridge).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].seq, "ACGTACGT");
        assert_eq!(exported[0].features[0].kind, "CDS");
        assert_eq!(exported[0].features[0].qualifiers.get("label").unwrap()[0], "lacZ");
    }

    #[test]
    fn feature_qualifiers_rebuild_in_original_order() {
        let feature_identity = url("https://test.sbol3.genbank/pUC19/feature_0");
        let mut feature = SequenceFeature::new(
            feature_identity,
            Orientation::Forward,
            vec![Location::range(1, 300, Orientation::Forward, Fuzz::Exact, Fuzz::Exact)],
        );
        feature.qualifiers.push(("1:note".to_string(), "second".to_string()));
        feature.qualifiers.push(("0:label".to_string(), "first".to_string()));

        let bridge = bridge();
        let record_feature = export_feature(&bridge, &feature).unwrap();
        let keys: Vec<&String> = record_feature.qualifiers.keys().collect();
        assert_eq!(keys, vec!["label", "note"]);
    }
}
