//! Translation between `gb_io`'s native GenBank types and this crate's own [`super::Record`] AST.
//!
//! `gb_io` is treated strictly as an external collaborator here: nothing outside this module
//! names a `gb_io` type. Two things `gb_io` does not parse natively are handled here instead,
//! since they are conventions layered on top of the flat-file grammar rather than part of it:
//! NCBI's "structured comment" blocks embedded in free-text `COMMENT` lines, and splitting a
//! joined `DBLINK` value back into an ordered list.
//!
//! Known limitation: `gb_io::seq::Seq` has no field for the legacy NCBI GI number (the upstream
//! crate dropped it along with NCBI's own deprecation of GI numbers). The `"gi"` annotation is
//! therefore only ever populated by round-tripping a `Document` through its own canonical text;
//! a `.gb` flat file carrying a `GI:` line loses it on import and it is never written back out
//! on export. See `DESIGN.md`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gb_io::seq::{Location as GbIoLocation, Seq as GbIoSeq, Topology as GbIoTopology};
use indexmap::IndexMap;
use regex::Regex;

use super::{AnnotationValue, GbPosition, GbkLocation, Record, RecordFeature, RecordReference};
use crate::error::{ConversionError, Result};

/// Read every record out of a GenBank flat file.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let file = File::open(path.as_ref())?;
    let mut records = Vec::new();
    for seq in gb_io::reader::SeqReader::new(file) {
        let seq = seq.map_err(|e| ConversionError::GenBank(e.to_string()))?;
        records.push(seq_to_record(seq));
    }
    Ok(records)
}

/// Write records back out to a GenBank flat file.
pub fn write_records(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for record in records {
        let seq = record_to_seq(record)?;
        gb_io::writer::write(&mut writer, &seq).map_err(|e| ConversionError::GenBank(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn seq_to_record(seq: GbIoSeq) -> Record {
    let mut annotations = IndexMap::new();

    if let Some(date) = &seq.date {
        annotations.insert("date".to_string(), AnnotationValue::Text(date.to_string()));
    }
    match seq.topology {
        GbIoTopology::Linear if seq.division == "circular" || seq.division == "linear" => {
            annotations.insert(
                "data_file_division".to_string(),
                AnnotationValue::Text(seq.division.clone()),
            );
        }
        _ if !seq.division.is_empty() => {
            annotations.insert(
                "data_file_division".to_string(),
                AnnotationValue::Text(seq.division.clone()),
            );
        }
        _ => {}
    }
    annotations.insert(
        "topology".to_string(),
        AnnotationValue::Text(match seq.topology {
            GbIoTopology::Linear => "linear".to_string(),
            GbIoTopology::Circular => "circular".to_string(),
        }),
    );
    if let Some(mt) = &seq.molecule_type {
        annotations.insert("molecule_type".to_string(), AnnotationValue::Text(mt.clone()));
    }
    if let Some(source) = &seq.source {
        annotations.insert(
            "source".to_string(),
            AnnotationValue::Text(source.source.clone()),
        );
        if let Some(organism) = &source.organism {
            let mut lines = organism.splitn(2, '\n');
            let organism_name = lines.next().unwrap_or_default().to_string();
            annotations.insert("organism".to_string(), AnnotationValue::Text(organism_name));
            if let Some(taxonomy) = lines.next() {
                let taxa: Vec<String> = taxonomy
                    .split(';')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                if !taxa.is_empty() {
                    annotations.insert("taxonomy".to_string(), AnnotationValue::List(taxa));
                }
            }
        }
    }
    if let Some(keywords) = &seq.keywords {
        let kws: Vec<String> = keywords.split(';').map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect();
        if !kws.is_empty() {
            annotations.insert("keywords".to_string(), AnnotationValue::List(kws));
        }
    }
    if let Some(accession) = &seq.accession {
        let mut accessions = vec![accession.clone()];
        accessions.sort();
        annotations.insert("accessions".to_string(), AnnotationValue::List(accessions));
    }
    if let Some(version) = &seq.version {
        annotations.insert("sequence_version".to_string(), AnnotationValue::Text(version.clone()));
    }

    let mut dbxrefs = Vec::new();
    if let Some(dblink) = &seq.dblink {
        dbxrefs = dblink
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    let (structured, freeform) = split_structured_comments(&seq.comments);
    if !structured.is_empty() {
        annotations.insert(
            "structured_comment".to_string(),
            AnnotationValue::StructuredComment(structured),
        );
    }
    if !freeform.is_empty() {
        annotations.insert("comment".to_string(), AnnotationValue::Text(freeform.join("\n")));
    }

    if !seq.references.is_empty() {
        let refs = seq
            .references
            .iter()
            .map(|r| RecordReference {
                authors: r.authors.clone(),
                comment: None,
                journal: r.journal.clone(),
                consortium: r.consortium.clone(),
                title: Some(r.title.clone()),
                medline_id: None,
                pubmed_id: r.pubmed.clone(),
                locations: parse_reference_spans(&r.description),
            })
            .collect();
        annotations.insert("references".to_string(), AnnotationValue::References(refs));
    }

    let features = seq
        .features
        .iter()
        .map(|f| {
            let mut qualifiers: IndexMap<String, Vec<String>> = IndexMap::new();
            for (key, value) in &f.qualifiers {
                qualifiers
                    .entry(key.to_string())
                    .or_default()
                    .push(value.clone().unwrap_or_default());
            }
            let (location, strand) = convert_gbio_location(&f.location);
            RecordFeature {
                kind: f.kind.to_string(),
                qualifiers,
                location,
                strand,
            }
        })
        .collect();

    Record {
        id: seq.accession.clone().unwrap_or_else(|| seq.name.clone().unwrap_or_default()),
        name: seq.name.clone().unwrap_or_default(),
        description: seq.definition.clone().unwrap_or_default(),
        seq: String::from_utf8_lossy(&seq.seq).to_string(),
        annotations,
        dbxrefs,
        features,
    }
}

fn record_to_seq(record: &Record) -> Result<GbIoSeq> {
    let mut seq = GbIoSeq::empty();
    seq.name = Some(record.name.clone());
    seq.accession = Some(record.id.clone());
    seq.definition = Some(record.description.clone());
    seq.seq = record.seq.as_bytes().to_vec();

    seq.topology = match record.annotations.get("topology").and_then(AnnotationValue::as_text) {
        Some("circular") => GbIoTopology::Circular,
        _ => GbIoTopology::Linear,
    };
    if let Some(AnnotationValue::Text(division)) = record.annotations.get("data_file_division") {
        seq.division = division.clone();
    }
    if let Some(AnnotationValue::Text(mt)) = record.annotations.get("molecule_type") {
        seq.molecule_type = Some(mt.clone());
    }
    if let Some(AnnotationValue::Text(version)) = record.annotations.get("sequence_version") {
        seq.version = Some(version.clone());
    }

    let organism = record.annotations.get("organism").and_then(AnnotationValue::as_text);
    let source_text = record.annotations.get("source").and_then(AnnotationValue::as_text);
    if organism.is_some() || source_text.is_some() {
        let taxonomy = record
            .annotations
            .get("taxonomy")
            .and_then(AnnotationValue::as_list)
            .map(|t| t.join("; "));
        let organism_field = match (organism, taxonomy) {
            (Some(o), Some(t)) => Some(format!("{o}\n{t}.")),
            (Some(o), None) => Some(o.to_string()),
            _ => None,
        };
        seq.source = Some(gb_io::seq::Source {
            source: source_text.unwrap_or_default().to_string(),
            organism: organism_field,
        });
    }

    if let Some(keywords) = record.annotations.get("keywords").and_then(AnnotationValue::as_list) {
        seq.keywords = Some(keywords.join("; "));
    }
    if !record.dbxrefs.is_empty() {
        seq.dblink = Some(record.dbxrefs.join("; "));
    }

    let mut comments = Vec::new();
    if let Some(AnnotationValue::Text(comment)) = record.annotations.get("comment") {
        comments.push(comment.clone());
    }
    if let Some(AnnotationValue::StructuredComment(sc)) = record.annotations.get("structured_comment") {
        comments.push(render_structured_comments(sc));
    }
    seq.comments = comments;

    if let Some(AnnotationValue::References(refs)) = record.annotations.get("references") {
        seq.references = refs
            .iter()
            .map(|r| gb_io::seq::Reference {
                description: render_reference_spans(&r.locations),
                authors: r.authors.clone(),
                consortium: r.consortium.clone(),
                title: r.title.clone().unwrap_or_default(),
                journal: r.journal.clone(),
                pubmed: r.pubmed_id.clone(),
                ..Default::default()
            })
            .collect();
    }

    seq.features = record
        .features
        .iter()
        .map(|f| {
            let mut qualifiers = Vec::new();
            for (key, values) in &f.qualifiers {
                for value in values {
                    qualifiers.push((key.clone().into(), Some(value.clone())));
                }
            }
            gb_io::seq::Feature {
                kind: f.kind.clone().into(),
                location: convert_to_gbio_location(&f.location, f.strand),
                qualifiers,
            }
        })
        .collect();

    Ok(seq)
}

fn convert_gbio_location(location: &GbIoLocation) -> (GbkLocation, i8) {
    fn inner(location: &GbIoLocation) -> GbkLocation {
        match location {
            GbIoLocation::Range((start, before), (end, after)) => GbkLocation::Range(
                GbPosition::from_value_and_code(*start as u64, if before.0 { 0 } else { 1 }),
                GbPosition::from_value_and_code(*end as u64, if after.0 { 2 } else { 1 }),
            ),
            GbIoLocation::Between(a, b) => GbkLocation::Between(*a as u64, *b as u64),
            GbIoLocation::Complement(inner_loc) => GbkLocation::Complement(Box::new(inner(inner_loc))),
            GbIoLocation::Join(parts) => GbkLocation::Join(parts.iter().map(inner).collect()),
            other => {
                tracing::warn!(?other, "unsupported gb_io location variant, treating as a zero-width cut");
                GbkLocation::Between(0, 0)
            }
        }
    }

    let strand = if matches!(location, GbIoLocation::Complement(_)) { -1 } else { 1 };
    (inner(location), strand)
}

fn convert_to_gbio_location(location: &GbkLocation, strand: i8) -> GbIoLocation {
    fn inner(location: &GbkLocation) -> GbIoLocation {
        match location {
            GbkLocation::Range(start, end) => GbIoLocation::Range(
                (start.value() as i64, gb_io::seq::Before(start.fuzz_code() == 0)),
                (end.value() as i64, gb_io::seq::After(end.fuzz_code() == 2)),
            ),
            GbkLocation::Between(a, b) => GbIoLocation::Between(*a as i64, *b as i64),
            GbkLocation::Complement(inner_loc) => GbIoLocation::Complement(Box::new(inner(inner_loc))),
            GbkLocation::Join(parts) => GbIoLocation::Join(parts.iter().map(inner).collect()),
        }
    }
    let built = inner(location);
    if strand == -1 && !matches!(built, GbIoLocation::Complement(_)) {
        GbIoLocation::Complement(Box::new(built))
    } else {
        built
    }
}

/// NCBI structured comments are embedded as plain text inside `COMMENT` lines, delimited by
/// `##Heading-START##` / `##Heading-END##` markers, with `Key :: Value` lines in between.
fn split_structured_comments(
    comments: &[String],
) -> (IndexMap<String, IndexMap<String, String>>, Vec<String>) {
    let start_re = Regex::new(r"^##(.+)-START##$").unwrap();
    let end_re = Regex::new(r"^##(.+)-END##$").unwrap();

    let mut structured = IndexMap::new();
    let mut freeform = Vec::new();
    let mut current: Option<(String, IndexMap<String, String>)> = None;

    for block in comments {
        for line in block.lines() {
            let line = line.trim();
            if let Some(caps) = start_re.captures(line) {
                current = Some((caps[1].to_string(), IndexMap::new()));
                continue;
            }
            if let Some(caps) = end_re.captures(line) {
                if let Some((heading, kv)) = current.take() {
                    if heading == caps[1] {
                        structured.insert(heading, kv);
                        continue;
                    }
                }
                continue;
            }
            if let Some((_, kv)) = current.as_mut() {
                if let Some((key, value)) = line.split_once("::") {
                    kv.insert(key.trim().to_string(), value.trim().to_string());
                }
            } else if !line.is_empty() {
                freeform.push(line.to_string());
            }
        }
    }
    (structured, freeform)
}

fn render_structured_comments(sc: &IndexMap<String, IndexMap<String, String>>) -> String {
    let mut out = String::new();
    for (heading, kv) in sc {
        out.push_str(&format!("##{heading}-START##\n"));
        for (k, v) in kv {
            out.push_str(&format!("{k} :: {v}\n"));
        }
        out.push_str(&format!("##{heading}-END##\n"));
    }
    out
}

fn parse_reference_spans(description: &str) -> Vec<(u64, u64, i8)> {
    let re = Regex::new(r"(?i)bases?\s+(\d+)\s+to\s+(\d+)").unwrap();
    re.captures_iter(description)
        .filter_map(|caps| {
            let start: u64 = caps[1].parse().ok()?;
            let end: u64 = caps[2].parse().ok()?;
            Some((start, end, 1))
        })
        .collect()
}

fn render_reference_spans(spans: &[(u64, u64, i8)]) -> String {
    spans
        .iter()
        .map(|(start, end, _)| format!("(bases {start} to {end})"))
        .collect::<Vec<_>>()
        .join(", ")
}
