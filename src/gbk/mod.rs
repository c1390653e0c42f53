//! The crate's own flat GenBank record AST.
//!
//! The distilled spec assumes a GBK parser/emitter is available as an external library and
//! names only the shape of the record it must produce. That library is the `gb-io` crate; the
//! [`adapter`] submodule is the thin translation layer between `gb_io`'s native types and the
//! [`Record`] type defined here. Keeping that boundary means the importer/exporter (the actual
//! subject of this crate) never names a `gb_io` type directly.

mod adapter;

pub use adapter::{read_records, write_records};

use indexmap::IndexMap;

/// One annotation value as it appears in `Record::annotations`.
///
/// This covers exactly the keys enumerated in the spec's annotation enumeration (§6); an
/// unrecognized key reaching the importer is a hard [`crate::error::ConversionError::Structural`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Text(String),
    List(Vec<String>),
    References(Vec<RecordReference>),
    StructuredComment(IndexMap<String, IndexMap<String, String>>),
}

impl AnnotationValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnnotationValue::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// A single bibliographic reference attached to a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordReference {
    pub authors: Option<String>,
    pub comment: Option<String>,
    pub journal: Option<String>,
    pub consortium: Option<String>,
    pub title: Option<String>,
    pub medline_id: Option<String>,
    pub pubmed_id: Option<String>,
    /// `(start, end, strand)` spans this reference applies to, in file order.
    pub locations: Vec<(u64, u64, i8)>,
}

/// A GenBank endpoint position class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GbPosition {
    Before(u64),
    Exact(u64),
    After(u64),
}

impl GbPosition {
    pub fn value(self) -> u64 {
        match self {
            GbPosition::Before(v) | GbPosition::Exact(v) | GbPosition::After(v) => v,
        }
    }

    pub fn fuzz_code(self) -> u8 {
        match self {
            GbPosition::Before(_) => 0,
            GbPosition::Exact(_) => 1,
            GbPosition::After(_) => 2,
        }
    }

    pub fn from_value_and_code(value: u64, code: u8) -> Self {
        match code {
            0 => GbPosition::Before(value),
            2 => GbPosition::After(value),
            _ => GbPosition::Exact(value),
        }
    }
}

/// A GenBank feature location, prior to strand/fuzz normalization into [`crate::location::Location`].
#[derive(Debug, Clone, PartialEq)]
pub enum GbkLocation {
    Range(GbPosition, GbPosition),
    /// A zero-width cut, e.g. `n^n+1`.
    Between(u64, u64),
    Complement(Box<GbkLocation>),
    Join(Vec<GbkLocation>),
}

/// One feature within a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFeature {
    pub kind: String,
    /// Qualifiers in file order; GenBank allows repeated keys, so values are a list per key, but
    /// insertion order of the *keys themselves* is also preserved via `IndexMap`.
    pub qualifiers: IndexMap<String, Vec<String>>,
    pub location: GbkLocation,
    pub strand: i8,
}

/// One record (one `LOCUS` ... `//` block) from a GenBank file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub description: String,
    pub seq: String,
    pub annotations: IndexMap<String, AnnotationValue>,
    pub dbxrefs: Vec<String>,
    pub features: Vec<RecordFeature>,
}
