//! Error kinds for the conversion core.
//!
//! Fatal errors abort the whole document; no partial output is written. Non-fatal conditions
//! (ontology misses, orphaned side-cars, qualifier truncation) are logged via `tracing::warn!`
//! at the call site and do not appear here as `Err` values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// Ontology CSV missing or malformed.
    #[error("ontology configuration error: {0}")]
    Config(String),

    /// Component with >1 Sequence; more than one plasmid-role SubComponent in a plasmid;
    /// unknown orientation; unknown GBK annotation key.
    #[error("structural error: {0}")]
    Structural(String),

    /// The legacy converter encountered a top-level variant it does not dispatch on.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GenBank parse error: {0}")]
    GenBank(String),

    #[error("XML write error: {0}")]
    Xml(#[from] xml::writer::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
