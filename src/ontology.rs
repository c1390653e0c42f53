//! Ontology Bridge: translates feature-role terms between GenBank's controlled vocabulary and
//! the Sequence Ontology (SO).
//!
//! Two CSV tables back the bridge, one per direction. Only the direction(s) actually requested
//! are read from disk, matching the pattern of the original converter this crate generalizes.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConversionError, Result};

/// SO term returned when a GenBank feature type has no mapping.
pub const DEFAULT_SO_TERM: &str = "SO:0000110";

/// GenBank feature type emitted when an SO term has no mapping.
pub const DEFAULT_GB_TERM: &str = "misc_feature";

#[derive(Debug, Deserialize)]
struct Gb2SoRow {
    #[serde(rename = "GenBank_Ontology")]
    genbank_ontology: String,
    #[serde(rename = "SO_Ontology")]
    so_ontology: String,
}

#[derive(Debug, Deserialize)]
struct So2GbRow {
    #[serde(rename = "SO_Ontology")]
    so_ontology: String,
    #[serde(rename = "GenBank_Ontology")]
    genbank_ontology: String,
}

/// Loaded GenBank-term <-> SO-term translation tables.
#[derive(Debug, Default)]
pub struct OntologyBridge {
    gb_to_so: HashMap<String, String>,
    so_to_gb: HashMap<String, String>,
}

impl OntologyBridge {
    /// Load only the GenBank -> SO table, used by the importer.
    pub fn load_gb_to_so(gb2so_csv: impl AsRef<Path>) -> Result<Self> {
        let gb_to_so = read_mapping_csv(gb2so_csv.as_ref(), |row: Gb2SoRow| {
            (row.genbank_ontology, row.so_ontology)
        })?;
        Ok(Self {
            gb_to_so,
            so_to_gb: HashMap::new(),
        })
    }

    /// Load only the SO -> GenBank table, used by the exporter.
    pub fn load_so_to_gb(so2gb_csv: impl AsRef<Path>) -> Result<Self> {
        let so_to_gb = read_mapping_csv(so2gb_csv.as_ref(), |row: So2GbRow| {
            (row.so_ontology, row.genbank_ontology)
        })?;
        Ok(Self {
            gb_to_so: HashMap::new(),
            so_to_gb,
        })
    }

    /// Load both tables at once, used by tests and by any caller that round-trips in one process.
    pub fn load(gb2so_csv: impl AsRef<Path>, so2gb_csv: impl AsRef<Path>) -> Result<Self> {
        let gb_to_so = read_mapping_csv(gb2so_csv.as_ref(), |row: Gb2SoRow| {
            (row.genbank_ontology, row.so_ontology)
        })?;
        let so_to_gb = read_mapping_csv(so2gb_csv.as_ref(), |row: So2GbRow| {
            (row.so_ontology, row.genbank_ontology)
        })?;
        Ok(Self { gb_to_so, so_to_gb })
    }

    /// Look up the bare SO term (e.g. `"SO:0000316"`) for a GenBank feature type.
    ///
    /// Falls back to [`DEFAULT_SO_TERM`] and logs a warning on miss.
    pub fn gb_to_so(&self, term: &str) -> String {
        match self.gb_to_so.get(term) {
            Some(so) => so.clone(),
            None => {
                tracing::warn!(gb_term = term, "no SO mapping for GenBank feature type, using default");
                DEFAULT_SO_TERM.to_string()
            }
        }
    }

    /// Look up the GenBank feature type for a bare SO term.
    ///
    /// Falls back to [`DEFAULT_GB_TERM`] and logs a warning on miss.
    pub fn so_to_gb(&self, term: &str) -> String {
        match self.so_to_gb.get(term) {
            Some(gb) => gb.clone(),
            None => {
                tracing::warn!(so_term = term, "no GenBank mapping for SO term, using default");
                DEFAULT_GB_TERM.to_string()
            }
        }
    }
}

fn read_mapping_csv<T, F>(path: &Path, extract: F) -> Result<HashMap<String, String>>
where
    T: for<'de> Deserialize<'de>,
    F: Fn(T) -> (String, String),
{
    tracing::info!(path = %path.display(), "loading ontology mapping CSV");
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            tracing::error!(path = %path.display(), "ontology CSV missing or unreadable: {e}");
            ConversionError::Config(format!(
                "Required CSV data file `{}` is not present. Please reinstall the package. ({e})",
                path.display()
            ))
        })?;

    let mut map = HashMap::new();
    for result in reader.deserialize() {
        // Tolerate trailing blank lines (and other malformed rows) in the CSV, as the spec
        // requires; only a missing file is a hard error.
        let row: T = match result {
            Ok(row) => row,
            Err(_) => continue,
        };
        let (key, value) = extract(row);
        if !key.is_empty() {
            map.insert(key, value);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn looks_up_known_terms_in_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        let gb2so = write_csv(
            &dir,
            "gb2so.csv",
            "GenBank_Ontology,SO_Ontology\nCDS,SO:0000316\n  promoter , SO:0000167\n\n",
        );
        let so2gb = write_csv(
            &dir,
            "so2gb.csv",
            "SO_Ontology,GenBank_Ontology\nSO:0000316,CDS\nSO:0000167,promoter\n",
        );
        let bridge = OntologyBridge::load(&gb2so, &so2gb).unwrap();
        assert_eq!(bridge.gb_to_so("CDS"), "SO:0000316");
        assert_eq!(bridge.gb_to_so("promoter"), "SO:0000167");
        assert_eq!(bridge.so_to_gb("SO:0000316"), "CDS");
    }

    #[test]
    fn falls_back_to_defaults_on_miss() {
        let dir = tempfile::tempdir().unwrap();
        let gb2so = write_csv(&dir, "gb2so.csv", "GenBank_Ontology,SO_Ontology\nCDS,SO:0000316\n");
        let so2gb = write_csv(&dir, "so2gb.csv", "SO_Ontology,GenBank_Ontology\nSO:0000316,CDS\n");
        let bridge = OntologyBridge::load(&gb2so, &so2gb).unwrap();
        assert_eq!(bridge.gb_to_so("nonexistent_type"), DEFAULT_SO_TERM);
        assert_eq!(bridge.so_to_gb("SO:9999999"), DEFAULT_GB_TERM);
    }

    #[test]
    fn missing_csv_is_a_hard_error() {
        let err = OntologyBridge::load("/nonexistent/gb2so.csv", "/nonexistent/so2gb.csv").unwrap_err();
        assert!(matches!(err, ConversionError::Config(_)));
    }
}
