//! Top-level orchestration: plasmid pre-pass, legacy conversion, and the three output formats
//! the CLI binary writes. Library callers can also drive a `Document` directly without touching
//! the filesystem at all (see [`Driver::convert_document`]).

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{ConversionError, Result};
use crate::export;
use crate::feature::Feature;
use crate::gbk::{self, Record};
use crate::identified::Identified;
use crate::import;
use crate::legacy::{self, LegacyDocument};
use crate::ontologies::{ComponentRole, Ontology};
use crate::ontology::OntologyBridge;

/// Ties together the Ontology Bridge's CSV locations and the default identity namespace used
/// when importing a fresh GBK file.
pub struct Driver {
    pub namespace: String,
    pub gb2so_csv: PathBuf,
    pub so2gb_csv: PathBuf,
}

impl Driver {
    pub fn new(gb2so_csv: impl Into<PathBuf>, so2gb_csv: impl Into<PathBuf>) -> Self {
        Driver {
            namespace: crate::ontologies::DEFAULT_NAMESPACE.to_string(),
            gb2so_csv: gb2so_csv.into(),
            so2gb_csv: so2gb_csv.into(),
        }
    }

    fn load_bridge(&self) -> Result<OntologyBridge> {
        OntologyBridge::load(&self.gb2so_csv, &self.so2gb_csv)
    }

    /// Import every record in a GBK flat file into a fresh `Document`.
    pub fn import_gbk(&self, path: impl AsRef<Path>) -> Result<Document> {
        let bridge = self.load_bridge()?;
        let records = gbk::read_records(path)?;
        let mut doc = Document::new();
        for record in &records {
            import::import_record(&mut doc, &bridge, &self.namespace, record)?;
        }
        Ok(doc)
    }

    /// Run the primary export path: `Document` -> GBK records.
    pub fn export_gbk(&self, doc: &Document) -> Result<Vec<Record>> {
        let bridge = self.load_bridge()?;
        export::export_document(doc, &bridge)
    }

    /// Run the plasmid pre-pass, legacy conversion, validation, and legacy-to-GBK export in one
    /// call, returning the legacy document, its XML rendering, and the GBK records produced from
    /// it. Mirrors the secondary conversion path described for the driver.
    pub fn convert_via_legacy(&self, doc: &mut Document) -> Result<(LegacyDocument, String, Vec<Record>)> {
        plasmid_prepass(doc)?;

        let mut legacy_doc = LegacyDocument::new();
        let serializable: Vec<_> = doc
            .components()
            .filter(|c| !c.sequences.is_empty())
            .map(|c| c.identity.clone())
            .collect();
        for identity in &serializable {
            legacy::convert_toplevel(&mut legacy_doc, doc, identity)?;
        }

        legacy::validate(&legacy_doc)?;

        let bridge = self.load_bridge()?;
        let xml = legacy::to_xml(&legacy_doc)?;
        let records = legacy::export_to_gbk(&legacy_doc, &bridge)?;
        Ok((legacy_doc, xml, records))
    }

    /// Run the whole pipeline against an SGM document on disk, writing `<stem>.sbol2.xml`,
    /// `<stem>.gb`, and (optionally) `<stem>.fasta` next to it.
    pub fn run_file(&self, input_path: impl AsRef<Path>, emit_fasta: bool) -> Result<()> {
        let input_path = input_path.as_ref();
        let text = fs::read_to_string(input_path)?;
        let mut doc = Document::from_canonical_text(&text)?;

        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConversionError::Config(format!("input path `{}` has no file stem", input_path.display())))?;
        let parent = input_path.parent().unwrap_or_else(|| Path::new("."));

        let (_legacy_doc, xml, legacy_records) = self.convert_via_legacy(&mut doc)?;
        fs::write(parent.join(format!("{stem}.sbol2.xml")), xml)?;
        gbk::write_records(parent.join(format!("{stem}.gb")), &legacy_records)?;

        if emit_fasta {
            let fasta = render_fasta(&legacy_records);
            fs::write(parent.join(format!("{stem}.fasta")), fasta)?;
        }

        Ok(())
    }
}

/// Identify circular plasmid constructs (a Component with the `plasmid` role, or one of whose
/// owned SubComponents carries it), then rewrite the `description` of each SubComponent's
/// referenced Component to its own display id — a workaround for the legacy emitter's field
/// length limits.
pub fn plasmid_prepass(doc: &mut Document) -> Result<()> {
    let plasmid_role = ComponentRole::Plasmid.uri();

    let plasmid_identities: Vec<_> = doc
        .components()
        .filter(|c| is_plasmid_construct(doc, c, &plasmid_role))
        .map(|c| c.identity.clone())
        .collect();

    for plasmid_identity in &plasmid_identities {
        let component = doc
            .find(plasmid_identity)
            .and_then(|o| o.as_component())
            .expect("identity was just collected from doc.components()");

        let backbone_count = component
            .features
            .iter()
            .filter_map(Feature::as_sub_component)
            .filter(|sub| sub_instance_has_plasmid_role(doc, sub, &plasmid_role))
            .count();
        if backbone_count != 1 {
            return Err(ConversionError::Structural(format!(
                "plasmid Component `{}` must have exactly one plasmid-role SubComponent (the backbone), found {}",
                component.display_id().unwrap_or_default(),
                backbone_count
            )));
        }

        let referenced: Vec<_> = component
            .features
            .iter()
            .filter_map(Feature::as_sub_component)
            .map(|sub| sub.instance_of.clone())
            .collect();

        for referenced_identity in referenced {
            let display_id = doc
                .find(&referenced_identity)
                .and_then(|o| o.as_component())
                .and_then(|c| c.display_id.clone());
            let Some(display_id) = display_id else { continue };
            if let Some(referenced_component) = doc.find_mut(&referenced_identity).and_then(|o| o.as_component_mut())
            {
                referenced_component.description = Some(display_id);
            }
        }
    }

    Ok(())
}

fn is_plasmid_construct(doc: &Document, component: &crate::component::Component, plasmid_role: &url::Url) -> bool {
    component.has_plasmid_role(plasmid_role)
        || component
            .features
            .iter()
            .filter_map(Feature::as_sub_component)
            .any(|sub| sub_instance_has_plasmid_role(doc, sub, plasmid_role))
}

/// Resolves a `SubComponent`'s `instance_of` reference and tests the *referenced* Component's
/// roles — a SubComponent carries no roles of its own (see `feature.rs`).
fn sub_instance_has_plasmid_role(doc: &Document, sub: &crate::feature::SubComponent, plasmid_role: &url::Url) -> bool {
    doc.find(&sub.instance_of)
        .and_then(|o| o.as_component())
        .is_some_and(|c| c.has_plasmid_role(plasmid_role))
}

fn render_fasta(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push('>');
        out.push_str(&record.id);
        if !record.description.is_empty() {
            out.push(' ');
            out.push_str(&record.description);
        }
        out.push('\n');
        for chunk in record.seq.as_bytes().chunks(70) {
            out.push_str(std::str::from_utf8(chunk).unwrap_or(""));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::feature::SubComponent;
    use crate::location::{Fuzz, Location, Orientation};
    use url::Url;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn plasmid_role_component(doc: &mut Document, identity: Url) -> Url {
        let mut component = Component::new(identity.clone());
        component.roles.push(ComponentRole::Plasmid.uri());
        doc.add(component);
        identity
    }

    #[test]
    fn plasmid_prepass_requires_exactly_one_backbone() {
        let mut doc = Document::new();
        let backbone_identity = plasmid_role_component(&mut doc, url("https://test.sbol3.genbank/pUC19"));

        let plasmid_identity = url("https://test.sbol3.genbank/construct");
        let mut plasmid = Component::new(plasmid_identity.clone());
        let backbone = SubComponent::new(url("https://test.sbol3.genbank/construct/backbone"), backbone_identity);
        plasmid.features.push(Feature::Sub(backbone));
        doc.add(plasmid);

        assert!(plasmid_prepass(&mut doc).is_ok());
    }

    #[test]
    fn plasmid_prepass_rewrites_referenced_component_descriptions() {
        let mut doc = Document::new();

        let insert_identity = url("https://test.sbol3.genbank/insertA");
        doc.add(Component::new(insert_identity.clone()));

        let backbone_identity =
            plasmid_role_component(&mut doc, url("https://test.sbol3.genbank/pUC19backbone"));

        let plasmid_identity = url("https://test.sbol3.genbank/construct");
        let mut plasmid = Component::new(plasmid_identity.clone());
        let backbone = SubComponent::new(url("https://test.sbol3.genbank/construct/backbone"), backbone_identity);
        let mut insert_sub = SubComponent::new(url("https://test.sbol3.genbank/construct/insert"), insert_identity.clone());
        insert_sub.locations.push(Location::range(1, 100, Orientation::Forward, Fuzz::Exact, Fuzz::Exact));
        plasmid.features.push(Feature::Sub(backbone));
        plasmid.features.push(Feature::Sub(insert_sub));
        doc.add(plasmid);

        plasmid_prepass(&mut doc).unwrap();

        let insert = doc.find(&insert_identity).unwrap().as_component().unwrap();
        assert_eq!(insert.description.as_deref(), insert.display_id.as_deref());
    }

    #[test]
    fn plasmid_with_two_backbones_is_a_hard_error() {
        let mut doc = Document::new();
        let backbone_identity = plasmid_role_component(&mut doc, url("https://test.sbol3.genbank/pUC19"));

        let plasmid_identity = url("https://test.sbol3.genbank/construct");
        let mut plasmid = Component::new(plasmid_identity);
        for i in 0..2 {
            let backbone = SubComponent::new(
                url(&format!("https://test.sbol3.genbank/construct/backbone_{i}")),
                backbone_identity.clone(),
            );
            plasmid.features.push(Feature::Sub(backbone));
        }
        doc.add(plasmid);

        assert!(plasmid_prepass(&mut doc).is_err());
    }
}
