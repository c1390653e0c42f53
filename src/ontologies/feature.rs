use url::Url;

use super::{Ontology, SO_NS, SGM_NS, INVALID_URI};

/// Ontology terms for a `Feature`'s orientation relative to its `Sequence`.
///
/// `Inline`/`ReverseComplement` are the SO terms; `InlineAlt`/`ReverseComplementAlt` are SGM's
/// own fallback terms for contexts where an SO term isn't appropriate.
pub enum OrientationTerm {
    /// The region specified by this `Feature` or `Location` is on the `elements` of a `Sequence`
    Inline,
    /// The region specified by this `Feature` or `Location` is on the reverse-complement mapping
    /// of the `elements` of a `Sequence`. The exact nature of this mapping depends on the
    /// `encoding` of the `Sequence`.
    ReverseComplement,
    InlineAlt,
    ReverseComplementAlt,
}
impl Ontology for OrientationTerm {
    fn uri(&self) -> url::Url {
        let uri = match self {
            Self::Inline => SO_NS.to_string() + "0001030",
            Self::ReverseComplement => SO_NS.to_string() + "0001031",
            Self::InlineAlt => SGM_NS.to_string() + "inline",
            Self::ReverseComplementAlt => SGM_NS.to_string() + "reverseComplement",
        };
        Url::parse(uri.as_str()).expect(INVALID_URI)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::ontologies::{Ontology, OrientationTerm};

    #[test]
    fn test_inline() {
        let val = OrientationTerm::Inline;
        let expected = Url::parse("https://identifiers.org/SO:0001030").unwrap();
        assert_eq!(val.uri(), expected);
    }
    #[test]
    fn test_reverse_complement() {
        let val = OrientationTerm::ReverseComplement;
        let expected = Url::parse("https://identifiers.org/SO:0001031").unwrap();
        assert_eq!(val.uri(), expected);
    }
    #[test]
    fn test_inline_alt() {
        let val = OrientationTerm::InlineAlt;
        let expected = Url::parse("https://sbols.org/v3#inline").unwrap();
        assert_eq!(val.uri(), expected);
    }
    #[test]
    fn test_reverse_complement_alt() {
        let val = OrientationTerm::ReverseComplementAlt;
        let expected = Url::parse("https://sbols.org/v3#reverseComplement").unwrap();
        assert_eq!(val.uri(), expected);
    }
}
