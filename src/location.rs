//! Canonical feature-location representation shared by the importer, exporter, and legacy walk.
//!
//! A single `Location` type stands in for both the distilled spec's base `Range`/`Cut` and its
//! "Extended Range": rather than modeling fuzz as a bolt-on type that only some locations carry,
//! every `Range` always carries `start_fuzz`/`end_fuzz` (defaulting to `Exact`). Whether a
//! feature is routed to `features` or `fuzzy_features` is then just a question of whether any of
//! its locations report [`Location::is_fuzzy`] — see `DESIGN.md` for the rationale.

use serde::{Deserialize, Serialize};

/// Strand/orientation of a location relative to its `Sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    /// GenBank strand `-1` is reverse; anything else (including absent) is forward.
    pub fn from_gb_strand(strand: i8) -> Self {
        if strand == -1 {
            Orientation::Reverse
        } else {
            Orientation::Forward
        }
    }

    pub fn to_gb_strand(self) -> i8 {
        match self {
            Orientation::Forward => 1,
            Orientation::Reverse => -1,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }
}

/// Endpoint fuzz: whether a coordinate is exact or merely a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fuzz {
    Before = 0,
    Exact = 1,
    After = 2,
}

impl Fuzz {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Fuzz::Before,
            2 => Fuzz::After,
            _ => Fuzz::Exact,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A canonical feature location: a zero-width cut, a (possibly fuzzy) range, or a join of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Cut {
        at: u64,
        orientation: Orientation,
    },
    Range {
        start: u64,
        end: u64,
        orientation: Orientation,
        start_fuzz: Fuzz,
        end_fuzz: Fuzz,
    },
    /// A GenBank `join(...)` / `complement(join(...))`. `orientation` is the *outer* orientation
    /// used to decide sort direction on export; each part keeps its own orientation as parsed.
    Compound {
        parts: Vec<Location>,
        orientation: Orientation,
    },
}

impl Location {
    /// Construct a range, collapsing to a [`Location::Cut`] when `start == end`, per invariant 4.
    pub fn range(
        start: u64,
        end: u64,
        orientation: Orientation,
        start_fuzz: Fuzz,
        end_fuzz: Fuzz,
    ) -> Self {
        assert!(start <= end, "range start must not exceed end");
        if start == end {
            Location::Cut { at: start, orientation }
        } else {
            Location::Range {
                start,
                end,
                orientation,
                start_fuzz,
                end_fuzz,
            }
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Location::Cut { orientation, .. } => *orientation,
            Location::Range { orientation, .. } => *orientation,
            Location::Compound { orientation, .. } => *orientation,
        }
    }

    /// Whether any endpoint in this location (recursively, for compounds) is non-`Exact`.
    ///
    /// A feature with any fuzzy location must be routed to `fuzzy_features` rather than
    /// `features` (the base `Range` cannot express fuzz).
    pub fn is_fuzzy(&self) -> bool {
        match self {
            Location::Cut { .. } => false,
            Location::Range {
                start_fuzz, end_fuzz, ..
            } => *start_fuzz != Fuzz::Exact || *end_fuzz != Fuzz::Exact,
            Location::Compound { parts, .. } => parts.iter().any(Location::is_fuzzy),
        }
    }

    /// Sort key used to order compound parts and, flattened, whole features: `(start, end, strand)`.
    pub fn sort_key(&self) -> (u64, u64, i8) {
        match self {
            Location::Cut { at, orientation } => (*at, *at, orientation.to_gb_strand()),
            Location::Range {
                start, end, orientation, ..
            } => (*start, *end, orientation.to_gb_strand()),
            Location::Compound { parts, orientation } => {
                let start = parts.iter().map(|p| p.sort_key().0).min().unwrap_or(0);
                let end = parts.iter().map(|p| p.sort_key().1).max().unwrap_or(0);
                (start, end, orientation.to_gb_strand())
            }
        }
    }

    /// Flattened `(start, end)` pairs in document order, used to build the exporter's feature
    /// sort key `(location-positions, strand, qualifier-count, type)`.
    pub fn flattened_positions(&self) -> Vec<(u64, u64)> {
        match self {
            Location::Cut { at, .. } => vec![(*at, *at)],
            Location::Range { start, end, .. } => vec![(*start, *end)],
            Location::Compound { parts, .. } => {
                parts.iter().flat_map(Location::flattened_positions).collect()
            }
        }
    }

    /// Sort compound parts ascending by `(start, end, strand)` when the outer orientation is
    /// forward, descending when reverse. Deterministic; part of the round-trip contract.
    pub fn sort_compound_parts(parts: &mut [Location], outer: Orientation) {
        parts.sort_by_key(Location::sort_key);
        if outer == Orientation::Reverse {
            parts.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_equal_endpoints_collapses_to_cut() {
        let loc = Location::range(5, 5, Orientation::Forward, Fuzz::Exact, Fuzz::Exact);
        assert_eq!(
            loc,
            Location::Cut {
                at: 5,
                orientation: Orientation::Forward
            }
        );
    }

    #[test]
    fn fuzzy_range_is_detected() {
        let exact = Location::range(1, 300, Orientation::Forward, Fuzz::Exact, Fuzz::Exact);
        assert!(!exact.is_fuzzy());

        let fuzzy = Location::range(1, 300, Orientation::Forward, Fuzz::Before, Fuzz::Exact);
        assert!(fuzzy.is_fuzzy());
    }

    #[test]
    fn compound_sort_order_is_deterministic() {
        let mut parts = vec![
            Location::range(200, 250, Orientation::Reverse, Fuzz::Exact, Fuzz::Exact),
            Location::range(1, 100, Orientation::Forward, Fuzz::Exact, Fuzz::Exact),
        ];
        Location::sort_compound_parts(&mut parts, Orientation::Forward);
        assert_eq!(parts[0].sort_key(), (1, 100, 1));
        assert_eq!(parts[1].sort_key(), (200, 250, -1));

        let mut parts_rev = parts.clone();
        Location::sort_compound_parts(&mut parts_rev, Orientation::Reverse);
        assert_eq!(parts_rev[0].sort_key(), (200, 250, -1));
        assert_eq!(parts_rev[1].sort_key(), (1, 100, 1));
    }
}
