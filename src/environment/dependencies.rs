//! Dependency entries and the dependency ledger.
//!
//! A `dependencies` section in an environment document is an ordered list
//! of entries, each either a bare constraint string for the native
//! namespace or a single-key mapping routing a batch of constraints to a
//! named installer namespace:
//!
//! ```yaml
//! dependencies:
//!   - python=3.12
//!   - numpy
//!   - pip:
//!       - requests==2.32
//!       - rich
//! ```
//!
//! The [`DependencyLedger`] keeps the declared list verbatim (`raw`, the
//! source of truth for re-serialization) alongside a per-namespace grouping
//! that is re-derived from `raw` after every mutation. The derived mapping
//! is never patched by hand.

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NATIVE_NAMESPACE;

/// A single entry in a document's `dependencies` list.
///
/// Validated once at parse time: a namespaced batch must be a mapping with
/// exactly one key, whose value is a sequence of strings. Consumers never
/// re-inspect the YAML shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyEntry {
    /// A bare package constraint for the native namespace,
    /// e.g. `python=3.12`.
    Constraint(String),
    /// A batch of constraints routed to a non-default installer namespace,
    /// e.g. `pip: [requests, rich]`.
    Batch {
        /// The installer namespace the batch is routed to.
        namespace: String,
        /// The constraints for that namespace, in declaration order.
        entries: Vec<String>,
    },
}

impl Serialize for DependencyEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Constraint(spec) => serializer.serialize_str(spec),
            Self::Batch { namespace, entries } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(namespace, entries)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DependencyEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = DependencyEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a constraint string or a single-key namespace mapping")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(DependencyEntry::Constraint(value.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (namespace, entries): (String, Vec<String>) = map
                    .next_entry()?
                    .ok_or_else(|| de::Error::custom("namespace mapping must not be empty"))?;
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom(
                        "namespace mapping must have exactly one key",
                    ));
                }
                Ok(DependencyEntry::Batch { namespace, entries })
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

/// Normalize a bare constraint string.
///
/// Inline whitespace-separated version/build qualifiers are rewritten with
/// `=` separators, so `numpy 1.26 py312` and `numpy=1.26=py312` derive to
/// the same constraint. Surrounding whitespace is dropped.
fn normalize_constraint(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("=")
}

/// Ordered dependency declarations plus their per-namespace grouping.
///
/// `raw` is the sequence of entries exactly as declared (and as it will be
/// re-serialized); the namespace mapping is always exactly the result of
/// deriving `raw`. Duplicate entries are preserved - the ledger performs
/// no deduplication, which is a documented limitation rather than a bug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLedger {
    raw: Vec<DependencyEntry>,
    by_namespace: IndexMap<String, Vec<String>>,
}

impl DependencyLedger {
    /// Build a ledger from raw entries and derive the namespace mapping.
    #[must_use]
    pub fn new(raw: Vec<DependencyEntry>) -> Self {
        let mut ledger = Self {
            raw,
            by_namespace: IndexMap::new(),
        };
        ledger.parse();
        ledger
    }

    /// Recompute the namespace mapping from `raw`.
    ///
    /// An empty `raw` leaves the mapping empty; otherwise the native
    /// namespace is guaranteed to exist (possibly with no constraints)
    /// before any entry is processed. Declaration order is preserved
    /// within and across namespaces. Idempotent for an unchanged `raw`.
    pub(crate) fn parse(&mut self) {
        self.by_namespace.clear();
        if self.raw.is_empty() {
            return;
        }

        self.by_namespace
            .entry(NATIVE_NAMESPACE.to_string())
            .or_default();

        for entry in &self.raw {
            match entry {
                DependencyEntry::Constraint(spec) => {
                    self.by_namespace
                        .entry(NATIVE_NAMESPACE.to_string())
                        .or_default()
                        .push(normalize_constraint(spec));
                }
                DependencyEntry::Batch { namespace, entries } => {
                    self.by_namespace
                        .entry(namespace.clone())
                        .or_default()
                        .extend(entries.iter().cloned());
                }
            }
        }
    }

    /// Append an entry to `raw` and re-derive the mapping.
    ///
    /// Duplicates are not suppressed.
    pub fn add(&mut self, entry: DependencyEntry) {
        self.raw.push(entry);
        self.parse();
    }

    /// Fold another ledger's declarations in front of this one's.
    ///
    /// The other ledger's entries come first so that this ledger's own
    /// entries stay last in merge order; intra-list order of both sides is
    /// preserved. The mapping is re-derived afterwards.
    pub fn include(&mut self, other: &DependencyLedger) {
        let mut merged = other.raw.clone();
        merged.append(&mut self.raw);
        self.raw = merged;
        self.parse();
    }

    /// The entries exactly as declared.
    #[must_use]
    pub fn raw(&self) -> &[DependencyEntry] {
        &self.raw
    }

    /// The derived mapping of namespace name to ordered constraints.
    #[must_use]
    pub fn by_namespace(&self) -> &IndexMap<String, Vec<String>> {
        &self.by_namespace
    }

    /// The derived constraint list for one namespace, if present.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&[String]> {
        self.by_namespace.get(name).map(Vec::as_slice)
    }

    /// Whether the ledger holds no declarations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
