//! Result types for detection output.
//!
//! Everything here is plain data: no node references survive into the
//! result, so it can be serialized and sent across a process boundary.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One piece of readable content extracted from a structure member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    /// An anchor with an href and visible text.
    Link {
        href: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    /// An image; `src` is blank when an inline data URI was suppressed.
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    /// A visible text fragment not already part of a link.
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    /// The whole visible text of a member (fulltext mode).
    Fulltext {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
}

impl ContentItem {
    /// Whether this is a link whose trimmed text is non-empty.
    #[must_use]
    pub fn is_link_with_text(&self) -> bool {
        matches!(self, Self::Link { text, .. } if !text.trim().is_empty())
    }

    /// Class annotation, when `add_class` was enabled.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::Link { class, .. }
            | Self::Image { class, .. }
            | Self::Text { class, .. }
            | Self::Fulltext { class, .. } => class.as_deref(),
        }
    }
}

/// Extracted content of one structure: one item list per member, in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureRecord {
    pub members: Vec<Vec<ContentItem>>,
}

impl StructureRecord {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Facts about one detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// Aligned structures found before any content filtering.
    pub num_candidate_structures: usize,
    /// Wall-clock time of the whole run.
    pub time_elapsed_ms: f64,
}

/// Output of a detection run.
///
/// Serializes to one JSON object: the structure identifiers in discovery
/// order (`structure_0`, `structure_1`, ...), followed by `metadata`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectResult {
    structures: Vec<(String, StructureRecord)>,
    pub metadata: RunMetadata,
}

impl DetectResult {
    pub(crate) fn new(records: Vec<StructureRecord>, metadata: RunMetadata) -> Self {
        let structures = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| (format!("structure_{i}"), record))
            .collect();
        Self { structures, metadata }
    }

    /// Number of kept structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Look a structure up by identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StructureRecord> {
        self.structures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    /// Structures in discovery order, with their identifiers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructureRecord)> {
        self.structures.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Kept records without identifiers, in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &StructureRecord> {
        self.structures.iter().map(|(_, r)| r)
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to an indented JSON string.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for DetectResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.structures.len() + 1))?;
        for (name, record) in &self.structures {
            map.serialize_entry(name, record)?;
        }
        map.serialize_entry("metadata", &self.metadata)?;
        map.end()
    }
}
