//! Bidirectional code↔event mapping
//!
//! The mining engine only understands integer item codes, so a mapping table
//! translates codes back to human-readable event names for display. Two maps
//! are kept, one per direction, so both lookups stay O(1) instead of
//! scanning the forward map for reverse queries.
//!
//! Tagged entries (e.g. "late fueler connected") point at their base event
//! through `parent` and carry a `tag` qualifier; base entries have neither.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One entry of the code→event table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    /// Human-readable event name
    pub event: String,
    /// Code of the base event this tagged entry belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    /// Qualifier tag ("late", "short", ...); first letter feeds matrix markers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Read-only code↔event lookup, loaded once at process start
#[derive(Debug, Clone, Default)]
pub struct EventMapping {
    code_to_event: BTreeMap<u32, EventInfo>,
    event_to_code: HashMap<String, u32>,
}

impl EventMapping {
    /// Build the mapping from code-keyed entries, deriving the inverse index.
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, EventInfo)>) -> Self {
        let code_to_event: BTreeMap<u32, EventInfo> = entries.into_iter().collect();
        let event_to_code = code_to_event
            .iter()
            .map(|(code, info)| (info.event.clone(), *code))
            .collect();
        Self {
            code_to_event,
            event_to_code,
        }
    }

    /// Load the mapping from its JSON form: an object keyed by item code.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, EventInfo> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (key, info) in raw {
            let code = key.parse::<u32>().map_err(|_| {
                serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("mapping key {key:?} is not an item code"),
                ))
            })?;
            entries.insert(code, info);
        }
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.code_to_event.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_event.is_empty()
    }

    /// Event name for a code; unknown codes fall back to the code itself so
    /// display paths never fail on partial mappings.
    pub fn event_name(&self, code: u32) -> String {
        self.code_to_event
            .get(&code)
            .map(|info| info.event.clone())
            .unwrap_or_else(|| code.to_string())
    }

    /// Parent category of a code; base events (and unknown codes) map to
    /// themselves.
    pub fn parent_or_self(&self, code: u32) -> u32 {
        self.code_to_event
            .get(&code)
            .and_then(|info| info.parent)
            .unwrap_or(code)
    }

    /// Uppercase first letter of the code's tag, if any
    pub fn tag_initial(&self, code: u32) -> Option<char> {
        self.code_to_event
            .get(&code)?
            .tag
            .as_ref()?
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }

    /// Reverse lookup: exact event name to code
    pub fn code_of(&self, event: &str) -> Option<u32> {
        self.event_to_code.get(event).copied()
    }

    /// Codes whose event name contains the query, case-insensitively.
    /// Used for name-based sequence filtering.
    pub fn codes_matching(&self, query: &str) -> Vec<u32> {
        let query = query.to_lowercase();
        self.code_to_event
            .iter()
            .filter(|(_, info)| info.event.to_lowercase().contains(&query))
            .map(|(code, _)| *code)
            .collect()
    }

    /// Iterate entries in code order
    pub fn entries(&self) -> impl Iterator<Item = (u32, &EventInfo)> {
        self.code_to_event.iter().map(|(code, info)| (*code, info))
    }
}
