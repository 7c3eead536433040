//! Event-based filtering of the labeled sequence table
//!
//! Two query styles, mirroring the front end's filter panel:
//! - by item code, requiring all (or any) of the codes to be present;
//! - by event name, matched as a case-insensitive substring through the
//!   mapping's inverse index, any-of semantics.

use crate::mapping::EventMapping;
use crate::matcher::{Element, SequenceTable};

/// Whether a sequence must contain all query codes or at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMatch {
    All,
    Any,
}

/// Keep the sequences containing the query codes.
///
/// An empty query keeps everything.
pub fn filter_by_event_codes(
    table: &SequenceTable,
    codes: &[u32],
    mode: EventMatch,
) -> SequenceTable {
    if codes.is_empty() {
        return table.clone();
    }
    let keep = table
        .iter()
        .filter(|seq| {
            let has = |code: &u32| {
                seq.events.iter().any(|e| match e {
                    Element::Item(item) => item == code,
                    Element::Simultaneous(items) => items.contains(code),
                })
            };
            match mode {
                EventMatch::All => codes.iter().all(has),
                EventMatch::Any => codes.iter().any(has),
            }
        })
        .cloned()
        .collect();
    SequenceTable::new(keep)
}

/// Keep the sequences matching any of the name queries.
///
/// Queries resolve to codes via case-insensitive substring match over event
/// names. Empty queries (or all-blank queries) keep everything; queries that
/// match nothing in the mapping yield an empty table.
pub fn filter_by_event_names(
    table: &SequenceTable,
    queries: &[String],
    mapping: &EventMapping,
) -> SequenceTable {
    if queries.is_empty() || queries.iter().all(|q| q.trim().is_empty()) {
        return table.clone();
    }

    let mut codes = Vec::new();
    for query in queries {
        if !query.trim().is_empty() {
            codes.extend(mapping.codes_matching(query.trim()));
        }
    }

    if codes.is_empty() {
        return SequenceTable::default();
    }
    filter_by_event_codes(table, &codes, EventMatch::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{EventInfo, EventMapping};
    use crate::matcher::LabeledSequence;

    fn table() -> SequenceTable {
        SequenceTable::new(vec![
            LabeledSequence {
                id: "s1".to_string(),
                events: vec![Element::Item(10), Element::Item(11)],
            },
            LabeledSequence {
                id: "s2".to_string(),
                events: vec![Element::Item(11)],
            },
            LabeledSequence {
                id: "s3".to_string(),
                events: vec![Element::Simultaneous(vec![10, 12])],
            },
        ])
    }

    fn mapping() -> EventMapping {
        EventMapping::from_entries([
            (
                10,
                EventInfo {
                    event: "catering started".to_string(),
                    parent: None,
                    tag: None,
                },
            ),
            (
                11,
                EventInfo {
                    event: "late catering started".to_string(),
                    parent: Some(10),
                    tag: Some("late".to_string()),
                },
            ),
        ])
    }

    #[test]
    fn all_mode_requires_every_code() {
        let filtered = filter_by_event_codes(&table(), &[10, 11], EventMatch::All);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.iter().next().unwrap().id, "s1");
    }

    #[test]
    fn any_mode_accepts_one_code() {
        let filtered = filter_by_event_codes(&table(), &[10], EventMatch::Any);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn tuple_members_count_for_filters() {
        let filtered = filter_by_event_codes(&table(), &[12], EventMatch::Any);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.iter().next().unwrap().id, "s3");
    }

    #[test]
    fn empty_code_query_keeps_everything() {
        assert_eq!(filter_by_event_codes(&table(), &[], EventMatch::All).len(), 3);
    }

    #[test]
    fn name_query_resolves_through_mapping() {
        let filtered = filter_by_event_names(&table(), &["catering".to_string()], &mapping());
        // Codes 10 and 11 both match "catering"; any-of semantics.
        assert_eq!(filtered.len(), 3);

        let filtered = filter_by_event_names(&table(), &["late".to_string()], &mapping());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn unmatched_name_query_yields_empty_table() {
        let filtered = filter_by_event_names(&table(), &["deicing".to_string()], &mapping());
        assert!(filtered.is_empty());
    }

    #[test]
    fn blank_name_queries_keep_everything() {
        let filtered = filter_by_event_names(&table(), &["  ".to_string()], &mapping());
        assert_eq!(filtered.len(), 3);
    }
}
