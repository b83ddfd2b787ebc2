//! # Extração de Conjuntos de Spans
//!
//! Um registro vira um conjunto de triplas `(start, end, label)` com offsets
//! meio-abertos sobre o **texto renderizado** do registro.
//!
//! Uma única varredura do fluxo de eventos com um contador `pos`:
//! - `Text(t)`: `pos += len(t)`
//! - `SpanStart(L)`: guarda `start = pos`
//! - `SpanEnd`: emite `(start, pos, L)`
//!
//! Os offsets contam caracteres (valores escalares Unicode), não bytes. Dois
//! documentos com marcação diferente mas o mesmo texto renderizado produzem as
//! mesmas triplas.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::Record;
use crate::events::Event;

/// Uma entrada do conjunto de spans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanEntry {
    /// Offset inicial em caracteres (inclusivo)
    pub start: usize,
    /// Offset final em caracteres (exclusivo)
    pub end: usize,
    pub label: String,
}

impl SpanEntry {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// Conjunto de spans de um registro. Ordenado só para saída determinística.
pub type SpanSet = BTreeSet<SpanEntry>;

/// Calcula o conjunto de spans a partir de qualquer fluxo de eventos.
pub fn span_set_from_events<'a, I>(events: I) -> SpanSet
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut set = SpanSet::new();
    let mut pos = 0usize;
    let mut open: Option<(usize, &'a str)> = None;

    for event in events {
        match event {
            Event::Text(text) => pos += text.chars().count(),
            Event::SpanStart(label) => open = Some((pos, label)),
            Event::SpanEnd => {
                if let Some((start, label)) = open.take() {
                    set.insert(SpanEntry::new(start, pos, label));
                }
            }
        }
    }

    set
}

/// Conjunto de spans de um registro.
pub fn record_to_set(record: &Record) -> SpanSet {
    span_set_from_events(record.events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_record, Node};

    #[test]
    fn test_offsets_match_rendered_text() {
        let record = parse_record(
            br#"<r xmlns="http://innodatalabs.com/brs">Hello, <s l="word">beautiful world</s>!</r>"#,
        )
        .unwrap();
        let set = record_to_set(&record);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![SpanEntry::new(7, 22, "word")]);
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let record = Record::new(vec![Node::text("Ação "), Node::span("x", "né")]);
        let set = record_to_set(&record);
        let entry = set.iter().next().unwrap();
        assert_eq!((entry.start, entry.end), (5, 7));
        let chars: Vec<char> = record.text().chars().collect();
        assert_eq!(chars[entry.start..entry.end].iter().collect::<String>(), "né");
    }

    #[test]
    fn test_structure_does_not_matter_only_text() {
        let flat = Record::new(vec![Node::text("ab"), Node::span("x", "cd")]);
        let split = Record::new(vec![
            Node::text("a"),
            Node::text("b"),
            Node::span("x", "cd"),
        ]);
        assert_eq!(record_to_set(&flat), record_to_set(&split));
    }

    #[test]
    fn test_duplicates_collapse() {
        let events = vec![
            Event::SpanStart("x"),
            Event::SpanEnd,
            Event::SpanStart("x"),
            Event::SpanEnd,
        ];
        assert_eq!(span_set_from_events(events).len(), 1);
    }
}
