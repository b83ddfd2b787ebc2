//! # Codificador: tokens + tags IOB → registro
//!
//! Percorre os tokens da esquerda para a direita mantendo no máximo um
//! acumulador pendente, que é texto corrido ou um span aberto:
//!
//! | Tag      | Ação                                                     |
//! |----------|----------------------------------------------------------|
//! | `O`      | fecha o span aberto; token vai para o texto corrido      |
//! | `B-L`    | fecha o pendente; abre span `L` com o token              |
//! | `I-L`    | span `L` aberto: anexa. Caso contrário: age como `B-L`   |
//!
//! Tokens são concatenados sem separador: espaços já são tokens.
//!
//! ## Exemplo
//!
//! ```rust
//! use brs_core::{record_from_tokens_and_labels, write_record, NamespacePrefix};
//!
//! let record = record_from_tokens_and_labels(
//!     &["Hello", ",", " ", "beautiful", " ", "world", "!"],
//!     &["O", "O", "O", "B-word", "I-word", "I-word", "O"],
//! ).unwrap();
//!
//! assert_eq!(
//!     write_record(&record, &NamespacePrefix::Default).unwrap(),
//!     r#"<r xmlns="http://innodatalabs.com/brs">Hello, <s l="word">beautiful world</s>!</r>"#
//! );
//! ```

use tracing::debug;

use crate::document::{BrsDocument, Node, Record, Span};
use crate::error::{BrsError, BrsResult};
use crate::tag::{parse_labels, IobTag};

/// Constrói um registro a partir de tokens e tags alinhados 1:1.
///
/// Um `I-L` sem `B-L`/`I-L` imediatamente anterior abre um novo span `L`.
pub fn encode_record<S: AsRef<str>>(tokens: &[S], tags: &[IobTag]) -> BrsResult<Record> {
    if tokens.len() != tags.len() {
        return Err(BrsError::LengthMismatch {
            tokens: tokens.len(),
            labels: tags.len(),
        });
    }

    let mut builder = RecordBuilder::default();
    for (token, tag) in tokens.iter().zip(tags) {
        let token = token.as_ref();
        match tag {
            IobTag::Outside => builder.outside(token),
            IobTag::Begin(label) => builder.open(label, token),
            IobTag::Inside(label) => {
                if builder.open_label() == Some(label.as_str()) {
                    builder.extend(token);
                } else {
                    builder.open(label, token);
                }
            }
        }
    }

    let record = builder.finish();
    debug!("registro codificado: {} tokens, {} nós", tokens.len(), record.nodes.len());
    Ok(record)
}

/// Variante de [`encode_record`] que recebe as tags como strings.
pub fn record_from_tokens_and_labels<S, L>(tokens: &[S], labels: &[L]) -> BrsResult<Record>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let tags = parse_labels(labels)?;
    encode_record(tokens, &tags)
}

/// Codifica várias sequências, uma por registro.
pub fn encode_document<I, S>(sequences: I) -> BrsResult<BrsDocument>
where
    I: IntoIterator<Item = (Vec<S>, Vec<IobTag>)>,
    S: AsRef<str>,
{
    let records = sequences
        .into_iter()
        .map(|(tokens, tags)| encode_record(&tokens, &tags))
        .collect::<BrsResult<Vec<_>>>()?;
    Ok(BrsDocument::new(records))
}

/// Reescreve como `B-L` todo `I-L` que não continua um span `L`.
///
/// O resultado codifica exatamente os mesmos spans que [`encode_record`]
/// produziria a partir da entrada original, mas já em IOB estrito.
pub fn repair_tags(tags: &[IobTag]) -> Vec<IobTag> {
    let mut out: Vec<IobTag> = Vec::with_capacity(tags.len());
    for tag in tags {
        let fixed = match tag {
            IobTag::Inside(label) if !IobTag::is_valid_transition(out.last(), tag) => {
                IobTag::Begin(label.clone())
            }
            _ => tag.clone(),
        };
        out.push(fixed);
    }
    out
}

/// O que está sendo acumulado no momento.
enum Pending {
    Text(String),
    Span { label: String, text: String },
}

#[derive(Default)]
struct RecordBuilder {
    nodes: Vec<Node>,
    pending: Option<Pending>,
}

impl RecordBuilder {
    fn open_label(&self) -> Option<&str> {
        match &self.pending {
            Some(Pending::Span { label, .. }) => Some(label.as_str()),
            _ => None,
        }
    }

    fn outside(&mut self, token: &str) {
        if let Some(Pending::Text(text)) = &mut self.pending {
            text.push_str(token);
            return;
        }
        self.flush();
        self.pending = Some(Pending::Text(token.to_string()));
    }

    fn open(&mut self, label: &str, token: &str) {
        self.flush();
        self.pending = Some(Pending::Span {
            label: label.to_string(),
            text: token.to_string(),
        });
    }

    fn extend(&mut self, token: &str) {
        if let Some(Pending::Span { text, .. }) = &mut self.pending {
            text.push_str(token);
        }
    }

    fn flush(&mut self) {
        match self.pending.take() {
            Some(Pending::Text(text)) if !text.is_empty() => self.nodes.push(Node::Text(text)),
            Some(Pending::Span { label, text }) => {
                let nodes = if text.is_empty() { vec![] } else { vec![Node::Text(text)] };
                self.nodes.push(Node::Span(Span { label, nodes }));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Record {
        self.flush();
        Record::new(self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(labels: &[&str]) -> Vec<IobTag> {
        parse_labels(labels).unwrap()
    }

    #[test]
    fn test_hello_world() {
        let record = record_from_tokens_and_labels(
            &["Hello", ",", " ", "beautiful", " ", "world", "!"],
            &["O", "O", "O", "B-word", "I-word", "I-word", "O"],
        )
        .unwrap();
        assert_eq!(
            record.nodes,
            vec![
                Node::text("Hello, "),
                Node::span("word", "beautiful world"),
                Node::text("!"),
            ]
        );
        assert_eq!(record.text(), "Hello, beautiful world!");
    }

    #[test]
    fn test_adjacent_spans_stay_separate() {
        let record = encode_record(&["a", "b", "c"], &tags(&["B-x", "B-x", "I-x"])).unwrap();
        assert_eq!(record.nodes, vec![Node::span("x", "a"), Node::span("x", "bc")]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = encode_record(&["a", "b"], &tags(&["O"])).unwrap_err();
        assert!(matches!(err, BrsError::LengthMismatch { tokens: 2, labels: 1 }));
    }

    #[test]
    fn test_orphan_inside_opens_span() {
        let record = encode_record(&["a", " ", "b", "c"], &tags(&["I-x", "O", "B-y", "I-z"])).unwrap();
        assert_eq!(
            record.nodes,
            vec![
                Node::span("x", "a"),
                Node::text(" "),
                Node::span("y", "b"),
                Node::span("z", "c"),
            ]
        );
    }

    #[test]
    fn test_repair_tags_matches_encoder_policy() {
        let raw = tags(&["I-x", "O", "B-y", "I-z", "I-z"]);
        assert_eq!(repair_tags(&raw), tags(&["B-x", "O", "B-y", "B-z", "I-z"]));

        let tokens = ["a", " ", "b", "c", "d"];
        assert_eq!(
            encode_record(&tokens, &raw).unwrap(),
            encode_record(&tokens, &repair_tags(&raw)).unwrap()
        );
    }

    #[test]
    fn test_empty_input() {
        let record = encode_record::<&str>(&[], &[]).unwrap();
        assert!(record.nodes.is_empty());
    }
}
