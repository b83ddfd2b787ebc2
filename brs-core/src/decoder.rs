//! # Decodificador: registro → tokens + tags IOB
//!
//! Percorre o fluxo de eventos do registro acumulando regiões contíguas de texto:
//!
//! - **Fora de span**: todo o texto até o próximo span (inclusive o de decoração)
//!   é tokenizado de uma vez; cada token recebe `O`.
//! - **Span `L`**: o texto interno completo é tokenizado de uma vez; o primeiro
//!   token recebe `B-L`, os demais `I-L`.
//!
//! O tokenizador nunca é chamado no meio de um span, então as fronteiras das
//! tags são exatas qualquer que seja a regra interna do tokenizador.

use tracing::trace;

use crate::document::{BrsDocument, Record};
use crate::events::Event;
use crate::tag::IobTag;
use crate::tokenizer::Tokenizer;

/// Tokens e tags alinhados de um registro.
pub type TaggedTokens = (Vec<String>, Vec<IobTag>);

/// Decodifica um registro usando o tokenizador do chamador.
///
/// ```rust
/// use brs_core::{parse_record, tokens_and_iob_labels_from_record, TokenizerMode};
///
/// let record = parse_record(
///     br#"<r xmlns="http://innodatalabs.com/brs">Hello, <s l="word">beautiful world</s>!</r>"#,
/// ).unwrap();
/// let (tokens, tags) = tokens_and_iob_labels_from_record(&record, &TokenizerMode::WordPunct);
/// assert_eq!(tokens, ["Hello", ",", " ", "beautiful", " ", "world", "!"]);
/// assert_eq!(tags[3].label(), "B-word");
/// ```
pub fn tokens_and_iob_labels_from_record<T>(record: &Record, tokenizer: &T) -> TaggedTokens
where
    T: Tokenizer + ?Sized,
{
    let mut decoder = Decoder {
        tokenizer,
        tokens: Vec::new(),
        tags: Vec::new(),
    };

    // texto fora de span ainda não tokenizado
    let mut outside = String::new();
    // (rótulo, texto interno) do span aberto
    let mut open: Option<(&str, String)> = None;

    for event in record.events() {
        match event {
            Event::Text(text) => match &mut open {
                Some((_, inner)) => inner.push_str(text),
                None => outside.push_str(text),
            },
            Event::SpanStart(label) => {
                decoder.emit_outside(&outside);
                outside.clear();
                open = Some((label, String::new()));
            }
            Event::SpanEnd => {
                if let Some((label, inner)) = open.take() {
                    decoder.emit_span(label, &inner);
                }
            }
        }
    }
    decoder.emit_outside(&outside);

    trace!("registro decodificado em {} tokens", decoder.tokens.len());
    (decoder.tokens, decoder.tags)
}

/// Decodifica todos os registros de um documento, em ordem.
pub fn decode_document<T>(doc: &BrsDocument, tokenizer: &T) -> Vec<TaggedTokens>
where
    T: Tokenizer + ?Sized,
{
    doc.records()
        .map(|record| tokens_and_iob_labels_from_record(record, tokenizer))
        .collect()
}

struct Decoder<'t, T: ?Sized> {
    tokenizer: &'t T,
    tokens: Vec<String>,
    tags: Vec<IobTag>,
}

impl<T: Tokenizer + ?Sized> Decoder<'_, T> {
    fn emit_outside(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for token in self.tokenizer.tokenize(text) {
            self.tokens.push(token);
            self.tags.push(IobTag::Outside);
        }
    }

    fn emit_span(&mut self, label: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        for (i, token) in self.tokenizer.tokenize(text).into_iter().enumerate() {
            self.tokens.push(token);
            self.tags.push(if i == 0 {
                IobTag::begin(label)
            } else {
                IobTag::inside(label)
            });
        }
    }
}
