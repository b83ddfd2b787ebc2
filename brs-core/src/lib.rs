//! # brs-core — Documentos BRS, Tags IOB e Avaliação por Spans
//!
//! Converte entre duas representações de texto anotado:
//!
//! - **BRS**: XML restrito onde trechos anotados são elementos `<s l="rótulo">`
//!   dentro de registros `<r>`.
//! - **IOB**: sequência plana de tokens, cada um com uma tag `O`, `B-rótulo` ou `I-rótulo`.
//!
//! E mede a concordância entre um documento de referência e a saída de um sistema.
//!
//! ## Arquitetura
//!
//! ```text
//!   bytes ──parse_brs──▶ BrsDocument ──records()──▶ Record
//!                                                     │
//!          ┌──────────────────────────────────────────┼───────────────────────┐
//!          ▼                                          ▼                       ▼
//!   tokens_and_iob_labels_from_record          record_to_set            evaluate (gold, test)
//!   (tokens, tags)                             {(start, end, label)}    {gold_tag_count, tp, fp, fn}
//!          │
//!          ▼
//!   encode_record ──▶ Record ──write_record──▶ XML
//! ```
//!
//! 1.  **Motor de Documentos** ([`document`], [`writer`]): parse, validação do esquema e serialização.
//! 2.  **Tokenização** ([`tokenizer`]): fornecida pelo chamador; há modos prontos.
//! 3.  **Codificação/Decodificação** ([`encoder`], [`decoder`]): árvore ⇄ tokens + tags ([`tag`]).
//! 4.  **Spans e Avaliação** ([`events`], [`span_set`], [`evaluation`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use brs_core::{evaluate, parse_brs, record_to_set, SpanEntry};
//!
//! let gold = parse_brs(br#"<b xmlns="http://innodatalabs.com/brs">
//!     <r>Sample <s l="record">record</s>- <s l="refno">1</s></r>
//! </b>"#).unwrap();
//!
//! let record = gold.records().next().unwrap();
//! assert!(record_to_set(record).contains(&SpanEntry::new(7, 13, "record")));
//!
//! let result = evaluate(&gold, &gold).unwrap();
//! assert_eq!(result.true_positives, result.gold_tag_count);
//! ```

pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod schema;
pub mod span_set;
pub mod tag;
pub mod tokenizer;
pub mod writer;

pub use decoder::{decode_document, tokens_and_iob_labels_from_record, TaggedTokens};
pub use document::{parse_brs, parse_record, BrsDocument, Markup, Node, Record, Span};
pub use encoder::{encode_document, encode_record, record_from_tokens_and_labels, repair_tags};
pub use error::{BrsError, BrsResult};
pub use evaluation::{evaluate, evaluate_record, evaluate_records, Evaluation};
pub use events::Event;
pub use schema::{QName, BRS_B, BRS_NS, BRS_R, BRS_S};
pub use span_set::{record_to_set, span_set_from_events, SpanEntry, SpanSet};
pub use tag::{format_labels, parse_labels, IobTag};
pub use tokenizer::{Token, Tokenizer, TokenizerMode};
pub use writer::{write_document, write_record, NamespacePrefix};
