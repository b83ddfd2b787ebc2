//! # Avaliação por Spans
//!
//! Compara um documento de referência (gold) com a saída de um sistema (test),
//! registro a registro, pelos conjuntos de spans:
//!
//! ```text
//! tp += |G ∩ S|     fp += |S − G|     fn += |G − S|     gold_tag_count += |G|
//! ```
//!
//! A igualdade é exata sobre a tripla `(start, end, label)`: sobreposição parcial
//! não conta como acerto. Os dois documentos precisam ter o mesmo número de
//! registros; caso contrário não são comparáveis e nada é calculado.
//!
//! Os registros são independentes entre si, então são avaliados em paralelo
//! (Rayon) e somados no final.

use std::iter::Sum;
use std::ops::Add;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{BrsDocument, Record};
use crate::error::{BrsError, BrsResult};
use crate::span_set::record_to_set;

/// Contagens de acerto entre gold e test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// Total de spans no gold
    pub gold_tag_count: usize,
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl Evaluation {
    /// Total de spans na saída do sistema (`tp + fp`).
    pub fn test_tag_count(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// `tp / (tp + fp)`, ou 0.0 se o sistema não produziu spans.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.test_tag_count())
    }

    /// `tp / (tp + fn)`, ou 0.0 se o gold não tem spans.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Média harmônica de precisão e revocação.
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl Add for Evaluation {
    type Output = Evaluation;

    fn add(self, other: Evaluation) -> Evaluation {
        Evaluation {
            gold_tag_count: self.gold_tag_count + other.gold_tag_count,
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
        }
    }
}

impl Sum for Evaluation {
    fn sum<I: Iterator<Item = Evaluation>>(iter: I) -> Evaluation {
        iter.fold(Evaluation::default(), |a, b| a + b)
    }
}

/// Compara um único par de registros.
pub fn evaluate_record(gold: &Record, test: &Record) -> Evaluation {
    let g = record_to_set(gold);
    let s = record_to_set(test);
    let tp = g.intersection(&s).count();

    Evaluation {
        gold_tag_count: g.len(),
        true_positives: tp,
        false_positives: s.len() - tp,
        false_negatives: g.len() - tp,
    }
}

/// Avaliação registro a registro, na ordem do documento.
pub fn evaluate_records(gold: &BrsDocument, test: &BrsDocument) -> BrsResult<Vec<Evaluation>> {
    check_comparable(gold, test)?;

    let gold: Vec<&Record> = gold.records().collect();
    let test: Vec<&Record> = test.records().collect();
    Ok(gold
        .par_iter()
        .zip(test.par_iter())
        .map(|(g, s)| evaluate_record(g, s))
        .collect())
}

/// Avaliação agregada sobre o documento inteiro.
///
/// Só aceita documentos BRS já parseados:
///
/// ```compile_fail
/// let gold = brs_core::parse_brs(b"<b xmlns='http://innodatalabs.com/brs'/>").unwrap();
/// brs_core::evaluate("invalid_input_type", &gold);
/// ```
pub fn evaluate(gold: &BrsDocument, test: &BrsDocument) -> BrsResult<Evaluation> {
    let result: Evaluation = evaluate_records(gold, test)?.into_iter().sum();

    debug!(
        "avaliação: {} registros, gold={} tp={} fp={} fn={}",
        gold.len(),
        result.gold_tag_count,
        result.true_positives,
        result.false_positives,
        result.false_negatives
    );
    Ok(result)
}

fn check_comparable(gold: &BrsDocument, test: &BrsDocument) -> BrsResult<()> {
    if gold.len() != test.len() {
        return Err(BrsError::RecordCountMismatch {
            gold: gold.len(),
            test: test.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;

    #[test]
    fn test_exact_match_only() {
        let gold = Record::new(vec![Node::span("x", "ab"), Node::text(" c")]);
        let test = Record::new(vec![Node::text("a"), Node::span("x", "b"), Node::text(" c")]);
        let e = evaluate_record(&gold, &test);
        assert_eq!(e.gold_tag_count, 1);
        assert_eq!((e.true_positives, e.false_positives, e.false_negatives), (0, 1, 1));
    }

    #[test]
    fn test_identical_documents() {
        let record = Record::new(vec![Node::span("x", "a"), Node::text(" "), Node::span("y", "b")]);
        let doc = BrsDocument::new(vec![record.clone(), record]);
        let e = evaluate(&doc, &doc).unwrap();
        assert_eq!(e.gold_tag_count, 4);
        assert_eq!(e.true_positives, 4);
        assert_eq!(e.false_positives, 0);
        assert_eq!(e.false_negatives, 0);
        assert_eq!(e.f1(), 1.0);
    }

    #[test]
    fn test_record_count_mismatch() {
        let one = BrsDocument::new(vec![Record::default()]);
        let err = evaluate(&BrsDocument::default(), &one).unwrap_err();
        assert!(matches!(err, BrsError::RecordCountMismatch { gold: 0, test: 1 }));
        assert!(evaluate_records(&one, &BrsDocument::default()).is_err());
    }

    #[test]
    fn test_per_record_sums_to_total() {
        let gold = BrsDocument::new(vec![
            Record::new(vec![Node::span("x", "a")]),
            Record::new(vec![Node::text("b"), Node::span("y", "c")]),
        ]);
        let test = BrsDocument::new(vec![
            Record::new(vec![Node::span("x", "a")]),
            Record::new(vec![Node::span("y", "bc")]),
        ]);
        let per_record = evaluate_records(&gold, &test).unwrap();
        assert_eq!(per_record.len(), 2);
        let total: Evaluation = per_record.into_iter().sum();
        assert_eq!(total, evaluate(&gold, &test).unwrap());
        assert_eq!(total.precision(), 0.5);
        assert_eq!(total.recall(), 0.5);
    }

    #[test]
    fn test_zero_division_is_zero() {
        let e = Evaluation::default();
        assert_eq!(e.precision(), 0.0);
        assert_eq!(e.recall(), 0.0);
        assert_eq!(e.f1(), 0.0);
    }

    #[test]
    fn test_serializes_short_names() {
        let e = Evaluation {
            gold_tag_count: 6,
            true_positives: 5,
            false_positives: 1,
            false_negatives: 1,
        };
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json, serde_json::json!({"gold_tag_count": 6, "tp": 5, "fp": 1, "fn": 1}));
    }
}
