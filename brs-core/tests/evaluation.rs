//! Avaliação gold × test sobre as amostras de referência.

use brs_core::{evaluate, parse_brs, record_to_set, BrsDocument, BrsError, SpanEntry};

const BRS_SAMPLE_11: &[u8] = br#"<b xmlns='http://innodatalabs.com/brs'>
                <r>Sample <s l='record'>record</s>- <s l='refno'>1</s></r>
                <r>Sample <s l='record'>record</s>- <s l='refno'>2</s></r>
                <r>Invalid <s l='record'>record</s>- <s l='refno'>3</s></r>
                </b>"#;

const BRS_SAMPLE_12: &[u8] = br#"<i:b xmlns:i='http://innodatalabs.com/brs'>
                <i:r>Sample <i:s l='record'>record</i:s>- <i:s l='refno'>1</i:s></i:r>
                <i:r>Sample <i:s l='record'>record</i:s>- <i:s l='refno'>2</i:s></i:r>
                <i:r>Invalid <i:s l='record'>record-</i:s> <i:s l='refno'>3</i:s></i:r>
                </i:b>
                    "#;

const BRS_SAMPLE_21: &[u8] = br#"<i:b xmlns:i='http://innodatalabs.com/brs'>
                    <i:r><div>Innodata labs</div><div>Here is <p>some <i:s l='sample'>sample</i:s> data</p><p>Some more <i:s l='sample'>sample</i:s> <i:s l='data'>data</i:s> </p></div>
                    </i:r></i:b>"#;

fn set(entries: &[(usize, usize, &str)]) -> brs_core::SpanSet {
    entries
        .iter()
        .map(|&(s, e, l)| SpanEntry::new(s, e, l))
        .collect()
}

#[test]
fn test_record_to_set() {
    let doc = parse_brs(BRS_SAMPLE_11).unwrap();
    let first = doc.records().next().unwrap();
    assert_eq!(record_to_set(first), set(&[(7, 13, "record"), (15, 16, "refno")]));

    let doc = parse_brs(BRS_SAMPLE_21).unwrap();
    let first = doc.records().next().unwrap();
    assert_eq!(
        record_to_set(first),
        set(&[(26, 32, "sample"), (47, 53, "sample"), (54, 58, "data")])
    );
}

#[test]
fn test_offsets_slice_rendered_text() {
    let doc = parse_brs(BRS_SAMPLE_21).unwrap();
    let record = doc.records().next().unwrap();
    let text: Vec<char> = record.text().chars().collect();
    let spans = record.spans();
    for (entry, span) in record_to_set(record).iter().zip(ordered(&spans)) {
        let slice: String = text[entry.start..entry.end].iter().collect();
        assert_eq!(slice, span);
    }
}

// spans na ordem de documento coincidem com a ordem das triplas aqui (offsets crescentes)
fn ordered(spans: &[&brs_core::Span]) -> Vec<String> {
    spans.iter().map(|s| s.text()).collect()
}

#[test]
fn test_evaluation() {
    let sample_11 = parse_brs(BRS_SAMPLE_11).unwrap();
    let sample_12 = parse_brs(BRS_SAMPLE_12).unwrap();
    let sample_21 = parse_brs(BRS_SAMPLE_21).unwrap();

    let result = evaluate(&sample_11, &sample_12).unwrap();
    assert_eq!(result.gold_tag_count, 6);
    assert_eq!(result.true_positives, 5);
    assert_eq!(result.false_positives, 1);
    assert_eq!(result.false_negatives, 1);
    assert_eq!(result.true_positives + result.false_negatives, result.gold_tag_count);

    assert!(matches!(
        evaluate(&BrsDocument::default(), &sample_11),
        Err(BrsError::RecordCountMismatch { gold: 0, test: 3 })
    ));
    assert!(matches!(
        evaluate(&sample_11, &sample_21),
        Err(BrsError::RecordCountMismatch { gold: 3, test: 1 })
    ));
}

#[test]
fn test_self_evaluation_is_perfect() {
    let doc = parse_brs(BRS_SAMPLE_12).unwrap();
    let result = evaluate(&doc, &doc).unwrap();
    assert_eq!(result.gold_tag_count, 6);
    assert_eq!(result.true_positives, 6);
    assert_eq!(result.false_positives, 0);
    assert_eq!(result.false_negatives, 0);
}
