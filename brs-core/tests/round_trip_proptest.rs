//! Propriedades de ida e volta entre tokens/tags e registros BRS.

use brs_core::{
    encode_record, format_labels, parse_labels, parse_record, record_to_set, repair_tags,
    tokens_and_iob_labels_from_record, write_record, IobTag, NamespacePrefix, TokenizerMode,
};
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    prop::sample::select(vec!['a', 'b', 'Z', '1', ' ', ',', '.', '<', '&', '"', '\r', '\n', '\t', 'é', 'ç'])
        .prop_map(|c| c.to_string())
}

fn raw_tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["O", "B-a", "I-a", "B-b", "I-b", "I-c"])
}

/// Sequências (token de um caractere, tag IOB estrita).
fn sequence() -> impl Strategy<Value = (Vec<String>, Vec<IobTag>)> {
    prop::collection::vec((token(), raw_tag()), 0..40).prop_map(|pairs| {
        let (tokens, raw): (Vec<String>, Vec<&str>) = pairs.into_iter().unzip();
        let tags = repair_tags(&parse_labels(&raw).unwrap());
        (tokens, tags)
    })
}

proptest! {
    #[test]
    fn test_decode_encode_round_trip((tokens, tags) in sequence()) {
        let record = encode_record(&tokens, &tags).unwrap();
        let (back_tokens, back_tags) =
            tokens_and_iob_labels_from_record(&record, &TokenizerMode::CharLevel);
        prop_assert_eq!(back_tokens, tokens);
        prop_assert_eq!(format_labels(&back_tags), format_labels(&tags));
    }

    #[test]
    fn test_round_trip_through_xml((tokens, tags) in sequence()) {
        let record = encode_record(&tokens, &tags).unwrap();
        let xml = write_record(&record, &NamespacePrefix::Prefixed("i".into())).unwrap();
        let parsed = parse_record(xml.as_bytes()).unwrap();
        prop_assert_eq!(&parsed, &record);

        let (back_tokens, back_tags) =
            tokens_and_iob_labels_from_record(&parsed, &TokenizerMode::CharLevel);
        prop_assert_eq!(back_tokens, tokens);
        prop_assert_eq!(back_tags, tags);
    }

    #[test]
    fn test_span_offsets_cover_span_text((tokens, tags) in sequence()) {
        let record = encode_record(&tokens, &tags).unwrap();
        let text: Vec<char> = record.text().chars().collect();
        let set = record_to_set(&record);
        let spans = record.spans();
        // spans do codificador nunca são vazios e aparecem em ordem de offset
        prop_assert_eq!(set.len(), spans.len());
        for (entry, span) in set.iter().zip(spans) {
            let slice: String = text[entry.start..entry.end].iter().collect();
            prop_assert_eq!(slice, span.text());
            prop_assert_eq!(&entry.label, &span.label);
        }
    }
}
