extern crate hmm_tagger;

use hmm_tagger::{Decoder, Error, HmmModel};

/// Hand-built raw-score tables over a four-tag grammar.
fn fixture_model() -> HmmModel {
    HmmModel::from_scores(
        &[("NP", 3.0), ("N", 7.0)],
        &[
            ("NP", &[("CNJ", 2.0), ("V", 8.0)]),
            ("CNJ", &[("NP", 2.0), ("N", 4.0), ("V", 4.0)]),
            ("N", &[("V", 8.0), ("CNJ", 2.0)]),
            ("V", &[("NP", 4.0), ("N", 4.0), ("CNJ", 2.0)]),
        ],
        &[
            ("NP", &[("chase", 10.0)]),
            ("CNJ", &[("and", 10.0)]),
            ("N", &[("cat", 4.0), ("dog", 4.0), ("watch", 2.0)]),
            ("V", &[("get", 1.0), ("chase", 3.0), ("watch", 6.0)]),
        ],
    )
}

#[test]
fn tag_single_word() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    // N scores 0+7+4 = 11, NP scores 0+3-50 = -47
    let (path, score) = decoder.decode_scored(&["dog"]).unwrap();
    assert_eq!(path, ["N"]);
    assert_eq!(score, 11.0);
}

#[test]
fn tag_two_words() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    // best path to V at the second position goes through N: 11+8+3 = 22
    let (path, score) = decoder.decode_scored(&["dog", "chase"]).unwrap();
    assert_eq!(path, ["N", "V"]);
    assert_eq!(score, 22.0);
}

#[test]
fn empty_sentence_decodes_empty() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    assert_eq!(decoder.decode("").unwrap(), Vec::<String>::new());
    assert_eq!(decoder.decode(" \t ").unwrap(), Vec::<String>::new());
}

#[test]
fn one_tag_per_token() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    for sentence in [
        "dog",
        "dog chase",
        "cat and dog watch",
        "zebra flies upside down",
        "dog chase cat and cat watch dog",
    ] {
        let n = sentence.split_whitespace().count();
        assert_eq!(decoder.decode(sentence).unwrap().len(), n, "{:?}", sentence);
    }
}

#[test]
fn decoding_is_deterministic() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    let first = decoder.decode("cat and dog watch chase").unwrap();
    for _ in 0..5 {
        assert_eq!(decoder.decode("cat and dog watch chase").unwrap(), first);
    }
}

#[test]
fn only_real_tags_in_output() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    let tags = decoder.decode("dog chase cat and dog get watch").unwrap();
    for tag in &tags {
        assert!(
            ["NP", "CNJ", "N", "V"].contains(&tag.as_str()),
            "unexpected tag {:?}",
            tag
        );
    }
}

#[test]
fn unseen_word_penalty_is_uniform() {
    let model = fixture_model();
    let decoder = Decoder::new(&model);
    // both sentences take the N -> V path; swapping the seen "watch"
    // (scored 6 under V) for an unseen word costs exactly 6 + 50
    let (seen_path, seen) = decoder.decode_scored(&["dog", "watch"]).unwrap();
    let (unseen_path, unseen) = decoder.decode_scored(&["dog", "zzz"]).unwrap();
    assert_eq!(seen_path, unseen_path);
    assert_eq!(seen - unseen, 6.0 + 50.0);
}

#[test]
fn exact_ties_go_to_the_first_tag_in_order() {
    // A and B reach C with identical scores; A is evaluated first and must
    // keep the backpointer
    let model = HmmModel::from_scores(
        &[("A", 2.0), ("B", 2.0)],
        &[("A", &[("C", 3.0)]), ("B", &[("C", 3.0)])],
        &[("A", &[("x", 1.0)]), ("B", &[("x", 1.0)]), ("C", &[("y", 1.0)])],
    );
    let decoder = Decoder::new(&model);
    assert_eq!(decoder.decode("x y").unwrap(), ["A", "C"]);
    // same rule for the final frontier
    assert_eq!(decoder.decode("x").unwrap(), ["A"]);
}

#[test]
fn dead_end_reports_the_position() {
    // Z is reachable from the start but has no outgoing transitions
    let model = HmmModel::from_scores(
        &[("Z", 1.0)],
        &[],
        &[("Z", &[("stop", 1.0)])],
    );
    let decoder = Decoder::new(&model);
    assert_eq!(decoder.decode("stop").unwrap(), ["Z"]);
    match decoder.decode("stop go") {
        Err(Error::EmptyFrontier { position: 1, word }) => assert_eq!(word, "go"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn penalty_is_configurable() {
    let model = fixture_model();
    // with a tiny penalty the start preference alone decides: N (7) wins
    // over NP (3) for an unseen word either way
    let lenient = Decoder::with_penalty(&model, 1.0);
    let (_, score) = lenient.decode_scored(&["zzz"]).unwrap();
    assert_eq!(score, 6.0); // 7 - 1
}
