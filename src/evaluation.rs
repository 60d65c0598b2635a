use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::corpus::Corpus;
use crate::hmm::decoder::Decoder;

/// Per-tag performance counters.
#[derive(Debug, Default)]
struct TagMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /// Number of occurrences of the tag in the gold-standard data.
    num_observation: usize,
    /// Number of predictions.
    num_prediction: usize,
    precision: f64,
    recall: f64,
    fmeasure: f64,
}

/// Overall performance of a model against a gold-tagged corpus.
#[derive(Debug, Default)]
pub struct Evaluation {
    tbl: BTreeMap<String, TagMeasure>,

    /// Number of correctly tagged tokens.
    token_total_correct: usize,
    /// Total number of tokens scored.
    token_total_num: usize,
    /// Token-level accuracy.
    token_accuracy: f64,

    /// Number of sentences tagged entirely correctly.
    sent_total_correct: usize,
    /// Total number of sentences scored.
    sent_total_num: usize,
    /// Sentences the decoder failed on (excluded from scoring).
    sent_failed: usize,
    /// Sentence-level accuracy.
    sent_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

#[derive(Debug)]
pub struct Estimation {
    pub token_accuracy: f64,
    pub sentence_accuracy: f64,
}

impl Evaluation {
    pub fn accumulate(&mut self, reference: &[String], prediction: &[String]) {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.token_total_num += 1;
        }

        if matched == prediction.len() {
            self.sent_total_correct += 1;
        }
        self.sent_total_num += 1;
    }

    pub fn record_failure(&mut self) {
        self.sent_failed += 1;
    }

    pub fn evaluate(&mut self) -> Estimation {
        let mut observed_tags = 0;
        for lev in self.tbl.values_mut() {
            if lev.num_observation == 0 {
                continue;
            }
            observed_tags += 1;
            self.token_total_correct += lev.num_correct;

            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;

            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            if lev.num_observation > 0 {
                lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            }
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }

        if observed_tags > 0 {
            self.macro_precision /= observed_tags as f64;
            self.macro_recall /= observed_tags as f64;
            self.macro_fmeasure /= observed_tags as f64;
        }

        if self.token_total_num > 0 {
            self.token_accuracy = self.token_total_correct as f64 / self.token_total_num as f64;
        }
        if self.sent_total_num > 0 {
            self.sent_accuracy = self.sent_total_correct as f64 / self.sent_total_num as f64;
        }
        Estimation {
            token_accuracy: self.token_accuracy,
            sentence_accuracy: self.sent_accuracy,
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        for (tag, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    tag, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    tag,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Token accuracy: {}/{} => {:.4}",
            self.token_total_correct, self.token_total_num, self.token_accuracy
        )?;
        write!(
            f,
            "Sentence accuracy: {}/{} => {:.4} ({} failed)",
            self.sent_total_correct, self.sent_total_num, self.sent_accuracy, self.sent_failed
        )
    }
}

/// Decode every sentence of `corpus` and score the predictions against its
/// gold tags. Sentences the decoder cannot tag are logged and skipped; the
/// rest of the batch still counts.
pub fn score_corpus(decoder: &Decoder, corpus: &Corpus) -> Evaluation {
    let mut ev = Evaluation::default();
    for sentence in &corpus.sentences {
        match decoder.decode_tokens(&sentence.words) {
            Ok(prediction) => ev.accumulate(&sentence.tags, &prediction),
            Err(e) => {
                log::warn!("skipping sentence: {}", e);
                ev.record_failure();
            }
        }
    }
    ev.evaluate();
    ev
}
