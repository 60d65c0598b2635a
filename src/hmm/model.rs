use std::collections::BTreeMap;

use serde::Serialize;

/// A normalized table row: destination tag (or word) to natural-log
/// probability. `BTreeMap` fixes iteration to lexicographic order, which is
/// the tie-break order the decoder documents.
pub type LogRow = BTreeMap<String, f64>;

/// Per-source-tag distributions over the next tag.
#[derive(Debug, Default, Serialize)]
pub struct TransitionTable {
    /// Distribution over the first tag of a sentence. Kept apart from
    /// `rows` so no real tag can ever collide with a start-of-sentence
    /// marker, and so the marker can never be a destination.
    pub(crate) start: LogRow,
    pub(crate) rows: BTreeMap<String, LogRow>,
}

impl TransitionTable {
    pub fn start(&self) -> &LogRow {
        &self.start
    }

    /// Outgoing distribution of `tag`. `None` means the tag was never seen
    /// as a transition source, which is not an error.
    pub fn outgoing(&self, tag: &str) -> Option<&LogRow> {
        self.rows.get(tag)
    }
}

/// Per-tag distributions over emitted words.
#[derive(Debug, Default, Serialize)]
pub struct EmissionTable {
    pub(crate) rows: BTreeMap<String, LogRow>,
}

impl EmissionTable {
    /// Score of `word` under `tag`, if the word was observed there. An
    /// absent row and a present row missing the word both answer `None`.
    pub fn score(&self, tag: &str, word: &str) -> Option<f64> {
        self.rows.get(tag).and_then(|row| row.get(word)).copied()
    }

    pub fn row(&self, tag: &str) -> Option<&LogRow> {
        self.rows.get(tag)
    }
}

/// A trained model: immutable once built, shared read-only by decoders.
/// Reloading a corpus builds a fresh model instead of mutating this one.
#[derive(Debug, Default, Serialize)]
pub struct HmmModel {
    pub transitions: TransitionTable,
    pub emissions: EmissionTable,
}

impl HmmModel {
    /// Build a model from raw additive score rows, bypassing the
    /// count-and-normalize path. Used for hand-built demo tables.
    pub fn from_scores(
        start: &[(&str, f64)],
        transitions: &[(&str, &[(&str, f64)])],
        emissions: &[(&str, &[(&str, f64)])],
    ) -> Self {
        let model = Self {
            transitions: TransitionTable {
                start: to_row(start),
                rows: transitions.iter().map(|(t, row)| (t.to_string(), to_row(row))).collect(),
            },
            emissions: EmissionTable {
                rows: emissions.iter().map(|(t, row)| (t.to_string(), to_row(row))).collect(),
            },
        };
        model.seal()
    }

    /// Tags known to the model, in lexicographic order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.emissions.rows.keys().map(|t| t.as_str())
    }

    /// Every tag reachable as a transition destination gets an emission
    /// row, possibly empty, so the decoder never has to distinguish "row
    /// absent" from "word absent".
    pub(crate) fn seal(mut self) -> Self {
        let reachable: Vec<String> = self
            .transitions
            .start
            .keys()
            .chain(self.transitions.rows.values().flat_map(|row| row.keys()))
            .cloned()
            .collect();
        for tag in reachable {
            self.emissions.rows.entry(tag).or_default();
        }
        self
    }
}

fn to_row(scores: &[(&str, f64)]) -> LogRow {
    scores.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
