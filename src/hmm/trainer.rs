use std::collections::BTreeMap;

use crate::corpus::Corpus;
use crate::{Error, Result};

use super::model::{EmissionTable, HmmModel, LogRow, TransitionTable};

/// A row of raw counts with its total held as an explicit field, never as a
/// reserved key inside the count map.
#[derive(Debug, Default)]
struct CountRow {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl CountRow {
    fn bump(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Divide each count by the row total and take the natural log.
    fn into_log_row(self) -> LogRow {
        let total = self.total as f64;
        self.counts
            .into_iter()
            .map(|(k, n)| (k, (n as f64 / total).ln()))
            .collect()
    }
}

/// Accumulates transition and emission counts sentence by sentence, then
/// normalizes them into an immutable [`HmmModel`].
#[derive(Debug, Default)]
pub struct Trainer {
    start: CountRow,
    transitions: BTreeMap<String, CountRow>,
    emissions: BTreeMap<String, CountRow>,
    sentences: usize,
    tokens: usize,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sentence of gold tags with its aligned words.
    ///
    /// The first tag counts once in the start row per sentence. Adjacent
    /// tag pairs count in the source tag's row; transitions never cross
    /// sentence boundaries, so a one-tag sentence contributes only a start
    /// observation. Each (tag, word) position pair counts the lower-cased
    /// word in the tag's emission row. An empty sentence is a no-op.
    pub fn append(&mut self, tags: &[String], words: &[String]) -> Result<()> {
        if tags.len() != words.len() {
            return Err(Error::Alignment {
                line: self.sentences + 1,
                tags: tags.len(),
                words: words.len(),
            });
        }
        let first = match tags.first() {
            Some(t) => t,
            None => return Ok(()),
        };
        self.start.bump(first);
        for pair in tags.windows(2) {
            self.transitions.entry(pair[0].clone()).or_default().bump(&pair[1]);
        }
        for (tag, word) in tags.iter().zip(words) {
            self.emissions.entry(tag.clone()).or_default().bump(&word.to_lowercase());
        }
        self.sentences += 1;
        self.tokens += tags.len();
        Ok(())
    }

    pub fn append_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        for sentence in &corpus.sentences {
            self.append(&sentence.tags, &sentence.words)?;
        }
        Ok(())
    }

    /// Normalize every row to natural-log probabilities and freeze the
    /// model. Rows exist only for tags observed as a transition source;
    /// destination-only tags still receive an (empty) emission row.
    pub fn train(self) -> HmmModel {
        log::info!(
            "training on {} sentences, {} tokens, {} distinct tags",
            self.sentences,
            self.tokens,
            self.emissions.len()
        );
        let start = self.start.into_log_row();
        let rows = self
            .transitions
            .into_iter()
            .map(|(tag, row)| (tag, row.into_log_row()))
            .collect();
        let emissions = self
            .emissions
            .into_iter()
            .map(|(tag, row)| (tag, row.into_log_row()))
            .collect();
        let model = HmmModel {
            transitions: TransitionTable { start, rows },
            emissions: EmissionTable { rows: emissions },
        };
        model.seal()
    }
}
