use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::zip;
use std::path::Path;

use crate::{Error, Result};

/// One training sentence: gold tags aligned position-by-position with words.
#[derive(Debug, Default, Clone)]
pub struct Sentence {
    pub tags: Vec<String>,
    pub words: Vec<String>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// An aligned tag/word corpus. Tags come from one file, words from another,
/// paired line by line; each line is a whitespace-delimited token sequence.
#[derive(Debug, Default)]
pub struct Corpus {
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn from_files<P: AsRef<Path>>(tag_path: P, word_path: P) -> Result<Self> {
        let tag_lines = read_lines(tag_path.as_ref())?;
        let word_lines = read_lines(word_path.as_ref())?;
        Self::from_lines(&tag_lines, &word_lines)
    }

    /// Pair up tag lines and word lines. Line counts must agree, and every
    /// line pair must carry the same number of tokens; blank pairs are
    /// skipped. Tag tokens are kept verbatim, word case is folded later by
    /// the trainer and decoder.
    pub fn from_lines<S: AsRef<str>>(tag_lines: &[S], word_lines: &[S]) -> Result<Self> {
        if tag_lines.len() != word_lines.len() {
            return Err(Error::LineCount {
                tag_lines: tag_lines.len(),
                word_lines: word_lines.len(),
            });
        }
        let mut sentences = Vec::new();
        for (no, (tl, wl)) in zip(tag_lines, word_lines).enumerate() {
            let tags: Vec<String> = tl.as_ref().split_whitespace().map(String::from).collect();
            let words: Vec<String> = wl.as_ref().split_whitespace().map(String::from).collect();
            if tags.len() != words.len() {
                return Err(Error::Alignment {
                    line: no + 1,
                    tags: tags.len(),
                    words: words.len(),
                });
            }
            if tags.is_empty() {
                log::debug!("skipping blank line {}", no + 1);
                continue;
            }
            sentences.push(Sentence { tags, words });
        }
        Ok(Self { sentences })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn total_tokens(&self) -> usize {
        self.sentences.iter().map(|s| s.len()).sum()
    }

    pub fn max_length(&self) -> usize {
        self.sentences.iter().map(|s| s.len()).max().unwrap_or_default()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::CorpusRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| Error::CorpusRead {
            path: path.to_path_buf(),
            source: e,
        })
}
