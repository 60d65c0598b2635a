pub mod corpus;
pub mod evaluation;
pub mod hmm;

pub use corpus::{Corpus, Sentence};
pub use evaluation::Evaluation;
pub use hmm::decoder::{Decoder, DEFAULT_PENALTY};
pub use hmm::model::HmmModel;
pub use hmm::trainer::Trainer;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A corpus file could not be opened or read.
    #[error("failed to read corpus file {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The tag file and the word file disagree on the number of lines.
    #[error("tag file has {tag_lines} lines but word file has {word_lines}")]
    LineCount { tag_lines: usize, word_lines: usize },
    /// A tag line and its word line disagree on the number of tokens.
    #[error("line {line}: {tags} tags but {words} words")]
    Alignment { line: usize, tags: usize, words: usize },
    /// Decoding reached a position where no tag has an incoming path.
    #[error("no reachable tag at position {position} (word {word:?})")]
    EmptyFrontier { position: usize, word: String },
}

pub type Result<T> = std::result::Result<T, Error>;
