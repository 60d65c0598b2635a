use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use hmm_tagger::{evaluation, Corpus, Decoder, HmmModel, Trainer, DEFAULT_PENALTY};

#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    /// training tag file, one sentence of tags per line
    #[arg(long, default_value = "inputs/brown-train-tags.txt")]
    train_tags: PathBuf,
    /// training sentence file, aligned line by line with the tag file
    #[arg(long, default_value = "inputs/brown-train-sentences.txt")]
    train_words: PathBuf,
    /// held-out sentences for accuracy scoring
    #[arg(long, default_value = "inputs/brown-test-sentences.txt")]
    test_words: PathBuf,
    /// gold tags for the held-out sentences
    #[arg(long, default_value = "inputs/brown-test-tags.txt")]
    test_tags: PathBuf,
    /// score subtracted for words never seen under a tag
    #[arg(short, long, default_value_t = DEFAULT_PENALTY)]
    penalty: f64,
    /// where the [j] menu entry writes the model as JSON
    #[arg(long, default_value = "model.json")]
    dump: PathBuf,
}

fn train(argv: &Argv) -> hmm_tagger::Result<HmmModel> {
    let corpus = Corpus::from_files(&argv.train_tags, &argv.train_words)?;
    let mut trainer = Trainer::new();
    trainer.append_corpus(&corpus)?;
    Ok(trainer.train())
}

/// Tiny hand-built tables, handy for poking at the decoder without a corpus.
fn demo_model() -> HmmModel {
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

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<String> {
    lines.next().and_then(|line| line.ok())
}

fn tag_and_print(decoder: &Decoder, sentence: &str) {
    match decoder.decode(sentence) {
        Ok(tags) => {
            let rendered: Vec<String> = sentence
                .split_whitespace()
                .zip(&tags)
                .map(|(word, tag)| format!("{}/{}", word, tag))
                .collect();
            println!("{}\n", rendered.join(" "));
        }
        Err(e) => println!("cannot tag that sentence: {}\n", e),
    }
}

fn main() {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("argv: {:?}", argv);

    let mut model = match train(&argv) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("training failed: {}", e);
            process::exit(1);
        }
    };
    let mut source = argv.train_tags.display().to_string();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("data currently loaded: {}", source);
        println!("choose an option:");
        println!("[i]nput a sentence to tag");
        println!("[d]emo tables");
        println!("[a]ccuracy on the test corpus");
        println!("[j]son dump of the model");
        println!("[q]uit");

        let choice = match next_line(&mut lines) {
            Some(choice) => choice,
            None => break,
        };
        match choice.trim() {
            "i" => {
                print!("sentence: ");
                let _ = io::stdout().flush();
                if let Some(sentence) = next_line(&mut lines) {
                    let decoder = Decoder::with_penalty(&model, argv.penalty);
                    tag_and_print(&decoder, &sentence);
                }
            }
            "d" => {
                model = demo_model();
                source = "demo tables".to_string();
                println!("demo tables loaded\n");
            }
            "a" => match Corpus::from_files(&argv.test_tags, &argv.test_words) {
                Ok(corpus) => {
                    let decoder = Decoder::with_penalty(&model, argv.penalty);
                    println!("{}\n", evaluation::score_corpus(&decoder, &corpus));
                }
                Err(e) => eprintln!("evaluation failed: {}", e),
            },
            "j" => {
                let ret = File::create(&argv.dump)
                    .map_err(serde_json::Error::io)
                    .and_then(|f| serde_json::to_writer_pretty(f, &model));
                match ret {
                    Ok(()) => println!("model written to {}\n", argv.dump.display()),
                    Err(e) => eprintln!("dump failed: {}", e),
                }
            }
            "q" => break,
            other => println!("invalid input {:?}, try again\n", other),
        }
    }
}
