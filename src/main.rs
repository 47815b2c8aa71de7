//! Command-line entry point.
//!
//! ```text
//! ngram-eval unigram <TRAIN> <TEST> <MODEL> <OUTPUT>
//! ngram-eval bigram  <TRAIN> <TEST> <MODEL> <OUTPUT> [--step S] [--threads N]
//! ngram-eval count   <INPUT> <OUTPUT>
//! ```
//!
//! The model commands fit on TRAIN, write MODEL, reload MODEL, score TEST
//! and write the summary to OUTPUT. Any other argument count is rejected
//! with a usage message and a non-zero exit status.

use clap::{Parser, Subcommand};
use log::error;
use ngram_eval::{BigramModel, Config, Summary, UnigramModel, WordCounts};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ngram-eval")]
#[command(about = "Fit n-gram language models and measure test-set entropy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a unigram model and report entropy and coverage
    Unigram {
        train: PathBuf,
        test: PathBuf,
        model: PathBuf,
        output: PathBuf,
    },

    /// Fit a bigram model and grid-search its interpolation weights
    Bigram {
        train: PathBuf,
        test: PathBuf,
        model: PathBuf,
        output: PathBuf,

        /// Grid step for the interpolation weights
        #[arg(long)]
        step: Option<f64>,

        /// Worker threads for the grid search (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Count raw word frequencies
    Count { input: PathBuf, output: PathBuf },
}

fn run(command: Command, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Unigram {
            train,
            test,
            model,
            output,
        } => {
            let mut unigram = UnigramModel::new_with_config(&config)?;
            unigram.fit_file(&train)?.save_model_file(&model)?;
            let evaluation = unigram.load_model_file(&model)?.evaluate_file(&test)?;

            Summary::from(evaluation).to_file(&output, &[])?;
        }
        Command::Bigram {
            train,
            test,
            model,
            output,
            step,
            threads,
        } => {
            if let Some(step) = step {
                config.grid_step = step;
            }
            if let Some(threads) = threads {
                config.search_threads = threads;
            }
            let mut bigram = BigramModel::new_with_config(&config)?;
            bigram.fit_file(&train)?.save_model_file(&model)?;
            let result = bigram.search_file(
                &test,
                Some(model.as_path()),
                config.grid_step,
                config.search_threads,
            )?;

            let summary = Summary {
                entropy: result.entropy,
                coverage: None,
            };
            let comments = [
                format!("lambda_1 = {:.6}", result.lambda_1),
                format!("lambda_2 = {:.6}", result.lambda_2),
            ];
            summary.to_file(&output, &comments)?;
        }
        Command::Count { input, output } => {
            WordCounts::new().count_file(&input)?.to_file(&output)?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load();

    if let Err(e) = run(cli.command, config) {
        error!("Failed: {}", e);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_rejects_wrong_argument_count() {
        assert!(Cli::try_parse_from(["ngram-eval", "unigram", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["ngram-eval", "unigram", "a", "b", "c", "d", "e"]).is_err());
        assert!(Cli::try_parse_from(["ngram-eval", "bigram", "a"]).is_err());
        assert!(Cli::try_parse_from(["ngram-eval", "unigram", "a", "b", "c", "d"]).is_ok());
    }

    #[test]
    fn test_unigram_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.txt");
        let test = dir.path().join("test.txt");
        let model = dir.path().join("model.txt");
        let output = dir.path().join("summary.txt");
        fs::write(&train, "a b\na\n").unwrap();
        fs::write(&test, "a c\n").unwrap();

        let command = Command::Unigram {
            train,
            test,
            model: model.clone(),
            output: output.clone(),
        };
        run(command, Config::default()).unwrap();

        assert_eq!(
            fs::read_to_string(&model).unwrap(),
            "</s>\t0.400000\na\t0.400000\nb\t0.200000\n"
        );
        let summary = Summary::read_file(&output).unwrap();
        assert!((summary.coverage.unwrap() - 0.666667).abs() < 1e-9);
        assert!(summary.entropy > 0.0);
    }

    #[test]
    fn test_bigram_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.txt");
        let test = dir.path().join("test.txt");
        let model = dir.path().join("model.txt");
        let output = dir.path().join("summary.txt");
        fs::write(&train, "a b\nb a\n").unwrap();
        fs::write(&test, "a b a\n").unwrap();

        let command = Command::Bigram {
            train,
            test,
            model: model.clone(),
            output: output.clone(),
            step: Some(0.25),
            threads: Some(2),
        };
        run(command, Config::default()).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with("# lambda_1 = "));
        let summary = Summary::read_file(&output).unwrap();
        assert!(summary.entropy > 0.0);
        assert_eq!(summary.coverage, None);
    }

    #[test]
    fn test_failed_fit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.txt");
        let test = dir.path().join("test.txt");
        let model = dir.path().join("model.txt");
        let output = dir.path().join("summary.txt");
        fs::write(&train, "\n\n").unwrap();
        fs::write(&test, "a\n").unwrap();

        let command = Command::Unigram {
            train,
            test,
            model: model.clone(),
            output: output.clone(),
        };
        assert!(run(command, Config::default()).is_err());
        assert!(!model.exists());
        assert!(!output.exists());
    }
}
