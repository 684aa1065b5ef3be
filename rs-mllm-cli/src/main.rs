//! rs-mllm - command-line interface for the character model.
//!
//! Trains a model from a corpus and saves it, or generates text from a
//! saved model (or from a corpus trained on the fly).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rs_mllm_core::io::{build_model_path, read_corpus, MODEL_SUFFIX};
use rs_mllm_core::{train, DistributionTable, Generator, ModelError};

/// Minimum width of the mismatch banner.
const BANNER_WIDTH: usize = 57;

#[derive(Parser, Debug)]
#[command(name = "rs-mllm", version, about = "Tiny character-based maximum-likelihood text generator", long_about = None)]
struct Args {
	/// Training corpus (plain text); trains and saves a model
	#[arg(short, long, value_name = "PATH")]
	file: Option<PathBuf>,

	/// Load a previously saved model
	#[arg(short, long, value_name = "PATH")]
	model: Option<PathBuf>,

	/// Number of characters to generate
	#[arg(short = 'g', long = "gen", value_name = "N", default_value_t = 1000)]
	generate: usize,

	/// Length of the training history in characters
	#[arg(short, long, value_name = "K", default_value_t = 8, value_parser = parse_history_length)]
	prev: usize,

	/// Don't store a model, just train and generate on the fly
	#[arg(short, long, default_value_t = false)]
	nomodel: bool,

	/// Seed for the random source (reproducible output)
	#[arg(short, long)]
	seed: Option<u64>,
}

/// What a single invocation does.
#[derive(Debug, PartialEq)]
enum Mode<'a> {
	/// Train on the corpus and save the model, no generation.
	Train(&'a Path),
	/// Train in memory and generate.
	TrainAndGenerate(&'a Path),
	/// Load a saved model and generate.
	Load(&'a Path),
}

impl Args {
	fn mode(&self) -> Result<Mode<'_>> {
		match (&self.file, &self.model, self.nomodel) {
			(Some(file), _, false) => Ok(Mode::Train(file)),
			(Some(file), model, true) => {
				if let Some(model) = model {
					warn!("--model {} is ignored when training with --nomodel", model.display());
				}
				Ok(Mode::TrainAndGenerate(file))
			}
			(None, Some(model), _) => Ok(Mode::Load(model)),
			(None, None, _) => bail!("either a corpus (--file) or a saved model (--model) is required"),
		}
	}
}

fn parse_history_length(s: &str) -> Result<usize, String> {
	let length: usize = s.parse().map_err(|_| format!("`{s}` is not a non-negative integer"))?;
	if length == 0 {
		return Err("history length must be at least 1".to_owned());
	}
	Ok(length)
}

/// Multi-line warning shown when the model was trained with another history length.
///
/// Lines are `BANNER_WIDTH` columns wide, or wider when the length has many digits.
fn mismatch_banner(trained: usize) -> String {
	let warning = format!("WARNING: the model was trained with history length:{trained}");
	let width = BANNER_WIDTH.max(warning.chars().count() + 4);
	let line = |text: &str| format!("# {:<inner$} #", text, inner = width - 4);

	let title = " GENERATING! ";
	let left = (width - title.len()) / 2;
	let right = width - title.len() - left;

	[
		"#".repeat(width),
		line(&warning),
		line("        Falling back to model history length."),
		line(""),
		format!("{}{title}{}", "#".repeat(left), "#".repeat(right)),
	]
	.join("\n")
}

fn load_or_train(mode: &Mode, history_length: usize) -> Result<DistributionTable> {
	match mode {
		Mode::Load(path) => DistributionTable::load(path)
			.with_context(|| format!("failed to load model {}", path.display())),
		Mode::Train(path) | Mode::TrainAndGenerate(path) => {
			let corpus = read_corpus(path).context("failed to read corpus")?;
			Ok(train(&corpus, history_length)?)
		}
	}
}

/// Runs one invocation, writing generated text and the save message to `out`
/// and the mismatch banner to `err`.
fn run<O: Write, E: Write>(args: &Args, out: &mut O, err: &mut E) -> Result<()> {
	let mode = args.mode()?;
	let table = load_or_train(&mode, args.prev)?;

	if let Mode::Train(corpus) = mode {
		let model_path = build_model_path(corpus, MODEL_SUFFIX)?;
		table
			.save(&model_path)
			.with_context(|| format!("failed to save model to {}", model_path.display()))?;
		writeln!(out, "Model saved under \"{}\".", model_path.display())?;
		return Ok(());
	}

	let rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let mut generator = Generator::with_rng(&table, args.prev, rng).context("cannot generate from this model")?;

	let history_length = generator.history_length();
	if history_length.is_corrected() {
		writeln!(err, "{}", mismatch_banner(history_length.get()))?;
	}

	let text = generator.generate(args.generate)?;
	writeln!(out, "{text}")?;

	Ok(())
}

/// Prints a hint for known model errors and picks the exit status.
///
/// Invalid parameters exit with 2, like clap's own usage errors; anything
/// else exits with 1.
fn report<E: Write>(error: &anyhow::Error, err: &mut E) -> u8 {
	let _ = writeln!(err, "Error: {error:#}");

	let Some(model_error) = error.downcast_ref::<ModelError>() else {
		return 1;
	};
	if model_error.is_usage() {
		return 2;
	}

	let hint = if model_error.is_lookup() {
		"generation reached a history the corpus never continued; generate fewer characters or train on a larger corpus"
	} else if model_error.is_configuration() {
		"retrain the model from a non-empty corpus"
	} else {
		return 1;
	};
	let _ = writeln!(err, "hint: {hint}");
	1
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	let args = Args::parse();

	let result = run(&args, &mut std::io::stdout().lock(), &mut std::io::stderr().lock());
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => ExitCode::from(report(&error, &mut std::io::stderr().lock())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	fn parse(args: &[&str]) -> Args {
		Args::try_parse_from(std::iter::once("rs-mllm").chain(args.iter().copied())).unwrap()
	}

	#[test]
	fn defaults() {
		let args = parse(&["-m", "model.bin"]);
		assert_eq!(args.generate, 1000);
		assert_eq!(args.prev, 8);
		assert!(!args.nomodel);
		assert_eq!(args.seed, None);
	}

	#[test]
	fn corpus_alone_trains_and_saves() {
		let args = parse(&["-f", "corpus.txt", "-p", "4"]);
		assert_eq!(args.mode().unwrap(), Mode::Train(Path::new("corpus.txt")));
	}

	#[test]
	fn nomodel_trains_in_memory_even_with_a_model() {
		let args = parse(&["--file", "corpus.txt", "--model", "old.bin", "--nomodel"]);
		assert_eq!(args.mode().unwrap(), Mode::TrainAndGenerate(Path::new("corpus.txt")));
	}

	#[test]
	fn model_alone_loads() {
		let args = parse(&["--model", "corpus.txt.bin", "--gen", "20"]);
		assert_eq!(args.mode().unwrap(), Mode::Load(Path::new("corpus.txt.bin")));
		assert_eq!(args.generate, 20);
	}

	#[test]
	fn neither_corpus_nor_model_is_a_usage_error() {
		assert!(parse(&[]).mode().is_err());
		assert!(parse(&["--nomodel"]).mode().is_err());
	}

	#[test]
	fn invalid_numbers_are_rejected() {
		assert!(Args::try_parse_from(["rs-mllm", "-m", "x", "-g", "-5"]).is_err());
		assert!(Args::try_parse_from(["rs-mllm", "-f", "x", "-p", "0"]).is_err());
		assert!(Args::try_parse_from(["rs-mllm", "-f", "x", "-p", "two"]).is_err());
	}

	fn run_to_strings(args: &Args) -> (Result<()>, String, String) {
		let mut out = Vec::new();
		let mut err = Vec::new();
		let result = run(args, &mut out, &mut err);
		(result, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
	}

	#[test]
	fn banner_lines_share_one_width() {
		let banner = mismatch_banner(4);
		assert!(banner.contains("history length:4"));
		assert!(banner.contains("GENERATING!"));
		for line in banner.lines() {
			assert_eq!(line.chars().count(), BANNER_WIDTH, "{line:?}");
		}
	}

	#[test]
	fn banner_widens_for_long_lengths() {
		for trained in [1000, usize::MAX] {
			let banner = mismatch_banner(trained);
			assert!(banner.contains(&format!("history length:{trained}")));

			let widths: Vec<usize> = banner.lines().map(|line| line.chars().count()).collect();
			assert!(widths.iter().all(|&width| width == widths[0] && width >= BANNER_WIDTH), "{widths:?}");
		}
	}

	#[test]
	fn training_saves_model_next_to_corpus() {
		let dir = tempdir().unwrap();
		let corpus = dir.path().join("corpus.txt");
		std::fs::write(&corpus, "abcabcabc").unwrap();

		let args = parse(&["-f", corpus.to_str().unwrap(), "-p", "2"]);
		let (result, out, err) = run_to_strings(&args);
		result.unwrap();

		let model_path = dir.path().join("corpus.txt.bin");
		assert_eq!(out, format!("Model saved under \"{}\".\n", model_path.display()));
		assert!(err.is_empty());

		let table = DistributionTable::load(&model_path).unwrap();
		assert_eq!(table.history_length(), Some(2));
	}

	#[test]
	fn loading_with_other_length_warns_before_generating() {
		let dir = tempdir().unwrap();
		let corpus = dir.path().join("digits.txt");
		std::fs::write(&corpus, "0123456789".repeat(3)).unwrap();
		run_to_strings(&parse(&["-f", corpus.to_str().unwrap(), "-p", "3"])).0.unwrap();

		let model = dir.path().join("digits.txt.bin");
		let args = parse(&["-m", model.to_str().unwrap(), "-p", "5", "-g", "12", "-s", "9"]);
		let (result, out, err) = run_to_strings(&args);
		result.unwrap();

		assert_eq!(err, format!("{}\n", mismatch_banner(3)));
		assert_eq!(out, "012345678901\n");
	}

	#[test]
	fn nomodel_generates_without_saving() {
		let dir = tempdir().unwrap();
		let corpus = dir.path().join("ab.txt");
		std::fs::write(&corpus, "ababab").unwrap();

		let args = parse(&["-f", corpus.to_str().unwrap(), "-n", "-p", "1", "-g", "5"]);
		let (result, out, err) = run_to_strings(&args);
		result.unwrap();

		assert_eq!(out, "ababa\n");
		assert!(err.is_empty());
		assert!(!dir.path().join("ab.txt.bin").exists());
	}

	#[test]
	fn lookup_failure_exits_with_hint() {
		let dir = tempdir().unwrap();
		let corpus = dir.path().join("abc.txt");
		std::fs::write(&corpus, "abc").unwrap();

		let args = parse(&["-f", corpus.to_str().unwrap(), "-n", "-p", "1", "-g", "10"]);
		let (result, _, _) = run_to_strings(&args);
		let error = result.unwrap_err();

		let mut err = Vec::new();
		assert_eq!(report(&error, &mut err), 1);
		assert!(String::from_utf8(err).unwrap().contains("hint: generation reached"));
	}

	#[test]
	fn empty_corpus_is_a_configuration_failure() {
		let dir = tempdir().unwrap();
		let corpus = dir.path().join("empty.txt");
		std::fs::write(&corpus, "").unwrap();

		let args = parse(&["-f", corpus.to_str().unwrap(), "-n"]);
		let error = run_to_strings(&args).0.unwrap_err();
		assert!(error.downcast_ref::<ModelError>().is_some_and(ModelError::is_configuration));

		let mut err = Vec::new();
		assert_eq!(report(&error, &mut err), 1);
		assert!(String::from_utf8(err).unwrap().contains("hint: retrain"));
	}

	#[test]
	fn missing_inputs_exit_with_failure() {
		let error = run_to_strings(&parse(&[])).0.unwrap_err();
		assert_eq!(report(&error, &mut Vec::<u8>::new()), 1);
	}

	#[test]
	fn invalid_history_length_exits_like_a_usage_error() {
		let error = anyhow::Error::from(ModelError::InvalidHistoryLength(0));
		assert_eq!(report(&error, &mut Vec::<u8>::new()), 2);
	}
}
