use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};

/// Suffix appended to a corpus file name to build its model path.
pub const MODEL_SUFFIX: &str = "bin";

/// Reads a whole corpus file into memory.
///
/// The text is kept as-is: no line splitting, no escaping. Any character,
/// including the sentinel, is treated as literal data.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|e| ModelError::io(path, e))
}

/// Builds the model path for a corpus by appending `.{suffix}` to its file name.
///
/// Example:
/// `data/input.txt` + `"bin"` → `data/input.txt.bin`
pub fn build_model_path<P: AsRef<Path>>(corpus_path: P, suffix: &str) -> Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();

	let file_name = corpus_path.file_name().ok_or_else(|| {
		ModelError::io(
			corpus_path,
			std::io::Error::new(std::io::ErrorKind::InvalidInput, "Input path has no filename"),
		)
	})?;

	let mut name = OsString::from(file_name);
	name.push(".");
	name.push(suffix);

	Ok(corpus_path.with_file_name(name))
}
