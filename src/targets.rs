//! Target resolution: turn path and glob patterns into concrete files.

use crate::error::{PatchError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Whether `pattern` contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
	pattern.contains(GLOB_META)
}

/// Resolve path and glob patterns against `base`.
///
/// - Plain paths are returned as given (joined to `base`), even when they do
///   not exist; reading them later reports the error.
/// - Globs are matched against paths relative to `base`. `*` stays within one
///   directory, `**` crosses directories. Matches are sorted per pattern.
/// - A glob matching nothing contributes nothing.
/// - Duplicates are dropped, keeping the first occurrence.
pub fn resolve_targets<S: AsRef<str>>(base: &Path, patterns: &[S]) -> Result<Vec<PathBuf>> {
	let mut resolved = Vec::new();
	let mut seen = HashSet::new();

	for pattern in patterns {
		let pattern = pattern.as_ref();
		let matches = if is_glob(pattern) {
			expand_glob(base, pattern)?
		} else {
			vec![base.join(pattern)]
		};

		if matches.is_empty() {
			debug!(pattern, "pattern matched no files");
		}

		for path in matches {
			if seen.insert(path.clone()) {
				resolved.push(path);
			}
		}
	}

	debug!(count = resolved.len(), "resolved targets");
	Ok(resolved)
}

fn build_matcher(glob: &str, pattern: &str) -> Result<GlobMatcher> {
	let glob = GlobBuilder::new(glob)
		.literal_separator(true)
		.build()
		.map_err(|source| PatchError::InvalidGlob {
			pattern: pattern.to_string(),
			source,
		})?;
	Ok(glob.compile_matcher())
}

/// Split `pattern` into its leading directories without glob metacharacters
/// and the glob remainder, which is matched relative to those directories.
///
/// `.` components are dropped, so `./src/*.rs` and `src/*.rs` are the same
/// pattern. `..` and absolute prefixes stay in the walk root.
fn split_glob(pattern: &str) -> (PathBuf, String) {
	let mut prefix = PathBuf::new();
	let mut rest: Vec<String> = Vec::new();

	for component in Path::new(pattern).components() {
		if component == Component::CurDir {
			continue;
		}
		let text = component.as_os_str().to_string_lossy();
		if rest.is_empty() && !text.contains(GLOB_META) {
			prefix.push(component);
		} else {
			rest.push(text.into_owned());
		}
	}

	(prefix, rest.join("/"))
}

fn expand_glob(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
	let (prefix, glob) = split_glob(pattern);
	let matcher = build_matcher(&glob, pattern)?;
	let walk_root = base.join(prefix);

	if !walk_root.is_dir() {
		return Ok(Vec::new());
	}

	let mut matched = Vec::new();
	for entry in WalkDir::new(&walk_root).into_iter().filter_map(|e| match e {
		Ok(entry) => Some(entry),
		Err(err) => {
			debug!(error = %err, "skipping unreadable entry");
			None
		}
	}) {
		if !entry.file_type().is_file() {
			continue;
		}

		let path = entry.path();
		let relative = path.strip_prefix(&walk_root).unwrap_or(path);
		if matcher.is_match(relative) {
			matched.push(path.to_path_buf());
		}
	}

	matched.sort();
	Ok(matched)
}
