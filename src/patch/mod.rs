//! Applying rules to files on disk.
//!
//! Files are processed one at a time, in order. A file is only rewritten when
//! the rules actually changed its content, so re-running over fixed files is a
//! no-op.

pub mod diff;

use crate::error::{PatchError, Result};
use crate::rules::{SubstitutionRule, apply_rules};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub use diff::{DiffStat, unified_diff};

/// What to do when reading or writing a target fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
	/// Stop at the first failing file.
	#[default]
	Halt,

	/// Record the failure and move on to the next file.
	Continue,
}

/// Options for [`run`].
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
	/// Compute changes without writing them.
	pub dry_run: bool,

	/// Print a unified diff for every changed file.
	pub show_diff: bool,

	pub policy: FailurePolicy,

	/// Paths under this directory are printed relative to it.
	pub display_base: Option<PathBuf>,
}

/// Original and patched content of a file whose content changed.
#[derive(Debug, Clone)]
pub struct FilePatch {
	pub path: PathBuf,
	pub original: String,
	pub patched: String,
}

impl FilePatch {
	pub fn diff(&self, display_path: &Path) -> String {
		unified_diff(&self.original, &self.patched, display_path)
	}

	pub fn stat(&self) -> DiffStat {
		DiffStat::from_texts(&self.original, &self.patched)
	}
}

/// Read a target file as UTF-8 text.
pub fn read_target(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| PatchError::ReadFailed {
		path: path.to_path_buf(),
		source,
	})
}

/// Read `path` and apply `rules`. Returns `None` when the content is unchanged.
pub fn compute_patch(path: &Path, rules: &[SubstitutionRule]) -> Result<Option<FilePatch>> {
	let original = read_target(path)?;
	let patched = apply_rules(&original, rules);

	if patched == original {
		debug!(path = %path.display(), "unchanged");
		return Ok(None);
	}

	Ok(Some(FilePatch {
		path: path.to_path_buf(),
		original,
		patched,
	}))
}

/// Replace the file with its patched content.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over the target. A failed write leaves the original untouched.
pub fn write_patch(patch: &FilePatch) -> Result<()> {
	let write_failed = |source: io::Error| PatchError::WriteFailed {
		path: patch.path.clone(),
		source,
	};

	let dir = match patch.path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let permissions = std::fs::metadata(&patch.path)
		.map_err(write_failed)?
		.permissions();

	let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
	tmp.write_all(patch.patched.as_bytes()).map_err(write_failed)?;
	tmp.as_file().set_permissions(permissions).map_err(write_failed)?;
	tmp.persist(&patch.path).map_err(|err| write_failed(err.error))?;

	Ok(())
}

/// Apply `rules` to one file, writing it back only if the content changed.
///
/// Returns whether the file was rewritten.
pub fn patch_file(path: &Path, rules: &[SubstitutionRule]) -> Result<bool> {
	match compute_patch(path, rules)? {
		Some(patch) => {
			write_patch(&patch)?;
			Ok(true)
		}
		None => Ok(false),
	}
}

/// Outcome of a [`run`].
#[derive(Debug, Default)]
pub struct RunSummary {
	/// Files rewritten (or that would be, in a dry run).
	pub changed: Vec<PathBuf>,

	pub unchanged: Vec<PathBuf>,

	pub failed: Vec<(PathBuf, PatchError)>,

	/// Whether the halt policy stopped the run before all targets were seen.
	pub aborted: bool,

	pub dry_run: bool,
}

impl RunSummary {
	/// True when no target failed.
	pub fn is_clean(&self) -> bool {
		self.failed.is_empty()
	}
}

impl fmt::Display for RunSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (lead, verb) = if self.dry_run {
			("Dry run.", "would be fixed")
		} else {
			("Done.", "fixed")
		};
		write!(
			f,
			"{lead} {} file(s) {verb}, {} unchanged, {} failed.",
			self.changed.len(),
			self.unchanged.len(),
			self.failed.len()
		)?;
		if self.aborted {
			write!(f, " Stopped after the first failure.")?;
		}
		Ok(())
	}
}

fn display_path<'a>(path: &'a Path, options: &PatchOptions) -> &'a Path {
	options
		.display_base
		.as_deref()
		.and_then(|base| path.strip_prefix(base).ok())
		.unwrap_or(path)
}

/// Apply `rules` to every target in order.
///
/// Prints `Fixed: <path>` (or `Would fix: <path>`) to `out` for each changed
/// file and a final summary line. Per-file failures are collected in the
/// summary; the returned `io::Error` only covers writing to `out`.
pub fn run<W: Write>(
	targets: &[PathBuf],
	rules: &[SubstitutionRule],
	options: &PatchOptions,
	out: &mut W,
) -> io::Result<RunSummary> {
	let mut summary = RunSummary {
		dry_run: options.dry_run,
		..Default::default()
	};

	for (index, path) in targets.iter().enumerate() {
		let shown = display_path(path, options);

		let result = compute_patch(path, rules).and_then(|patch| match patch {
			Some(patch) if !options.dry_run => write_patch(&patch).map(|()| Some(patch)),
			other => Ok(other),
		});

		match result {
			Ok(Some(patch)) => {
				if options.dry_run {
					writeln!(out, "Would fix: {}", shown.display())?;
				} else {
					writeln!(out, "Fixed: {}", shown.display())?;
				}
				if options.show_diff {
					write!(out, "{}", patch.diff(shown))?;
					writeln!(out, "{}", patch.stat())?;
				}
				summary.changed.push(path.clone());
			}
			Ok(None) => summary.unchanged.push(path.clone()),
			Err(err) => {
				warn!(path = %shown.display(), error = %err, "failed to patch");
				summary.failed.push((path.clone(), err));
				if options.policy == FailurePolicy::Halt {
					summary.aborted = index + 1 < targets.len();
					break;
				}
			}
		}
	}

	writeln!(out, "{summary}")?;
	Ok(summary)
}
