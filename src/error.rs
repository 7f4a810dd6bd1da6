use std::path::PathBuf;

/// Library-level structured errors for routefix.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
	#[error("Failed to read rule set: {path}")]
	RulesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rule set: {path}")]
	RulesParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution `{expr}`: {reason}")]
	InvalidSubstitution { expr: String, reason: String },

	#[error("Invalid glob pattern: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error("Mutually exclusive options in rule {rule}: {option1} and {option2}")]
	MutuallyExclusive {
		rule: String,
		option1: String,
		option2: String,
	},

	#[error("Rule {rule} needs one of `find`, `pattern` or `sed`")]
	EmptyMatcher { rule: String },

	#[error("Rule {rule} has no `replace` value")]
	MissingReplacement { rule: String },

	#[error("Rule {rule} sets `replace` alongside `sed`; the sed expression already carries it")]
	UnexpectedReplacement { rule: String },

	#[error("Unknown preset: {name}")]
	UnknownPreset { name: String },

	#[error("Failed to read {path}")]
	ReadFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write {path}")]
	WriteFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using PatchError.
pub type Result<T> = std::result::Result<T, PatchError>;
