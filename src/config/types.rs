use crate::error::PatchError;
use serde::Deserialize;

/// Top-level contents of a rule-set file such as `.routefix.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSetFile {
	/// Display name; defaults to the file stem.
	#[serde(default)]
	pub name: Option<String>,

	/// Default path or glob patterns, relative to the working directory.
	#[serde(default)]
	pub targets: Vec<String>,

	/// Substitutions, applied in the order written.
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
}

/// A substitution as declared in a rule-set file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleSpec {
	pub name: Option<String>,

	/// Literal text to find (mutually exclusive with pattern and sed).
	pub find: Option<String>,

	/// Regex to find (mutually exclusive with find and sed).
	pub pattern: Option<String>,

	/// Sed-style substitution (mutually exclusive with find and pattern).
	/// Format: "s/pattern/replacement/" or "s/pattern/replacement/g" for global.
	pub sed: Option<String>,

	/// Replacement for `find` / `pattern`. Regex rules may use `$1` or `${name}`.
	pub replace: Option<String>,

	/// Replace all matches (default) or only the first.
	pub global: Option<bool>,
}

impl RuleSpec {
	/// The rule's name, or `rule-<index>` when unnamed.
	pub fn display_name(&self, index: usize) -> String {
		self.name
			.clone()
			.unwrap_or_else(|| format!("rule-{index}"))
	}

	/// Validate that exactly one matcher is set and `replace` fits it.
	pub fn validate(&self, index: usize) -> Result<(), PatchError> {
		let matcher_fields = [
			("find", self.find.is_some()),
			("pattern", self.pattern.is_some()),
			("sed", self.sed.is_some()),
		];

		let set_fields: Vec<_> = matcher_fields
			.iter()
			.filter(|(_, is_set)| *is_set)
			.map(|(name, _)| *name)
			.collect();

		if set_fields.len() > 1 {
			return Err(PatchError::MutuallyExclusive {
				rule: self.display_name(index),
				option1: set_fields[0].to_string(),
				option2: set_fields[1].to_string(),
			});
		}

		if set_fields.is_empty() || self.find.as_deref() == Some("") {
			return Err(PatchError::EmptyMatcher {
				rule: self.display_name(index),
			});
		}

		if self.sed.is_some() && self.replace.is_some() {
			return Err(PatchError::UnexpectedReplacement {
				rule: self.display_name(index),
			});
		}

		Ok(())
	}
}

impl RuleSetFile {
	/// Validate all rules in this file.
	pub fn validate(&self) -> Result<(), PatchError> {
		for (i, rule) in self.rules.iter().enumerate() {
			rule.validate(i + 1)?;
		}
		Ok(())
	}
}
