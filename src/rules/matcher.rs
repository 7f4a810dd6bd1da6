use crate::config::parser::parse_rule_file;
use crate::config::types::{RuleSetFile, RuleSpec};
use crate::error::{PatchError, Result};
use crate::rules::rewriter::Substitution;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use tracing::trace;

/// What a rule looks for.
#[derive(Debug, Clone)]
pub enum Matcher {
	/// Exact text, matched byte for byte.
	Literal(String),

	/// Regular expression; the replacement may reference its capture groups.
	Regex(Regex),
}

/// A single matcher/replacement pair applied over a whole file's content.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
	/// Name used in logs and listings.
	pub name: String,

	pub matcher: Matcher,

	/// Replacement template. Literal rules insert it verbatim; regex rules
	/// expand `$1`, `${1}` and `${name}`.
	pub replacement: String,

	/// Replace every non-overlapping match (true) or only the first (false).
	pub global: bool,
}

impl SubstitutionRule {
	/// A global literal replacement.
	pub fn literal(
		name: impl Into<String>,
		find: impl Into<String>,
		replacement: impl Into<String>,
	) -> Self {
		SubstitutionRule {
			name: name.into(),
			matcher: Matcher::Literal(find.into()),
			replacement: replacement.into(),
			global: true,
		}
	}

	/// A global regex replacement, compiling `pattern`.
	pub fn regex(
		name: impl Into<String>,
		pattern: &str,
		replacement: impl Into<String>,
	) -> Result<Self> {
		Ok(SubstitutionRule {
			name: name.into(),
			matcher: Matcher::Regex(compile_regex(pattern)?),
			replacement: replacement.into(),
			global: true,
		})
	}

	/// A rule from a sed-style expression such as `s/a(\d)/b$1/g`.
	pub fn from_sed(name: impl Into<String>, expr: &str) -> Result<Self> {
		let sub = Substitution::parse(expr)?;
		Ok(SubstitutionRule {
			name: name.into(),
			matcher: Matcher::Regex(sub.pattern),
			replacement: sub.replacement,
			global: sub.global,
		})
	}

	/// Restrict this rule to the first match only.
	pub fn first_only(mut self) -> Self {
		self.global = false;
		self
	}

	/// Compile a rule declared in a rule-set file. `index` is 1-based and only
	/// used to name unnamed rules.
	pub fn from_spec(spec: &RuleSpec, index: usize) -> Result<Self> {
		spec.validate(index)?;
		let name = spec.display_name(index);

		if let Some(ref expr) = spec.sed {
			let mut rule = SubstitutionRule::from_sed(name, expr)?;
			// An explicit `global` overrides the sed flag
			if let Some(global) = spec.global {
				rule.global = global;
			}
			return Ok(rule);
		}

		let rule = if let Some(ref find) = spec.find {
			SubstitutionRule::literal(name, find.as_str(), replacement_of(spec, index)?)
		} else if let Some(ref pattern) = spec.pattern {
			SubstitutionRule::regex(name, pattern, replacement_of(spec, index)?)?
		} else {
			return Err(PatchError::EmptyMatcher { rule: name });
		};

		Ok(SubstitutionRule {
			global: spec.global.unwrap_or(true),
			..rule
		})
	}

	/// Check whether the matcher occurs anywhere in `input`.
	pub fn is_match(&self, input: &str) -> bool {
		match &self.matcher {
			Matcher::Literal(needle) => !needle.is_empty() && input.contains(needle.as_str()),
			Matcher::Regex(regex) => regex.is_match(input),
		}
	}

	/// Apply this rule to `input`. Returns `Cow::Borrowed` when nothing matched.
	pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
		match &self.matcher {
			Matcher::Literal(needle) => {
				if !self.is_match(input) {
					Cow::Borrowed(input)
				} else if self.global {
					Cow::Owned(input.replace(needle.as_str(), &self.replacement))
				} else {
					Cow::Owned(input.replacen(needle.as_str(), &self.replacement, 1))
				}
			}
			Matcher::Regex(regex) => {
				if self.global {
					regex.replace_all(input, self.replacement.as_str())
				} else {
					regex.replace(input, self.replacement.as_str())
				}
			}
		}
	}
}

/// The `replace` value, required by `find` and `pattern` rules.
fn replacement_of(spec: &RuleSpec, index: usize) -> Result<String> {
	spec.replace
		.clone()
		.ok_or_else(|| PatchError::MissingReplacement {
			rule: spec.display_name(index),
		})
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| PatchError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Apply `rules` in order over the entire content.
///
/// Each rule sees the output of the previous one. Rules that match nothing
/// leave the text untouched.
pub fn apply_rules(content: &str, rules: &[SubstitutionRule]) -> String {
	let mut current = content.to_string();

	for rule in rules {
		let next = match rule.apply(&current) {
			Cow::Borrowed(_) => {
				trace!(rule = %rule.name, "no match");
				continue;
			}
			Cow::Owned(next) => next,
		};
		trace!(rule = %rule.name, "applied");
		current = next;
	}

	current
}

/// An ordered, named list of compiled rules plus the targets they apply to
/// by default.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	pub name: String,

	/// Path or glob patterns used when the caller names none.
	pub targets: Vec<String>,

	pub rules: Vec<SubstitutionRule>,
}

impl RuleSet {
	/// An empty rule set to append ad-hoc rules to.
	pub fn empty(name: impl Into<String>) -> Self {
		RuleSet {
			name: name.into(),
			..Default::default()
		}
	}
}

/// Compile all rules declared in a parsed rule-set file.
pub fn compile_rule_set(file: &RuleSetFile, fallback_name: &str) -> Result<RuleSet> {
	let rules = file
		.rules
		.iter()
		.enumerate()
		.map(|(i, spec)| SubstitutionRule::from_spec(spec, i + 1))
		.collect::<Result<Vec<_>>>()?;

	Ok(RuleSet {
		name: file
			.name
			.clone()
			.unwrap_or_else(|| fallback_name.to_string()),
		targets: file.targets.clone(),
		rules,
	})
}

/// Parse and compile a rule-set file. The file stem names unnamed sets.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
	let file = parse_rule_file(path)?;
	let fallback = path
		.file_stem()
		.map(|stem| stem.to_string_lossy().trim_start_matches('.').to_string())
		.unwrap_or_else(|| "rules".to_string());
	compile_rule_set(&file, &fallback)
}
