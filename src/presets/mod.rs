//! Built-in rule sets.

pub mod checklist;
pub mod db_guard;

use crate::error::{PatchError, Result};
use crate::rules::{RuleSet, SubstitutionRule};

pub use checklist::{
	DEFAULT_CHECKLIST, check_rules, checklist_rule_set, toggle_pairs, uncheck_rules,
};

/// Preset used by `routefix fix` when none is named.
pub const DEFAULT_PRESET: &str = "db-guard";

/// A rule set compiled into the binary.
pub struct Preset {
	pub name: &'static str,
	pub description: &'static str,

	/// Default path or glob patterns.
	pub targets: &'static [&'static str],

	build: fn() -> Result<Vec<SubstitutionRule>>,
}

impl Preset {
	pub fn rules(&self) -> Result<Vec<SubstitutionRule>> {
		(self.build)()
	}

	pub fn rule_set(&self) -> Result<RuleSet> {
		Ok(RuleSet {
			name: self.name.to_string(),
			targets: self.targets.iter().map(|t| t.to_string()).collect(),
			rules: self.rules()?,
		})
	}
}

impl std::fmt::Debug for Preset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Preset")
			.field("name", &self.name)
			.field("targets", &self.targets)
			.finish_non_exhaustive()
	}
}

pub const PRESETS: &[Preset] = &[
	Preset {
		name: "db-guard",
		description: "Repair misplaced and duplicated TRPCError database guards in routers",
		targets: &["server/routers/*.ts", "server/routers.ts"],
		build: db_guard::trpc_rules,
	},
	Preset {
		name: "db-guard-plain",
		description: "Repair misplaced and duplicated plain Error database guards",
		targets: &["server/*.ts", "server/services/*.ts", "server/routers/*.ts"],
		build: db_guard::plain_rules,
	},
];

/// Look up a built-in preset by name.
pub fn find_preset(name: &str) -> Result<&'static Preset> {
	PRESETS
		.iter()
		.find(|p| p.name == name)
		.ok_or_else(|| PatchError::UnknownPreset {
			name: name.to_string(),
		})
}
