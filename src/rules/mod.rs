//! Substitution rules for routefix.
//!
//! This module handles:
//! - Literal and regex matchers with capture-group replacement templates
//! - Sed-like substitution parsing
//! - Ordered, whole-content rule application

pub mod matcher;
pub mod rewriter;

pub use matcher::{
	Matcher, RuleSet, SubstitutionRule, apply_rules, compile_rule_set, load_rule_set,
};
pub use rewriter::Substitution;
