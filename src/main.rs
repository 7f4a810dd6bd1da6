use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use routefix_cli::config::{RULES_FILE_NAME, discover_rule_file, generate_init_template};
use routefix_cli::patch::{FailurePolicy, PatchOptions, RunSummary, run};
use routefix_cli::presets::{
	DEFAULT_CHECKLIST, DEFAULT_PRESET, PRESETS, checklist_rule_set, find_preset,
};
use routefix_cli::rules::{Matcher, RuleSet, SubstitutionRule, load_rule_set};
use routefix_cli::targets::resolve_targets;

#[derive(Parser)]
#[command(name = "routefix")]
#[command(
	author,
	version,
	about = "CLI tool for applying ordered regex and literal patches to source trees and checklists"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Increase log output on stderr (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Run a built-in preset over its default targets or the given patterns
	Fix {
		/// Preset to run (see `routefix presets`)
		#[arg(long, default_value = DEFAULT_PRESET)]
		preset: String,

		#[command(flatten)]
		opts: RunArgs,

		/// Paths or glob patterns; defaults to the preset's targets
		patterns: Vec<String>,
	},
	/// Run a rule-set file, a preset, or ad-hoc sed expressions
	Apply {
		/// Rule-set file (defaults to the nearest .routefix.toml)
		#[arg(long, value_name = "FILE", conflicts_with = "preset")]
		rules: Option<PathBuf>,

		/// Built-in preset to start from
		#[arg(long)]
		preset: Option<String>,

		/// Sed-style expression appended after the rule set, e.g. 's/foo/bar/g'
		#[arg(short = 'e', long = "expr", value_name = "SED")]
		exprs: Vec<String>,

		#[command(flatten)]
		opts: RunArgs,

		/// Paths or glob patterns; defaults to the rule set's targets
		patterns: Vec<String>,
	},
	/// Tick checklist items in a markdown task list
	Check {
		/// Markdown file to update
		#[arg(long, default_value = DEFAULT_CHECKLIST)]
		file: String,

		/// Untick the items instead
		#[arg(long)]
		undo: bool,

		/// Show what would change without writing
		#[arg(long)]
		dry_run: bool,

		/// Item text, with or without the leading `- [ ] `
		#[arg(required = true)]
		items: Vec<String>,
	},
	/// List built-in presets and their rules
	Presets,
	/// Check a rule-set file for errors without patching anything
	Validate {
		/// Rule-set file (defaults to the nearest .routefix.toml)
		file: Option<PathBuf>,
	},
	/// Create a template .routefix.toml in the current directory
	Init {
		/// Overwrite an existing .routefix.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Args)]
struct RunArgs {
	/// Show what would change without writing
	#[arg(long)]
	dry_run: bool,

	/// Print a unified diff for each changed file
	#[arg(long)]
	diff: bool,

	/// Keep processing remaining files after a read or write failure
	#[arg(long)]
	keep_going: bool,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match dispatch(cli.command) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		1 => EnvFilter::new("debug"),
		_ => EnvFilter::new("trace"),
	};

	// Ignore the error if a subscriber is already installed
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}

fn dispatch(command: Commands) -> Result<ExitCode> {
	match command {
		Commands::Fix {
			preset,
			opts,
			patterns,
		} => {
			let rule_set = find_preset(&preset)?
				.rule_set()
				.with_context(|| format!("Failed to build preset {preset}"))?;
			handle_run(rule_set, patterns, opts.options())
		}
		Commands::Apply {
			rules,
			preset,
			exprs,
			opts,
			patterns,
		} => handle_apply(rules, preset, &exprs, patterns, opts.options()),
		Commands::Check {
			file,
			undo,
			dry_run,
			items,
		} => {
			let rule_set = checklist_rule_set(&file, &items, undo)
				.context("Failed to build checklist rules")?;
			let options = PatchOptions {
				dry_run,
				..Default::default()
			};
			handle_run(rule_set, Vec::new(), options)
		}
		Commands::Presets => handle_presets(),
		Commands::Validate { file } => handle_validate(file),
		Commands::Init { force } => handle_init(force),
	}
}

impl RunArgs {
	fn options(&self) -> PatchOptions {
		PatchOptions {
			dry_run: self.dry_run,
			show_diff: self.diff,
			policy: if self.keep_going {
				FailurePolicy::Continue
			} else {
				FailurePolicy::Halt
			},
			display_base: None,
		}
	}
}

fn current_dir() -> Result<PathBuf> {
	std::env::current_dir().context("Failed to get current directory")
}

fn handle_apply(
	rules: Option<PathBuf>,
	preset: Option<String>,
	exprs: &[String],
	patterns: Vec<String>,
	options: PatchOptions,
) -> Result<ExitCode> {
	let cwd = current_dir()?;

	let mut rule_set = match (rules, preset) {
		(Some(path), _) => load_rule_set(&path)
			.with_context(|| format!("Failed to load rule set {}", path.display()))?,
		(None, Some(name)) => find_preset(&name)?.rule_set()?,
		(None, None) => match discover_rule_file(&cwd) {
			Some(path) => load_rule_set(&path)
				.with_context(|| format!("Failed to load rule set {}", path.display()))?,
			None if !exprs.is_empty() => RuleSet::empty("command-line"),
			None => anyhow::bail!(
				"No rule set found. Pass --rules, --preset or -e, or create {RULES_FILE_NAME}."
			),
		},
	};

	for (i, expr) in exprs.iter().enumerate() {
		let rule = SubstitutionRule::from_sed(format!("expr-{}", i + 1), expr)
			.with_context(|| format!("Invalid expression: {expr}"))?;
		rule_set.rules.push(rule);
	}

	handle_run(rule_set, patterns, options)
}

fn handle_run(rule_set: RuleSet, patterns: Vec<String>, options: PatchOptions) -> Result<ExitCode> {
	let cwd = current_dir()?;

	let patterns = if patterns.is_empty() {
		rule_set.targets.clone()
	} else {
		patterns
	};
	if patterns.is_empty() {
		anyhow::bail!("No target patterns given and rule set {} has none", rule_set.name);
	}

	let targets = resolve_targets(&cwd, &patterns).context("Failed to resolve targets")?;
	if targets.is_empty() {
		println!("No matching files.");
		return Ok(ExitCode::SUCCESS);
	}

	tracing::debug!(
		rule_set = %rule_set.name,
		rules = rule_set.rules.len(),
		targets = targets.len(),
		"running"
	);

	let options = PatchOptions {
		display_base: Some(cwd.clone()),
		..options
	};
	let summary = run(
		&targets,
		&rule_set.rules,
		&options,
		&mut std::io::stdout().lock(),
	)
	.context("Failed to write output")?;

	let clean = summary.is_clean();
	report_failures(summary, &cwd);

	if clean {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::FAILURE)
	}
}

fn report_failures(summary: RunSummary, cwd: &Path) {
	for (path, err) in summary.failed {
		let shown = path.strip_prefix(cwd).unwrap_or(&path);
		eprintln!("error: {}: {:?}", shown.display(), anyhow::Error::from(err));
	}
}

fn handle_presets() -> Result<ExitCode> {
	println!("Built-in presets:\n");

	for preset in PRESETS {
		println!("{} - {}", preset.name, preset.description);
		println!("  targets: {}", preset.targets.join(", "));

		let rules = preset
			.rules()
			.with_context(|| format!("Failed to build preset {}", preset.name))?;
		for (i, rule) in rules.iter().enumerate() {
			println!("  {}. {}", i + 1, rule.name);
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_validate(file: Option<PathBuf>) -> Result<ExitCode> {
	let path = match file {
		Some(path) => path,
		None => match discover_rule_file(&current_dir()?) {
			Some(path) => path,
			None => {
				println!("No {RULES_FILE_NAME} found.");
				return Ok(ExitCode::SUCCESS);
			}
		},
	};

	match load_rule_set(&path) {
		Ok(rule_set) => {
			println!(
				"Rule set {} is valid ({} rules): {}",
				rule_set.name,
				rule_set.rules.len(),
				path.display()
			);
			for rule in &rule_set.rules {
				let kind = match rule.matcher {
					Matcher::Literal(_) => "literal",
					Matcher::Regex(_) => "regex",
				};
				let scope = if rule.global { "all" } else { "first" };
				println!("  {} ({kind}, {scope})", rule.name);
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Rule set error: {:?}", anyhow::Error::from(e));
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let path = PathBuf::from(RULES_FILE_NAME);

	if path.exists() && !force {
		anyhow::bail!("{RULES_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&path, generate_init_template())
		.with_context(|| format!("Failed to write {}", path.display()))?;

	println!("Created {RULES_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}
