#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

const GUARD: &str = r#"const db = await getDb(); if (!db) throw new TRPCError({ code: "INTERNAL_SERVER_ERROR", message: "Database not available" });"#;

fn routefix_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("routefix").unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
	fs::read_to_string(root.join(rel)).unwrap()
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	routefix_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("regex and literal patches"));
}

#[test]
fn test_version_flag() {
	routefix_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("routefix"));
}

#[test]
fn test_no_args_shows_help() {
	routefix_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// fix (built-in presets)
// ============================================================================

#[test]
fn test_fix_repairs_routers() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"server/routers/configRouter.ts",
		&format!("const [config] = {GUARD} await db.select().from(configs);\n"),
	);
	write(
		root,
		"server/routers/userRouter.ts",
		&format!("{GUARD} await db.select().from(users);\n{GUARD} await db.update(users).set(patch);\n"),
	);
	let clean = format!("{GUARD}\nreturn await db.select().from(logs);\n");
	write(root, "server/routers/logRouter.ts", &clean);

	routefix_cmd()
		.arg("fix")
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed: server/routers/configRouter.ts"))
		.stdout(predicate::str::contains("Fixed: server/routers/userRouter.ts"))
		.stdout(predicate::str::contains("logRouter.ts").not())
		.stdout(predicate::str::contains("Done. 2 file(s) fixed, 1 unchanged, 0 failed."));

	assert_eq!(
		read(root, "server/routers/configRouter.ts"),
		format!("{GUARD} const [config] = await db.select().from(configs);\n")
	);
	assert_eq!(
		read(root, "server/routers/userRouter.ts"),
		format!("{GUARD} await db.select().from(users);\nawait db.update(users).set(patch);\n")
	);
	assert_eq!(read(root, "server/routers/logRouter.ts"), clean);
}

#[test]
fn test_fix_second_run_is_a_no_op() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"server/routers/a.ts",
		&format!("const rows = {GUARD} await db.select().from(t);\n"),
	);

	routefix_cmd().arg("fix").current_dir(root).assert().success();
	let fixed = read(root, "server/routers/a.ts");

	routefix_cmd()
		.arg("fix")
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed:").not())
		.stdout(predicate::str::contains("0 file(s) fixed, 1 unchanged"));

	assert_eq!(read(root, "server/routers/a.ts"), fixed);
}

#[test]
fn test_fix_with_no_matching_files() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.arg("fix")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No matching files."));
}

#[test]
fn test_fix_dry_run_with_diff() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	let broken = format!("const [config] = {GUARD} await db.select()\n");
	write(root, "server/routers/a.ts", &broken);

	routefix_cmd()
		.args(["fix", "--dry-run", "--diff"])
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Would fix: server/routers/a.ts"))
		.stdout(predicate::str::contains("--- a/server/routers/a.ts"))
		.stdout(predicate::str::contains("+const db = await getDb();"))
		.stdout(predicate::str::contains("Dry run. 1 file(s) would be fixed"));

	assert_eq!(read(root, "server/routers/a.ts"), broken);
}

#[test]
fn test_fix_plain_preset_with_explicit_pattern() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	let plain = r#"const db = await getDb(); if (!db) throw new Error("Database not available");"#;
	write(
		root,
		"lib/service.ts",
		&format!("return {plain} await db.select().from(jobs);\n"),
	);

	routefix_cmd()
		.args(["fix", "--preset", "db-guard-plain", "lib/*.ts"])
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed: lib/service.ts"));

	assert_eq!(
		read(root, "lib/service.ts"),
		format!("{plain} return await db.select().from(jobs);\n")
	);
}

#[test]
fn test_fix_with_dot_slash_glob() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"server/routers/a.ts",
		&format!("const rows = {GUARD} await db.select().from(t);\n"),
	);

	routefix_cmd()
		.args(["fix", "./server/routers/*.ts"])
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed: server/routers/a.ts"))
		.stdout(predicate::str::contains("No matching files.").not());

	assert_eq!(
		read(root, "server/routers/a.ts"),
		format!("{GUARD} const rows = await db.select().from(t);\n")
	);
}

#[test]
fn test_fix_unknown_preset() {
	routefix_cmd()
		.args(["fix", "--preset", "nope"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Unknown preset: nope"));
}

// ============================================================================
// Failure policies
// ============================================================================

#[test]
fn test_missing_explicit_target_halts_run() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(root, "b.txt", "colour");

	routefix_cmd()
		.args(["apply", "-e", "s/colour/color/g", "missing.txt", "b.txt"])
		.current_dir(root)
		.assert()
		.failure()
		.stdout(predicate::str::contains("Stopped after the first failure."))
		.stderr(predicate::str::contains("missing.txt"));

	assert_eq!(read(root, "b.txt"), "colour");
}

#[test]
fn test_keep_going_processes_remaining_targets() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(root, "b.txt", "colour");

	routefix_cmd()
		.args([
			"apply",
			"--keep-going",
			"-e",
			"s/colour/color/g",
			"missing.txt",
			"b.txt",
		])
		.current_dir(root)
		.assert()
		.failure()
		.stdout(predicate::str::contains("Fixed: b.txt"))
		.stdout(predicate::str::contains("1 file(s) fixed, 0 unchanged, 1 failed."));

	assert_eq!(read(root, "b.txt"), "color");
}

// ============================================================================
// apply (rule-set files and expressions)
// ============================================================================

#[test]
fn test_apply_discovers_rule_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		".routefix.toml",
		r#"
name = "helpers"
targets = ["src/*.ts"]

[[rules]]
pattern = 'oldHelper\((\w+)\)'
replace = 'newHelper($1)'

[[rules]]
find = "newHelper(a)"
replace = "newHelper(alpha)"
"#,
	);
	write(root, "src/a.ts", "oldHelper(a); oldHelper(b);\n");
	write(root, "src/b.js", "oldHelper(a);\n");

	routefix_cmd()
		.arg("apply")
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed: src/a.ts"));

	assert_eq!(read(root, "src/a.ts"), "newHelper(alpha); newHelper(b);\n");
	assert_eq!(read(root, "src/b.js"), "oldHelper(a);\n");
}

#[test]
fn test_apply_explicit_rules_and_patterns() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"fixes.toml",
		r#"
[[rules]]
sed = 's/v(\d+)/version-$1/'
"#,
	);
	write(root, "notes/a.md", "v1 v2\n");

	routefix_cmd()
		.args(["apply", "--rules", "fixes.toml", "notes/**/*.md"])
		.current_dir(root)
		.assert()
		.success();

	// No `g` flag: only the first match is replaced
	assert_eq!(read(root, "notes/a.md"), "version-1 v2\n");
}

#[test]
fn test_apply_appends_expressions_after_rule_set() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"fixes.toml",
		r#"
[[rules]]
find = "a"
replace = "b"
"#,
	);
	write(root, "x.txt", "a");

	routefix_cmd()
		.args(["apply", "--rules", "fixes.toml", "-e", "s/b/c/", "x.txt"])
		.current_dir(root)
		.assert()
		.success();

	assert_eq!(read(root, "x.txt"), "c");
}

#[test]
fn test_apply_without_rules() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.args(["apply", "x.txt"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No rule set found"));
}

#[test]
fn test_apply_expression_needs_patterns() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.args(["apply", "-e", "s/a/b/"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No target patterns given"));
}

#[test]
fn test_apply_invalid_expression() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.args(["apply", "-e", "s/[oops/x/", "a.txt"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid expression"));
}

// ============================================================================
// check (checklist toggling)
// ============================================================================

#[test]
fn test_check_ticks_item_once() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(
		root,
		"todo.md",
		"# Tasks\n- [ ] Tạo service xuất PDF cho báo cáo SPC\n- [ ] Khác\n",
	);

	routefix_cmd()
		.args(["check", "Tạo service xuất PDF cho báo cáo SPC"])
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed: todo.md"));

	assert_eq!(
		read(root, "todo.md"),
		"# Tasks\n- [x] Tạo service xuất PDF cho báo cáo SPC\n- [ ] Khác\n"
	);

	routefix_cmd()
		.args(["check", "Tạo service xuất PDF cho báo cáo SPC"])
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("Fixed:").not())
		.stdout(predicate::str::contains("0 file(s) fixed, 1 unchanged"));
}

#[test]
fn test_check_ticks_whole_line_only() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(root, "todo.md", "- [ ] Deploy to prod\n- [ ] Deploy\n");

	routefix_cmd()
		.args(["check", "Deploy"])
		.current_dir(root)
		.assert()
		.success();

	assert_eq!(read(root, "todo.md"), "- [ ] Deploy to prod\n- [x] Deploy\n");
}

#[test]
fn test_check_undo_with_custom_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write(root, "docs/plan.md", "- [x] Ship\n");

	routefix_cmd()
		.args(["check", "--file", "docs/plan.md", "--undo", "Ship"])
		.current_dir(root)
		.assert()
		.success();

	assert_eq!(read(root, "docs/plan.md"), "- [ ] Ship\n");
}

#[test]
fn test_check_missing_file_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.args(["check", "Anything"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_check_requires_items() {
	routefix_cmd().arg("check").assert().failure();
}

// ============================================================================
// presets, validate, init
// ============================================================================

#[test]
fn test_presets_lists_rules() {
	routefix_cmd()
		.arg("presets")
		.assert()
		.success()
		.stdout(predicate::str::contains("db-guard"))
		.stdout(predicate::str::contains("db-guard-plain"))
		.stdout(predicate::str::contains("hoist-guard-from-declaration"))
		.stdout(predicate::str::contains("collapse-redundant-guard"));
}

#[test]
fn test_validate_no_rule_file() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.arg("validate")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No .routefix.toml found"));
}

#[test]
fn test_validate_valid_rule_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(
		temp_dir.path(),
		"rules.toml",
		r#"
name = "demo"

[[rules]]
name = "tick"
find = "- [ ] A"
replace = "- [x] A"
global = false
"#,
	);

	routefix_cmd()
		.args(["validate", "rules.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Rule set demo is valid (1 rules)"))
		.stdout(predicate::str::contains("tick (literal, first)"));
}

#[test]
fn test_validate_invalid_rule_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(
		temp_dir.path(),
		".routefix.toml",
		r#"
[[rules]]
find = "a"
pattern = "b"
replace = "c"
"#,
	);

	routefix_cmd()
		.arg("validate")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Mutually exclusive"));
}

#[test]
fn test_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".routefix.toml", "invalid toml [[[");

	routefix_cmd()
		.arg("validate")
		.current_dir(temp_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_init_creates_rule_file() {
	let temp_dir = tempfile::tempdir().unwrap();

	routefix_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .routefix.toml"));

	let content = read(temp_dir.path(), ".routefix.toml");
	assert!(content.contains("[[rules]]"));

	routefix_cmd()
		.arg("validate")
		.current_dir(temp_dir.path())
		.assert()
		.success();
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".routefix.toml", "# existing");

	routefix_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".routefix.toml", "# existing");

	routefix_cmd()
		.args(["init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert!(read(temp_dir.path(), ".routefix.toml").contains("[[rules]]"));
}
