/// Generate a template `.routefix.toml` for `routefix init`.
pub fn generate_init_template() -> String {
	r#"# routefix rule set
# Rules run top to bottom; each one sees the previous rule's output.

name = "project-fixes"

# Files to patch when no patterns are passed on the command line.
targets = ["server/routers/*.ts"]

# Regex rule. `replace` may reference capture groups as $1 or ${name}.
[[rules]]
name = "hoist-config-query"
pattern = 'const \[(\w+)\] = (const db = await getDb\(\);)\s*await db\.'
replace = '$2 const [$1] = await db.'

# Literal rule, first occurrence only.
# [[rules]]
# find = "- [ ] Review router fixes"
# replace = "- [x] Review router fixes"
# global = false

# Sed-style rule; the `g` flag makes it global.
# [[rules]]
# sed = 's/throw new Error\("Database not available"\)/throw new Error("Database unavailable")/g'
"#
	.to_string()
}
