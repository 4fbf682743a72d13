//! C11 support: translates a `symbol_name` glob into a SQL `LIKE` pattern.
//! Ported from `original_source/src/cocosearch/search/filters.py`.
//!
//! Order matters: literal `%`/`_` must be escaped *before* `*`/`?` are
//! converted, otherwise a literal `%` in the query would itself become a
//! wildcard after the `*`→`%` substitution.

/// `Owner.*` → `Owner.%`, `get_user?` → `get\_user_`, a literal `100%` in
/// the query → `100\%` (kept literal, not turned into a wildcard).
pub fn glob_to_like(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len());
    for c in glob.chars() {
        match c {
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            '*' => out.push('%'),
            '?' => out.push('_'),
            other => out.push(other),
        }
    }
    out
}
