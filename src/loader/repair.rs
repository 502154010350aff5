use regex::Regex;

/// Best-effort repair for the one malformed shape the upstream log producer
/// is known to emit: two JSON objects in a top-level array with the
/// separating comma missing. Inserts a comma wherever a closing object brace
/// is followed, ignoring whitespace, by an opening object brace.
///
/// Returns `None` when the pattern does not occur, so callers can tell a
/// useless retry apart from a repaired one. Deliberately narrow: anything
/// beyond this pattern must fail loudly rather than grow more heuristics.
pub fn repair_missing_commas(text: &str) -> Option<String> {
    let pattern = Regex::new(r"\}\s*\{").ok()?;

    if !pattern.is_match(text) {
        return None;
    }

    Some(pattern.replace_all(text, "},{").into_owned())
}
