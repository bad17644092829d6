//! Strict-mode diagnostics: unknown keys and entry locations in a catalog.
//!
//! `serde_ignored` reports ignored keys as positional paths such as
//! `settings.1.projects.0.dve` (array indices included). The helpers here map
//! those paths back to 1-indexed line numbers by replaying the document's
//! `[table]` and `[[array]]` headers.
//!
//! This is a best-effort heuristic: it understands standard headers and bare
//! key assignments, not quoted keys or inline tables. Line 0 means "not
//! found".

use std::collections::HashMap;
use std::path::Path;

use crate::error::SetgenError;

/// Build the error for a set of unknown keys, one entry per key.
pub fn unknown_keys_error(content: &str, path: &Path, keys: Vec<String>) -> SetgenError {
    let errors = keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            SetgenError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();
    SetgenError::UnknownKeys(errors)
}

/// Drop the `?` segments `serde_ignored` inserts for values inside an
/// `Option`, e.g. `settings_class.?.typo` → `settings_class.typo`.
pub fn normalize_key(key: &str) -> String {
    key.split('.')
        .filter(|segment| *segment != "?")
        .collect::<Vec<_>>()
        .join(".")
}

/// Find the line of a positional key like `settings.1.dve`.
pub fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let (section, leaf) = dotted_key.rsplit_once('.').unwrap_or(("", dotted_key));

    let mut scanner = LineScanner::default();
    let mut tracker = SectionTracker::default();
    let mut current = String::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        match scanner.classify(trimmed) {
            Line::Header { name, array } => {
                current = tracker.enter(name, array);
                if current == dotted_key || name == dotted_key {
                    return i + 1;
                }
            }
            Line::Other => {
                if current == section
                    && let Some(after_key) = trimmed.strip_prefix(leaf)
                    && after_key.trim_start().starts_with('=')
                {
                    return i + 1;
                }
            }
            Line::Continuation => {}
        }
    }
    0
}

/// Find the header line that opens a positional section like `settings.1`.
pub fn section_line(content: &str, section: &str) -> usize {
    let mut scanner = LineScanner::default();
    let mut tracker = SectionTracker::default();
    for (i, line) in content.lines().enumerate() {
        if let Line::Header { name, array } = scanner.classify(line.trim())
            && tracker.enter(name, array) == section
        {
            return i + 1;
        }
    }
    0
}

/// Returns the header name and whether it is an array-of-tables header.
///
/// The header must close the line (a trailing comment is allowed) and name a
/// dotted bare key, so array values such as `[1, 2],` are not mistaken for
/// tables.
fn parse_header(trimmed: &str) -> Option<(&str, bool)> {
    let (inner, array, rest) = if let Some(rest) = trimmed.strip_prefix("[[") {
        let end = rest.find("]]")?;
        (&rest[..end], true, &rest[end + 2..])
    } else {
        let rest = trimmed.strip_prefix('[')?;
        let end = rest.find(']')?;
        (&rest[..end], false, &rest[end + 1..])
    };
    let rest = rest.trim_start();
    if !rest.is_empty() && !rest.starts_with('#') {
        return None;
    }
    let name = inner.trim();
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '));
    bare.then_some((name, array))
}

enum Line<'a> {
    Header { name: &'a str, array: bool },
    /// Key assignment, comment or blank line.
    Other,
    /// Inside a multi-line array value.
    Continuation,
}

/// Classifies lines while tracking open brackets of multi-line array values.
#[derive(Default)]
struct LineScanner {
    open_brackets: usize,
}

impl LineScanner {
    fn classify<'a>(&mut self, trimmed: &'a str) -> Line<'a> {
        if self.open_brackets > 0 {
            self.track(trimmed);
            return Line::Continuation;
        }
        if let Some((name, array)) = parse_header(trimmed) {
            return Line::Header { name, array };
        }
        self.track(trimmed);
        Line::Other
    }

    /// Update the bracket depth, skipping quoted strings and comments.
    fn track(&mut self, line: &str) {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for c in line.chars() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '#' => break,
                '[' => self.open_brackets += 1,
                ']' => self.open_brackets = self.open_brackets.saturating_sub(1),
                _ => {}
            }
        }
    }
}

/// Tracks how many elements each array of tables has seen so far, keyed by
/// the positional path of the array.
#[derive(Default)]
struct SectionTracker {
    counts: HashMap<String, usize>,
}

impl SectionTracker {
    /// Positional path of a header, e.g. `[[settings.projects]]` → `settings.2.projects.0`.
    fn enter(&mut self, header: &str, array: bool) -> String {
        let segments: Vec<&str> = header.split('.').map(str::trim).collect();
        let mut position = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if !position.is_empty() {
                position.push('.');
            }
            position.push_str(segment);

            let last = i == segments.len() - 1;
            if last && array {
                let count = self.counts.entry(position.clone()).or_insert(0);
                let index = *count;
                *count += 1;
                position.push_str(&format!(".{index}"));
            } else if let Some(count) = self.counts.get(&position) {
                position.push_str(&format!(".{}", count.saturating_sub(1)));
            }
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const CATALOG: &str = r#"[[projects]]
name = "Web"

[[settings]]
name = "Timeout"
default = "30"

[[settings.projects]]
name = "Web"
dve = "5"

[[settings]]
name = "Retries"
typo = 1

[[settings.projects]]
name = "Web"

[[settings.projects]]
name = "Api"
bogus = true
"#;

    #[test]
    fn top_level_key() {
        assert_eq!(find_key_line("a = 1\nstray = 2\n", "stray"), 2);
    }

    #[test]
    fn key_in_second_array_element() {
        assert_eq!(find_key_line(CATALOG, "settings.1.typo"), 14);
    }

    #[test]
    fn key_in_nested_array_element() {
        assert_eq!(find_key_line(CATALOG, "settings.0.projects.0.dve"), 10);
        assert_eq!(find_key_line(CATALOG, "settings.1.projects.1.bogus"), 21);
    }

    #[test]
    fn unknown_table_points_at_header() {
        let content = "[[projects]]\nname = \"Web\"\n\n[extra]\nx = 1\n";
        assert_eq!(find_key_line(content, "extra"), 4);
    }

    #[test]
    fn missing_key_is_zero() {
        assert_eq!(find_key_line(CATALOG, "settings.5.nope"), 0);
    }

    #[test]
    fn section_lines() {
        assert_eq!(section_line(CATALOG, "projects.0"), 1);
        assert_eq!(section_line(CATALOG, "settings.1"), 12);
        assert_eq!(section_line(CATALOG, "settings.1.projects.1"), 19);
        assert_eq!(section_line(CATALOG, "settings.9"), 0);
    }

    const NESTED_ARRAY: &str = r#"[[projects]]
name = "Web"

[[settings]]
name = "Grid"
cells = [
  [1, 2],
  [3]
]
dve = "x"

[[settings]]
name = "Other"
tags = ["a", "[b]"]
typo = 1
"#;

    #[test]
    fn array_values_are_not_headers() {
        assert_eq!(parse_header("[1, 2],"), None);
        assert_eq!(parse_header("[3]  ,"), None);
        assert_eq!(parse_header("[\"quoted\"]"), None);
        assert_eq!(parse_header("[settings] # comment"), Some(("settings", false)));
        assert_eq!(parse_header("[[ settings.projects ]]"), Some(("settings.projects", true)));
    }

    #[test]
    fn multi_line_array_keeps_section() {
        assert_eq!(find_key_line(NESTED_ARRAY, "settings.0.dve"), 10);
        assert_eq!(find_key_line(NESTED_ARRAY, "settings.1.typo"), 15);
        assert_eq!(section_line(NESTED_ARRAY, "settings.1"), 12);
    }

    #[test]
    fn normalize_drops_option_segments() {
        assert_eq!(normalize_key("settings_class.?.typo"), "settings_class.typo");
        assert_eq!(normalize_key("settings.1.dve"), "settings.1.dve");
    }

    #[test]
    fn error_lists_each_key_with_line() {
        let err = unknown_keys_error(
            CATALOG,
            &PathBuf::from("/repo/settings.toml"),
            vec!["settings.1.typo".into(), "settings.0.projects.0.dve".into()],
        );
        match err {
            SetgenError::UnknownKeys(keys) => {
                assert_eq!(keys.len(), 2);
                match &keys[0] {
                    SetgenError::UnknownKey { key, line, .. } => {
                        assert_eq!(key, "settings.1.typo");
                        assert_eq!(*line, 14);
                    }
                    other => panic!("Expected UnknownKey, got: {other:?}"),
                }
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }
}
