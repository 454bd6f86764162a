//! Header map representation and header/status comparison.

use crate::errors::Result;
use crate::pathmatch::match_any;

/// An insertion-ordered header map with canonicalized names.
///
/// Names are stored in HTTP canonical form (`content-type` →
/// `Content-Type`) so that rule patterns like `X-*` apply regardless of
/// the casing on the wire. Duplicate names are kept; lookups return the
/// first value, matching typical client behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, canonicalizing its name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.push((canonical_name(name), value.into()));
    }

    /// First value for the given name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        let wanted = canonical_name(name);
        self.entries
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (n, v) in iter {
            headers.insert(&n, v);
        }
        headers
    }
}

/// HTTP canonical form: first letter of each dash-separated token upper,
/// the rest lower.
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Compare two header maps under ignore rules.
///
/// For every base (`lhs`) header not matching `ignore`: absence on the
/// target side yields a missing-header line; a value mismatch yields a
/// `-`/`+` line pair unless the name matches `ignore_content` (presence
/// required, content tolerated). Excess target headers are never reported.
///
/// # Errors
///
/// `InvalidPattern` when an ignore rule is malformed glob syntax.
pub fn compare_headers(
    ignore: &[String],
    ignore_content: &[String],
    lhs: &Headers,
    rhs: &Headers,
) -> Result<Vec<String>> {
    let mut results = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for (name, value) in lhs.iter() {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        if match_any(ignore, name)? {
            continue;
        }
        let Some(rhs_value) = rhs.get(name) else {
            results.push(missing_header(name, value));
            continue;
        };
        if match_any(ignore_content, name)? {
            continue;
        }
        if value != rhs_value {
            results.push(missing_header(name, value));
            results.push(excess_header(name, rhs_value));
        }
    }

    Ok(results)
}

/// Compare status codes: empty when equal, else one `-`/`+` line pair.
pub fn compare_statuses(lhs_code: u16, rhs_code: u16, lhs: &str, rhs: &str) -> Vec<String> {
    if lhs_code == rhs_code {
        return Vec::new();
    }
    vec![
        format!("- (Status) {lhs}"),
        format!("+ (Status) {rhs}"),
    ]
}

fn missing_header(name: &str, value: &str) -> String {
    format!("- (Header) {name}: {value}")
}

fn excess_header(name: &str, value: &str) -> String {
    format!("+ (Header) {name}: {value}")
}
