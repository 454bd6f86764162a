//! Glob-style request path matching with a `**` multi-segment wildcard.
//!
//! Matching is anchored at the *end* of the path: most patterns name the
//! final segment, so the walk compares trailing segments first and treats
//! an exhausted pattern (or path) prefix as an open-ended match.

use crate::errors::{ApivetError, Result};
use glob::Pattern;

/// Match a full request path against a pattern.
///
/// Both pattern and path are normalized to start with `/`. A pattern
/// segment of exactly `**` matches any number of path segments, including
/// zero. All other segments use single-segment glob syntax (`*`, `?`,
/// `[...]`).
///
/// An empty pattern matches every path.
///
/// # Errors
///
/// `InvalidPattern` when a pattern segment is malformed glob syntax.
pub fn match_path(pattern: &str, path: &str) -> Result<bool> {
    let pat = segments(pattern);
    let pth = segments(path);
    match_segments(&pat, &pth)
}

/// Match a single name (no `/` handling) against any of the given patterns.
///
/// Used for header-name rules and report filters, where `**` has no meaning.
///
/// # Errors
///
/// `InvalidPattern` when any pattern is malformed glob syntax.
pub fn match_any(patterns: &[String], name: &str) -> Result<bool> {
    for pattern in patterns {
        if glob_segment(pattern, name)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Split into non-empty segments, dropping `.` path components.
fn segments(p: &str) -> Vec<&str> {
    p.split('/').filter(|s| !s.is_empty() && *s != ".").collect()
}

fn match_segments(pat: &[&str], pth: &[&str]) -> Result<bool> {
    let Some((pname, pdir)) = pat.split_last() else {
        return Ok(true);
    };
    let Some((fname, fdir)) = pth.split_last() else {
        return Ok(true);
    };

    if *pname == "**" {
        return match_wildcard(pdir, pth);
    }

    if glob_segment(pname, fname)? {
        match_segments(pdir, fdir)
    } else {
        Ok(false)
    }
}

/// `pat_dir` is the pattern prefix before a consumed `**` segment.
///
/// The wildcard absorbs path segments one at a time from the deep end
/// until the pattern's next literal segment aligns, or the path runs out.
fn match_wildcard(pat_dir: &[&str], pth: &[&str]) -> Result<bool> {
    let Some((pname, _)) = pat_dir.split_last() else {
        // Nothing left of the pattern: `**` swallows the rest of the path.
        return Ok(true);
    };

    let mut remaining = pth;
    loop {
        let Some((fname, fdir)) = remaining.split_last() else {
            return Ok(false);
        };
        if glob_segment(pname, fname)? {
            return match_segments(pat_dir, remaining);
        }
        remaining = fdir;
    }
}

fn glob_segment(pattern: &str, name: &str) -> Result<bool> {
    let compiled = Pattern::new(pattern).map_err(|_| ApivetError::InvalidPattern {
        pattern: pattern.to_string(),
    })?;
    Ok(compiled.matches(name))
}
