//! Unified diff parsing and application
//!
//! Parses the unified diff format (`---`/`+++` header, `@@` hunk headers,
//! context/add/remove body lines) and applies it to line-oriented text.
//!
//! Application is verifying: every context and remove line must match the
//! original at its expected position, otherwise the patch is rejected with
//! the line number of the first mismatch. The patch set is generated against
//! exactly the decompiled sources produced earlier in the pipeline, so a
//! mismatch always means a stale or corrupted checkout and never something
//! to fuzz past.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Patch parsing and application errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// No `---`/`+++` file header was found
    #[error("diff has no file header")]
    MissingHeader,

    /// A hunk header could not be parsed
    #[error("invalid hunk header: {header}")]
    InvalidHunkHeader { header: String },

    /// A line range inside a hunk header could not be parsed
    #[error("invalid line range: {range}")]
    InvalidRange { range: String },

    /// The diff contained a header but no hunks
    #[error("no hunks found in diff")]
    NoHunks,

    /// Hunks are out of order or overlap
    #[error("hunk starting at line {line} overlaps a previous hunk")]
    MisorderedHunk { line: usize },

    /// A context or remove line did not match the original text
    #[error("patch does not apply: expected {expected:?} at line {line}, found {found:?}")]
    ContextMismatch {
        line: usize,
        expected: String,
        found: Option<String>,
    },
}

/// A single line in a diff hunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Add(String),
    Remove(String),
}

/// A hunk in a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Number of added and removed lines in this hunk
    pub fn stats(&self) -> (usize, usize) {
        let adds = self
            .lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Add(_)))
            .count();
        let removes = self
            .lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Remove(_)))
            .count();
        (adds, removes)
    }
}

/// A parsed unified diff for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedDiff {
    pub old_path: String,
    pub new_path: String,
    pub hunks: Vec<Hunk>,
}

/// Parse a unified diff string into structured data.
pub fn parse(diff: &str) -> Result<UnifiedDiff, PatchError> {
    let lines: Vec<&str> = diff.lines().collect();

    let mut old_path = String::new();
    let mut new_path = String::new();
    let mut start_idx = 0;

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("--- ") {
            old_path = strip_path_decoration(rest);
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            new_path = strip_path_decoration(rest);
            start_idx = i + 1;
            break;
        }
    }

    if old_path.is_empty() || new_path.is_empty() {
        return Err(PatchError::MissingHeader);
    }

    let mut hunks = Vec::new();
    let mut i = start_idx;

    while i < lines.len() {
        if lines[i].starts_with("@@") {
            hunks.push(parse_hunk(&lines, &mut i)?);
        } else {
            i += 1;
        }
    }

    if hunks.is_empty() {
        return Err(PatchError::NoHunks);
    }

    Ok(UnifiedDiff {
        old_path,
        new_path,
        hunks,
    })
}

/// Drop the `a/`/`b/` prefix and any trailing timestamp from a header path.
fn strip_path_decoration(raw: &str) -> String {
    let mut path = raw;
    if let Some(tab) = path.find('\t') {
        path = &path[..tab];
    }
    let path = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    path.to_string()
}

/// Parse a single hunk starting at `lines[*idx]` (the `@@` header).
fn parse_hunk(lines: &[&str], idx: &mut usize) -> Result<Hunk, PatchError> {
    let header = lines[*idx];

    // @@ -old_start,old_count +new_start,new_count @@
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() < 3 || parts[0] != "@@" {
        return Err(PatchError::InvalidHunkHeader {
            header: header.to_string(),
        });
    }

    let (old_start, old_count) = parse_range(parts[1].trim_start_matches('-'))?;
    let (new_start, new_count) = parse_range(parts[2].trim_start_matches('+'))?;

    *idx += 1;
    let mut diff_lines = Vec::new();

    while *idx < lines.len() {
        let line = lines[*idx];

        // Stop at the next hunk or the next file
        if line.starts_with("@@") || line.starts_with("diff ") || line.starts_with("--- ") {
            break;
        }

        if let Some(rest) = line.strip_prefix('+') {
            diff_lines.push(DiffLine::Add(rest.to_string()));
        } else if let Some(rest) = line.strip_prefix('-') {
            diff_lines.push(DiffLine::Remove(rest.to_string()));
        } else if let Some(rest) = line.strip_prefix(' ') {
            diff_lines.push(DiffLine::Context(rest.to_string()));
        } else if line.is_empty() {
            // Some producers emit truly empty lines for empty context lines
            diff_lines.push(DiffLine::Context(String::new()));
        }
        // "\ No newline at end of file" markers are skipped

        *idx += 1;
    }

    Ok(Hunk {
        old_start,
        old_count,
        new_start,
        new_count,
        lines: diff_lines,
    })
}

/// Parse a range like "10,5" or "10" into (start, count).
fn parse_range(s: &str) -> Result<(usize, usize), PatchError> {
    let invalid = || PatchError::InvalidRange {
        range: s.to_string(),
    };

    if let Some(comma) = s.find(',') {
        let start = s[..comma].parse().map_err(|_| invalid())?;
        let count = s[comma + 1..].parse().map_err(|_| invalid())?;
        Ok((start, count))
    } else {
        let start = s.parse().map_err(|_| invalid())?;
        Ok((start, 1))
    }
}

/// Apply a parsed diff to the original text.
///
/// Hunks are applied in order at their stated positions; every context and
/// remove line is verified against the original before the result is built.
pub fn apply(original: &str, diff: &UnifiedDiff) -> Result<String, PatchError> {
    let src: Vec<&str> = original.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(src.len());
    // Next original line (0-indexed) not yet consumed
    let mut pos = 0usize;

    for hunk in &diff.hunks {
        let start = hunk.old_start.saturating_sub(1);
        if start < pos {
            return Err(PatchError::MisorderedHunk {
                line: hunk.old_start,
            });
        }

        // Unchanged region before the hunk
        if start > src.len() {
            return Err(PatchError::ContextMismatch {
                line: src.len() + 1,
                expected: String::new(),
                found: None,
            });
        }
        out.extend(src[pos..start].iter().map(|s| s.to_string()));
        pos = start;

        for line in &hunk.lines {
            match line {
                DiffLine::Context(expected) => {
                    verify_line(&src, pos, expected)?;
                    out.push(expected.clone());
                    pos += 1;
                }
                DiffLine::Remove(expected) => {
                    verify_line(&src, pos, expected)?;
                    pos += 1;
                }
                DiffLine::Add(added) => {
                    out.push(added.clone());
                }
            }
        }
    }

    // Unchanged tail
    out.extend(src[pos..].iter().map(|s| s.to_string()));

    let mut result = out.join("\n");
    if original.ends_with('\n') || original.is_empty() {
        result.push('\n');
    }
    Ok(result)
}

fn verify_line(src: &[&str], pos: usize, expected: &str) -> Result<(), PatchError> {
    match src.get(pos) {
        Some(found) if *found == expected => Ok(()),
        found => Err(PatchError::ContextMismatch {
            line: pos + 1,
            expected: expected.to_string(),
            found: found.map(|s| s.to_string()),
        }),
    }
}

/// Read `clean`, apply the diff, and write the result to `target`, creating
/// parent directories as needed.
pub fn apply_to_file(clean: &Path, target: &Path, diff: &UnifiedDiff) -> anyhow::Result<()> {
    use anyhow::Context;

    let original = fs::read_to_string(clean)
        .with_context(|| format!("Failed to read {}", clean.display()))?;

    let patched = apply(&original, diff)
        .with_context(|| format!("Failed to apply patch to {}", clean.display()))?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(target, patched).with_context(|| format!("Failed to write {}", target.display()))
}
