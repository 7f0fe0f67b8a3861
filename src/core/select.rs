//! Target selection.
//!
//! Turns the targets of an encrypt or decrypt request into a sorted list of
//! source files. A target is one of:
//!
//! - an exact file, which must have the right kind of name,
//! - a directory, scanned recursively,
//! - a glob (`*`, `?`, and `**` for any number of directories).
//!
//! Plaintext files are named `.env*`; their ciphertext sits next to them as
//! `<name>.kanuka`. Everything is read through a [`Store`], so selection can
//! run against an in-memory tree.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::constants::{CIPHERTEXT_SUFFIX, CONTENT_PREFIX};
use crate::core::store::{is_skipped_dir, Store};
use crate::error::{NotFoundError, Result, ValidationError};

/// Which way content is being transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// Whether `path` is a valid source for this direction.
    pub fn accepts(self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        match self {
            Self::Encrypt => is_plaintext_name(name),
            Self::Decrypt => name
                .strip_suffix(CIPHERTEXT_SUFFIX)
                .is_some_and(is_plaintext_name),
        }
    }

    /// Where the output for `source` goes.
    pub fn destination(self, source: &Path) -> PathBuf {
        match self {
            Self::Encrypt => {
                let mut name = source.as_os_str().to_os_string();
                name.push(CIPHERTEXT_SUFFIX);
                PathBuf::from(name)
            }
            Self::Decrypt => source.with_extension(""),
        }
    }

    /// Description of an acceptable source, for error messages.
    pub fn expected(self) -> &'static str {
        match self {
            Self::Encrypt => "a plaintext .env file",
            Self::Decrypt => "an encrypted .env*.kanuka file",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

fn is_plaintext_name(name: &str) -> bool {
    name.starts_with(CONTENT_PREFIX) && !name.ends_with(CIPHERTEXT_SUFFIX)
}

/// One requested target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A file or directory.
    Path(PathBuf),
    /// A glob pattern, relative to the project root.
    Glob(String),
}

impl Target {
    /// Anything containing `*` or `?` is a glob.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(['*', '?']) {
            Self::Glob(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

/// Resolve `targets` to source files under `root`.
///
/// No targets means the whole project. An explicit path that does not exist
/// is an error; a directory or glob that matches nothing is not.
///
/// # Errors
///
/// Returns `NotFoundError::Path` for a missing explicit path and
/// `ValidationError::WrongFileKind` for an explicit file with the wrong name.
pub fn select(
    store: &impl Store,
    root: &Path,
    direction: Direction,
    targets: &[Target],
) -> Result<Vec<PathBuf>> {
    let mut selected = BTreeSet::new();

    if targets.is_empty() {
        scan(store, root, direction, &mut selected)?;
    }

    for target in targets {
        match target {
            Target::Path(path) => select_path(store, root, direction, path, &mut selected)?,
            Target::Glob(raw) => {
                let pattern = Pattern::new(root, raw);
                for file in store.walk(root)? {
                    let matched = file
                        .strip_prefix(root)
                        .is_ok_and(|rel| pattern.matches(rel));
                    if matched && direction.accepts(&file) {
                        selected.insert(file);
                    }
                }
            }
        }
    }

    debug!(
        direction = direction.verb(),
        targets = targets.len(),
        files = selected.len(),
        "selected files"
    );
    Ok(selected.into_iter().collect())
}

fn select_path(
    store: &impl Store,
    root: &Path,
    direction: Direction,
    path: &Path,
    selected: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    let full = root.join(path);

    if !store.exists(&full) {
        return Err(NotFoundError::Path(path.display().to_string()).into());
    }

    let in_skipped_dir = full.strip_prefix(root).is_ok_and(|rel| {
        rel.components()
            .any(|c| matches!(c, Component::Normal(name) if is_skipped_dir(name)))
    });
    if !in_skipped_dir && store.is_dir(&full) {
        return scan(store, &full, direction, selected);
    }
    if in_skipped_dir || !direction.accepts(&full) {
        return Err(ValidationError::WrongFileKind {
            path: path.display().to_string(),
            expected: direction.expected(),
        }
        .into());
    }

    selected.insert(full);
    Ok(())
}

fn scan(
    store: &impl Store,
    dir: &Path,
    direction: Direction,
    selected: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    selected.extend(
        store
            .walk(dir)?
            .into_iter()
            .filter(|file| direction.accepts(file)),
    );
    Ok(())
}

/// A glob matched against paths relative to the project root, segment by
/// segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`: zero or more whole segments.
    AnyDepth,
    /// One segment, possibly with `*` and `?`.
    Name(Vec<char>),
}

impl Pattern {
    /// Parse `raw`. An absolute pattern under `root` is made relative to it.
    pub fn new(root: &Path, raw: &str) -> Self {
        let relative = Path::new(raw)
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.to_str())
            .unwrap_or(raw);

        let segments = relative
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .map(|s| match s {
                "**" => Segment::AnyDepth,
                name => Segment::Name(name.chars().collect()),
            })
            .collect();

        Self { segments }
    }

    /// Whether the relative path `path` matches.
    pub fn matches(&self, path: &Path) -> bool {
        let names: Option<Vec<Vec<char>>> = path
            .components()
            .map(|c| match c {
                Component::Normal(name) => name.to_str().map(|s| s.chars().collect()),
                _ => None,
            })
            .collect();

        names.is_some_and(|names| match_segments(&self.segments, &names))
    }
}

// Both matchers backtrack only to the most recent wildcard, so a pattern
// with many stars stays linear per attempt instead of exponential.
fn match_segments(pattern: &[Segment], names: &[Vec<char>]) -> bool {
    let (mut p, mut n) = (0, 0);
    let mut retry: Option<(usize, usize)> = None;

    while n < names.len() {
        match pattern.get(p) {
            Some(Segment::AnyDepth) => {
                retry = Some((p, n));
                p += 1;
            }
            Some(Segment::Name(glob)) if match_name(glob, &names[n]) => {
                p += 1;
                n += 1;
            }
            _ => match retry {
                Some((star, from)) => {
                    p = star + 1;
                    n = from + 1;
                    retry = Some((star, from + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|s| *s == Segment::AnyDepth)
}

fn match_name(glob: &[char], name: &[char]) -> bool {
    let (mut g, mut n) = (0, 0);
    let mut retry: Option<(usize, usize)> = None;

    while n < name.len() {
        match glob.get(g) {
            Some('*') => {
                retry = Some((g, n));
                g += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                g += 1;
                n += 1;
            }
            _ => match retry {
                Some((star, from)) => {
                    g = star + 1;
                    n = from + 1;
                    retry = Some((star, from + 1));
                }
                None => return false,
            },
        }
    }

    glob[g..].iter().all(|&c| c == '*')
}
