//! File mutations applied inside the generated project.
//!
//! Paths are relative to the project root handed to [`FileMutation::apply`];
//! the process working directory is never consulted.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A create-or-modify operation on one project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMutation {
    /// Create the file (and parent directories) or replace its contents
    Write {
        path: PathBuf,
        contents: &'static str,
    },

    /// Put `header` at the top of the file, keeping what was there after it.
    ///
    /// A file that already starts with `header` is left alone, so applying
    /// the same header twice changes nothing. A missing file is created
    /// holding only the header.
    Prepend {
        path: PathBuf,
        header: &'static str,
    },
}

impl FileMutation {
    pub fn write(path: impl Into<PathBuf>, contents: &'static str) -> Self {
        Self::Write {
            path: path.into(),
            contents,
        }
    }

    pub fn prepend(path: impl Into<PathBuf>, header: &'static str) -> Self {
        Self::Prepend {
            path: path.into(),
            header,
        }
    }

    /// Target path relative to the project root
    pub fn path(&self) -> &Path {
        match self {
            Self::Write { path, .. } | Self::Prepend { path, .. } => path,
        }
    }

    /// Progress label
    pub fn label(&self) -> String {
        match self {
            Self::Write { path, .. } => format!("Writing {}", path.display()),
            Self::Prepend { path, .. } => format!("Updating {}", path.display()),
        }
    }

    /// Apply the mutation under `root`.
    pub fn apply(&self, root: &Path) -> io::Result<()> {
        let target = root.join(self.path());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        match self {
            Self::Write { contents, .. } => fs::write(&target, contents),
            Self::Prepend { header, .. } => {
                let existing = match fs::read_to_string(&target) {
                    Ok(content) => content,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
                    Err(e) => return Err(e),
                };
                let updated = prepend_once(header, &existing);
                if updated != existing {
                    fs::write(&target, updated)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for FileMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { path, contents } => {
                write!(f, "write {} ({} bytes)", path.display(), contents.len())
            }
            Self::Prepend { path, header } => {
                write!(f, "prepend {} line(s) to {}", header.lines().count(), path.display())
            }
        }
    }
}

/// Compute `header` followed by `existing`.
///
/// The old content is kept byte for byte, line endings included. The one
/// exception is a block of header lines at the very top of the file (blank
/// lines before it included), which the new header replaces.
pub fn prepend_once(header: &str, existing: &str) -> String {
    if existing.starts_with(header) {
        return existing.to_string();
    }

    let header_lines: Vec<&str> = header
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut offset = 0;
    let mut block_end = 0;
    for line in existing.split_inclusive('\n') {
        let trimmed = line.trim();
        if header_lines.contains(&trimmed) {
            offset += line.len();
            block_end = offset;
        } else if trimmed.is_empty() {
            offset += line.len();
        } else {
            break;
        }
    }
    let rest = &existing[block_end..];

    let mut updated = String::with_capacity(header.len() + rest.len() + 1);
    updated.push_str(header);
    if !header.ends_with('\n') && !rest.is_empty() {
        updated.push('\n');
    }
    updated.push_str(rest);
    updated
}
