//! Collision-safe destination resolution.
//!
//! Two images can caption identically, and a caption can match a file that is
//! already on disk. The policy never hands out a path that exists (other than
//! the task's own source) or that was handed out earlier in the same run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::{CandidateName, ResolvedDestination};

/// Resolves candidate names to unique destination paths for one run.
///
/// Holds the set of paths already claimed in this run. Claims are recorded at
/// resolution time, before the file operation runs.
#[derive(Debug)]
pub struct CollisionPolicy {
    placeholder: String,
    claimed: HashSet<PathBuf>,
}

impl CollisionPolicy {
    /// Create a policy with an empty claim set.
    ///
    /// `placeholder` replaces empty base names.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            claimed: HashSet::new(),
        }
    }

    /// Resolve `candidate` inside `dest_dir` and claim the result.
    ///
    /// `own_source` is the task's current path when renaming in place. An
    /// existing file at the candidate path is only acceptable if it is that
    /// source, which lets an unchanged name resolve to itself. A source that
    /// already carries this base, suffixed or not, keeps its name so reruns
    /// settle instead of shuffling suffixes.
    pub fn resolve(
        &mut self,
        dest_dir: &Path,
        candidate: &CandidateName,
        own_source: Option<&Path>,
    ) -> ResolvedDestination {
        let base = if candidate.base.is_empty() {
            self.placeholder.as_str()
        } else {
            candidate.base.as_str()
        };

        if let Some(source) = own_source.filter(|s| self.can_keep_own_name(s, dest_dir)) {
            let file_name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if is_name_for_base(&file_name, base, &candidate.extension) {
                tracing::trace!("Kept {:?}", source);
                self.claimed.insert(source.to_path_buf());
                return ResolvedDestination {
                    path: source.to_path_buf(),
                    file_name,
                };
            }
        }

        let mut attempt: u64 = 1;
        loop {
            let file_name = if attempt == 1 {
                format!("{base}.{}", candidate.extension)
            } else {
                format!("{base}_{attempt}.{}", candidate.extension)
            };
            let path = dest_dir.join(&file_name);

            if self.is_available(&path, own_source) {
                tracing::trace!("Claimed {:?}", path);
                self.claimed.insert(path.clone());
                return ResolvedDestination { path, file_name };
            }
            attempt += 1;
        }
    }

    /// Whether `path` has been handed out in this run.
    pub fn is_claimed(&self, path: &Path) -> bool {
        self.claimed.contains(path)
    }

    /// Number of paths claimed so far.
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    fn is_available(&self, path: &Path, own_source: Option<&Path>) -> bool {
        if self.claimed.contains(path) {
            return false;
        }
        if own_source == Some(path) {
            return true;
        }
        // symlink_metadata so a dangling symlink still counts as taken
        match std::fs::symlink_metadata(path) {
            Err(_) => true,
            // Case-insensitive filesystems report the source under another spelling
            Ok(meta) => own_source.is_some_and(|source| {
                !meta.file_type().is_symlink()
                    && same_file::is_same_file(path, source).unwrap_or(false)
            }),
        }
    }

    fn can_keep_own_name(&self, source: &Path, dest_dir: &Path) -> bool {
        source.parent() == Some(dest_dir) && !self.claimed.contains(source)
    }
}

/// Whether `file_name` is `{base}.{extension}` or `{base}_{n}.{extension}`
/// with `n >= 2`, the exact forms [`CollisionPolicy::resolve`] produces.
fn is_name_for_base(file_name: &str, base: &str, extension: &str) -> bool {
    let Some(suffix) = file_name
        .strip_prefix(base)
        .and_then(|rest| rest.strip_suffix(extension))
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };
    match suffix.strip_prefix('_') {
        None => suffix.is_empty(),
        Some(digits) => digits
            .parse::<u64>()
            .is_ok_and(|n| n >= 2 && n.to_string() == digits),
    }
}
