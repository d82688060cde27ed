//! Copy and rename operations against already-resolved destinations.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use filetime::FileTime;

/// How a file reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Duplicate into another directory, leaving the source untouched
    Copy,
    /// Move within the same directory
    Rename,
}

impl FileOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOperation::Copy => "copy",
            FileOperation::Rename => "rename",
        }
    }
}

/// Result of a successful [`execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteStatus {
    /// The file was copied or renamed
    Applied,
    /// Source and destination are the same path; nothing to do
    Unchanged,
}

/// Perform `op` from `source` to `dest`.
///
/// Never overwrites an existing destination: both modes fail with
/// `AlreadyExists` instead.
pub fn execute(op: FileOperation, source: &Path, dest: &Path) -> io::Result<ExecuteStatus> {
    if source == dest {
        return Ok(ExecuteStatus::Unchanged);
    }
    match op {
        FileOperation::Copy => copy_preserving(source, dest)?,
        FileOperation::Rename => rename_no_clobber(source, dest)?,
    }
    Ok(ExecuteStatus::Applied)
}

/// Copy content, permissions and timestamps into a newly created file.
fn copy_preserving(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.sync_all())
        .and_then(|_| {
            let atime = FileTime::from_last_access_time(&metadata);
            let mtime = FileTime::from_last_modification_time(&metadata);
            filetime::set_file_times(dest, atime, mtime)
        })
        // Permissions last: a read-only copy can't have its times set on Windows
        .and_then(|_| fs::set_permissions(dest, metadata.permissions()));

    if let Err(e) = copied {
        drop(writer);
        // Don't leave a partial file behind
        if let Err(cleanup) = fs::remove_file(dest) {
            tracing::warn!("Failed to remove partial copy {:?}: {}", dest, cleanup);
        }
        return Err(e);
    }
    Ok(())
}

fn rename_no_clobber(source: &Path, dest: &Path) -> io::Result<()> {
    if let Ok(meta) = fs::symlink_metadata(dest) {
        // Only a case-only rename on a case-insensitive filesystem lands here
        // legitimately: the destination is the source under another spelling.
        let same_file = !meta.file_type().is_symlink()
            && same_file::is_same_file(source, dest).unwrap_or(false);
        if same_file {
            return fs::rename(source, dest);
        }
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination {} already exists", dest.display()),
        ));
    }
    fs::rename(source, dest)
}
