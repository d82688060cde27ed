//! File discovery for finding images in the input directory.

use std::path::Path;
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::types::ImageTask;

/// Discovers image files directly inside a directory.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Enumerate supported image files in `dir` (top level only).
    ///
    /// The returned set is a snapshot: files created later are not seen.
    pub fn discover(&self, dir: &Path) -> Vec<ImageTask> {
        let mut tasks = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_supported(entry.path()) {
                continue;
            }
            if let Some(task) = ImageTask::from_path(entry.path()) {
                tasks.push(task);
            }
        }

        // Sort by path for deterministic ordering
        tasks.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        tasks
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
