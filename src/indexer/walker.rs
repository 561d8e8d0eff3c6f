use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::WalkConfig;
use crate::error::{IndexerError, Result};

/// Directory walker. Which files get parsed is decided by the
/// [`DomParser`](crate::indexer::DomParser), not here.
#[derive(Default)]
pub struct FileWalker {
    options: WalkConfig,
}

impl FileWalker {
    pub fn new(options: WalkConfig) -> Self {
        Self { options }
    }

    /// Every regular file below `root`, sorted by path.
    ///
    /// Fails only if `root` itself cannot be walked; unreadable entries below
    /// it are skipped.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let respect = self.options.respect_gitignore;

        let walker = WalkBuilder::new(root)
            .hidden(!self.options.include_hidden)
            .git_ignore(respect)
            .git_global(respect)
            .git_exclude(respect)
            .ignore(respect)
            .parents(respect)
            .require_git(false)
            .follow_links(self.options.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for (position, entry) in walker.enumerate() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if position == 0 => return Err(IndexerError::Walk(e)),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}
