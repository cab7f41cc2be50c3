use ignore::WalkBuilder;
use log::warn;
use std::path::{Path, PathBuf};

/// Yields every regular file under `root` (or `root` itself when it is a
/// file). Log trees are not source trees, so gitignore and hidden-file
/// filtering are disabled. Entries that cannot be read are reported and
/// skipped rather than aborting the walk.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
}
