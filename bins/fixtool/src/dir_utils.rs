//! Fixture discovery.
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Finds fixture files under `path`.
///
/// A file path is returned as is, directories are searched recursively for
/// `.json` files. The result is sorted so runs are reproducible.
pub fn find_all_json_fixtures(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut fixtures = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension() == Some("json".as_ref()))
        .map(DirEntry::into_path)
        .collect::<Vec<PathBuf>>();
    fixtures.sort();
    fixtures
}
