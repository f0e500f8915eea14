//! Book walker
//!
//! Discovers tune files laid out as `<root>/<book number>/<name>.abc`:
//! - immediate subdirectories of the root whose names are all digits are books
//! - files directly inside a book whose names end with `.abc` are parsed
//! - everything else is skipped silently
//!
//! Listing order is whatever the file system returns, which differs between
//! platforms. Build the walker with [`BookWalker::sorted`] for a stable order
//! (books numerically, files by name).
//!
//! A missing root is not fatal: the outcome is empty and flagged
//! `root_missing`. Unreadable entries are logged, collected in
//! [`WalkOutcome::errors`] and skipped.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use tunebook_common::{BookTune, TuneRecord};
use walkdir::WalkDir;

use crate::abc;

/// Default tune file extension
pub const ABC_EXTENSION: &str = ".abc";

/// Non-fatal problems met during a walk
#[derive(Debug, Error)]
pub enum WalkError {
    /// Directory entry could not be listed
    #[error("Directory access error: {0}")]
    DirectoryAccess(String),

    /// Tune file could not be read
    #[error("File access error {0}: {1}")]
    FileAccess(PathBuf, String),
}

/// Tunes parsed from one file of one book
#[derive(Debug, Clone)]
pub struct BookFile {
    pub book_number: i64,
    pub path: PathBuf,
    pub tunes: Vec<TuneRecord>,
}

/// Result of walking a books root
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Parsed files, in walk order
    pub files: Vec<BookFile>,
    /// Root folder did not exist or was not a directory
    pub root_missing: bool,
    /// Entries that were skipped because they could not be read
    pub errors: Vec<WalkError>,
}

impl WalkOutcome {
    /// Every tune tagged with its book number, in walk order
    pub fn tunes(&self) -> impl Iterator<Item = (i64, &TuneRecord)> + '_ {
        self.files
            .iter()
            .flat_map(|file| file.tunes.iter().map(move |tune| (file.book_number, tune)))
    }

    /// Consume the outcome into owned tagged tunes
    pub fn into_book_tunes(self) -> Vec<BookTune> {
        self.files
            .into_iter()
            .flat_map(|file| {
                let book_number = file.book_number;
                file.tunes
                    .into_iter()
                    .map(move |tune| BookTune { book_number, tune })
            })
            .collect()
    }

    pub fn tune_count(&self) -> usize {
        self.files.iter().map(|f| f.tunes.len()).sum()
    }

    /// Number of distinct books that contributed at least one file
    pub fn book_count(&self) -> usize {
        let mut books: Vec<i64> = self.files.iter().map(|f| f.book_number).collect();
        books.sort_unstable();
        books.dedup();
        books.len()
    }
}

/// Walks a books root and parses every tune file
#[derive(Debug, Clone)]
pub struct BookWalker {
    extension: String,
    sorted: bool,
}

impl Default for BookWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl BookWalker {
    /// Walker for `.abc` files in listing order
    pub fn new() -> Self {
        Self {
            extension: ABC_EXTENSION.to_string(),
            sorted: false,
        }
    }

    /// Order books numerically and files by name
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Walk `root`, parsing every tune file of every book
    pub fn walk(&self, root: &Path) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        if !root.is_dir() {
            warn!("Books folder not found: {}", root.display());
            outcome.root_missing = true;
            return outcome;
        }

        for (book_number, book_dir) in self.list_books(root, &mut outcome.errors) {
            info!("Processing book {}...", book_number);

            for path in self.list_tune_files(&book_dir, &mut outcome.errors) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!("  Reading: {}", name);

                match std::fs::read(&path) {
                    Ok(bytes) => {
                        let tunes = abc::parse_bytes(&bytes);
                        info!("    Found {} tune(s)", tunes.len());
                        outcome.files.push(BookFile {
                            book_number,
                            path,
                            tunes,
                        });
                    }
                    Err(e) => {
                        warn!("Error reading {}: {}", path.display(), e);
                        outcome
                            .errors
                            .push(WalkError::FileAccess(path, e.to_string()));
                    }
                }
            }
        }

        debug!(
            "Walk complete: {} file(s), {} tune(s), {} error(s)",
            outcome.files.len(),
            outcome.tune_count(),
            outcome.errors.len()
        );

        outcome
    }

    /// Numbered subdirectories of the root
    fn list_books(&self, root: &Path, errors: &mut Vec<WalkError>) -> Vec<(i64, PathBuf)> {
        let mut books = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    errors.push(WalkError::DirectoryAccess(e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let book_number = parse_book_number(&entry.file_name().to_string_lossy());
            match book_number {
                Some(number) => books.push((number, entry.into_path())),
                None => debug!("Skipping non-book directory: {}", entry.path().display()),
            }
        }

        if self.sorted {
            books.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        }

        books
    }

    /// Tune files directly inside one book directory
    fn list_tune_files(&self, book_dir: &Path, errors: &mut Vec<WalkError>) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(book_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_tune_file(entry.file_name()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    errors.push(WalkError::DirectoryAccess(e.to_string()));
                }
            }
        }

        files
    }

    fn is_tune_file(&self, file_name: &std::ffi::OsStr) -> bool {
        file_name.to_string_lossy().ends_with(self.extension.as_str())
    }
}

/// Book number from a directory name: ASCII digits only, must fit an `i64`
pub fn parse_book_number(name: &str) -> Option<i64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Walk `root` with the default walker
pub fn walk(root: &Path) -> WalkOutcome {
    BookWalker::new().walk(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_book_number_detection() {
        assert_eq!(parse_book_number("3"), Some(3));
        assert_eq!(parse_book_number("007"), Some(7));
        assert_eq!(parse_book_number(""), None);
        assert_eq!(parse_book_number("book1"), None);
        assert_eq!(parse_book_number("-1"), None);
        assert_eq!(parse_book_number("+1"), None);
        assert_eq!(parse_book_number("1 "), None);
        assert_eq!(parse_book_number("99999999999999999999999"), None);
    }

    #[test]
    fn test_tune_extension_detection() {
        let walker = BookWalker::new();
        assert!(walker.is_tune_file("reels.abc".as_ref()));
        assert!(!walker.is_tune_file("reels.ABC".as_ref()));
        assert!(!walker.is_tune_file("reels.abc.bak".as_ref()));
        assert!(!walker.is_tune_file("notes.txt".as_ref()));
    }

    #[test]
    fn test_walk_nonexistent_root() {
        let outcome = walk(Path::new("/nonexistent/abc_books"));
        assert!(outcome.root_missing);
        assert!(outcome.files.is_empty());
        assert_eq!(outcome.tunes().count(), 0);
    }

    #[test]
    fn test_walk_file_as_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not_a_dir.abc");
        fs::write(&file, "X:1\nT:A\n").unwrap();

        let outcome = walk(&file);
        assert!(outcome.root_missing);
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn test_walk_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = walk(temp_dir.path());
        assert!(!outcome.root_missing);
        assert!(outcome.files.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_sorted_walk_orders_books_numerically() {
        let temp_dir = TempDir::new().unwrap();
        for book in ["10", "2", "1"] {
            let dir = temp_dir.path().join(book);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("b.abc"), format!("X:1\nT:{} b\n", book)).unwrap();
            fs::write(dir.join("a.abc"), format!("X:1\nT:{} a\n", book)).unwrap();
        }

        let outcome = BookWalker::new().sorted(true).walk(temp_dir.path());
        let titles: Vec<String> = outcome
            .tunes()
            .map(|(_, t)| t.title.clone().unwrap())
            .collect();

        assert_eq!(titles, vec!["1 a", "1 b", "2 a", "2 b", "10 a", "10 b"]);
        assert_eq!(outcome.book_count(), 3);
        assert_eq!(outcome.tune_count(), 6);
    }
}
