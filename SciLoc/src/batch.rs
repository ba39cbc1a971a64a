//! Batch conversion over directories of resources
//!
//! Files are discovered with `walkdir` and converted in parallel with
//! `rayon`. A failing file is counted and reported; it never stops the batch.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::Result;

/// Kind of resource file to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `*.msg`
    Message,
    /// `*.tex` and `text.*`
    Text,
    /// `font.*`
    Font,
}

impl ResourceKind {
    /// Whether a file name belongs to this kind (case-insensitive)
    #[must_use]
    pub fn matches(self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        let extension = Path::new(&lower).extension().and_then(|e| e.to_str());
        match self {
            Self::Message => extension == Some("msg"),
            Self::Text => extension == Some("tex") || has_prefix(&lower, "text."),
            Self::Font => has_prefix(&lower, "font."),
        }
    }
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    name.len() > prefix.len() && name.starts_with(prefix)
}

/// Progress of a running batch
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    /// Path of the file being processed, relative to the source directory
    pub file: String,
}

/// Result of a batch operation
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Number of successful operations
    pub success_count: usize,
    /// Number of failed operations
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Find all resource files of `kind` under `dir`, recursively
///
/// # Returns
/// A sorted list of matching file paths.
pub fn find_resource_files<P: AsRef<Path>>(dir: P, kind: ResourceKind) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.file_name().to_str().is_some_and(|name| kind.matches(name))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Run `op` over every file in parallel
///
/// `op` receives the input file and the output directory for it: `dest_base`
/// joined with the file's parent directory relative to `source_base`, created
/// before the call. It returns a short description of what it wrote.
pub fn batch_convert<Op, F>(
    files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    op: Op,
    progress: F,
) -> BatchResult
where
    Op: Fn(&Path, &Path) -> Result<String> + Send + Sync,
    F: Fn(&BatchProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = files
        .par_iter()
        .map(|path| {
            let relative_path = path.strip_prefix(source_base).unwrap_or(path.as_path());
            let display_path = relative_path.to_string_lossy();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress {
                current,
                total,
                file: display_path.to_string(),
            });

            let relative_parent = relative_path.parent().unwrap_or(Path::new(""));
            let out_dir = dest_base.join(relative_parent);
            if let Err(e) = std::fs::create_dir_all(&out_dir) {
                fail_counter.fetch_add(1, Ordering::SeqCst);
                return format!("Failed to create folder for {display_path}: {e}");
            }

            match op(path, &out_dir) {
                Ok(summary) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Converted {display_path}: {summary}")
                }
                Err(e) => {
                    tracing::warn!("Failed {display_path}: {e}");
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_kind_matching() {
        assert!(ResourceKind::Message.matches("1000.MSG"));
        assert!(!ResourceKind::Message.matches("1000.msg.bak"));
        assert!(ResourceKind::Text.matches("100.tex"));
        assert!(ResourceKind::Text.matches("TEXT.001"));
        assert!(!ResourceKind::Text.matches("text."));
        assert!(ResourceKind::Font.matches("font.000"));
        assert!(!ResourceKind::Font.matches("fonts.txt"));
    }

    #[test]
    fn test_find_and_convert() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("b.msg"), b"x").unwrap();
        std::fs::write(src.join("nested/a.msg"), b"x").unwrap();
        std::fs::write(src.join("notes.txt"), b"x").unwrap();

        let files = find_resource_files(&src, ResourceKind::Message);
        assert_eq!(files, vec![src.join("b.msg"), src.join("nested/a.msg")]);

        let dest = temp.path().join("dest");
        let result = batch_convert(
            &files,
            &src,
            &dest,
            |path, out_dir| {
                if path.ends_with("b.msg") {
                    return Err(Error::InvalidPath(path.to_path_buf()));
                }
                Ok(out_dir.display().to_string())
            },
            |_| {},
        );

        assert_eq!(result.success_count, 1);
        assert_eq!(result.fail_count, 1);
        assert_eq!(result.results.len(), 2);
        assert!(dest.join("nested").is_dir());
    }
}
