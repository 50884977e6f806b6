use crate::index::names::SubstringIndex;
use crate::index::types::IndexConfig;
use crate::utils::LoadSpinner;
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Directories never walked when collecting path names
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "__pycache__",
    ".venv",
    "venv",
];

/// Where names come from
#[derive(Debug, Clone)]
pub enum NameSource {
    /// One name per line of a file
    File(PathBuf),
    /// One name per line of standard input
    Stdin,
    /// Relative paths of the files below a directory
    Dir {
        root: PathBuf,
        /// Only keep paths matching this glob
        glob: Option<String>,
        /// Directory names to skip entirely
        ignored: Vec<String>,
    },
}

impl NameSource {
    pub fn dir(root: impl Into<PathBuf>) -> Self {
        NameSource::Dir {
            root: root.into(),
            glob: None,
            ignored: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn label(&self) -> String {
        match self {
            NameSource::File(path) => path.display().to_string(),
            NameSource::Stdin => "<stdin>".to_string(),
            NameSource::Dir { root, .. } => root.display().to_string(),
        }
    }
}

/// Counters collected while populating an index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Names newly added
    pub added: usize,
    /// Names that were already present
    pub duplicates: usize,
    /// Lines skipped because they were not valid UTF-8
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Build a fresh index from `sources`
pub fn build_index(
    sources: &[NameSource],
    config: IndexConfig,
    show_progress: bool,
) -> Result<(SubstringIndex, BuildReport)> {
    let mut index = SubstringIndex::with_config(config);
    let report = extend_index(&mut index, sources, show_progress)?;
    Ok((index, report))
}

/// Add every name from `sources` to an existing index
pub fn extend_index(
    index: &mut SubstringIndex,
    sources: &[NameSource],
    show_progress: bool,
) -> Result<BuildReport> {
    let start = Instant::now();
    let mut report = BuildReport::default();

    let spinner = show_progress.then(|| LoadSpinner::start("Loading names..."));

    for source in sources {
        if let Some(ref spinner) = spinner {
            spinner.set_message(format!("Loading {}", source.label()));
        }

        match source {
            NameSource::File(path) => add_file_lines(index, path, &mut report)?,
            NameSource::Stdin => {
                let mut content = Vec::new();
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut content)
                    .context("Failed to read names from stdin")?;
                add_lines(index, &content, "<stdin>", &mut report);
            }
            NameSource::Dir {
                root,
                glob,
                ignored,
            } => add_dir_paths(index, root, glob.as_deref(), ignored, &mut report)?,
        }
    }

    report.elapsed = start.elapsed();

    if let Some(spinner) = spinner {
        spinner.finish();
    }

    debug!(
        added = report.added,
        duplicates = report.duplicates,
        skipped = report.skipped,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "index populated"
    );

    Ok(report)
}

fn add_file_lines(index: &mut SubstringIndex, path: &Path, report: &mut BuildReport) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }

    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    add_lines(index, &mmap, &path.display().to_string(), report);
    Ok(())
}

/// Insert each non-blank line of `content`. A trailing `\r` is dropped.
pub fn add_lines(index: &mut SubstringIndex, content: &[u8], source: &str, report: &mut BuildReport) {
    let mut line_start = 0;
    let mut line_number = 0usize;

    let ends = memchr::memchr_iter(b'\n', content).chain(std::iter::once(content.len()));
    for line_end in ends {
        line_number += 1;
        let mut line = &content[line_start..line_end];
        line_start = line_end + 1;

        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        if line.is_empty() {
            continue;
        }

        match std::str::from_utf8(line) {
            Ok(name) => record(index, name, report),
            Err(_) => {
                warn!(source, line = line_number, "skipping line that is not valid UTF-8");
                report.skipped += 1;
            }
        }
    }
}

fn add_dir_paths(
    index: &mut SubstringIndex,
    root: &Path,
    glob: Option<&str>,
    ignored: &[String],
    report: &mut BuildReport,
) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", root.display()))?;

    let matcher: Option<GlobMatcher> = glob
        .map(|pattern| {
            Glob::new(pattern)
                .map(|g| g.compile_matcher())
                .with_context(|| format!("Invalid glob: {pattern}"))
        })
        .transpose()?;

    let ignored = ignored.to_vec();
    let walker = WalkBuilder::new(&root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            !ignored.iter().any(|skip| *skip == name)
        })
        .build();

    for entry in walker.filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(rel_path) = entry.path().strip_prefix(&root) else {
            continue;
        };
        if let Some(ref matcher) = matcher {
            if !matcher.is_match(rel_path) {
                continue;
            }
        }

        match rel_path.to_str() {
            Some(name) => record(index, name, report),
            None => {
                warn!(path = %rel_path.display(), "skipping path that is not valid UTF-8");
                report.skipped += 1;
            }
        }
    }

    Ok(())
}

#[inline]
fn record(index: &mut SubstringIndex, name: &str, report: &mut BuildReport) {
    if index.insert(name) {
        report.added += 1;
    } else {
        report.duplicates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_unstable();
        names
    }

    #[test]
    fn test_add_lines() {
        let mut index = SubstringIndex::new(2, true);
        let mut report = BuildReport::default();
        add_lines(&mut index, b"apple\r\nmaple\n\n  \ngrape\napple", "test", &mut report);

        assert_eq!(report.added, 4); // includes the whitespace-only name
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.skipped, 0);
        assert!(index.contains("apple"));
        assert!(!index.contains("apple\r"));
        assert!(index.contains("  "));
    }

    #[test]
    fn test_add_lines_skips_invalid_utf8() {
        let mut index = SubstringIndex::new(2, true);
        let mut report = BuildReport::default();
        add_lines(&mut index, b"ok\n\xff\xfe\nfine", "test", &mut report);

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_build_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("names.txt");
        fs::write(&path, "alpha\nbeta\ngamma\n").unwrap();

        let (index, report) =
            build_index(&[NameSource::File(path)], IndexConfig::new(2, false), false).unwrap();
        assert_eq!(report.added, 3);
        assert_eq!(sorted(index.find("a")), vec!["alpha", "beta", "gamma"]);
        assert_eq!(index.find("amm"), vec!["gamma"]);
    }

    #[test]
    fn test_build_from_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let (index, report) =
            build_index(&[NameSource::File(path)], IndexConfig::default(), false).unwrap();
        assert!(index.is_empty());
        assert_eq!(report, BuildReport { elapsed: report.elapsed, ..Default::default() });
    }

    #[test]
    fn test_build_missing_file_errors() {
        let result = build_index(
            &[NameSource::File(PathBuf::from("/definitely/not/here.txt"))],
            IndexConfig::default(),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_from_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("src/index")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("src/index/names.rs"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join("target/debug/out.rs"), "").unwrap();

        let (index, report) =
            build_index(&[NameSource::dir(&root)], IndexConfig::default(), false).unwrap();
        assert_eq!(report.added, 3);

        let main = Path::new("src").join("main.rs");
        assert!(index.contains(main.to_str().unwrap()));
        assert!(!index.iter().any(|name| name.contains("out.rs")));
        assert_eq!(index.find("names.rs").len(), 1);
    }

    #[test]
    fn test_build_from_dir_with_glob() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("lib.rs"), "").unwrap();
        fs::write(root.join("docs/guide.md"), "").unwrap();

        let source = NameSource::Dir {
            root,
            glob: Some("*.md".to_string()),
            ignored: Vec::new(),
        };
        let (index, _) = build_index(&[source], IndexConfig::default(), false).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.find(".md").len(), 1);
    }

    #[test]
    fn test_build_invalid_glob_errors() {
        let dir = TempDir::new().unwrap();
        let source = NameSource::Dir {
            root: dir.path().to_path_buf(),
            glob: Some("[".to_string()),
            ignored: Vec::new(),
        };
        assert!(build_index(&[source], IndexConfig::default(), false).is_err());
    }

    #[test]
    fn test_extend_counts_duplicates_across_sources() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "one\ntwo\n").unwrap();
        fs::write(&b, "two\nthree\n").unwrap();

        let mut index = SubstringIndex::default();
        let report =
            extend_index(&mut index, &[NameSource::File(a), NameSource::File(b)], false).unwrap();
        assert_eq!(report.added, 3);
        assert_eq!(report.duplicates, 1);
    }
}
