//! Copybook lookup.
//!
//! Resolves `COPY name [OF library]` against an ordered list of
//! directories. The stem comparison is case-insensitive and the first
//! match across the directory list wins; within one directory the
//! configured extension order decides.

use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;

pub(crate) const DEFAULT_EXTENSIONS: &[&str] = &[".cpy", ".cbl", ".CPY", ".CBL"];

#[derive(Debug, Clone)]
pub(crate) struct CopybookResolver {
    dirs: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl CopybookResolver {
    pub fn new(dirs: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        let extensions = if extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            extensions
        };
        Self { dirs, extensions }
    }

    /// Digest of the search configuration, part of the expansion cache key.
    pub fn search_digest(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for dir in &self.dirs {
            dir.hash(&mut hasher);
        }
        for ext in &self.extensions {
            ext.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// The directories a lookup for `library` would search, for error
    /// reporting.
    pub fn search_roots(&self, library: Option<&str>) -> Vec<PathBuf> {
        match library {
            None => self.dirs.clone(),
            Some(lib) => self
                .dirs
                .iter()
                .filter_map(|dir| subdir_ci(dir, lib))
                .collect(),
        }
    }

    /// Find the copybook file for `name`, first match wins.
    pub fn resolve(&self, name: &str, library: Option<&str>) -> Option<PathBuf> {
        for root in self.search_roots(library) {
            let Ok(listing) = fs::read_dir(&root) else {
                continue;
            };
            let mut entries: Vec<PathBuf> = listing
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            entries.sort();

            for ext in &self.extensions {
                let wanted = ext.trim_start_matches('.');
                let found = entries.iter().find(|path| {
                    stem_matches(path, name)
                        && path
                            .extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
                });
                if let Some(path) = found {
                    return Some(path.clone());
                }
            }
        }
        None
    }
}

fn stem_matches(path: &Path, name: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(name))
}

/// Find a subdirectory of `dir` whose name equals `lib` case-insensitively.
fn subdir_ci(dir: &Path, lib: &str) -> Option<PathBuf> {
    let direct = dir.join(lib);
    if direct.is_dir() {
        return Some(direct);
    }
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case(lib))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn resolver(root: &Path) -> CopybookResolver {
        CopybookResolver::new(vec![root.to_path_buf()], Vec::new())
    }

    #[test]
    fn stem_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CUSTREC.cpy"), "01 X PIC 9.").unwrap();
        let found = resolver(dir.path()).resolve("custrec", None).unwrap();
        assert_eq!(found.file_name().unwrap(), "CUSTREC.cpy");
    }

    #[test]
    fn extension_order_decides_within_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("part.cbl"), "b").unwrap();
        fs::write(dir.path().join("part.cpy"), "a").unwrap();
        let found = resolver(dir.path()).resolve("PART", None).unwrap();
        assert_eq!(found.extension().unwrap(), "cpy");
    }

    #[test]
    fn directory_order_beats_extension_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("part.cbl"), "first").unwrap();
        fs::write(second.path().join("part.cpy"), "second").unwrap();
        let resolver = CopybookResolver::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            Vec::new(),
        );
        let found = resolver.resolve("part", None).unwrap();
        assert!(found.starts_with(first.path()));
    }

    #[test]
    fn library_restricts_to_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("PAYLIB")).unwrap();
        fs::write(dir.path().join("part.cpy"), "outer").unwrap();
        fs::write(dir.path().join("PAYLIB/part.cpy"), "inner").unwrap();
        let found = resolver(dir.path()).resolve("part", Some("paylib")).unwrap();
        assert!(found.starts_with(dir.path().join("PAYLIB")));
        assert!(resolver(dir.path()).resolve("part", Some("NOLIB")).is_none());
    }

    #[test]
    fn unknown_extension_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("part.txt"), "x").unwrap();
        assert!(resolver(dir.path()).resolve("part", None).is_none());
    }
}
