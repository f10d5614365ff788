//! Locating an input file among several naming conventions.

use std::path::{Path, PathBuf};

/// One way of finding a source file. Strategies are tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStrategy {
    /// A specific path that is used if it exists.
    Exact(PathBuf),
    /// Any file in `dir` with `extension` whose lowercased name contains
    /// every keyword. Candidates are examined in filename order.
    Scan {
        dir: PathBuf,
        extension: String,
        keywords: Vec<String>,
    },
}

impl SourceStrategy {
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            SourceStrategy::Exact(path) => path.is_file().then(|| path.clone()),
            SourceStrategy::Scan {
                dir,
                extension,
                keywords,
            } => scan(dir, extension, keywords),
        }
    }
}

fn scan(dir: &Path, extension: &str, keywords: &[String]) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Skipping directory scan");
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    candidates.sort();

    candidates.into_iter().find(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        keywords.iter().all(|k| name.contains(&k.to_lowercase()))
    })
}

/// Returns the first path any strategy resolves to.
pub fn discover(strategies: &[SourceStrategy]) -> Option<PathBuf> {
    strategies.iter().find_map(|strategy| {
        let found = strategy.resolve();
        if let Some(path) = &found {
            tracing::debug!(path = %path.display(), strategy = ?strategy, "Resolved source file");
        }
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "{}").unwrap();
        path
    }

    fn scan_strategy(dir: &Path) -> SourceStrategy {
        SourceStrategy::Scan {
            dir: dir.to_path_buf(),
            extension: "geojson".into(),
            keywords: vec!["community".into(), "area".into()],
        }
    }

    #[test]
    fn exact_paths_win_in_priority_order() {
        let dir = TempDir::new().unwrap();
        let second = touch(dir.path(), "second.geojson");
        let third = touch(dir.path(), "third.geojson");

        let found = discover(&[
            SourceStrategy::Exact(dir.path().join("first.geojson")),
            SourceStrategy::Exact(second.clone()),
            SourceStrategy::Exact(third),
        ]);
        assert_eq!(found, Some(second));
    }

    #[test]
    fn scan_matches_all_keywords_case_insensitively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "community_notes.geojson");
        touch(dir.path(), "Community_Areas.csv");
        let hit = touch(dir.path(), "My_COMMUNITY_AREAS.GeoJSON");

        assert_eq!(discover(&[scan_strategy(dir.path())]), Some(hit));
    }

    #[test]
    fn scan_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a_community_area.geojson");
        touch(dir.path(), "b_community_area.geojson");

        assert_eq!(discover(&[scan_strategy(dir.path())]), Some(a));
    }

    #[test]
    fn nothing_found_is_none() {
        let dir = TempDir::new().unwrap();
        let strategies = [
            SourceStrategy::Exact(dir.path().join("missing.geojson")),
            scan_strategy(&dir.path().join("no-such-dir")),
        ];
        assert_eq!(discover(&strategies), None);
    }
}
