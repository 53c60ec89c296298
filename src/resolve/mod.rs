use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// How the input files of a run are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Literal file names relative to the base directory, processed in list order.
    Explicit(Vec<String>),
    /// Wildcard pattern relative to the base directory.
    Glob(String),
}

impl Selection {
    /// Explicit list built as `{provider}{suffix}` for every provider.
    pub fn providers<S: AsRef<str>>(providers: &[S], suffix: &str) -> Self {
        Selection::Explicit(
            providers
                .iter()
                .map(|p| format!("{}{}", p.as_ref(), suffix))
                .collect(),
        )
    }
}

/// Resolve `selection` against `dir` into an ordered list of files.
///
/// Explicit names must all exist. Glob results are sorted lexically so the
/// merge order only depends on the directory contents; no match is not an error.
pub fn resolve(dir: &Path, selection: &Selection) -> Result<Vec<PathBuf>> {
    match selection {
        Selection::Explicit(names) => resolve_explicit(dir, names),
        Selection::Glob(pattern) => resolve_glob(dir, pattern),
    }
}

fn resolve_explicit(dir: &Path, names: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(name);
        if !path.is_file() {
            return Err(PipelineError::MissingFile { path });
        }
        paths.push(path);
    }
    debug!(count = paths.len(), "explicit file list resolved");
    Ok(paths)
}

fn resolve_glob(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // the base directory is literal, only the pattern may contain wildcards
    let full = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        pattern
    );

    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let entries = glob_with(&full, opts).map_err(|source| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            PipelineError::io(path, e.into_error())
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    info!(pattern = %pattern, dir = %dir.display(), count = paths.len(), "glob resolved");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> Result<()> {
        fs::write(dir.join(name), ",start,end\n")?;
        Ok(())
    }

    #[test]
    fn explicit_keeps_list_order() -> Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "b.csv")?;
        touch(dir.path(), "a.csv")?;

        let sel = Selection::Explicit(vec!["b.csv".into(), "a.csv".into()]);
        let paths = resolve(dir.path(), &sel)?;
        assert_eq!(paths, vec![dir.path().join("b.csv"), dir.path().join("a.csv")]);
        Ok(())
    }

    #[test]
    fn explicit_missing_file_fails() -> Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "a.csv")?;

        let sel = Selection::Explicit(vec!["a.csv".into(), "nope.csv".into()]);
        match resolve(dir.path(), &sel) {
            Err(PipelineError::MissingFile { path }) => {
                assert_eq!(path, dir.path().join("nope.csv"))
            }
            other => panic!("expected MissingFile, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn provider_suffix_expansion() {
        let sel = Selection::providers(&["alchemy", "quicknode"], ",limits,c=1.csv");
        assert_eq!(
            sel,
            Selection::Explicit(vec![
                "alchemy,limits,c=1.csv".into(),
                "quicknode,limits,c=1.csv".into()
            ])
        );
    }

    #[test]
    fn glob_matches_comma_markers_sorted() -> Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "quicknode,burst,b=10,c=10.csv")?;
        touch(dir.path(), "alchemy,burst,b=10,c=10.csv")?;
        touch(dir.path(), "alchemy,limits,b=10,c=10.csv")?;
        touch(dir.path(), "burst.csv")?;
        fs::create_dir(dir.path().join("x,burst,dir.csv"))?;

        let paths = resolve(dir.path(), &Selection::Glob("*,burst,*.csv".into()))?;
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["alchemy,burst,b=10,c=10.csv", "quicknode,burst,b=10,c=10.csv"]
        );
        Ok(())
    }

    #[test]
    fn glob_without_matches_is_empty() -> Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "alchemy,limits.csv")?;
        let paths = resolve(dir.path(), &Selection::Glob("*,burst,*.csv".into()))?;
        assert!(paths.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = resolve(dir.path(), &Selection::Glob("[*.csv".into())).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPattern { .. }));
        Ok(())
    }
}
