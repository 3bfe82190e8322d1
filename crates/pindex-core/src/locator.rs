use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glob::Pattern;

/// Lists the plugin archives directly inside `dir`, sorted by path.
///
/// Finding nothing is an error: an empty manifest is never a valid release artifact.
pub fn locate_archives(dir: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read archive directory {}", dir.display()))?;
    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matches {
            archives.push(entry.path());
        }
    }
    if archives.is_empty() {
        bail!(
            "no archives matching `{}` found in {}",
            pattern.as_str(),
            dir.display()
        );
    }
    archives.sort();
    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Pattern {
        Pattern::new("*.plugin.zip").unwrap()
    }

    #[test]
    fn lists_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.plugin.zip", "a.plugin.zip", "notes.txt", "c.zip"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.plugin.zip")).unwrap();

        let found = locate_archives(dir.path(), &pattern()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.plugin.zip", "b.plugin.zip"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), b"").unwrap();
        let err = locate_archives(dir.path(), &pattern()).unwrap_err();
        assert!(err.to_string().contains("no archives matching"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_archives(&dir.path().join("absent"), &pattern()).is_err());
    }
}
