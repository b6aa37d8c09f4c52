use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Lists the `.csv` files directly under `dir`, sorted by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Data directory {dir:?} does not exist");
    }
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Reading data directory {dir:?}"))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Reading data directory {dir:?}"))?
            .path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_only_csv_files_in_name_order() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "x\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x\n").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = list_csv_files(dir.path()).expect("list");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let err = list_csv_files(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
