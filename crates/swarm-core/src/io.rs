use crate::error::{Result, SwarmError};
use crate::frontmatter::{self, Document};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Readers never observe a half-written record.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a record file and split it into header and body.
pub fn read_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(SwarmError::FileNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    frontmatter::parse(&text)
        .ok_or_else(|| SwarmError::MissingFrontmatter(path.display().to_string()))
}

pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    atomic_write(path, doc.to_text()?.as_bytes())
}

/// `*.md` files directly inside `dir`, sorted by file name. A missing
/// directory yields an empty list.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "md") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("story.md");
        atomic_write(&path, b"---\nid: X\n---\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "---\nid: X\n---\n");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".swarm/knowledge/K.md");
        atomic_write(&path, b"data").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn read_document_distinguishes_missing_and_malformed() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.md");
        assert!(matches!(
            read_document(&missing),
            Err(SwarmError::FileNotFound(_))
        ));

        let plain = dir.path().join("plain.md");
        std::fs::write(&plain, "# no header\n").unwrap();
        assert!(matches!(
            read_document(&plain),
            Err(SwarmError::MissingFrontmatter(_))
        ));
    }

    #[test]
    fn markdown_files_are_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.md", "a.md", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.md")).unwrap();
        let names: Vec<_> = markdown_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert!(markdown_files(&dir.path().join("absent")).unwrap().is_empty());
    }
}
