use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Zips `source` into `output`. Entry names are relative to `source`, use `/`
/// separators, and directories (including empty ones) get their own entry.
/// Returns the number of entries written.
pub(crate) fn archive_dir(source: &Path, output: &Path) -> Result<u64> {
    if !source.is_dir() {
        anyhow::bail!("{} is not a directory", source.display());
    }
    let file = File::create(output)
        .with_context(|| format!("create archive {}", output.display()))?;
    let output = fs::canonicalize(output)
        .with_context(|| format!("resolve archive {}", output.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut written = 0u64;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", source.display()))?;
        let path = entry.path();
        if entry.depth() == 0 || is_output(&entry, &output) {
            continue;
        }
        let relative = path
            .strip_prefix(source)
            .with_context(|| format!("relative path for {}", path.display()))?;
        let name = archive_name(relative);

        if entry.file_type().is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .with_context(|| format!("add directory {}", path.display()))?;
        } else {
            let mut local =
                File::open(path).with_context(|| format!("open {}", path.display()))?;
            writer
                .start_file(name, options)
                .with_context(|| format!("add file {}", path.display()))?;
            io::copy(&mut local, &mut writer)
                .with_context(|| format!("compress {}", path.display()))?;
        }
        written += 1;
    }

    writer
        .finish()
        .with_context(|| format!("finish archive {}", output.display()))?;
    Ok(written)
}

/// True when the walk reaches the archive being written.
fn is_output(entry: &walkdir::DirEntry, output: &Path) -> bool {
    entry.file_type().is_file()
        && Some(entry.file_name()) == output.file_name()
        && fs::canonicalize(entry.path()).is_ok_and(|path| path == output)
}

fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;

    fn read_entries(path: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entries = BTreeMap::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            entries.insert(entry.name().to_string(), data);
        }
        entries
    }

    #[test]
    fn archive_dir_preserves_files_and_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project");
        fs::create_dir_all(source.join("src/nested")).unwrap();
        fs::create_dir_all(source.join("empty")).unwrap();
        fs::write(source.join("README.md"), b"hello").unwrap();
        fs::write(source.join("src/nested/lib.rs"), b"fn main() {}").unwrap();
        fs::write(source.join("src/blank.txt"), b"").unwrap();
        let output = dir.path().join("project.zip");

        let written = archive_dir(&source, &output).unwrap();
        let entries = read_entries(&output);

        assert_eq!(written, entries.len() as u64);
        assert_eq!(entries["README.md"], b"hello");
        assert_eq!(entries["src/nested/lib.rs"], b"fn main() {}");
        assert!(entries["src/blank.txt"].is_empty());
        assert!(entries.contains_key("empty/"));
        assert!(entries.contains_key("src/"));
        assert!(entries.contains_key("src/nested/"));
        assert!(!entries.keys().any(|name| name.starts_with('/') || name.contains("project")));
    }

    #[test]
    fn archive_dir_handles_trailing_separator_in_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.bin"), [1u8, 2, 3]).unwrap();
        let output = dir.path().join("data.zip");
        let with_slash = format!("{}/", source.display());

        archive_dir(Path::new(&with_slash), &output).unwrap();
        let entries = read_entries(&output);
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a.bin"]);
    }

    #[test]
    fn archive_dir_skips_output_inside_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), b"a").unwrap();
        let output = source.join("project.zip");

        let written = archive_dir(&source, &output).unwrap();

        assert_eq!(written, 1);
        assert_eq!(read_entries(&output).keys().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn archive_dir_rejects_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.txt");
        fs::write(&file, b"x").unwrap();
        let err = archive_dir(&file, &dir.path().join("out.zip")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
