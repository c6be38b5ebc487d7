//! Line-oriented file persistence
//!
//! Level files, save games and the leaderboard are all plain text with one
//! record per line. A missing file is created empty instead of failing, so
//! a fresh install reads as an empty level / empty leaderboard.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Read every line of `path`, creating the file (and its parent directory)
/// if it does not exist yet.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    if !path.exists() {
        create_empty(path)?;
        log::info!("Created missing file: {}", path.display());
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    reader.lines().collect()
}

/// Append one line to `path`, creating it when missing.
pub fn append_line(path: &Path, text: &str) -> io::Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{text}")
}

/// Replace the contents of `path` with `lines`.
pub fn write_lines<I, S>(path: &Path, lines: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ensure_parent(path)?;
    let mut file = File::create(path)?;
    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    file.flush()
}

fn create_empty(path: &Path) -> io::Result<()> {
    ensure_parent(path)?;
    File::create(path).map(|_| ())
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) fn temp_path(name: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "sword-runner-{}-{}-{}",
        std::process::id(),
        n,
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_empty() {
        let path = temp_path("missing.txt");
        assert!(!path.exists());

        let lines = read_lines(&path).unwrap();
        assert!(lines.is_empty());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_then_read() {
        let path = temp_path("append.txt");
        append_line(&path, "alice;0;30;12;").unwrap();
        append_line(&path, "bob;1;45;7;").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["alice;0;30;12;", "bob;1;45;7;"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_lines_replaces_contents() {
        let path = temp_path("write.txt");
        append_line(&path, "old").unwrap();
        write_lines(&path, ["a", "b"]).unwrap();

        assert_eq!(read_lines(&path).unwrap(), vec!["a", "b"]);

        let _ = fs::remove_file(&path);
    }
}
