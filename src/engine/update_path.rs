//! `update-path`: put the tool's directory on the user's `$PATH`

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output::log_line;

/// Shell startup files that get the `PATH` line, when they exist
pub const RC_FILES: [&str; 2] = [".bashrc", ".zshrc"];

/// Append `PATH=$PATH:<dir>` and `export PATH` to each rc file under `home`.
///
/// Returns the files that were (or, in a dry run, would have been) updated.
pub fn update_path<W: Write>(home: &Path, dir: &Path, dry_run: bool, out: &mut W) -> Result<Vec<PathBuf>> {
    let line = format!("PATH=$PATH:{}", dir.display());
    let mut updated = Vec::new();

    for name in RC_FILES {
        let rc = home.join(name);
        if !rc.is_file() {
            continue;
        }

        log_line(out, &format!("Updating {}", name))?;
        log_line(out, &format!("Appending {}", line))?;
        if !dry_run {
            let mut file = OpenOptions::new().append(true).open(&rc)?;
            write!(file, "\n{}\nexport PATH\n", line)?;
        }
        updated.push(rc);
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_appends_to_existing_rc_files() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".bashrc"), "alias ll='ls -l'\n").unwrap();

        let mut out = Vec::new();
        let updated = update_path(home.path(), Path::new("/opt/dld"), false, &mut out).unwrap();

        assert_eq!(updated, vec![home.path().join(".bashrc")]);
        assert!(!home.path().join(".zshrc").exists());
        let contents = fs::read_to_string(home.path().join(".bashrc")).unwrap();
        assert_eq!(contents, "alias ll='ls -l'\n\nPATH=$PATH:/opt/dld\nexport PATH\n");

        let log = String::from_utf8(out).unwrap();
        assert!(log.contains("Updating .bashrc"));
        assert!(log.contains("Appending PATH=$PATH:/opt/dld"));
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".zshrc"), "").unwrap();

        let mut out = Vec::new();
        let updated = update_path(home.path(), Path::new("/opt/dld"), true, &mut out).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(fs::read_to_string(home.path().join(".zshrc")).unwrap(), "");
        assert!(!out.is_empty());
    }
}
