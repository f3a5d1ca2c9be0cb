//! # crashcatcher list / show

use anyhow::{bail, Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crashcatcher::config::Config;

/// Report files directly under `dir`, oldest first.
pub fn find_reports(dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}_", config.report.file_prefix);
    let mut reports = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(&prefix) && name.ends_with(&config.report.file_extension) {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            reports.push((modified, entry.into_path()));
        }
    }

    reports.sort();
    Ok(reports.into_iter().map(|(_, path)| path).collect())
}

pub fn cmd_list(dir: &Path, config: &Config) -> Result<()> {
    let reports = find_reports(dir, config)?;
    eprintln!("{} {}", style("Reports in").bold(), dir.display());

    if reports.is_empty() {
        eprintln!("  {}", style("no crash reports").dim());
        return Ok(());
    }

    for path in &reports {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("{}  {}", name, style(format!("{} bytes", size)).dim());
    }
    Ok(())
}

pub fn cmd_show(dir: &Path, config: &Config, name: &str) -> Result<()> {
    let path = if name == "latest" {
        match find_reports(dir, config)?.pop() {
            Some(p) => p,
            None => bail!("No crash reports in {}", dir.display()),
        }
    } else {
        dir.join(name)
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    eprintln!("{}", style(path.display()).dim());
    print!("{}", contents);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_reports_filters_by_layout() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        std::fs::write(dir.join("Crash_2026年01月02日03时04分05秒.txt"), "a").unwrap();
        std::fs::write(dir.join("Crash_notes.md"), "b").unwrap();
        std::fs::write(dir.join("other.txt"), "c").unwrap();
        std::fs::create_dir(dir.join("Crash_dir.txt")).unwrap();

        let reports = find_reports(dir, &Config::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].ends_with("Crash_2026年01月02日03时04分05秒.txt"));
    }

    #[test]
    fn test_missing_dir_has_no_reports() {
        let temp = tempdir().unwrap();
        let reports = find_reports(&temp.path().join("crashLogs"), &Config::default()).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_show_latest_without_reports_fails() {
        let temp = tempdir().unwrap();
        assert!(cmd_show(temp.path(), &Config::default(), "latest").is_err());
    }
}
