//! Text report assembly: zombie processes and largest files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subtrees never scanned for large files (virtual or volatile).
const EXCLUDED_ROOTS: &[&str] = &["/proc", "/sys", "/dev", "/run"];

/// Parse `ps -eo pid,stat,comm --no-headers` output and return the
/// (pid, command) pairs whose state is zombie.
pub fn zombie_processes(ps_output: &str) -> Vec<(u32, String)> {
    ps_output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let pid = fields.next()?.parse::<u32>().ok()?;
            let stat = fields.next()?;
            if !stat.starts_with('Z') {
                return None;
            }
            let comm = fields.collect::<Vec<_>>().join(" ");
            Some((pid, comm))
        })
        .collect()
}

pub fn zombie_summary(ps_output: &str) -> String {
    let zombies = zombie_processes(ps_output);
    if zombies.is_empty() {
        return "no zombie processes".to_string();
    }
    let mut lines = vec![format!("{} zombie process(es):", zombies.len())];
    for (pid, comm) in &zombies {
        lines.push(format!("  pid {pid}: {comm}"));
    }
    lines.join("\n")
}

/// Largest regular files under `root`, biggest first.
pub fn largest_files(root: &Path, limit: usize) -> Vec<(u64, PathBuf)> {
    let mut entries: Vec<(u64, PathBuf)> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !EXCLUDED_ROOTS.iter().any(|x| e.path() == Path::new(x)))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let size = e.metadata().ok()?.len();
            Some((size, e.into_path()))
        })
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries.truncate(limit);
    entries
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn largest_files_summary(root: &Path, limit: usize) -> String {
    let entries = largest_files(root, limit);
    if entries.is_empty() {
        return format!("no files found under {}", root.display());
    }
    let mut lines = vec![format!("top {} largest files:", entries.len())];
    for (size, path) in &entries {
        lines.push(format!("  {:>10}  {}", format_size(*size), path.display()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PS_OUTPUT: &str = "\
    1 Ss   systemd
  412 S    sshd
  987 Z    old-worker
 1044 Zs   leaky daemon
 2001 R    ps
";

    #[test]
    fn finds_zombie_states_only() {
        let zombies = zombie_processes(PS_OUTPUT);
        assert_eq!(
            zombies,
            vec![
                (987, "old-worker".to_string()),
                (1044, "leaky daemon".to_string()),
            ]
        );
    }

    #[test]
    fn summary_counts_and_lists() {
        let summary = zombie_summary(PS_OUTPUT);
        assert!(summary.starts_with("2 zombie process(es):"));
        assert!(summary.contains("pid 987: old-worker"));
    }

    #[test]
    fn clean_system_reports_none() {
        assert_eq!(zombie_summary("    1 Ss   systemd\n"), "no zombie processes");
    }

    #[test]
    fn largest_files_sorted_and_truncated() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("small"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("big"), vec![0u8; 4096]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/medium"), vec![0u8; 512]).unwrap();

        let top = largest_files(dir.path(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 4096);
        assert!(top[0].1.ends_with("big"));
        assert_eq!(top[1].0, 512);
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
