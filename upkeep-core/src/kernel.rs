//! Kernel release queries and the reboot-recommendation inputs.
//!
//! Two distinct questions get asked here: which kernel is *running*
//! (`/proc/sys/kernel/osrelease`, via the HAL) and which kernel is the
//! newest one *installed* on disk. After an upgrade the running kernel is
//! unchanged until reboot, so the installed side is read from the module
//! directories under `/usr/lib/modules`, whose entries use the exact same
//! release naming as `uname -r` on every supported distro.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use upkeep_hal::SystemHal;

pub fn default_modules_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/lib/modules"),
        PathBuf::from("/lib/modules"),
    ]
}

/// Release string of the currently running kernel.
pub fn running_release(hal: &Arc<dyn SystemHal>) -> Option<String> {
    hal.kernel_release().ok().flatten()
}

/// Newest installed kernel release, falling back to the running one when
/// no module directory can be read.
pub fn newest_installed_release(hal: &Arc<dyn SystemHal>, modules_dirs: &[PathBuf]) -> Option<String> {
    for dir in modules_dirs {
        if let Some(release) = newest_release_in(dir) {
            return Some(release);
        }
    }
    running_release(hal)
}

/// Greatest release-named entry in a modules directory.
pub fn newest_release_in(dir: &Path) -> Option<String> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .max_by(|a, b| compare_releases(a, b))
}

/// Numeric-aware ordering for kernel release strings: digit runs compare
/// as numbers, everything else compares lexically. Good enough to rank
/// `6.10.2` above `6.9.12`; equality is what the reboot recommendation
/// actually relies on.
pub fn compare_releases(a: &str, b: &str) -> Ordering {
    let mut left = tokenize(a).into_iter();
    let mut right = tokenize(b).into_iter();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Token {
    Text(String),
    Number(u64),
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for ch in s.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                let value = digits.parse::<u64>().unwrap_or(u64::MAX);
                tokens.push(Token::Number(value));
                digits.clear();
            }
            text.push(ch);
        }
    }
    if !digits.is_empty() {
        let value = digits.parse::<u64>().unwrap_or(u64::MAX);
        tokens.push(Token::Number(value));
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn numeric_runs_compare_as_numbers() {
        assert_eq!(compare_releases("6.10.2-100", "6.9.12-200"), Ordering::Greater);
        assert_eq!(compare_releases("6.9.1-100", "6.9.1-100"), Ordering::Equal);
        assert_eq!(compare_releases("5.15.0-91", "5.15.0-105"), Ordering::Less);
    }

    #[test]
    fn suffixes_break_ties_lexically() {
        assert_eq!(
            compare_releases("6.9.1-100.fc40.aarch64", "6.9.1-100.fc41.aarch64"),
            Ordering::Less
        );
    }

    #[test]
    fn newest_release_picks_greatest_directory() {
        let dir = tempdir().unwrap();
        for name in ["6.9.12-200.fc40.x86_64", "6.10.2-100.fc40.x86_64"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        // Stray files (e.g. leftover tarballs) are ignored.
        fs::write(dir.path().join("README"), "not a kernel").unwrap();

        assert_eq!(
            newest_release_in(dir.path()),
            Some("6.10.2-100.fc40.x86_64".to_string())
        );
    }

    #[test]
    fn empty_directory_yields_none() {
        let dir = tempdir().unwrap();
        assert_eq!(newest_release_in(dir.path()), None);
        assert_eq!(newest_release_in(&dir.path().join("missing")), None);
    }
}
