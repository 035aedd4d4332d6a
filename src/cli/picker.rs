//! Interactive CSV picker for `pulse validate` / `pulse import`.
//!
//! Kept apart from clap: flags stay structured, while this module covers the
//! "run `pulse import` with no argument and choose a file" path. Discovery
//! walks the working tree a few levels deep and skips VCS and build output.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

const MAX_WALK_DEPTH: usize = 4;

const SKIP_DIRS: [&str; 3] = ["target", "node_modules", "debug"];

/// Hidden directories (`.git`, `.venv`, `.cache`, ...) and build output are
/// never worth listing.
fn skip_dir(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

/// List discovered CSVs and read the user's pick from stdin.
///
/// The answer may be an index into the list or a path typed directly; `q`
/// cancels. EOF on stdin is treated as a cancel too, so piped invocations
/// fail cleanly instead of looping.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let candidates = discover_csv_files();
    if candidates.is_empty() {
        return Err(AppError::usage(
            "No .csv files found. Provide one with `pulse import <file.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", candidates.len());
    for (n, path) in candidates.iter().enumerate() {
        println!("{:>3}) {}", n + 1, display_path(path));
    }

    let stdin = io::stdin();
    loop {
        print!(
            "Select 1-{} or type a path (q to quit): ",
            candidates.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;
        if read == 0 {
            return Err(AppError::usage(
                "No input received. Provide a CSV path with `pulse import <file.csv>`.",
            ));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::usage("Canceled."));
        }

        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= candidates.len() => {
                return validate_csv_path(&candidates[n - 1]);
            }
            Ok(n) => {
                println!("No entry {n}; pick 1-{}.", candidates.len());
            }
            Err(_) => match validate_csv_path(Path::new(answer)) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
        }
    }
}

/// Reject paths that are missing, directories, or not `.csv`.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::usage(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::usage(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::usage(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under the current directory, in a stable display order.
pub fn discover_csv_files() -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(Path::new("."), 0, &mut found);
    found.sort_by_key(|p| display_path(p));
    found
}

fn walk(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => {
                let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
                if !skip_dir(name) {
                    walk(&path, depth + 1, found);
                }
            }
            Ok(ft) if ft.is_file() && has_csv_extension(&path) => found.push(path),
            _ => {}
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_and_non_csv_paths() {
        assert_eq!(
            validate_csv_path(Path::new("/no/such/file.csv"))
                .unwrap_err()
                .exit_code(),
            2
        );

        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "x").unwrap();
        let err = validate_csv_path(&txt).unwrap_err();
        assert!(err.to_string().contains(".csv"));

        assert_eq!(validate_csv_path(dir.path()).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn accepts_csv_regardless_of_case() {
        let dir = tempfile::tempdir().unwrap();
        let upper = dir.path().join("SALES.CSV");
        std::fs::write(&upper, "a,b\n").unwrap();
        assert_eq!(validate_csv_path(&upper).unwrap(), upper);
    }

    #[test]
    fn walk_skips_hidden_and_build_directories() {
        let dir = tempfile::tempdir().unwrap();
        let visible = dir.path().join("data");
        let hidden = dir.path().join(".venv");
        let build = dir.path().join("target");
        for d in [&visible, &hidden, &build] {
            std::fs::create_dir(d).unwrap();
        }
        std::fs::write(visible.join("sales.csv"), "a,b\n").unwrap();
        std::fs::write(hidden.join("cached.csv"), "a,b\n").unwrap();
        std::fs::write(build.join("out.csv"), "a,b\n").unwrap();

        let mut found = Vec::new();
        walk(dir.path(), 0, &mut found);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], visible.join("sales.csv"));
    }

    #[test]
    fn display_path_strips_leading_dot_slash() {
        assert_eq!(display_path(Path::new("./data/sales.csv")), "data/sales.csv");
        assert_eq!(display_path(Path::new("data/sales.csv")), "data/sales.csv");
    }
}
