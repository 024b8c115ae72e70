//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the room engine source tree for antipatterns that violate
//! project standards. Each has a budget (ideally zero). If you must add one,
//! you have to fix an existing one first. The budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

/// `(pattern, budget, why it is banned)`.
const BUDGETS: &[(&str, usize, &str)] = &[
    // Panics: these crash the render loop.
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "panics"),
    ("unreachable!(", 0, "panics"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    // Silent loss: discards errors without inspecting.
    ("let _ =", 0, "discards a value without inspecting it"),
    (".ok()", 0, "discards an error without inspecting it"),
    // Style / structure.
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

/// Only these files may talk to the browser; everything else stays testable natively.
const WEB_SYS_FILES: &[&str] = &["render.rs", "engine.rs"];

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `src/`, excluding test files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter().map(|(path, count)| format!("  {path}: {count}")).collect::<Vec<_>>().join("\n")
}

#[test]
fn source_tree_is_not_empty() {
    assert!(source_files().len() >= 10, "expected to scan src/, found too few files");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for &(pattern, budget, why) in BUDGETS {
        let hits = count_in_source(&files, pattern);
        let count: usize = hits.iter().map(|(_, c)| c).sum();
        if count > budget {
            failures.push(format!("`{pattern}` ({why}): found {count}, max {budget}\n{}", format_hits(&hits)));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn web_sys_confined_to_render_and_engine() {
    let files = source_files();
    let offenders: Vec<_> = count_in_source(&files, "web_sys")
        .into_iter()
        .filter(|(path, _)| !WEB_SYS_FILES.iter().any(|name| path.ends_with(name)))
        .collect();
    assert!(offenders.is_empty(), "web_sys used outside render/engine:\n{}", format_hits(&offenders));
}
