//! Integration Test: Blocking Prohibition
//!
//! The animation engine is frame driven: the host calls tick() and gets an
//! answer immediately. Production code in anty-core MUST NOT sleep, spawn
//! threads, or otherwise wait for time to pass on its own.
//!
//! **Exceptions**: test code. The TUI host may sleep for frame pacing via
//! its input poll timeout, so it is not scanned here.

use std::fs;
use std::path::Path;

/// Test that engine production code never blocks.
#[test]
fn test_no_blocking_in_engine_code() {
    let violations = find_blocking_violations("anty/core/src");

    if !violations.is_empty() {
        eprintln!("\nBlocking calls found in engine production code!");
        eprintln!("The engine is frame driven; the host owns all waiting.\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "\nFound {} blocking violation(s) in engine code.\nFix these before merging!",
            violations.len()
        );
    }
}

const FORBIDDEN: &[&str] = &["::sleep(", ".sleep(", "thread::spawn(", "::park("];

fn find_blocking_violations(dir: &str) -> Vec<String> {
    let mut violations = Vec::new();
    // Resolve from the workspace root so the scan works regardless of the
    // directory cargo runs the test from.
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(dir);
    assert!(path.exists(), "scan target missing: {}", path.display());

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), &mut violations);
        }
    }
    violations
}

fn check_file(path: &Path, violations: &mut Vec<String>) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };

    for (idx, line) in production_lines(&content) {
        let code_part = line.split("//").next().unwrap_or(line);
        if FORBIDDEN.iter().any(|pattern| code_part.contains(pattern)) {
            violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
        }
    }
}

/// Lines before the file's `#[cfg(test)]` module, with their indices. The
/// engine's convention places the test module last in each file.
fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_flags_sleep() {
        let code = "fn tick() {\n    std::thread::sleep(Duration::from_millis(10));\n}\n";
        let flagged = production_lines(code)
            .iter()
            .any(|(_, line)| FORBIDDEN.iter().any(|p| line.contains(p)));
        assert!(flagged, "should detect the sleep call");
    }

    #[test]
    fn test_detector_ignores_test_modules() {
        let code = "fn tick() {}\n#[cfg(test)]\nmod tests {\n    fn helper() { std::thread::sleep(D); }\n}\n";
        let flagged = production_lines(code)
            .iter()
            .any(|(_, line)| FORBIDDEN.iter().any(|p| line.contains(p)));
        assert!(!flagged, "test module code is exempt");
    }
}
