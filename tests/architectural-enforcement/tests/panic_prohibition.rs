//! Integration Test: Panic Prohibition
//!
//! A denied animation request is a normal outcome, not an error, and a bad
//! one must never take the host down. Production code in anty-core MUST
//! NOT call unwrap() or expect(); fallible paths return Result or log and
//! no-op.
//!
//! **Exceptions**: test code, and debug_assert! (compiled out in release).

use std::fs;
use std::path::Path;

/// Test that engine production code never unwraps.
#[test]
fn test_no_unwrap_in_engine_code() {
    let violations = find_panic_violations("anty/core/src");

    if !violations.is_empty() {
        eprintln!("\nPanicking calls found in engine production code!");
        eprintln!("Denials and bad input must degrade to a logged no-op.\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "\nFound {} panic violation(s) in engine code.\nFix these before merging!",
            violations.len()
        );
    }
}

const FORBIDDEN: &[&str] = &[".unwrap()", ".expect(", "panic!(", "unreachable!(", "todo!("];

fn find_panic_violations(dir: &str) -> Vec<String> {
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

/// Lines before the file's `#[cfg(test)]` module, with their indices.
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
    fn test_detector_flags_unwrap() {
        let code = "fn load() {\n    let v = map.get(&k).unwrap();\n}\n";
        let flagged = production_lines(code)
            .iter()
            .any(|(_, line)| FORBIDDEN.iter().any(|p| line.contains(p)));
        assert!(flagged, "should detect the unwrap call");
    }

    #[test]
    fn test_detector_ignores_comments() {
        let code = "fn load() {\n    // never .unwrap() here\n    let v = map.get(&k);\n}\n";
        let mut violations = Vec::new();
        for (idx, line) in production_lines(code) {
            let code_part = line.split("//").next().unwrap_or(line);
            if FORBIDDEN.iter().any(|p| code_part.contains(p)) {
                violations.push(idx);
            }
        }
        assert!(violations.is_empty(), "comments are exempt");
    }
}
