/// Story Linter — validates compiled story documents before shipping.
///
/// Usage: story_linter <document.ron> [more.ron ...]
///
/// Errors (exit 1): parse failures, missing entry passage, choices
/// targeting undefined passages.
/// Warnings: unreachable passages, assignments to undeclared variables,
/// empty passages, choice lists with a single option.

use std::path::Path;
use std::process;

use story_engine::schema::document::{Step, StoryDocument};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <document.ron> [more.ron ...]");
        process::exit(0);
    }

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for arg in &args[1..] {
        let path = Path::new(arg);
        println!("=== {} ===", path.display());

        let doc = match StoryDocument::load_from_ron(path) {
            Ok(doc) => doc,
            Err(e) => {
                println!("ERROR: {}", e);
                total_errors += 1;
                continue;
            }
        };

        let (errors, warnings) = lint_document(&doc);
        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed ({} passages)", doc.passages.len());
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }
        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!("\nSummary: {} errors, {} warnings", total_errors, total_warnings);
    process::exit(if total_errors == 0 { 0 } else { 1 });
}

fn lint_document(doc: &StoryDocument) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = doc.validate() {
        errors.push(e.to_string());
    }

    for id in doc.unreachable_passages() {
        warnings.push(format!("passage '{}' is unreachable from the entry point", id));
    }

    for name in doc.undeclared_assignments() {
        warnings.push(format!(
            "variable '{}' is assigned but not declared in the variable table",
            name
        ));
    }

    for (id, passage) in &doc.passages {
        if passage.steps.is_empty() && passage.choices.is_empty() {
            warnings.push(format!("passage '{}' is empty and terminal", id));
        }
        if passage.choices.len() == 1 {
            warnings.push(format!(
                "passage '{}' offers a single choice (consider merging passages)",
                id
            ));
        }
        for step in &passage.steps {
            if let Step::Tag(raw) = step {
                if raw.trim().is_empty() {
                    warnings.push(format!("passage '{}' contains an empty tag directive", id));
                }
            }
        }
    }

    errors.sort();
    warnings.sort();
    (errors, warnings)
}
