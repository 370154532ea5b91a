/// Play — terminal presentation adapter for story documents.
///
/// Usage: play <document.ron> [--stats name1,name2] [--no-clear]
///
/// Renders each advance cycle from a cleared screen (the narrative
/// viewport returns to its top edge whenever new content replaces old),
/// prints a numbered choice menu, and reads the player's pick from
/// stdin. Side-effect `mint:` directives are echoed as item pickups.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use story_engine::core::engine::StoryEngine;
use story_engine::core::output::OutputBlock;
use story_engine::core::policy::EnginePolicy;
use story_engine::schema::document::StoryDocument;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: play <document.ron> [--stats name1,name2] [--no-clear]");
        return;
    }

    let doc_path = &args[1];
    let mut stat_names: Vec<String> = Vec::new();
    let mut clear_screen = true;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--stats" if i + 1 < args.len() => {
                i += 1;
                stat_names = args[i].split(',').map(|s| s.trim().to_string()).collect();
            }
            "--no-clear" => clear_screen = false,
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let document = match StoryDocument::load_from_ron(Path::new(doc_path)) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("ERROR: failed to load document: {}", e);
            process::exit(1);
        }
    };

    let policy = EnginePolicy {
        stats: stat_names,
        ..EnginePolicy::default()
    };
    let engine = StoryEngine::builder(document)
        .policy(policy)
        .on_effect("mint", |payload| {
            println!("  * You received: {} *", payload);
        })
        .build();
    let mut engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    loop {
        let outcome = match engine.advance() {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        };

        if clear_screen {
            // ANSI clear + home: fresh content replaces the old view
            print!("\x1b[2J\x1b[H");
        }

        for block in &outcome.blocks {
            match block {
                OutputBlock::Text(text) => println!("{}\n", text),
                OutputBlock::Image(src) => println!("  [image: {}]\n", src),
            }
        }

        let stats = engine.stat_projection();
        if !stats.is_empty() {
            let line: Vec<String> = stats
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect();
            println!("  -- {} --\n", line.join(" | "));
        }

        if outcome.is_end() {
            println!("The End.");
            return;
        }

        for choice in &outcome.choices {
            println!("  {}) {}", choice.index + 1, choice.text);
        }

        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
                return;
            }
            let trimmed = line.trim();
            if trimmed == "q" || trimmed == "quit" {
                return;
            }
            match trimmed.parse::<usize>() {
                Ok(n) if n >= 1 => match engine.choose(n - 1) {
                    Ok(()) => break,
                    Err(e) => println!("{}", e),
                },
                _ => println!("Enter a choice number, or 'q' to quit."),
            }
        }
    }
}
