/// Case File demo — the simple story variant: evidence images, no stat
/// projection, one pass through the ledger branch.
///
/// Run with: cargo run --example case_file

use std::path::Path;

use story_engine::core::engine::StoryEngine;
use story_engine::core::output::OutputBlock;
use story_engine::schema::document::StoryDocument;

fn main() {
    let document = StoryDocument::load_from_ron(Path::new("story_data/case_file.ron"))
        .expect("Failed to load case_file.ron");

    let mut engine = StoryEngine::builder(document)
        .build()
        .expect("Failed to build engine");

    loop {
        let outcome = engine.advance().expect("advance failed");

        println!("----------------------------------------");
        for block in &outcome.blocks {
            match block {
                OutputBlock::Text(text) => println!("{}", text),
                OutputBlock::Image(src) => println!("[evidence: {}]", src),
            }
        }

        if outcome.is_end() {
            let snapshot = engine.variable_snapshot(&["suspect"]);
            if let Some(suspect) = snapshot.get("suspect") {
                println!("Prime suspect on file: {}", suspect);
            }
            break;
        }

        // Always follow the first lead.
        for choice in &outcome.choices {
            println!("  {}) {}", choice.index + 1, choice.text);
        }
        println!("  -> picking 1");
        engine.choose(0).expect("choose failed");
    }
}
