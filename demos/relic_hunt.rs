/// Relic Hunt demo — the stats-tracking story variant, played on a
/// fixed script: cavern → temple gate → fight → sanctum.
///
/// Run with: cargo run --example relic_hunt

use std::path::Path;

use story_engine::core::engine::StoryEngine;
use story_engine::core::output::OutputBlock;
use story_engine::core::policy::EnginePolicy;
use story_engine::schema::document::StoryDocument;

fn main() {
    let document = StoryDocument::load_from_ron(Path::new("story_data/relic_hunt.ron"))
        .expect("Failed to load relic_hunt.ron");

    let mut engine = StoryEngine::builder(document)
        .policy(EnginePolicy::with_stats(&["combat", "resilience", "weapon"]))
        .on_effect("mint", |payload| println!("  * minted: {} *", payload))
        .build()
        .expect("Failed to build engine");

    // Scripted playthrough: cavern, then the temple gate, then fight
    // the guardian (the first choice at every branch).
    let picks = [0usize, 0, 0, 0];
    let mut pick = picks.iter();

    loop {
        let outcome = engine.advance().expect("advance failed");

        println!("----------------------------------------");
        for block in &outcome.blocks {
            match block {
                OutputBlock::Text(text) => println!("{}", text),
                OutputBlock::Image(src) => println!("[image: {}]", src),
            }
        }

        let stats: Vec<String> = engine
            .stat_projection()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        println!("  ({})", stats.join(" | "));

        if outcome.is_end() {
            println!("The End.");
            break;
        }

        for choice in &outcome.choices {
            println!("  {}) {}", choice.index + 1, choice.text);
        }
        let index = *pick.next().expect("script ran out of picks");
        println!("  -> picking {}", index + 1);
        engine.choose(index).expect("choose failed");
    }
}
