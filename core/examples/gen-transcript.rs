//! Generates transcript JSON fixtures for the replay runner.
//!
//! Usage:
//!   cargo run -p neokult-core --example gen-transcript -- [idle|mash|short] > transcript.json

use neokult_core::*;

fn main() {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "idle".to_string());

    let config = default_config(42);
    let mut transcript = Transcript::new(&config);

    transcript.frames = match mode.as_str() {
        "idle" => {
            // One minute of nothing: the opponent walks over and fights a statue
            vec![NO_BUTTONS; 3750]
        }
        "mash" => {
            // Walk right for a second, then alternate basic presses with a special every 2.5s
            (0..3750)
                .map(|frame| match frame {
                    0..=59 => button::RIGHT,
                    f if f % 156 == 0 => button::SPECIAL,
                    f if f % 2 == 0 => button::ATTACK,
                    _ => NO_BUTTONS,
                })
                .collect()
        }
        "short" => {
            // Short idle match for quick checks
            vec![NO_BUTTONS; 100]
        }
        _ => {
            eprintln!("Unknown mode: {}. Use 'idle', 'mash', or 'short'", mode);
            std::process::exit(1);
        }
    };

    // Verify by running the match
    let summary = replay(&transcript, Content::builtin());

    eprintln!("=== Match result ({} mode) ===", mode);
    eprintln!("Frames run: {}", summary.frames_run);
    eprintln!("Phase: {:?}", summary.phase);
    eprintln!("Winner: {:?}", summary.winner);
    eprintln!("Health: P={}, O={}", summary.health[0], summary.health[1]);
    eprintln!(
        "Hits: P={}, O={} (best combo {})",
        summary.hits_landed[0], summary.hits_landed[1], summary.best_combo
    );

    match serde_json::to_string(&transcript) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to encode transcript: {}", e);
            std::process::exit(1);
        }
    }
}
