//! Recorded matches.
//!
//! A [`Transcript`] holds the setup and the player's held buttons for every
//! frame. The opponent is driven by the seeded policy, so replaying a
//! transcript at the fixed frame step reproduces the match exactly. A
//! transcript covers a single match: restarts are not recorded, and replay
//! stops at Victory.

use serde::{Deserialize, Serialize};

use crate::content::{CharacterId, Content};
use crate::hash::{hash_seed, hash_transcript};
use crate::headless::Headless;
use crate::init::default_config;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub seed: u32,
    pub player: CharacterId,
    pub opponent: CharacterId,
    pub frames: Vec<u8>,
}

impl Transcript {
    pub fn new(config: &MatchConfig) -> Self {
        Transcript {
            seed: config.seed,
            player: config.player,
            opponent: config.opponent,
            frames: Vec::new(),
        }
    }

    pub fn config(&self) -> MatchConfig {
        MatchConfig {
            player: self.player,
            opponent: self.opponent,
            ..default_config(self.seed)
        }
    }

    pub fn digest(&self) -> [u8; 32] {
        hash_transcript(self.player, self.opponent, &self.frames)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub frames_run: u64,
    pub phase: Phase,
    pub winner: Option<Side>,
    pub health: [i32; 2],
    pub hits_landed: [u32; 2],
    pub best_combo: u32,
    pub transcript_hash: [u8; 32],
    pub seed_hash: [u8; 32],
}

impl MatchSummary {
    pub fn of(headless: &Headless, transcript: &Transcript) -> Self {
        let session = headless.session();
        let stats = session.stats();
        MatchSummary {
            frames_run: session.frame_count(),
            phase: session.phase(),
            winner: session.winner(),
            health: Side::BOTH.map(|side| session.fighter(side).health),
            hits_landed: stats.hits_landed,
            best_combo: stats.best_combo,
            transcript_hash: transcript.digest(),
            seed_hash: hash_seed(transcript.seed),
        }
    }
}

/// Run a transcript from a fresh match, stopping early once a winner is shown.
pub fn replay(transcript: &Transcript, content: Content) -> MatchSummary {
    let mut headless = Headless::new(transcript.config(), content);
    for &buttons in &transcript.frames {
        headless.step(buttons);
        if headless.session().phase() == Phase::Victory {
            break;
        }
    }
    MatchSummary::of(&headless, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| match i % 120 {
                0..=40 => button::RIGHT,
                50 | 70 | 90 => button::ATTACK,
                100 => button::SPECIAL,
                110..=115 => button::BLOCK,
                _ => NO_BUTTONS,
            })
            .collect()
    }

    #[test]
    fn replay_is_reproducible() {
        let transcript = Transcript {
            seed: 1234,
            player: CharacterId::EchoHex,
            opponent: CharacterId::VoxSlasher,
            frames: pattern(3000),
        };
        let a = replay(&transcript, Content::builtin());
        let b = replay(&transcript, Content::builtin());
        assert_eq!(a, b);
        assert!(a.frames_run > 0 && a.frames_run <= 3000);
        assert_eq!(a.transcript_hash, transcript.digest());
    }

    #[test]
    fn idle_transcript_runs_every_frame() {
        let mut transcript = Transcript::new(&default_config(8));
        transcript.frames = vec![NO_BUTTONS; 200];
        let summary = replay(&transcript, Content::builtin());
        assert_eq!(summary.frames_run, 200);
        assert_eq!(summary.phase, Phase::Fight);
        assert_eq!(summary.winner, None);
    }

    #[test]
    fn transcript_json_round_trip() {
        let transcript = Transcript {
            seed: 7,
            player: CharacterId::NeoRazor,
            opponent: CharacterId::EchoHex,
            frames: vec![0, 8, 0, 16],
        };
        let json = serde_json::to_string(&transcript).unwrap();
        assert!(json.contains(r#""opponent":"echohex""#));
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transcript);
    }
}
