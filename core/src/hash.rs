use sha2::{Digest, Sha256};

use crate::content::CharacterId;

/// SHA-256 over the match setup and every recorded button mask.
pub fn hash_transcript(player: CharacterId, opponent: CharacterId, frames: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([player as u8, opponent as u8]);
    hasher.update((frames.len() as u64).to_le_bytes());
    hasher.update(frames);
    hasher.finalize().into()
}

/// SHA-256 commitment of the seed.
pub fn hash_seed(seed: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.finalize().into()
}
