pub mod animation;
pub mod arena;
pub mod combat;
pub mod command;
pub mod constants;
pub mod content;
pub mod fighter;
pub mod hash;
pub mod headless;
pub mod init;
pub mod policy;
pub mod prng;
pub mod replay;
pub mod schedule;
pub mod session;
pub mod types;

pub use animation::{AnimationEntry, AnimationId, AnimationTable};
pub use arena::{Arena, ClipPlayer};
pub use combat::{resolve_hit, Combo, HitOutcome};
pub use command::{Command, Cue};
pub use constants::*;
pub use content::{
    CharacterId, CharacterTemplate, Clip, ClipSpec, Content, ContentError, ContentFile, EffectKind,
};
pub use fighter::{Control, Fighter};
pub use hash::*;
pub use headless::Headless;
pub use init::*;
pub use policy::{decide, Decision};
pub use prng::*;
pub use replay::{replay, MatchSummary, Transcript};
pub use schedule::{Ticket, TimedEvent, Timeline};
pub use session::{MatchSession, MatchStats, Snapshot};
pub use types::*;
