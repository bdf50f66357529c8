use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::content::CharacterId;

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centred(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Rect {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

// ── Sides ───────────────────────────────────────────────────

/// Which combatant. The player side is the one driven by the input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player = 0,
    Opponent = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants for the six logical buttons.
pub mod button {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const JUMP: u8 = 4;
    pub const ATTACK: u8 = 8;
    pub const SPECIAL: u8 = 16;
    pub const BLOCK: u8 = 32;
}

pub const NO_BUTTONS: u8 = 0;

/// Physics state of one fighter body as reported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub grounded: bool,
}

impl Body {
    pub fn at(x: f64, y: f64) -> Self {
        Body { x, y, ..Body::default() }
    }

    pub fn rect(&self) -> Rect {
        Rect::centred(self.x, self.y, FIGHTER_WIDTH, FIGHTER_HEIGHT)
    }
}

/// Everything the engine tells the core about one display frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Elapsed wall-clock time since the previous frame.
    pub dt_ms: f64,
    /// Held buttons of the player's input device.
    pub buttons: u8,
    /// Indexed by `Side::index`.
    pub bodies: [Body; 2],
    /// `overlaps[i]`: side i's hitbox overlaps the other fighter's body.
    pub overlaps: [bool; 2],
}

// ── Fighter state ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Idle,
    Moving,
    Jumping,
    Attacking,
    Blocking,
    Hit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Basic,
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub damage: i32,
    pub cooldown_ms: u32,
    pub range: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackSet {
    pub basic: AttackProfile,
    pub special: AttackProfile,
}

impl AttackSet {
    pub fn get(&self, kind: AttackKind) -> &AttackProfile {
        match kind {
            AttackKind::Basic => &self.basic,
            AttackKind::Special => &self.special,
        }
    }
}

// ── Match ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Fight,
    Knockout,
    Victory,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub seed: u32,
    pub player: CharacterId,
    pub opponent: CharacterId,
    pub background: usize,
    pub frame_step_ms: u32,
    pub combo_window_ms: f64,
    pub knockout_delay_ms: f64,
    pub think_interval_ms: f64,
    pub block_duration_ms: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            seed: 0,
            player: CharacterId::NeoRazor,
            opponent: CharacterId::VoxSlasher,
            background: 0,
            frame_step_ms: FRAME_STEP_MS,
            combo_window_ms: COMBO_WINDOW_MS,
            knockout_delay_ms: KNOCKOUT_DELAY_MS,
            think_interval_ms: THINK_INTERVAL_MS,
            block_duration_ms: BLOCK_DURATION_MS,
        }
    }
}
