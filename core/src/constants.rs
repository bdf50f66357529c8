// Times are milliseconds, distances are stage pixels, velocities are px/s.

// Frame clock
pub const FRAME_STEP_MS: u32 = 16;

// Stage
pub const STAGE_WIDTH: f64 = 1280.0;
pub const STAGE_HEIGHT: f64 = 720.0;
pub const GRAVITY: f64 = 900.0;
/// Top surface of the ground platform.
pub const GROUND_Y: f64 = 668.0;

// Fighter body, centred on the sprite position
pub const FIGHTER_WIDTH: f64 = 96.0;
pub const FIGHTER_HEIGHT: f64 = 192.0;

pub const PLAYER_SPAWN_X: f64 = 300.0;
pub const OPPONENT_SPAWN_X: f64 = 980.0;
pub const SPAWN_Y: f64 = 450.0;

// Attack hitbox
pub const HITBOX_OFFSET_X: f64 = 75.0;
pub const HITBOX_WIDTH: f64 = 100.0;
pub const HITBOX_HEIGHT: f64 = 150.0;

// Hit reaction
pub const KNOCKBACK_BASIC: f64 = 200.0;
pub const KNOCKBACK_SPECIAL: f64 = 400.0;
pub const KNOCKBACK_LIFT: f64 = -200.0;

// Effect anchors relative to the fighter
pub const HIT_EFFECT_RISE: f64 = 50.0;
pub const SPECIAL_EFFECT_REACH: f64 = 100.0;
pub const SPECIAL_EFFECT_RISE: f64 = 30.0;

// Combo
pub const COMBO_WINDOW_MS: f64 = 2000.0;
pub const COMBO_SCALE_PER_HIT: f64 = 0.05;

// Match flow
pub const KNOCKOUT_DELAY_MS: f64 = 2000.0;

// Opponent policy
pub const THINK_INTERVAL_MS: f64 = 1000.0;
pub const BLOCK_DURATION_MS: f64 = 500.0;
pub const FAR_DISTANCE: f64 = 300.0;
pub const NEAR_DISTANCE: f64 = 150.0;

// Audio volumes
pub const THEME_VOLUME: f64 = 0.5;
pub const ATTACK_VOLUME: f64 = 0.7;
pub const PLAYER_JUMP_VOLUME: f64 = 0.5;
pub const OPPONENT_JUMP_VOLUME: f64 = 0.3;
pub const KO_VOLUME: f64 = 1.0;
