//! Native stand-in for the browser engine.
//!
//! Arcade-style bodies under gravity on a single ground platform, hitbox
//! rectangles placed by the session's commands, and a clip player that
//! reports completion tickets for one-shot clips.

use crate::constants::*;
use crate::init::spawn_bodies;
use crate::schedule::Ticket;
use crate::types::*;

/// Accelerate vy by gravity over `dt_s` seconds.
pub fn apply_gravity(b: &Body, dt_s: f64) -> Body {
    Body {
        vy: b.vy + GRAVITY * dt_s,
        ..*b
    }
}

/// Integrate position, land on the ground and clamp to the stage.
pub fn move_and_collide(b: &Body, dt_s: f64) -> Body {
    let half_w = FIGHTER_WIDTH / 2.0;
    let half_h = FIGHTER_HEIGHT / 2.0;

    let mut x = b.x + b.vx * dt_s;
    let mut y = b.y + b.vy * dt_s;
    let mut vx = b.vx;
    let mut vy = b.vy;
    let mut grounded = false;

    // Ground: only collides with a body moving down onto its top surface.
    if vy >= 0.0 && y + half_h >= GROUND_Y {
        y = GROUND_Y - half_h;
        vy = 0.0;
        grounded = true;
    }

    // Stage bounds
    if x - half_w < 0.0 {
        x = half_w;
        vx = 0.0;
    }
    if x + half_w > STAGE_WIDTH {
        x = STAGE_WIDTH - half_w;
        vx = 0.0;
    }
    if y - half_h < 0.0 {
        y = half_h;
        vy = 0.0;
    }
    if y + half_h > STAGE_HEIGHT {
        y = STAGE_HEIGHT - half_h;
        vy = 0.0;
        grounded = true;
    }

    Body {
        x,
        y,
        vx,
        vy,
        grounded,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Hitbox {
    rect: Option<Rect>,
    active: bool,
}

#[derive(Clone, Debug)]
pub struct Arena {
    bodies: [Body; 2],
    hitboxes: [Hitbox; 2],
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            bodies: spawn_bodies(),
            hitboxes: [Hitbox::default(); 2],
        }
    }

    pub fn reset(&mut self, spawns: [Vec2; 2]) {
        self.bodies = spawns.map(|p| Body::at(p.x, p.y));
        self.hitboxes = [Hitbox::default(); 2];
    }

    pub fn bodies(&self) -> [Body; 2] {
        self.bodies
    }

    pub fn body(&self, side: Side) -> &Body {
        &self.bodies[side.index()]
    }

    pub fn set_velocity_x(&mut self, side: Side, vx: f64) {
        self.bodies[side.index()].vx = vx;
    }

    pub fn set_velocity_y(&mut self, side: Side, vy: f64) {
        let body = &mut self.bodies[side.index()];
        body.vy = vy;
        if vy < 0.0 {
            body.grounded = false;
        }
    }

    pub fn move_hitbox(&mut self, side: Side, rect: Rect) {
        self.hitboxes[side.index()].rect = Some(rect);
    }

    pub fn set_hitbox_active(&mut self, side: Side, active: bool) {
        self.hitboxes[side.index()].active = active;
    }

    /// `overlaps[i]`: side i's active hitbox touches the other side's body.
    pub fn overlaps(&self) -> [bool; 2] {
        Side::BOTH.map(|side| {
            let hitbox = self.hitboxes[side.index()];
            let target = self.bodies[side.other().index()].rect();
            hitbox.active && hitbox.rect.is_some_and(|r| r.overlaps(&target))
        })
    }

    pub fn step(&mut self, dt_ms: f64) {
        let dt_s = dt_ms.max(0.0) / 1000.0;
        for body in &mut self.bodies {
            *body = move_and_collide(&apply_gravity(body, dt_s), dt_s);
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Playing {
    ticket: Ticket,
    remaining_ms: f64,
}

/// Plays clips for timing only. A sprite shows one clip at a time, so a
/// newer clip silently replaces the older one and the older never completes.
#[derive(Clone, Debug, Default)]
pub struct ClipPlayer {
    sprites: [Option<Playing>; 2],
    effects: Vec<Playing>,
}

impl ClipPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `duration_ms` is `None` for looping clips.
    pub fn play(&mut self, side: Side, ticket: Option<Ticket>, duration_ms: Option<f64>) {
        self.sprites[side.index()] = ticket
            .zip(duration_ms)
            .map(|(ticket, remaining_ms)| Playing { ticket, remaining_ms });
    }

    pub fn spawn_effect(&mut self, ticket: Ticket, duration_ms: f64) {
        self.effects.push(Playing {
            ticket,
            remaining_ms: duration_ms,
        });
    }

    pub fn despawn_effect(&mut self, ticket: Ticket) {
        self.effects.retain(|p| p.ticket != ticket);
    }

    pub fn clear(&mut self) {
        self.sprites = [None; 2];
        self.effects.clear();
    }

    pub fn active(&self) -> usize {
        self.sprites.iter().flatten().count() + self.effects.len()
    }

    /// Advance playback; returns tickets of clips that finished, sprites first.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Ticket> {
        let dt_ms = dt_ms.max(0.0);
        let mut done = Vec::new();
        for slot in &mut self.sprites {
            if let Some(playing) = slot {
                playing.remaining_ms -= dt_ms;
                if playing.remaining_ms <= 0.0 {
                    done.push(playing.ticket);
                    *slot = None;
                }
            }
        }
        for playing in &mut self.effects {
            playing.remaining_ms -= dt_ms;
            if playing.remaining_ms <= 0.0 {
                done.push(playing.ticket);
            }
        }
        // Effects stay until the session despawns them.
        for playing in &mut self.effects {
            if playing.remaining_ms <= 0.0 {
                playing.remaining_ms = f64::INFINITY;
            }
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = FRAME_STEP_MS as f64;

    fn ticket(serial: u32) -> Ticket {
        Ticket { generation: 0, serial }
    }

    #[test]
    fn falls_and_lands_on_ground() {
        let mut arena = Arena::new();
        for _ in 0..120 {
            arena.step(STEP);
        }
        for body in arena.bodies() {
            assert!(body.grounded);
            assert_eq!(body.y, GROUND_Y - FIGHTER_HEIGHT / 2.0);
            assert_eq!(body.vy, 0.0);
        }
    }

    #[test]
    fn gravity_increases_vy() {
        let b = apply_gravity(&Body::at(100.0, 100.0), 0.5);
        assert_eq!(b.vy, 450.0);
    }

    #[test]
    fn jump_leaves_ground() {
        let mut arena = Arena::new();
        for _ in 0..120 {
            arena.step(STEP);
        }
        arena.set_velocity_y(Side::Player, -600.0);
        arena.step(STEP);
        let body = arena.body(Side::Player);
        assert!(!body.grounded);
        assert!(body.y < GROUND_Y - FIGHTER_HEIGHT / 2.0);
    }

    #[test]
    fn clamps_to_stage_edges() {
        let left = move_and_collide(&Body { vx: -10_000.0, ..Body::at(60.0, 300.0) }, 1.0);
        assert_eq!(left.x, FIGHTER_WIDTH / 2.0);
        assert_eq!(left.vx, 0.0);
        let right = move_and_collide(&Body { vx: 10_000.0, ..Body::at(1200.0, 300.0) }, 1.0);
        assert_eq!(right.x, STAGE_WIDTH - FIGHTER_WIDTH / 2.0);
        let top = move_and_collide(&Body { vy: -10_000.0, ..Body::at(600.0, 300.0) }, 1.0);
        assert_eq!(top.y, FIGHTER_HEIGHT / 2.0);
    }

    #[test]
    fn inactive_hitbox_never_overlaps() {
        let mut arena = Arena::new();
        arena.reset([Vec2 { x: 400.0, y: 500.0 }, Vec2 { x: 470.0, y: 500.0 }]);
        let rect = Rect::centred(475.0, 500.0, HITBOX_WIDTH, HITBOX_HEIGHT);
        arena.move_hitbox(Side::Player, rect);
        assert_eq!(arena.overlaps(), [false, false]);
        arena.set_hitbox_active(Side::Player, true);
        assert_eq!(arena.overlaps(), [true, false]);
        arena.set_hitbox_active(Side::Player, false);
        assert_eq!(arena.overlaps(), [false, false]);
    }

    #[test]
    fn replaced_clip_never_completes() {
        let mut clips = ClipPlayer::new();
        clips.play(Side::Player, Some(ticket(1)), Some(100.0));
        clips.play(Side::Player, Some(ticket(2)), Some(300.0));
        assert!(clips.advance(200.0).is_empty());
        assert_eq!(clips.advance(100.0), vec![ticket(2)]);
        assert_eq!(clips.active(), 0);
    }

    #[test]
    fn looping_clip_clears_sprite_slot() {
        let mut clips = ClipPlayer::new();
        clips.play(Side::Opponent, Some(ticket(1)), Some(100.0));
        clips.play(Side::Opponent, None, None);
        assert!(clips.advance(1000.0).is_empty());
    }

    #[test]
    fn effect_reports_once_then_waits_for_despawn() {
        let mut clips = ClipPlayer::new();
        clips.spawn_effect(ticket(5), 400.0);
        assert!(clips.advance(399.0).is_empty());
        assert_eq!(clips.advance(1.0), vec![ticket(5)]);
        assert!(clips.advance(1000.0).is_empty());
        assert_eq!(clips.active(), 1);
        clips.despawn_effect(ticket(5));
        assert_eq!(clips.active(), 0);
    }
}
