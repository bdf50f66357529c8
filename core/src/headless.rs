//! A session wired to the stand-in engine, stepped at a fixed frame time.

use crate::arena::{Arena, ClipPlayer};
use crate::command::Command;
use crate::content::Content;
use crate::session::MatchSession;
use crate::types::*;

pub struct Headless {
    session: MatchSession,
    arena: Arena,
    clips: ClipPlayer,
    step_ms: f64,
}

impl Headless {
    pub fn new(config: MatchConfig, content: Content) -> Self {
        let step_ms = config.frame_step_ms as f64;
        let mut headless = Headless {
            session: MatchSession::new(config, content),
            arena: Arena::new(),
            clips: ClipPlayer::new(),
            step_ms,
        };
        headless.apply_commands();
        headless
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// One frame: report, update, integrate, then deliver finished clips.
    pub fn step(&mut self, buttons: u8) {
        let report = FrameReport {
            dt_ms: self.step_ms,
            buttons,
            bodies: self.arena.bodies(),
            overlaps: self.arena.overlaps(),
        };
        self.session.frame(&report);
        self.apply_commands();

        self.arena.step(self.step_ms);
        for ticket in self.clips.advance(self.step_ms) {
            self.session.animation_complete(ticket);
        }
        self.apply_commands();
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.apply_commands();
    }

    fn apply_commands(&mut self) {
        for command in self.session.drain_commands() {
            match command {
                Command::ResetStage { spawns, .. } => {
                    self.arena.reset(spawns);
                    self.clips.clear();
                }
                Command::SetVelocityX { side, vx } => self.arena.set_velocity_x(side, vx),
                Command::SetVelocityY { side, vy } => self.arena.set_velocity_y(side, vy),
                Command::PlayAnimation { side, id, ticket, .. } => {
                    let duration = self
                        .session
                        .content()
                        .animations()
                        .spec_for(&id)
                        .and_then(|spec| spec.duration_ms());
                    self.clips.play(side, ticket, duration);
                }
                Command::MoveHitbox { side, rect } => self.arena.move_hitbox(side, rect),
                Command::ActivateHitbox { side } => self.arena.set_hitbox_active(side, true),
                Command::DeactivateHitbox { side } => self.arena.set_hitbox_active(side, false),
                Command::SpawnEffect { ticket, id, .. } => {
                    let duration = self
                        .session
                        .content()
                        .animations()
                        .spec_for(&id)
                        .and_then(|spec| spec.duration_ms())
                        .unwrap_or(0.0);
                    self.clips.spawn_effect(ticket, duration);
                }
                Command::DespawnEffect { ticket } => self.clips.despawn_effect(ticket),
                Command::Flip { .. }
                | Command::PlaySound { .. }
                | Command::ShowCombo { .. }
                | Command::HideCombo
                | Command::HealthBars { .. }
                | Command::ShowKnockout
                | Command::ShowVictory { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CharacterId;
    use crate::init::default_config;

    fn run(headless: &mut Headless, frames: usize, buttons: impl Fn(usize) -> u8) {
        for i in 0..frames {
            headless.step(buttons(i));
        }
    }

    #[test]
    fn fighters_settle_on_the_ground() {
        let mut h = Headless::new(default_config(1), Content::builtin());
        run(&mut h, 60, |_| NO_BUTTONS);
        assert!(h.arena().body(Side::Player).grounded);
        assert_eq!(h.session().fighter(Side::Player).mode, Mode::Idle);
    }

    #[test]
    fn attack_clip_completes_and_frees_the_player() {
        let mut h = Headless::new(default_config(1), Content::builtin());
        run(&mut h, 60, |_| NO_BUTTONS);
        h.step(button::ATTACK);
        assert!(h.session().fighter(Side::Player).is_attacking());
        // Attack clip: 4 frames at 12 fps.
        run(&mut h, 21, |_| NO_BUTTONS);
        assert!(!h.session().fighter(Side::Player).is_attacking());
    }

    #[test]
    fn walking_into_the_opponent_and_swinging_lands_hits() {
        let config = MatchConfig {
            opponent: CharacterId::NeoRazor,
            think_interval_ms: 1.0e9,
            ..default_config(3)
        };
        let mut h = Headless::new(config, Content::builtin());
        run(&mut h, 60, |_| NO_BUTTONS);
        // Walk right until the opponent is within reach.
        while h.arena().body(Side::Opponent).x - h.arena().body(Side::Player).x > 120.0 {
            h.step(button::RIGHT);
        }
        run(&mut h, 400, |i| if i % 40 == 0 { button::ATTACK } else { NO_BUTTONS });
        let stats = h.session().stats();
        assert!(stats.hits_landed[0] > 0);
        assert!(h.session().fighter(Side::Opponent).health < 100);
    }

    #[test]
    fn same_seed_same_match() {
        let play = || {
            let mut h = Headless::new(default_config(99), Content::builtin());
            run(&mut h, 1500, |i| match i % 90 {
                0 => button::ATTACK,
                30..=50 => button::RIGHT,
                60 => button::SPECIAL,
                _ => NO_BUTTONS,
            });
            h.session().snapshot()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn restart_resets_the_arena() {
        let mut h = Headless::new(default_config(5), Content::builtin());
        run(&mut h, 100, |_| button::RIGHT);
        h.restart();
        assert_eq!(h.arena().body(Side::Player).x, 300.0);
        assert_eq!(h.session().generation(), 1);
    }
}
