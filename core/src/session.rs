//! One match between the player and the opponent.
//!
//! [`MatchSession`] is driven entirely from outside: the engine reports each
//! display frame with [`MatchSession::frame`], reports finished clips with
//! [`MatchSession::animation_complete`], and drains the queued [`Command`]s
//! afterwards. The session itself never blocks, never fails and never reads a
//! clock; all time comes from the reported frame deltas.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::combat::{resolve_hit, Combo};
use crate::command::{Command, Cue};
use crate::constants::*;
use crate::content::{Clip, Content, EffectKind};
use crate::fighter::{Control, Fighter};
use crate::init::{create_fighters, spawn_bodies, spawn_points};
use crate::policy::{act, decide};
use crate::prng;
use crate::schedule::{Ticket, TimedEvent, Timeline};
use crate::types::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    /// Indexed by `Side::index`.
    pub hits_landed: [u32; 2],
    pub best_combo: u32,
}

/// Serializable view of the whole match, for debugging and bindings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub frame: u64,
    pub generation: u32,
    pub now_ms: f64,
    pub phase: Phase,
    pub winner: Option<Side>,
    pub fighters: [Fighter; 2],
    pub bodies: [Body; 2],
    pub combo: Combo,
    pub stats: MatchStats,
}

pub struct MatchSession {
    config: MatchConfig,
    content: Content,
    fighters: [Fighter; 2],
    bodies: [Body; 2],
    phase: Phase,
    winner: Option<Side>,
    combo: Combo,
    timeline: Timeline,
    rng_state: u32,
    prev_buttons: u8,
    /// Looping clip last sent per side; `None` after a one-shot clip.
    shown: [Option<Clip>; 2],
    health_shown: Option<[f64; 2]>,
    live_effects: Vec<Ticket>,
    frame: u64,
    stats: MatchStats,
    outbox: Vec<Command>,
}

impl MatchSession {
    pub fn new(config: MatchConfig, content: Content) -> Self {
        let fighters = create_fighters(&config, &content);
        let mut session = MatchSession {
            combo: Combo::new(config.combo_window_ms),
            rng_state: config.seed,
            config,
            content,
            fighters,
            bodies: spawn_bodies(),
            phase: Phase::Fight,
            winner: None,
            timeline: Timeline::new(),
            prev_buttons: NO_BUTTONS,
            shown: [None; 2],
            health_shown: None,
            live_effects: Vec::new(),
            frame: 0,
            stats: MatchStats::default(),
            outbox: Vec::new(),
        };
        session.begin();
        session
    }

    fn begin(&mut self) {
        self.timeline
            .every(self.config.think_interval_ms, TimedEvent::OpponentThink);
        self.outbox.push(Command::ResetStage {
            background: self.content.background(self.config.background).to_string(),
            spawns: spawn_points(),
        });
        self.outbox.push(Command::PlaySound {
            cue: Cue::Theme,
            volume: THEME_VOLUME,
            looping: true,
        });
        for side in Side::BOTH {
            self.outbox.push(Command::Flip {
                side,
                facing_right: self.fighters[side.index()].facing_right,
            });
            self.show_clip(side, Clip::Idle);
        }
        self.push_health_bars();
    }

    // ── Engine entry points ─────────────────────────────────

    /// Process one display frame.
    pub fn frame(&mut self, report: &FrameReport) {
        self.frame += 1;
        self.bodies = report.bodies;

        for event in self.timeline.advance(report.dt_ms) {
            self.on_event(event);
        }

        if self.phase == Phase::Fight {
            for side in Side::BOTH {
                self.update_fighter(side, report.buttons);
            }
            for side in Side::BOTH {
                if report.overlaps[side.index()] {
                    self.land_hit(side);
                }
            }
            if self.combo.decay(report.dt_ms) {
                self.outbox.push(Command::HideCombo);
            }
            self.push_health_bars();
            self.check_knockout();
        }

        self.prev_buttons = report.buttons;
    }

    /// A clip, effect or hit animation issued with `ticket` finished playing.
    pub fn animation_complete(&mut self, ticket: Ticket) {
        if !self.timeline.is_current(ticket) {
            trace!(?ticket, "stale animation ticket ignored");
            return;
        }
        for side in Side::BOTH {
            let fighter = &mut self.fighters[side.index()];
            if fighter.finish_attack(ticket) {
                self.outbox.push(Command::DeactivateHitbox { side });
                return;
            }
            if fighter.end_stagger(ticket) {
                return;
            }
        }
        if let Some(pos) = self.live_effects.iter().position(|t| *t == ticket) {
            self.live_effects.swap_remove(pos);
            self.outbox.push(Command::DespawnEffect { ticket });
            return;
        }
        trace!(?ticket, "animation ticket no longer tracked");
    }

    /// Start a fresh match with the same characters. Allowed in any phase.
    pub fn restart(&mut self) {
        self.timeline.reset();
        self.fighters = create_fighters(&self.config, &self.content);
        self.bodies = spawn_bodies();
        self.phase = Phase::Fight;
        self.winner = None;
        self.combo.reset();
        self.live_effects.clear();
        self.shown = [None; 2];
        self.health_shown = None;
        self.stats = MatchStats::default();
        self.outbox.clear();
        self.begin();
        debug!(generation = self.timeline.generation(), "match restarted");
    }

    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    // ── Queries ─────────────────────────────────────────────

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    pub fn health_ratio(&self, side: Side) -> f64 {
        self.fighters[side.index()].health_ratio()
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }

    /// Active hitbox of `side` at its last reported position.
    pub fn hitbox(&self, side: Side) -> Option<Rect> {
        self.fighters[side.index()].active_hitbox(&self.bodies[side.index()])
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn generation(&self) -> u32 {
        self.timeline.generation()
    }

    pub fn now_ms(&self) -> f64 {
        self.timeline.now_ms()
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            generation: self.timeline.generation(),
            now_ms: self.timeline.now_ms(),
            phase: self.phase,
            winner: self.winner,
            fighters: self.fighters.clone(),
            bodies: self.bodies,
            combo: self.combo,
            stats: self.stats,
        }
    }

    // ── Timed events ────────────────────────────────────────

    fn on_event(&mut self, event: TimedEvent) {
        match event {
            TimedEvent::OpponentThink => {
                if self.phase == Phase::Fight {
                    self.opponent_think();
                }
            }
            TimedEvent::Unblock(side) => {
                self.fighters[side.index()].set_blocking(false);
            }
            TimedEvent::Victory => {
                if self.phase != Phase::Knockout {
                    return;
                }
                let winner = if self.fighters[Side::Player.index()].is_down() {
                    Side::Opponent
                } else {
                    Side::Player
                };
                self.phase = Phase::Victory;
                self.winner = Some(winner);
                self.outbox.push(Command::ShowVictory { winner });
                debug!(?winner, "victory");
            }
        }
    }

    fn opponent_think(&mut self) {
        let side = Side::Opponent;
        let player = self.bodies[Side::Player.index()];
        let body = self.bodies[side.index()];
        let distance = (player.x - body.x).abs();
        let roll = prng::roll(&mut self.rng_state);
        let decision = decide(distance, roll);
        trace!(distance, roll, ?decision, "opponent decision");

        let action = act(
            decision,
            &mut self.fighters[side.index()],
            &body,
            player.x,
            &mut self.timeline,
        );
        self.outbox.push(Command::SetVelocityX {
            side,
            vx: action.velocity_x,
        });
        if let Some(vy) = action.jump_velocity {
            self.jump(side, vy);
        }
        if let Some((kind, ticket)) = action.started {
            self.start_attack(side, kind, ticket);
        }
        if action.blocked {
            self.timeline
                .after(self.config.block_duration_ms, TimedEvent::Unblock(side));
        }
    }

    // ── Per-frame work ──────────────────────────────────────

    fn update_fighter(&mut self, side: Side, buttons: u8) {
        let i = side.index();
        let control = (side == Side::Player).then(|| Control::new(buttons, self.prev_buttons));
        let body = self.bodies[i];
        let motion = self.fighters[i].update(
            self.config.frame_step_ms,
            &body,
            control,
            &mut self.timeline,
        );

        if motion.facing_changed {
            self.outbox.push(Command::Flip {
                side,
                facing_right: self.fighters[i].facing_right,
            });
        }
        if let Some(vx) = motion.velocity_x {
            self.outbox.push(Command::SetVelocityX { side, vx });
        }
        if let Some(vy) = motion.jump_velocity {
            self.jump(side, vy);
        }
        if let Some((kind, ticket)) = motion.started {
            self.start_attack(side, kind, ticket);
        }
        if let Some(clip) = motion.clip {
            self.show_clip(side, clip);
        }
        if let Some(rect) = self.fighters[i].active_hitbox(&body) {
            self.outbox.push(Command::MoveHitbox { side, rect });
        }
    }

    fn jump(&mut self, side: Side, vy: f64) {
        let volume = match side {
            Side::Player => PLAYER_JUMP_VOLUME,
            Side::Opponent => OPPONENT_JUMP_VOLUME,
        };
        self.outbox.push(Command::SetVelocityY { side, vy });
        self.outbox.push(Command::sound(Cue::Jump, volume));
    }

    fn start_attack(&mut self, side: Side, kind: AttackKind, ticket: Ticket) {
        self.play_once(side, Clip::for_attack(kind), ticket);
        self.outbox.push(Command::ActivateHitbox { side });
        let cue = match kind {
            AttackKind::Basic => Cue::Hit,
            AttackKind::Special => Cue::Special,
        };
        self.outbox.push(Command::sound(cue, ATTACK_VOLUME));

        if kind == AttackKind::Special {
            let body = self.bodies[side.index()];
            let facing_right = self.fighters[side.index()].facing_right;
            let reach = if facing_right { SPECIAL_EFFECT_REACH } else { -SPECIAL_EFFECT_REACH };
            self.spawn_effect(
                EffectKind::Special,
                body.x + reach,
                body.y - SPECIAL_EFFECT_RISE,
                !facing_right,
            );
        }
    }

    fn land_hit(&mut self, attacker: Side) {
        let defender = attacker.other();
        let attacker_body = self.bodies[attacker.index()];
        let defender_body = self.bodies[defender.index()];
        let (first, second) = self.fighters.split_at_mut(1);
        let (att, def) = match attacker {
            Side::Player => (&mut first[0], &mut second[0]),
            Side::Opponent => (&mut second[0], &mut first[0]),
        };
        let Some(hit) = resolve_hit(att, &attacker_body, def, &defender_body) else {
            return;
        };
        debug!(
            ?attacker,
            kind = ?hit.kind,
            damage = hit.damage,
            health = def.health,
            "hit landed"
        );
        self.stats.hits_landed[attacker.index()] += 1;

        self.outbox.push(Command::DeactivateHitbox { side: attacker });
        if hit.interrupted.is_some() {
            self.outbox.push(Command::DeactivateHitbox { side: defender });
        }

        let ticket = self.timeline.issue();
        self.fighters[defender.index()].begin_stagger(ticket);
        self.play_once(defender, Clip::Hit, ticket);
        self.spawn_effect(
            EffectKind::Hit,
            defender_body.x,
            defender_body.y - HIT_EFFECT_RISE,
            false,
        );
        self.outbox.push(Command::SetVelocityX {
            side: defender,
            vx: hit.knockback.x,
        });
        self.outbox.push(Command::SetVelocityY {
            side: defender,
            vy: hit.knockback.y,
        });

        if attacker == Side::Player {
            let count = self.combo.register();
            self.stats.best_combo = self.stats.best_combo.max(count);
            if let Some(text) = self.combo.label() {
                self.outbox.push(Command::ShowCombo {
                    text,
                    scale: self.combo.scale(),
                });
            }
        }
    }

    fn check_knockout(&mut self) {
        if self.phase != Phase::Fight || !self.fighters.iter().any(Fighter::is_down) {
            return;
        }
        self.phase = Phase::Knockout;
        self.outbox.push(Command::sound(Cue::Ko, KO_VOLUME));
        self.outbox.push(Command::ShowKnockout);
        self.timeline
            .after(self.config.knockout_delay_ms, TimedEvent::Victory);
        debug!(
            player = self.fighters[0].health,
            opponent = self.fighters[1].health,
            "knockout"
        );
    }

    // ── Output helpers ──────────────────────────────────────

    /// Looping per-mode clip, sent only when it changes.
    fn show_clip(&mut self, side: Side, clip: Clip) {
        let i = side.index();
        if self.shown[i] == Some(clip) {
            return;
        }
        let entry = self.content.animations().clip(self.fighters[i].character, clip);
        let cmd = Command::PlayAnimation {
            side,
            id: entry.id.clone(),
            looping: entry.spec.looping,
            ticket: None,
        };
        self.outbox.push(cmd);
        self.shown[i] = Some(clip);
        self.fighters[i].cancel_stagger();
    }

    /// One-shot clip whose completion is reported back with `ticket`.
    fn play_once(&mut self, side: Side, clip: Clip, ticket: Ticket) {
        let i = side.index();
        let entry = self.content.animations().clip(self.fighters[i].character, clip);
        let cmd = Command::PlayAnimation {
            side,
            id: entry.id.clone(),
            looping: false,
            ticket: Some(ticket),
        };
        self.outbox.push(cmd);
        self.shown[i] = None;
        if clip != Clip::Hit {
            self.fighters[i].cancel_stagger();
        }
    }

    fn spawn_effect(&mut self, kind: EffectKind, x: f64, y: f64, flip_x: bool) {
        let ticket = self.timeline.issue();
        let id = self.content.animations().effect(kind).id.clone();
        self.live_effects.push(ticket);
        self.outbox.push(Command::SpawnEffect {
            ticket,
            kind,
            id,
            x,
            y,
            flip_x,
        });
    }

    fn push_health_bars(&mut self) {
        let ratios = [
            self.fighters[0].health_ratio(),
            self.fighters[1].health_ratio(),
        ];
        if self.health_shown == Some(ratios) {
            return;
        }
        self.health_shown = Some(ratios);
        self.outbox.push(Command::HealthBars {
            player: ratios[0],
            opponent: ratios[1],
        });
    }
}
