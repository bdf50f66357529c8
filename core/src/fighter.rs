//! Per-fighter state machine.
//!
//! A [`Fighter`] owns health, cooldowns, facing and the flags its mode is
//! derived from. The mode is never assigned directly; [`resolve_mode`]
//! recomputes it from the flags and the engine-reported body every frame.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::content::{CharacterId, CharacterTemplate, Clip};
use crate::schedule::{Ticket, Timeline};
use crate::types::*;

/// The attack currently in flight. One attack instance lands at most once.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveAttack {
    pub kind: AttackKind,
    pub ticket: Ticket,
    pub landed: bool,
}

/// Player device state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Control {
    pub held: u8,
    /// Buttons that went down this frame.
    pub pressed: u8,
}

impl Control {
    pub fn new(held: u8, prev_held: u8) -> Self {
        Control {
            held,
            pressed: held & !prev_held,
        }
    }

    fn holds(&self, b: u8) -> bool {
        self.held & b != 0
    }

    fn tapped(&self, b: u8) -> bool {
        self.pressed & b != 0
    }
}

/// What one frame of the state machine asks the engine to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub mode: Mode,
    /// Clip for the per-frame animation; `None` while an attack or hit clip owns the sprite.
    pub clip: Option<Clip>,
    pub velocity_x: Option<f64>,
    pub jump_velocity: Option<f64>,
    pub facing_changed: bool,
    pub started: Option<(AttackKind, Ticket)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModeInputs {
    pub attacking: bool,
    pub blocking: bool,
    pub staggered: bool,
    pub grounded: bool,
    pub moving: bool,
}

/// Priority: Attacking > Blocking > Hit > Jumping > Moving > Idle.
pub fn resolve_mode(i: ModeInputs) -> Mode {
    if i.attacking {
        Mode::Attacking
    } else if i.blocking {
        Mode::Blocking
    } else if i.staggered {
        Mode::Hit
    } else if !i.grounded {
        Mode::Jumping
    } else if i.moving {
        Mode::Moving
    } else {
        Mode::Idle
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub side: Side,
    pub character: CharacterId,
    pub name: String,
    pub max_health: i32,
    pub health: i32,
    pub speed: f64,
    pub jump_power: f64,
    pub attacks: AttackSet,
    pub facing_right: bool,
    pub mode: Mode,
    pub attack_cooldown: u32,
    pub special_cooldown: u32,
    /// Fixed at creation: driven by the input device rather than the policy.
    pub controlled: bool,
    pub blocking: bool,
    pub attack: Option<ActiveAttack>,
    /// Hit clip in progress.
    pub stagger: Option<Ticket>,
}

impl Fighter {
    pub fn from_template(side: Side, template: &CharacterTemplate) -> Self {
        let controlled = side == Side::Player;
        Fighter {
            side,
            character: template.id,
            name: template.name.clone(),
            max_health: template.health,
            health: template.health,
            speed: template.speed,
            jump_power: template.jump_power,
            attacks: template.attacks,
            facing_right: controlled,
            mode: Mode::Idle,
            attack_cooldown: 0,
            special_cooldown: 0,
            controlled,
            blocking: false,
            attack: None,
            stagger: None,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn is_down(&self) -> bool {
        self.health <= 0
    }

    pub fn health_ratio(&self) -> f64 {
        self.health as f64 / self.max_health as f64
    }

    pub fn cooldown(&self, kind: AttackKind) -> u32 {
        match kind {
            AttackKind::Basic => self.attack_cooldown,
            AttackKind::Special => self.special_cooldown,
        }
    }

    pub fn tick_cooldowns(&mut self, step_ms: u32) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(step_ms);
        self.special_cooldown = self.special_cooldown.saturating_sub(step_ms);
    }

    pub fn can_attack(&self, kind: AttackKind) -> bool {
        !self.is_attacking() && !self.blocking && self.cooldown(kind) == 0
    }

    /// Start an attack if allowed; a refused request is dropped silently.
    pub fn try_attack(&mut self, kind: AttackKind, timeline: &mut Timeline) -> Option<Ticket> {
        if !self.can_attack(kind) {
            tracing::trace!(side = ?self.side, ?kind, "attack request dropped");
            return None;
        }
        let ticket = timeline.issue();
        let cooldown = self.attacks.get(kind).cooldown_ms;
        match kind {
            AttackKind::Basic => self.attack_cooldown = cooldown,
            AttackKind::Special => self.special_cooldown = cooldown,
        }
        self.attack = Some(ActiveAttack {
            kind,
            ticket,
            landed: false,
        });
        self.mode = Mode::Attacking;
        Some(ticket)
    }

    /// Attack clip finished playing. Returns false for a ticket that is not the current attack.
    pub fn finish_attack(&mut self, ticket: Ticket) -> bool {
        match self.attack {
            Some(a) if a.ticket == ticket => {
                self.attack = None;
                true
            }
            _ => false,
        }
    }

    pub fn interrupt_attack(&mut self) -> Option<ActiveAttack> {
        self.attack.take()
    }

    /// Returns whether the fighter is blocking afterwards.
    pub fn set_blocking(&mut self, want: bool) -> bool {
        if want && self.is_attacking() {
            tracing::trace!(side = ?self.side, "block ignored while attacking");
        } else {
            self.blocking = want;
        }
        self.blocking
    }

    /// Subtract damage, keeping health within [0, max]. Returns the health lost.
    pub fn take_hit(&mut self, damage: i32) -> i32 {
        let before = self.health;
        self.health = self.health.saturating_sub(damage).clamp(0, self.max_health);
        before - self.health
    }

    pub fn begin_stagger(&mut self, ticket: Ticket) {
        self.stagger = Some(ticket);
    }

    pub fn end_stagger(&mut self, ticket: Ticket) -> bool {
        if self.stagger == Some(ticket) {
            self.stagger = None;
            true
        } else {
            false
        }
    }

    /// Another clip replaced the hit clip, so its completion will never arrive.
    pub fn cancel_stagger(&mut self) {
        self.stagger = None;
    }

    /// Hitbox region in front of the fighter, whether or not it is active.
    pub fn hitbox(&self, body: &Body) -> Rect {
        let dir = if self.facing_right { 1.0 } else { -1.0 };
        Rect::centred(body.x + dir * HITBOX_OFFSET_X, body.y, HITBOX_WIDTH, HITBOX_HEIGHT)
    }

    pub fn active_hitbox(&self, body: &Body) -> Option<Rect> {
        self.attack.filter(|a| !a.landed).map(|_| self.hitbox(body))
    }

    fn face(&mut self, vx: f64) -> bool {
        let right = if vx > 0.0 {
            true
        } else if vx < 0.0 {
            false
        } else {
            return false;
        };
        let changed = right != self.facing_right;
        self.facing_right = right;
        changed
    }

    /// Advance one frame.
    ///
    /// `control` is `Some` only for the player-controlled fighter; the other
    /// fighter's velocity belongs to the opponent policy and is left alone.
    pub fn update(
        &mut self,
        step_ms: u32,
        body: &Body,
        control: Option<Control>,
        timeline: &mut Timeline,
    ) -> Motion {
        self.tick_cooldowns(step_ms);

        let mut started = None;
        let mut velocity_x = None;
        let mut jump_velocity = None;
        let mut held_direction = false;

        if let Some(control) = control.filter(|_| self.controlled) {
            for kind in [AttackKind::Basic, AttackKind::Special] {
                let b = match kind {
                    AttackKind::Basic => button::ATTACK,
                    AttackKind::Special => button::SPECIAL,
                };
                if started.is_none() && control.tapped(b) {
                    started = self.try_attack(kind, timeline).map(|t| (kind, t));
                }
            }
            self.set_blocking(control.holds(button::BLOCK));

            let mut vx = 0.0;
            if !self.is_attacking() && !self.blocking {
                if control.holds(button::LEFT) {
                    vx = -self.speed;
                } else if control.holds(button::RIGHT) {
                    vx = self.speed;
                }
                if control.holds(button::JUMP) && body.grounded {
                    jump_velocity = Some(-self.jump_power);
                }
            }
            held_direction = control.holds(button::LEFT | button::RIGHT);
            velocity_x = Some(vx);
        }

        let effective_vx = velocity_x.unwrap_or(body.vx);
        let facing_changed = self.face(effective_vx);

        self.mode = resolve_mode(ModeInputs {
            attacking: self.is_attacking(),
            blocking: self.blocking,
            staggered: self.stagger.is_some(),
            grounded: body.grounded,
            moving: effective_vx != 0.0 || held_direction,
        });

        Motion {
            mode: self.mode,
            clip: Clip::for_mode(self.mode),
            velocity_x,
            jump_velocity,
            facing_changed,
            started,
        }
    }
}
