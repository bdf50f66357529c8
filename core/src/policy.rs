//! Opponent decision policy.
//!
//! [`decide`] is the pure decision table over (distance, roll); [`act`]
//! carries a decision out on the opponent, checking its preconditions.
//! A decision whose precondition fails is spent without effect.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::fighter::Fighter;
use crate::schedule::{Ticket, Timeline};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    Approach,
    Jump,
    BasicAttack,
    SpecialAttack,
    Block,
    Retreat,
}

/// Decision bands, first match wins. `roll` is uniform in [0, 1).
pub fn decide(distance: f64, roll: f64) -> Decision {
    if distance > FAR_DISTANCE {
        Decision::Approach
    } else if distance > NEAR_DISTANCE {
        if roll < 0.6 {
            Decision::Approach
        } else if roll < 0.8 {
            Decision::Jump
        } else {
            Decision::BasicAttack
        }
    } else if roll < 0.5 {
        Decision::BasicAttack
    } else if roll < 0.7 {
        Decision::SpecialAttack
    } else if roll < 0.9 {
        Decision::Block
    } else {
        Decision::Retreat
    }
}

/// Engine-facing effect of one decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Action {
    pub velocity_x: f64,
    pub jump_velocity: Option<f64>,
    pub started: Option<(AttackKind, Ticket)>,
    pub blocked: bool,
}

/// Carry out `decision`. The opponent always stops first, then acts.
pub fn act(
    decision: Decision,
    fighter: &mut Fighter,
    body: &Body,
    target_x: f64,
    timeline: &mut Timeline,
) -> Action {
    let toward = if target_x > body.x { 1.0 } else { -1.0 };
    let mut action = Action {
        velocity_x: 0.0,
        jump_velocity: None,
        started: None,
        blocked: false,
    };
    match decision {
        Decision::Approach => action.velocity_x = toward * fighter.speed,
        Decision::Retreat => action.velocity_x = -toward * fighter.speed,
        Decision::Jump => {
            if body.grounded {
                action.jump_velocity = Some(-fighter.jump_power);
            }
        }
        Decision::BasicAttack => {
            action.started = fighter
                .try_attack(AttackKind::Basic, timeline)
                .map(|t| (AttackKind::Basic, t));
        }
        Decision::SpecialAttack => {
            action.started = fighter
                .try_attack(AttackKind::Special, timeline)
                .map(|t| (AttackKind::Special, t));
        }
        Decision::Block => {
            action.blocked = !fighter.blocking && fighter.set_blocking(true);
        }
    }
    action
}
