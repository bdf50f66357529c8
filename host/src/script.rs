//! Scripted stand-ins for the player's input device.

use clap::ValueEnum;
use neokult_core::{button, AttackKind, Headless, Side, NO_BUTTONS};

/// Horizontal gap at which the scripts stop walking and start swinging.
const REACH: f64 = 110.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Script {
    /// Never touches the controls.
    Idle,
    /// Walks in and swings, using the special whenever it is ready.
    Aggressive,
    /// Holds block and pokes when the opponent is close.
    Turtle,
}

impl Script {
    /// Held buttons for frame `frame` given the current match.
    pub fn buttons(self, frame: u64, headless: &Headless) -> u8 {
        let me = headless.arena().body(Side::Player);
        let them = headless.arena().body(Side::Opponent);
        let gap = them.x - me.x;
        let toward = if gap > 0.0 { button::RIGHT } else { button::LEFT };
        let fighter = headless.session().fighter(Side::Player);

        match self {
            Script::Idle => NO_BUTTONS,
            Script::Aggressive => {
                if gap.abs() > REACH {
                    toward
                } else if frame % 2 == 1 || fighter.is_attacking() {
                    // Release so the next press is a fresh edge.
                    NO_BUTTONS
                } else if fighter.cooldown(AttackKind::Special) == 0 {
                    button::SPECIAL
                } else {
                    button::ATTACK
                }
            }
            Script::Turtle => {
                if gap.abs() <= REACH && frame % 45 == 0 {
                    button::ATTACK
                } else if frame % 45 == 1 {
                    NO_BUTTONS
                } else {
                    button::BLOCK
                }
            }
        }
    }
}
