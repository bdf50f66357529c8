//! Engine-facing commands.
//!
//! The session never touches the engine directly. Every side effect is queued
//! as a [`Command`] and drained by the caller once per frame, in order.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationId;
use crate::content::EffectKind;
use crate::schedule::Ticket;
use crate::types::{Rect, Side, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Theme,
    Hit,
    Special,
    Jump,
    Ko,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Place both bodies at their spawns and clear sprites, effects and overlays.
    ResetStage {
        background: String,
        spawns: [Vec2; 2],
    },
    SetVelocityX {
        side: Side,
        vx: f64,
    },
    SetVelocityY {
        side: Side,
        vy: f64,
    },
    /// Sprite is mirrored when `facing_right` is false.
    Flip {
        side: Side,
        facing_right: bool,
    },
    /// A clip with a ticket must be reported back through `animation_complete`.
    PlayAnimation {
        side: Side,
        id: AnimationId,
        looping: bool,
        ticket: Option<Ticket>,
    },
    MoveHitbox {
        side: Side,
        rect: Rect,
    },
    ActivateHitbox {
        side: Side,
    },
    DeactivateHitbox {
        side: Side,
    },
    PlaySound {
        cue: Cue,
        volume: f64,
        looping: bool,
    },
    SpawnEffect {
        ticket: Ticket,
        kind: EffectKind,
        id: AnimationId,
        x: f64,
        y: f64,
        flip_x: bool,
    },
    DespawnEffect {
        ticket: Ticket,
    },
    ShowCombo {
        text: String,
        scale: f64,
    },
    HideCombo,
    /// Remaining health as a fraction of maximum, per side.
    HealthBars {
        player: f64,
        opponent: f64,
    },
    ShowKnockout,
    /// Winner banner plus the restart control.
    ShowVictory {
        winner: Side,
    },
}

impl Command {
    pub fn sound(cue: Cue, volume: f64) -> Self {
        Command::PlaySound {
            cue,
            volume,
            looping: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_tagged_for_the_engine() {
        let json = serde_json::to_value(Command::Flip {
            side: Side::Opponent,
            facing_right: false,
        })
        .unwrap();
        assert_eq!(json["type"], "flip");
        assert_eq!(json["side"], "opponent");
        assert_eq!(json["facingRight"], false);

        let json = serde_json::to_value(Command::sound(Cue::Ko, 1.0)).unwrap();
        assert_eq!(json["type"], "playSound");
        assert_eq!(json["cue"], "ko");
        assert_eq!(json["looping"], false);

        let json = serde_json::to_value(Command::HideCombo).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "hideCombo" }));
    }

    #[test]
    fn effect_command_carries_ticket() {
        let cmd = Command::SpawnEffect {
            ticket: Ticket { generation: 2, serial: 9 },
            kind: EffectKind::Hit,
            id: AnimationId("hit-effect".into()),
            x: 10.0,
            y: 20.0,
            flip_x: true,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""flipX":true"#));
        assert!(json.contains(r#""ticket":{"generation":2,"serial":9}"#));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
