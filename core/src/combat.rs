use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::fighter::{ActiveAttack, Fighter};
use crate::types::*;

/// Result of one attack connecting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitOutcome {
    pub kind: AttackKind,
    /// Health actually removed from the defender.
    pub damage: i32,
    pub knockback: Vec2,
    /// The defender's own attack, cut short by the hit.
    pub interrupted: Option<ActiveAttack>,
}

/// Horizontal push away from the attacker plus a fixed lift.
pub fn knockback(kind: AttackKind, attacker: &Body, defender: &Body, attacker_facing_right: bool) -> Vec2 {
    let away = if defender.x > attacker.x {
        1.0
    } else if defender.x < attacker.x {
        -1.0
    } else if attacker_facing_right {
        1.0
    } else {
        -1.0
    };
    let strength = match kind {
        AttackKind::Basic => KNOCKBACK_BASIC,
        AttackKind::Special => KNOCKBACK_SPECIAL,
    };
    Vec2 {
        x: away * strength,
        y: KNOCKBACK_LIFT,
    }
}

/// Apply the attacker's in-flight attack to the defender.
///
/// Returns `None` when nothing connects: no attack in flight, the attack has
/// already landed, or the defender is blocking.
pub fn resolve_hit(
    attacker: &mut Fighter,
    attacker_body: &Body,
    defender: &mut Fighter,
    defender_body: &Body,
) -> Option<HitOutcome> {
    let attack = attacker.attack.as_mut().filter(|a| !a.landed)?;
    if defender.blocking {
        return None;
    }
    attack.landed = true;
    let kind = attack.kind;

    let damage = defender.take_hit(attacker.attacks.get(kind).damage);
    let interrupted = defender.interrupt_attack();
    Some(HitOutcome {
        kind,
        damage,
        knockback: knockback(kind, attacker_body, defender_body, attacker.facing_right),
        interrupted,
    })
}

/// Consecutive player hits inside a rolling window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub count: u32,
    pub remaining_ms: f64,
    window_ms: f64,
}

impl Combo {
    pub fn new(window_ms: f64) -> Self {
        Combo {
            count: 0,
            remaining_ms: 0.0,
            window_ms,
        }
    }

    pub fn register(&mut self) -> u32 {
        self.count += 1;
        self.remaining_ms = self.window_ms;
        self.count
    }

    /// Count the window down. Returns true on the frame the combo drops.
    pub fn decay(&mut self, dt_ms: f64) -> bool {
        if self.count == 0 {
            return false;
        }
        self.remaining_ms -= dt_ms.max(0.0);
        if self.remaining_ms <= 0.0 {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.remaining_ms = 0.0;
    }

    /// Banner text; a single hit is not a combo.
    pub fn label(&self) -> Option<String> {
        (self.count > 1).then(|| format!("{} HIT COMBO!", self.count))
    }

    pub fn scale(&self) -> f64 {
        1.0 + self.count as f64 * COMBO_SCALE_PER_HIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CharacterId, Content};
    use crate::schedule::Timeline;

    fn pair() -> (Fighter, Fighter) {
        let content = Content::builtin();
        (
            Fighter::from_template(Side::Player, content.template(CharacterId::NeoRazor)),
            Fighter::from_template(Side::Opponent, content.template(CharacterId::NeoRazor)),
        )
    }

    #[test]
    fn basic_hit_deals_damage_and_pushes_away() {
        let mut t = Timeline::new();
        let (mut a, mut d) = pair();
        let (ab, db) = (Body::at(300.0, 500.0), Body::at(360.0, 500.0));
        a.try_attack(AttackKind::Basic, &mut t).unwrap();

        let hit = resolve_hit(&mut a, &ab, &mut d, &db).unwrap();
        assert_eq!(hit.kind, AttackKind::Basic);
        assert_eq!(hit.damage, 5);
        assert_eq!(d.health, 95);
        assert_eq!(hit.knockback, Vec2 { x: 200.0, y: -200.0 });
        assert!(hit.interrupted.is_none());
    }

    #[test]
    fn attack_lands_once() {
        let mut t = Timeline::new();
        let (mut a, mut d) = pair();
        let (ab, db) = (Body::at(300.0, 500.0), Body::at(360.0, 500.0));
        a.try_attack(AttackKind::Basic, &mut t).unwrap();
        assert!(resolve_hit(&mut a, &ab, &mut d, &db).is_some());
        assert!(resolve_hit(&mut a, &ab, &mut d, &db).is_none());
        assert_eq!(d.health, 95);
    }

    #[test]
    fn blocked_attack_does_nothing() {
        let mut t = Timeline::new();
        let (mut a, mut d) = pair();
        let (ab, db) = (Body::at(300.0, 500.0), Body::at(360.0, 500.0));
        a.try_attack(AttackKind::Special, &mut t).unwrap();
        d.set_blocking(true);
        assert!(resolve_hit(&mut a, &ab, &mut d, &db).is_none());
        assert_eq!(d.health, 100);
        assert!(!a.attack.unwrap().landed);
    }

    #[test]
    fn special_uses_in_flight_kind_even_with_basic_cooldown() {
        let mut t = Timeline::new();
        let (mut a, mut d) = pair();
        let (ab, db) = (Body::at(500.0, 500.0), Body::at(440.0, 500.0));
        let basic = a.try_attack(AttackKind::Basic, &mut t).unwrap();
        a.finish_attack(basic);
        a.try_attack(AttackKind::Special, &mut t).unwrap();
        assert!(a.attack_cooldown > 0);

        let hit = resolve_hit(&mut a, &ab, &mut d, &db).unwrap();
        assert_eq!(hit.kind, AttackKind::Special);
        assert_eq!(hit.damage, 20);
        assert_eq!(hit.knockback.x, -400.0);
    }

    #[test]
    fn hit_interrupts_defender_attack() {
        let mut t = Timeline::new();
        let (mut a, mut d) = pair();
        let (ab, db) = (Body::at(300.0, 500.0), Body::at(360.0, 500.0));
        a.try_attack(AttackKind::Basic, &mut t).unwrap();
        d.try_attack(AttackKind::Basic, &mut t).unwrap();
        let hit = resolve_hit(&mut a, &ab, &mut d, &db).unwrap();
        assert!(hit.interrupted.is_some());
        assert!(!d.is_attacking());
    }

    #[test]
    fn knockback_uses_facing_when_stacked() {
        let body = Body::at(400.0, 500.0);
        assert_eq!(knockback(AttackKind::Basic, &body, &body, false).x, -200.0);
        assert_eq!(knockback(AttackKind::Special, &body, &body, true).x, 400.0);
    }

    #[test]
    fn combo_counts_and_expires() {
        let mut combo = Combo::new(COMBO_WINDOW_MS);
        assert_eq!(combo.register(), 1);
        assert_eq!(combo.label(), None);
        assert!(!combo.decay(1000.0));
        combo.register();
        assert!(!combo.decay(1999.0));
        assert_eq!(combo.register(), 3);
        assert_eq!(combo.label().as_deref(), Some("3 HIT COMBO!"));
        assert!((combo.scale() - 1.15).abs() < 1e-9);

        assert!(!combo.decay(1999.0));
        assert!(combo.decay(1.0));
        assert_eq!(combo.count, 0);
        assert!(!combo.decay(100.0));
        assert_eq!(combo.count, 0);
    }
}
