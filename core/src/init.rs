use crate::constants::*;
use crate::content::Content;
use crate::fighter::Fighter;
use crate::types::*;

/// Spawn positions, indexed by `Side::index`.
pub fn spawn_points() -> [Vec2; 2] {
    [
        Vec2 { x: PLAYER_SPAWN_X, y: SPAWN_Y },
        Vec2 { x: OPPONENT_SPAWN_X, y: SPAWN_Y },
    ]
}

/// Bodies at rest on their spawns, before the first physics step.
pub fn spawn_bodies() -> [Body; 2] {
    spawn_points().map(|p| Body::at(p.x, p.y))
}

/// Fresh fighters for both sides from their templates.
pub fn create_fighters(config: &MatchConfig, content: &Content) -> [Fighter; 2] {
    [
        Fighter::from_template(Side::Player, content.template(config.player)),
        Fighter::from_template(Side::Opponent, content.template(config.opponent)),
    ]
}

/// Default match config for a seed.
pub fn default_config(seed: u32) -> MatchConfig {
    MatchConfig {
        seed,
        ..MatchConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CharacterId;

    #[test]
    fn fighters_start_full_and_facing_each_other() {
        let config = default_config(42);
        let [p, o] = create_fighters(&config, &Content::builtin());
        assert_eq!(p.side, Side::Player);
        assert_eq!(p.character, CharacterId::NeoRazor);
        assert_eq!(p.health, 100);
        assert!(p.facing_right);

        assert_eq!(o.side, Side::Opponent);
        assert_eq!(o.character, CharacterId::VoxSlasher);
        assert_eq!(o.health, 120);
        assert!(!o.facing_right);
    }

    #[test]
    fn spawns_inside_stage() {
        let bodies = spawn_bodies();
        assert_eq!(bodies[0].x, 300.0);
        assert_eq!(bodies[1].x, 980.0);
        for b in bodies {
            let r = b.rect();
            assert!(r.x >= 0.0 && r.x + r.width <= STAGE_WIDTH);
            assert!(r.y + r.height <= GROUND_Y);
            assert!(!b.grounded);
        }
    }
}
