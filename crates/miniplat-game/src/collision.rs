//! Per-tick collision detection and resolution.
//!
//! Every check is a brute-force AABB test against the player. The checks run
//! in a fixed order (platforms, enemies, collectibles, obstacles,
//! projectiles) and each has its own resolution policy.

use rand::Rng;
use rand::rngs::StdRng;

use miniplat_core::audio::{AudioCue, AudioCueQueue};
use miniplat_core::events;
use miniplat_core::geometry::Aabb;
use miniplat_core::time::Millis;

use crate::config::GameConfig;
use crate::enemies::Enemy;
use crate::level::{Collectible, CollectibleKind, Component, Level};
use crate::player::Player;
use crate::powerups::PowerUpKind;
use crate::projectile::Projectile;
use crate::scoring::Score;

/// What a defeated enemy may leave behind, drawn uniformly.
const DROP_TABLE: [CollectibleKind; 6] = [
    CollectibleKind::PowerUp(PowerUpKind::Weapon),
    CollectibleKind::PowerUp(PowerUpKind::Shield),
    CollectibleKind::PowerUp(PowerUpKind::DoubleJump),
    CollectibleKind::PowerUp(PowerUpKind::SpeedBoost),
    CollectibleKind::PowerUp(PowerUpKind::Invincibility),
    CollectibleKind::Coin,
];

/// Shared inputs and side-effect sinks for one collision pass.
pub struct CollisionContext<'a> {
    pub now: Millis,
    pub cfg: &'a GameConfig,
    pub rng: &'a mut StdRng,
    pub cues: &'a mut AudioCueQueue,
}

/// How an overlapping enemy was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    Stomped,
    Slashed,
    HurtPlayer,
    /// Overlap while invincible: nothing happens.
    Ignored,
}

/// Summary of one full collision pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub landed: bool,
    pub enemy_contacts: Vec<EnemyContact>,
    pub drops: usize,
    pub collected: Vec<CollectibleKind>,
    pub obstacle_hits: usize,
    pub projectile_hits: usize,
}

/// Land the player on any platform they dropped onto this tick.
///
/// A platform counts as landed on when the player overlaps it, the player's
/// bottom edge one step ago (`bottom - vy`) was no more than `tolerance`
/// below the platform top, and the player is not rising. A grounded player
/// that lands on nothing loses `on_ground` at once, so walking off a ledge
/// falls immediately. Returns whether the player landed anywhere.
pub fn resolve_platforms(player: &mut Player, platforms: &[Aabb], tolerance: f64) -> bool {
    let mut landed = false;
    for platform in platforms {
        if !player.body.aabb().intersects(platform) {
            continue;
        }
        let prev_bottom = player.body.bottom() - player.body.vy;
        if prev_bottom <= platform.top() + tolerance && player.body.vy >= 0.0 {
            player.land_on(platform.top());
            landed = true;
            events::gameplay_trace("Player landed on platform");
        }
    }
    if player.on_ground && !landed {
        player.on_ground = false;
        events::gameplay_trace("Player fell off platform edge");
    }
    landed
}

/// Resolve player contact with every active enemy. Returns the collectibles
/// dropped by defeated enemies.
pub fn resolve_enemies(
    player: &mut Player,
    enemies: &mut [Enemy],
    ctx: &mut CollisionContext<'_>,
    contacts: &mut Vec<EnemyContact>,
) -> Vec<Collectible> {
    let mut drops = Vec::new();
    for enemy in enemies.iter_mut().filter(|e| e.active) {
        if !player.body.aabb().intersects(&enemy.body.aabb()) {
            continue;
        }
        let stomp = player.body.bottom() < enemy.body.center_y() && player.body.vy > 0.0;
        let contact = if stomp {
            enemy.defeat();
            player.body.vy = ctx.cfg.physics.stomp_bounce;
            events::gameplay(&format!("Player defeated {} enemy by jumping", enemy.name()));
            EnemyContact::Stomped
        } else if player.chain.has_weapon() {
            enemy.defeat();
            player.body.vy = ctx.cfg.physics.weapon_bounce;
            events::gameplay(&format!("Player defeated {} enemy with weapon", enemy.name()));
            EnemyContact::Slashed
        } else if !player.is_invincible(ctx.now) {
            player.take_damage(ctx.now, ctx.cues);
            events::gameplay(&format!("Player hit by {}", enemy.name()));
            EnemyContact::HurtPlayer
        } else {
            EnemyContact::Ignored
        };

        if matches!(contact, EnemyContact::Stomped | EnemyContact::Slashed) {
            ctx.cues.push(AudioCue::EnemyDefeat);
            if let Some(drop) = maybe_drop(enemy.body.x, enemy.body.y, ctx) {
                drops.push(drop);
            }
        }
        contacts.push(contact);
    }
    drops
}

fn maybe_drop(x: f64, y: f64, ctx: &mut CollisionContext<'_>) -> Option<Collectible> {
    let chance = ctx.cfg.powerup.drop_chance.clamp(0.0, 1.0);
    if !ctx.rng.random_bool(chance) {
        return None;
    }
    let kind = DROP_TABLE[ctx.rng.random_range(0..DROP_TABLE.len())];
    events::gameplay(&format!("Enemy dropped a {}!", kind.name()));
    Some(Collectible::new(x, y, kind, ctx.cfg))
}

/// Pick up every active collectible the player overlaps. Power-ups wrap the
/// player's chain; coins add to the score.
pub fn resolve_collectibles(
    player: &mut Player,
    level: &mut Level,
    score: &mut Score,
    now: Millis,
    cues: &mut AudioCueQueue,
) -> Vec<CollectibleKind> {
    let mut collected = Vec::new();
    let bounds = player.body.aabb();
    for item in level.active_collectibles_mut() {
        if !bounds.intersects(&item.bounds) || !item.collect() {
            continue;
        }
        match item.kind {
            CollectibleKind::PowerUp(kind) => {
                player.apply_power_up(kind, now);
                cues.push(AudioCue::PowerUp);
            },
            CollectibleKind::Coin => {
                score.add(item.value);
                cues.push(AudioCue::Coin);
            },
        }
        collected.push(item.kind);
    }
    collected
}

/// Damage the player for each active obstacle they touch, unless invincible.
pub fn resolve_obstacles(
    player: &mut Player,
    level: &Level,
    now: Millis,
    cues: &mut AudioCueQueue,
) -> usize {
    let bounds = player.body.aabb();
    let mut hits = 0;
    for obstacle in level.active_obstacles() {
        if bounds.intersects(&obstacle.bounds) && !player.is_invincible(now) {
            player.take_damage(now, cues);
            events::gameplay(&format!("Player hit by {}", obstacle.kind.name()));
            hits += 1;
        }
    }
    hits
}

/// Damage the player for each active projectile they touch and spend the
/// projectile. Invincible players pass through shots untouched.
pub fn resolve_projectiles(
    player: &mut Player,
    projectiles: &mut [Projectile],
    now: Millis,
    cues: &mut AudioCueQueue,
) -> usize {
    let mut hits = 0;
    for projectile in projectiles.iter_mut().filter(|p| p.active) {
        if player.body.aabb().intersects(&projectile.body.aabb()) && !player.is_invincible(now) {
            player.take_damage(now, cues);
            projectile.deactivate();
            events::gameplay("Player hit by projectile");
            hits += 1;
        }
    }
    hits
}

/// Whether the player has left the playfield: fully past the left edge,
/// past the right edge, or below the bottom.
pub fn is_out_of_bounds(player: &Player, screen_width: f64, screen_height: f64) -> bool {
    let body = &player.body;
    body.x < -body.w || body.x > screen_width || body.y > screen_height
}

/// Run the five contact checks in order.
pub fn resolve_all(
    player: &mut Player,
    enemies: &mut [Enemy],
    level: &mut Level,
    projectiles: &mut [Projectile],
    score: &mut Score,
    ctx: &mut CollisionContext<'_>,
) -> CollisionReport {
    let mut report = CollisionReport {
        landed: resolve_platforms(
            player,
            &level.active_platforms(),
            ctx.cfg.physics.landing_tolerance,
        ),
        ..Default::default()
    };

    let drops = resolve_enemies(player, enemies, ctx, &mut report.enemy_contacts);
    report.drops = drops.len();
    for drop in drops {
        level.add(Component::Collectible(drop));
    }

    report.collected = resolve_collectibles(player, level, score, ctx.now, ctx.cues);
    report.obstacle_hits = resolve_obstacles(player, level, ctx.now, ctx.cues);
    report.projectile_hits = resolve_projectiles(player, projectiles, ctx.now, ctx.cues);
    report
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::level::{Obstacle, ObstacleKind, Platform};
    use crate::player::PlayerState;

    const GROUND: Aabb = Aabb {
        x: 0.0,
        y: 550.0,
        w: 200.0,
        h: 50.0,
    };

    fn cfg_with_drop(chance: f64) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.powerup.drop_chance = chance;
        cfg
    }

    fn player_at(x: f64, y: f64, vy: f64) -> Player {
        let mut p = Player::new(&GameConfig::default());
        p.body.x = x;
        p.body.y = y;
        p.body.vy = vy;
        p
    }

    // ================================================================
    // Platforms
    // ================================================================

    #[test]
    fn falling_onto_platform_snaps_to_top() {
        // Bottom was at 548 last tick, 552 now.
        let mut p = player_at(100.0, 504.0, 4.0);
        assert!(resolve_platforms(&mut p, &[GROUND], 10.0));
        assert_eq!(p.body.bottom(), 550.0);
        assert_eq!(p.body.vy, 0.0);
        assert!(p.on_ground);
    }

    #[test]
    fn rising_through_platform_does_not_land() {
        let mut p = player_at(100.0, 510.0, -6.0);
        assert!(!resolve_platforms(&mut p, &[GROUND], 10.0));
        assert_eq!(p.body.y, 510.0);
        assert!(!p.on_ground);
    }

    #[test]
    fn deep_overlap_from_below_tolerance_does_not_land() {
        // Previous bottom 570, well below top + tolerance.
        let mut p = player_at(100.0, 530.0, 8.0);
        let prev_bottom = p.body.bottom() - p.body.vy;
        assert!(prev_bottom > 560.0);
        assert!(!resolve_platforms(&mut p, &[GROUND], 10.0));
    }

    #[test]
    fn resting_player_stays_grounded() {
        let mut p = player_at(100.0, 502.0, 0.0);
        p.on_ground = true;
        assert!(resolve_platforms(&mut p, &[GROUND], 10.0));
        assert!(p.on_ground);
        assert_eq!(p.body.y, 502.0);
    }

    #[test]
    fn walking_off_the_edge_clears_ground_flag() {
        let mut p = player_at(210.0, 502.0, 0.0);
        p.on_ground = true;
        assert!(!resolve_platforms(&mut p, &[GROUND], 10.0));
        assert!(!p.on_ground);
    }

    #[test]
    fn edge_walk_scenario() {
        let mut p = player_at(100.0, 502.0, 0.0);
        p.on_ground = true;
        p.update(0);
        resolve_platforms(&mut p, &[GROUND], 10.0);
        assert_eq!((p.body.x, p.body.y), (100.0, 502.0), "one grounded tick changes nothing");

        p.body.x = 210.0;
        resolve_platforms(&mut p, &[], 10.0);
        assert!(!p.on_ground);
        p.update(16);
        assert_eq!(p.body.vy, 0.5);
        p.update(32);
        assert_eq!(p.body.vy, 1.0, "gravity accumulates once airborne");
    }

    // ================================================================
    // Enemies
    // ================================================================

    fn ctx<'a>(
        now: Millis,
        cfg: &'a GameConfig,
        rng: &'a mut StdRng,
        cues: &'a mut AudioCueQueue,
    ) -> CollisionContext<'a> {
        CollisionContext { now, cfg, rng, cues }
    }

    #[test]
    fn stomp_defeats_enemy_and_bounces() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(100.0, 518.0, &cfg)];
        // Bottom at 520, above the enemy midline at 534.
        let mut p = player_at(100.0, 472.0, 3.0);
        let mut contacts = Vec::new();
        let drops = resolve_enemies(
            &mut p,
            &mut enemies,
            &mut ctx(0, &cfg, &mut rng, &mut cues),
            &mut contacts,
        );
        assert_eq!(contacts, vec![EnemyContact::Stomped]);
        assert!(!enemies[0].active);
        assert_eq!(p.body.vy, -5.0);
        assert_eq!(p.lives, 3);
        assert!(drops.is_empty());
        assert_eq!(cues.pending(), &[AudioCue::EnemyDefeat]);
    }

    #[test]
    fn stomp_defeats_only_the_enemy_touched() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![
            Enemy::patroller(100.0, 518.0, &cfg),
            Enemy::patroller(300.0, 518.0, &cfg),
        ];
        let mut p = player_at(100.0, 472.0, 3.0);
        let mut contacts = Vec::new();
        resolve_enemies(&mut p, &mut enemies, &mut ctx(0, &cfg, &mut rng, &mut cues), &mut contacts);
        assert_eq!(enemies.iter().filter(|e| !e.active).count(), 1);
        assert!(enemies[1].active);
    }

    #[test]
    fn weapon_defeats_enemy_from_the_side() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(120.0, 518.0, &cfg)];
        let mut p = player_at(100.0, 502.0, 0.0);
        p.apply_power_up(PowerUpKind::Weapon, 0);
        let mut contacts = Vec::new();
        resolve_enemies(&mut p, &mut enemies, &mut ctx(0, &cfg, &mut rng, &mut cues), &mut contacts);
        assert_eq!(contacts, vec![EnemyContact::Slashed]);
        assert_eq!(p.body.vy, -3.0);
        assert!(!enemies[0].active);
    }

    #[test]
    fn side_contact_hurts_player() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(120.0, 518.0, &cfg)];
        let mut p = player_at(100.0, 502.0, 0.0);
        let mut contacts = Vec::new();
        resolve_enemies(&mut p, &mut enemies, &mut ctx(0, &cfg, &mut rng, &mut cues), &mut contacts);
        assert_eq!(contacts, vec![EnemyContact::HurtPlayer]);
        assert_eq!(p.lives, 2);
        assert!(enemies[0].active);
        assert_eq!(cues.pending(), &[AudioCue::Damage]);
    }

    #[test]
    fn invincible_player_ignores_side_contact() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(120.0, 518.0, &cfg)];
        let mut p = player_at(100.0, 502.0, 0.0);
        p.apply_power_up(PowerUpKind::Invincibility, 0);
        let mut contacts = Vec::new();
        resolve_enemies(&mut p, &mut enemies, &mut ctx(50, &cfg, &mut rng, &mut cues), &mut contacts);
        assert_eq!(contacts, vec![EnemyContact::Ignored]);
        assert_eq!(p.lives, 3);
        assert!(enemies[0].active);
    }

    #[test]
    fn guaranteed_drop_spawns_at_enemy_position() {
        let cfg = cfg_with_drop(1.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(100.0, 518.0, &cfg)];
        let mut p = player_at(100.0, 472.0, 3.0);
        let mut contacts = Vec::new();
        let drops = resolve_enemies(
            &mut p,
            &mut enemies,
            &mut ctx(0, &cfg, &mut rng, &mut cues),
            &mut contacts,
        );
        assert_eq!(drops.len(), 1);
        assert_eq!((drops[0].bounds.x, drops[0].bounds.y), (100.0, 518.0));
        assert!(DROP_TABLE.contains(&drops[0].kind));
    }

    #[test]
    fn inactive_enemies_are_skipped() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut enemies = vec![Enemy::patroller(120.0, 518.0, &cfg)];
        enemies[0].defeat();
        let mut p = player_at(100.0, 502.0, 0.0);
        let mut contacts = Vec::new();
        resolve_enemies(&mut p, &mut enemies, &mut ctx(0, &cfg, &mut rng, &mut cues), &mut contacts);
        assert!(contacts.is_empty());
        assert_eq!(p.lives, 3);
    }

    // ================================================================
    // Collectibles, obstacles, projectiles, bounds
    // ================================================================

    #[test]
    fn coin_adds_score_and_power_up_wraps_chain() {
        let cfg = GameConfig::default();
        let mut level = Level::new("t", 800.0, 600.0);
        level.add(Component::Collectible(Collectible::new(100.0, 520.0, CollectibleKind::Coin, &cfg)));
        level.add(Component::Collectible(Collectible::new(
            110.0,
            520.0,
            CollectibleKind::PowerUp(PowerUpKind::Shield),
            &cfg,
        )));
        let mut p = player_at(100.0, 502.0, 0.0);
        let mut score = Score::new();
        let mut cues = AudioCueQueue::new();
        let got = resolve_collectibles(&mut p, &mut level, &mut score, 0, &mut cues);
        assert_eq!(got.len(), 2);
        assert_eq!(score.value(), 10);
        assert!(p.chain.has_shield());
        assert_eq!(cues.pending(), &[AudioCue::Coin, AudioCue::PowerUp]);
        assert_eq!(level.count_active_collectibles(), 0);

        let again = resolve_collectibles(&mut p, &mut level, &mut score, 0, &mut cues);
        assert!(again.is_empty(), "collected items stay collected");
        assert_eq!(score.value(), 10);
    }

    #[test]
    fn obstacle_damages_unless_invincible() {
        let cfg = GameConfig::default();
        let mut level = Level::new("t", 800.0, 600.0);
        level.add(Component::Obstacle(Obstacle::new(110.0, 520.0, ObstacleKind::Spike, &cfg)));
        let mut cues = AudioCueQueue::new();

        let mut p = player_at(100.0, 502.0, 0.0);
        assert_eq!(resolve_obstacles(&mut p, &level, 0, &mut cues), 1);
        assert_eq!(p.lives, 2);

        let mut star = player_at(100.0, 502.0, 0.0);
        star.apply_power_up(PowerUpKind::Invincibility, 0);
        assert_eq!(resolve_obstacles(&mut star, &level, 100, &mut cues), 0);
        assert_eq!(star.lives, 3);
    }

    #[test]
    fn projectile_hit_damages_and_consumes_shot() {
        let cfg = GameConfig::default();
        let mut shots = vec![Projectile::new(110.0, 520.0, -4.0, &cfg.projectile)];
        let mut p = player_at(100.0, 502.0, 0.0);
        let mut cues = AudioCueQueue::new();
        assert_eq!(resolve_projectiles(&mut p, &mut shots, 0, &mut cues), 1);
        assert!(!shots[0].active);
        assert_eq!(p.lives, 2);
    }

    #[test]
    fn invincible_player_passes_through_projectiles() {
        let cfg = GameConfig::default();
        let mut shots = vec![Projectile::new(110.0, 520.0, -4.0, &cfg.projectile)];
        let mut p = player_at(100.0, 502.0, 0.0);
        p.apply_power_up(PowerUpKind::Invincibility, 0);
        let mut cues = AudioCueQueue::new();
        assert_eq!(resolve_projectiles(&mut p, &mut shots, 10, &mut cues), 0);
        assert!(shots[0].active);
    }

    #[test]
    fn out_of_bounds_edges() {
        assert!(!is_out_of_bounds(&player_at(-31.0, 100.0, 0.0), 800.0, 600.0));
        assert!(is_out_of_bounds(&player_at(-33.0, 100.0, 0.0), 800.0, 600.0));
        assert!(is_out_of_bounds(&player_at(801.0, 100.0, 0.0), 800.0, 600.0));
        assert!(is_out_of_bounds(&player_at(100.0, 601.0, 0.0), 800.0, 600.0));
        assert!(!is_out_of_bounds(&player_at(100.0, 600.0, 0.0), 800.0, 600.0));
    }

    #[test]
    fn full_pass_runs_steps_in_order() {
        let cfg = cfg_with_drop(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cues = AudioCueQueue::new();
        let mut level = Level::new("t", 800.0, 600.0);
        level.add(Component::Platform(Platform::new(0.0, 550.0, 200.0, 50.0)));
        level.add(Component::Collectible(Collectible::new(100.0, 520.0, CollectibleKind::Coin, &cfg)));
        let mut enemies = vec![Enemy::patroller(500.0, 518.0, &cfg)];
        let mut shots = Vec::new();
        let mut score = Score::new();
        let mut p = player_at(100.0, 504.0, 4.0);
        let report = resolve_all(
            &mut p,
            &mut enemies,
            &mut level,
            &mut shots,
            &mut score,
            &mut ctx(0, &cfg, &mut rng, &mut cues),
        );
        assert!(report.landed);
        assert!(report.enemy_contacts.is_empty());
        assert_eq!(report.collected, vec![CollectibleKind::Coin]);
        assert_eq!(score.value(), 10);
        assert_eq!(p.state, PlayerState::Idle);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn landing_puts_bottom_exactly_on_top(
                x in 0.0f64..168.0,
                prev_gap in 0.0f64..9.9,
                vy in 0.0f64..15.0,
            ) {
                // Previous bottom sits between top and top + tolerance.
                let prev_bottom = GROUND.top() + prev_gap;
                let bottom = prev_bottom + vy;
                let mut p = player_at(x, bottom - 48.0, vy);
                prop_assume!(p.body.aabb().intersects(&GROUND));
                prop_assert!(resolve_platforms(&mut p, &[GROUND], 10.0));
                prop_assert_eq!(p.body.bottom(), GROUND.top());
                prop_assert_eq!(p.body.vy, 0.0);
                prop_assert!(p.on_ground);
            }

            #[test]
            fn grounded_player_over_nothing_falls(x in 201.0f64..700.0) {
                let mut p = player_at(x, 502.0, 0.0);
                p.on_ground = true;
                resolve_platforms(&mut p, &[GROUND], 10.0);
                prop_assert!(!p.on_ground);
            }
        }
    }
}
