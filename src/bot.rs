//! Computer opponent
//!
//! Predicts whether a bullet fired right now would hit the opponent by
//! treating both as constant-velocity discs, finding their time of closest
//! approach, and checking the bullet's swept path against the walls. The
//! scene is only read; every piece of synthetic geometry is local.

use crate::config::BotConfig;
use crate::entities::{
    Entity, EntityInfo, EntityKind, bullet_spawn, is_obstacle, kind_of, lifetime_of, player_of,
    ship_effective_radius,
};
use crate::error::SimError;
use crate::input::{Control, InputTiming};
use crate::normalize_angle;
use crate::sim::vector::{rotate, to_polar};
use crate::sim::{BodyId, Scene, Vector, find_collision, make_rectangle};

/// Position, velocity and bounding radius of something moving in a straight line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vector,
    pub velocity: Vector,
    pub radius: f64,
}

impl Kinematics {
    pub fn at(&self, t: f64) -> Vector {
        self.position + self.velocity * t
    }

    fn of(body: &Entity, radius: f64) -> Self {
        Self {
            position: body.centroid(),
            velocity: body.velocity(),
            radius,
        }
    }
}

/// Synthetic controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotAction {
    pub shoot: bool,
    pub turn: bool,
}

/// Time when two linearly moving points are closest, never in the past
///
/// Minimizes `|Δp + Δv t|`, giving `t* = -(Δv·Δp) / (Δv·Δv)`. Equal
/// velocities keep the separation constant, so the answer is now.
pub fn time_of_closest_approach(p1: Vector, v1: Vector, p2: Vector, v2: Vector) -> f64 {
    let dp = p2 - p1;
    let dv = v2 - v1;
    let speed_sq = dv.length_squared();
    if speed_sq == 0.0 {
        return 0.0;
    }
    (-dv.dot(dp) / speed_sq).max(0.0)
}

/// Rectangle `width` wide covering the segment from `start` to `end`
fn swept_path(start: Vector, end: Vector, width: f64) -> Vec<Vector> {
    let (length, angle) = to_polar(end - start);
    let center = (start + end) * 0.5;
    make_rectangle(Vector::ZERO, length, width)
        .into_iter()
        .map(|p| center + rotate(p, angle))
        .collect()
}

/// Would `mover` reach `target` within `horizon` seconds with no wall in between
pub fn will_collide(
    scene: &Scene<EntityInfo>,
    mover: &Kinematics,
    target: &Kinematics,
    horizon: f64,
) -> bool {
    let t = time_of_closest_approach(mover.position, mover.velocity, target.position, target.velocity);
    if t > horizon {
        return false;
    }
    let separation = (target.at(t) - mover.at(t)).length();
    if separation > mover.radius + target.radius {
        return false;
    }

    let end = mover.at(t);
    if (end - mover.position).length() <= f64::EPSILON {
        // Already touching
        return true;
    }
    let path = swept_path(mover.position, end, 2.0 * mover.radius);
    !scene
        .bodies()
        .iter()
        .filter(|body| !body.is_removed() && is_obstacle(body))
        .any(|wall| find_collision(&path, wall.polygon().points()).collided)
}

fn live(scene: &Scene<EntityInfo>, id: BodyId) -> Option<&Entity> {
    scene.body(id).filter(|body| !body.is_removed())
}

/// Would a bullet fired by `shooter` this frame hit `target`
pub fn bullet_will_hit(
    scene: &Scene<EntityInfo>,
    shooter: BodyId,
    target: BodyId,
    config: &BotConfig,
) -> bool {
    let (Some(shooter), Some(target)) = (live(scene, shooter), live(scene, target)) else {
        return false;
    };
    let (position, velocity) = bullet_spawn(shooter.centroid(), shooter.rotation(), config);
    let bullet = Kinematics {
        position,
        velocity,
        radius: config.bullet_radius,
    };
    let target = Kinematics::of(target, ship_effective_radius(config.ship_base, config.ship_height));
    will_collide(scene, &bullet, &target, config.bullet_lifetime)
}

/// Is an opponent's bullet headed for `ship`
pub fn should_dodge(scene: &Scene<EntityInfo>, ship: BodyId, config: &BotConfig) -> bool {
    let Some(ship) = live(scene, ship) else {
        return false;
    };
    let owner = player_of(ship);
    let target = Kinematics::of(ship, ship_effective_radius(config.ship_base, config.ship_height));

    scene
        .bodies()
        .iter()
        .filter(|body| !body.is_removed() && kind_of(body) == Some(EntityKind::Bullet))
        .filter(|bullet| owner.is_none() || player_of(bullet) != owner)
        .any(|bullet| {
            // Bullets that expire before arriving are harmless
            let horizon = lifetime_of(bullet).unwrap_or(config.bullet_lifetime);
            let bullet = Kinematics::of(bullet, config.bullet_radius);
            will_collide(scene, &bullet, &target, horizon)
        })
}

/// Would one frame of turning bring the shooter's heading closer to the target
pub fn turn_reduces_angle(shooter: &Entity, target: &Entity, config: &BotConfig) -> bool {
    let dt = config.dt;
    let from = shooter.centroid() + shooter.velocity() * dt;
    let to = target.centroid() + target.velocity() * dt;
    let (_, bearing) = to_polar(to - from);

    let rotation = shooter.rotation();
    let now = normalize_angle(bearing - rotation).abs();
    let next = normalize_angle(bearing - (rotation + config.ship_rot_speed * dt)).abs();
    next < now
}

/// Pick this frame's controls for the ship `me`
///
/// Shoots when a bullet would land. Turns when turning improves the aim,
/// and when a bullet is incoming flips whatever the turn control is doing.
pub fn bot_move(
    scene: &Scene<EntityInfo>,
    config: &BotConfig,
    timing: &InputTiming,
    me: BodyId,
    opponent: BodyId,
    turn: Control,
) -> Result<BotAction, SimError> {
    let Some(ship) = live(scene, me) else {
        return Err(SimError::UnknownBody { id: me });
    };
    let Some(target) = live(scene, opponent) else {
        return Ok(BotAction::default());
    };

    let mut action = BotAction {
        shoot: bullet_will_hit(scene, me, opponent, config),
        turn: turn_reduces_angle(ship, target, config),
    };

    if should_dodge(scene, me, config) {
        action.turn = !timing.is_held(turn);
        log::debug!("Ship {me} dodging (turn={})", action.turn);
    }

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{make_bullet, make_ship, make_wall};

    fn duel(target_at: Vector) -> (Scene<EntityInfo>, BodyId, BodyId) {
        let mut scene = Scene::new();
        let shooter = scene.add_body(make_ship(Vector::ZERO, 0, Vector::ZERO).unwrap());
        let target = scene.add_body(make_ship(target_at, 1, Vector::ZERO).unwrap());
        (scene, shooter, target)
    }

    #[test]
    fn test_closest_approach_head_on() {
        let t = time_of_closest_approach(
            Vector::ZERO,
            Vector::new(10.0, 0.0),
            Vector::new(100.0, 0.0),
            Vector::ZERO,
        );
        assert!((t - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_approach_clamped_to_future() {
        // Moving apart: closest point was in the past
        let t = time_of_closest_approach(
            Vector::ZERO,
            Vector::new(-10.0, 0.0),
            Vector::new(100.0, 0.0),
            Vector::ZERO,
        );
        assert_eq!(t, 0.0);
        assert_eq!(time_of_closest_approach(Vector::ZERO, Vector::X, Vector::Y, Vector::X), 0.0);
    }

    #[test]
    fn test_stationary_target_ahead_is_hit() {
        let (scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        assert!(bullet_will_hit(&scene, shooter, target, &BotConfig::default()));
    }

    #[test]
    fn test_wall_blocks_shot() {
        let (mut scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        scene.add_body(make_wall(Vector::new(100.0, 0.0), 10.0, 100.0).unwrap());
        assert!(!bullet_will_hit(&scene, shooter, target, &BotConfig::default()));
    }

    #[test]
    fn test_target_behind_is_missed() {
        let (scene, shooter, target) = duel(Vector::new(-200.0, 0.0));
        assert!(!bullet_will_hit(&scene, shooter, target, &BotConfig::default()));
    }

    #[test]
    fn test_target_out_of_range_is_missed() {
        let config = BotConfig::default();
        let (scene, shooter, target) = duel(Vector::new(config.bullet_range() + 500.0, 0.0));
        assert!(!bullet_will_hit(&scene, shooter, target, &config));
    }

    #[test]
    fn test_prediction_leaves_scene_untouched() {
        let (mut scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        scene.add_body(make_wall(Vector::new(100.0, 0.0), 10.0, 100.0).unwrap());
        let before = scene.snapshot();
        bullet_will_hit(&scene, shooter, target, &BotConfig::default());
        should_dodge(&scene, target, &BotConfig::default());
        assert_eq!(scene.snapshot(), before);
    }

    #[test]
    fn test_dodge_only_opposing_bullets() {
        let config = BotConfig::default();
        let (mut scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        let bullet = make_bullet(scene.body(shooter).unwrap(), &config).unwrap();
        scene.add_body(bullet);

        assert!(should_dodge(&scene, target, &config));
        assert!(!should_dodge(&scene, shooter, &config));
    }

    #[test]
    fn test_dodge_ignores_bullets_that_expire_first() {
        let config = BotConfig::default();
        let (mut scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        let mut bullet = make_bullet(scene.body(shooter).unwrap(), &config).unwrap();
        // Arrival is ~0.44s away
        if let Some(info) = bullet.info_mut() {
            info.lifetime = Some(0.1);
        }
        scene.add_body(bullet);

        assert!(!should_dodge(&scene, target, &config));
    }

    #[test]
    fn test_turn_toward_target() {
        let config = BotConfig::default();
        // Target is counterclockwise of the heading: turning (ccw) helps
        let (scene, shooter, target) = duel(Vector::new(0.0, 200.0));
        let (s, t) = (scene.body(shooter).unwrap(), scene.body(target).unwrap());
        assert!(turn_reduces_angle(s, t, &config));

        // Target slightly clockwise: turning ccw makes it worse
        let (scene, shooter, target) = duel(Vector::new(200.0, -50.0));
        let (s, t) = (scene.body(shooter).unwrap(), scene.body(target).unwrap());
        assert!(!turn_reduces_angle(s, t, &config));
    }

    #[test]
    fn test_bot_move_shoots_when_lined_up() {
        let config = BotConfig::default();
        let (scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        let action = bot_move(&scene, &config, &InputTiming::new(), shooter, target, Control::P1Turn).unwrap();
        assert!(action.shoot);
        assert!(!action.turn);
    }

    #[test]
    fn test_bot_move_dodge_toggles_turn() {
        let config = BotConfig::default();
        let (mut scene, shooter, target) = duel(Vector::new(200.0, 0.0));
        let bullet = make_bullet(scene.body(shooter).unwrap(), &config).unwrap();
        scene.add_body(bullet);

        let mut timing = InputTiming::new();
        let action = bot_move(&scene, &config, &timing, target, shooter, Control::P2Turn).unwrap();
        assert!(action.turn);

        timing.press(Control::P2Turn, 0.0);
        let action = bot_move(&scene, &config, &timing, target, shooter, Control::P2Turn).unwrap();
        assert!(!action.turn);
    }

    #[test]
    fn test_bot_move_unknown_ship() {
        let (scene, _, target) = duel(Vector::new(200.0, 0.0));
        let missing = BodyId(99);
        assert_eq!(
            bot_move(&scene, &BotConfig::default(), &InputTiming::new(), missing, target, Control::P1Turn),
            Err(SimError::UnknownBody { id: missing })
        );
    }
}
