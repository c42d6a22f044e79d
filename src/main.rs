//! Astro Duel entry point
//!
//! Runs a headless bot-vs-bot duel and prints the final scene as JSON.
//!
//! Usage: `astro-duel [config.json] [frames] [seed]`

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use astro_duel::bot::bot_move;
use astro_duel::consts::*;
use astro_duel::entities::{
    EntityInfo, heading, make_asteroid, make_bullet, make_pilot, make_ship, make_wall, player_of,
};
use astro_duel::input::{Control, InputTiming};
use astro_duel::sim::{
    BodyId, Scene, Vector, apply_collision_impulse, create_collision, create_drag, create_physics_collision,
};
use astro_duel::{BotConfig, SimError};

const DEFAULT_FRAMES: u64 = 60 * 30;
const DEFAULT_SEED: u64 = 42;

/// Things force creators report back to the duel loop
#[derive(Debug, Clone, Copy)]
enum DuelEvent {
    ShipDestroyed {
        player: Option<usize>,
        centroid: Vector,
        velocity: Vector,
    },
}

/// Everything outside the physics core: who is who, bullet ages, controls
struct Duel {
    scene: Scene<EntityInfo>,
    config: BotConfig,
    timing: InputTiming,
    ships: [BodyId; 2],
    walls: Vec<BodyId>,
    asteroids: Vec<BodyId>,
    /// Bullets still in flight
    bullets: Vec<BodyId>,
    last_shot: [f64; 2],
    events: Rc<RefCell<Vec<DuelEvent>>>,
    time: f64,
    winner: Option<usize>,
}

impl Duel {
    fn new(config: BotConfig, seed: u64) -> Result<Self, SimError> {
        let mut scene = Scene::new();

        let (w, h, t) = (ARENA_WIDTH, ARENA_HEIGHT, WALL_THICKNESS);
        let walls = vec![
            scene.add_body(make_wall(Vector::new(w / 2.0, t / 2.0), w, t)?),
            scene.add_body(make_wall(Vector::new(w / 2.0, h - t / 2.0), w, t)?),
            scene.add_body(make_wall(Vector::new(t / 2.0, h / 2.0), t, h)?),
            scene.add_body(make_wall(Vector::new(w - t / 2.0, h / 2.0), t, h)?),
        ];

        let p1 = scene.add_body(make_ship(Vector::new(w / 4.0, h / 2.0), 0, Vector::ZERO)?);
        let mut right = make_ship(Vector::new(3.0 * w / 4.0, h / 2.0), 1, Vector::ZERO)?;
        right.set_rotation(std::f64::consts::PI);
        let p2 = scene.add_body(right);
        let ships = [p1, p2];

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut asteroids = Vec::with_capacity(ASTEROID_COUNT);
        for _ in 0..ASTEROID_COUNT {
            let radius = rng.random_range(ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS);
            let centroid = Vector::new(
                rng.random_range(0.35 * w..0.65 * w),
                rng.random_range(t + radius..h - t - radius),
            );
            let velocity = Vector::new(
                rng.random_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
                rng.random_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
            );
            asteroids.push(scene.add_body(make_asteroid(centroid, radius, velocity)?));
        }

        for &ship in &ships {
            create_drag(&mut scene, SHIP_DRAG, ship)?;
            for &wall in &walls {
                create_physics_collision(&mut scene, SHIP_ELASTICITY, ship, wall)?;
            }
            for &asteroid in &asteroids {
                create_physics_collision(&mut scene, SHIP_ELASTICITY, ship, asteroid)?;
            }
        }
        create_physics_collision(&mut scene, SHIP_ELASTICITY, p1, p2)?;
        for (i, &asteroid) in asteroids.iter().enumerate() {
            for &wall in &walls {
                create_physics_collision(&mut scene, 1.0, asteroid, wall)?;
            }
            for &other in &asteroids[i + 1..] {
                create_physics_collision(&mut scene, 1.0, asteroid, other)?;
            }
        }

        log::info!(
            "Duel ready: {} bodies, {} force creators (seed {seed})",
            scene.body_count(),
            scene.force_count()
        );

        Ok(Self {
            scene,
            config,
            timing: InputTiming::new(),
            ships,
            walls,
            asteroids,
            bullets: Vec::new(),
            last_shot: [f64::NEG_INFINITY; 2],
            events: Rc::new(RefCell::new(Vec::new())),
            time: 0.0,
            winner: None,
        })
    }

    /// One frame: bots pick controls, the scene ticks, events resolve
    fn step(&mut self, dt: f64) -> Result<(), SimError> {
        self.age_bullets(dt)?;

        for player in 0..2 {
            let (me, opponent) = (self.ships[player], self.ships[1 - player]);
            if self.scene.body(me).is_none() {
                continue;
            }
            let turn = Control::turn_for(player);
            let action = bot_move(&self.scene, &self.config, &self.timing, me, opponent, turn)?;
            self.steer(player, action.turn);
            self.trigger(player, action.shoot)?;
        }

        self.scene.tick(dt);
        self.time += dt;
        self.resolve_events()
    }

    /// Hold or release the turn control; a double tap boosts forward
    fn steer(&mut self, player: usize, turn: bool) {
        let control = Control::turn_for(player);
        let held = self.timing.is_held(control);
        let Some(ship) = self.scene.body_mut(self.ships[player]) else {
            return;
        };

        if turn && !held {
            self.timing.press(control, self.time);
            if self.timing.is_double_tap(control, self.config.double_tap_threshold) {
                ship.add_impulse(heading(ship.rotation()) * SHIP_BOOST_IMPULSE);
                log::debug!("Player {} boosts", player + 1);
            }
        } else if !turn && held {
            self.timing.release(control, self.time);
        }

        let speed = if turn { self.config.ship_rot_speed } else { 0.0 };
        ship.set_rotation_speed(speed);
    }

    fn trigger(&mut self, player: usize, shoot: bool) -> Result<(), SimError> {
        let control = Control::shoot_for(player);
        let held = self.timing.is_held(control);
        if shoot && !held {
            self.timing.press(control, self.time);
        } else if !shoot && held {
            self.timing.release(control, self.time);
        }

        if shoot && self.time - self.last_shot[player] >= FIRE_COOLDOWN {
            self.fire(player)?;
        }
        Ok(())
    }

    fn fire(&mut self, player: usize) -> Result<(), SimError> {
        let shooter = self.ships[player];
        let Some(ship) = self.scene.body(shooter) else {
            return Ok(());
        };
        let bullet = make_bullet(ship, &self.config)?;
        let bullet = self.scene.add_body(bullet);

        for &wall in &self.walls {
            create_collision(&mut self.scene, bullet, wall, |bullet, _, _| bullet.remove())?;
        }
        for &asteroid in &self.asteroids {
            create_collision(&mut self.scene, bullet, asteroid, |bullet, asteroid, axis| {
                apply_collision_impulse(bullet, asteroid, axis, 1.0);
                bullet.remove();
            })?;
        }
        let target = self.ships[1 - player];
        if self.scene.body(target).is_some() {
            let events = Rc::clone(&self.events);
            create_collision(&mut self.scene, bullet, target, move |bullet, ship, _| {
                bullet.remove();
                ship.remove();
                events.borrow_mut().push(DuelEvent::ShipDestroyed {
                    player: player_of(ship),
                    centroid: ship.centroid(),
                    velocity: ship.velocity(),
                });
            })?;
        }

        self.bullets.push(bullet);
        self.last_shot[player] = self.time;
        log::debug!("Player {} fires bullet {bullet}", player + 1);
        Ok(())
    }

    /// Count down bullet lifetimes and remove the ones that run out
    fn age_bullets(&mut self, dt: f64) -> Result<(), SimError> {
        let mut expired = Vec::new();
        self.bullets.retain(|&id| {
            let Some(info) = self.scene.body_mut(id).and_then(|b| b.info_mut()) else {
                return false;
            };
            let left = info.lifetime.map_or(0.0, |t| t - dt);
            info.lifetime = Some(left);
            if left <= 0.0 {
                expired.push(id);
                return false;
            }
            true
        });
        for id in expired {
            self.scene.remove_body(id)?;
        }
        Ok(())
    }

    fn resolve_events(&mut self) -> Result<(), SimError> {
        let events: Vec<DuelEvent> = self.events.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                DuelEvent::ShipDestroyed {
                    player,
                    centroid,
                    velocity,
                } => {
                    let Some(player) = player else { continue };
                    log::info!("Player {} destroyed at t={:.2}s", player + 1, self.time);
                    let pilot = self.scene.add_body(make_pilot(centroid, player, velocity)?);
                    for &wall in &self.walls {
                        create_physics_collision(&mut self.scene, SHIP_ELASTICITY, pilot, wall)?;
                    }
                    if self.winner.is_none() {
                        self.winner = Some(1 - player);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Optional numeric argument at `index`, or `default` when absent
fn parse_arg(args: &[String], index: usize, name: &str, default: u64) -> Result<u64> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid {name} argument: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    log::info!("Astro Duel starting...");

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => BotConfig::load_or_default(path),
        None => BotConfig::default(),
    };
    let frames = parse_arg(&args, 2, "frames", DEFAULT_FRAMES)?;
    let seed = parse_arg(&args, 3, "seed", DEFAULT_SEED)?;

    let mut duel = Duel::new(config, seed).context("failed to set up the duel")?;
    for _ in 0..frames {
        duel.step(SIM_DT)
            .with_context(|| format!("duel failed at tick {}", duel.scene.ticks()))?;
        if duel.winner.is_some() {
            break;
        }
    }

    match duel.winner {
        Some(winner) => log::info!("Player {} wins after {} ticks", winner + 1, duel.scene.ticks()),
        None => log::info!("Draw after {} ticks", duel.scene.ticks()),
    }
    let json = duel.scene.snapshot().to_json().context("failed to encode snapshot")?;
    println!("{json}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
