#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for Card Defence.
//!
//! The world owns enemies, towers and projectiles. Every mutation goes
//! through [`apply`], which runs a tick as a fixed sequence of phases:
//! terminal enemies from the previous tick are compacted away, status
//! effects tick, enemies move, towers pick targets and fire, and projectiles
//! whose flight completes resolve into damage and effects.

mod enemies;
mod projectiles;
mod towers;

use std::{fmt, time::Duration};

use card_defence_catalog::Catalog;
use card_defence_core::{
    BulletConfig, Command, ConfigError, EnemyId, Event, PathSource, ProjectileId, TowerId, Vec2,
};
use card_defence_system_ammunition::ShuffleProgress;
use card_defence_system_effects::{EffectEngine, EffectTarget};
use card_defence_system_tower_combat::{flight_time, HitOrder, ImpactCandidate, ProjectileResolver};
use card_defence_system_tower_targeting::{TowerTarget, TowerTargeting};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    enemies::{Enemy, EnemyStats},
    projectiles::Projectile,
    towers::{TowerRegistry, TowerState},
};

const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_SLOT_COUNT: usize = 3;
const DEFAULT_RELOAD_TIME: Duration = Duration::from_secs(2);

/// Tuning knobs applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Seed of the generator used for chance rolls.
    pub seed: u64,
    /// Number of ammunition slots given to every new tower.
    pub slot_count: usize,
    /// Shuffle duration for tower types that do not configure one.
    pub reload_time: Duration,
    /// Initial clock speed multiplier.
    pub clock_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl WorldConfig {
    /// Creates the default configuration with a custom seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            slot_count: DEFAULT_SLOT_COUNT,
            reload_time: DEFAULT_RELOAD_TIME,
            clock_speed: 1.0,
        }
    }
}

/// Represents the authoritative combat state.
pub struct World {
    catalog: Catalog,
    path: Box<dyn PathSource>,
    config: WorldConfig,
    clock_speed: f32,
    tick_index: u64,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
    effects: EffectEngine,
    targeting: TowerTargeting,
    resolver: ProjectileResolver,
    rng: ChaCha8Rng,
    target_scratch: Vec<TowerTarget>,
    candidate_scratch: Vec<ImpactCandidate>,
    order_scratch: Vec<HitOrder>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick_index", &self.tick_index)
            .field("clock_speed", &self.clock_speed)
            .field("path_len", &self.path.len())
            .field("enemies", &self.enemies.len())
            .field("projectiles", &self.projectiles.len())
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world over `path` using the balance tables in `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog, path: impl PathSource + 'static, config: WorldConfig) -> Self {
        let clock_speed = if valid_clock_speed(config.clock_speed) {
            config.clock_speed
        } else {
            tracing::warn!(
                clock_speed = config.clock_speed,
                "invalid initial clock speed; running at 1x"
            );
            1.0
        };

        Self {
            catalog,
            path: Box::new(path),
            config,
            clock_speed,
            tick_index: 0,
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            effects: EffectEngine::new(),
            targeting: TowerTargeting::new(),
            resolver: ProjectileResolver::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            target_scratch: Vec::new(),
            candidate_scratch: Vec::new(),
            order_scratch: Vec::new(),
        }
    }

    /// Effect dispatch table, open for registering custom behaviours.
    pub fn effect_engine_mut(&mut self) -> &mut EffectEngine {
        &mut self.effects
    }

    fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        let index = self.enemies.binary_search_by_key(&id, Enemy::id).ok()?;
        self.enemies.get_mut(index)
    }

    fn spawn_enemy(
        &mut self,
        kind: String,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ConfigError> {
        let enemy_type = self.catalog.enemy(&kind)?;
        let stats = EnemyStats {
            health: enemy_type.health,
            base_speed: enemy_type.speed * self.catalog.cell_size(),
            damage_to_base: enemy_type.damage,
            reward: enemy_type.reward,
        };

        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let start = self.path.point(0).unwrap_or_else(|| {
            tracing::error!(
                enemy = id.get(),
                "path has no starting point; spawning at the origin"
            );
            Vec2::ZERO
        });
        tracing::debug!(enemy = id.get(), kind = %kind, "enemy spawned");
        self.enemies.push(Enemy::spawn(id, kind.clone(), stats, start));
        out_events.push(Event::EnemySpawned { enemy: id, kind });
        Ok(())
    }

    fn build_tower(
        &mut self,
        kind: String,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ConfigError> {
        let tower_type = self.catalog.tower(&kind)?;
        let cost = tower_type.cost;
        let id = self.towers.allocate();
        let state = TowerState::build(
            id,
            kind.clone(),
            position,
            tower_type,
            self.config.reload_time,
            self.config.slot_count,
        );
        self.towers.insert(state);
        out_events.push(Event::TowerBuilt {
            tower: id,
            kind,
            position,
            cost,
        });
        Ok(())
    }

    fn configure_slot(
        &mut self,
        tower: TowerId,
        slot: usize,
        bullet: Option<BulletConfig>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ConfigError> {
        let state = self
            .towers
            .get_mut(tower)
            .ok_or(ConfigError::UnknownTower(tower))?;
        state.deck.configure_slot(slot, bullet)?;
        let was_shuffling = state.deck.is_shuffling();
        state.deck.compile();
        out_events.push(Event::SlotConfigured {
            tower,
            slot,
            bullet: bullet.map(|config| config.kind()),
        });
        if was_shuffling {
            out_events.push(Event::ShuffleCancelled { tower });
        }
        Ok(())
    }

    fn upgrade_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ConfigError> {
        let state = self
            .towers
            .get_mut(tower)
            .ok_or(ConfigError::UnknownTower(tower))?;
        let cost = state.upgrade().ok_or(ConfigError::MaxUpgradeReached {
            tower,
            level: state.upgrade_level,
        })?;
        out_events.push(Event::TowerUpgraded {
            tower,
            level: state.upgrade_level,
            cost,
        });
        Ok(())
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let dt = Duration::try_from_secs_f64(dt.as_secs_f64() * f64::from(self.clock_speed))
            .unwrap_or(dt);
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.compact_enemies(out_events);
        self.tick_effects(dt, out_events);
        self.move_enemies(dt, out_events);
        self.operate_towers(dt, out_events);
        self.resolve_projectiles(dt, out_events);
    }

    fn compact_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|enemy| {
            let keep = enemy.is_active();
            if !keep {
                out_events.push(Event::EnemyRemoved { enemy: enemy.id() });
            }
            keep
        });
    }

    fn tick_effects(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if enemy.is_active() {
                self.effects
                    .tick(&mut enemy.effects, &mut enemy.vitals, dt, out_events);
            }
        }
    }

    fn move_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            enemy.advance(&*self.path, dt, out_events);
        }
    }

    fn operate_towers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for tower in self.towers.iter_mut() {
            tower.cooldown_remaining = tower.cooldown_remaining.saturating_sub(dt);
            match tower.deck.tick_shuffle(dt) {
                ShuffleProgress::Idle => {}
                ShuffleProgress::Shuffling { remaining } => {
                    out_events.push(Event::ShuffleProgressed {
                        tower: tower.id,
                        remaining,
                    });
                }
                ShuffleProgress::Completed => {
                    out_events.push(Event::ShuffleCompleted { tower: tower.id });
                }
            }
        }

        let enemies = query::enemy_view(self);
        let towers = query::tower_view(self);
        self.targeting
            .handle(&towers, &enemies, &mut self.target_scratch);

        for tower in self.towers.iter_mut() {
            tower.target = self
                .target_scratch
                .binary_search_by_key(&tower.id, |target| target.tower)
                .ok()
                .map(|index| self.target_scratch[index].enemy);

            let Some(target) = tower.target else {
                continue;
            };
            if !tower.cooldown_remaining.is_zero() {
                continue;
            }
            let Some(enemy) = enemies.get(target) else {
                continue;
            };

            let was_shuffling = tower.deck.is_shuffling();
            let card = tower.deck.draw(tower.reload_time);
            if !was_shuffling && tower.deck.is_shuffling() {
                out_events.push(Event::ShuffleStarted {
                    tower: tower.id,
                    duration: tower.reload_time,
                });
            }
            let Some(card) = card else {
                continue;
            };

            let projectile = self.next_projectile_id;
            self.next_projectile_id = ProjectileId::new(projectile.get().saturating_add(1));
            self.projectiles.push(Projectile {
                id: projectile,
                tower: tower.id,
                target,
                impact: enemy.position,
                remaining: flight_time(tower.position, enemy.position, tower.projectile_speed),
                card,
                launched_tick: self.tick_index,
            });

            tower.cooldown_remaining = card.cooldown();
            tower.deck.discard(card);
            out_events.push(Event::TowerFired {
                tower: tower.id,
                target,
                projectile,
                bullet: card.kind(),
            });
        }
    }

    fn resolve_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let tick_index = self.tick_index;
        let mut landed = Vec::new();
        self.projectiles.retain_mut(|projectile| {
            if projectile.advance(tick_index, dt) {
                landed.push(projectile.clone());
                false
            } else {
                true
            }
        });

        for projectile in landed {
            self.candidate_scratch.clear();
            self.candidate_scratch.extend(
                self.enemies
                    .iter()
                    .filter(|enemy| enemy.is_active())
                    .map(|enemy| ImpactCandidate {
                        id: enemy.id(),
                        position: enemy.position,
                    }),
            );

            out_events.push(Event::ProjectileImpacted {
                projectile: projectile.id,
                tower: projectile.tower,
                position: projectile.impact,
            });

            self.order_scratch.clear();
            self.resolver.resolve(
                projectile.tower,
                &projectile.card,
                projectile.target,
                projectile.impact,
                &self.candidate_scratch,
                &mut self.rng,
                &mut self.order_scratch,
            );

            let orders = std::mem::take(&mut self.order_scratch);
            for order in &orders {
                self.apply_hit(*order, out_events);
            }
            self.order_scratch = orders;
        }
    }

    fn apply_hit(&mut self, order: HitOrder, out_events: &mut Vec<Event>) {
        match order {
            HitOrder::Damage {
                enemy,
                amount,
                source,
            } => {
                if let Some(enemy) = self.enemy_mut(enemy) {
                    enemy.vitals.take_damage(amount, source, out_events);
                }
            }
            HitOrder::Effect {
                enemy,
                params,
                source,
            } => {
                let Some(index) = self
                    .enemies
                    .binary_search_by_key(&enemy, Enemy::id)
                    .ok()
                    .filter(|index| self.enemies[*index].is_active())
                else {
                    return;
                };
                let target = &mut self.enemies[index];
                if let Err(error) = self.effects.apply_effect(
                    &mut target.effects,
                    &mut target.vitals,
                    params,
                    Some(source),
                    out_events,
                ) {
                    reject(error, out_events);
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Configuration problems never halt the simulation: they are logged and
/// reported as [`Event::ConfigurationRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::Tick { dt } => {
            world.tick(dt, out_events);
            Ok(())
        }
        Command::SetClockSpeed { multiplier } => {
            if valid_clock_speed(multiplier) {
                world.clock_speed = multiplier;
                Ok(())
            } else {
                Err(ConfigError::InvalidClockSpeed(multiplier))
            }
        }
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::BuildTower { kind, position } => world.build_tower(kind, position, out_events),
        Command::RemoveTower { tower } => match world.towers.remove(tower) {
            Some(state) => {
                out_events.push(Event::TowerRemoved {
                    tower,
                    refund: state.refund(world.catalog.sell_factor),
                });
                Ok(())
            }
            None => Err(ConfigError::UnknownTower(tower)),
        },
        Command::UpgradeTower { tower } => world.upgrade_tower(tower, out_events),
        Command::ConfigureSlot {
            tower,
            slot,
            bullet,
        } => world.configure_slot(tower, slot, bullet, out_events),
        Command::LoadBullet {
            tower,
            slot,
            bullet,
        } => match world.catalog.bullet(&bullet) {
            Ok(config) => world.configure_slot(tower, slot, Some(config), out_events),
            Err(error) => Err(error),
        },
    };

    if let Err(error) = outcome {
        reject(error, out_events);
    }
}

fn reject(error: ConfigError, out_events: &mut Vec<Event>) {
    tracing::warn!(%error, "configuration rejected");
    out_events.push(Event::ConfigurationRejected { error });
}

fn valid_clock_speed(multiplier: f32) -> bool {
    multiplier.is_finite() && multiplier > 0.0
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use card_defence_catalog::Catalog;
    use card_defence_core::{EnemyId, EnemySnapshot, EnemyView, TowerId, TowerSnapshot, TowerView};

    /// Captures every enemy still in the population, including enemies that
    /// turned terminal this tick.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a single enemy.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<EnemySnapshot> {
        world
            .enemies
            .binary_search_by_key(&id, |enemy| enemy.id())
            .ok()
            .map(|index| world.enemies[index].snapshot())
    }

    /// Captures every tower in ascending identifier order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a single tower.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(id).map(|tower| tower.snapshot())
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectile_count(world: &World) -> usize {
        world.projectiles.len()
    }

    /// Current clock speed multiplier.
    #[must_use]
    pub fn clock_speed(world: &World) -> f32 {
        world.clock_speed
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Balance tables the world was created with.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_defence_core::Path;

    fn world() -> World {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(400.0, 0.0)]);
        World::new(Catalog::default(), path, WorldConfig::default())
    }

    #[test]
    fn invalid_initial_clock_speed_falls_back_to_real_time() {
        let config = WorldConfig {
            clock_speed: f32::NAN,
            ..WorldConfig::default()
        };
        let world = World::new(Catalog::default(), Path::default(), config);
        assert_eq!(query::clock_speed(&world), 1.0);
    }

    #[test]
    fn enemy_ids_follow_spawn_order() {
        let mut world = world();
        let mut events = Vec::new();
        for kind in ["snail", "dragon", "rat"] {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    kind: kind.to_owned(),
                },
                &mut events,
            );
        }

        let kinds: Vec<_> = query::enemy_view(&world)
            .iter()
            .map(|enemy| (enemy.id.get(), enemy.kind.clone()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, "snail".to_owned()),
                (1, "dragon".to_owned()),
                (2, "rat".to_owned()),
            ]
        );
    }

    #[test]
    fn catalog_speed_is_converted_to_world_units() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: "snail".to_owned(),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );

        let snail = query::enemy(&world, EnemyId::new(0)).expect("snail spawned");
        assert!((snail.position.x - 24.0).abs() < 1e-3);
    }

    #[test]
    fn unknown_enemy_type_is_rejected() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: "unicorn".to_owned(),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ConfigurationRejected {
                error: ConfigError::UnknownEnemyType("unicorn".to_owned()),
            }]
        );
        assert!(query::enemy_view(&world).is_empty());
    }
}
