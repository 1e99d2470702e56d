//! Scripted headless skirmish over a fixed serpentine path.

use std::time::Duration;

use card_defence_catalog::Catalog;
use card_defence_core::{Command, Event, Path, TowerId, Vec2};
use card_defence_world::{self as world, query, World, WorldConfig};

/// Parameters of a single skirmish run.
#[derive(Clone, Debug)]
pub(crate) struct SkirmishPlan {
    pub(crate) ticks: u32,
    pub(crate) tick: Duration,
    pub(crate) seed: u64,
    pub(crate) clock_speed: f32,
    pub(crate) slot_count: usize,
    /// Enemy types, spawned one every `spawn_every` ticks.
    pub(crate) enemies: Vec<String>,
    pub(crate) spawn_every: u32,
}

/// Tallies collected from the event stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) ticks: u32,
    pub(crate) spawned: u32,
    pub(crate) killed: u32,
    pub(crate) leaked: u32,
    pub(crate) base_damage: u32,
    pub(crate) rewards: u32,
    pub(crate) shots: u32,
    pub(crate) damage_dealt: u64,
    pub(crate) effects_applied: u32,
    pub(crate) shuffles: u32,
    pub(crate) rejections: u32,
    pub(crate) survivors: usize,
}

impl Report {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemySpawned { .. } => self.spawned += 1,
            Event::EnemyKilled { reward, .. } => {
                self.killed += 1;
                self.rewards += reward;
            }
            Event::EnemyReachedEnd { damage_to_base, .. } => {
                self.leaked += 1;
                self.base_damage += damage_to_base;
            }
            Event::TowerFired { .. } => self.shots += 1,
            Event::DamageDealt { amount, .. } => self.damage_dealt += u64::from(*amount),
            Event::EffectApplied { .. } => self.effects_applied += 1,
            Event::ShuffleCompleted { .. } => self.shuffles += 1,
            Event::ConfigurationRejected { .. } => self.rejections += 1,
            _ => {}
        }
    }

    /// Writes the summary through `tracing`.
    pub(crate) fn log(&self) {
        tracing::info!(
            ticks = self.ticks,
            spawned = self.spawned,
            killed = self.killed,
            leaked = self.leaked,
            survivors = self.survivors,
            "skirmish finished"
        );
        tracing::info!(
            shots = self.shots,
            damage = self.damage_dealt,
            effects = self.effects_applied,
            shuffles = self.shuffles,
            rewards = self.rewards,
            base_damage = self.base_damage,
            rejected = self.rejections,
            "combat summary"
        );
    }
}

fn serpentine() -> Path {
    Path::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(320.0, 0.0),
        Vec2::new(320.0, 160.0),
        Vec2::new(0.0, 160.0),
        Vec2::new(0.0, 320.0),
        Vec2::new(320.0, 320.0),
    ])
}

/// Towers and their decks, in build order.
const LAYOUT: [(&str, Vec2, [&str; 3]); 3] = [
    (
        "archer",
        Vec2::new(160.0, 80.0),
        ["archer-projectile", "fire-projectile", "archer-projectile"],
    ),
    (
        "magic",
        Vec2::new(160.0, 240.0),
        ["ice-projectile", "magic-projectile", "poison-projectile"],
    ),
    (
        "cannon",
        Vec2::new(260.0, 80.0),
        ["cannon-projectile", "cannon-projectile", "fire-projectile"],
    ),
];

fn setup_commands(slot_count: usize) -> Vec<Command> {
    let mut commands = Vec::new();
    for (index, (kind, position, deck)) in LAYOUT.into_iter().enumerate() {
        commands.push(Command::BuildTower {
            kind: kind.to_owned(),
            position,
        });
        let tower = TowerId::new(u32::try_from(index).unwrap_or(u32::MAX));
        for (slot, bullet) in deck.into_iter().enumerate().take(slot_count) {
            commands.push(Command::LoadBullet {
                tower,
                slot,
                bullet: bullet.to_owned(),
            });
        }
    }
    commands
}

/// Runs the plan against a fresh world and tallies what happened.
pub(crate) fn run(catalog: Catalog, plan: &SkirmishPlan) -> Report {
    let config = WorldConfig {
        slot_count: plan.slot_count,
        clock_speed: plan.clock_speed,
        ..WorldConfig::new(plan.seed)
    };
    let mut world = World::new(catalog, serpentine(), config);
    let mut report = Report::default();
    let mut events = Vec::new();

    for command in setup_commands(plan.slot_count) {
        world::apply(&mut world, command, &mut events);
    }

    let mut pending = plan.enemies.iter();
    for tick in 0..plan.ticks {
        if plan.spawn_every == 0 || tick % plan.spawn_every == 0 {
            if let Some(kind) = pending.next() {
                world::apply(
                    &mut world,
                    Command::SpawnEnemy { kind: kind.clone() },
                    &mut events,
                );
            }
        }
        world::apply(&mut world, Command::Tick { dt: plan.tick }, &mut events);

        for event in events.drain(..) {
            report.record(&event);
        }
    }
    for event in events.drain(..) {
        report.record(&event);
    }

    report.ticks = plan.ticks;
    report.survivors = query::enemy_view(&world)
        .iter()
        .filter(|enemy| enemy.is_active())
        .count();
    tracing::debug!(
        projectiles = query::projectile_count(&world),
        "projectiles still in flight"
    );
    report
}
