//! Enemy state: health, terminal flags and movement along the path.

use std::time::Duration;

use card_defence_core::{DamageSource, EnemyId, EnemySnapshot, Event, PathSource, Vec2};
use card_defence_system_effects::{EffectList, EffectTarget};

/// Segments shorter than this are treated as zero-length and skipped.
const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// Health, speed modifier and terminal flags of an enemy.
///
/// Split from [`Enemy`] so the effect engine can borrow it mutably alongside
/// the enemy's effect list.
#[derive(Clone, Debug)]
pub(crate) struct Vitals {
    pub(crate) id: EnemyId,
    pub(crate) health: i32,
    pub(crate) max_health: u32,
    pub(crate) reward: u32,
    pub(crate) slow_multiplier: f32,
    pub(crate) is_dead: bool,
    pub(crate) has_reached_end: bool,
}

impl EffectTarget for Vitals {
    fn enemy_id(&self) -> EnemyId {
        self.id
    }

    fn is_active(&self) -> bool {
        !self.is_dead && !self.has_reached_end
    }

    fn take_damage(&mut self, amount: u32, source: DamageSource, out: &mut Vec<Event>) {
        if !self.is_active() {
            return;
        }

        let amount_signed = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount_signed);
        out.push(Event::DamageDealt {
            enemy: self.id,
            amount,
            source,
        });

        if self.health <= 0 {
            self.is_dead = true;
            tracing::debug!(enemy = self.id.get(), reward = self.reward, "enemy killed");
            out.push(Event::EnemyKilled {
                enemy: self.id,
                reward: self.reward,
            });
        }
    }

    fn slow_multiplier(&self) -> f32 {
        self.slow_multiplier
    }

    fn set_slow_multiplier(&mut self, multiplier: f32) {
        self.slow_multiplier = multiplier;
    }
}

/// Enemy walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: String,
    pub(crate) vitals: Vitals,
    pub(crate) effects: EffectList,
    /// World units per second before slows.
    pub(crate) base_speed: f32,
    pub(crate) damage_to_base: u32,
    pub(crate) path_index: usize,
    pub(crate) path_progress: f32,
    pub(crate) position: Vec2,
}

/// Catalog-derived stats used to spawn an enemy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EnemyStats {
    pub(crate) health: u32,
    pub(crate) base_speed: f32,
    pub(crate) damage_to_base: u32,
    pub(crate) reward: u32,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: String, stats: EnemyStats, start: Vec2) -> Self {
        Self {
            kind,
            vitals: Vitals {
                id,
                health: i32::try_from(stats.health).unwrap_or(i32::MAX),
                max_health: stats.health,
                reward: stats.reward,
                slow_multiplier: 1.0,
                is_dead: false,
                has_reached_end: false,
            },
            effects: EffectList::new(),
            base_speed: stats.base_speed,
            damage_to_base: stats.damage_to_base,
            path_index: 0,
            path_progress: 0.0,
            position: start,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.vitals.id
    }

    pub(crate) fn is_active(&self) -> bool {
        self.vitals.is_active()
    }

    /// Moves the enemy along `path`, carrying leftover distance into the
    /// following segments.
    pub(crate) fn advance(&mut self, path: &dyn PathSource, dt: Duration, out: &mut Vec<Event>) {
        if !self.is_active() {
            return;
        }

        let mut budget = self.base_speed * self.vitals.slow_multiplier * dt.as_secs_f32();
        loop {
            if self.path_index + 1 >= path.len() {
                match path.point(self.path_index) {
                    Some(last) => self.position = last,
                    None => tracing::error!(
                        enemy = self.id().get(),
                        path_index = self.path_index,
                        "final path point missing; forcing enemy to the end"
                    ),
                }
                self.reach_end(out);
                return;
            }

            let (Some(from), Some(to)) = (
                path.point(self.path_index),
                path.point(self.path_index + 1),
            ) else {
                tracing::error!(
                    enemy = self.id().get(),
                    path_index = self.path_index,
                    "path point missing; forcing enemy to the end"
                );
                self.reach_end(out);
                return;
            };

            let segment = from.distance(to);
            if segment < MIN_SEGMENT_LENGTH {
                self.path_index += 1;
                self.path_progress = 0.0;
                self.position = to;
                continue;
            }

            let left_on_segment = segment * (1.0 - self.path_progress);
            if budget < left_on_segment {
                self.path_progress += budget / segment;
                self.position = from.lerp(to, self.path_progress);
                return;
            }

            budget -= left_on_segment;
            self.path_index += 1;
            self.path_progress = 0.0;
            self.position = to;
        }
    }

    fn reach_end(&mut self, out: &mut Vec<Event>) {
        self.vitals.has_reached_end = true;
        tracing::debug!(enemy = self.id().get(), "enemy reached the end of the path");
        out.push(Event::EnemyReachedEnd {
            enemy: self.id(),
            damage_to_base: self.damage_to_base,
        });
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id(),
            kind: self.kind.clone(),
            position: self.position,
            health: self.vitals.health,
            max_health: self.vitals.max_health,
            path_index: self.path_index,
            path_progress: self.path_progress,
            slow_multiplier: self.vitals.slow_multiplier,
            effects: self.effects.kinds(),
            is_dead: self.vitals.is_dead,
            has_reached_end: self.vitals.has_reached_end,
        }
    }
}
