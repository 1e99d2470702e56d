#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets from world snapshots.
//!
//! A tower keeps its current target while that enemy is active and in range.
//! Otherwise it switches to the active enemy in range that travelled furthest
//! along the path, preferring the earlier spawn on ties.

use card_defence_core::{EnemyId, EnemyView, TowerId, TowerView, Vec2};

/// Target chosen for a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy the tower should fire at.
    pub enemy: EnemyId,
}

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it; towers without a
    /// reachable enemy produce no entry.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let range_sq = tower.range * tower.range;
            let in_range = |candidate: &EnemyCandidate| {
                candidate.position.distance_squared(tower.position) <= range_sq
            };

            let kept = tower.target.and_then(|current| {
                self.enemy_workspace
                    .iter()
                    .find(|candidate| candidate.id == current)
                    .filter(|candidate| in_range(candidate))
            });

            let chosen = kept.or_else(|| {
                let mut best: Option<&EnemyCandidate> = None;
                for candidate in self.enemy_workspace.iter().filter(|c| in_range(c)) {
                    match best {
                        Some(existing) if candidate.travelled <= existing.travelled => {}
                        _ => best = Some(candidate),
                    }
                }
                best
            });

            if let Some(candidate) = chosen {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter().filter(|snapshot| snapshot.is_active()) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                travelled: snapshot.travelled(),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    travelled: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_defence_core::{DeckSnapshot, EnemySnapshot, TowerSnapshot};
    use std::time::Duration;

    fn tower(id: u32, position: Vec2, range: f32, target: Option<u32>) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: "archer".to_owned(),
            position,
            damage: 20,
            range,
            attack_speed: 1.0,
            splash_radius: 0.0,
            upgrade_level: 0,
            cooldown_remaining: Duration::ZERO,
            target: target.map(EnemyId::new),
            deck: DeckSnapshot::default(),
        }
    }

    fn enemy(id: u32, position: Vec2, path_index: usize, path_progress: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: "snail".to_owned(),
            position,
            health: 100,
            max_health: 100,
            path_index,
            path_progress,
            slow_multiplier: 1.0,
            effects: Vec::new(),
            is_dead: false,
            has_reached_end: false,
        }
    }

    fn run(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<TowerTarget> {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );
        out
    }

    #[test]
    fn furthest_along_path_wins() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, None)],
            vec![
                enemy(1, Vec2::new(50.0, 0.0), 0, 0.2),
                enemy(2, Vec2::new(90.0, 0.0), 0, 0.8),
            ],
        );

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
            }]
        );
    }

    #[test]
    fn path_index_outranks_progress() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 200.0, None)],
            vec![
                enemy(1, Vec2::new(10.0, 0.0), 0, 0.9),
                enemy(2, Vec2::new(20.0, 0.0), 1, 0.1),
            ],
        );

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, None)],
            vec![enemy(1, Vec2::new(121.0, 0.0), 3, 0.5)],
        );

        assert!(out.is_empty());
    }

    #[test]
    fn enemy_on_range_boundary_is_reachable() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 100.0, None)],
            vec![enemy(1, Vec2::new(60.0, 80.0), 0, 0.0)],
        );

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn earlier_spawn_wins_ties() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, None)],
            vec![
                enemy(7, Vec2::new(30.0, 0.0), 2, 0.5),
                enemy(3, Vec2::new(-30.0, 0.0), 2, 0.5),
            ],
        );

        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn valid_current_target_is_kept() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, Some(1))],
            vec![
                enemy(1, Vec2::new(50.0, 0.0), 0, 0.2),
                enemy(2, Vec2::new(90.0, 0.0), 0, 0.8),
            ],
        );

        assert_eq!(out[0].enemy, EnemyId::new(1));
    }

    #[test]
    fn terminal_current_target_is_replaced() {
        let mut dead = enemy(1, Vec2::new(50.0, 0.0), 0, 0.9);
        dead.is_dead = true;
        dead.health = -5;
        let mut arrived = enemy(2, Vec2::new(60.0, 0.0), 4, 0.0);
        arrived.has_reached_end = true;

        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, Some(1))],
            vec![dead, arrived, enemy(3, Vec2::new(70.0, 0.0), 0, 0.1)],
        );

        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn current_target_leaving_range_is_replaced() {
        let out = run(
            vec![tower(1, Vec2::ZERO, 120.0, Some(1))],
            vec![
                enemy(1, Vec2::new(200.0, 0.0), 5, 0.0),
                enemy(2, Vec2::new(40.0, 0.0), 0, 0.5),
            ],
        );

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn each_tower_gets_its_own_target() {
        let out = run(
            vec![
                tower(2, Vec2::new(500.0, 0.0), 100.0, None),
                tower(1, Vec2::ZERO, 100.0, None),
            ],
            vec![
                enemy(1, Vec2::new(10.0, 0.0), 0, 0.1),
                enemy(2, Vec2::new(480.0, 0.0), 3, 0.1),
            ],
        );

        assert_eq!(
            out,
            vec![
                TowerTarget {
                    tower: TowerId::new(1),
                    enemy: EnemyId::new(1),
                },
                TowerTarget {
                    tower: TowerId::new(2),
                    enemy: EnemyId::new(2),
                },
            ]
        );
    }

    #[test]
    fn output_is_cleared_when_nothing_to_target() {
        let mut system = TowerTargeting::new();
        let mut out = vec![TowerTarget {
            tower: TowerId::new(9),
            enemy: EnemyId::new(9),
        }];

        system.handle(
            &TowerView::from_snapshots(vec![tower(1, Vec2::ZERO, 120.0, None)]),
            &EnemyView::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }
}
