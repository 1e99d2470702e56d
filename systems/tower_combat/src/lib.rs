#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns projectile impacts into damage and effect orders.
//!
//! The resolver never touches enemies directly. It receives the live enemies
//! near an impact and emits [`HitOrder`] values that the world applies in
//! order, so a primary target killed by the direct hit simply ignores the
//! effect order that follows it.

use std::time::Duration;

use card_defence_core::{
    BulletCard, BulletPayload, DamageSource, EffectParams, EnemyId, TowerId, Vec2,
};
use rand::Rng;

/// Interval between burn damage ticks.
pub const BURN_TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Interval between poison damage ticks.
pub const POISON_TICK_INTERVAL: Duration = Duration::from_millis(500);
/// Scale applied to splash damage after distance falloff.
pub const SPLASH_DAMAGE_SCALE: f32 = 0.8;
/// Weakest freeze factor still applied by a frost splash.
pub const FROST_SPLASH_MIN_FACTOR: f32 = 0.1;

/// Time a projectile needs to cover the distance between two points.
///
/// Non-positive or non-finite speeds resolve instantly.
#[must_use]
pub fn flight_time(from: Vec2, to: Vec2, speed: f32) -> Duration {
    if !speed.is_finite() || speed <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(from.distance(to) / speed).unwrap_or(Duration::ZERO)
}

/// Live enemy that an impact may affect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactCandidate {
    /// Enemy identifier.
    pub id: EnemyId,
    /// Position at the moment of impact.
    pub position: Vec2,
}

/// Instruction produced by an impact, applied by the world in emission order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitOrder {
    /// Deal damage to an enemy.
    Damage {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Damage amount.
        amount: u32,
        /// Attribution of the damage.
        source: DamageSource,
    },
    /// Attach a status effect to an enemy if it is still active.
    Effect {
        /// Enemy receiving the effect.
        enemy: EnemyId,
        /// Effect parameters.
        params: EffectParams,
        /// Tower credited with the effect.
        source: TowerId,
    },
}

/// Impact resolver that reuses a scratch buffer between projectiles.
#[derive(Debug, Default)]
pub struct ProjectileResolver {
    scratch: Vec<HitOrder>,
}

impl ProjectileResolver {
    /// Creates a new resolver with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the impact of `card` fired by `tower` at `impact`.
    ///
    /// `candidates` lists every live enemy; the primary target counts as hit
    /// only when it appears among them. Area payloads resolve around the
    /// impact point even when the primary target is gone. Orders are appended
    /// to `out`.
    pub fn resolve<R>(
        &mut self,
        tower: TowerId,
        card: &BulletCard,
        primary: EnemyId,
        impact: Vec2,
        candidates: &[ImpactCandidate],
        rng: &mut R,
        out: &mut Vec<HitOrder>,
    ) where
        R: Rng,
    {
        self.scratch.clear();

        let primary_alive = candidates.iter().any(|candidate| candidate.id == primary);
        if primary_alive {
            self.scratch.push(HitOrder::Damage {
                enemy: primary,
                amount: card.damage(),
                source: DamageSource::Hit {
                    tower,
                    bullet: card.kind(),
                },
            });
        }

        match card.config().payload {
            BulletPayload::Single => {}
            BulletPayload::Slow {
                chance,
                factor,
                duration,
            } => {
                if primary_alive && roll(rng, chance) {
                    self.push_effect(primary, EffectParams::Freeze { factor, duration }, tower);
                }
            }
            BulletPayload::Burn {
                tick_damage,
                duration,
            } => {
                if primary_alive {
                    let params = EffectParams::Burn {
                        tick_damage,
                        interval: BURN_TICK_INTERVAL,
                        duration,
                    };
                    self.push_effect(primary, params, tower);
                }
            }
            BulletPayload::Poison {
                tick_damage,
                duration,
                escalation,
            } => {
                if primary_alive {
                    let params = EffectParams::Poison {
                        tick_damage,
                        interval: POISON_TICK_INTERVAL,
                        duration,
                        escalation,
                    };
                    self.push_effect(primary, params, tower);
                }
            }
            BulletPayload::Splash { radius } => {
                for (candidate, falloff) in surrounding(candidates, primary, impact, radius) {
                    let amount =
                        (card.damage() as f32 * falloff * SPLASH_DAMAGE_SCALE).floor() as u32;
                    if amount == 0 {
                        continue;
                    }
                    self.scratch.push(HitOrder::Damage {
                        enemy: candidate.id,
                        amount,
                        source: DamageSource::Splash { tower },
                    });
                }
            }
            BulletPayload::Frost {
                chance,
                factor,
                duration,
                radius,
            } => {
                if primary_alive && roll(rng, chance) {
                    self.push_effect(primary, EffectParams::Freeze { factor, duration }, tower);
                }

                for (candidate, falloff) in surrounding(candidates, primary, impact, radius) {
                    let scaled = factor * falloff;
                    if roll(rng, chance) && scaled > FROST_SPLASH_MIN_FACTOR {
                        let params = EffectParams::Freeze {
                            factor: scaled,
                            duration: duration.mul_f32(falloff),
                        };
                        self.push_effect(candidate.id, params, tower);
                    }
                }
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn push_effect(&mut self, enemy: EnemyId, params: EffectParams, source: TowerId) {
        self.scratch.push(HitOrder::Effect {
            enemy,
            params,
            source,
        });
    }
}

fn roll<R>(rng: &mut R, chance: f32) -> bool
where
    R: Rng,
{
    rng.gen::<f32>() < chance
}

/// Enemies other than `primary` within `radius` of `impact`, paired with the
/// falloff `1 - distance / radius`.
fn surrounding<'a>(
    candidates: &'a [ImpactCandidate],
    primary: EnemyId,
    impact: Vec2,
    radius: f32,
) -> impl Iterator<Item = (&'a ImpactCandidate, f32)> + 'a {
    let usable = radius.is_finite() && radius > 0.0;
    candidates
        .iter()
        .filter(move |candidate| usable && candidate.id != primary)
        .filter_map(move |candidate| {
            let distance = candidate.position.distance(impact);
            (distance <= radius).then(|| (candidate, (1.0 - distance / radius).clamp(0.0, 1.0)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_defence_core::{BulletConfig, BulletKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn card(damage: u32, payload: BulletPayload) -> BulletCard {
        BulletCard::new(BulletConfig::new(damage, Duration::from_secs(1), payload), 0)
    }

    fn candidate(id: u32, x: f32) -> ImpactCandidate {
        ImpactCandidate {
            id: EnemyId::new(id),
            position: Vec2::new(x, 0.0),
        }
    }

    fn resolve(card: &BulletCard, primary: u32, candidates: &[ImpactCandidate]) -> Vec<HitOrder> {
        let mut resolver = ProjectileResolver::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut out = Vec::new();
        resolver.resolve(
            TowerId::new(1),
            card,
            EnemyId::new(primary),
            Vec2::ZERO,
            candidates,
            &mut rng,
            &mut out,
        );
        out
    }

    fn damage_to(orders: &[HitOrder], enemy: u32) -> Option<u32> {
        orders.iter().find_map(|order| match order {
            HitOrder::Damage {
                enemy: id, amount, ..
            } if id.get() == enemy => Some(*amount),
            _ => None,
        })
    }

    fn freeze_on(orders: &[HitOrder], enemy: u32) -> Option<(f32, Duration)> {
        orders.iter().find_map(|order| match order {
            HitOrder::Effect {
                enemy: id,
                params: EffectParams::Freeze { factor, duration },
                ..
            } if id.get() == enemy => Some((*factor, *duration)),
            _ => None,
        })
    }

    #[test]
    fn flight_time_divides_distance_by_speed() {
        let time = flight_time(Vec2::ZERO, Vec2::new(300.0, 400.0), 250.0);
        assert_eq!(time, Duration::from_secs(2));
        assert_eq!(flight_time(Vec2::ZERO, Vec2::new(5.0, 0.0), 0.0), Duration::ZERO);
    }

    #[test]
    fn single_hit_damages_live_primary_only() {
        let bullet = card(12, BulletPayload::Single);
        let orders = resolve(&bullet, 1, &[candidate(1, 0.0), candidate(2, 5.0)]);

        assert_eq!(
            orders,
            vec![HitOrder::Damage {
                enemy: EnemyId::new(1),
                amount: 12,
                source: DamageSource::Hit {
                    tower: TowerId::new(1),
                    bullet: BulletKind::Archer,
                },
            }]
        );
        assert!(resolve(&bullet, 9, &[candidate(1, 0.0)]).is_empty());
    }

    #[test]
    fn fire_and_poison_attach_effects_with_fixed_intervals() {
        let fire = card(
            10,
            BulletPayload::Burn {
                tick_damage: 5,
                duration: Duration::from_secs(3),
            },
        );
        let orders = resolve(&fire, 1, &[candidate(1, 0.0)]);
        assert!(matches!(
            orders[1],
            HitOrder::Effect {
                params: EffectParams::Burn {
                    tick_damage: 5,
                    interval: BURN_TICK_INTERVAL,
                    ..
                },
                ..
            }
        ));

        let poison = card(
            8,
            BulletPayload::Poison {
                tick_damage: 4,
                duration: Duration::from_secs(4),
                escalation: 1.0,
            },
        );
        let orders = resolve(&poison, 1, &[candidate(1, 0.0)]);
        assert!(matches!(
            orders[1],
            HitOrder::Effect {
                params: EffectParams::Poison {
                    interval: POISON_TICK_INTERVAL,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn splash_falls_off_to_zero_at_radius() {
        let cannon = card(20, BulletPayload::Splash { radius: 50.0 });
        let orders = resolve(
            &cannon,
            1,
            &[
                candidate(1, 0.0),
                candidate(2, 0.0),
                candidate(3, 25.0),
                candidate(4, 50.0),
                candidate(5, 80.0),
            ],
        );

        assert_eq!(damage_to(&orders, 1), Some(20));
        assert_eq!(damage_to(&orders, 2), Some(16));
        assert_eq!(damage_to(&orders, 3), Some(8));
        assert_eq!(damage_to(&orders, 4), None);
        assert_eq!(damage_to(&orders, 5), None);
    }

    #[test]
    fn splash_resolves_when_primary_is_gone() {
        let cannon = card(20, BulletPayload::Splash { radius: 50.0 });
        let orders = resolve(&cannon, 1, &[candidate(2, 10.0)]);

        assert_eq!(damage_to(&orders, 1), None);
        assert_eq!(damage_to(&orders, 2), Some(12));
    }

    #[test]
    fn frost_weakens_with_distance() {
        let ice = card(
            15,
            BulletPayload::Frost {
                chance: 1.0,
                factor: 0.7,
                duration: Duration::from_secs(3),
                radius: 50.0,
            },
        );
        let orders = resolve(
            &ice,
            1,
            &[candidate(1, 0.0), candidate(2, 25.0), candidate(3, 45.0)],
        );

        assert_eq!(damage_to(&orders, 1), Some(15));
        assert_eq!(freeze_on(&orders, 1), Some((0.7, Duration::from_secs(3))));

        let (factor, duration) = freeze_on(&orders, 2).expect("half-strength freeze");
        assert!((factor - 0.35).abs() < 1e-6);
        assert_eq!(duration, Duration::from_millis(1500));

        // 0.7 * 0.1 falls below the weakest applied factor.
        assert_eq!(freeze_on(&orders, 3), None);
        assert_eq!(damage_to(&orders, 2), None);
    }

    #[test]
    fn zero_chance_slow_never_applies() {
        let magic = card(
            8,
            BulletPayload::Slow {
                chance: 0.0,
                factor: 0.5,
                duration: Duration::from_secs(2),
            },
        );
        let orders = resolve(&magic, 1, &[candidate(1, 0.0)]);

        assert_eq!(orders.len(), 1);
        assert_eq!(freeze_on(&orders, 1), None);
    }
}
