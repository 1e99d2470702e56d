//! Projectiles in flight.

use std::time::Duration;

use card_defence_core::{BulletCard, EnemyId, ProjectileId, TowerId, Vec2};

/// Projectile travelling toward the position its target held at launch.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) impact: Vec2,
    pub(crate) remaining: Duration,
    pub(crate) card: BulletCard,
    /// Tick on which the projectile left the tower; flight starts counting
    /// on the following tick.
    pub(crate) launched_tick: u64,
}

impl Projectile {
    /// Advances the flight timer, reporting whether the projectile landed.
    pub(crate) fn advance(&mut self, tick_index: u64, dt: Duration) -> bool {
        if self.launched_tick != tick_index {
            self.remaining = self.remaining.saturating_sub(dt);
        }
        self.remaining.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_defence_core::{BulletConfig, BulletPayload};

    fn projectile(remaining: Duration) -> Projectile {
        Projectile {
            id: ProjectileId::new(0),
            tower: TowerId::new(0),
            target: EnemyId::new(0),
            impact: Vec2::ZERO,
            remaining,
            card: BulletCard::new(
                BulletConfig::new(12, Duration::from_millis(700), BulletPayload::Single),
                0,
            ),
            launched_tick: 5,
        }
    }

    #[test]
    fn flight_starts_on_the_following_tick() {
        let mut shot = projectile(Duration::from_millis(150));

        assert!(!shot.advance(5, Duration::from_millis(100)));
        assert_eq!(shot.remaining, Duration::from_millis(150));

        assert!(!shot.advance(6, Duration::from_millis(100)));
        assert!(shot.advance(7, Duration::from_millis(100)));
    }

    #[test]
    fn instant_flight_lands_on_launch_tick() {
        let mut shot = projectile(Duration::ZERO);
        assert!(shot.advance(5, Duration::from_millis(100)));
    }
}
