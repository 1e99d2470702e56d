//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use card_defence_catalog::{TowerType, UpgradeTier};
use card_defence_core::{EnemyId, TowerId, TowerSnapshot, Vec2};
use card_defence_system_ammunition::AmmunitionDeck;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Catalog type the tower was built from.
    pub(crate) kind: String,
    /// Centre of the tower in world units.
    pub(crate) position: Vec2,
    pub(crate) damage: u32,
    pub(crate) range: f32,
    pub(crate) attack_speed: f32,
    pub(crate) splash_radius: f32,
    pub(crate) projectile_speed: f32,
    /// Build price paid for the tower, excluding upgrades.
    pub(crate) cost: u32,
    /// Shuffle duration handed to the deck.
    pub(crate) reload_time: Duration,
    pub(crate) upgrade_level: u32,
    /// Tiers still to be applied, in order.
    pub(crate) upgrades: Vec<UpgradeTier>,
    pub(crate) cooldown_remaining: Duration,
    pub(crate) target: Option<EnemyId>,
    pub(crate) deck: AmmunitionDeck,
}

impl TowerState {
    pub(crate) fn build(
        id: TowerId,
        kind: String,
        position: Vec2,
        tower_type: &TowerType,
        reload_time: Duration,
        slot_count: usize,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            damage: tower_type.damage,
            range: tower_type.range,
            attack_speed: tower_type.attack_speed,
            splash_radius: tower_type.splash_radius,
            projectile_speed: tower_type.projectile_speed,
            cost: tower_type.cost,
            reload_time: tower_type.reload_time().unwrap_or(reload_time),
            upgrade_level: 0,
            upgrades: tower_type.upgrades.clone(),
            cooldown_remaining: Duration::ZERO,
            target: None,
            deck: AmmunitionDeck::new(slot_count),
        }
    }

    /// Applies the next upgrade tier, returning its cost, or `None` once every
    /// tier has been applied.
    pub(crate) fn upgrade(&mut self) -> Option<u32> {
        let index = usize::try_from(self.upgrade_level).ok()?;
        let tier = self.upgrades.get(index)?;

        self.damage = tier.damage;
        self.range = tier.range;
        self.attack_speed = tier.attack_speed;
        if let Some(radius) = tier.splash_radius {
            self.splash_radius = radius;
        }
        self.upgrade_level += 1;
        Some(tier.cost)
    }

    /// Money returned when the tower is removed, rounded down.
    pub(crate) fn refund(&self, sell_factor: f32) -> u32 {
        (f64::from(self.cost) * f64::from(sell_factor)).floor() as u32
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind.clone(),
            position: self.position,
            damage: self.damage,
            range: self.range,
            attack_speed: self.attack_speed,
            splash_radius: self.splash_radius,
            upgrade_level: self.upgrade_level,
            cooldown_remaining: self.cooldown_remaining,
            target: self.target,
            deck: self.deck.snapshot(),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Reserves the identifier for the next tower.
    pub(crate) fn allocate(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, state: TowerState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
