#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Card Defence combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for renderers and
//! ledgers to react to. Systems consume immutable snapshots and respond with
//! plain data that the world applies in a fixed order.

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    ///
    /// The world scales `dt` by its clock speed before any timer observes it.
    Tick {
        /// Real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Changes the multiplier applied to every subsequent tick.
    SetClockSpeed {
        /// Finite, positive scale factor for elapsed time.
        multiplier: f32,
    },
    /// Requests that a new enemy of the given catalog type enters the path.
    SpawnEnemy {
        /// Catalog identifier of the enemy type.
        kind: String,
    },
    /// Requests construction of a tower at a world position.
    BuildTower {
        /// Catalog identifier of the tower type.
        kind: String,
        /// Centre of the tower expressed in world units.
        position: Vec2,
    },
    /// Requests removal of an existing tower.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Requests that a tower advances to its next upgrade tier.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Sets or clears one ammunition slot of a tower and recompiles its deck.
    ConfigureSlot {
        /// Tower that owns the slot.
        tower: TowerId,
        /// Zero-based slot index.
        slot: usize,
        /// Bullet loaded into the slot, or `None` to clear it.
        bullet: Option<BulletConfig>,
    },
    /// Loads a catalog bullet type into a tower slot and recompiles its deck.
    LoadBullet {
        /// Tower that owns the slot.
        tower: TowerId,
        /// Zero-based slot index.
        slot: usize,
        /// Catalog identifier of the bullet type, e.g. `archer-projectile`.
        bullet: String,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Catalog type of the enemy.
        kind: String,
    },
    /// Reports damage applied to an enemy.
    DamageDealt {
        /// Enemy that received the damage.
        enemy: EnemyId,
        /// Amount subtracted from the enemy's health.
        amount: u32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Reports that a status effect was attached to an enemy.
    EffectApplied {
        /// Enemy carrying the effect.
        enemy: EnemyId,
        /// Kind of effect that was attached.
        kind: EffectKind,
        /// Tower credited with the effect, if any.
        source: Option<TowerId>,
    },
    /// Reports that a status effect left an enemy.
    EffectRemoved {
        /// Enemy that carried the effect.
        enemy: EnemyId,
        /// Kind of effect that was removed.
        kind: EffectKind,
        /// Why the effect was removed.
        reason: EffectRemoval,
    },
    /// Reports that an enemy died. The ledger grants the reward and counts the kill.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Money awarded for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyReachedEnd {
        /// Enemy that arrived.
        enemy: EnemyId,
        /// Lives subtracted from the base.
        damage_to_base: u32,
    },
    /// Confirms that a terminal enemy was removed from the population.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that a tower was built.
    TowerBuilt {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Catalog type of the tower.
        kind: String,
        /// Centre of the tower in world units.
        position: Vec2,
        /// Build price for the external ledger to charge.
        cost: u32,
    },
    /// Confirms that a tower was removed together with its deck.
    TowerRemoved {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Share of the build price for the external ledger to return.
        refund: u32,
    },
    /// Confirms that a tower advanced to a new upgrade tier.
    TowerUpgraded {
        /// Upgraded tower.
        tower: TowerId,
        /// Upgrade level reached, starting at one for the first tier.
        level: u32,
        /// Price of the tier for the external ledger to charge.
        cost: u32,
    },
    /// Confirms that a tower slot changed and the deck was recompiled.
    SlotConfigured {
        /// Tower owning the slot.
        tower: TowerId,
        /// Slot index that changed.
        slot: usize,
        /// Bullet now occupying the slot.
        bullet: Option<BulletKind>,
    },
    /// Reports that a tower launched a projectile.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted at launch.
        target: EnemyId,
        /// Identifier of the launched projectile.
        projectile: ProjectileId,
        /// Bullet card consumed by the shot.
        bullet: BulletKind,
    },
    /// Reports that a projectile reached its captured impact point.
    ProjectileImpacted {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Tower that launched it, which may no longer exist.
        tower: TowerId,
        /// Impact point in world units.
        position: Vec2,
    },
    /// Reports that a tower began reshuffling its discard pile.
    ShuffleStarted {
        /// Tower whose deck is shuffling.
        tower: TowerId,
        /// Time until the draw pile is restored.
        duration: Duration,
    },
    /// Reports the remaining shuffle time for reload indicators.
    ShuffleProgressed {
        /// Tower whose deck is shuffling.
        tower: TowerId,
        /// Time left before the shuffle completes.
        remaining: Duration,
    },
    /// Reports that a tower's draw pile was restored.
    ShuffleCompleted {
        /// Tower whose deck finished shuffling.
        tower: TowerId,
    },
    /// Reports that recompiling a deck aborted its running shuffle.
    ShuffleCancelled {
        /// Tower whose deck was recompiled.
        tower: TowerId,
    },
    /// Reports a rejected command or misconfigured card. The simulation continues.
    ConfigurationRejected {
        /// Description of the configuration problem.
        error: ConfigError,
    },
}

/// Origin of damage applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Direct projectile hit on the primary target.
    Hit {
        /// Tower that launched the projectile.
        tower: TowerId,
        /// Bullet type of the projectile.
        bullet: BulletKind,
    },
    /// Area damage next to a cannon impact.
    Splash {
        /// Tower that launched the projectile.
        tower: TowerId,
    },
    /// Periodic damage dealt by a status effect.
    Effect {
        /// Kind of effect dealing the damage.
        kind: EffectKind,
        /// Tower credited with the effect, if any.
        tower: Option<TowerId>,
    },
}

/// Reason a status effect was detached from an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectRemoval {
    /// The effect ran out of duration.
    Expired,
    /// A newer effect of the same kind took its place.
    Replaced,
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated in spawn order, so ascending identifiers match
/// the population order used to break targeting ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of status effects that can be attached to enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    /// Periodic fire damage.
    Burn,
    /// Movement slow.
    Freeze,
    /// Periodic damage that may escalate with every tick.
    Poison,
}

impl EffectKind {
    /// Every effect kind known to the engine.
    pub const ALL: [EffectKind; 3] = [Self::Burn, Self::Freeze, Self::Poison];

    /// Stable textual identifier used by configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Burn => "burn",
            Self::Freeze => "freeze",
            Self::Poison => "poison",
        }
    }

    /// Parses a textual identifier produced by [`EffectKind::id`].
    pub fn from_id(id: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| ConfigError::UnknownEffectKind(id.to_owned()))
    }
}

/// Parameters of a status effect at the moment it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectParams {
    /// Fixed damage every `interval`.
    Burn {
        /// Damage dealt on every tick.
        tick_damage: u32,
        /// Time between ticks.
        interval: Duration,
        /// Total lifetime of the effect.
        duration: Duration,
    },
    /// Caps the enemy's speed multiplier at `factor`.
    Freeze {
        /// Speed multiplier in `(0, 1]`; smaller is slower.
        factor: f32,
        /// Total lifetime of the effect.
        duration: Duration,
    },
    /// Damage every `interval`, multiplied by `escalation` after each tick.
    Poison {
        /// Damage dealt on the first tick.
        tick_damage: u32,
        /// Time between ticks.
        interval: Duration,
        /// Total lifetime of the effect.
        duration: Duration,
        /// Growth of the damage multiplier per tick; values at or below one disable growth.
        escalation: f32,
    },
}

impl EffectParams {
    /// Kind of effect described by the parameters.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Burn { .. } => EffectKind::Burn,
            Self::Freeze { .. } => EffectKind::Freeze,
            Self::Poison { .. } => EffectKind::Poison,
        }
    }

    /// Lifetime of the effect.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::Burn { duration, .. }
            | Self::Freeze { duration, .. }
            | Self::Poison { duration, .. } => *duration,
        }
    }
}

/// Bullet types that can be loaded into tower slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BulletKind {
    /// Fast single-target arrow.
    Archer,
    /// Single-target orb that slows.
    Magic,
    /// Fireball that ignites its target.
    Fire,
    /// Ice ball that freezes an area.
    Ice,
    /// Venom that poisons its target.
    Poison,
    /// Shell that splashes damage around the impact.
    Cannon,
}

impl BulletKind {
    /// Every bullet kind known to the engine.
    pub const ALL: [BulletKind; 6] = [
        Self::Archer,
        Self::Magic,
        Self::Fire,
        Self::Ice,
        Self::Poison,
        Self::Cannon,
    ];

    /// Stable textual identifier used by the catalog.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Archer => "archer-projectile",
            Self::Magic => "magic-projectile",
            Self::Fire => "fire-projectile",
            Self::Ice => "ice-projectile",
            Self::Poison => "poison-projectile",
            Self::Cannon => "cannon-projectile",
        }
    }

    /// Parses a textual identifier produced by [`BulletKind::id`].
    pub fn from_id(id: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| ConfigError::UnknownBulletType(id.to_owned()))
    }
}

/// On-hit behaviour carried by a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BulletPayload {
    /// Plain damage to the primary target.
    Single,
    /// Damage plus a chance to slow the primary target.
    Slow {
        /// Probability in `[0, 1]` that the slow is applied.
        chance: f32,
        /// Speed multiplier imposed by the slow.
        factor: f32,
        /// Lifetime of the slow.
        duration: Duration,
    },
    /// Damage plus a burn on the primary target.
    Burn {
        /// Damage dealt on every burn tick.
        tick_damage: u32,
        /// Lifetime of the burn.
        duration: Duration,
    },
    /// Damage plus poison on the primary target.
    Poison {
        /// Damage dealt on the first poison tick.
        tick_damage: u32,
        /// Lifetime of the poison.
        duration: Duration,
        /// Multiplier applied to the poison damage after every tick.
        escalation: f32,
    },
    /// Full damage to the primary target and falloff damage around the impact.
    Splash {
        /// Radius of the splash in world units.
        radius: f32,
    },
    /// Damage and freeze on the primary target plus a weakening freeze around the impact.
    Frost {
        /// Probability in `[0, 1]` that each freeze is applied.
        chance: f32,
        /// Speed multiplier imposed on the primary target.
        factor: f32,
        /// Lifetime of the freeze on the primary target.
        duration: Duration,
        /// Radius of the freeze area in world units.
        radius: f32,
    },
}

impl BulletPayload {
    /// Bullet kind implied by the payload.
    #[must_use]
    pub const fn kind(&self) -> BulletKind {
        match self {
            Self::Single => BulletKind::Archer,
            Self::Slow { .. } => BulletKind::Magic,
            Self::Burn { .. } => BulletKind::Fire,
            Self::Poison { .. } => BulletKind::Poison,
            Self::Splash { .. } => BulletKind::Cannon,
            Self::Frost { .. } => BulletKind::Ice,
        }
    }
}

/// Configuration of a bullet loaded into a tower slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletConfig {
    /// Direct damage dealt on impact.
    pub damage: u32,
    /// Attack cooldown imposed on the tower after firing this bullet.
    pub cooldown: Duration,
    /// Type-specific behaviour on impact.
    pub payload: BulletPayload,
}

impl BulletConfig {
    /// Creates a new bullet configuration.
    #[must_use]
    pub const fn new(damage: u32, cooldown: Duration, payload: BulletPayload) -> Self {
        Self {
            damage,
            cooldown,
            payload,
        }
    }

    /// Bullet kind implied by the payload.
    #[must_use]
    pub const fn kind(&self) -> BulletKind {
        self.payload.kind()
    }
}

/// Snapshot of a slot's bullet that cycles through a tower's piles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletCard {
    config: BulletConfig,
    home_slot: usize,
}

impl BulletCard {
    /// Captures a card for the bullet loaded in `home_slot`.
    #[must_use]
    pub const fn new(config: BulletConfig, home_slot: usize) -> Self {
        Self { config, home_slot }
    }

    /// Bullet configuration captured when the deck was compiled.
    #[must_use]
    pub const fn config(&self) -> &BulletConfig {
        &self.config
    }

    /// Slot the card was compiled from; defines the order after reshuffle.
    #[must_use]
    pub const fn home_slot(&self) -> usize {
        self.home_slot
    }

    /// Bullet kind of the card.
    #[must_use]
    pub const fn kind(&self) -> BulletKind {
        self.config.kind()
    }

    /// Direct damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.config.damage
    }

    /// Attack cooldown imposed after firing the card.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.config.cooldown
    }
}

/// Path geometry supplied by the map collaborator.
pub trait PathSource {
    /// Returns the path node at `index`, or `None` past the end.
    fn point(&self, index: usize) -> Option<Vec2>;

    /// Number of nodes along the path.
    fn len(&self) -> usize;

    /// Reports whether the path has no nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Polyline path stored as a list of world-space nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Vec2>,
}

impl Path {
    /// Creates a path visiting the provided nodes in order.
    #[must_use]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Nodes of the path.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl PathSource for Path {
    fn point(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Catalog type of the enemy.
    pub kind: String,
    /// Current position in world units.
    pub position: Vec2,
    /// Health remaining; negative after an overkill.
    pub health: i32,
    /// Health at spawn.
    pub max_health: u32,
    /// Index of the path node the enemy last passed.
    pub path_index: usize,
    /// Progress in `[0, 1)` toward the next path node.
    pub path_progress: f32,
    /// Multiplier applied to the base speed by active slows.
    pub slow_multiplier: f32,
    /// Kinds of the effects currently attached, in attachment order.
    pub effects: Vec<EffectKind>,
    /// Set once the enemy died.
    pub is_dead: bool,
    /// Set once the enemy reached the end of the path.
    pub has_reached_end: bool,
}

impl EnemySnapshot {
    /// Distance travelled along the path measured in nodes.
    #[must_use]
    pub fn travelled(&self) -> f32 {
        self.path_index as f32 + self.path_progress
    }

    /// Reports whether the enemy can still be targeted and damaged.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_dead && !self.has_reached_end
    }

    /// Health clamped at zero for display purposes.
    #[must_use]
    pub fn display_health(&self) -> u32 {
        u32::try_from(self.health.max(0)).unwrap_or(0)
    }
}

/// Read-only snapshot describing every enemy in the population.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in population order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// State of a tower's ammunition deck exposed to reload indicators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckSnapshot {
    /// Bullet kind occupying each slot, in slot order.
    pub slots: Vec<Option<BulletKind>>,
    /// Cards waiting in the draw pile.
    pub draw_pile: usize,
    /// Cards waiting in the discard pile.
    pub discard_pile: usize,
    /// Time left in the current shuffle, if one is running.
    pub shuffle_remaining: Option<Duration>,
}

impl DeckSnapshot {
    /// Reports whether the deck is shuffling.
    #[must_use]
    pub const fn is_shuffling(&self) -> bool {
        self.shuffle_remaining.is_some()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Catalog type of the tower.
    pub kind: String,
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Nominal damage of the tower's current tier.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Nominal attacks per second of the current tier.
    pub attack_speed: f32,
    /// Nominal splash radius in world units; zero for single-target towers.
    pub splash_radius: f32,
    /// Upgrade tiers applied so far.
    pub upgrade_level: u32,
    /// Time until the tower may fire again.
    pub cooldown_remaining: Duration,
    /// Enemy currently targeted.
    pub target: Option<EnemyId>,
    /// Ammunition deck state.
    pub deck: DeckSnapshot,
}

/// Read-only snapshot describing every tower.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Configuration problems reported instead of halting the simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The bullet type identifier is not known.
    #[error("unknown bullet type `{0}`")]
    UnknownBulletType(String),
    /// The effect kind identifier is not known.
    #[error("unknown effect kind `{0}`")]
    UnknownEffectKind(String),
    /// No behaviour is registered for the effect kind.
    #[error("no behaviour registered for effect kind {0:?}")]
    UnregisteredEffect(EffectKind),
    /// The slot index lies outside the deck.
    #[error("slot {index} is out of bounds for a deck of {len} slots")]
    SlotOutOfBounds {
        /// Requested slot index.
        index: usize,
        /// Number of slots in the deck.
        len: usize,
    },
    /// No tower with the identifier exists.
    #[error("tower {0:?} does not exist")]
    UnknownTower(TowerId),
    /// The enemy type identifier is not known.
    #[error("unknown enemy type `{0}`")]
    UnknownEnemyType(String),
    /// The tower type identifier is not known.
    #[error("unknown tower type `{0}`")]
    UnknownTowerType(String),
    /// The tower already applied every upgrade tier.
    #[error("tower {tower:?} has no upgrade beyond level {level}")]
    MaxUpgradeReached {
        /// Tower that was asked to upgrade.
        tower: TowerId,
        /// Level the tower already reached.
        level: u32,
    },
    /// The clock speed multiplier is not a finite positive number.
    #[error("clock speed {0} must be finite and positive")]
    InvalidClockSpeed(f32),
}
