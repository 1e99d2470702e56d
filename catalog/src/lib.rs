#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Balance tables for bullets, enemies and towers.
//!
//! A [`Catalog`] is either the built-in stock table set returned by
//! [`Catalog::default`] or a TOML document loaded with [`Catalog::load`].
//! Every loaded catalog is validated before it is handed out, so the world
//! can convert entries into engine values without further checks.

mod stock;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use card_defence_core::{BulletConfig, BulletKind, BulletPayload, ConfigError};
use serde::{Deserialize, Serialize};

/// Catalog document version understood by this crate.
pub const SUPPORTED_CATALOG_VERSION: u32 = 1;

/// Complete set of balance tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Document version; must equal [`SUPPORTED_CATALOG_VERSION`].
    pub version: u32,
    /// Edge length of a path cell in world units.
    pub cell_size: f32,
    /// Share of the build cost refunded when a tower is removed.
    #[serde(default = "default_sell_factor")]
    pub sell_factor: f32,
    /// Bullet types keyed by bullet identifier.
    pub bullets: BTreeMap<String, BulletType>,
    /// Enemy types keyed by enemy identifier.
    pub enemies: BTreeMap<String, EnemyType>,
    /// Tower types keyed by tower identifier.
    pub towers: BTreeMap<String, TowerType>,
}

/// Bullet type entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulletType {
    /// Direct damage dealt on impact.
    pub damage: u32,
    /// Tower cooldown after firing, in seconds.
    pub cooldown_secs: f64,
    /// On-hit behaviour.
    pub payload: PayloadSpec,
}

/// On-hit behaviour of a bullet type as written in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayloadSpec {
    /// Plain damage.
    Single,
    /// Chance to slow the primary target.
    Slow {
        /// Probability in `[0, 1]`.
        chance: f32,
        /// Speed multiplier in `(0, 1]`.
        factor: f32,
        /// Lifetime in seconds.
        duration_secs: f64,
    },
    /// Burn on the primary target.
    Burn {
        /// Damage per burn tick.
        tick_damage: u32,
        /// Lifetime in seconds.
        duration_secs: f64,
    },
    /// Poison on the primary target.
    Poison {
        /// Damage of the first poison tick.
        tick_damage: u32,
        /// Lifetime in seconds.
        duration_secs: f64,
        /// Damage growth per tick; one disables growth.
        #[serde(default = "default_escalation")]
        escalation: f32,
    },
    /// Falloff damage around the impact.
    Splash {
        /// Radius in world units.
        radius: f32,
    },
    /// Freeze on the primary target and a weakening freeze around the impact.
    Frost {
        /// Probability in `[0, 1]`.
        chance: f32,
        /// Speed multiplier in `(0, 1]` applied to the primary target.
        factor: f32,
        /// Lifetime in seconds on the primary target.
        duration_secs: f64,
        /// Radius in world units.
        radius: f32,
    },
}

fn default_sell_factor() -> f32 {
    0.5
}

fn default_escalation() -> f32 {
    1.0
}

/// Enemy type entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemyType {
    /// Movement speed in path cells per second.
    pub speed: f32,
    /// Health at spawn.
    pub health: u32,
    /// Damage dealt to the base on arrival.
    pub damage: u32,
    /// Reward granted on death.
    pub reward: u32,
}

/// Tower type entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TowerType {
    /// Nominal damage.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Nominal attacks per second.
    pub attack_speed: f32,
    /// Build cost.
    pub cost: u32,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Splash radius in world units.
    #[serde(default)]
    pub splash_radius: f32,
    /// Shuffle duration in seconds; the world default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_secs: Option<f64>,
    /// Upgrade tiers in application order.
    #[serde(default)]
    pub upgrades: Vec<UpgradeTier>,
}

impl TowerType {
    /// Shuffle duration configured for the tower type.
    #[must_use]
    pub fn reload_time(&self) -> Option<Duration> {
        self.reload_secs.map(secs)
    }
}

/// Stats replaced by one tower upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeTier {
    /// Damage after the upgrade.
    pub damage: u32,
    /// Targeting radius after the upgrade.
    pub range: f32,
    /// Attacks per second after the upgrade.
    pub attack_speed: f32,
    /// Splash radius after the upgrade; unchanged when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_radius: Option<f32>,
    /// Cost of the upgrade.
    pub cost: u32,
}

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog at {}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog document is not valid TOML for the catalog schema.
    #[error("failed to parse catalog toml contents")]
    Parse(#[from] toml::de::Error),
    /// The document version is not supported.
    #[error("unsupported catalog version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Version understood by this crate.
        expected: u32,
    },
    /// A bullet entry is keyed by an unknown identifier.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A bullet entry carries a payload belonging to another bullet kind.
    #[error("bullet `{id}` carries a {found:?} payload")]
    PayloadMismatch {
        /// Bullet identifier.
        id: String,
        /// Kind implied by the payload.
        found: BulletKind,
    },
    /// A numeric field lies outside its valid range.
    #[error("`{entry}` field `{field}` has invalid value {value}")]
    InvalidValue {
        /// Entry holding the field.
        entry: String,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

impl Default for Catalog {
    fn default() -> Self {
        stock::catalog()
    }
}

impl Catalog {
    /// Reads, parses and validates the catalog stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            bullets = catalog.bullets.len(),
            enemies = catalog.enemies.len(),
            towers = catalog.towers.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses and validates a catalog document.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks versions, identifiers and numeric ranges of every entry.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version != SUPPORTED_CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: self.version,
                expected: SUPPORTED_CATALOG_VERSION,
            });
        }
        positive("catalog", "cell_size", self.cell_size.into())?;
        unit("catalog", "sell_factor", self.sell_factor.into())?;

        for (id, bullet) in &self.bullets {
            let kind = BulletKind::from_id(id)?;
            let found = bullet.payload.kind();
            if found != kind {
                return Err(CatalogError::PayloadMismatch {
                    id: id.clone(),
                    found,
                });
            }
            non_negative(id, "cooldown_secs", bullet.cooldown_secs)?;
            bullet.payload.validate(id)?;
        }

        for (id, enemy) in &self.enemies {
            positive(id, "speed", enemy.speed.into())?;
        }

        for (id, tower) in &self.towers {
            positive(id, "range", tower.range.into())?;
            positive(id, "attack_speed", tower.attack_speed.into())?;
            positive(id, "projectile_speed", tower.projectile_speed.into())?;
            non_negative(id, "splash_radius", tower.splash_radius.into())?;
            if let Some(reload) = tower.reload_secs {
                non_negative(id, "reload_secs", reload)?;
            }
            for tier in &tower.upgrades {
                positive(id, "upgrades.range", tier.range.into())?;
                positive(id, "upgrades.attack_speed", tier.attack_speed.into())?;
                if let Some(radius) = tier.splash_radius {
                    non_negative(id, "upgrades.splash_radius", radius.into())?;
                }
            }
        }

        Ok(())
    }

    /// Edge length of a path cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Resolves a bullet identifier into an engine bullet configuration.
    pub fn bullet(&self, id: &str) -> Result<BulletConfig, ConfigError> {
        self.bullets
            .get(id)
            .map(BulletType::to_config)
            .ok_or_else(|| ConfigError::UnknownBulletType(id.to_owned()))
    }

    /// Looks up an enemy type.
    pub fn enemy(&self, id: &str) -> Result<&EnemyType, ConfigError> {
        self.enemies
            .get(id)
            .ok_or_else(|| ConfigError::UnknownEnemyType(id.to_owned()))
    }

    /// Looks up a tower type.
    pub fn tower(&self, id: &str) -> Result<&TowerType, ConfigError> {
        self.towers
            .get(id)
            .ok_or_else(|| ConfigError::UnknownTowerType(id.to_owned()))
    }

    /// Identifiers of every enemy type in ascending order.
    pub fn enemy_ids(&self) -> impl Iterator<Item = &str> {
        self.enemies.keys().map(String::as_str)
    }

    /// Identifiers of every bullet type in ascending order.
    pub fn bullet_ids(&self) -> impl Iterator<Item = &str> {
        self.bullets.keys().map(String::as_str)
    }
}

impl BulletType {
    /// Converts the entry into an engine bullet configuration.
    #[must_use]
    pub fn to_config(&self) -> BulletConfig {
        BulletConfig::new(self.damage, secs(self.cooldown_secs), self.payload.to_payload())
    }
}

impl PayloadSpec {
    /// Bullet kind implied by the payload.
    #[must_use]
    pub fn kind(&self) -> BulletKind {
        self.to_payload().kind()
    }

    /// Converts the entry into an engine payload.
    #[must_use]
    pub fn to_payload(&self) -> BulletPayload {
        match *self {
            Self::Single => BulletPayload::Single,
            Self::Slow {
                chance,
                factor,
                duration_secs,
            } => BulletPayload::Slow {
                chance,
                factor,
                duration: secs(duration_secs),
            },
            Self::Burn {
                tick_damage,
                duration_secs,
            } => BulletPayload::Burn {
                tick_damage,
                duration: secs(duration_secs),
            },
            Self::Poison {
                tick_damage,
                duration_secs,
                escalation,
            } => BulletPayload::Poison {
                tick_damage,
                duration: secs(duration_secs),
                escalation,
            },
            Self::Splash { radius } => BulletPayload::Splash { radius },
            Self::Frost {
                chance,
                factor,
                duration_secs,
                radius,
            } => BulletPayload::Frost {
                chance,
                factor,
                duration: secs(duration_secs),
                radius,
            },
        }
    }

    fn validate(&self, id: &str) -> Result<(), CatalogError> {
        match *self {
            Self::Single => Ok(()),
            Self::Slow {
                chance,
                factor,
                duration_secs,
            } => {
                unit(id, "chance", chance.into())?;
                slow_factor(id, factor.into())?;
                non_negative(id, "duration_secs", duration_secs)
            }
            Self::Burn { duration_secs, .. } => non_negative(id, "duration_secs", duration_secs),
            Self::Poison {
                duration_secs,
                escalation,
                ..
            } => {
                non_negative(id, "duration_secs", duration_secs)?;
                positive(id, "escalation", escalation.into())
            }
            Self::Splash { radius } => positive(id, "radius", radius.into()),
            Self::Frost {
                chance,
                factor,
                duration_secs,
                radius,
            } => {
                unit(id, "chance", chance.into())?;
                slow_factor(id, factor.into())?;
                non_negative(id, "duration_secs", duration_secs)?;
                positive(id, "radius", radius.into())
            }
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

fn invalid(entry: &str, field: &'static str, value: f64) -> CatalogError {
    CatalogError::InvalidValue {
        entry: entry.to_owned(),
        field,
        value,
    }
}

fn positive(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(entry, field, value))
    }
}

fn non_negative(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(entry, field, value))
    }
}

fn unit(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(entry, field, value))
    }
}

fn slow_factor(entry: &str, value: f64) -> Result<(), CatalogError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(entry, "factor", value))
    }
}
