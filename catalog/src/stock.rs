use std::collections::BTreeMap;

use crate::{
    BulletType, Catalog, EnemyType, PayloadSpec, TowerType, UpgradeTier,
    SUPPORTED_CATALOG_VERSION,
};

const CELL_SIZE: f32 = 40.0;
const SELL_FACTOR: f32 = 0.5;

/// Built-in tables shipped with the engine.
pub(crate) fn catalog() -> Catalog {
    Catalog {
        version: SUPPORTED_CATALOG_VERSION,
        cell_size: CELL_SIZE,
        sell_factor: SELL_FACTOR,
        bullets: bullets(),
        enemies: enemies(),
        towers: towers(),
    }
}

fn bullets() -> BTreeMap<String, BulletType> {
    let entries = [
        ("archer-projectile", 12, 0.7, PayloadSpec::Single),
        (
            "magic-projectile",
            8,
            0.8,
            PayloadSpec::Slow {
                chance: 1.0,
                factor: 0.5,
                duration_secs: 2.0,
            },
        ),
        (
            "fire-projectile",
            10,
            1.2,
            PayloadSpec::Burn {
                tick_damage: 5,
                duration_secs: 3.0,
            },
        ),
        (
            "ice-projectile",
            15,
            1.5,
            PayloadSpec::Frost {
                chance: 1.0,
                factor: 0.7,
                duration_secs: 3.0,
                radius: 50.0,
            },
        ),
        (
            "poison-projectile",
            8,
            1.0,
            PayloadSpec::Poison {
                tick_damage: 4,
                duration_secs: 4.0,
                escalation: 1.0,
            },
        ),
        (
            "cannon-projectile",
            20,
            2.0,
            PayloadSpec::Splash { radius: 50.0 },
        ),
    ];

    entries
        .into_iter()
        .map(|(id, damage, cooldown_secs, payload)| {
            (
                id.to_owned(),
                BulletType {
                    damage,
                    cooldown_secs,
                    payload,
                },
            )
        })
        .collect()
}

fn enemies() -> BTreeMap<String, EnemyType> {
    let entries = [
        ("snail", 0.6, 100, 1, 7),
        ("turtle", 0.5, 220, 1, 10),
        ("hedgehog", 0.7, 150, 1, 8),
        ("rat", 0.95, 120, 1, 10),
        ("fox", 0.85, 250, 2, 15),
        ("boar", 0.7, 400, 3, 15),
        ("lion", 0.9, 350, 4, 20),
        ("dragon", 0.6, 800, 6, 25),
    ];

    entries
        .into_iter()
        .map(|(id, speed, health, damage, reward)| {
            (
                id.to_owned(),
                EnemyType {
                    speed,
                    health,
                    damage,
                    reward,
                },
            )
        })
        .collect()
}

fn tier(
    damage: u32,
    range: f32,
    attack_speed: f32,
    splash_radius: Option<f32>,
    cost: u32,
) -> UpgradeTier {
    UpgradeTier {
        damage,
        range,
        attack_speed,
        splash_radius,
        cost,
    }
}

fn towers() -> BTreeMap<String, TowerType> {
    let mut towers = BTreeMap::new();
    let _ = towers.insert(
        "archer".to_owned(),
        TowerType {
            damage: 20,
            range: 120.0,
            attack_speed: 1.0,
            cost: 50,
            projectile_speed: 300.0,
            splash_radius: 0.0,
            reload_secs: None,
            upgrades: vec![
                tier(20, 130.0, 1.5, None, 30),
                tier(40, 140.0, 1.5, None, 50),
            ],
        },
    );
    let _ = towers.insert(
        "magic".to_owned(),
        TowerType {
            damage: 40,
            range: 100.0,
            attack_speed: 0.5,
            cost: 150,
            projectile_speed: 250.0,
            splash_radius: 0.0,
            reload_secs: None,
            upgrades: vec![
                tier(60, 110.0, 0.5, None, 60),
                tier(60, 120.0, 1.0, None, 100),
            ],
        },
    );
    let _ = towers.insert(
        "cannon".to_owned(),
        TowerType {
            damage: 60,
            range: 80.0,
            attack_speed: 0.3,
            cost: 250,
            projectile_speed: 200.0,
            splash_radius: 40.0,
            reload_secs: None,
            upgrades: vec![
                tier(90, 90.0, 0.3, Some(60.0), 90),
                tier(135, 100.0, 0.5, Some(60.0), 150),
            ],
        },
    );
    towers
}
