#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Status effect engine that attaches, ticks and removes burn, freeze and
//! poison effects on enemies.
//!
//! Behaviour is looked up in a registration map keyed by [`EffectKind`]; each
//! entry is a set of plain function pointers, so new behaviours can be
//! registered without touching the effect data types.

use std::{collections::BTreeMap, fmt, time::Duration};

use card_defence_core::{
    ConfigError, DamageSource, EffectKind, EffectParams, EffectRemoval, EnemyId, Event, TowerId,
};

/// Enemy-side state that effect behaviours read and mutate.
pub trait EffectTarget {
    /// Identifier of the enemy carrying the effects.
    fn enemy_id(&self) -> EnemyId;

    /// Reports whether the enemy is neither dead nor arrived.
    fn is_active(&self) -> bool;

    /// Applies damage, reporting death through `out` when health runs out.
    fn take_damage(&mut self, amount: u32, source: DamageSource, out: &mut Vec<Event>);

    /// Multiplier currently applied to the enemy's base speed.
    fn slow_multiplier(&self) -> f32;

    /// Replaces the multiplier applied to the enemy's base speed.
    fn set_slow_multiplier(&mut self, multiplier: f32);
}

/// Kind-specific running state of an attached effect.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectState {
    /// Fixed damage every `interval`.
    Burn {
        /// Damage dealt on every tick.
        tick_damage: u32,
        /// Time between ticks.
        interval: Duration,
        /// Time accumulated since the previous tick.
        elapsed: Duration,
    },
    /// Speed cap.
    Freeze {
        /// Speed multiplier imposed while the effect lasts.
        factor: f32,
    },
    /// Escalating damage every `interval`.
    Poison {
        /// Damage before escalation.
        base_damage: u32,
        /// Time between ticks.
        interval: Duration,
        /// Time accumulated since the previous tick.
        elapsed: Duration,
        /// Growth applied to `stack_multiplier` after each tick when above one.
        escalation: f32,
        /// Current damage multiplier, starting at one.
        stack_multiplier: f32,
    },
}

/// Effect instance attached to an enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    remaining: Duration,
    source: Option<TowerId>,
    state: EffectState,
}

impl Effect {
    /// Creates a fresh effect instance from its application parameters.
    #[must_use]
    pub fn from_params(params: EffectParams, source: Option<TowerId>) -> Self {
        let state = match params {
            EffectParams::Burn {
                tick_damage,
                interval,
                ..
            } => EffectState::Burn {
                tick_damage,
                interval,
                elapsed: Duration::ZERO,
            },
            EffectParams::Freeze { factor, .. } => EffectState::Freeze { factor },
            EffectParams::Poison {
                tick_damage,
                interval,
                escalation,
                ..
            } => EffectState::Poison {
                base_damage: tick_damage,
                interval,
                elapsed: Duration::ZERO,
                escalation,
                stack_multiplier: 1.0,
            },
        };

        Self {
            remaining: params.duration(),
            source,
            state,
        }
    }

    /// Kind of the effect.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        match self.state {
            EffectState::Burn { .. } => EffectKind::Burn,
            EffectState::Freeze { .. } => EffectKind::Freeze,
            EffectState::Poison { .. } => EffectKind::Poison,
        }
    }

    /// Lifetime left before the effect expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Tower credited with the effect.
    #[must_use]
    pub const fn source(&self) -> Option<TowerId> {
        self.source
    }

    /// Kind-specific running state.
    #[must_use]
    pub const fn state(&self) -> &EffectState {
        &self.state
    }
}

/// Ordered list of effects attached to one enemy, holding at most one per kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectList {
    entries: Vec<Effect>,
}

impl EffectList {
    /// Creates an empty effect list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the attached effect of `kind`.
    #[must_use]
    pub fn get(&self, kind: EffectKind) -> Option<&Effect> {
        self.entries.iter().find(|effect| effect.kind() == kind)
    }

    /// Iterator over the attached effects in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.entries.iter()
    }

    /// Kinds of the attached effects in attachment order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.entries.iter().map(Effect::kind).collect()
    }

    /// Number of attached effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no effect is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, kind: EffectKind) -> Option<usize> {
        self.entries.iter().position(|effect| effect.kind() == kind)
    }
}

/// Handle describing an effect that was attached by [`EffectEngine::apply_effect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectHandle {
    /// Enemy carrying the effect.
    pub enemy: EnemyId,
    /// Kind of the attached effect.
    pub kind: EffectKind,
}

/// Hook invoked right after an effect is attached.
pub type ApplyHook = fn(&mut Effect, &mut dyn EffectTarget);
/// Hook invoked on every tick that the effect survives.
pub type TickHook = fn(&mut Effect, &mut dyn EffectTarget, Duration, &mut Vec<Event>);
/// Hook invoked when the effect expires or is replaced.
pub type RemoveHook = fn(&Effect, &mut dyn EffectTarget);

/// Dispatch entry describing how one effect kind behaves.
#[derive(Clone, Copy)]
pub struct EffectBehaviour {
    /// Runs once the effect is attached.
    pub on_apply: ApplyHook,
    /// Runs on every tick the effect survives.
    pub on_tick: TickHook,
    /// Runs once when the effect leaves the enemy.
    pub on_remove: RemoveHook,
}

impl fmt::Debug for EffectBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectBehaviour").finish_non_exhaustive()
    }
}

impl EffectBehaviour {
    /// Built-in burn behaviour: fixed damage on every interval.
    pub const BURN: Self = Self {
        on_apply: no_apply,
        on_tick: burn_tick,
        on_remove: no_remove,
    };

    /// Built-in freeze behaviour: caps the speed multiplier at the freeze factor.
    pub const FREEZE: Self = Self {
        on_apply: freeze_apply,
        on_tick: freeze_tick,
        on_remove: freeze_remove,
    };

    /// Built-in poison behaviour: escalating damage on every interval.
    pub const POISON: Self = Self {
        on_apply: no_apply,
        on_tick: poison_tick,
        on_remove: no_remove,
    };
}

/// Effect engine holding the per-kind dispatch table.
#[derive(Clone, Debug)]
pub struct EffectEngine {
    behaviours: BTreeMap<EffectKind, EffectBehaviour>,
}

impl Default for EffectEngine {
    fn default() -> Self {
        let mut engine = Self::empty();
        let _ = engine.register(EffectKind::Burn, EffectBehaviour::BURN);
        let _ = engine.register(EffectKind::Freeze, EffectBehaviour::FREEZE);
        let _ = engine.register(EffectKind::Poison, EffectBehaviour::POISON);
        engine
    }
}

impl EffectEngine {
    /// Creates an engine with the built-in burn, freeze and poison behaviours.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine without any registered behaviour.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            behaviours: BTreeMap::new(),
        }
    }

    /// Installs `behaviour` for `kind`, returning the behaviour it replaced.
    pub fn register(
        &mut self,
        kind: EffectKind,
        behaviour: EffectBehaviour,
    ) -> Option<EffectBehaviour> {
        self.behaviours.insert(kind, behaviour)
    }

    /// Removes the behaviour registered for `kind`.
    pub fn unregister(&mut self, kind: EffectKind) -> Option<EffectBehaviour> {
        self.behaviours.remove(&kind)
    }

    /// Reports whether `kind` has a registered behaviour.
    #[must_use]
    pub fn is_registered(&self, kind: EffectKind) -> bool {
        self.behaviours.contains_key(&kind)
    }

    /// Attaches a new effect to `target`, replacing any effect of the same kind.
    ///
    /// The replaced effect's removal hook runs before the new effect's apply
    /// hook, so a freeze unwinds its slow before the next one takes hold.
    /// Kinds without a registered behaviour are rejected and leave the list
    /// untouched.
    pub fn apply_effect(
        &self,
        effects: &mut EffectList,
        target: &mut dyn EffectTarget,
        params: EffectParams,
        source: Option<TowerId>,
        out: &mut Vec<Event>,
    ) -> Result<EffectHandle, ConfigError> {
        let kind = params.kind();
        let enemy = target.enemy_id();
        let Some(behaviour) = self.behaviours.get(&kind) else {
            tracing::warn!(kind = kind.id(), "effect kind has no registered behaviour");
            return Err(ConfigError::UnregisteredEffect(kind));
        };

        let existing = effects.position(kind);
        if let Some(index) = existing {
            (behaviour.on_remove)(&effects.entries[index], target);
            out.push(Event::EffectRemoved {
                enemy,
                kind,
                reason: EffectRemoval::Replaced,
            });
            tracing::debug!(enemy = enemy.get(), kind = kind.id(), "replacing effect");
        }

        let mut effect = Effect::from_params(params, source);
        (behaviour.on_apply)(&mut effect, target);
        match existing {
            Some(index) => effects.entries[index] = effect,
            None => effects.entries.push(effect),
        }

        out.push(Event::EffectApplied {
            enemy,
            kind,
            source,
        });
        Ok(EffectHandle { enemy, kind })
    }

    /// Advances every effect on `target` by `dt`.
    ///
    /// Expired effects run their removal hook and are dropped; survivors run
    /// their tick hook. Ticking stops as soon as the target turns terminal.
    /// Once no effect remains, the target's speed multiplier returns to one.
    pub fn tick(
        &self,
        effects: &mut EffectList,
        target: &mut dyn EffectTarget,
        dt: Duration,
        out: &mut Vec<Event>,
    ) {
        let enemy = target.enemy_id();
        let mut index = 0;
        while index < effects.entries.len() {
            if !target.is_active() {
                return;
            }

            let effect = &mut effects.entries[index];
            effect.remaining = effect.remaining.saturating_sub(dt);
            let kind = effect.kind();
            let behaviour = self.behaviours.get(&kind);

            if effect.remaining.is_zero() {
                let expired = effects.entries.remove(index);
                if let Some(behaviour) = behaviour {
                    (behaviour.on_remove)(&expired, target);
                }
                out.push(Event::EffectRemoved {
                    enemy,
                    kind,
                    reason: EffectRemoval::Expired,
                });
                continue;
            }

            if let Some(behaviour) = behaviour {
                (behaviour.on_tick)(effect, target, dt, out);
            }
            index += 1;
        }

        if effects.is_empty() && target.is_active() {
            target.set_slow_multiplier(1.0);
        }
    }
}

fn no_apply(_effect: &mut Effect, _target: &mut dyn EffectTarget) {}

fn no_remove(_effect: &Effect, _target: &mut dyn EffectTarget) {}

fn burn_tick(
    effect: &mut Effect,
    target: &mut dyn EffectTarget,
    dt: Duration,
    out: &mut Vec<Event>,
) {
    let source = effect.source;
    if let EffectState::Burn {
        tick_damage,
        interval,
        elapsed,
    } = &mut effect.state
    {
        *elapsed = elapsed.saturating_add(dt);
        if *elapsed >= *interval {
            *elapsed = Duration::ZERO;
            target.take_damage(
                *tick_damage,
                DamageSource::Effect {
                    kind: EffectKind::Burn,
                    tower: source,
                },
                out,
            );
        }
    }
}

fn poison_tick(
    effect: &mut Effect,
    target: &mut dyn EffectTarget,
    dt: Duration,
    out: &mut Vec<Event>,
) {
    let source = effect.source;
    if let EffectState::Poison {
        base_damage,
        interval,
        elapsed,
        escalation,
        stack_multiplier,
    } = &mut effect.state
    {
        *elapsed = elapsed.saturating_add(dt);
        if *elapsed >= *interval {
            *elapsed = Duration::ZERO;
            let damage = (*base_damage as f32 * *stack_multiplier).round() as u32;
            if *escalation > 1.0 {
                *stack_multiplier *= *escalation;
            }
            target.take_damage(
                damage,
                DamageSource::Effect {
                    kind: EffectKind::Poison,
                    tower: source,
                },
                out,
            );
        }
    }
}

fn freeze_apply(effect: &mut Effect, target: &mut dyn EffectTarget) {
    hold_freeze(effect, target);
}

fn freeze_tick(
    effect: &mut Effect,
    target: &mut dyn EffectTarget,
    _dt: Duration,
    _out: &mut Vec<Event>,
) {
    hold_freeze(effect, target);
}

fn hold_freeze(effect: &Effect, target: &mut dyn EffectTarget) {
    if let EffectState::Freeze { factor } = effect.state {
        let current = target.slow_multiplier();
        target.set_slow_multiplier(current.min(factor));
    }
}

fn freeze_remove(_effect: &Effect, target: &mut dyn EffectTarget) {
    target.set_slow_multiplier(1.0);
}
