use serde::{Deserialize, Serialize};

/// A points counter that always stays within `[0, maximum]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPool")]
pub struct Pool {
    current: i32,
    maximum: i32,
}

#[derive(Deserialize)]
struct RawPool {
    #[serde(default)]
    current: Option<i32>,
    maximum: i32,
}

impl From<RawPool> for Pool {
    fn from(raw: RawPool) -> Self {
        let mut pool = Pool::full(raw.maximum);
        if let Some(current) = raw.current {
            pool.set(current);
        }
        pool
    }
}

impl Pool {
    pub fn full(maximum: i32) -> Self {
        let maximum = maximum.max(0);
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn set(&mut self, value: i32) {
        self.current = value.clamp(0, self.maximum);
    }

    /// Removes up to `amount` points. Returns how many were actually removed.
    pub fn drain(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.set(before - amount.max(0));
        before - self.current
    }

    /// Adds up to `amount` points. Returns how many were actually added.
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.set(before.saturating_add(amount.max(0)));
        self.current - before
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// The four combat ratings. Missing fields deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ratings {
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub initiative: i32,
}

impl std::ops::Add for Ratings {
    type Output = Ratings;

    fn add(self, rhs: Ratings) -> Ratings {
        Ratings {
            attack: self.attack.saturating_add(rhs.attack),
            defense: self.defense.saturating_add(rhs.defense),
            magic: self.magic.saturating_add(rhs.magic),
            initiative: self.initiative.saturating_add(rhs.initiative),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub damage_multiplier: f64,
    pub power_cost: i32,
}

impl Spell {
    pub fn new(name: impl Into<String>, damage_multiplier: f64, power_cost: i32) -> Self {
        Self {
            name: name.into(),
            damage_multiplier,
            power_cost,
        }
    }
}

/// Either side of a fight, as seen by the combat engine.
///
/// Ratings are read-only here; whoever owns the combatant (equipment, active
/// spells, level-ups) computes them before the encounter starts. The engine
/// only moves life and power points, always through the clamping [`Pool`].
pub trait Combatant {
    fn name(&self) -> &str;
    fn attack_value(&self) -> i32;
    fn defense_value(&self) -> i32;
    fn magic_value(&self) -> i32;
    fn initiative_value(&self) -> i32;

    fn luck_modifier(&self) -> i32 {
        0
    }

    fn life(&self) -> &Pool;
    fn life_mut(&mut self) -> &mut Pool;
    fn power(&self) -> &Pool;
    fn power_mut(&mut self) -> &mut Pool;

    fn current_life_points(&self) -> i32 {
        self.life().current()
    }

    fn maximum_life_points(&self) -> i32 {
        self.life().maximum()
    }

    fn set_current_life_points(&mut self, value: i32) {
        self.life_mut().set(value);
    }

    fn current_power_points(&self) -> i32 {
        self.power().current()
    }

    fn maximum_power_points(&self) -> i32 {
        self.power().maximum()
    }

    fn set_current_power_points(&mut self, value: i32) {
        self.power_mut().set(value);
    }

    fn is_defeated(&self) -> bool {
        self.life().is_empty()
    }

    /// Rating rolled when attacking: attack for physical blows, magic for spells.
    fn offense_for(&self, is_physical: bool) -> i32 {
        if is_physical {
            self.attack_value()
        } else {
            self.magic_value()
        }
    }

    /// Rating rolled when defending: defense against blows, magic against spells.
    fn defense_for(&self, is_physical: bool) -> i32 {
        if is_physical {
            self.defense_value()
        } else {
            self.magic_value()
        }
    }
}

/// A rating bonus granted by an equipped item or an active spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub source: String,
    pub ratings: Ratings,
}

/// The player-controlled combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub base: Ratings,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
    #[serde(default)]
    pub luck: i32,
    pub life: Pool,
    pub power: Pool,
    #[serde(default)]
    pub spells: Vec<Spell>,
}

impl Character {
    pub fn new(name: impl Into<String>, base: Ratings, life: i32, power: i32) -> Self {
        Self {
            name: name.into(),
            base,
            bonuses: Vec::new(),
            luck: 0,
            life: Pool::full(life),
            power: Pool::full(power),
            spells: Vec::new(),
        }
    }

    /// Base ratings plus every equipment and spell bonus.
    pub fn ratings(&self) -> Ratings {
        self.bonuses
            .iter()
            .fold(self.base, |acc, bonus| acc + bonus.ratings)
    }

    /// The strongest known spell the character can currently pay for.
    pub fn best_affordable_spell(&self) -> Option<&Spell> {
        strongest_affordable(&self.spells, self.power.current())
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn attack_value(&self) -> i32 {
        self.ratings().attack
    }

    fn defense_value(&self) -> i32 {
        self.ratings().defense
    }

    fn magic_value(&self) -> i32 {
        self.ratings().magic
    }

    fn initiative_value(&self) -> i32 {
        self.ratings().initiative
    }

    fn luck_modifier(&self) -> i32 {
        self.luck
    }

    fn life(&self) -> &Pool {
        &self.life
    }

    fn life_mut(&mut self) -> &mut Pool {
        &mut self.life
    }

    fn power(&self) -> &Pool {
        &self.power
    }

    fn power_mut(&mut self) -> &mut Pool {
        &mut self.power
    }
}

/// How an enemy picks its action each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactics {
    /// Always swings.
    #[default]
    Brute,
    /// Casts its strongest affordable spell, swings when out of power.
    Caster,
    /// Casts only while its magic rating beats its attack rating.
    Opportunist,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    PhysicalAttack,
    MagicAttack { spell: Spell },
}

impl EnemyAction {
    pub fn is_physical(&self) -> bool {
        matches!(self, EnemyAction::PhysicalAttack)
    }

    pub fn damage_multiplier(&self) -> f64 {
        match self {
            EnemyAction::PhysicalAttack => 1.0,
            EnemyAction::MagicAttack { spell } => spell.damage_multiplier,
        }
    }

    pub fn power_cost(&self) -> i32 {
        match self {
            EnemyAction::PhysicalAttack => 0,
            EnemyAction::MagicAttack { spell } => spell.power_cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub ratings: Ratings,
    pub life: Pool,
    pub power: Pool,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub tactics: Tactics,
}

impl Enemy {
    pub fn new(name: impl Into<String>, ratings: Ratings, life: i32) -> Self {
        Self {
            name: name.into(),
            ratings,
            life: Pool::full(life),
            power: Pool::full(0),
            spells: Vec::new(),
            tactics: Tactics::Brute,
        }
    }

    pub fn with_spells(mut self, power: i32, spells: Vec<Spell>, tactics: Tactics) -> Self {
        self.power = Pool::full(power);
        self.spells = spells;
        self.tactics = tactics;
        self
    }

    /// Decide this turn's action. Never spends anything; the engine pays the cost.
    pub fn next_action(&self) -> EnemyAction {
        let wants_magic = match self.tactics {
            Tactics::Brute => false,
            Tactics::Caster => true,
            Tactics::Opportunist => self.ratings.magic > self.ratings.attack,
        };
        if !wants_magic {
            return EnemyAction::PhysicalAttack;
        }
        match strongest_affordable(&self.spells, self.power.current()) {
            Some(spell) => EnemyAction::MagicAttack {
                spell: spell.clone(),
            },
            None => EnemyAction::PhysicalAttack,
        }
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn attack_value(&self) -> i32 {
        self.ratings.attack
    }

    fn defense_value(&self) -> i32 {
        self.ratings.defense
    }

    fn magic_value(&self) -> i32 {
        self.ratings.magic
    }

    fn initiative_value(&self) -> i32 {
        self.ratings.initiative
    }

    fn life(&self) -> &Pool {
        &self.life
    }

    fn life_mut(&mut self) -> &mut Pool {
        &mut self.life
    }

    fn power(&self) -> &Pool {
        &self.power
    }

    fn power_mut(&mut self) -> &mut Pool {
        &mut self.power
    }
}

fn strongest_affordable(spells: &[Spell], power: i32) -> Option<&Spell> {
    spells
        .iter()
        .filter(|s| s.power_cost <= power)
        .max_by(|a, b| a.damage_multiplier.total_cmp(&b.damage_multiplier))
}
