use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::{AttackChoice, Combat, CombatEvent, CombatOutcome, Side};
use crate::combatant::{Character, Combatant, Enemy};
use crate::content::{builtin_character, builtin_enemy, load_character, load_enemy};
use crate::dice::Dice;
use crate::rendezvous::{RollCheck, RollRequest};
use crate::rules::CombatRules;

const DEFAULT_CHARACTER: &str = "wanderer";
const DEFAULT_ENEMY: &str = "goblin";
const MAX_ROUNDS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub character_path: Option<String>,
    #[serde(default)]
    pub enemy_id: Option<String>,
    #[serde(default)]
    pub enemy_path: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub can_run_away: bool,
    /// The player flees once the character's life points drop to this value or below.
    #[serde(default)]
    pub flee_below_life: Option<i32>,
    #[serde(default)]
    pub flee_immediately: bool,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default)]
    pub rules: CombatRules,
}

fn default_true() -> bool {
    true
}

fn default_max_rounds() -> u32 {
    MAX_ROUNDS
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            character_id: None,
            character_path: None,
            enemy_id: None,
            enemy_path: None,
            seed: 0,
            can_run_away: true,
            flee_below_life: None,
            flee_immediately: false,
            max_rounds: MAX_ROUNDS,
            rules: CombatRules::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelResult {
    /// "character", "enemy", "fled" or "stalemate" (round cap reached).
    pub outcome: String,
    pub rounds: u32,
    pub character_life_end: i32,
    pub enemy_life_end: i32,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelStats {
    pub samples: u32,
    pub character_wins: u32,
    pub enemy_wins: u32,
    pub fled: u32,
    pub stalemates: u32,
    pub avg_rounds: f64,
}

/// How the simulated player spends the Character's turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerPolicy {
    pub flee_below_life: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMove {
    Flee,
    Attack(AttackChoice),
}

impl PlayerPolicy {
    pub fn choose(&self, character: &Character, can_flee: bool) -> PlayerMove {
        if let Some(threshold) = self.flee_below_life {
            if can_flee && character.current_life_points() <= threshold {
                return PlayerMove::Flee;
            }
        }
        if character.magic_value() >= character.attack_value() {
            if let Some(spell) = character.best_affordable_spell() {
                return PlayerMove::Attack(AttackChoice::Spell(spell.clone()));
            }
        }
        PlayerMove::Attack(AttackChoice::Physical)
    }
}

pub fn simulate_duel(cfg: DuelConfig) -> Result<DuelResult> {
    let character = resolve_character(&cfg)?;
    let enemy = resolve_enemy(&cfg)?;
    Ok(run_duel(character, enemy, &cfg))
}

pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let character = resolve_character(&cfg)?;
    let enemy = resolve_enemy(&cfg)?;
    let mut stats = DuelStats {
        samples,
        ..DuelStats::default()
    };
    let mut total_rounds = 0u64;
    for i in 0..samples {
        let trial = DuelConfig {
            seed: cfg.seed.wrapping_add(u64::from(i)),
            ..cfg.clone()
        };
        let res = run_duel(character.clone(), enemy.clone(), &trial);
        total_rounds += u64::from(res.rounds);
        match res.outcome.as_str() {
            "character" => stats.character_wins += 1,
            "enemy" => stats.enemy_wins += 1,
            "fled" => stats.fled += 1,
            _ => stats.stalemates += 1,
        }
    }
    if samples > 0 {
        stats.avg_rounds = total_rounds as f64 / f64::from(samples);
    }
    Ok(stats)
}

/// Play one encounter to its end with seeded dice. Roll pairs are delivered
/// enemy first, so the join is exercised with the "wrong" order every time.
pub fn run_duel(character: Character, enemy: Enemy, cfg: &DuelConfig) -> DuelResult {
    let mut logs = Vec::new();
    let mut dice = Dice::from_seed(cfg.seed);
    let policy = PlayerPolicy {
        flee_below_life: cfg.flee_below_life,
    };

    logs.push(format!(
        "[START] {} (LP {}, PP {}) vs {} (LP {}, PP {})",
        character.name,
        character.current_life_points(),
        character.current_power_points(),
        enemy.name,
        enemy.current_life_points(),
        enemy.current_power_points()
    ));

    let mut combat = Combat::new(cfg.rules);
    combat.set_character(character);
    combat.set_enemy(enemy);
    combat.set_can_run_away(cfg.can_run_away);

    let mut queue: VecDeque<CombatEvent> = combat.start_combat(cfg.flee_immediately).into();

    while let Some(event) = queue.pop_front() {
        let next = match event {
            CombatEvent::RollingInitiative(request) => {
                logs.push(format!("[ROUND] {}", combat.round()));
                let (c, e) = request.roll_both(&mut dice, cfg.rules.die_sides);
                logs.push(format!(
                    "[INIT] {} {} vs {} {}",
                    name_of(&combat, Side::Character),
                    c,
                    name_of(&combat, Side::Enemy),
                    e
                ));
                deliver_pair(&mut combat, &request, c, e)
            }
            CombatEvent::AttackRollsRequested(request) => {
                let (c, e) = request.roll_both(&mut dice, cfg.rules.die_sides);
                log_attack(&mut logs, &combat, &request, c, e);
                deliver_pair(&mut combat, &request, c, e)
            }
            CombatEvent::CharacterTurn => {
                logs.push(format!("[TURN] {}", name_of(&combat, Side::Character)));
                let choice = combat
                    .character()
                    .map(|c| policy.choose(c, combat.can_run_away()));
                match choice {
                    Some(PlayerMove::Flee) => {
                        logs.push(format!(
                            "[FLEE] {} tries to run away",
                            name_of(&combat, Side::Character)
                        ));
                        combat.try_to_run_away()
                    }
                    Some(PlayerMove::Attack(choice)) => combat.character_attack(choice),
                    None => Vec::new(),
                }
            }
            CombatEvent::EnemyTurn => {
                logs.push(format!("[TURN] {}", name_of(&combat, Side::Enemy)));
                combat.enemy_attack()
            }
            CombatEvent::DefenderSuffersDamage { defender, amount } => {
                logs.push(format!(
                    "[DMG][{}] −{} → {} LP",
                    name_of(&combat, defender),
                    amount,
                    life_of(&combat, defender)
                ));
                Vec::new()
            }
            CombatEvent::EndRound { round } => {
                if combat.winner().is_none() && round >= cfg.max_rounds {
                    logs.push(format!("[END] round cap {} reached", cfg.max_rounds));
                    Vec::new()
                } else {
                    combat.next_turn_or_round()
                }
            }
            CombatEvent::CombatFinished { winner } => {
                logs.push(format!("[WIN] {}", name_of(&combat, winner)));
                Vec::new()
            }
            CombatEvent::SuccessfulRunAway => {
                logs.push(format!(
                    "[FLEE] {} got away",
                    name_of(&combat, Side::Character)
                ));
                Vec::new()
            }
        };
        queue.extend(next);
    }

    let outcome = match combat.outcome() {
        Some(CombatOutcome::CharacterWon) => "character",
        Some(CombatOutcome::EnemyWon) => "enemy",
        Some(CombatOutcome::RanAway) => "fled",
        None => "stalemate",
    };
    let rounds = combat.round();
    let character_life_end = life_of(&combat, Side::Character);
    let enemy_life_end = life_of(&combat, Side::Enemy);

    logs.push(format!(
        "[END] outcome={} rounds={} character_lp={} enemy_lp={}",
        outcome, rounds, character_life_end, enemy_life_end
    ));

    DuelResult {
        outcome: outcome.to_string(),
        rounds,
        character_life_end,
        enemy_life_end,
        log: logs,
    }
}

fn deliver_pair(
    combat: &mut Combat,
    request: &RollRequest,
    character_total: i32,
    enemy_total: i32,
) -> Vec<CombatEvent> {
    let mut events = combat.deliver_roll(Side::Enemy, request.ticket, enemy_total);
    events.extend(combat.deliver_roll(Side::Character, request.ticket, character_total));
    events
}

fn resolve_character(cfg: &DuelConfig) -> Result<Character> {
    if let Some(path) = cfg.character_path.as_deref() {
        return load_character(Path::new(path))
            .with_context(|| format!("failed to load character: {}", path));
    }
    let id = cfg.character_id.as_deref().unwrap_or(DEFAULT_CHARACTER);
    builtin_character(id).with_context(|| format!("failed to load builtin character: {}", id))
}

fn resolve_enemy(cfg: &DuelConfig) -> Result<Enemy> {
    if let Some(path) = cfg.enemy_path.as_deref() {
        return load_enemy(Path::new(path)).with_context(|| format!("failed to load enemy: {}", path));
    }
    let id = cfg.enemy_id.as_deref().unwrap_or(DEFAULT_ENEMY);
    builtin_enemy(id).with_context(|| format!("failed to load builtin enemy: {}", id))
}

fn name_of(combat: &Combat, side: Side) -> String {
    match side {
        Side::Character => combat.character().map(|c| c.name.clone()),
        Side::Enemy => combat.enemy().map(|e| e.name.clone()),
    }
    .unwrap_or_else(|| "?".to_string())
}

fn life_of(combat: &Combat, side: Side) -> i32 {
    match side {
        Side::Character => combat.character().map_or(0, |c| c.current_life_points()),
        Side::Enemy => combat.enemy().map_or(0, |e| e.current_life_points()),
    }
}

fn log_attack(logs: &mut Vec<String>, combat: &Combat, request: &RollRequest, c: i32, e: i32) {
    let RollCheck::Attack {
        attacker,
        damage_multiplier,
        is_physical,
    } = request.check
    else {
        return;
    };
    let (attacker_total, defender_total) = match attacker {
        Side::Character => (c, e),
        Side::Enemy => (e, c),
    };
    let kind = if is_physical { "physical" } else { "magic" };
    let mark = if attacker_total > defender_total { "✔" } else { "✖" };
    logs.push(format!(
        "[ATTACK][{}] {} {} vs {} ×{} {}",
        name_of(combat, attacker),
        kind,
        attacker_total,
        defender_total,
        damage_multiplier,
        mark
    ));
}
