use clap::{Args, Parser, Subcommand};
use combat_engine::api::{simulate_duel, simulate_duel_many, DuelConfig, PlayerMove, PlayerPolicy};
use combat_engine::content::{builtin_enemies, builtin_enemy};
use combat_engine::{
    spawn_roll_animations, Combat, CombatEvent, Combatant, Dice, RollSource, SharedCombat, Side,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Args, Clone)]
struct DuelArgs {
    /// Builtin enemy id (see `enemies`)
    #[arg(long, default_value = "goblin")]
    enemy: String,
    /// Enemy JSON/YAML file; overrides --enemy
    #[arg(long)]
    enemy_file: Option<PathBuf>,
    /// Builtin character id
    #[arg(long, default_value = "wanderer")]
    character: String,
    /// Character JSON/YAML file; overrides --character
    #[arg(long)]
    character_file: Option<PathBuf>,
    /// RNG seed for determinism
    #[arg(long, default_value_t = 2025)]
    seed: u64,
    /// Flee once the character's life points drop to this value
    #[arg(long)]
    flee_below: Option<i32>,
    /// Try to run away on the character's first turn
    #[arg(long, default_value_t = false)]
    flee_immediately: bool,
    /// Forbid running away in this combat
    #[arg(long, default_value_t = false)]
    no_flee: bool,
    /// Safety cap on rounds
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,
}

impl DuelArgs {
    fn config(&self) -> DuelConfig {
        DuelConfig {
            character_id: Some(self.character.clone()),
            character_path: self
                .character_file
                .as_ref()
                .map(|p| p.display().to_string()),
            enemy_id: Some(self.enemy.clone()),
            enemy_path: self.enemy_file.as_ref().map(|p| p.display().to_string()),
            seed: self.seed,
            can_run_away: !self.no_flee,
            flee_below_life: self.flee_below,
            flee_immediately: self.flee_immediately,
            max_rounds: self.max_rounds,
            ..DuelConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a die several times
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of faces
        #[arg(long, default_value_t = 8)]
        sides: i32,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Simulate one encounter and print its log
    Duel {
        #[command(flatten)]
        duel: DuelArgs,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Simulate many encounters (seed + i) and print summary stats
    DuelMany {
        #[command(flatten)]
        duel: DuelArgs,
        /// Number of encounters
        #[arg(long, default_value_t = 100)]
        samples: u32,
        /// Print the stats as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run one encounter with both roll animations on their own threads
    Watch {
        /// Builtin enemy id
        #[arg(long, default_value = "goblin")]
        enemy: String,
        /// Builtin character id
        #[arg(long, default_value = "wanderer")]
        character: String,
        /// RNG seed for determinism of the rolls (not of arrival order)
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Longest animation, in milliseconds
        #[arg(long, default_value_t = 40)]
        max_delay_ms: u64,
        /// Safety cap on rounds
        #[arg(long, default_value_t = 50)]
        max_rounds: u32,
    },
    /// List builtin enemies
    Enemies,
    /// Print a builtin enemy as JSON (stdout)
    EnemyDump {
        /// Builtin enemy id
        #[arg(long)]
        id: String,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(Parser)]
#[command(name = "combat-cli")]
#[command(about = "Combat engine CLI harness")]
struct Cli {
    /// Show engine debug logs on stderr
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Cmd::Roll { seed, sides, rolls } => {
            anyhow::ensure!(sides >= 1, "a die needs at least one face, got {}", sides);
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", dice.die(sides));
            }
        }
        Cmd::Duel { duel, json } => {
            let res = simulate_duel(duel.config())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else {
                for line in &res.log {
                    println!("{}", line);
                }
            }
        }
        Cmd::DuelMany {
            duel,
            samples,
            json,
        } => {
            let stats = simulate_duel_many(duel.config(), samples)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let pct = |n: u32| 100.0 * f64::from(n) / f64::from(samples.max(1));
                println!("samples:        {}", stats.samples);
                println!("character wins: {:.1}%", pct(stats.character_wins));
                println!("enemy wins:     {:.1}%", pct(stats.enemy_wins));
                println!("fled:           {:.1}%", pct(stats.fled));
                println!("stalemates:     {:.1}%", pct(stats.stalemates));
                println!("avg rounds:     {:.2}", stats.avg_rounds);
            }
        }
        Cmd::Watch {
            enemy,
            character,
            seed,
            max_delay_ms,
            max_rounds,
        } => watch(&character, &enemy, seed, Duration::from_millis(max_delay_ms), max_rounds)?,
        Cmd::Enemies => {
            for id in builtin_enemies().keys() {
                let enemy = builtin_enemy(id)?;
                println!(
                    "{:<12} {} (LP {}, PP {}, {:?})",
                    id,
                    enemy.name,
                    enemy.maximum_life_points(),
                    enemy.maximum_power_points(),
                    enemy.tactics
                );
            }
        }
        Cmd::EnemyDump { id, pretty } => {
            let enemy = builtin_enemy(&id)?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&enemy)?);
            } else {
                println!("{}", serde_json::to_string(&enemy)?);
            }
        }
    }
    Ok(())
}

fn watch(
    character_id: &str,
    enemy_id: &str,
    seed: u64,
    max_delay: Duration,
    max_rounds: u32,
) -> anyhow::Result<()> {
    let character = combat_engine::content::builtin_character(character_id)?;
    let enemy = builtin_enemy(enemy_id)?;
    let mut combat = Combat::default();
    combat.set_character(character);
    combat.set_enemy(enemy);
    combat.set_can_run_away(false);
    let die_sides = combat.rules().die_sides;

    let (handle, events) = SharedCombat::new(combat);
    let policy = PlayerPolicy::default();
    let mut animations = Vec::new();
    handle.start_combat(false);

    for event in events.iter() {
        match &event {
            CombatEvent::RollingInitiative(request) | CombatEvent::AttackRollsRequested(request) => {
                let roll_seed = seed ^ (request.ticket.sequence << 8);
                animations.extend(spawn_roll_animations(
                    &handle, *request, die_sides, roll_seed, max_delay,
                ));
            }
            CombatEvent::CharacterTurn => {
                let choice = handle.inspect(|c| c.character().map(|ch| policy.choose(ch, false)));
                if let Some(PlayerMove::Attack(choice)) = choice {
                    handle.character_attack(choice);
                }
            }
            CombatEvent::EnemyTurn => {
                handle.enemy_attack();
            }
            CombatEvent::DefenderSuffersDamage { defender, amount } => {
                let left = handle.inspect(|c| match defender {
                    Side::Character => c.character().map_or(0, |ch| ch.current_life_points()),
                    Side::Enemy => c.enemy().map_or(0, |e| e.current_life_points()),
                });
                println!("{:?} takes {} damage ({} LP left)", defender, amount, left);
                continue;
            }
            CombatEvent::EndRound { round } => {
                println!("end of round {}", round);
                let stalled = handle.inspect(|c| c.winner().is_none());
                if stalled && *round >= max_rounds {
                    println!("round cap {} reached", max_rounds);
                    break;
                }
                handle.next_turn_or_round();
                continue;
            }
            CombatEvent::CombatFinished { winner } => {
                println!("{:?} wins", winner);
                break;
            }
            CombatEvent::SuccessfulRunAway => break,
        }
        println!("{:?}", event);
    }

    for animation in animations {
        if animation.join().is_err() {
            tracing::warn!("roll animation panicked");
        }
    }
    Ok(())
}
