use anyhow::Context;
use clap::Parser;
use combat_engine::api::{run_duel, DuelConfig};
use combat_engine::content::{builtin_character, load_character, parse_enemy, Format};
use combat_engine::{Character, Combatant, CombatRules, DamageRounding, Enemy, TieBreak};
use encoding_rs::Encoding;
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many encounters vs an enemy file")]
struct Args {
    /// Path to an enemy JSON or YAML file
    #[arg(long)]
    target: PathBuf,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Builtin character id
    #[arg(long, default_value = "wanderer")]
    character: String,

    /// Optional character file (overrides --character)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Flee once life points drop to this value
    #[arg(long)]
    flee_below: Option<i32>,

    /// Damage rounding: round | floor | ceil
    #[arg(long, default_value = "round")]
    rounding: String,

    /// Who wins initiative ties: character | enemy
    #[arg(long, default_value = "character")]
    ties: String,
}

fn to_rounding(s: &str) -> DamageRounding {
    match s.to_lowercase().as_str() {
        "floor" => DamageRounding::Floor,
        "ceil" => DamageRounding::Ceil,
        _ => DamageRounding::Round,
    }
}

fn to_tie_break(s: &str) -> TieBreak {
    match s.to_lowercase().as_str() {
        "enemy" => TieBreak::Enemy,
        _ => TieBreak::Character,
    }
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn read_enemy_auto(path: &std::path::Path) -> anyhow::Result<Enemy> {
    let text = read_text_auto(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_enemy(
        &path.display().to_string(),
        &text,
        Format::from_path(path),
    )?)
}

fn read_character(args: &Args) -> anyhow::Result<Character> {
    match args.file.as_ref() {
        Some(path) => Ok(load_character(path)?),
        None => Ok(builtin_character(&args.character)?),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.trials > 0, "need at least one trial");

    let character = read_character(&args)?;
    let enemy = read_enemy_auto(&args.target)?;
    let rules = CombatRules {
        initiative_ties: to_tie_break(&args.ties),
        damage_rounding: to_rounding(&args.rounding),
        ..CombatRules::default()
    };

    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut fled = 0u32;
    let mut stalemates = 0u32;
    let mut life_left_on_wins = 0i64;
    let mut rounds_vec: Vec<u32> = Vec::with_capacity(args.trials as usize);

    for i in 0..args.trials {
        let cfg = DuelConfig {
            seed: args.seed.wrapping_add(u64::from(i)),
            flee_below_life: args.flee_below,
            max_rounds: args.max_rounds,
            rules,
            ..DuelConfig::default()
        };
        let res = run_duel(character.clone(), enemy.clone(), &cfg);
        match res.outcome.as_str() {
            "character" => {
                wins += 1;
                life_left_on_wins += i64::from(res.character_life_end);
                rounds_vec.push(res.rounds);
            }
            "enemy" => losses += 1,
            "fled" => fled += 1,
            _ => stalemates += 1,
        }
    }

    rounds_vec.sort_unstable();
    let trials_f = f64::from(args.trials);
    let avg_rounds = if rounds_vec.is_empty() {
        0.0
    } else {
        rounds_vec.iter().map(|&r| u64::from(r)).sum::<u64>() as f64 / f64::from(wins)
    };
    let median_rounds = if rounds_vec.is_empty() {
        0
    } else {
        let m = rounds_vec.len() / 2;
        if rounds_vec.len() % 2 == 1 {
            rounds_vec[m]
        } else {
            (rounds_vec[m - 1] + rounds_vec[m]) / 2
        }
    };
    let avg_life_left = if wins == 0 {
        0.0
    } else {
        life_left_on_wins as f64 / f64::from(wins)
    };

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", args.trials);
    println!(
        "character:          {} (LP {}, PP {})",
        character.name,
        character.maximum_life_points(),
        character.maximum_power_points()
    );
    println!(
        "target:             {} (LP {}, {:?})",
        enemy.name,
        enemy.maximum_life_points(),
        enemy.tactics
    );
    println!();
    println!("win rate:           {:.1}%", 100.0 * f64::from(wins) / trials_f);
    println!("loss rate:          {:.1}%", 100.0 * f64::from(losses) / trials_f);
    println!("fled:               {:.1}%", 100.0 * f64::from(fled) / trials_f);
    println!("stalemates:         {:.1}%", 100.0 * f64::from(stalemates) / trials_f);
    println!("avg LP left (wins): {:.2}", avg_life_left);
    println!("avg rounds (wins):  {:.2}", avg_rounds);
    println!("median rounds:      {}", median_rounds);

    Ok(())
}
