//! thrall - interactive horde manager
//!
//! Thin menu front-end over the engine; all rule logic lives in the
//! library.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thrall::combat::{Ability, AttackKind};
use thrall::roster::{parse_id_selection, shared_allocator, Roster};
use thrall::store::{self, RosterSet};
use thrall::RosterDefaults;

/// Name the interactive roster is stored under
const HORDE: &str = "horde";

#[derive(Parser)]
#[command(name = "thrall", about = "Horde combat aid for tabletop games")]
struct Args {
    /// Starting id for newly raised units
    #[arg(long, default_value_t = 1)]
    start_id: u32,

    /// Roster file to restore on startup
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thrall=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let ids = shared_allocator();
    ids.lock().initialize(args.start_id);

    let mut rosters = match &args.load {
        Some(path) => store::load_from_path(path, ids.clone())
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RosterSet::new(),
    };
    rosters
        .entry(HORDE.to_string())
        .or_insert_with(|| RosterDefaults::default().build(ids.clone()));

    loop {
        println!();
        println!("Horde Manager");
        println!("1. Add units");
        println!("2. Remove units");
        println!("3. Group attack");
        println!("4. Group saving throw");
        println!("5. Display roster");
        println!("6. Update health");
        println!("7. Apply damage buff");
        println!("8. Reset buff");
        println!("9. Save roster to file");
        println!("10. Quit");

        let choice = prompt("Enter your choice: ")?;
        let result = match choice.as_str() {
            "1" => add_units(horde(&mut rosters)),
            "2" => remove_units(horde(&mut rosters)),
            "3" => group_attack(horde(&mut rosters)),
            "4" => group_saving_throw(horde(&mut rosters)),
            "5" => {
                display(horde(&mut rosters));
                Ok(())
            }
            "6" => update_health(horde(&mut rosters)),
            "7" => apply_buff(horde(&mut rosters)),
            "8" => {
                horde(&mut rosters).reset_buff();
                println!("Buffs cleared.");
                Ok(())
            }
            "9" => save(&rosters),
            "10" => break,
            _ => {
                println!("Invalid choice.");
                Ok(())
            }
        };

        if let Err(err) = result {
            println!("Error: {err}");
        }
    }

    Ok(())
}

fn horde(rosters: &mut RosterSet) -> &mut Roster {
    rosters.get_mut(HORDE).expect("horde roster present since startup")
}

fn prompt(msg: &str) -> Result<String> {
    print!("{msg}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_ids(msg: &str) -> Result<Vec<u32>> {
    Ok(parse_id_selection(&prompt(msg)?)?)
}

fn add_units(roster: &mut Roster) -> Result<()> {
    let count: usize = prompt("How many units to add? ")?
        .parse()
        .context("invalid count")?;

    let added = roster.add_units(count)?;
    for id in &added {
        if let Some(unit) = roster.get(*id) {
            println!("{}", unit.display_line());
        }
    }
    println!("Total number of units: {}.", roster.len());
    Ok(())
}

fn remove_units(roster: &mut Roster) -> Result<()> {
    display(roster);
    let ids = prompt_ids("Ids of units to remove (e.g. '1-5' or '1,6,9'): ")?;

    let report = roster.remove_units(&ids);
    for id in &report.removed {
        println!("Unit {id} has been removed.");
    }
    for id in &report.not_found {
        println!("No unit with id {id} found.");
    }
    println!("Total number of units: {}.", roster.len());
    Ok(())
}

fn group_attack(roster: &mut Roster) -> Result<()> {
    let ids = prompt_ids("Ids of attacking units (e.g. '1-3,5'): ")?;
    let armor_class: i32 = prompt("Target armor class: ")?
        .parse()
        .context("invalid armor class")?;
    let kind: AttackKind = prompt("Attack type (sword/bow): ")?.parse()?;

    let report = roster.group_attack(&ids, armor_class, kind);
    for entry in &report.entries {
        use thrall::roster::LastAction::*;
        match entry.action {
            CriticalHit => println!("Unit {} critically hit for {} damage.", entry.id, entry.damage),
            Hit => println!("Unit {} hit for {} damage.", entry.id, entry.damage),
            CriticalMiss => println!("Unit {} critically missed.", entry.id),
            _ => println!("Unit {} missed.", entry.id),
        }
    }
    for id in &report.not_found {
        println!("No unit with id {id} found.");
    }
    println!(
        "{} units hit for {} total damage.",
        report.hits.len(),
        report.total_damage
    );
    Ok(())
}

fn group_saving_throw(roster: &mut Roster) -> Result<()> {
    let ids = prompt_ids("Ids of units making a saving throw (e.g. '1-3,5'): ")?;
    let ability: Ability = prompt("Ability (strength, dexterity, ...): ")?.parse()?;
    let dc: i32 = prompt("Difficulty class (DC): ")?.parse().context("invalid DC")?;
    let potential_damage: i32 = prompt("Potential damage on a failed save: ")?
        .parse()
        .context("invalid damage")?;

    let report = roster.group_saving_throw(&ids, dc, potential_damage, ability);
    for entry in &report.entries {
        use thrall::roster::LastAction::*;
        match entry.action {
            CriticalSuccess => println!("Unit {} rolled a 20. Critical success on the saving throw.", entry.id),
            CriticalFailure => println!("Unit {} rolled a 1. Critical failure on the saving throw.", entry.id),
            SaveSuccess => println!("Unit {} succeeded the saving throw and takes {} damage.", entry.id, entry.damage),
            _ => println!("Unit {} failed the saving throw and takes {} damage.", entry.id, entry.damage),
        }
    }
    for id in &report.not_found {
        println!("No unit with id {id} found.");
    }
    for id in &report.collapsed {
        println!("Unit {id} has collapsed.");
    }
    display(roster);
    Ok(())
}

fn update_health(roster: &mut Roster) -> Result<()> {
    display(roster);
    let ids = prompt_ids("Ids of units to update (e.g. '10-14,16'): ")?;
    let damage: i32 = prompt("Damage each unit takes (negative heals): ")?
        .parse()
        .context("invalid damage")?;

    let updates: BTreeMap<u32, i32> = ids.into_iter().map(|id| (id, damage)).collect();
    let report = roster.update_health(&updates);
    for id in &report.collapsed {
        println!("Unit {id} has collapsed.");
    }
    for id in &report.not_found {
        println!("No unit with id {id} found.");
    }
    display(roster);
    Ok(())
}

fn apply_buff(roster: &mut Roster) -> Result<()> {
    let amount: i32 = prompt("Damage buff amount: ")?.parse().context("invalid amount")?;
    let duration: u32 = prompt("Buff duration in attacks: ")?
        .parse()
        .context("invalid duration")?;

    roster.add_damage_buff(amount, duration);
    println!("Buff of +{amount} applied for the next {duration} attacks.");
    Ok(())
}

fn display(roster: &Roster) {
    if roster.is_empty() {
        println!("No units in the roster.");
        return;
    }

    println!("Current roster:");
    for unit in roster.units() {
        let last_roll = unit
            .last_roll
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let last_action = unit
            .last_action
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let success_rate = unit
            .success_rate()
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "N/A".to_string());

        println!(
            "{} | Last Roll: {} | Last Action: {} | Damage Done: {} | Success Rate: {}",
            unit.display_line(),
            last_roll,
            last_action,
            unit.damage_done,
            success_rate
        );
    }
}

fn save(rosters: &RosterSet) -> Result<()> {
    let path = PathBuf::from(prompt("Path to save to: ")?);
    store::save_to_path(&path, rosters)?;
    println!("Saved to {}.", path.display());
    Ok(())
}
