pub mod defaults;
pub mod play;
pub mod run;

use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use hf_simulation::{EventCategory, SimConfig, SimEvent, Simulation, WorldSnapshot};

/// Read an optional TOML config and apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    seed: Option<u64>,
    speed: Option<f64>,
) -> Result<SimConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            toml::from_str::<SimConfig>(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(speed) = speed {
        config = config.with_speed(speed);
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Build a simulation from a validated config.
fn start(config: SimConfig) -> Result<Simulation, String> {
    Simulation::new(config).map_err(|e| format!("simulation setup failed: {e}"))
}

/// Print the top bar, the population table, stores and recent events.
fn print_summary(snapshot: &WorldSnapshot, event_lines: &[&SimEvent]) {
    let clock = if snapshot.is_night { "night" } else { "day" };
    println!(
        "  {} {} {}",
        "Hearthfield".bold(),
        snapshot.population_label,
        format!(
            "(tick {}, year {:.2}, {:05.2}h {clock}, {})",
            snapshot.tick, snapshot.year, snapshot.time_of_day, snapshot.weather
        )
        .dimmed()
    );
    println!(
        "  Population {}  Wood {}  Stone {}  Iron {}",
        snapshot.population,
        snapshot.inventory.wood,
        snapshot.inventory.stone,
        snapshot.inventory.iron
    );
    println!(
        "  {} houses, {} bonfires, {} food sources, {} trees, {} animals",
        snapshot.houses.len(),
        snapshot.bonfires.len(),
        snapshot.foods.len(),
        snapshot.trees.len(),
        snapshot.animals.len()
    );
    println!();

    if snapshot.humans.is_empty() {
        println!("  {}", "Nobody is left.".red().bold());
        println!();
    } else {
        println!("  {}", "Population".bold().underline());
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Age", "Hunger", "XP", "Mode", "Home"]);
        for view in &snapshot.humans {
            let human = &view.human;
            let home = human
                .house
                .and_then(|id| snapshot.houses.iter().find(|h| h.id == id))
                .map(|h| format!("{} ({})", h.id, h.level))
                .unwrap_or_else(|| "--".to_string());
            table.add_row(vec![
                human.name.clone(),
                format!("{:.1}", human.age),
                format_hunger_bar(human.hunger),
                format!("{:.1}", human.xp),
                view.mode.to_string(),
                home,
            ]);
        }
        println!("{table}");
        println!();
    }

    if !event_lines.is_empty() {
        println!("  {}", "Chronicle".bold().underline());
        for event in event_lines {
            let tick_label = format!("[tick {:>5}]", event.tick).dimmed();
            println!("  {tick_label} {}", colorize_event(event));
        }
        println!();
    }
}

fn colorize_event(event: &SimEvent) -> colored::ColoredString {
    let line = event.to_string();
    match event.kind.category() {
        EventCategory::Death => line.red().bold(),
        EventCategory::Birth => line.green(),
        EventCategory::Construction | EventCategory::Evolution => line.cyan(),
        EventCategory::Technology | EventCategory::Advance => line.yellow(),
        EventCategory::Mining => line.blue(),
        EventCategory::System | EventCategory::History => line.normal(),
    }
}

fn format_hunger_bar(hunger: f64) -> String {
    let filled = (hunger / 10.0).round().clamp(0.0, 10.0) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled));
    if hunger < 20.0 {
        format!("[{}] {:>5.1}", bar.red(), hunger)
    } else if hunger < 40.0 {
        format!("[{}] {:>5.1}", bar.yellow(), hunger)
    } else {
        format!("[{}] {:>5.1}", bar.green(), hunger)
    }
}
