use hf_simulation::{EcosystemSystem, SimConfig};

pub fn run(config: SimConfig, ticks: u64, json: bool, events: usize) -> Result<(), String> {
    let seed = config.seed;
    let mut sim = super::start(config)?;
    sim.run(ticks).map_err(|e| format!("simulation error: {e}"))?;
    tracing::info!(ticks, population = sim.world().population(), "run finished");

    let snapshot = sim.snapshot();
    if json {
        let text = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("failed to serialize snapshot: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("  Ran {ticks} ticks with seed {seed}");
    if let Some(eco) = sim.get_system::<EcosystemSystem>() {
        println!(
            "  {} starved, {} animals born",
            eco.deaths(),
            eco.animal_births()
        );
    }
    let recent: Vec<_> = sim.events().iter().take(events).collect();
    super::print_summary(&snapshot, &recent);
    Ok(())
}
