use std::time::Duration;

use colored::Colorize;
use hf_simulation::SimConfig;

/// Feed `seconds` of evenly spaced frames through the scheduler.
pub fn run(config: SimConfig, seconds: f64, fps: u32) -> Result<(), String> {
    if fps == 0 {
        return Err("fps must be at least 1".into());
    }
    if !(seconds.is_finite() && seconds >= 0.0) {
        return Err(format!("seconds must be a non-negative number, got {seconds}"));
    }

    let mut sim = super::start(config)?;
    sim.toggle_play();

    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
    let frames = (seconds * f64::from(fps)).round() as u64;
    let mut ticks = 0u64;
    for _ in 0..frames {
        ticks += u64::from(
            sim.frame(frame)
                .map_err(|e| format!("simulation error: {e}"))?,
        );
    }

    println!(
        "  {} {frames} frames at {fps} fps, speed {}: {ticks} ticks",
        "Played".bold(),
        sim.speed()
    );
    let dropped = sim.scheduler().dropped();
    if dropped > 0.0 {
        println!(
            "  {} {dropped:.2}s of simulated time dropped under load",
            "WARN".yellow().bold()
        );
    }
    println!();

    let recent: Vec<_> = sim.events().iter().take(5).collect();
    super::print_summary(&sim.snapshot(), &recent);
    Ok(())
}
