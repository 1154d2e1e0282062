use hf_simulation::SimConfig;

pub fn run() -> Result<(), String> {
    let text = toml::to_string_pretty(&SimConfig::default())
        .map_err(|e| format!("failed to serialize defaults: {e}"))?;
    print!("{text}");
    Ok(())
}
