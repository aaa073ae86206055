use aura_core::config::ConfigError;
use aura_core::{render_dream, AuraConfig, DreamAnalyzer, PosterStyle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    println!(
        "Loaded config: field={} canvas={:?} variations={}",
        config.render.field_resolution,
        config.render.canvas_size(),
        config.render.variations
    );

    let text = "I was afraid of falling into the dark ocean, but a friend pulled me back to light.";
    let render = render_dream(
        text,
        PosterStyle::Hybrid,
        &config,
        &DreamAnalyzer::rule_based(),
    )?;

    println!("{}", render.analysis.emotions);
    println!("Shadow: {}", render.analysis.reading.shadow);
    println!("Energy: {}", render.analysis.reading.energy);
    println!("Guidance: {}", render.analysis.reading.guidance);

    let written = render.save("out")?;
    println!("Demo complete. Wrote {} files (seed {})", written.len(), render.seed);
    Ok(())
}

fn load_config() -> Result<AuraConfig, ConfigError> {
    AuraConfig::load_from_file("config/aura.toml").or_else(|err| {
        eprintln!("Falling back to default config: {err}");
        Ok(AuraConfig::default())
    })
}
