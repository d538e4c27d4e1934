use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tech_radar_engine::{Categories, Radar};

/// Reads and validates a radar data file, JSON or the generated JS module.
pub async fn load_radar(path: &Path) -> Result<Radar> {
    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read radar data from {}", path.display()))?;

    let radar = Radar::parse(&text, &Categories::default())
        .wrap_err_with(|| format!("Invalid radar data in {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        items = radar.items().len(),
        "loaded radar data"
    );

    Ok(radar)
}

/// Placement randomness: pinned when a seed is configured.
pub fn placement_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
