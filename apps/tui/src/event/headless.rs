use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tech_radar_engine::{
    chart_radius_for, Legend, Radar, RadarStyle, Renderer, Scene, SceneBuilder, SelectionState, SvgSurface,
    Transitions,
};

use crate::config::AppConfig;
use crate::data::{load_radar, placement_rng};

/// Largest chart the headless paths lay out, matching the full-size web view.
const HEADLESS_SIZE: f64 = 880.0;

/// Run without the UI: counts per quadrant and ring plus the numbered legend.
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let radar = load_radar(&config.data_path).await?;
    let scene = build_scene(&radar, config, HEADLESS_SIZE)?;
    let report = build_report(&radar, &scene);

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}

/// Writes the settled (or self-animating) chart as a standalone SVG file.
pub async fn export_svg(config: &AppConfig, path: &Path, size: u32) -> Result<()> {
    let radar = load_radar(&config.data_path).await?;
    let svg = render_svg(&radar, config, f64::from(size))?;

    tokio::fs::write(path, svg)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), size, "exported radar chart");
    Ok(())
}

fn build_scene(radar: &Radar, config: &AppConfig, size: f64) -> Result<Scene> {
    let builder = SceneBuilder::new(RadarStyle::default());
    let mut rng = placement_rng(config.seed);
    builder
        .build_radar(radar, chart_radius_for(size), &mut rng)
        .map_err(|e| eyre!("Failed to lay out radar: {e}"))
}

fn render_svg(radar: &Radar, config: &AppConfig, size: f64) -> Result<String> {
    let scene = build_scene(radar, config, size)?;
    let renderer = Renderer::new(RadarStyle::default());
    let transitions = if config.transitions {
        Transitions::Scheduled
    } else {
        Transitions::Off
    };

    let mut surface = SvgSurface::new(size);
    renderer
        .render(&scene, &SelectionState::default(), transitions, Some(&mut surface))
        .map_err(|e| eyre!("Failed to render radar: {e}"))?;

    Ok(surface.finish())
}

fn build_report(radar: &Radar, scene: &Scene) -> HeadlessReport {
    let by_quadrant = radar
        .quadrants()
        .iter()
        .zip(radar.count_by_quadrant())
        .map(|(quadrant, count)| (quadrant.name.clone(), count))
        .collect();

    let by_ring = radar
        .rings()
        .iter()
        .zip(radar.count_by_ring())
        .map(|(ring, count)| (ring.name.clone(), count))
        .collect();

    let legend = Legend::build(scene)
        .groups
        .into_iter()
        .map(|group| HeadlessGroup {
            quadrant: group.name,
            entries: group
                .rows
                .into_iter()
                .map(|row| HeadlessEntry {
                    number: row.display_number,
                    name: row.name,
                    ring: row.ring_name,
                })
                .collect(),
        })
        .collect();

    HeadlessReport {
        total: radar.items().len(),
        by_quadrant,
        by_ring,
        legend,
    }
}

fn render_text(report: &HeadlessReport) -> String {
    let mut out = format!(
        "\nTech Radar\n==========\nTotal technologies: {}\n",
        report.total
    );

    out.push_str("\nBy Quadrant:\n");
    out.push_str(&count_lines(&report.by_quadrant));

    out.push_str("\nBy Ring:\n");
    out.push_str(&count_lines(&report.by_ring));

    out.push_str("\nLegend:\n");
    for group in &report.legend {
        out.push_str(&format!("{}\n", group.quadrant));
        for entry in &group.entries {
            out.push_str(&format!("  {:>3}. {} ({})\n", entry.number, entry.name, entry.ring));
        }
    }

    out
}

fn count_lines(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("- {name}: {count}\n"))
        .collect()
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    total: usize,
    by_quadrant: Vec<(String, usize)>,
    by_ring: Vec<(String, usize)>,
    legend: Vec<HeadlessGroup>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessGroup {
    quadrant: String,
    entries: Vec<HeadlessEntry>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessEntry {
    number: usize,
    name: String,
    ring: String,
}
