use clap::{CommandFactory, Parser};

#[derive(Debug, Default, Parser)]
#[command(name = "tech-radar", version, about = "Tech Radar in the terminal")]
pub struct CliArgs {
    /// Print stats and the numbered legend, then exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Radar data file (JSON or the generated radar-data.js)
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Seed blip placement for a reproducible layout
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Draw the settled chart without entrance transitions
    #[arg(long = "no-transitions")]
    pub no_transitions: bool,

    /// Write the chart as a standalone SVG file and exit
    #[arg(long, value_name = "PATH")]
    pub svg: Option<String>,

    /// Edge length of the exported SVG in pixels
    #[arg(long, value_name = "PX", default_value_t = 880)]
    pub size: u32,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.data {
            std::env::set_var("RADAR_DATA", path);
        }
        if let Some(seed) = self.seed {
            std::env::set_var("RADAR_SEED", seed.to_string());
        }
        if self.no_transitions {
            std::env::set_var("RADAR_TRANSITIONS", "0");
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// Runs without the interactive UI.
    pub const fn is_batch(&self) -> bool {
        self.headless || self.json || self.svg.is_some()
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
