use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "petri", about = "Petri: spatial canvas for bacterial evolution snapshots")]
pub struct Cli {
    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one frame of a snapshot
    Render {
        #[arg(long)]
        snapshot: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Bacterium id to highlight
        #[arg(long)]
        selected: Option<String>,
        /// Output file (stdout when omitted, json only)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Draw the HUD overlay
        #[arg(long)]
        hud: bool,
        #[arg(long)]
        no_grid: bool,
        #[arg(long)]
        no_zones: bool,
    },

    /// Report what lies under a pixel
    Hit {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print snapshot, level-of-detail and index statistics
    Inspect {
        #[arg(long)]
        snapshot: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Generate a random snapshot as JSON
    Demo {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 3)]
        zones: usize,
        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Surface size and view state shared by the snapshot commands.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Surface width in pixels (config default when omitted)
    #[arg(long)]
    pub width: Option<u32>,
    /// Surface height in pixels (config default when omitted)
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_y: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Png,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_with_view_flags() {
        let cli = Cli::try_parse_from([
            "petri", "render", "--snapshot", "s.json", "--scale", "2.5", "--pan-x", "-40",
            "--format", "json", "--hud",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                view, format, hud, ..
            } => {
                assert_eq!(view.scale, 2.5);
                assert_eq!(view.pan_x, -40.0);
                assert_eq!(format, OutputFormat::Json);
                assert!(hud);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn demo_defaults() {
        let cli = Cli::try_parse_from(["petri", "demo"]).unwrap();
        match cli.command {
            Commands::Demo {
                count, zones, seed, ..
            } => {
                assert_eq!((count, zones, seed), (1000, 3, None));
            }
            _ => panic!("expected demo"),
        }
    }
}
