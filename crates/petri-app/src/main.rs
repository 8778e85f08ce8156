mod cli;
mod commands;
mod demo;

use anyhow::Result;
use clap::Parser;
use petri_core::config::AppConfig;
use petri_core::lifecycle;

use cli::{Cli, Commands};
use commands::RenderFlags;

fn main() -> Result<()> {
    lifecycle::init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref());
    lifecycle::log_startup();

    let result = match cli.command {
        Commands::Render {
            snapshot,
            view,
            selected,
            out,
            format,
            hud,
            no_grid,
            no_zones,
        } => commands::render(
            &config,
            &snapshot,
            &view,
            RenderFlags {
                selected,
                hud,
                no_grid,
                no_zones,
            },
            out,
            format,
        ),
        Commands::Hit { snapshot, x, y, view } => commands::hit(&config, &snapshot, x, y, &view),
        Commands::Inspect { snapshot, view } => commands::inspect(&config, &snapshot, &view),
        Commands::Demo {
            count,
            zones,
            seed,
            out,
        } => commands::demo(count, zones, seed, out),
    };

    lifecycle::log_shutdown();
    result
}
