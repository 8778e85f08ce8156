use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use petri_canvas::engine::CanvasEngine;
use petri_canvas::geometry::Point;
use petri_canvas::hit_test::Hit;
use petri_canvas::painter::{RecordingSurface, Surface};
use petri_canvas::scheduler::ManualRefresh;
use petri_core::config::AppConfig;
use petri_core::interfaces::DisplayFlags;
use petri_core::snapshot::Snapshot;

use crate::cli::{OutputFormat, ViewArgs};
use crate::demo;

/// Display overrides taken from the render flags.
pub struct RenderFlags {
    pub selected: Option<String>,
    pub hud: bool,
    pub no_grid: bool,
    pub no_zones: bool,
}

fn surface_size(config: &AppConfig, view: &ViewArgs) -> (u32, u32) {
    (
        view.width.unwrap_or(config.view.default_width),
        view.height.unwrap_or(config.view.default_height),
    )
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}

/// Mount an engine on `surface` with the snapshot and view applied.
fn mount<S: Surface>(
    surface: S,
    config: &AppConfig,
    snapshot: Snapshot,
    view: &ViewArgs,
) -> CanvasEngine<S, ManualRefresh> {
    let mut engine = CanvasEngine::initialize(surface, ManualRefresh::new(), config.clone());
    engine.set_snapshot(snapshot);
    engine.set_view(view.pan_x, view.pan_y, view.scale);
    engine
}

fn headless(
    config: &AppConfig,
    snapshot: Snapshot,
    view: &ViewArgs,
) -> CanvasEngine<RecordingSurface, ManualRefresh> {
    let (w, h) = surface_size(config, view);
    mount(RecordingSurface::new(w as f64, h as f64), config, snapshot, view)
}

fn apply_flags<S: Surface>(engine: &mut CanvasEngine<S, ManualRefresh>, flags: RenderFlags) {
    engine.set_display(&DisplayFlags {
        show_grid: flags.no_grid.then_some(false),
        show_zones: flags.no_zones.then_some(false),
        show_hud: flags.hud.then_some(true),
        point_radius: None,
    });
    engine.select(flags.selected);
}

fn write_output(out: Option<&PathBuf>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn render(
    config: &AppConfig,
    snapshot_path: &Path,
    view: &ViewArgs,
    flags: RenderFlags,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    match format {
        OutputFormat::Json => {
            let mut engine = headless(config, snapshot, view);
            apply_flags(&mut engine, flags);
            let Some(report) = engine.pump() else {
                bail!("nothing was drawn: surface has no area");
            };
            tracing::info!(
                detail = report.detail.label(),
                drawn = report.entities_drawn,
                culled = report.entities_culled,
                "frame rendered"
            );
            let json = serde_json::to_vec_pretty(&serde_json::json!({
                "report": report,
                "commands": engine.surface().commands(),
            }))?;
            write_output(out.as_ref(), &json)
        }
        OutputFormat::Png => render_png(config, snapshot, view, flags, out),
    }
}

#[cfg(feature = "skia")]
fn render_png(
    config: &AppConfig,
    snapshot: Snapshot,
    view: &ViewArgs,
    flags: RenderFlags,
    out: Option<PathBuf>,
) -> Result<()> {
    use petri_canvas::skia::SkiaSurface;

    let Some(out) = out else {
        bail!("--out is required for png output");
    };
    let (w, h) = surface_size(config, view);
    let mut engine = mount(SkiaSurface::new(w, h)?, config, snapshot, view);
    apply_flags(&mut engine, flags);
    if engine.pump().is_none() {
        bail!("nothing was drawn: surface has no area");
    }
    let png = engine.surface_mut().encode_png()?;
    std::fs::write(&out, png).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), "png written");
    Ok(())
}

#[cfg(not(feature = "skia"))]
fn render_png(
    _config: &AppConfig,
    _snapshot: Snapshot,
    _view: &ViewArgs,
    _flags: RenderFlags,
    _out: Option<PathBuf>,
) -> Result<()> {
    bail!("png output requires building petri with the `skia` feature")
}

pub fn hit(
    config: &AppConfig,
    snapshot_path: &Path,
    x: f64,
    y: f64,
    view: &ViewArgs,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let engine = headless(config, snapshot, view);
    match engine.hit_at(Point::new(x, y)) {
        Some(Hit::Entity(i)) => {
            let b = &engine.snapshot().bacteria[i];
            println!("entity {} {}", b.id, b.status.as_str());
        }
        Some(Hit::Zone(i)) => {
            println!("zone {}", engine.snapshot().zones[i].id);
        }
        None => println!("none"),
    }
    Ok(())
}

pub fn inspect(config: &AppConfig, snapshot_path: &Path, view: &ViewArgs) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let mut engine = headless(config, snapshot, view);
    let report = engine.pump();

    let snap = engine.snapshot();
    let (ew, eh) = snap.grid.domain_extent();
    println!("timestamp: {}", snap.timestamp.to_rfc3339());
    println!("bacteria:  {}", snap.bacteria.len());
    println!("zones:     {}", snap.zones.len());
    println!("grid:      {}x{} cells, extent {ew}x{eh}", snap.grid.width, snap.grid.height);
    println!(
        "index:     {} points, depth {}, {} nodes",
        engine.index().len(),
        engine.index().depth(),
        engine.index().node_count()
    );
    match report {
        Some(r) => {
            println!("detail:    {}", r.detail.label());
            println!("visible:   {} drawn, {} culled", r.entities_drawn, r.entities_culled);
        }
        None => println!("detail:    (surface has no area)"),
    }
    let stats = engine.stats();
    match stats.last_ms() {
        Some(ms) => println!("frame:     {ms:.3} ms ({} drawn)", stats.frames()),
        None => println!("frame:     none drawn"),
    }
    Ok(())
}

pub fn demo(count: usize, zones: usize, seed: Option<u64>, out: Option<PathBuf>) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let snapshot = demo::generate(count, zones, seed);
    tracing::info!(count, zones, seed, "demo snapshot generated");
    let json = serde_json::to_vec_pretty(&snapshot)?;
    write_output(out.as_ref(), &json)
}
