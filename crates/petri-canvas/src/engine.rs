//! Engine lifecycle: owns the surface, the current snapshot and its index,
//! and runs the render pipeline when the scheduler fires.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use petri_core::config::AppConfig;
use petri_core::interfaces::{CanvasEvent, DisplayFlags, ViewportState};
use petri_core::snapshot::{AntibioticZone, Bacterium, Snapshot};

use crate::controller::CanvasCommand;
use crate::geometry::Point;
use crate::hit_test::{self, Hit};
use crate::painter::Surface;
use crate::quadtree::Quadtree;
use crate::renderer::{render_frame, DisplayOptions, FrameReport, Scene};
use crate::scheduler::{FrameScheduler, FrameToken, ManualRefresh, RefreshSource, SchedulerState};
use crate::stats::FrameStats;
use crate::viewport::{ViewTransform, Viewport};

/// What changed since the last drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub snapshot: bool,
    pub viewport: bool,
    pub display: bool,
}

impl DirtyFlags {
    pub fn all() -> Self {
        Self {
            snapshot: true,
            viewport: true,
            display: true,
        }
    }

    pub fn any(&self) -> bool {
        self.snapshot || self.viewport || self.display
    }

    /// Return the current flags and clear them.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

type EntityCallback = Box<dyn FnMut(&Bacterium)>;
type ZoneCallback = Box<dyn FnMut(&AntibioticZone)>;

pub struct CanvasEngine<S: Surface, R: RefreshSource> {
    surface: S,
    refresh: R,
    scheduler: FrameScheduler,
    config: AppConfig,
    viewport: Viewport,
    snapshot: Snapshot,
    index: Quadtree,
    options: DisplayOptions,
    dirty: DirtyFlags,
    stats: FrameStats,
    last_report: Option<FrameReport>,
    on_entity_selected: Option<EntityCallback>,
    on_zone_activated: Option<ZoneCallback>,
    events: Option<mpsc::Sender<CanvasEvent>>,
    viewport_mirror: Option<Arc<Mutex<ViewportState>>>,
}

impl<S: Surface, R: RefreshSource> CanvasEngine<S, R> {
    /// Mount on `surface`. An unattached surface yields a zero-sized viewport
    /// until [`resize`](Self::resize) is called; the first frame is scheduled.
    /// A config that fails validation is replaced by the defaults.
    pub fn initialize(surface: S, refresh: R, config: AppConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("invalid canvas config, using defaults: {e}");
                AppConfig::default()
            }
        };
        let (width, height) = surface.size().unwrap_or((0.0, 0.0));
        let viewport = Viewport::new(width, height, &config.view);
        let options = DisplayOptions::from_config(&config.render);
        let snapshot = Snapshot::default();
        let transform = ViewTransform::new(
            snapshot.grid.domain_extent(),
            viewport.state(),
            config.view.margin,
        );
        let index = Quadtree::new(transform.layout_bounds(), &config.index);

        let mut engine = Self {
            surface,
            refresh,
            scheduler: FrameScheduler::new(),
            config,
            viewport,
            snapshot,
            index,
            options,
            dirty: DirtyFlags::all(),
            stats: FrameStats::new(),
            last_report: None,
            on_entity_selected: None,
            on_zone_activated: None,
            events: None,
            viewport_mirror: None,
        };
        engine.schedule();
        tracing::info!(width, height, "canvas engine initialized");
        engine
    }

    /// Unmount: cancel any pending frame and hand the surface and refresh
    /// source back.
    pub fn teardown(mut self) -> (S, R) {
        self.scheduler.cancel(&mut self.refresh);
        tracing::info!(
            frames = self.stats.frames(),
            mean_ms = self.stats.mean_ms().unwrap_or(0.0),
            peak_ms = self.stats.peak_ms(),
            "canvas engine torn down"
        );
        (self.surface, self.refresh)
    }

    pub fn on_entity_selected<F: FnMut(&Bacterium) + 'static>(&mut self, f: F) {
        self.on_entity_selected = Some(Box::new(f));
    }

    pub fn on_zone_activated<F: FnMut(&AntibioticZone) + 'static>(&mut self, f: F) {
        self.on_zone_activated = Some(Box::new(f));
    }

    pub fn set_event_sender(&mut self, sender: mpsc::Sender<CanvasEvent>) {
        self.events = Some(sender);
    }

    /// Keep `mirror` in sync with the viewport for readers on other threads.
    pub fn attach_viewport_mirror(&mut self, mirror: Arc<Mutex<ViewportState>>) {
        self.viewport_mirror = Some(mirror);
        self.sync_mirror();
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    /// Replace the snapshot and rebuild the index.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.rebuild_index();
        self.dirty.snapshot = true;
        self.schedule();
    }

    /// Adopt a new surface size and rebuild the index for the new layout.
    /// Also reschedules a frame that was deferred while the surface was away.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.viewport.resize(width, height) {
            self.rebuild_index();
            self.viewport_changed();
        } else if self.dirty.any() && !self.scheduler.is_scheduled() {
            self.schedule();
        }
    }

    pub fn zoom_in(&mut self) {
        if self.viewport.zoom_in() {
            self.viewport_changed();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.viewport.zoom_out() {
            self.viewport_changed();
        }
    }

    pub fn reset_view(&mut self) {
        if self.viewport.reset() {
            self.viewport_changed();
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if self.viewport.pan_by(dx, dy) {
            self.viewport_changed();
        }
    }

    pub fn zoom_to_point(&mut self, px: f64, py: f64, factor: f64) {
        if self.viewport.zoom_to_point(px, py, factor) {
            self.viewport_changed();
        }
    }

    pub fn wheel(&mut self, px: f64, py: f64, delta_y: f64) {
        if self.viewport.wheel(px, py, delta_y) {
            self.viewport_changed();
        }
    }

    pub fn set_view(&mut self, pan_x: f64, pan_y: f64, scale: f64) {
        if self.viewport.set_view(pan_x, pan_y, scale) {
            self.viewport_changed();
        }
    }

    pub fn set_display(&mut self, flags: &DisplayFlags) {
        if self.options.apply(flags) {
            self.display_changed();
        }
    }

    pub fn select(&mut self, entity_id: Option<String>) {
        if self.options.selected_id != entity_id {
            self.options.selected_id = entity_id;
            self.display_changed();
        }
    }

    /// Resolve a pointer event and report what it hit. Selection itself stays
    /// with the host, which answers through [`select`](Self::select).
    pub fn pointer(&mut self, event: PointerEvent) -> Option<Hit> {
        let hit = self.hit_at(Point::new(event.x, event.y));
        match hit {
            Some(Hit::Entity(i)) => {
                let Some(b) = self.snapshot.bacteria.get(i) else {
                    return hit;
                };
                tracing::info!(
                    id = %b.id,
                    status = b.status.as_str(),
                    kind = ?event.kind,
                    "bacterium selected"
                );
                if let Some(cb) = self.on_entity_selected.as_mut() {
                    cb(b);
                }
                if let Some(tx) = &self.events {
                    let _ = tx.send(CanvasEvent::EntitySelected {
                        entity_id: b.id.clone(),
                    });
                }
            }
            Some(Hit::Zone(i)) => {
                let Some(z) = self.snapshot.zones.get(i) else {
                    return hit;
                };
                tracing::info!(id = %z.id, kind = ?event.kind, "zone activated");
                if let Some(cb) = self.on_zone_activated.as_mut() {
                    cb(z);
                }
                if let Some(tx) = &self.events {
                    let _ = tx.send(CanvasEvent::ZoneActivated {
                        zone_id: z.id.clone(),
                    });
                }
            }
            None => {}
        }
        hit
    }

    pub fn apply_command(&mut self, cmd: CanvasCommand) {
        match cmd {
            CanvasCommand::PushSnapshot(snapshot) => self.set_snapshot(*snapshot),
            CanvasCommand::ZoomIn => self.zoom_in(),
            CanvasCommand::ZoomOut => self.zoom_out(),
            CanvasCommand::ResetView => self.reset_view(),
            CanvasCommand::PanBy(dx, dy) => self.pan_by(dx, dy),
            CanvasCommand::ZoomToPoint { x, y, factor } => self.zoom_to_point(x, y, factor),
            CanvasCommand::Select(id) => self.select(id),
            CanvasCommand::SetDisplay(flags) => self.set_display(&flags),
            CanvasCommand::Redraw => {
                self.dirty = DirtyFlags::all();
                self.schedule();
            }
        }
    }

    /// Apply every queued command without blocking. Returns how many were applied.
    pub fn drain_commands(&mut self, receiver: &mpsc::Receiver<CanvasCommand>) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = receiver.try_recv() {
            self.apply_command(cmd);
            applied += 1;
        }
        applied
    }

    // ── Frames ──────────────────────────────────────────────────────────

    /// Refresh callback. Draws once if `token` is current and something is dirty.
    /// Without a surface the dirty flags are kept for the next frame.
    pub fn on_frame(&mut self, token: FrameToken) -> Option<FrameReport> {
        if !self.scheduler.fire(token) {
            return None;
        }
        if self.surface.size().is_none() {
            tracing::trace!(token = token.0, "surface unavailable, frame deferred");
            return None;
        }
        let dirty = self.dirty.take();
        if !dirty.any() {
            return None;
        }
        tracing::trace!(
            token = token.0,
            snapshot = dirty.snapshot,
            viewport = dirty.viewport,
            display = dirty.display,
            "frame"
        );
        self.draw()
    }

    /// Draw now, bypassing the scheduler. Any pending frame is cancelled.
    pub fn force_redraw(&mut self) -> Option<FrameReport> {
        self.scheduler.cancel(&mut self.refresh);
        self.dirty = DirtyFlags::default();
        self.draw()
    }

    fn draw(&mut self) -> Option<FrameReport> {
        let Some((width, height)) = self.surface.size() else {
            tracing::trace!("surface unavailable, frame skipped");
            return None;
        };
        if self.viewport.resize(width, height) {
            self.rebuild_index();
            self.sync_mirror();
        }

        let start = Instant::now();
        let transform = self.transform();
        self.surface.begin_frame();
        let report = render_frame(
            &mut self.surface,
            &Scene {
                snapshot: &self.snapshot,
                transform: &transform,
                options: &self.options,
                lod: &self.config.lod,
            },
        );
        self.surface.end_frame();
        self.stats.record(start.elapsed().as_secs_f64() * 1000.0);

        if report.is_some() {
            self.last_report = report;
        }
        report
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn hit_at(&self, pixel: Point) -> Option<Hit> {
        hit_test::hit_test(
            pixel,
            &self.transform(),
            &self.index,
            &self.snapshot.bacteria,
            &self.snapshot.zones,
            self.options.point_radius,
            self.config.render.hit_tolerance,
        )
    }

    pub fn entity_at(&self, pixel: Point) -> Option<&Bacterium> {
        let i = hit_test::hit_test_point(
            pixel,
            &self.transform(),
            &self.index,
            &self.snapshot.bacteria,
            self.options.point_radius,
            self.config.render.hit_tolerance,
        )?;
        self.snapshot.bacteria.get(i)
    }

    pub fn zone_at(&self, pixel: Point) -> Option<&AntibioticZone> {
        let i = hit_test::hit_test_zone(pixel, &self.transform(), &self.snapshot.zones)?;
        self.snapshot.zones.get(i)
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(
            self.snapshot.grid.domain_extent(),
            self.viewport.state(),
            self.config.view.margin,
        )
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn index(&self) -> &Quadtree {
        &self.index
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn refresh_mut(&mut self) -> &mut R {
        &mut self.refresh
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn schedule(&mut self) {
        self.scheduler.schedule(&mut self.refresh);
    }

    fn viewport_changed(&mut self) {
        self.dirty.viewport = true;
        self.sync_mirror();
        self.schedule();
    }

    fn display_changed(&mut self) {
        self.dirty.display = true;
        self.schedule();
    }

    fn sync_mirror(&self) {
        if let Some(mirror) = &self.viewport_mirror {
            if let Ok(mut v) = mirror.lock() {
                *v = self.viewport.state();
            }
        }
    }

    fn rebuild_index(&mut self) {
        let transform = self.transform();
        let bounds = transform.layout_bounds();
        let (ew, eh) = self.snapshot.grid.domain_extent();
        let bacteria = &self.snapshot.bacteria;
        self.index = Quadtree::build(
            bounds,
            &self.config.index,
            bacteria.iter().enumerate().map(|(i, b)| {
                let p = transform.to_layout(b.position);
                // Points on the far edge of the extent can round a hair past the root.
                let in_extent = (0.0..=ew).contains(&b.position.x)
                    && (0.0..=eh).contains(&b.position.y);
                (i, if in_extent { bounds.clamp(p) } else { p })
            }),
        );
        tracing::debug!(
            bacteria = bacteria.len(),
            indexed = self.index.len(),
            depth = self.index.depth(),
            "index rebuilt"
        );
    }
}

impl<S: Surface> CanvasEngine<S, ManualRefresh> {
    /// Fire every live token from the manual refresh source. Returns the last
    /// report drawn, if any.
    pub fn pump(&mut self) -> Option<FrameReport> {
        let mut report = None;
        for token in self.refresh.tick() {
            if let Some(r) = self.on_frame(token) {
                report = Some(r);
            }
        }
        report
    }
}
