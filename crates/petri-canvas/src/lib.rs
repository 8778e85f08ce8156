pub mod colors;
pub mod controller;
pub mod engine;
pub mod geometry;
pub mod hit_test;
pub mod lod;
pub mod painter;
pub mod quadtree;
pub mod renderer;
pub mod scheduler;
#[cfg(feature = "skia")]
pub mod skia;
pub mod stats;
pub mod viewport;

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use petri_core::config::AppConfig;
use petri_core::interfaces::{CanvasController, ViewportState};

use controller::{CanvasCommand, PetriCanvasController};
use engine::CanvasEngine;
use painter::Surface;
use scheduler::RefreshSource;

/// Build the canvas engine and its controller.
///
/// Returns:
/// - `CanvasEngine`: owned by the surface thread
/// - `mpsc::Receiver<CanvasCommand>`: drained with `CanvasEngine::drain_commands` each tick
/// - `Box<dyn CanvasController>`: thread-safe controller for the snapshot feed and UI
pub fn build_canvas<S: Surface, R: RefreshSource>(
    surface: S,
    refresh: R,
    config: AppConfig,
) -> (
    CanvasEngine<S, R>,
    mpsc::Receiver<CanvasCommand>,
    Box<dyn CanvasController>,
) {
    let mut engine = CanvasEngine::initialize(surface, refresh, config);

    let viewport = Arc::new(Mutex::new(ViewportState::default()));
    engine.attach_viewport_mirror(viewport.clone());

    let (sender, receiver) = mpsc::channel::<CanvasCommand>();
    let controller = PetriCanvasController::new(sender, viewport);

    (engine, receiver, Box::new(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use painter::RecordingSurface;
    use scheduler::ManualRefresh;

    #[test]
    fn controller_commands_reach_engine() {
        let (mut engine, rx, controller) = build_canvas(
            RecordingSurface::new(800.0, 600.0),
            ManualRefresh::new(),
            AppConfig::default(),
        );
        controller.zoom_in();
        controller.pan_by(10.0, 0.0);
        assert_eq!(engine.drain_commands(&rx), 2);
        let mirrored = controller.get_viewport();
        assert_eq!(mirrored, engine.viewport());
        assert!(mirrored.scale > 1.0);
    }
}
