use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use petri_core::interfaces::{CanvasController, DisplayFlags, ViewportState};
use petri_core::snapshot::Snapshot;

/// Commands sent from a [`PetriCanvasController`] to the thread that owns the engine.
#[derive(Debug, Clone)]
pub enum CanvasCommand {
    PushSnapshot(Box<Snapshot>),
    ZoomIn,
    ZoomOut,
    ResetView,
    PanBy(f64, f64),
    ZoomToPoint { x: f64, y: f64, factor: f64 },
    /// Select a bacterium by id, or clear the selection.
    Select(Option<String>),
    SetDisplay(DisplayFlags),
    Redraw,
}

/// Thread-safe [`CanvasController`].
///
/// Commands go through an `mpsc::Sender` and are drained by the owning thread
/// each tick; the viewport is mirrored in `Arc<Mutex<ViewportState>>` by the
/// engine after every frame.
pub struct PetriCanvasController {
    sender: mpsc::Sender<CanvasCommand>,
    viewport: Arc<Mutex<ViewportState>>,
}

impl PetriCanvasController {
    pub fn new(sender: mpsc::Sender<CanvasCommand>, viewport: Arc<Mutex<ViewportState>>) -> Self {
        Self { sender, viewport }
    }

    fn send(&self, cmd: CanvasCommand) {
        if self.sender.send(cmd).is_err() {
            tracing::debug!("canvas engine gone, command dropped");
        }
    }
}

impl CanvasController for PetriCanvasController {
    fn push_snapshot(&self, snapshot: Snapshot) {
        self.send(CanvasCommand::PushSnapshot(Box::new(snapshot)));
    }

    fn zoom_in(&self) {
        self.send(CanvasCommand::ZoomIn);
    }

    fn zoom_out(&self) {
        self.send(CanvasCommand::ZoomOut);
    }

    fn reset_view(&self) {
        self.send(CanvasCommand::ResetView);
    }

    fn pan_by(&self, dx: f64, dy: f64) {
        self.send(CanvasCommand::PanBy(dx, dy));
    }

    fn zoom_to_point(&self, x: f64, y: f64, factor: f64) {
        self.send(CanvasCommand::ZoomToPoint { x, y, factor });
    }

    fn select(&self, entity_id: Option<String>) {
        self.send(CanvasCommand::Select(entity_id));
    }

    fn set_display(&self, flags: DisplayFlags) {
        self.send(CanvasCommand::SetDisplay(flags));
    }

    fn request_redraw(&self) {
        self.send(CanvasCommand::Redraw);
    }

    fn get_viewport(&self) -> ViewportState {
        self.viewport.lock().map(|v| *v).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_arrive_in_order() {
        let (tx, rx) = mpsc::channel();
        let viewport = Arc::new(Mutex::new(ViewportState::default()));
        let controller = PetriCanvasController::new(tx, viewport);
        controller.zoom_in();
        controller.pan_by(3.0, 4.0);
        controller.select(Some("b1".into()));
        let got: Vec<_> = rx.try_iter().collect();
        assert!(matches!(got[0], CanvasCommand::ZoomIn));
        assert!(matches!(got[1], CanvasCommand::PanBy(x, y) if x == 3.0 && y == 4.0));
        assert!(matches!(&got[2], CanvasCommand::Select(Some(id)) if id == "b1"));
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let controller =
            PetriCanvasController::new(tx, Arc::new(Mutex::new(ViewportState::default())));
        controller.request_redraw();
    }

    #[test]
    fn viewport_reads_mirror() {
        let (tx, _rx) = mpsc::channel();
        let viewport = Arc::new(Mutex::new(ViewportState::new(320.0, 240.0)));
        let controller = PetriCanvasController::new(tx, viewport.clone());
        viewport.lock().unwrap().scale = 2.0;
        let v = controller.get_viewport();
        assert_eq!((v.width, v.scale), (320.0, 2.0));
    }
}
