//! Contracts between the canvas engine and the collaborators around it.

use crate::snapshot::Snapshot;

/// Drives the canvas from outside the thread that owns the drawing surface.
/// Implemented by petri-canvas.
pub trait CanvasController: Send + Sync {
    fn push_snapshot(&self, snapshot: Snapshot);
    fn zoom_in(&self);
    fn zoom_out(&self);
    fn reset_view(&self);
    fn pan_by(&self, dx: f64, dy: f64);
    fn zoom_to_point(&self, x: f64, y: f64, factor: f64);
    fn select(&self, entity_id: Option<String>);
    fn set_display(&self, flags: DisplayFlags);
    fn request_redraw(&self);
    fn get_viewport(&self) -> ViewportState;
}

/// Pan/zoom state of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
            width,
            height,
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Externally owned display toggles. `None` leaves a flag unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayFlags {
    pub show_grid: Option<bool>,
    pub show_zones: Option<bool>,
    pub show_hud: Option<bool>,
    pub point_radius: Option<f64>,
}

/// Events reported by the canvas after resolving pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    EntitySelected { entity_id: String },
    ZoneActivated { zone_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_event_is_send_and_clone() {
        fn assert_send<T: Send>() {}
        fn assert_clone<T: Clone>() {}
        assert_send::<CanvasEvent>();
        assert_clone::<CanvasEvent>();

        let event = CanvasEvent::ZoneActivated {
            zone_id: "zone-3".into(),
        };
        match event.clone() {
            CanvasEvent::ZoneActivated { zone_id } => assert_eq!(zone_id, "zone-3"),
            CanvasEvent::EntitySelected { .. } => panic!("wrong variant"),
        }
    }

    #[test]
    fn zero_sized_viewport_has_no_area() {
        assert!(!ViewportState::new(0.0, 600.0).has_area());
        assert!(ViewportState::default().has_area());
    }
}
