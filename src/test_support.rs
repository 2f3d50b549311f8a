//! Recording collaborators shared by unit tests.

use std::cell::{Cell, RefCell};

use crate::geometry::Point;
use crate::host::{DisplaySurface, ImageLoader, LayerProbe, PointerSource, RegionId, TileRef};

#[derive(Default)]
pub struct RecordingSurface {
    calls: RefCell<Vec<(RegionId, String)>>,
}

impl RecordingSurface {
    pub fn images(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(_, img)| img.clone()).collect()
    }

    pub fn images_for(&self, id: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(region, _)| region == id)
            .map(|(_, img)| img.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_displayed_image(&self, tile: &TileRef, image_ref: &str) {
        let id = tile.borrow().id.clone();
        self.calls.borrow_mut().push((id, image_ref.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingLoader {
    loaded: RefCell<Vec<String>>,
}

impl RecordingLoader {
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }
}

impl ImageLoader for RecordingLoader {
    fn load_image(&self, image_ref: &str) {
        self.loaded.borrow_mut().push(image_ref.to_string());
    }
}

#[derive(Default)]
pub struct ManualPointer {
    position: Cell<Point>,
}

impl ManualPointer {
    pub fn move_to(&self, x: f64, y: f64) {
        self.position.set(Point::new(x, y));
    }
}

impl PointerSource for ManualPointer {
    fn pointer_position(&self) -> Point {
        self.position.get()
    }
}

pub struct ToggleLayer {
    active: Cell<bool>,
}

impl Default for ToggleLayer {
    fn default() -> Self {
        Self {
            active: Cell::new(true),
        }
    }
}

impl ToggleLayer {
    pub fn set(&self, active: bool) {
        self.active.set(active);
    }
}

impl LayerProbe for ToggleLayer {
    fn active_layer_matches(&self) -> bool {
        self.active.get()
    }
}
