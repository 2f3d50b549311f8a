//! Contracts the engine consumes from its host application.
//!
//! The host owns the tiles and hands the engine shared references to them;
//! everything else (texture loading, redraws, pointer position, the active
//! layer) is reached through the collaborator traits bundled in
//! [`HostServices`]. Host lifecycle and input callbacks are delivered as
//! [`HostHook`] values.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ConfigSource;
use crate::geometry::{Point, Rect};

pub mod terminal;

/// Stable identifier shared by a tile and the region tracking it.
pub type RegionId = String;

/// Host-side scene element a region is attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: RegionId,
    pub bounds: Rect,
    /// Draw order; higher values are drawn on top.
    pub z: i64,
    /// Image currently assigned by the host.
    pub image: String,
}

impl Tile {
    pub fn new(id: impl Into<RegionId>, bounds: Rect, z: i64, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bounds,
            z,
            image: image.into(),
        }
    }

    pub fn into_ref(self) -> TileRef {
        Rc::new(RefCell::new(self))
    }
}

/// Shared handle to a host tile. Regions keep a clone, so bounds and draw
/// order edited by the host are seen on the next pointer event.
pub type TileRef = Rc<RefCell<Tile>>;

/// Starts loading a texture. Completion is never awaited.
pub trait ImageLoader {
    fn load_image(&self, image_ref: &str);
}

/// Redraws a tile with a different image.
pub trait DisplaySurface {
    fn set_displayed_image(&self, tile: &TileRef, image_ref: &str);
}

/// Current pointer position in canvas coordinates.
pub trait PointerSource {
    fn pointer_position(&self) -> Point;
}

/// Whether the host's current interaction layer is the one the engine serves.
pub trait LayerProbe {
    fn active_layer_matches(&self) -> bool;
}

impl<T: PointerSource + ?Sized> PointerSource for Rc<T> {
    fn pointer_position(&self) -> Point {
        (**self).pointer_position()
    }
}

impl<T: LayerProbe + ?Sized> LayerProbe for Rc<T> {
    fn active_layer_matches(&self) -> bool {
        (**self).active_layer_matches()
    }
}

impl<T: ImageLoader + ?Sized> ImageLoader for Rc<T> {
    fn load_image(&self, image_ref: &str) {
        (**self).load_image(image_ref)
    }
}

/// Surface that only writes the image onto the tile record. Useful when the
/// host redraws from tile state on its own schedule.
#[derive(Debug, Default, Clone, Copy)]
pub struct TileImageSurface;

impl DisplaySurface for TileImageSurface {
    fn set_displayed_image(&self, tile: &TileRef, image_ref: &str) {
        tile.borrow_mut().image = image_ref.to_string();
    }
}

/// Loader that skips preloading entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreload;

impl ImageLoader for NoPreload {
    fn load_image(&self, _image_ref: &str) {}
}

/// Layer probe that always reports the expected layer as active.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysActive;

impl LayerProbe for AlwaysActive {
    fn active_layer_matches(&self) -> bool {
        true
    }
}

/// Collaborators injected into the engine at construction.
pub struct HostServices {
    pub config: Box<dyn ConfigSource>,
    pub images: Box<dyn ImageLoader>,
    pub surface: Rc<dyn DisplaySurface>,
    pub pointer: Box<dyn PointerSource>,
    pub layer: Box<dyn LayerProbe>,
}

impl HostServices {
    /// Services with no preloading, tile-record redraws and an always-active
    /// layer. Hosts override the fields they care about.
    pub fn new<C, P>(config: C, pointer: P) -> Self
    where
        C: ConfigSource + 'static,
        P: PointerSource + 'static,
    {
        Self {
            config: Box::new(config),
            images: Box::new(NoPreload),
            surface: Rc::new(TileImageSurface),
            pointer: Box::new(pointer),
            layer: Box::new(AlwaysActive),
        }
    }

    pub fn with_images<I: ImageLoader + 'static>(mut self, images: I) -> Self {
        self.images = Box::new(images);
        self
    }

    pub fn with_surface(mut self, surface: Rc<dyn DisplaySurface>) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_layer<L: LayerProbe + 'static>(mut self, layer: L) -> Self {
        self.layer = Box::new(layer);
        self
    }
}

/// Host callbacks the engine subscribes to.
#[derive(Debug, Clone)]
pub enum HostHook {
    /// The host finished booting and input may be delivered.
    Ready,
    /// A new scene was drawn; carries every tile on it.
    SceneLoaded(Vec<TileRef>),
    RegionCreated(TileRef),
    RegionAboutToBeDeleted(TileRef),
    /// The host refreshed its layers; the active layer may have changed.
    Refresh,
    PointerMove,
    PointerDown,
    PointerUp,
}

impl HostHook {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::SceneLoaded(_) => "scene_loaded",
            Self::RegionCreated(_) => "region_created",
            Self::RegionAboutToBeDeleted(_) => "region_about_to_be_deleted",
            Self::Refresh => "refresh",
            Self::PointerMove => "pointer_move",
            Self::PointerDown => "pointer_down",
            Self::PointerUp => "pointer_up",
        }
    }
}
