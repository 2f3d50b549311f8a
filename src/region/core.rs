use std::rc::Rc;

use crate::config::{RegionConfig, StateDefinition, StateName, StateSlot};
use crate::geometry::{Point, Rect};
use crate::host::{DisplaySurface, RegionId, TileRef};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

/// Whether an event keeps propagating to lower regions after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

impl EventFlow {
    pub fn from_passthrough(passthrough: bool) -> Self {
        if passthrough {
            Self::Continue
        } else {
            Self::Consumed
        }
    }

    pub fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Hover and press flags of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub hovered: bool,
    pub pressed: bool,
}

/// Configured states plus the synthesized `default` built from the tile's
/// original image.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStates {
    pub default: StateDefinition,
    pub hover: StateSlot,
    pub pressed: StateSlot,
    pub released: StateSlot,
}

impl RegionStates {
    pub fn from_config(config: RegionConfig, default_image: impl Into<String>) -> Self {
        Self {
            default: StateDefinition::new(default_image),
            hover: config.hover,
            pressed: config.pressed,
            released: config.released,
        }
    }

    pub fn slot(&self, name: StateName) -> Option<&StateDefinition> {
        match name {
            StateName::Default => Some(&self.default),
            StateName::Hover => self.hover.definition(),
            StateName::Pressed => self.pressed.definition(),
            StateName::Released => self.released.definition(),
        }
    }

    /// Every image this region may display, default last.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        [&self.hover, &self.pressed, &self.released]
            .into_iter()
            .filter_map(StateSlot::image_ref)
            .chain(std::iter::once(self.default.image_ref.as_str()))
    }
}

/// One tracked tile and its hover / press state machine.
pub struct ManagedRegion {
    id: RegionId,
    tile: TileRef,
    states: RegionStates,
    state: InteractionState,
    displayed: String,
    surface: Rc<dyn DisplaySurface>,
    logger: Option<Logger>,
}

impl ManagedRegion {
    pub fn new(
        tile: TileRef,
        config: RegionConfig,
        surface: Rc<dyn DisplaySurface>,
        logger: Option<Logger>,
    ) -> Self {
        let (id, image) = {
            let data = tile.borrow();
            (data.id.clone(), data.image.clone())
        };
        Self {
            id,
            tile,
            states: RegionStates::from_config(config, image.clone()),
            state: InteractionState::default(),
            displayed: image,
            surface,
            logger,
        }
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn tile(&self) -> &TileRef {
        &self.tile
    }

    pub fn bounds(&self) -> Rect {
        self.tile.borrow().bounds
    }

    pub fn z(&self) -> i64 {
        self.tile.borrow().z
    }

    pub fn states(&self) -> &RegionStates {
        &self.states
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.state.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.state.pressed
    }

    /// Last image this region asked the surface to show.
    pub fn displayed_image(&self) -> &str {
        &self.displayed
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    pub fn enter_hover(&mut self) -> EventFlow {
        let Some(hover) = self.states.hover.definition() else {
            return EventFlow::Continue;
        };
        let flow = EventFlow::from_passthrough(hover.passthrough);
        if self.state.hovered {
            return flow;
        }

        let image = hover.image_ref.clone();
        self.trace("mouse_over");
        self.state.hovered = true;
        self.set_image(&image);
        flow
    }

    pub fn exit_hover(&mut self) {
        if !self.state.hovered {
            return;
        }
        self.state.hovered = false;
        self.trace("mouse_out");
        self.reset();
    }

    pub fn press(&mut self) -> EventFlow {
        let Some(pressed) = self.states.pressed.definition() else {
            return EventFlow::Continue;
        };
        let flow = EventFlow::from_passthrough(pressed.passthrough);
        let image = pressed.image_ref.clone();

        self.trace("pressed");
        self.state.pressed = true;
        self.set_image(&image);
        flow
    }

    /// Clears the pressed flag whether or not a released state is configured.
    pub fn release(&mut self) -> EventFlow {
        self.state.pressed = false;
        let Some(released) = self.states.released.definition() else {
            self.reset();
            return EventFlow::Continue;
        };
        let flow = EventFlow::from_passthrough(released.passthrough);
        let image = released.image_ref.clone();

        self.trace("released");
        self.set_image(&image);
        flow
    }

    /// Back to the hover image while hovered, otherwise to the default image.
    pub fn reset(&mut self) {
        let image = match (self.state.hovered, self.states.hover.image_ref()) {
            (true, Some(hover)) => hover.to_string(),
            _ => self.states.default.image_ref.clone(),
        };
        self.set_image(&image);
    }

    fn set_image(&mut self, image_ref: &str) {
        self.displayed = image_ref.to_string();
        self.surface.set_displayed_image(&self.tile, image_ref);
    }

    fn trace(&self, message: &str) {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(
                LogLevel::Debug,
                "tiles::region",
                message,
                [json_kv("region", self.id.as_str())],
            );
            let _ = logger.log_event(event);
        }
    }
}

impl std::fmt::Debug for ManagedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedRegion")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("displayed", &self.displayed)
            .finish_non_exhaustive()
    }
}
