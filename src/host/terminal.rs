//! Terminal host adapter built on crossterm mouse events.
//!
//! Cells are mapped to canvas units through a [`CellScale`], so a tile laid
//! out in canvas pixels can be driven from a terminal grid. Press and
//! release only react to the left button; scroll events are ignored.

use std::cell::Cell;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::engine::InteractionEngine;
use crate::geometry::Point;

use super::PointerSource;

/// Canvas units covered by one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub x: f64,
    pub y: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Pointer dispatch derived from a terminal mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move,
    Down,
    Up,
}

pub fn classify(event: &MouseEvent) -> Option<PointerAction> {
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(PointerAction::Move),
        MouseEventKind::Down(MouseButton::Left) => Some(PointerAction::Down),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerAction::Up),
        _ => None,
    }
}

/// Pointer source fed from the last terminal mouse event.
#[derive(Debug, Default)]
pub struct TerminalPointer {
    position: Cell<Point>,
    scale: CellScale,
}

impl TerminalPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(scale: CellScale) -> Self {
        Self {
            position: Cell::new(Point::default()),
            scale,
        }
    }

    /// Canvas position of the centre of the event's cell.
    pub fn to_canvas(&self, event: &MouseEvent) -> Point {
        Point::new(
            (f64::from(event.column) + 0.5) * self.scale.x,
            (f64::from(event.row) + 0.5) * self.scale.y,
        )
    }

    /// Records the event position; returns whether it moved.
    pub fn track(&self, event: &MouseEvent) -> bool {
        let next = self.to_canvas(event);
        let moved = next != self.position.get();
        self.position.set(next);
        moved
    }
}

impl PointerSource for TerminalPointer {
    fn pointer_position(&self) -> Point {
        self.position.get()
    }
}

/// Feeds one crossterm mouse event to the engine.
///
/// Terminals without motion reporting only send button events, so a press or
/// release at a new cell is preceded by a synthetic move to keep hover
/// membership current.
pub fn route_mouse_event(
    engine: &mut InteractionEngine,
    pointer: &TerminalPointer,
    event: MouseEvent,
) -> Option<PointerAction> {
    let action = classify(&event)?;
    let moved = pointer.track(&event);
    match action {
        PointerAction::Move => engine.on_pointer_move(),
        PointerAction::Down => {
            if moved {
                engine.on_pointer_move();
            }
            engine.on_pointer_down();
        }
        PointerAction::Up => {
            if moved {
                engine.on_pointer_move();
            }
            engine.on_pointer_up();
        }
    }
    Some(action)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::config::{MapConfigSource, RegionConfig, StateDefinition};
    use crate::engine::EngineConfig;
    use crate::geometry::Rect;
    use crate::host::{HostServices, Tile};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn classify_maps_left_button_and_motion() {
        assert_eq!(classify(&mouse(MouseEventKind::Moved, 0, 0)), Some(PointerAction::Move));
        assert_eq!(
            classify(&mouse(MouseEventKind::Drag(MouseButton::Right), 0, 0)),
            Some(PointerAction::Move)
        );
        assert_eq!(
            classify(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0)),
            Some(PointerAction::Down)
        );
        assert_eq!(classify(&mouse(MouseEventKind::Up(MouseButton::Right), 0, 0)), None);
        assert_eq!(classify(&mouse(MouseEventKind::ScrollDown, 0, 0)), None);
    }

    #[test]
    fn pointer_scales_cells_to_canvas_units() {
        let pointer = TerminalPointer::with_scale(CellScale { x: 10.0, y: 20.0 });
        assert!(pointer.track(&mouse(MouseEventKind::Moved, 3, 1)));
        assert_eq!(pointer.pointer_position(), Point::new(35.0, 30.0));
        assert!(!pointer.track(&mouse(MouseEventKind::Moved, 3, 1)));
    }

    #[test]
    fn click_without_prior_motion_hovers_then_presses() {
        let source = MapConfigSource::new().with(
            "button",
            RegionConfig::new()
                .with_hover(StateDefinition::new("h.png"))
                .with_pressed(StateDefinition::new("p.png")),
        );
        let pointer = Rc::new(TerminalPointer::new());
        let mut engine =
            InteractionEngine::new(HostServices::new(source, pointer.clone()), EngineConfig::default());
        engine.on_ready();
        let tile = Tile::new("button", Rect::new(2.0, 2.0, 4.0, 2.0), 0, "d.png").into_ref();
        engine.add_region(tile.clone());

        let routed = route_mouse_event(
            &mut engine,
            &pointer,
            mouse(MouseEventKind::Down(MouseButton::Left), 3, 3),
        );
        assert_eq!(routed, Some(PointerAction::Down));
        assert!(engine.is_pressed("button"));
        assert_eq!(tile.borrow().image, "p.png");

        route_mouse_event(&mut engine, &pointer, mouse(MouseEventKind::Up(MouseButton::Left), 3, 3));
        assert_eq!(tile.borrow().image, "h.png");

        route_mouse_event(&mut engine, &pointer, mouse(MouseEventKind::Moved, 40, 40));
        assert_eq!(tile.borrow().image, "d.png");
        assert_eq!(
            route_mouse_event(&mut engine, &pointer, mouse(MouseEventKind::ScrollUp, 0, 0)),
            None
        );
    }
}
