//! Pointer dispatch over the set of managed regions.
//!
//! The engine hit-tests every tracked region on pointer movement, orders the
//! regions under the pointer by descending draw order and walks that list:
//! regions keep receiving mouse-over until one of them consumes the hover,
//! after which every region below it is treated as moused-out. Presses
//! follow the same order over the regions that actually received the hover;
//! releases walk the pressed regions in press order.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::Result;
use crate::geometry::Point;
use crate::host::{HostHook, HostServices, RegionId, TileRef};
use crate::logging::{FileSink, LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{InteractionMetrics, MetricSnapshot};
use crate::region::{EventFlow, ManagedRegion};

pub mod audit;

use audit::{AuditEventBuilder, AuditStage, EngineAudit, NullEngineAudit};

/// Ambient knobs for the engine: logging, metrics and auditing.
#[derive(Clone)]
pub struct EngineConfig {
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Counters shared with the host, if enabled.
    pub metrics: Option<Arc<Mutex<InteractionMetrics>>>,
    pub audit: Rc<dyn EngineAudit>,
    /// Target used for engine-level log events.
    pub log_target: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            audit: Rc::new(NullEngineAudit),
            log_target: "tiles::engine".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Logs to a JSON-lines file that is truncated once it would grow past
    /// `max_bytes` (`0` disables the limit).
    pub fn with_log_file(
        self,
        path: impl AsRef<Path>,
        max_bytes: u64,
        min_level: LogLevel,
    ) -> Result<Self> {
        let sink = FileSink::new(path, max_bytes)?;
        Ok(self.with_logger(Logger::new(sink).with_min_level(min_level)))
    }

    pub fn with_audit(mut self, audit: Rc<dyn EngineAudit>) -> Self {
        self.audit = audit;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(InteractionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<InteractionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

pub struct InteractionEngine {
    services: HostServices,
    config: EngineConfig,
    /// Tracked regions in insertion order; breaks ties between equal z.
    regions: Vec<ManagedRegion>,
    /// Every region whose bounds contained the pointer on the last move.
    hovered_all: HashSet<RegionId>,
    /// `hovered_all` sorted by descending z.
    hover_order: Vec<RegionId>,
    /// Regions that received mouse-over and have not been moused-out since.
    hovered: HashSet<RegionId>,
    /// Regions pressed and not yet released, in press order.
    pressed: Vec<RegionId>,
    ready: bool,
    active: bool,
}

impl InteractionEngine {
    pub fn new(services: HostServices, config: EngineConfig) -> Self {
        let engine = Self {
            services,
            config,
            regions: Vec::new(),
            hovered_all: HashSet::new(),
            hover_order: Vec::new(),
            hovered: HashSet::new(),
            pressed: Vec::new(),
            ready: false,
            active: true,
        };
        engine.audit(AuditEventBuilder::new(AuditStage::EngineConstructed));
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Single subscription entry point for host callbacks.
    pub fn on_hook(&mut self, hook: HostHook) {
        match hook {
            HostHook::Ready => self.on_ready(),
            HostHook::SceneLoaded(tiles) => self.on_scene_loaded(tiles),
            HostHook::RegionCreated(tile) => self.on_region_created(tile),
            HostHook::RegionAboutToBeDeleted(tile) => self.on_region_about_to_be_deleted(&tile),
            HostHook::Refresh => self.on_refresh(),
            HostHook::PointerMove => self.on_pointer_move(),
            HostHook::PointerDown => self.on_pointer_down(),
            HostHook::PointerUp => self.on_pointer_up(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Arms pointer handling. Input delivered before this is ignored.
    pub fn on_ready(&mut self) {
        self.ready = true;
        self.active = self.services.layer.active_layer_matches();
        self.log(
            LogLevel::Info,
            "ready",
            [json_kv("active", self.active), json_kv("tracked", self.regions.len())],
        );
        self.audit(AuditEventBuilder::new(AuditStage::Ready).detail("active", self.active));
    }

    /// Drops all tracked regions and interaction state, then tracks every
    /// configured tile of the new scene.
    pub fn on_scene_loaded<I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = TileRef>,
    {
        let dropped = self.regions.len();
        self.regions.clear();
        self.hovered_all.clear();
        self.hover_order.clear();
        self.hovered.clear();
        self.pressed.clear();
        self.record_metric(|m| m.record_untracked(dropped));

        for tile in tiles {
            self.add_region(tile);
        }

        self.log(
            LogLevel::Info,
            "scene_rescanned",
            [json_kv("dropped", dropped), json_kv("tracked", self.regions.len())],
        );
        self.audit(
            AuditEventBuilder::new(AuditStage::SceneRescanned).detail("tracked", self.regions.len()),
        );
    }

    pub fn on_region_created(&mut self, tile: TileRef) {
        self.add_region(tile);
    }

    pub fn on_region_about_to_be_deleted(&mut self, tile: &TileRef) {
        self.remove_region(tile);
    }

    /// Re-reads the active-layer gate.
    pub fn on_refresh(&mut self) {
        let active = self.services.layer.active_layer_matches();
        if active == self.active {
            return;
        }
        self.active = active;
        self.log(LogLevel::Debug, "activation_changed", [json_kv("active", active)]);
        self.audit(AuditEventBuilder::new(AuditStage::ActivationChanged).detail("active", active));
    }

    // -------------------------------------------------------------------------
    // Tracked set
    // -------------------------------------------------------------------------

    /// Tracks `tile` if the configuration source has a record for it.
    /// Returns whether the tile is now tracked by this call.
    pub fn add_region(&mut self, tile: TileRef) -> bool {
        let (id, config) = {
            let data = tile.borrow();
            (data.id.clone(), self.services.config.region_config(&data))
        };
        let Some(config) = config else {
            return false;
        };
        if self.is_tracked(&id) {
            self.log(LogLevel::Debug, "region_already_tracked", [json_kv("region", id)]);
            return false;
        }

        let region = ManagedRegion::new(
            tile,
            config,
            Rc::clone(&self.services.surface),
            self.config.logger.clone(),
        );
        for image in region.states().image_refs() {
            self.services.images.load_image(image);
        }
        self.regions.push(region);

        self.record_metric(|m| m.record_tracked(1));
        self.log(LogLevel::Debug, "region_tracked", [json_kv("region", id.as_str())]);
        self.audit(AuditEventBuilder::new(AuditStage::RegionTracked).detail("region", id));
        true
    }

    /// Stops tracking the region backed by `tile` and forgets its hover and
    /// press membership. No transitions are dispatched: the tile is going
    /// away with whatever image it currently shows.
    pub fn remove_region(&mut self, tile: &TileRef) -> bool {
        let Some(index) = self
            .regions
            .iter()
            .position(|region| Rc::ptr_eq(region.tile(), tile))
        else {
            return false;
        };

        let region = self.regions.remove(index);
        let id = region.id();
        self.hovered_all.remove(id);
        self.hover_order.retain(|other| other != id);
        self.hovered.remove(id);
        self.pressed.retain(|other| other != id);

        self.record_metric(|m| m.record_untracked(1));
        self.log(LogLevel::Debug, "region_untracked", [json_kv("region", id.as_str())]);
        self.audit(AuditEventBuilder::new(AuditStage::RegionUntracked).detail("region", id.as_str()));
        true
    }

    // -------------------------------------------------------------------------
    // Pointer events
    // -------------------------------------------------------------------------

    pub fn on_pointer_move(&mut self) {
        if !self.accepts_pointer() {
            return;
        }
        let position = self.services.pointer.pointer_position();
        let left = self.update_hovered_all(position);
        for id in &left {
            self.handle_mouse_out(id);
        }

        self.hover_order = self.sorted_hovered_all();

        let order = self.hover_order.clone();
        let mut live = true;
        for id in &order {
            if !live {
                self.handle_mouse_out(id);
                continue;
            }
            live = self.handle_mouse_over(id).is_continue();
        }
    }

    pub fn on_pointer_down(&mut self) {
        if !self.accepts_pointer() {
            return;
        }
        for id in self.hovered_in_order() {
            if self.handle_pressed(&id).is_consumed() {
                break;
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        if !self.accepts_pointer() {
            return;
        }
        let pressed = self.pressed.clone();
        for id in &pressed {
            if self.handle_released(id).is_consumed() {
                break;
            }
        }
    }

    pub fn handle_mouse_over(&mut self, id: &str) -> EventFlow {
        let Some(index) = self.index_of(id) else {
            return EventFlow::Continue;
        };
        self.hovered.insert(id.to_string());

        let region = &mut self.regions[index];
        let was_hovered = region.is_hovered();
        let flow = region.enter_hover();
        if !was_hovered && region.is_hovered() {
            self.record_metric(InteractionMetrics::record_hover_enter);
        }
        flow
    }

    /// Drops hover membership. A region that is no longer hovered cannot stay
    /// pressed, so any pending press is force-released first.
    pub fn handle_mouse_out(&mut self, id: &str) {
        self.hovered.remove(id);
        self.handle_released(id);

        let Some(index) = self.index_of(id) else {
            return;
        };
        let region = &mut self.regions[index];
        let was_hovered = region.is_hovered();
        region.exit_hover();
        if was_hovered {
            self.record_metric(InteractionMetrics::record_hover_exit);
        }
    }

    pub fn handle_pressed(&mut self, id: &str) -> EventFlow {
        let Some(index) = self.index_of(id) else {
            return EventFlow::Continue;
        };
        if !self.pressed.iter().any(|other| other == id) {
            self.pressed.push(id.to_string());
        }
        let region = &mut self.regions[index];
        let was_pressed = region.is_pressed();
        let flow = region.press();
        if !was_pressed && region.is_pressed() {
            self.record_metric(InteractionMetrics::record_press);
        }
        flow
    }

    /// Clears a pending press. The region only plays its release transition
    /// when the pointer is still over it.
    pub fn handle_released(&mut self, id: &str) -> EventFlow {
        let Some(position) = self.pressed.iter().position(|other| other == id) else {
            return EventFlow::Continue;
        };
        self.pressed.remove(position);
        if !self.hovered.contains(id) {
            return EventFlow::Continue;
        }
        let Some(index) = self.index_of(id) else {
            return EventFlow::Continue;
        };
        let flow = self.regions[index].release();
        self.record_metric(InteractionMetrics::record_release);
        flow
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tracked_len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn region(&self, id: &str) -> Option<&ManagedRegion> {
        self.index_of(id).map(|index| &self.regions[index])
    }

    pub fn regions(&self) -> impl Iterator<Item = &ManagedRegion> {
        self.regions.iter()
    }

    /// Regions under the pointer, highest z first.
    pub fn hover_order(&self) -> &[RegionId] {
        &self.hover_order
    }

    /// Regions holding hover membership, highest z first.
    pub fn hovered_in_order(&self) -> Vec<RegionId> {
        self.hover_order
            .iter()
            .filter(|id| self.hovered.contains(*id))
            .cloned()
            .collect()
    }

    pub fn is_hovered_at_all(&self, id: &str) -> bool {
        self.hovered_all.contains(id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }

    pub fn is_pressed(&self, id: &str) -> bool {
        self.pressed.iter().any(|other| other == id)
    }

    pub fn pressed(&self) -> &[RegionId] {
        &self.pressed
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Writes the current metrics snapshot to the logger, if both are enabled.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.log_target));
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn accepts_pointer(&self) -> bool {
        if self.ready && self.active {
            self.record_metric(InteractionMetrics::record_pointer_event);
            true
        } else {
            self.record_metric(InteractionMetrics::record_suppressed);
            false
        }
    }

    /// Adds newly contained regions to `hovered_all` and returns the ones
    /// the pointer left, already removed from it.
    fn update_hovered_all(&mut self, position: Point) -> Vec<RegionId> {
        let mut left = Vec::new();
        for region in &self.regions {
            let inside = region.contains(position);
            let known = self.hovered_all.contains(region.id());
            if inside && !known {
                self.hovered_all.insert(region.id().clone());
            } else if !inside && known {
                self.hovered_all.remove(region.id());
                left.push(region.id().clone());
            }
        }
        left
    }

    fn sorted_hovered_all(&self) -> Vec<RegionId> {
        let mut ordered: Vec<(i64, &RegionId)> = self
            .regions
            .iter()
            .filter(|region| self.hovered_all.contains(region.id()))
            .map(|region| (region.z(), region.id()))
            .collect();
        // Stable: equal z keeps tracked insertion order.
        ordered.sort_by(|a, b| b.0.cmp(&a.0));
        ordered.into_iter().map(|(_, id)| id.clone()).collect()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|region| region.id() == id)
    }

    fn record_metric(&self, record: impl FnOnce(&mut InteractionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn audit(&self, builder: AuditEventBuilder) {
        let event = builder.detail("tracked_total", json!(self.regions.len())).finish();
        self.config.audit.record(event);
    }
}

impl std::fmt::Debug for InteractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionEngine")
            .field("regions", &self.regions)
            .field("hover_order", &self.hover_order)
            .field("pressed", &self.pressed)
            .field("ready", &self.ready)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
