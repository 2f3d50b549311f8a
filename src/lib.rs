//! Pointer interaction engine for rectangular canvas tiles.
//!
//! Tiles with an attached behaviour record become managed regions. Pointer
//! movement is hit-tested against every region, regions under the pointer are
//! ranked by draw order, and hover / press / release transitions are
//! dispatched top-down until a region consumes the event. Each transition
//! may swap the image its tile displays.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod region;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{
    ConfigSource, JsonConfigSource, MapConfigSource, RegionConfig, StateDefinition, StateName,
    StateSlot,
};
pub use engine::audit::{
    AuditEvent, AuditEventBuilder, AuditStage, BufferedEngineAudit, EngineAudit, NullEngineAudit,
};
pub use engine::{EngineConfig, InteractionEngine};
pub use error::{Result, TileError};
pub use geometry::{Point, Rect};
pub use host::terminal::{CellScale, PointerAction, TerminalPointer, route_mouse_event};
pub use host::{
    AlwaysActive, DisplaySurface, HostHook, HostServices, ImageLoader, LayerProbe, NoPreload,
    PointerSource, RegionId, Tile, TileImageSurface, TileRef,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{InteractionMetrics, MetricSnapshot};
pub use region::{EventFlow, InteractionState, ManagedRegion, RegionStates};
