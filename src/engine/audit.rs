//! Lifecycle audit hooks for [`InteractionEngine`](super::InteractionEngine).
//!
//! Records capture a stage plus structured details so hosts can buffer or
//! display how the tracked set evolves without instrumenting the engine.

use std::cell::RefCell;
use std::time::SystemTime;

use serde_json::Value;

/// Lifecycle checkpoints emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStage {
    /// A new engine instance was constructed.
    EngineConstructed,
    /// The host signalled readiness; pointer handling is armed.
    Ready,
    /// Tracked and interaction sets were rebuilt for a new scene.
    SceneRescanned,
    /// A configured tile became a managed region.
    RegionTracked,
    /// A managed region was dropped from the tracked set.
    RegionUntracked,
    /// The active-layer gate flipped.
    ActivationChanged,
}

#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub timestamp: SystemTime,
    pub stage: AuditStage,
    pub details: Vec<(String, Value)>,
}

impl AuditEvent {
    fn new(stage: AuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(stage: AuditStage) -> Self {
        Self {
            event: AuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> AuditEvent {
        self.event
    }
}

pub trait EngineAudit {
    fn record(&self, event: AuditEvent);
}

/// Default sink used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullEngineAudit;

impl EngineAudit for NullEngineAudit {
    fn record(&self, _event: AuditEvent) {}
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct BufferedEngineAudit {
    events: RefCell<Vec<AuditEvent>>,
}

impl BufferedEngineAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<AuditStage> {
        self.events.borrow().iter().map(|e| e.stage).collect()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }
}

impl EngineAudit for BufferedEngineAudit {
    fn record(&self, event: AuditEvent) {
        self.events.borrow_mut().push(event);
    }
}
