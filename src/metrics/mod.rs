use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by the interaction engine.
#[derive(Debug, Default, Clone)]
pub struct InteractionMetrics {
    pointer_events: u64,
    suppressed_events: u64,
    hover_enters: u64,
    hover_exits: u64,
    presses: u64,
    releases: u64,
    regions_tracked: u64,
    regions_untracked: u64,
}

impl InteractionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pointer_event(&mut self) {
        self.pointer_events = self.pointer_events.saturating_add(1);
    }

    /// Pointer event dropped because the engine was not ready or inactive.
    pub fn record_suppressed(&mut self) {
        self.suppressed_events = self.suppressed_events.saturating_add(1);
    }

    pub fn record_hover_enter(&mut self) {
        self.hover_enters = self.hover_enters.saturating_add(1);
    }

    pub fn record_hover_exit(&mut self) {
        self.hover_exits = self.hover_exits.saturating_add(1);
    }

    pub fn record_press(&mut self) {
        self.presses = self.presses.saturating_add(1);
    }

    pub fn record_release(&mut self) {
        self.releases = self.releases.saturating_add(1);
    }

    pub fn record_tracked(&mut self, count: usize) {
        self.regions_tracked = self.regions_tracked.saturating_add(count as u64);
    }

    pub fn record_untracked(&mut self, count: usize) {
        self.regions_untracked = self.regions_untracked.saturating_add(count as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            pointer_events: self.pointer_events,
            suppressed_events: self.suppressed_events,
            hover_enters: self.hover_enters,
            hover_exits: self.hover_exits,
            presses: self.presses,
            releases: self.releases,
            regions_tracked: self.regions_tracked,
            regions_untracked: self.regions_untracked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricSnapshot {
    pub pointer_events: u64,
    pub suppressed_events: u64,
    pub hover_enters: u64,
    pub hover_exits: u64,
    pub presses: u64,
    pub releases: u64,
    pub regions_tracked: u64,
    pub regions_untracked: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "interaction_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("pointer_events".to_string(), json!(self.pointer_events));
        map.insert("suppressed_events".to_string(), json!(self.suppressed_events));
        map.insert("hover_enters".to_string(), json!(self.hover_enters));
        map.insert("hover_exits".to_string(), json!(self.hover_exits));
        map.insert("presses".to_string(), json!(self.presses));
        map.insert("releases".to_string(), json!(self.releases));
        map.insert("regions_tracked".to_string(), json!(self.regions_tracked));
        map.insert("regions_untracked".to_string(), json!(self.regions_untracked));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = InteractionMetrics::new();
        metrics.record_pointer_event();
        metrics.record_pointer_event();
        metrics.record_suppressed();
        metrics.record_press();
        metrics.record_tracked(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.pointer_events, 2);
        assert_eq!(snap.suppressed_events, 1);
        assert_eq!(snap.presses, 1);
        assert_eq!(snap.regions_tracked, 3);
        assert_eq!(snap.releases, 0);
    }

    #[test]
    fn snapshot_log_event_carries_fields() {
        let mut metrics = InteractionMetrics::new();
        metrics.record_hover_enter();
        let event = metrics.snapshot().to_log_event("tiles::metrics");
        assert_eq!(event.target, "tiles::metrics");
        assert_eq!(event.field("hover_enters"), Some(&json!(1)));
    }
}
