use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct NavMetrics {
    keys: u64,
    moves: u64,
    swallowed: u64,
    actions: u64,
    registrations: u64,
    unregistrations: u64,
    scope_switches: u64,
}

impl NavMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_key(&mut self) {
        self.keys = self.keys.saturating_add(1);
    }

    pub fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub fn record_swallowed(&mut self) {
        self.swallowed = self.swallowed.saturating_add(1);
    }

    pub fn record_action(&mut self) {
        self.actions = self.actions.saturating_add(1);
    }

    pub fn record_registration(&mut self) {
        self.registrations = self.registrations.saturating_add(1);
    }

    pub fn record_unregistration(&mut self) {
        self.unregistrations = self.unregistrations.saturating_add(1);
    }

    pub fn record_scope_switch(&mut self) {
        self.scope_switches = self.scope_switches.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            keys: self.keys,
            moves: self.moves,
            swallowed: self.swallowed,
            actions: self.actions,
            registrations: self.registrations,
            unregistrations: self.unregistrations,
            scope_switches: self.scope_switches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub keys: u64,
    pub moves: u64,
    pub swallowed: u64,
    pub actions: u64,
    pub registrations: u64,
    pub unregistrations: u64,
    pub scope_switches: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "nav_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("keys".to_string(), json!(self.keys));
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("swallowed".to_string(), json!(self.swallowed));
        map.insert("actions".to_string(), json!(self.actions));
        map.insert("registrations".to_string(), json!(self.registrations));
        map.insert("unregistrations".to_string(), json!(self.unregistrations));
        map.insert("scope_switches".to_string(), json!(self.scope_switches));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_counters() {
        let mut metrics = NavMetrics::new();
        metrics.record_key();
        metrics.record_key();
        metrics.record_move();
        metrics.record_swallowed();
        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.keys, 2);
        assert_eq!(snapshot.moves, 1);
        assert_eq!(snapshot.swallowed, 1);
        assert_eq!(snapshot.uptime_ms, 1500);

        let event = snapshot.to_log_event("couch_nav::metrics");
        assert_eq!(event.message, "nav_metrics");
        assert_eq!(event.field("keys"), Some(&json!(2)));
    }
}
