use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{MachineState, TelemetryError, TelemetryResult, TelemetrySample};
use crate::ports::SampleStore;

/// Window size used when a history query carries no limit
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Field names a sample must carry, in error-report order
pub const REQUIRED_FIELDS: [&str; 6] = [
    "timestamp",
    "machineState",
    "temperature",
    "cycleTimeMs",
    "goodCount",
    "rejectCount",
];

/// Raw ingest body. Every field is optional at the serde layer so validation
/// can report exactly which ones are absent or mistyped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePayload {
    pub timestamp: Option<Value>,
    pub machine_state: Option<Value>,
    pub temperature: Option<Value>,
    pub cycle_time_ms: Option<Value>,
    pub good_count: Option<Value>,
    pub reject_count: Option<Value>,
}

/// A windowed history read: the snapshot plus the buffer length it came from.
#[derive(Debug)]
pub struct HistoryWindow {
    pub total: usize,
    pub data: Vec<TelemetrySample>,
}

/// Main application service: validates incoming readings, stamps them, and
/// answers latest/windowed queries against the injected store.
pub struct TelemetryService {
    store: Arc<dyn SampleStore>,
    started_at: Instant,
}

impl TelemetryService {
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }

    /// Validate a raw payload, stamp `receivedAt`, and append.
    /// Returns the number of samples stored afterwards.
    pub fn ingest(&self, payload: SamplePayload) -> TelemetryResult<usize> {
        let missing: Vec<&'static str> = [
            ("timestamp", payload.timestamp.is_none()),
            ("machineState", payload.machine_state.is_none()),
            ("temperature", payload.temperature.is_none()),
            ("cycleTimeMs", payload.cycle_time_ms.is_none()),
            ("goodCount", payload.good_count.is_none()),
            ("rejectCount", payload.reject_count.is_none()),
        ]
        .iter()
        .filter_map(|(name, absent)| absent.then_some(*name))
        .collect();

        if !missing.is_empty() {
            return Err(TelemetryError::MissingFields(missing));
        }

        let state_value = payload.machine_state.unwrap();
        let machine_state = state_value
            .as_str()
            .and_then(MachineState::parse)
            .ok_or_else(|| TelemetryError::InvalidState(state_value.to_string()))?;

        let sample = TelemetrySample {
            timestamp: text(payload.timestamp.unwrap()),
            machine_state,
            temperature: numeric(&payload.temperature, "temperature")?,
            cycle_time_ms: numeric(&payload.cycle_time_ms, "cycleTimeMs")?,
            good_count: numeric(&payload.good_count, "goodCount")?,
            reject_count: numeric(&payload.reject_count, "rejectCount")?,
            received_at: Utc::now(),
        };

        Ok(self.store.append(sample))
    }

    /// Most recent sample; `Empty` until the first ingest.
    pub fn latest(&self) -> TelemetryResult<TelemetrySample> {
        self.store.latest().ok_or(TelemetryError::Empty)
    }

    /// Last `limit` samples, oldest first. `limit` has already been checked
    /// positive by the caller; values above capacity clamp to capacity.
    pub fn history(&self, limit: usize) -> HistoryWindow {
        let limit = limit.min(self.store.capacity());

        HistoryWindow {
            total: self.store.len(),
            data: self.store.window(limit),
        }
    }

    pub fn data_points(&self) -> usize {
        self.store.len()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Timestamps are stored as sent: strings verbatim, anything else as its JSON
/// text (presence is the only requirement).
fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn numeric(value: &Option<Value>, field: &'static str) -> TelemetryResult<f64> {
    value
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or(TelemetryError::InvalidType(field))
}
