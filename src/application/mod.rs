pub mod telemetry;

pub use telemetry::{
    HistoryWindow, SamplePayload, TelemetryService, DEFAULT_HISTORY_LIMIT, REQUIRED_FIELDS,
};
