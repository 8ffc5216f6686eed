use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operating mode reported by a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MachineState {
    Run,
    Idle,
    Fault,
}

/// Wire names accepted for `machineState`, in display order
pub const VALID_STATES: [&str; 3] = ["RUN", "IDLE", "FAULT"];

impl MachineState {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RUN" => Some(Self::Run),
            "IDLE" => Some(Self::Idle),
            "FAULT" => Some(Self::Fault),
            _ => None,
        }
    }
}

/// One machine reading as held in the history buffer.
///
/// `timestamp` is whatever the sender supplied (ISO-8601 expected but never
/// parsed); `received_at` is stamped by the server at ingest time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub timestamp: String,
    pub machine_state: MachineState,
    pub temperature: f64,
    pub cycle_time_ms: f64,
    pub good_count: f64,
    pub reject_count: f64,
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_state_parse() {
        assert_eq!(MachineState::parse("RUN"), Some(MachineState::Run));
        assert_eq!(MachineState::parse("FAULT"), Some(MachineState::Fault));
        assert_eq!(MachineState::parse("PAUSED"), None);
        assert_eq!(MachineState::parse("run"), None);
    }

    #[test]
    fn test_sample_wire_form_is_camel_case() {
        let sample = TelemetrySample {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            machine_state: MachineState::Run,
            temperature: 65.2,
            cycle_time_ms: 2500.0,
            good_count: 10.0,
            reject_count: 1.0,
            received_at: Utc::now(),
        };

        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["machineState"], "RUN");
        assert_eq!(value["cycleTimeMs"], 2500.0);
        assert_eq!(value["goodCount"], 10.0);
        assert!(value["receivedAt"].is_string());
    }
}
