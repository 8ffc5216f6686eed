//! Synthetic telemetry generator.
//!
//! Drives a small RUN/IDLE/FAULT state machine and POSTs one reading per tick
//! to a running telemon server. Speaks only the wire protocol, so it builds
//! its own payload the way any external machine controller would.

use std::env;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
struct SimConfig {
    server_url: String,
    interval_ms: u64,
}

impl SimConfig {
    fn from_env() -> Self {
        Self {
            server_url: env::var("TELEMON_SIM_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            interval_ms: env::var("TELEMON_SIM_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MachineState {
    Run,
    Idle,
    Fault,
}

impl MachineState {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::Idle => "IDLE",
            Self::Fault => "FAULT",
        }
    }
}

/// One reading on the wire, shaped like POST /telemetry expects
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    timestamp: String,
    machine_state: &'static str,
    temperature: f64,
    cycle_time_ms: f64,
    good_count: u64,
    reject_count: u64,
}

/// Simulated machine.
///
/// RUN → FAULT when the randomized countdown (30–50 ticks) runs out;
/// FAULT → IDLE once a 5–15 s deadline set on fault entry passes;
/// IDLE → RUN with probability 0.3 per tick.
struct Machine {
    state: MachineState,
    temperature: f64,
    cycle_time_ms: f64,
    good_count: u64,
    reject_count: u64,
    fault_countdown: u32,
    fault_clears_at: Option<Instant>,
}

impl Machine {
    fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            state: MachineState::Run,
            temperature: 65.0,
            cycle_time_ms: 2500.0,
            good_count: 0,
            reject_count: 0,
            fault_countdown: rng.random_range(30..=50),
            fault_clears_at: None,
        }
    }

    fn tick<R: Rng>(&mut self, rng: &mut R, now: Instant) -> Reading {
        match self.state {
            MachineState::Run => {
                self.temperature = 65.0 + rng.random::<f64>() * 10.0 - 5.0;
                self.cycle_time_ms = 2500.0 + rng.random::<f64>() * 500.0 - 250.0;

                // 70% of ticks produce a part, 95% of parts are good
                if rng.random::<f64>() > 0.3 {
                    if rng.random::<f64>() > 0.05 {
                        self.good_count += 1;
                    } else {
                        self.reject_count += 1;
                    }
                }

                self.fault_countdown = self.fault_countdown.saturating_sub(1);
                if self.fault_countdown == 0 {
                    self.state = MachineState::Fault;
                    self.fault_clears_at =
                        Some(now + Duration::from_secs_f64(5.0 + rng.random::<f64>() * 10.0));
                    warn!("⚠ FAULT condition triggered");
                }
            }
            MachineState::Idle => {
                self.temperature = (self.temperature - 0.5).max(20.0);
                self.cycle_time_ms = 0.0;

                if rng.random_bool(0.3) {
                    self.state = MachineState::Run;
                    info!("✓ Machine resumed from IDLE");
                }
            }
            MachineState::Fault => {
                if self.fault_clears_at.is_some_and(|deadline| now >= deadline) {
                    self.state = MachineState::Idle;
                    self.fault_clears_at = None;
                    self.fault_countdown = rng.random_range(30..=50);
                    info!("⚙ Machine entering IDLE after FAULT");
                } else {
                    self.temperature = 80.0 + rng.random::<f64>() * 15.0;
                }
                self.cycle_time_ms = 0.0;
            }
        }

        Reading {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            machine_state: self.state.as_str(),
            temperature: (self.temperature * 10.0).round() / 10.0,
            cycle_time_ms: self.cycle_time_ms.round(),
            good_count: self.good_count,
            reject_count: self.reject_count,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = SimConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting telemetry simulator");
    info!("  → Target: {}/telemetry every {}ms", config.server_url, config.interval_ms);

    let client = reqwest::Client::new();

    // Refuse to start against a dead server
    match client.get(format!("{}/health", config.server_url)).send().await {
        Ok(resp) if resp.status().is_success() => info!("✓ Server is available"),
        Ok(resp) => {
            error!("Server returned unexpected status: {}", resp.status());
            std::process::exit(1);
        }
        Err(e) => {
            error!("Cannot connect to server at {}: {}", config.server_url, e);
            std::process::exit(1);
        }
    }

    let mut machine = Machine::new(&mut rand::rng());
    let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
    let endpoint = format!("{}/telemetry", config.server_url);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(
                    "Simulator stopped. Final counts - good: {}, reject: {}",
                    machine.good_count, machine.reject_count
                );
                break;
            }
            _ = ticker.tick() => {
                let reading = machine.tick(&mut rand::rng(), Instant::now());

                match client.post(&endpoint).json(&reading).send().await {
                    Ok(resp) if resp.status() == reqwest::StatusCode::CREATED => {
                        info!(
                            "{:<5} | temp {:>5.1}°C | cycle {:>4.0}ms | good {} | reject {}",
                            reading.machine_state,
                            reading.temperature,
                            reading.cycle_time_ms,
                            reading.good_count,
                            reading.reject_count
                        );
                    }
                    Ok(resp) => warn!("Server responded with status {}", resp.status()),
                    // Transient by contract: log and try again next tick
                    Err(e) => warn!("Failed to send telemetry: {}", e),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_runs_until_countdown_then_faults() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let now = Instant::now();
        assert!((30..=50).contains(&machine.fault_countdown));

        let mut ticks_to_fault = 0;
        for n in 1..=50 {
            machine.tick(&mut rng, now);
            if machine.state == MachineState::Fault {
                ticks_to_fault = n;
                break;
            }
        }

        assert!((30..=50).contains(&ticks_to_fault));
        // Deadline not reached while the clock stands still
        machine.tick(&mut rng, now);
        assert_eq!(machine.state, MachineState::Fault);
    }

    #[test]
    fn test_fault_clears_to_idle_after_deadline() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let start = Instant::now();

        while machine.state != MachineState::Fault {
            machine.tick(&mut rng, start);
        }

        // Max fault duration is 15s; 20s later the machine must have moved on
        let reading = machine.tick(&mut rng, start + Duration::from_secs(20));
        assert_eq!(machine.state, MachineState::Idle);
        assert_eq!(reading.machine_state, "IDLE");
        assert!((30..=50).contains(&machine.fault_countdown));
    }

    #[test]
    fn test_cycle_time_is_zero_outside_run() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let now = Instant::now();

        while machine.state != MachineState::Fault {
            machine.tick(&mut rng, now);
        }

        // Settled fault tick (clock frozen, deadline not reached)
        let reading = machine.tick(&mut rng, now);
        assert_eq!(reading.machine_state, "FAULT");
        assert_eq!(reading.cycle_time_ms, 0.0);

        // Idle tick after the fault deadline passes
        let reading = machine.tick(&mut rng, now + Duration::from_secs(20));
        assert_eq!(reading.machine_state, "IDLE");
        assert_eq!(reading.cycle_time_ms, 0.0);
    }

    #[test]
    fn test_temperature_tracks_state() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let now = Instant::now();

        // Readings synthesized while running stay in the 60–70 band
        loop {
            let reading = machine.tick(&mut rng, now);
            if machine.state != MachineState::Run {
                break;
            }
            assert!((60.0..=70.0).contains(&reading.temperature));
        }

        // Settled fault readings spike into the 80–95 band
        let reading = machine.tick(&mut rng, now);
        assert_eq!(reading.machine_state, "FAULT");
        assert!((80.0..=95.0).contains(&reading.temperature));
    }

    #[test]
    fn test_counters_are_cumulative() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let mut now = Instant::now();
        let (mut last_good, mut last_reject) = (0, 0);

        for _ in 0..200 {
            now += Duration::from_secs(1);
            let reading = machine.tick(&mut rng, now);
            assert!(reading.good_count >= last_good);
            assert!(reading.reject_count >= last_reject);
            last_good = reading.good_count;
            last_reject = reading.reject_count;
        }

        assert!(last_good > 0);
    }

    #[test]
    fn test_reading_serializes_with_wire_names() {
        let mut rng = rng();
        let mut machine = Machine::new(&mut rng);
        let reading = machine.tick(&mut rng, Instant::now());

        let value = serde_json::to_value(&reading).unwrap();
        for field in [
            "timestamp",
            "machineState",
            "temperature",
            "cycleTimeMs",
            "goodCount",
            "rejectCount",
        ] {
            assert!(value.get(field).is_some(), "missing {}", field);
        }
    }
}
