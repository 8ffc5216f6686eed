pub mod error;
pub mod sample;

pub use error::{TelemetryError, TelemetryResult};
pub use sample::{MachineState, TelemetrySample};
