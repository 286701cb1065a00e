pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gold;
pub mod mode;
pub mod report;
pub mod store;

pub use config::{DiagnosticsConfig, GoldConfig};
pub use diagnostics::{
    TelemetryGuard, init_stderr_tracing, init_test_tracing, init_tracing_with_config,
    init_tracing_with_options,
};
pub use error::{GoldError, Result};
pub use gold::{ErrorHandler, Gold, Outcome};
pub use mode::{UPDATE_ENV, UpdateMode};
pub use report::{Mismatch, PanicReporter, RecordingReporter, Reporter};
pub use store::{DEFAULT_DIR, ReferenceStore};
