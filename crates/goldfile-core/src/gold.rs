use std::{fmt, io::Read, path::Path, sync::Arc};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{GoldError, Result},
    mode::UpdateMode,
    report::{Mismatch, PanicReporter, Reporter},
    store::ReferenceStore,
};

/// Result of comparing actual output with a gold file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(Mismatch),
}

impl Outcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Decides what happens when a gold file cannot be read or written.
#[derive(Clone, Default)]
pub enum ErrorHandler {
    /// Panic with the raw error.
    #[default]
    Fatal,
    Custom(Arc<dyn Fn(&GoldError) + Send + Sync>),
}

impl ErrorHandler {
    pub fn custom(handler: impl Fn(&GoldError) + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(handler))
    }

    #[track_caller]
    pub fn handle(&self, error: &GoldError) {
        match self {
            Self::Fatal => panic!("{error}"),
            Self::Custom(handler) => handler(error),
        }
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal => f.write_str("ErrorHandler::Fatal"),
            Self::Custom(_) => f.write_str("ErrorHandler::Custom(..)"),
        }
    }
}

/// Compares output against gold files and, in update mode, rewrites them first.
///
/// The `try_*` methods hand back typed results. The remaining methods assert:
/// mismatches go to the [`Reporter`] and I/O failures to the [`ErrorHandler`].
#[derive(Debug, Clone)]
pub struct Gold<R = PanicReporter> {
    store: ReferenceStore,
    mode: UpdateMode,
    reporter: R,
    on_error: ErrorHandler,
}

impl Default for Gold {
    fn default() -> Self {
        Self::new(ReferenceStore::default(), UpdateMode::Verify)
    }
}

impl Gold {
    #[must_use]
    pub fn new(store: ReferenceStore, mode: UpdateMode) -> Self {
        Self {
            store,
            mode,
            reporter: PanicReporter,
            on_error: ErrorHandler::Fatal,
        }
    }
}

impl<R: Reporter> Gold<R> {
    #[must_use]
    pub fn with_reporter<T: Reporter>(self, reporter: T) -> Gold<T> {
        Gold {
            store: self.store,
            mode: self.mode,
            reporter,
            on_error: self.on_error,
        }
    }

    #[must_use]
    pub fn with_error_handler(mut self, on_error: ErrorHandler) -> Self {
        self.on_error = on_error;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    #[must_use]
    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn try_check(&self, actual: &str, name: impl AsRef<Path>) -> Result<Outcome> {
        self.try_check_bytes(actual.as_bytes(), name)
    }

    /// Writes `actual` when in update mode, then compares it with the stored file.
    ///
    /// The comparison always runs, so a freshly written file is read back and
    /// verified.
    #[instrument(skip_all, fields(name = %name.as_ref().display(), mode = ?self.mode))]
    pub fn try_check_bytes(&self, actual: &[u8], name: impl AsRef<Path>) -> Result<Outcome> {
        let name = name.as_ref();
        if self.mode.is_update() {
            self.try_force_update_bytes(actual, name)?;
        }
        self.try_compare_bytes(actual, name)
    }

    pub fn try_compare(&self, actual: &str, name: impl AsRef<Path>) -> Result<Outcome> {
        self.try_compare_bytes(actual.as_bytes(), name)
    }

    /// Compares without updating, whatever the mode.
    pub fn try_compare_bytes(&self, actual: &[u8], name: impl AsRef<Path>) -> Result<Outcome> {
        let name = name.as_ref();
        let expected = self.store.read_bytes(name)?;
        if expected == actual {
            debug!(name = %name.display(), "gold file matches");
            return Ok(Outcome::Pass);
        }

        let path = self.store.resolve_path(name);
        warn!(
            path = %path.display(),
            expected_bytes = expected.len(),
            actual_bytes = actual.len(),
            "gold file mismatch"
        );
        Ok(Outcome::Fail(Mismatch {
            path,
            expected,
            actual: actual.to_vec(),
        }))
    }

    /// Overwrites the gold file regardless of the mode.
    pub fn try_force_update_bytes(&self, actual: &[u8], name: impl AsRef<Path>) -> Result<()> {
        let name = name.as_ref();
        self.store.write_bytes(name, actual)?;
        info!(path = %self.store.resolve_path(name).display(), "gold file updated");
        Ok(())
    }

    pub fn try_force_update(&self, actual: &str, name: impl AsRef<Path>) -> Result<()> {
        self.try_force_update_bytes(actual.as_bytes(), name)
    }

    pub fn try_force_update_reader(
        &self,
        mut actual: impl Read,
        name: impl AsRef<Path>,
    ) -> Result<()> {
        let mut buffer = Vec::new();
        actual
            .read_to_end(&mut buffer)
            .map_err(|source| GoldError::ReadInput { source })?;
        self.try_force_update_bytes(&buffer, name)
    }

    /// Pretty-prints `value` as JSON with a trailing newline and checks it.
    pub fn try_check_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
        name: impl AsRef<Path>,
    ) -> Result<Outcome> {
        let mut json = serde_json::to_vec_pretty(value)?;
        json.push(b'\n');
        self.try_check_bytes(&json, name)
    }

    /// Asserting form of [`Gold::try_check`].
    ///
    /// A failed update write goes to the error handler; if the handler
    /// returns, the comparison still runs against whatever is on disk.
    #[track_caller]
    pub fn check(&self, actual: &str, name: impl AsRef<Path>) {
        self.check_bytes(actual.as_bytes(), name);
    }

    #[track_caller]
    pub fn check_bytes(&self, actual: &[u8], name: impl AsRef<Path>) {
        let name = name.as_ref();
        if self.mode.is_update() {
            self.force_update_bytes(actual, name);
        }
        self.settle(self.try_compare_bytes(actual, name));
    }

    #[track_caller]
    pub fn check_json<T: Serialize + ?Sized>(&self, value: &T, name: impl AsRef<Path>) {
        match serde_json::to_vec_pretty(value) {
            Ok(mut json) => {
                json.push(b'\n');
                self.check_bytes(&json, name);
            }
            Err(error) => self.on_error.handle(&GoldError::from(error)),
        }
    }

    #[track_caller]
    pub fn compare(&self, actual: &str, name: impl AsRef<Path>) {
        self.settle(self.try_compare(actual, name));
    }

    #[track_caller]
    pub fn compare_bytes(&self, actual: &[u8], name: impl AsRef<Path>) {
        self.settle(self.try_compare_bytes(actual, name));
    }

    #[track_caller]
    pub fn force_update(&self, actual: &str, name: impl AsRef<Path>) {
        if let Err(error) = self.try_force_update(actual, name) {
            self.on_error.handle(&error);
        }
    }

    #[track_caller]
    pub fn force_update_bytes(&self, actual: &[u8], name: impl AsRef<Path>) {
        if let Err(error) = self.try_force_update_bytes(actual, name) {
            self.on_error.handle(&error);
        }
    }

    #[track_caller]
    pub fn force_update_reader(&self, actual: impl Read, name: impl AsRef<Path>) {
        if let Err(error) = self.try_force_update_reader(actual, name) {
            self.on_error.handle(&error);
        }
    }

    #[track_caller]
    fn settle(&self, result: Result<Outcome>) {
        match result {
            Ok(Outcome::Pass) => {}
            Ok(Outcome::Fail(mismatch)) => self.reporter.fail(&mismatch),
            Err(error) => self.on_error.handle(&error),
        }
    }
}
