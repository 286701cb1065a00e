use std::{
    fmt,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

/// A gold file whose stored content differs from the actual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub expected: Vec<u8>,
    pub actual: Vec<u8>,
}

impl Mismatch {
    #[must_use]
    pub fn expected_text(&self) -> String {
        String::from_utf8_lossy(&self.expected).into_owned()
    }

    #[must_use]
    pub fn actual_text(&self) -> String {
        String::from_utf8_lossy(&self.actual).into_owned()
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gold file: {:?}\nexpected:\n{}\ngot:\n{}\n",
            self.path.display().to_string(),
            quoted(&self.expected),
            quoted(&self.actual)
        )
    }
}

/// Debug-quotes text; bytes that are not UTF-8 are quoted with `\xNN` escapes instead.
fn quoted(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => format!("{text:?}"),
        Err(_) => format!("\"{}\"", bytes.escape_ascii()),
    }
}

/// Receives mismatches from [`Gold`](crate::gold::Gold).
///
/// What a failure does to the running test (abort, mark and continue,
/// collect) is up to the implementation.
pub trait Reporter {
    fn fail(&self, mismatch: &Mismatch);
}

/// Fails the current test by panicking with the rendered mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    #[track_caller]
    fn fail(&self, mismatch: &Mismatch) {
        panic!("{mismatch}");
    }
}

/// Collects rendered mismatches instead of failing.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<String>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Reporter for RecordingReporter {
    fn fail(&self, mismatch: &Mismatch) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(mismatch.to_string());
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    #[track_caller]
    fn fail(&self, mismatch: &Mismatch) {
        (**self).fail(mismatch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mismatch {
        Mismatch {
            path: PathBuf::from("testdata/greeting.txt"),
            expected: b"hello\n".to_vec(),
            actual: b"HELLO\t".to_vec(),
        }
    }

    #[test]
    fn rendering_quotes_and_escapes_both_sides() {
        assert_eq!(
            sample().to_string(),
            "gold file: \"testdata/greeting.txt\"\nexpected:\n\"hello\\n\"\ngot:\n\"HELLO\\t\"\n"
        );
    }

    #[test]
    fn invalid_utf8_differences_stay_visible() {
        let mismatch = Mismatch {
            path: PathBuf::from("testdata/raw.bin"),
            expected: b"a\xffb".to_vec(),
            actual: b"a\xfeb".to_vec(),
        };
        let rendered = mismatch.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[2], r#""a\xffb""#);
        assert_eq!(lines[4], r#""a\xfeb""#);
        assert_ne!(lines[2], lines[4]);
    }

    #[test]
    fn recording_reporter_keeps_rendered_messages() {
        let reporter = RecordingReporter::new();
        assert!(reporter.is_clean());
        reporter.fail(&sample());
        assert_eq!(reporter.failures(), vec![sample().to_string()]);
    }

    #[test]
    #[should_panic(expected = "gold file: \"testdata/greeting.txt\"")]
    fn panic_reporter_panics_with_message() {
        PanicReporter.fail(&sample());
    }
}
