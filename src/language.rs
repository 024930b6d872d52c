// WHY: the language-ID collaborator reuses internal scratch state across calls and
// is not safe to share without exclusion; the resolver owns that locking discipline

use anyhow::Result;
use std::sync::Mutex;
use tracing::{debug, warn};

/// External language-identification collaborator.
///
/// Implementations take a text sample and return a best-guess language code,
/// or `None` when no confident guess exists. `&mut self` reflects the scratch
/// state such detectors keep between calls.
pub trait LanguageDetect: Send {
    fn detect(&mut self, sample: &str) -> Result<Option<String>>;
}

impl<F> LanguageDetect for F
where
    F: FnMut(&str) -> Result<Option<String>> + Send,
{
    fn detect(&mut self, sample: &str) -> Result<Option<String>> {
        self(sample)
    }
}

/// Wraps a detector behind a mutex so concurrent document pipelines can share
/// one instance. Detection failures are never fatal: any error is logged and
/// treated as "unknown", which makes downstream model lookup fall back to the
/// registry's default language.
pub struct LanguageResolver {
    detector: Mutex<Box<dyn LanguageDetect>>,
}

impl LanguageResolver {
    pub fn new(detector: Box<dyn LanguageDetect>) -> Self {
        Self {
            detector: Mutex::new(detector),
        }
    }

    /// Resolver that never identifies anything; every document uses the
    /// registry's default language.
    pub fn unknown() -> Self {
        Self::new(Box::new(|_: &str| Ok(None)))
    }

    /// Detect the language of `sample`, swallowing detector errors.
    pub fn resolve(&self, sample: &str) -> Option<String> {
        let mut detector = match self.detector.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A panic inside a previous detect call must not disable
                // language resolution for the rest of the process.
                warn!("language detector mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        match detector.detect(sample) {
            Ok(Some(code)) if !code.is_empty() => {
                debug!(language = %code, "language resolved");
                Some(code)
            }
            Ok(_) => {
                debug!("language detector returned no guess");
                None
            }
            Err(e) => {
                warn!("language detection failed, treating as unknown: {e}");
                None
            }
        }
    }
}
