//! Operator-facing progress lines for per-source results.
//!
//! Fetch tasks run concurrently and all report here, so the writer sits
//! behind a mutex and every line is written and flushed while holding it.
//! This is the only state the tasks share.

use crate::error::FetchError;
use crate::utils::{MAX_REASON_CHARS, truncate_chars};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{info, warn};

/// Cloneable handle to a serialized diagnostic stream.
#[derive(Clone)]
pub struct Diagnostics {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

impl Diagnostics {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Discards everything; used when console output is suppressed.
    pub fn sink() -> Self {
        Self::with_writer(io::sink())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Write one whole line.
    pub fn line(&self, text: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    pub fn source_found(&self, source: &str, count: usize) {
        info!(source, count, "Source yielded records");
        self.line(&format!("    [+] {source}: found {count}"));
    }

    /// Report a failed source. The error label is printed in full; only the
    /// underlying detail is cut to [`MAX_REASON_CHARS`].
    pub fn source_failed(&self, source: &str, error: &FetchError) {
        warn!(source, error = %error, "Source failed");
        match error.label_and_detail() {
            (label, Some(detail)) => {
                let detail = truncate_chars(detail, MAX_REASON_CHARS);
                self.line(&format!("    [-] {source}: {label}: {detail}"));
            }
            (label, None) => self.line(&format!("    [-] {source}: {label}")),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A `Write` target tests can read back after the run.
    #[derive(Clone, Default)]
    pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn captured() -> (Diagnostics, SharedBuf) {
        let buf = SharedBuf::default();
        (Diagnostics::with_writer(buf.clone()), buf)
    }
}
