//! Where `print` and `println` send their text.
//!
//! - `Stdout`: the process's standard output (default).
//! - `Buffer`: an in-memory string, for tests and embedding.
//! - `Silent`: discards everything.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Output sink selected by enum dispatch.
pub enum PrintHandlerImpl {
    Stdout,
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandlerImpl {
    /// Write `text` as is.
    pub fn write(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout is not an evaluation failure.
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Buffer(buf) => buf.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Write `text` followed by a newline.
    pub fn write_line(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{text}");
            }
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(text);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Everything captured so far. Empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

/// Print handler shared between an interpreter and its owner.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}
