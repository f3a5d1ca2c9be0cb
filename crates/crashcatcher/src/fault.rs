//! The value handed to fault hooks.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::PanicHookInfo;
use std::thread::{self, ThreadId};

/// An unhandled fault on some thread.
///
/// Built from a panic by the hook bridge, or directly by a host that wants
/// to report a fatal error through the same path without panicking.
#[derive(Debug, Clone)]
pub struct Fault {
    thread_name: String,
    thread_id: ThreadId,
    message: String,
    location: Option<String>,
    backtrace: String,
}

impl Fault {
    /// A fault raised on the calling thread, with a freshly captured backtrace.
    pub fn new(message: impl Into<String>) -> Self {
        let current = thread::current();
        Self {
            thread_name: current.name().unwrap_or("<unnamed>").to_string(),
            thread_id: current.id(),
            message: message.into(),
            location: None,
            backtrace: Backtrace::force_capture().to_string(),
        }
    }

    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        let mut fault = Self::new(message);
        fault.location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        fault
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn backtrace(&self) -> &str {
        &self.backtrace
    }

    /// Full diagnostic text: header line, message, then the backtrace.
    pub fn stack_trace(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread '{}' panicked", self.thread_name)?;
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        writeln!(f, ":")?;
        writeln!(f, "{}", self.message)?;
        writeln!(f, "stack backtrace:")?;
        write!(f, "{}", self.backtrace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_captures_current_thread() {
        let fault = std::thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(|| Fault::new("boom"))
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(fault.thread_name(), "worker-7");
        assert_eq!(fault.message(), "boom");
        assert_ne!(fault.thread_id(), std::thread::current().id());
    }

    #[test]
    fn test_stack_trace_layout() {
        let fault = Fault::new("index out of bounds").with_location("src/main.rs:3:5");
        let trace = fault.stack_trace();

        let mut lines = trace.lines();
        assert!(lines.next().unwrap().ends_with("panicked at src/main.rs:3:5:"));
        assert_eq!(lines.next(), Some("index out of bounds"));
        assert_eq!(lines.next(), Some("stack backtrace:"));
    }
}
