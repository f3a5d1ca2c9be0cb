//! The last-chance fault handler.

use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config::{config, Config};
use crate::context::AppContext;
use crate::error::CrashError;
use crate::fault::Fault;
use crate::hook::{FaultHook, HookRegistry};
use crate::report::ReportWriter;
use crate::{log_crash_debug, log_crash_error, log_crash_info, log_crash_warn};

/// Process-wide handler, created on first access.
static INSTANCE: Lazy<Arc<CrashHandler>> = Lazy::new(|| Arc::new(CrashHandler::new()));

/// Ends the process when no other handler is left to take the fault.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Exits the whole process with the given status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, code: i32) {
        log_crash_debug!(
            "Terminating process",
            pid = std::process::id(),
            exit_code = code,
        );
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(code);
    }
}

pub struct CrashHandler {
    /// Default handler found in the registry at `init` time
    previous: RwLock<Option<FaultHook>>,
    /// Hook this handler registered, to avoid capturing itself on re-init
    installed: RwLock<Option<FaultHook>>,
    context: RwLock<Option<Arc<dyn AppContext>>>,
    writer: ReportWriter,
    exit_code: i32,
    chain_panic_hook: bool,
    terminator: Box<dyn Terminator>,
}

impl CrashHandler {
    /// The shared handler. Every caller, on every thread, gets the same one.
    pub fn instance() -> Arc<CrashHandler> {
        Arc::clone(&INSTANCE)
    }

    /// A standalone handler built from the global config.
    pub fn new() -> Self {
        Self::from_config(&config())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            previous: RwLock::new(None),
            installed: RwLock::new(None),
            context: RwLock::new(None),
            writer: ReportWriter::new(config.report.clone()),
            exit_code: config.termination.exit_code,
            chain_panic_hook: config.termination.chain_panic_hook,
            terminator: Box::new(ProcessTerminator),
        }
    }

    pub fn with_terminator(mut self, terminator: impl Terminator + 'static) -> Self {
        self.terminator = Box::new(terminator);
        self
    }

    /// Capture the current default handler and `context`, then become the
    /// process default handler. Call once, early in startup.
    ///
    /// With `termination.chain_panic_hook` set, an empty registry first
    /// adopts the std panic hook installed before, so faults are forwarded
    /// to it and the process is not terminated.
    pub fn init(self: &Arc<Self>, context: Arc<dyn AppContext>) {
        let registry = HookRegistry::global();
        if self.chain_panic_hook && registry.adopt_panic_hook() {
            log_crash_debug!("Adopted existing panic hook");
        }
        self.init_with(context, registry);
    }

    /// `init` against an explicit registry.
    ///
    /// Calling this again re-captures whatever the registry holds at that
    /// moment, unless that is this handler's own hook.
    pub fn init_with(self: &Arc<Self>, context: Arc<dyn AppContext>, registry: &HookRegistry) {
        let current = registry.default_handler();
        let own = read(&self.installed);
        let is_self = matches!((&current, &own), (Some(c), Some(o)) if Arc::ptr_eq(c, o));
        if !is_self {
            *write(&self.previous) = current;
        }
        *write(&self.context) = Some(context);

        let handler = Arc::clone(self);
        let hook: FaultHook = Arc::new(move |fault: &Fault| handler.on_fault(fault));
        *write(&self.installed) = Some(hook.clone());
        registry.set_default_handler(Some(hook));

        log_crash_info!(
            "Crash handler installed",
            chained = read(&self.previous).is_some(),
        );
    }

    /// Handle an unhandled fault: write a report, print the trace, then
    /// forward to the previous handler or terminate.
    pub fn on_fault(&self, fault: &Fault) {
        if let Err(e) = self.dump_to_file(fault) {
            log_crash_error!(
                "Failed to write crash report",
                error = tracing::field::display(&e),
            );
        }

        let _ = writeln!(io::stderr().lock(), "{}", fault.stack_trace().trim_end());

        match read(&self.previous) {
            Some(previous) => previous(fault),
            None => self.terminator.terminate(self.exit_code),
        }
    }

    /// Path of the report written for `fault`, if any.
    fn dump_to_file(&self, fault: &Fault) -> Result<Option<PathBuf>, CrashError> {
        let Some(context) = read(&self.context) else {
            log_crash_warn!("Fault before init, no report written");
            return Ok(None);
        };
        self.writer.write(context.as_ref(), fault)
    }

    pub fn is_initialized(&self) -> bool {
        read(&self.context).is_some()
    }
}

impl Default for CrashHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
