//! # crashcatcher
//!
//! Last-chance crash reporting for Rust applications.
//!
//! Install once at startup:
//!
//! ```ignore
//! use std::sync::Arc;
//! use crashcatcher::{CrashHandler, HostContext, PackageInfo};
//!
//! let context = HostContext::new("myapp", PackageInfo::new("1.4.2", 142));
//! CrashHandler::instance().init(Arc::new(context));
//! ```
//!
//! When a thread panics, the handler writes
//! `<cache root>/crashLogs/Crash_<timestamp>.txt`, prints the trace to
//! stderr and then either forwards the fault to whatever hook was installed
//! before it, or exits the process with status 10.
//!
//! "Before it" means the default handler of [`HookRegistry::global`]. A hook
//! installed with `std::panic::set_hook` is only forwarded to when
//! `termination.chain_panic_hook` is set (or the host calls
//! [`HookRegistry::adopt_panic_hook`] before `init`); the process then keeps
//! running after a panic and is never exited with status 10.
//!
//! The panic hook runs before unwinding, so it cannot tell a panic that will
//! be caught by `std::panic::catch_unwind` from an uncaught one. Without a
//! previous handler, a caught panic still writes a report and exits.

pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod fault;
pub mod handler;
pub mod hook;
pub mod logging;
pub mod path;
pub mod report;
pub mod testing;

pub use config::{config, reload, Config};
pub use context::{AppContext, HostContext, PackageInfo, StorageState};
pub use device::DeviceInfo;
pub use error::CrashError;
pub use fault::Fault;
pub use handler::{CrashHandler, ProcessTerminator, Terminator};
pub use hook::{FaultHook, HookRegistry};
pub use path::{resolve_cache_root, resolve_crash_log_directory, CRASH_LOG_DIR};
pub use report::{CrashReport, ReportWriter};
