//! Crash report contents and the file they are written to.
//!
//! A report is plain text, one field per line:
//!
//! ```text
//! 2026年10月16日09时05分03秒
//! App Version: 1.4.2
//! App VersionCode: 142
//! OS Version: 6.8.0-45-generic_6
//! Vendor: LENOVO
//! Model: 21CB
//! CPU ABI: x86_64
//! thread 'main' panicked at src/main.rs:12:5:
//! ...
//! ```

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::ReportConfig;
use crate::context::{AppContext, PackageInfo};
use crate::device::DeviceInfo;
use crate::error::CrashError;
use crate::fault::Fault;
use crate::path::resolve_crash_log_directory_named;
use crate::{log_crash_info, log_crash_warn};

#[derive(Debug, Clone)]
pub struct CrashReport {
    pub timestamp: String,
    /// None when the host could not supply its version metadata.
    pub package: Option<PackageInfo>,
    pub device: DeviceInfo,
    pub stack_trace: String,
}

impl CrashReport {
    /// Gather everything a report needs. A failing package lookup is logged
    /// and leaves the app fields out; it never fails the report.
    pub fn collect(context: &dyn AppContext, fault: &Fault, timestamp: String) -> Self {
        let package = match context.package_info() {
            Ok(info) => Some(info),
            Err(e) => {
                log_crash_warn!(
                    "App version info unavailable",
                    error = tracing::field::display(&e),
                );
                None
            }
        };

        Self {
            timestamp,
            package,
            device: context.device_info(),
            stack_trace: fault.stack_trace(),
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.timestamp)?;

        if let Some(package) = &self.package {
            writeln!(out, "App Version: {}", package.version_name)?;
            writeln!(out, "App VersionCode: {}", package.version_code)?;
        }

        let device = &self.device;
        writeln!(out, "OS Version: {}_{}", device.os_version, device.api_level)?;
        writeln!(out, "Vendor: {}", device.manufacturer)?;
        writeln!(out, "Model: {}", device.model)?;
        writeln!(out, "CPU ABI: {}", device.cpu_abi)?;

        writeln!(out, "{}", self.stack_trace.trim_end())
    }
}

/// Serializes one `CrashReport` per fault into the report directory.
#[derive(Debug, Clone, Default)]
pub struct ReportWriter {
    layout: ReportConfig,
}

impl ReportWriter {
    pub fn new(layout: ReportConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ReportConfig {
        &self.layout
    }

    /// Format `now` with the configured pattern. An unusable pattern falls
    /// back to the default one instead of panicking inside the panic hook.
    pub fn timestamp(&self, now: &DateTime<Local>) -> String {
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.layout.timestamp_format)).is_ok() {
            return out;
        }
        let fallback = ReportConfig::default().timestamp_format;
        now.format(&fallback).to_string()
    }

    /// `<prefix>_<timestamp><extension>`
    pub fn file_name(&self, timestamp: &str) -> String {
        format!(
            "{}_{}{}",
            self.layout.file_prefix, timestamp, self.layout.file_extension
        )
    }

    pub fn write(
        &self,
        context: &dyn AppContext,
        fault: &Fault,
    ) -> Result<Option<PathBuf>, CrashError> {
        self.write_at(context, fault, &Local::now())
    }

    /// Write a report stamped with `now`.
    ///
    /// Returns `Ok(None)` without writing when the report directory cannot be
    /// created. An existing file with the same name is overwritten. A write
    /// that fails partway returns the error and can leave a truncated report
    /// on disk.
    pub fn write_at(
        &self,
        context: &dyn AppContext,
        fault: &Fault,
        now: &DateTime<Local>,
    ) -> Result<Option<PathBuf>, CrashError> {
        let timestamp = self.timestamp(now);

        let dir = resolve_crash_log_directory_named(context, &self.layout.dir_name);
        if let Err(e) = fs::create_dir_all(&dir) {
            log_crash_warn!(
                "Report directory unavailable, skipping report",
                path = tracing::field::display(dir.display()),
                error = tracing::field::display(&e),
            );
            return Ok(None);
        }

        let path = dir.join(self.file_name(&timestamp));
        let report = CrashReport::collect(context, fault, timestamp);

        let mut out = BufWriter::new(File::create(&path)?);
        report.write_to(&mut out)?;
        out.flush()?;

        log_crash_info!(
            "Crash report written",
            path = tracing::field::display(path.display()),
        );
        Ok(Some(path))
    }
}
