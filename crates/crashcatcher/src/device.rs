//! Facts about the machine the process runs on.

use std::path::Path;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub os_version: String,
    pub api_level: u32,
    pub manufacturer: String,
    pub model: String,
    pub cpu_abi: String,
}

impl DeviceInfo {
    pub fn current() -> Self {
        let os_version = os_release();
        let api_level = leading_number(&os_version);
        Self {
            api_level,
            os_version,
            manufacturer: read_dmi("sys_vendor"),
            model: read_dmi("product_name"),
            cpu_abi: std::env::consts::ARCH.to_string(),
        }
    }
}

#[cfg(unix)]
fn os_release() -> String {
    match nix::sys::utsname::uname() {
        Ok(uts) => uts.release().to_string_lossy().into_owned(),
        Err(_) => std::env::consts::OS.to_string(),
    }
}

#[cfg(not(unix))]
fn os_release() -> String {
    std::env::consts::OS.to_string()
}

fn read_dmi(field: &str) -> String {
    let path = Path::new("/sys/class/dmi/id").join(field);
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// "6.8.0-45-generic" -> 6
fn leading_number(release: &str) -> u32 {
    let digits: String = release.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
