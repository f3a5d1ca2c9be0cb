//! The application handle passed to `CrashHandler::init`.

use std::path::PathBuf;

use crate::config::StorageConfig;
use crate::device::DeviceInfo;
use crate::error::CrashError;

/// Version metadata of the running application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub version_name: String,
    pub version_code: i64,
}

impl PackageInfo {
    pub fn new(version_name: impl Into<String>, version_code: i64) -> Self {
        Self {
            version_name: version_name.into(),
            version_code,
        }
    }
}

/// State of the external (possibly removable) storage medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageState {
    pub mounted: bool,
    pub removable: bool,
}

impl StorageState {
    /// External storage may be used: it is mounted, or it is built in.
    pub fn is_usable(&self) -> bool {
        self.mounted || !self.removable
    }
}

/// What the crash handler needs to know about the host application.
pub trait AppContext: Send + Sync {
    fn package_info(&self) -> Result<PackageInfo, CrashError>;

    /// Internal cache root; always available.
    fn cache_dir(&self) -> PathBuf;

    /// App-scoped cache root on external storage, if the platform has one
    /// right now.
    fn external_cache_dir(&self) -> Option<PathBuf>;

    fn external_storage(&self) -> StorageState;

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::current()
    }
}

/// `AppContext` for a process running directly on the host machine.
#[derive(Debug, Clone)]
pub struct HostContext {
    app_name: String,
    package: PackageInfo,
    storage: StorageConfig,
}

impl HostContext {
    /// Context using the global config's `[storage]` section.
    pub fn new(app_name: impl Into<String>, package: PackageInfo) -> Self {
        let storage = crate::config::config().storage.clone();
        Self::with_storage(app_name, package, storage)
    }

    pub fn with_storage(
        app_name: impl Into<String>,
        package: PackageInfo,
        storage: StorageConfig,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            package,
            storage,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl AppContext for HostContext {
    fn package_info(&self) -> Result<PackageInfo, CrashError> {
        if self.package.version_name.is_empty() {
            return Err(CrashError::PackageInfo(format!(
                "no version registered for {}",
                self.app_name
            )));
        }
        Ok(self.package.clone())
    }

    fn cache_dir(&self) -> PathBuf {
        match &self.storage.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(&self.app_name),
        }
    }

    fn external_cache_dir(&self) -> Option<PathBuf> {
        self.storage.external_cache_dir.clone()
    }

    /// The external medium counts as mounted when the parent of the
    /// configured external cache dir exists.
    fn external_storage(&self) -> StorageState {
        let mounted = self
            .storage
            .external_cache_dir
            .as_deref()
            .and_then(|dir| dir.parent())
            .is_some_and(|parent| parent.is_dir());
        StorageState {
            mounted,
            removable: self.storage.external_removable,
        }
    }
}
