//! Test environment abstraction for isolated testing.
//!
//! Provides `TestEnvironment` to manage:
//! - Temporary internal/external cache roots
//! - A `FakeContext` with fixed package and device facts
//!
//! # Usage
//!
//! ```ignore
//! use crashcatcher::testing::TestEnvironment;
//!
//! #[test]
//! fn test_something() {
//!     let env = TestEnvironment::new().unwrap();
//!     let ctx = env.context();
//!     // reports land in env.internal_cache/crashLogs
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

use crate::context::{AppContext, PackageInfo, StorageState};
use crate::device::DeviceInfo;
use crate::error::CrashError;

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated cache roots that disappear with the environment
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    temp_dir: TempDir,
    /// Internal cache root (created)
    pub internal_cache: PathBuf,
    /// External cache root (not created; mount it with `mount_external`)
    pub external_cache: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let internal_cache = root.join("data").join("cache");
        let external_cache = root.join("sdcard").join("cache");
        std::fs::create_dir_all(&internal_cache)?;

        Ok(Self {
            temp_dir,
            internal_cache,
            external_cache,
            test_id,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create the external cache root
    pub fn mount_external(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.external_cache)?;
        Ok(())
    }

    /// Context with only internal storage available
    pub fn context(&self) -> FakeContext {
        FakeContext::new(&self.internal_cache)
    }

    /// Context whose external storage is mounted
    pub fn external_context(&self) -> FakeContext {
        FakeContext::new(&self.internal_cache)
            .with_external(Some(self.external_cache.clone()))
            .with_storage_state(StorageState {
                mounted: true,
                removable: true,
            })
    }

    /// Report files under `dir`, sorted by name
    pub fn reports_in(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let mut reports: Vec<PathBuf> = std::fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default();
        reports.sort();
        reports
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}

/// `AppContext` with every answer fixed up front
#[derive(Debug, Clone)]
pub struct FakeContext {
    cache_dir: PathBuf,
    external_cache_dir: Option<PathBuf>,
    storage: StorageState,
    package: Option<PackageInfo>,
    device: DeviceInfo,
}

impl FakeContext {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            external_cache_dir: None,
            storage: StorageState {
                mounted: false,
                removable: true,
            },
            package: Some(PackageInfo::new("2.3.1", 231)),
            device: DeviceInfo {
                os_version: "14".to_string(),
                api_level: 34,
                manufacturer: "Acme".to_string(),
                model: "Rocket 9".to_string(),
                cpu_abi: "arm64-v8a".to_string(),
            },
        }
    }

    pub fn with_external(mut self, dir: Option<PathBuf>) -> Self {
        self.external_cache_dir = dir;
        self
    }

    pub fn with_storage_state(mut self, storage: StorageState) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_package(mut self, package: PackageInfo) -> Self {
        self.package = Some(package);
        self
    }

    pub fn without_package_info(mut self) -> Self {
        self.package = None;
        self
    }

    pub fn with_device(mut self, device: DeviceInfo) -> Self {
        self.device = device;
        self
    }
}

impl AppContext for FakeContext {
    fn package_info(&self) -> Result<PackageInfo, CrashError> {
        self.package
            .clone()
            .ok_or_else(|| CrashError::PackageInfo("package not found".to_string()))
    }

    fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    fn external_cache_dir(&self) -> Option<PathBuf> {
        self.external_cache_dir.clone()
    }

    fn external_storage(&self) -> StorageState {
        self.storage
    }

    fn device_info(&self) -> DeviceInfo {
        self.device.clone()
    }
}
