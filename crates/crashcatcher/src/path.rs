//! Where crash reports are written.
//!
//! Reports go under the app's external cache dir when external storage can be
//! used, otherwise under the internal cache dir:
//!
//! ```text
//! <external>/cache/crashLogs
//! <internal>/cache/crashLogs
//! ```

use std::path::PathBuf;

use crate::context::AppContext;

/// Subdirectory appended to the cache root.
pub const CRASH_LOG_DIR: &str = "crashLogs";

/// Cache root for crash reports.
///
/// External storage is preferred when it is mounted or non-removable, but
/// only if the platform actually reports an external cache dir right now.
pub fn resolve_cache_root(context: &dyn AppContext) -> PathBuf {
    if context.external_storage().is_usable() {
        if let Some(external) = context.external_cache_dir() {
            return external;
        }
    }
    context.cache_dir()
}

/// `<cache root>/crashLogs`
pub fn resolve_crash_log_directory(context: &dyn AppContext) -> PathBuf {
    resolve_crash_log_directory_named(context, CRASH_LOG_DIR)
}

/// `<cache root>/<dir_name>`
pub fn resolve_crash_log_directory_named(context: &dyn AppContext, dir_name: &str) -> PathBuf {
    resolve_cache_root(context).join(dir_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StorageState;
    use crate::testing::FakeContext;
    use std::path::Path;

    fn ctx(mounted: bool, removable: bool, external: Option<&str>) -> FakeContext {
        FakeContext::new("/data/app/cache")
            .with_external(external.map(PathBuf::from))
            .with_storage_state(StorageState { mounted, removable })
    }

    #[test]
    fn test_mounted_prefers_external() {
        let c = ctx(true, true, Some("/sdcard/app/cache"));
        assert_eq!(resolve_cache_root(&c), Path::new("/sdcard/app/cache"));
    }

    #[test]
    fn test_mounted_without_external_dir_falls_back() {
        let c = ctx(true, true, None);
        assert_eq!(resolve_cache_root(&c), Path::new("/data/app/cache"));
    }

    #[test]
    fn test_non_removable_counts_as_usable() {
        let c = ctx(false, false, Some("/storage/emulated/app/cache"));
        assert_eq!(resolve_cache_root(&c), Path::new("/storage/emulated/app/cache"));
    }

    #[test]
    fn test_unmounted_removable_uses_internal() {
        let c = ctx(false, true, Some("/sdcard/app/cache"));
        assert_eq!(resolve_cache_root(&c), Path::new("/data/app/cache"));
    }

    #[test]
    fn test_crash_log_segment_appended() {
        let c = ctx(false, true, None);
        assert_eq!(
            resolve_crash_log_directory(&c),
            Path::new("/data/app/cache/crashLogs")
        );
        assert_eq!(
            resolve_crash_log_directory_named(&c, "reports"),
            Path::new("/data/app/cache/reports")
        );
    }
}
