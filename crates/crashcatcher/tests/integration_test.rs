//! Integration tests for crashcatcher config and storage resolution
//!
//! These tests exercise config files and report directories on a real file system.

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

use crashcatcher::config::{Config, StorageConfig};
use crashcatcher::testing::TestEnvironment;
use crashcatcher::{
    resolve_crash_log_directory, AppContext, CrashHandler, Fault, HookRegistry, HostContext,
    PackageInfo, Terminator,
};

struct NoExit;

impl Terminator for NoExit {
    fn terminate(&self, _code: i32) {}
}

/// A config file on disk parses with unset fields defaulted
#[test]
fn test_parse_config_file() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join(".crashcatcher");
    std::fs::create_dir_all(&dir).unwrap();

    let config_content = r#"
[report]
dir_name = "fatal"
file_prefix = "Fatal"

[termination]
exit_code = 3

[storage]
cache_dir = "/var/cache/demo"
external_removable = false
"#;
    std::fs::write(dir.join("config.toml"), config_content).unwrap();

    let contents = std::fs::read_to_string(dir.join("config.toml")).unwrap();
    let config: Config = toml::from_str(&contents).unwrap();

    assert_eq!(config.report.dir_name, "fatal");
    assert_eq!(config.report.file_prefix, "Fatal");
    assert_eq!(config.report.file_extension, ".txt");
    assert_eq!(config.termination.exit_code, 3);
    assert_eq!(config.storage.cache_dir, Some(PathBuf::from("/var/cache/demo")));
    assert!(!config.storage.external_removable);
}

/// Default TOML parses back to the same layout
#[test]
fn test_default_toml_parses() {
    let parsed: Config = toml::from_str(&Config::default_toml()).unwrap();
    assert_eq!(parsed.report.timestamp_format, "%Y年%m月%d日%H时%M分%S秒");
    assert_eq!(parsed.termination.exit_code, 10);
}

/// HostContext with a built-in external medium writes reports there
#[test]
fn test_host_context_prefers_non_removable_external() {
    let temp = tempdir().unwrap();
    let external = temp.path().join("storage/emulated/cache");
    let storage = StorageConfig {
        cache_dir: Some(temp.path().join("internal")),
        external_cache_dir: Some(external.clone()),
        external_removable: false,
    };
    let ctx = HostContext::with_storage("demo", PackageInfo::new("0.9.0", 90), storage);

    assert_eq!(resolve_crash_log_directory(&ctx), external.join("crashLogs"));
}

/// Full handler flow with an isolated registry and a host context
#[test]
fn test_handler_writes_report_with_host_context() {
    let env = TestEnvironment::new().unwrap();
    let storage = StorageConfig {
        cache_dir: Some(env.internal_cache.clone()),
        ..StorageConfig::default()
    };
    let ctx: Arc<dyn AppContext> = Arc::new(HostContext::with_storage(
        "demo",
        PackageInfo::new("5.0.1", 501),
        storage,
    ));

    let registry = HookRegistry::new();
    let handler = Arc::new(CrashHandler::from_config(&Config::default()).with_terminator(NoExit));
    handler.init_with(ctx, &registry);

    assert!(registry.dispatch(&Fault::new("host fault")));

    let reports = env.reports_in(env.internal_cache.join("crashLogs"));
    assert_eq!(reports.len(), 1);
    let contents = std::fs::read_to_string(&reports[0]).unwrap();
    assert!(contents.contains("App Version: 5.0.1"));
    assert!(contents.contains("App VersionCode: 501"));
    assert!(contents.contains(&format!("CPU ABI: {}", std::env::consts::ARCH)));
    assert!(contents.contains("host fault"));
}
