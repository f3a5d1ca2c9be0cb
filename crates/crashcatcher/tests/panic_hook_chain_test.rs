//! Chaining to a panic hook installed with `std::panic::set_hook`.
//!
//! Kept as the only test in this binary: it owns the process-wide panic hook.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crashcatcher::config::Config;
use crashcatcher::testing::TestEnvironment;
use crashcatcher::{CrashHandler, HookRegistry, Terminator};

#[derive(Clone, Default)]
struct RecordingTerminator(Arc<Mutex<Vec<i32>>>);

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.0.lock().unwrap().push(code);
    }
}

#[test]
fn test_set_hook_tooling_is_forwarded_after_init() {
    // Tooling that registered itself the std way, before the crash handler.
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let messages: Arc<Mutex<Vec<String>>> = Arc::default();
    let (counter, sink) = (hook_calls.clone(), messages.clone());
    std::panic::set_hook(Box::new(move |info| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = info.payload().downcast_ref::<&str>() {
            sink.lock().unwrap().push(msg.to_string());
        }
    }));

    let mut config = Config::default();
    config.termination.chain_panic_hook = true;
    let terminator = RecordingTerminator::default();
    let env = TestEnvironment::new().unwrap();
    let handler = Arc::new(CrashHandler::from_config(&config).with_terminator(terminator.clone()));
    handler.init(Arc::new(env.context()));

    // The slot now holds the crash handler; nothing left to adopt.
    assert!(!HookRegistry::global().adopt_panic_hook());

    let result = thread::spawn(|| panic!("lost tooling")).join();
    assert!(result.is_err());

    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*messages.lock().unwrap(), vec!["lost tooling".to_string()]);
    assert!(terminator.0.lock().unwrap().is_empty());
    assert_eq!(env.reports_in(env.internal_cache.join("crashLogs")).len(), 1);

    // Re-init keeps the adopted hook as the previous handler.
    handler.init(Arc::new(env.context()));
    let result = thread::spawn(|| panic!("again")).join();
    assert!(result.is_err());
    assert_eq!(hook_calls.load(Ordering::SeqCst), 2);
    assert!(terminator.0.lock().unwrap().is_empty());
}
