//! Process-wide "default fault handler" slot.
//!
//! `std::panic` only exposes take/set of a single hook, and always has one
//! installed. The registry layers an explicit `Option<FaultHook>` slot on top
//! so a handler can tell "something was installed before me" apart from
//! "nothing was", and chain accordingly.
//!
//! A hook installed with `std::panic::set_hook` before the bridge only runs
//! while the slot is empty, unless it is adopted into the slot with
//! [`HookRegistry::adopt_panic_hook`].
//!
//! The panic hook runs before unwinding starts, so it also sees panics the
//! host later catches with `std::panic::catch_unwind`.

use once_cell::sync::Lazy;
use std::cell::Cell;
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, RwLock};

use crate::fault::Fault;

pub type FaultHook = Arc<dyn Fn(&Fault) + Send + Sync + 'static>;

/// Registry backing `HookRegistry::global()`. First access routes the std
/// panic hook through it.
static GLOBAL: Lazy<HookRegistry> = Lazy::new(|| {
    install_panic_bridge();
    HookRegistry {
        bridged: true,
        ..HookRegistry::new()
    }
});

thread_local! {
    /// Set by the adopted-hook marker; the bridge then runs the std hook.
    static RUN_PANIC_HOOK: Cell<bool> = const { Cell::new(false) };
}

pub struct HookRegistry {
    current: RwLock<Option<FaultHook>>,
    /// Whether panics are routed through this registry
    bridged: bool,
}

impl HookRegistry {
    /// A registry not connected to the panic machinery.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            bridged: false,
        }
    }

    /// The process registry. Panics on any thread are dispatched to its
    /// default handler; while it is empty the panic hook that was in place
    /// before first access keeps running.
    pub fn global() -> &'static HookRegistry {
        &GLOBAL
    }

    pub fn default_handler(&self) -> Option<FaultHook> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the default handler, returning the one it displaced.
    pub fn set_default_handler(&self, hook: Option<FaultHook>) -> Option<FaultHook> {
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *slot, hook)
    }

    /// Make the panic hook that was in place before the bridge the default
    /// handler, so a handler installed afterwards captures and forwards to
    /// it. Only an empty slot of a bridged registry is filled; returns
    /// whether the hook was adopted.
    ///
    /// The adopted hook runs once the chain returns to the bridge, with the
    /// original `PanicHookInfo`.
    pub fn adopt_panic_hook(&self) -> bool {
        if !self.bridged {
            return false;
        }
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            return false;
        }
        let marker: FaultHook = Arc::new(|_fault: &Fault| RUN_PANIC_HOOK.with(|run| run.set(true)));
        *slot = Some(marker);
        true
    }

    /// Run the default handler for `fault`. Returns false when the slot is empty.
    pub fn dispatch(&self, fault: &Fault) -> bool {
        // Lock is released before the hook runs; hooks may re-enter the registry.
        match self.default_handler() {
            Some(hook) => {
                hook(fault);
                true
            }
            None => false,
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn install_panic_bridge() {
    type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;
    let platform: PanicHook = panic::take_hook();

    panic::set_hook(Box::new(move |info| match GLOBAL.default_handler() {
        Some(hook) => {
            RUN_PANIC_HOOK.with(|run| run.set(false));
            hook(&Fault::from_panic(info));
            if RUN_PANIC_HOOK.with(|run| run.replace(false)) {
                platform(info);
            }
        }
        None => platform(info),
    }));
}
