use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::engine::KafkaEngine;

static GLOBAL: KafkaEngineHolder = KafkaEngineHolder::new();

/// Process-wide holder of one active [`KafkaEngine`].
///
/// Ambient access point when no surrounding framework wires the engine in:
/// the first read without a registered engine falls back to a
/// default-constructed one, behind a double-checked lock. Registration is
/// first-write-wins unless `refresh` forces an overwrite.
pub struct KafkaEngineHolder {
    initialized: AtomicBool,
    engine: RwLock<Option<Arc<KafkaEngine>>>,
}

impl KafkaEngineHolder {
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            engine: RwLock::new(None),
        }
    }

    /// The process-wide instance.
    pub fn global() -> &'static KafkaEngineHolder {
        &GLOBAL
    }

    /// Register `engine` unless one was already registered.
    pub fn set(&self, engine: Arc<KafkaEngine>) {
        self.set_with(engine, false);
    }

    /// Register `engine`; with `refresh` the registration overwrites any
    /// prior one.
    pub fn set_with(&self, engine: Arc<KafkaEngine>, refresh: bool) {
        if refresh {
            self.initialized.store(true, Ordering::SeqCst);
            self.store(Some(engine));
            return;
        }

        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.store(Some(engine));
        }
    }

    /// The registered engine, lazily default-constructed on first access.
    pub fn engine(&self) -> Arc<KafkaEngine> {
        if let Some(engine) = self.load() {
            return engine;
        }

        let mut guard = match self.engine.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("engine holder write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        // Re-check under the write lock: another thread may have won the race.
        if let Some(engine) = guard.as_ref() {
            return engine.clone();
        }

        tracing::debug!("no engine registered, constructing the default engine");
        let engine = Arc::new(KafkaEngine::new());
        *guard = Some(engine.clone());
        self.initialized.store(true, Ordering::SeqCst);
        engine
    }

    fn load(&self) -> Option<Arc<KafkaEngine>> {
        let guard = match self.engine.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("engine holder read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.clone()
    }

    fn store(&self, engine: Option<Arc<KafkaEngine>>) {
        let mut guard = match self.engine.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("engine holder write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        *guard = engine;
    }
}

impl Default for KafkaEngineHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KafkaEngineHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaEngineHolder")
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_default_construction_is_idempotent() {
        let holder = KafkaEngineHolder::new();

        let first = holder.engine();
        let second = holder.engine();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_access_yields_one_engine() {
        let holder = Arc::new(KafkaEngineHolder::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let holder = holder.clone();
                std::thread::spawn(move || holder.engine())
            })
            .collect();

        let engines: Vec<Arc<KafkaEngine>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for pair in engines.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn test_plain_set_is_first_write_wins() {
        let holder = KafkaEngineHolder::new();

        let first = Arc::new(KafkaEngine::new());
        let second = Arc::new(KafkaEngine::new());

        holder.set(first.clone());
        holder.set(second.clone());

        assert!(Arc::ptr_eq(&holder.engine(), &first));
    }

    #[test]
    fn test_refresh_overwrites_prior_registration() {
        let holder = KafkaEngineHolder::new();

        let first = Arc::new(KafkaEngine::new());
        let second = Arc::new(KafkaEngine::new());

        holder.set(first);
        holder.set_with(second.clone(), true);

        assert!(Arc::ptr_eq(&holder.engine(), &second));
    }

    #[test]
    fn test_global_holder_is_reachable() {
        let engine = KafkaEngineHolder::global().engine();
        let again = KafkaEngineHolder::global().engine();
        assert!(Arc::ptr_eq(&engine, &again));
    }
}
