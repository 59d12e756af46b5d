use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::service::{AdminService, ConsumerService, ProducerService};

/// Memoizing cache from requested type to its singleton instance.
///
/// Guarantees at most one construction per type under concurrent first
/// access; subsequent reads observe the same instance.
#[derive(Default)]
pub struct SharedObjects {
    objects: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for SharedObjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedObjects").finish()
    }
}

impl SharedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the instance cached for `T`, constructing it with `init` on
    /// first request.
    pub fn get_or_init<T, F>(&self, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let key = TypeId::of::<T>();

        {
            let guard = match self.objects.read() {
                Ok(g) => g,
                Err(poisoned) => {
                    tracing::warn!("shared object read lock was poisoned, recovering");
                    poisoned.into_inner()
                }
            };
            if let Some(existing) = guard.get(&key) {
                if let Ok(typed) = existing.clone().downcast::<T>() {
                    return typed;
                }
            }
        }

        let mut guard = match self.objects.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("shared object write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        // Re-check under the write lock: another thread may have won the race.
        if let Some(existing) = guard.get(&key) {
            if let Ok(typed) = existing.clone().downcast::<T>() {
                return typed;
            }
        }

        let fresh = Arc::new(init());
        guard.insert(key, fresh.clone());
        fresh
    }

    /// Cache `instance` for `T`, replacing any prior entry.
    pub fn set<T: Send + Sync + 'static>(&self, instance: T) {
        let mut guard = match self.objects.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("shared object write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.insert(TypeId::of::<T>(), Arc::new(instance));
    }

    /// The cached instance for `T`, if one exists.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let guard = match self.objects.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("shared object read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard
            .get(&TypeId::of::<T>())
            .and_then(|obj| obj.clone().downcast::<T>().ok())
    }

    /// Drop every cached instance.
    pub fn clear(&self) {
        let mut guard = match self.objects.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("shared object write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.clear();
    }
}

/// Aggregate façade over the three factory services.
///
/// Service instances are per-type singletons resolved through the shared
/// object cache.
#[derive(Debug, Default)]
pub struct KafkaEngine {
    shared: SharedObjects,
}

impl KafkaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_service(&self) -> Arc<AdminService> {
        self.shared.get_or_init(AdminService::new)
    }

    pub fn consumer_service(&self) -> Arc<ConsumerService> {
        self.shared.get_or_init(ConsumerService::new)
    }

    pub fn producer_service(&self) -> Arc<ProducerService> {
        self.shared.get_or_init(ProducerService::new)
    }

    /// The engine's shared object cache, for callers that want to stash
    /// their own per-type singletons alongside the services.
    pub fn shared_objects(&self) -> &SharedObjects {
        &self.shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_type_yields_same_instance() {
        let engine = KafkaEngine::new();

        let first = engine.admin_service();
        let second = engine.admin_service();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_types_yield_independent_instances() {
        let shared = SharedObjects::new();

        let a: Arc<String> = shared.get_or_init(|| "a".to_string());
        let b: Arc<Vec<u8>> = shared.get_or_init(|| vec![1, 2, 3]);

        assert_eq!(a.as_str(), "a");
        assert_eq!(b.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_concurrent_first_access_constructs_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let shared = Arc::new(SharedObjects::new());
        let constructions = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let constructions = constructions.clone();
                std::thread::spawn(move || {
                    shared.get_or_init(|| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        "singleton".to_string()
                    })
                })
            })
            .collect();

        let instances: Vec<Arc<String>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for pair in instances.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn test_set_get_clear() {
        let shared = SharedObjects::new();
        shared.set(42u64);

        assert_eq!(shared.get::<u64>().as_deref(), Some(&42));
        assert!(shared.get::<u32>().is_none());

        shared.clear();
        assert!(shared.get::<u64>().is_none());
    }
}
