//! 单例注册表
//!
//! 每个类型标识对应一个独立的 `OnceCell`，构造锁的粒度是单个类型:
//! 同一类型的并发首次创建被串行化，不同类型之间互不阻塞。

use dashmap::DashMap;
use di_abstractions::{Bean, ComponentRegistry};
use infrastructure_common::ContainerResult;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 单例注册表
#[derive(Default)]
pub struct BeanRegistry {
    beans: DashMap<String, Arc<OnceCell<Bean>>>,
}

impl BeanRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    // 克隆出 Arc 后分片锁即释放，构造期间不持有 DashMap 的锁
    fn cell(&self, name: &str) -> Arc<OnceCell<Bean>> {
        if let Some(cell) = self.beans.get(name) {
            return cell.clone();
        }
        self.beans.entry(name.to_string()).or_default().clone()
    }
}

impl ComponentRegistry for BeanRegistry {
    fn get(&self, name: &str) -> Option<Bean> {
        self.beans.get(name).and_then(|cell| cell.get().cloned())
    }

    fn get_or_create<F>(&self, name: &str, factory: F) -> ContainerResult<Bean>
    where
        F: FnOnce() -> ContainerResult<Bean>,
    {
        let cell = self.cell(name);
        cell.get_or_try_init(|| {
            debug!("创建单例: {}", name);
            factory()
        })
        .cloned()
    }

    fn put_if_absent(&self, name: &str, bean: Bean) -> Bean {
        self.cell(name).get_or_init(|| bean).clone()
    }

    fn contains(&self, name: &str) -> bool {
        self.beans
            .get(name)
            .map_or(false, |cell| cell.get().is_some())
    }

    fn len(&self) -> usize {
        self.beans
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .beans
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("beans", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{component_bean, downcast_component};
    use infrastructure_common::ContainerError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Slow(usize);

    #[test]
    fn test_get_or_create_runs_factory_once() {
        let registry = BeanRegistry::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            registry
                .get_or_create("demo::Slow", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(component_bean(Arc::new(Slow(1))))
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.contains("demo::Slow"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_factory_leaves_no_entry() {
        let registry = BeanRegistry::new();

        let result = registry.get_or_create("demo::Broken", || {
            Err(ContainerError::creation_failed("demo::Broken", "构造失败"))
        });
        assert!(result.is_err());
        assert!(!registry.contains("demo::Broken"));
        assert!(registry.get("demo::Broken").is_none());
        assert_eq!(registry.len(), 0);

        let retried = registry.get_or_create("demo::Broken", || {
            Ok(component_bean(Arc::new(Slow(2))))
        });
        assert!(retried.is_ok());
    }

    #[test]
    fn test_put_if_absent_keeps_first() {
        let registry = BeanRegistry::new();
        let first = registry.put_if_absent("demo::Slow", component_bean(Arc::new(Slow(1))));
        let second = registry.put_if_absent("demo::Slow", component_bean(Arc::new(Slow(2))));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(downcast_component::<Slow>(&second).unwrap().0, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_creation() {
        let registry = Arc::new(BeanRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                let calls = calls.clone();
                tokio::task::spawn_blocking(move || {
                    registry
                        .get_or_create("demo::Slow", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(20));
                            Ok(component_bean(Arc::new(Slow(7))))
                        })
                        .unwrap()
                })
            })
            .collect();

        let mut beans = Vec::new();
        for handle in handles {
            beans.push(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(beans.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_types_do_not_block() {
        let registry = Arc::new(BeanRegistry::new());
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let slow = {
            let registry = registry.clone();
            tokio::task::spawn_blocking(move || {
                registry
                    .get_or_create("demo::Slow", move || {
                        started_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                        Ok(component_bean(Arc::new(Slow(1))))
                    })
                    .unwrap()
            })
        };

        started_rx.recv().unwrap();
        // Slow 的构造仍在进行，另一个类型可以直接创建
        let fast = registry
            .get_or_create("demo::Fast", || Ok(component_bean(Arc::new(Slow(2)))))
            .unwrap();
        assert_eq!(downcast_component::<Slow>(&fast).unwrap().0, 2);

        release_tx.send(()).unwrap();
        slow.await.unwrap();
        assert_eq!(registry.names(), vec!["demo::Fast", "demo::Slow"]);
    }
}
