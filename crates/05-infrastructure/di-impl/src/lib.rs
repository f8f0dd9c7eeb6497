//! # 依赖注入具体实现
//!
//! 提供单例注册表、类型目录、容器启动、依赖装配以及仓储分发代理的具体实现。
//!
//! ```no_run
//! use di_impl::{BeanContainer, TypeCatalog, TypeInventory};
//!
//! let catalog = TypeCatalog::new()
//!     .with_builtins()
//!     .scan_from(&TypeInventory, "shop");
//! let context = BeanContainer::new(catalog).bootstrap()?;
//! # Ok::<(), infrastructure_common::ContainerError>(())
//! ```

pub mod binding;
pub mod catalog;
pub mod container;
pub mod crud;
pub mod proxy;
pub mod registry;
pub mod wiring;

pub use binding::{RepositoryBinding, RepositoryBindings};
pub use catalog::{builtin_definitions, TypeCatalog, TypeInventory};
pub use container::{ApplicationContext, BeanContainer};
pub use crud::SqlCrudRepository;
pub use proxy::RepositoryProxy;
pub use registry::BeanRegistry;
pub use wiring::DependencyWirer;
