//! 使用宏声明的示例领域进行端到端容器测试

use di_abstractions::{ComponentRegistry, CrudRepository};
use di_impl::{BeanContainer, TypeCatalog, TypeInventory};
use infrastructure_common::{ContainerError, QueryError, TypeInfo};
use std::sync::Arc;

mod shop {
    use component_macros::{autowired, interface, repository, Component, Entity};
    use di_abstractions::{Autowired, CrudRepository};
    use infrastructure_common::QueryResult;
    use std::sync::Arc;

    #[derive(Debug, Clone, Entity)]
    #[table(name = "products")]
    pub struct Product {
        #[id]
        #[column(name = "ID")]
        pub id: Option<i32>,
        #[column(name = "NAME")]
        pub name: String,
        #[column(name = "PRICE")]
        pub price: f64,
    }

    #[derive(Debug, Clone, Entity)]
    #[table(name = "users")]
    pub struct User {
        #[id]
        #[column(name = "id")]
        pub id: i64,
        #[column(name = "username")]
        pub username: String,
    }

    #[repository]
    pub trait ProductRepository: CrudRepository<i32, Product> {
        fn find_by_name_and_price(&self, name: &str, price: f64) -> QueryResult<String>;

        fn find_by_price_greater_or_price_not_less(
            &self,
            max_price: f64,
            min_price: f64,
        ) -> QueryResult<String>;

        fn find_by_price_greater_or_equal_or_name_not_equal(
            &self,
            price: f64,
            name: &str,
        ) -> QueryResult<String>;
    }

    #[repository]
    pub trait UserRepository: CrudRepository<i64, User> {
        fn find_by_username(&self, username: &str) -> QueryResult<String>;
    }

    #[interface]
    pub trait Clock: Send + Sync {
        fn today(&self) -> &'static str;
    }

    #[derive(Default, Component)]
    #[component(implements(dyn Clock))]
    pub struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> &'static str {
            "2018-11-26"
        }
    }

    #[derive(Default, Component)]
    #[component(autowired)]
    pub struct ProductService {
        products: Autowired<dyn ProductRepository>,
        users: Autowired<dyn UserRepository>,
        clock: Autowired<dyn Clock>,
    }

    #[autowired]
    impl ProductService {
        #[autowire]
        pub fn set_product_repository(&self, repository: Arc<dyn ProductRepository>) {
            self.products.inject(repository);
        }

        #[autowire]
        pub fn set_user_repository(&self, repository: Arc<dyn UserRepository>) {
            self.users.inject(repository);
        }

        #[autowire]
        pub fn set_clock(&self, clock: Arc<dyn Clock>) {
            self.clock.inject(clock);
        }

        pub fn products(&self) -> &Arc<dyn ProductRepository> {
            self.products.get().expect("product repository is wired")
        }

        pub fn users(&self) -> &Arc<dyn UserRepository> {
            self.users.get().expect("user repository is wired")
        }

        pub fn clock(&self) -> &Arc<dyn Clock> {
            self.clock.get().expect("clock is wired")
        }
    }

    #[derive(Default, Component)]
    #[component(autowired)]
    pub struct AuditService {
        products: Autowired<dyn ProductRepository>,
        catalog: Autowired<ProductService>,
    }

    #[autowired]
    impl AuditService {
        #[autowire]
        pub fn set_products(&self, repository: Arc<dyn ProductRepository>) {
            self.products.inject(repository);
        }

        #[autowire]
        pub fn set_catalog(&self, service: Arc<ProductService>) {
            self.catalog.inject(service);
        }

        pub fn products(&self) -> &Arc<dyn ProductRepository> {
            self.products.get().expect("product repository is wired")
        }

        pub fn catalog(&self) -> &Arc<ProductService> {
            self.catalog.get().expect("product service is wired")
        }
    }
}

mod library {
    use chrono::NaiveDate;
    use component_macros::{autowired, repository, Component, Entity};
    use di_abstractions::{Autowired, CrudRepository};
    use infrastructure_common::QueryResult;
    use std::sync::Arc;

    #[derive(Debug, Clone, Entity)]
    #[table(name = "book")]
    pub struct Book {
        #[id]
        #[column(name = "id")]
        pub id: Option<i32>,
        #[column(name = "title")]
        pub title: String,
        #[column(name = "author_name")]
        pub author_name: String,
        #[column(name = "number_of_pages")]
        pub number_of_pages: Option<i32>,
        #[column(name = "publication_date")]
        pub publication_date: Option<NaiveDate>,
    }

    #[repository]
    pub trait BookRepository: CrudRepository<i32, Book> {
        fn find_by_title(&self, title: &str) -> QueryResult<String>;
        fn find_by_author_name(&self, author_name: &str) -> QueryResult<String>;
        fn find_by_publication_date(&self, date: NaiveDate) -> QueryResult<String>;
        fn find_by_title_and_author_name(&self, title: &str, author: &str) -> QueryResult<String>;
        fn find_by_number_of_pages_or_publication_date(
            &self,
            pages: i32,
            date: NaiveDate,
        ) -> QueryResult<String>;
        fn find_by_isbn(&self, isbn: &str) -> QueryResult<String>;
    }

    #[derive(Default, Component)]
    #[component(autowired)]
    pub struct BookService {
        books: Autowired<dyn BookRepository>,
    }

    #[autowired]
    impl BookService {
        #[autowire]
        pub fn set_book_repository(&self, repository: Arc<dyn BookRepository>) {
            self.books.inject(repository);
        }

        pub fn books(&self) -> &Arc<dyn BookRepository> {
            self.books.get().expect("book repository is wired")
        }
    }
}

use library::{Book, BookRepository, BookService};
use shop::{AuditService, Clock, Product, ProductRepository, ProductService, User, UserRepository};

fn namespace(module: &str) -> String {
    format!("{}::{}", module_path!(), module)
}

fn catalog_for(module: &str) -> TypeCatalog {
    TypeCatalog::new()
        .with_builtins()
        .scan_from(&TypeInventory, &namespace(module))
}

#[test]
fn test_inventory_contains_macro_declared_types() {
    let shop = TypeInventory::scan(&namespace("shop"));
    let names: Vec<&str> = shop.iter().map(|definition| definition.name()).collect();

    assert!(names.contains(&TypeInfo::of::<Product>().name.as_str()));
    assert!(names.contains(&TypeInfo::of::<dyn ProductRepository>().name.as_str()));
    assert!(names.contains(&TypeInfo::of::<ProductService>().name.as_str()));
    assert!(!names.contains(&TypeInfo::of::<Book>().name.as_str()));

    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn test_entity_descriptor_from_derive() {
    let product = Product {
        id: None,
        name: "car".to_string(),
        price: 15350.0,
    };
    let values: Vec<&str> = di_abstractions::Entity::field_values(&product)
        .iter()
        .map(|(field, _)| *field)
        .collect();
    assert_eq!(values, vec!["id", "name", "price"]);
}

#[test]
fn test_shop_sample_runs_through_container() {
    let context = BeanContainer::new(catalog_for("shop")).bootstrap().unwrap();
    let service = context.component::<ProductService>().unwrap();

    let car = Product {
        id: Some(1),
        name: "car".to_string(),
        price: 15350.0,
    };
    assert_eq!(
        service.products().save(&car).unwrap(),
        "UPDATE products SET ID = '1', NAME = 'car', PRICE = '15350.0' WHERE ID = '1'"
    );
    assert_eq!(
        service.products().save(&Product { id: None, ..car.clone() }).unwrap(),
        "INSERT INTO products (ID, NAME, PRICE) VALUES ('', 'car', '15350.0')"
    );
    assert_eq!(
        service.products().delete(1).unwrap(),
        "DELETE FROM products WHERE ID = '1'"
    );
    assert_eq!(
        service.products().find_by_name_and_price("car", 15350.0).unwrap(),
        "SELECT * FROM products WHERE NAME = 'car' AND PRICE = '15350.0'"
    );
    assert_eq!(
        service
            .products()
            .find_by_price_greater_or_price_not_less(10.5, 2.5)
            .unwrap(),
        "SELECT * FROM products WHERE PRICE > '10.5' OR NOT PRICE < '2.5'"
    );
    assert_eq!(
        service
            .products()
            .find_by_price_greater_or_equal_or_name_not_equal(100.0, "car")
            .unwrap(),
        "SELECT * FROM products WHERE PRICE >= '100.0' OR NAME <> 'car'"
    );

    let admin = User {
        id: 2,
        username: "admin".to_string(),
    };
    assert_eq!(
        service.users().save(&admin).unwrap(),
        "UPDATE users SET id = '2', username = 'admin' WHERE id = '2'"
    );
    assert_eq!(
        service.users().get_one(5).unwrap(),
        "SELECT * FROM users WHERE id = '5'"
    );
    assert_eq!(
        service.users().find_by_username("admin").unwrap(),
        "SELECT * FROM users WHERE username = 'admin'"
    );
    assert_eq!(service.clock().today(), "2018-11-26");
}

#[test]
fn test_repository_proxy_is_shared_between_consumers() {
    let context = BeanContainer::new(catalog_for("shop")).bootstrap().unwrap();

    let service = context.component::<ProductService>().unwrap();
    let audit = context.component::<AuditService>().unwrap();
    let direct = context.interface::<dyn ProductRepository>().unwrap();

    assert!(Arc::ptr_eq(service.products(), audit.products()));
    assert!(Arc::ptr_eq(service.products(), &direct));
    assert!(Arc::ptr_eq(audit.catalog(), &service));
}

#[test]
fn test_capability_lookup_for_plain_interface() {
    let context = BeanContainer::new(catalog_for("shop")).bootstrap().unwrap();

    let clock = context.interface::<dyn Clock>().unwrap();
    assert_eq!(clock.today(), "2018-11-26");
    assert!(context
        .registry()
        .contains(&TypeInfo::of::<dyn Clock>().name));
}

#[test]
fn test_book_sample_derived_queries() {
    let context = BeanContainer::new(catalog_for("library")).bootstrap().unwrap();
    let books = context.component::<BookService>().unwrap().books().clone();
    let first = chrono::NaiveDate::from_ymd_opt(2018, 11, 26).unwrap();
    let second = chrono::NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();

    assert_eq!(
        books.find_by_title("test title").unwrap(),
        "SELECT * FROM book WHERE title = 'test title'"
    );
    assert_eq!(
        books.find_by_author_name("some author").unwrap(),
        "SELECT * FROM book WHERE author_name = 'some author'"
    );
    assert_eq!(
        books.find_by_publication_date(first).unwrap(),
        "SELECT * FROM book WHERE publication_date = '2018-11-26'"
    );
    assert_eq!(
        books
            .find_by_title_and_author_name("new title", "other author")
            .unwrap(),
        "SELECT * FROM book WHERE title = 'new title' AND author_name = 'other author'"
    );
    assert_eq!(
        books
            .find_by_number_of_pages_or_publication_date(321, second)
            .unwrap(),
        "SELECT * FROM book WHERE number_of_pages = '321' OR publication_date = '2018-01-01'"
    );
    assert!(matches!(
        books.find_by_isbn("978"),
        Err(QueryError::UnknownField { .. })
    ));
    assert_eq!(books.list_all().unwrap(), "SELECT * FROM book");
}

#[test]
fn test_missing_builtins_fail_bootstrap() {
    let catalog = TypeCatalog::new()
        .register::<dyn CrudRepository<(), ()>>()
        .scan_from(&TypeInventory, &namespace("library"));

    let error = BeanContainer::new(catalog).bootstrap().unwrap_err();
    assert!(matches!(error, ContainerError::ImplementationNotFound { .. }));
}

#[test]
fn test_unscanned_dependency_is_unsatisfied() {
    // 只扫描服务本身，依赖的仓储接口不在目录中
    let catalog = TypeCatalog::new()
        .with_builtins()
        .register::<BookService>();

    match BeanContainer::new(catalog).bootstrap() {
        Err(ContainerError::UnsatisfiedDependency { dependency, .. }) => {
            assert_eq!(dependency, TypeInfo::of::<dyn BookRepository>().name);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups_share_lazily_built_proxy() {
    let catalog = TypeCatalog::new()
        .with_builtins()
        .register::<User>()
        .register::<dyn UserRepository>();
    let context = Arc::new(BeanContainer::new(catalog).bootstrap().unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let context = Arc::clone(&context);
            tokio::task::spawn_blocking(move || context.interface::<dyn UserRepository>().unwrap())
        })
        .collect();

    let mut repositories = Vec::new();
    for handle in handles {
        repositories.push(handle.await.unwrap());
    }
    assert!(repositories
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
