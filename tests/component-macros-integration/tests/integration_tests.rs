//! 宏展开结果的集成测试

use component_macros::{autowired, interface, repository, Component, Entity};
use di_abstractions::{
    component_bean, downcast_interface, Autowired, CrudRepository, Entity as _, Registrable,
};
use di_impl::{RepositoryProxy, SqlCrudRepository};
use infrastructure_common::{QueryResult, Tag, TypeInfo, TypeKind, Value};
use query_compiler::EntityMetadata;
use std::sync::Arc;

#[derive(Debug, Clone, Entity)]
#[table(name = "products")]
pub struct Product {
    #[id]
    #[column(name = "ID")]
    pub id: Option<i64>,
    #[column(name = "NAME")]
    pub name: String,
    #[column(name = "PRICE")]
    pub price: f64,
    pub note: String,
}

#[derive(Debug, Clone, Entity)]
pub struct Orphan {
    #[id]
    #[column]
    pub id: i64,
}

#[repository]
pub trait ProductRepository: CrudRepository<i64, Product> {
    fn find_by_price_greater(&self, price: f64) -> QueryResult<String>;

    fn find_by_name_or_price_less(&self, name: &str, price: f64) -> QueryResult<String>;

    fn find_cheap(&self) -> QueryResult<String> {
        self.find_by_price_greater(0.0)
    }
}

#[interface]
pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

#[derive(Default, Component)]
#[component(implements(dyn Greeter))]
pub struct PoliteGreeter;

impl Greeter for PoliteGreeter {
    fn greet(&self, name: &str) -> String {
        format!("hello, {}", name)
    }
}

#[derive(Default, Component)]
#[component(autowired)]
pub struct Storefront {
    greeter: Autowired<dyn Greeter>,
    products: Autowired<dyn ProductRepository>,
}

#[autowired]
impl Storefront {
    #[autowire]
    pub fn set_greeter(&self, greeter: Arc<dyn Greeter>) {
        self.greeter.inject(greeter);
    }

    #[autowire]
    pub fn set_products(&self, products: Arc<dyn ProductRepository>) {
        self.products.inject(products);
    }

    pub fn is_ready(&self) -> bool {
        self.greeter.is_injected() && self.products.is_injected()
    }
}

fn product_metadata() -> Arc<EntityMetadata> {
    Arc::new(EntityMetadata::resolve(&Product::type_definition().descriptor).unwrap())
}

fn product_proxy() -> RepositoryProxy<i64, Product> {
    let metadata = product_metadata();
    RepositoryProxy::new(
        Arc::new(SqlCrudRepository::with_metadata(metadata.clone())),
        metadata,
    )
}

#[test]
fn test_entity_descriptor() {
    let definition = Product::type_definition();
    let descriptor = &definition.descriptor;

    assert_eq!(descriptor.kind, TypeKind::Concrete);
    assert_eq!(descriptor.table_name(), Some("products"));
    assert_eq!(descriptor.fields.len(), 4);
    assert!(descriptor.fields[0].is_id());
    assert_eq!(descriptor.fields[2].column_name(), Some("PRICE"));
    assert_eq!(descriptor.fields[3].column_name(), None);
    assert!(definition.constructor.is_none());
}

#[test]
fn test_entity_field_values_skip_unmapped_fields() {
    let product = Product {
        id: None,
        name: "car".to_string(),
        price: 15350.0,
        note: "ignored".to_string(),
    };

    let values = product.field_values();
    assert_eq!(
        values,
        vec![
            ("id", Value::Null),
            ("name", Value::Text("car".to_string())),
            ("price", Value::Float(15350.0)),
        ]
    );
}

#[test]
fn test_entity_without_table_has_no_table_tag() {
    let descriptor = Orphan::type_definition().descriptor;
    assert_eq!(descriptor.table_name(), None);
    // 省略列名时使用字段名
    assert_eq!(descriptor.fields[0].column_name(), Some("id"));
    assert!(EntityMetadata::resolve(&descriptor).is_err());
}

#[test]
fn test_repository_descriptor() {
    let definition = <dyn ProductRepository>::type_definition();
    let descriptor = &definition.descriptor;

    assert!(descriptor.is_interface());
    assert!(!descriptor.is_repository());
    assert!(descriptor.declares_interface(&di_abstractions::crud_repository_info().name));
    assert_eq!(
        descriptor.type_arguments,
        vec![TypeInfo::of::<i64>(), TypeInfo::of::<Product>()]
    );
    assert!(definition.proxy_factory.is_some());
}

#[test]
fn test_proxy_factory_produces_interface_bean() {
    let definition = <dyn ProductRepository>::type_definition();
    let metadata = product_metadata();
    let factory = definition.proxy_factory.unwrap();

    let bean = factory(
        Arc::new(SqlCrudRepository::with_metadata(metadata.clone())),
        metadata,
    );
    let repository = downcast_interface::<dyn ProductRepository>(&bean).unwrap();
    assert_eq!(
        repository.find_by_price_greater(100.0).unwrap(),
        "SELECT * FROM products WHERE PRICE > '100.0'"
    );
}

#[test]
fn test_repository_methods_dispatch_by_camel_case_name() {
    let proxy = product_proxy();

    assert_eq!(
        proxy.find_by_name_or_price_less("car", 10.5).unwrap(),
        "SELECT * FROM products WHERE NAME = 'car' OR PRICE < '10.5'"
    );
    // 默认方法不经过代理
    assert_eq!(
        proxy.find_cheap().unwrap(),
        "SELECT * FROM products WHERE PRICE > '0.0'"
    );
    assert_eq!(
        proxy.get_one(7).unwrap(),
        "SELECT * FROM products WHERE ID = '7'"
    );
}

#[test]
fn test_interface_descriptor() {
    let descriptor = <dyn Greeter>::type_definition().descriptor;
    assert!(descriptor.is_interface());
    assert!(descriptor.tags.is_empty());
    assert_eq!(descriptor.info, TypeInfo::of::<dyn Greeter>());
}

#[test]
fn test_component_casts_to_declared_interface() {
    let definition = PoliteGreeter::type_definition();
    let interface = TypeInfo::of::<dyn Greeter>();

    assert!(definition.descriptor.is_component());
    assert!(definition.descriptor.declares_interface(&interface.name));
    assert!(definition.can_cast_to(&interface.name));

    let bean = definition.instantiate().unwrap();
    let cast = definition.cast_to(&interface.name, &bean).unwrap();
    let greeter = downcast_interface::<dyn Greeter>(&cast).unwrap();
    assert_eq!(greeter.greet("ann"), "hello, ann");
}

#[test]
fn test_autowired_injection_points() {
    let definition = Storefront::type_definition();
    let methods: Vec<_> = definition.descriptor.autowire_methods().collect();

    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].name, "set_greeter");
    assert_eq!(methods[0].parameters, vec![TypeInfo::of::<dyn Greeter>()]);
    assert!(methods[1].tags.contains(&Tag::Autowire));
    assert!(definition.injector("is_ready").is_none());
}

#[test]
fn test_injectors_set_dependencies() {
    let definition = Storefront::type_definition();
    let bean = definition.instantiate().unwrap();

    let greeter: Arc<dyn Greeter> = Arc::new(PoliteGreeter);
    let products: Arc<dyn ProductRepository> = Arc::new(product_proxy());

    let inject_greeter = definition.injector("set_greeter").unwrap();
    inject_greeter(&bean, di_abstractions::interface_bean(greeter)).unwrap();
    let inject_products = definition.injector("set_products").unwrap();
    inject_products(&bean, di_abstractions::interface_bean(products)).unwrap();

    let storefront = di_abstractions::downcast_component::<Storefront>(&bean).unwrap();
    assert!(storefront.is_ready());
}

#[test]
fn test_injector_rejects_wrong_dependency_type() {
    let definition = Storefront::type_definition();
    let bean = definition.instantiate().unwrap();
    let inject_greeter = definition.injector("set_greeter").unwrap();

    let wrong = component_bean(Arc::new(PoliteGreeter));
    assert!(inject_greeter(&bean, wrong).is_err());
}
