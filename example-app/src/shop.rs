//! 商品示例：商品与用户两个实体，共用一个服务

use component_macros::{autowired, repository, Component, Entity};
use di_abstractions::{Autowired, CrudRepository};
use infrastructure_common::{QueryError, QueryResult};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Entity)]
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

#[derive(Debug, Clone, Default, Entity)]
#[table(name = "users")]
pub struct User {
    #[id]
    #[column(name = "id")]
    pub id: Option<i64>,
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
pub trait UserRepository: CrudRepository<i64, User> {}

#[derive(Debug, Default, Component)]
#[component(autowired)]
pub struct ProductService {
    products: Autowired<dyn ProductRepository>,
    users: Autowired<dyn UserRepository>,
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

    fn products(&self) -> QueryResult<&Arc<dyn ProductRepository>> {
        self.products.get().ok_or(QueryError::Unbound)
    }

    fn users(&self) -> QueryResult<&Arc<dyn UserRepository>> {
        self.users.get().ok_or(QueryError::Unbound)
    }

    pub fn save_product(&self, product: &Product) -> QueryResult<String> {
        self.products()?.save(product)
    }

    pub fn delete_product(&self, product: &Product) -> QueryResult<String> {
        let id = product
            .id
            .ok_or_else(|| QueryError::invalid_argument(format!("商品 '{}' 没有主键", product.name)))?;
        self.products()?.delete(id)
    }

    pub fn find_products_by_name_and_price(&self, name: &str, price: f64) -> QueryResult<String> {
        self.products()?.find_by_name_and_price(name, price)
    }

    pub fn find_products_in_range(&self, max_price: f64, min_price: f64) -> QueryResult<String> {
        self.products()?
            .find_by_price_greater_or_price_not_less(max_price, min_price)
    }

    pub fn find_products_excluding(&self, price: f64, name: &str) -> QueryResult<String> {
        self.products()?
            .find_by_price_greater_or_equal_or_name_not_equal(price, name)
    }

    pub fn save_user(&self, user: &User) -> QueryResult<String> {
        self.users()?.save(user)
    }

    pub fn get_user(&self, id: i64) -> QueryResult<String> {
        self.users()?.get_one(id)
    }
}
