use component_macros::{repository, Entity};
use di_abstractions::{CrudRepository, Registrable};
use infrastructure_common::QueryResult;

#[derive(Clone, Entity)]
#[table(name = "users")]
pub struct User {
    #[id]
    #[column(name = "id")]
    pub id: i64,
    #[column(name = "username")]
    pub username: String,
}

#[repository]
pub trait UserRepository: CrudRepository<i64, User> {
    fn find_by_username(&self, username: &str) -> QueryResult<String>;
}

#[repository(id = i64, entity = User)]
pub trait AdminRepository: UserRepository {
    fn find_by_username_not_equal(&self, username: &str) -> QueryResult<String>;
}

fn main() {
    let definition = <dyn AdminRepository>::type_definition();
    assert!(definition.proxy_factory.is_some());
    assert_eq!(definition.descriptor.type_arguments.len(), 2);
}
