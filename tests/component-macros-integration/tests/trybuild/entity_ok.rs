use component_macros::Entity;
use di_abstractions::{Entity as _, Registrable};

#[derive(Clone, Entity)]
#[table(name = "book")]
struct Book {
    #[id]
    #[column]
    id: Option<i32>,
    #[column(name = "title")]
    title: String,
    cached: bool,
}

fn main() {
    let book = Book {
        id: None,
        title: "Dune".to_string(),
        cached: false,
    };
    assert!(!book.cached);
    assert_eq!(book.field_values().len(), 2);
    assert_eq!(Book::type_definition().descriptor.table_name(), Some("book"));
}
