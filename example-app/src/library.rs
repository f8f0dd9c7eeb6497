//! 图书示例：蛇形列名与日期参数

use chrono::NaiveDate;
use component_macros::{autowired, repository, Component, Entity};
use di_abstractions::{Autowired, CrudRepository};
use infrastructure_common::{QueryError, QueryResult};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Entity)]
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
    fn find_by_number_of_pages(&self, number_of_pages: i32) -> QueryResult<String>;
    fn find_by_publication_date(&self, publication_date: NaiveDate) -> QueryResult<String>;
    fn find_by_title_and_author_name(&self, title: &str, author_name: &str)
        -> QueryResult<String>;
    fn find_by_number_of_pages_or_publication_date(
        &self,
        number_of_pages: i32,
        publication_date: NaiveDate,
    ) -> QueryResult<String>;
}

#[derive(Debug, Default, Component)]
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

    /// 依次执行全部派生查询，返回生成的语句
    pub fn run_all(&self) -> QueryResult<Vec<String>> {
        let books = self.books.get().ok_or(QueryError::Unbound)?;
        let first_date = sample_date(2018, 11, 26)?;
        let second_date = sample_date(2018, 1, 1)?;

        Ok(vec![
            books.find_by_title("test title")?,
            books.find_by_author_name("some author")?,
            books.find_by_number_of_pages(123)?,
            books.find_by_publication_date(first_date)?,
            books.find_by_title_and_author_name("new title", "other author")?,
            books.find_by_number_of_pages_or_publication_date(321, second_date)?,
        ])
    }
}

fn sample_date(year: i32, month: u32, day: u32) -> QueryResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| QueryError::invalid_argument(format!("日期无效: {}-{}-{}", year, month, day)))
}
