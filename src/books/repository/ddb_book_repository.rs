use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use crate::books::domain::model::BookEntity;
use crate::books::filter::BookFilter;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, number, opt_string_date, parse_date_attribute, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

const BOOKS_SEQUENCE: &str = "books";

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    sequence_table: String,
    strict_updates: bool,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, sequence_table: &str, strict_updates: bool) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            sequence_table: sequence_table.to_string(),
            strict_updates,
        }
    }

    // DynamoDB has no auto-increment keys, identifiers come from an atomic counter item
    async fn next_id(&self) -> LibraryResult<i64> {
        let table_name: &str = self.sequence_table.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("name", AttributeValue::S(BOOKS_SEQUENCE.to_string()))
            .update_expression("ADD next_val :one")
            .expression_attribute_values(":one", number(1))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await.map_err(LibraryError::from).and_then(|out| {
            out.attributes()
                .map(|attrs| parse_number_attribute("next_val", attrs))
                .filter(|id| *id > 0)
                .ok_or_else(|| LibraryError::database("sequence did not return next value", None, false))
        })
    }

    // An upsert may store an id the counter has not handed out yet. Raising the
    // counter first keeps later creates from drawing that id.
    async fn raise_sequence(&self, id: i64) -> LibraryResult<()> {
        let table_name: &str = self.sequence_table.as_ref();
        let res = self.client
            .update_item()
            .table_name(table_name)
            .key("name", AttributeValue::S(BOOKS_SEQUENCE.to_string()))
            .update_expression("SET next_val = :id")
            .condition_expression("attribute_not_exists(next_val) OR next_val < :id")
            .expression_attribute_values(":id", number(id))
            .send()
            .await;
        match res {
            Ok(_) => Ok(()),
            Err(err) if is_update_conditional_failure(&err) => Ok(()),
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn scan(&self, filter: Option<&BookFilter>, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page)?;
        let mut request = self.client
            .scan()
            .table_name(table_name)
            .consistent_read(true)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size, 500) as i32);

        if let Some(filter) = filter {
            let mut filter_expr = String::new();
            for (k, v) in filter.text_constraints() {
                let (name, value) = add_filter_expr(k, &mut filter_expr);
                request = request
                    .expression_attribute_names(name, k)
                    .expression_attribute_values(value, AttributeValue::S(v.to_string()));
            }
            for (k, v) in filter.number_constraints() {
                let (name, value) = add_filter_expr(k, &mut filter_expr);
                request = request
                    .expression_attribute_names(name, k)
                    .expression_attribute_values(value, number(v));
            }
            if let Some(created_at) = filter.created_at {
                let (name, value) = add_filter_expr("created_at", &mut filter_expr);
                request = request
                    .expression_attribute_names(name, "created_at")
                    .expression_attribute_values(value, string_date(created_at));
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
        }

        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items().unwrap_or_default().iter()
                .map(map_to_book).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let stored = entity.with_id(self.next_id().await?);
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(id)")
            .set_item(Some(book_to_item(&stored)))
            .send()
            .await.map_err(|err| {
            if is_conditional_failure(&err) {
                LibraryError::duplicate_key(format!("book already exists for {}", stored.id).as_str())
            } else {
                LibraryError::from(err)
            }
        })?;
        Ok(stored)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        if !self.strict_updates {
            self.raise_sequence(entity.id).await?;
        }
        let mut request = self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(book_to_item(entity)));
        if self.strict_updates {
            request = request.condition_expression("attribute_exists(id)");
        }
        request
            .send()
            .await.map_err(|err| {
            if is_conditional_failure(&err) {
                LibraryError::not_found(format!("book not found for {}", entity.id).as_str())
            } else {
                LibraryError::from(err)
            }
        })?;
        Ok(entity.clone())
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("id", number(id))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            req.item()
                .map(map_to_book)
                .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
        })
    }

    async fn delete(&self, id: i64) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("id", number(id))
            .return_values(ReturnValue::AllOld)
            .send()
            .await.map_err(LibraryError::from)
            .map(|out| if out.attributes().is_some() { 1 } else { 0 })
    }

    async fn find_all(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.scan(None, page, page_size).await
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn find_by_example(&self, filter: &BookFilter, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.scan(Some(filter), page, page_size).await
    }
}

fn is_conditional_failure(err: &SdkError<PutItemError>) -> bool {
    matches!(err, SdkError::ServiceError(ctx) if ctx.err().is_conditional_check_failed_exception())
}

fn is_update_conditional_failure(err: &SdkError<UpdateItemError>) -> bool {
    matches!(err, SdkError::ServiceError(ctx) if ctx.err().is_conditional_check_failed_exception())
}

fn book_to_item(book: &BookEntity) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), number(book.id)),
        ("title".to_string(), AttributeValue::S(book.title.to_string())),
        ("author".to_string(), AttributeValue::S(book.author.to_string())),
        ("publisher".to_string(), AttributeValue::S(book.publisher.to_string())),
        ("publish_year".to_string(), number(book.publish_year)),
        ("created_at".to_string(), opt_string_date(book.created_at)),
        ("count".to_string(), number(book.count)),
    ])
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        id: parse_number_attribute("id", map),
        title: parse_string_attribute("title", map).unwrap_or_default(),
        author: parse_string_attribute("author", map).unwrap_or_default(),
        publisher: parse_string_attribute("publisher", map).unwrap_or_default(),
        publish_year: parse_number_attribute("publish_year", map),
        created_at: parse_date_attribute("created_at", map),
        count: parse_number_attribute("count", map),
    }
}
