use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::filter::BookFilter;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

#[derive(Debug, Default)]
struct Shelf {
    last_id: i64,
    books: BTreeMap<i64, BookEntity>,
}

// MemoryBookRepository keeps books in process, ordered by identifier. Clones share
// the same shelf so a test can keep a handle next to the service that owns the store.
#[derive(Debug, Clone)]
pub struct MemoryBookRepository {
    shelf: Arc<RwLock<Shelf>>,
    strict_updates: bool,
}

impl MemoryBookRepository {
    pub fn new(strict_updates: bool) -> Self {
        Self {
            shelf: Arc::new(RwLock::new(Shelf::default())),
            strict_updates,
        }
    }

    pub fn len(&self) -> usize {
        self.shelf.read().map(|shelf| shelf.books.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn page(records: Vec<BookEntity>, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let offset = match page {
            Some(token) => token.parse::<usize>().map_err(|_| {
                LibraryError::validation(format!("invalid page token {}", token).as_str(), None)
            })?,
            None => 0,
        };
        let page_size = page_size.max(1);
        let total = records.len();
        let records: Vec<BookEntity> = records.into_iter().skip(offset).take(page_size).collect();
        let next_page = if offset + page_size < total { Some((offset + page_size).to_string()) } else { None };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

fn poisoned<T>(_: T) -> LibraryError {
    LibraryError::runtime("memory shelf lock poisoned", None)
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut shelf = self.shelf.write().map_err(poisoned)?;
        let next_id = shelf.last_id.checked_add(1)
            .ok_or_else(|| LibraryError::runtime("book identifiers are exhausted", None))?;
        shelf.last_id = next_id;
        let stored = entity.with_id(next_id);
        shelf.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut shelf = self.shelf.write().map_err(poisoned)?;
        if self.strict_updates && !shelf.books.contains_key(&entity.id) {
            return Err(LibraryError::not_found(format!("book not found for {}", entity.id).as_str()));
        }
        shelf.last_id = shelf.last_id.max(entity.id);
        shelf.books.insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        let shelf = self.shelf.read().map_err(poisoned)?;
        shelf.books.get(&id).cloned()
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }

    async fn delete(&self, id: i64) -> LibraryResult<usize> {
        let mut shelf = self.shelf.write().map_err(poisoned)?;
        Ok(shelf.books.remove(&id).map(|_| 1).unwrap_or(0))
    }

    async fn find_all(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = {
            let shelf = self.shelf.read().map_err(poisoned)?;
            shelf.books.values().cloned().collect()
        };
        Self::page(records, page, page_size)
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_example(&self, filter: &BookFilter, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = {
            let shelf = self.shelf.read().map_err(poisoned)?;
            shelf.books.values().filter(|b| filter.matches(*b)).cloned().collect()
        };
        Self::page(records, page, page_size)
    }
}
