use async_trait::async_trait;
use tracing::{debug, warn};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::filter::{BookFilter, BookSort};
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::events::ChangeEvent;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, REASON_ID_EXISTS, REASON_ID_NULL};
use crate::gateway::events::EventPublisher;

// upper bound on pages read for a single listing
const MAX_PAGES: usize = 10_000;

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    events_publisher: Box<dyn EventPublisher>,
    destination: String,
    page_size: usize,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            book_repository,
            events_publisher,
            destination: config.destination.to_string(),
            page_size: config.page_size,
        }
    }

    // Notifications are best effort: the write already happened and is not rolled
    // back, so a failed publish is logged and dropped instead of failing the call.
    async fn notify(&self, event: ChangeEvent) {
        if let Err(err) = self.events_publisher.publish(self.destination.as_str(), &event).await {
            warn!(destination = self.destination.as_str(), change_type = %event.change_type,
                book_id = event.key().as_str(), error = %err, "dropping change notification");
        }
    }

    async fn collect<F, Fut>(&self, mut fetch: F) -> LibraryResult<Vec<BookDto>>
        where F: FnMut(Option<String>) -> Fut,
              Fut: std::future::Future<Output=LibraryResult<PaginatedResult<BookEntity>>> {
        let mut books = vec![];
        let mut next_page: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let res = fetch(next_page.take()).await?;
            books.extend(res.records.iter().map(BookDto::from));
            match res.next_page {
                Some(page) => next_page = Some(page),
                None => return Ok(books),
            }
        }
        Err(LibraryError::runtime(format!("listing exceeded {} pages", MAX_PAGES).as_str(), None))
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        if book.id().is_some() {
            return Err(LibraryError::validation("A new book cannot already have an ID", Some(REASON_ID_EXISTS.to_string())));
        }
        let stored = self.book_repository.create(&BookEntity::from(book)).await.map(|b| BookDto::from(&b))?;
        debug!(book_id = ?stored.id, "book created");
        self.notify(ChangeEvent::created(&stored)).await;
        Ok(stored)
    }

    async fn remove_book(&self, id: i64) -> LibraryResult<()> {
        let removed = self.book_repository.delete(id).await?;
        debug!(book_id = id, removed, "book removed");
        self.notify(ChangeEvent::deleted(id)).await;
        Ok(())
    }

    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        if book.id().is_none() {
            return Err(LibraryError::validation("Invalid id", Some(REASON_ID_NULL.to_string())));
        }
        let stored = self.book_repository.update(&BookEntity::from(book)).await.map(|b| BookDto::from(&b))?;
        debug!(book_id = ?stored.id, "book updated");
        // the event reflects what the caller sent
        self.notify(ChangeEvent::updated(book)).await;
        Ok(stored)
    }

    async fn find_book_by_id(&self, id: i64) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn find_books(&self, sort: Option<&BookSort>) -> LibraryResult<Vec<BookDto>> {
        let page_size = self.page_size;
        let repo = &self.book_repository;
        let mut books = self.collect(|page| async move {
            repo.find_all(page.as_deref(), page_size).await
        }).await?;
        if let Some(sort) = sort {
            sort.apply(&mut books);
        }
        Ok(books)
    }

    async fn find_books_by_example(&self, filter: &BookFilter) -> LibraryResult<Vec<BookDto>> {
        let page_size = self.page_size;
        let repo = &self.book_repository;
        self.collect(|page| async move {
            repo.find_by_example(filter, page.as_deref(), page_size).await
        }).await
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: Some(other.id),
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            publish_year: other.publish_year,
            created_at: other.created_at,
            count: other.count,
        }
    }
}

// books without an identifier map to a placeholder that the store replaces on create
impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            id: other.id.unwrap_or_default(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            publish_year: other.publish_year,
            created_at: other.created_at,
            count: other.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use crate::books::domain::model::BookEntity;
    use crate::books::dto::BookDto;
    use crate::books::filter::{BookFilter, BookSort};
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::domain::{Configuration, DEFAULT_DESTINATION};
    use crate::core::events::{ChangeEvent, ChangeType};
    use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, REASON_ID_EXISTS, REASON_ID_NULL};
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::gateway::events::EventPublisher;
    use crate::gateway::memory::publisher::MemoryPublisher;

    struct Fixture {
        svc: CatalogServiceImpl,
        books: MemoryBookRepository,
        events: MemoryPublisher,
    }

    async fn fixture(strict_updates: bool) -> Fixture {
        let mut config = Configuration::new("test", RepositoryStore::Memory);
        config.strict_updates = strict_updates;
        config.page_size = 3;
        let books = MemoryBookRepository::new(strict_updates);
        let events = MemoryPublisher::new();
        let _ = events.create_topic(DEFAULT_DESTINATION).await.expect("should create topic");
        let svc = CatalogServiceImpl::new(&config, Box::new(books.clone()), Box::new(events.clone()));
        Fixture { svc, books, events }
    }

    fn default_book() -> BookDto {
        BookDto::new("AAAAAAAAAA", "AAAAAAAAAA", "AAAAAAAAAA", 1, 1)
            .with_created_at(NaiveDateTime::from_timestamp_opt(0, 0).expect("epoch"))
    }

    fn war_and_peace() -> BookDto {
        BookDto::new("War and Peace", "Leo Tolstoy", "The Russian Messenger", 1869, 2)
    }

    fn hitchhikers_guide() -> BookDto {
        BookDto::new("The Hitchhiker's Guide to the Galaxy", "Douglas Adams", "Megadodo Publications", 1978, 2)
    }

    #[tokio::test]
    async fn test_should_add_book() {
        let f = fixture(true).await;
        let book = default_book();
        let stored = f.svc.add_book(&book).await.expect("should add book");
        assert!(stored.id.is_some());
        assert_eq!(BookDto { id: stored.id, ..book }, stored);
        assert_eq!(1, f.books.len());

        assert_eq!(vec![(DEFAULT_DESTINATION.to_string(), ChangeEvent::created(&stored))], f.events.published());
    }

    #[tokio::test]
    async fn test_should_reject_new_book_with_id() {
        let f = fixture(true).await;
        let mut book = default_book();
        book.id = Some(1);
        let res = f.svc.add_book(&book).await;
        assert!(matches!(&res, Err(LibraryError::Validation { .. })));
        assert_eq!(Some(REASON_ID_EXISTS), res.unwrap_err().reason_code());
        assert!(f.books.is_empty());
        assert!(f.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_should_update_book() {
        let f = fixture(true).await;
        let stored = f.svc.add_book(&default_book()).await.expect("should add book");

        let updated = BookDto {
            id: stored.id,
            ..BookDto::new("BBBBBBBBBB", "BBBBBBBBBB", "BBBBBBBBBB", 2, 2)
        };
        let res = f.svc.update_book(&updated).await.expect("should update book");
        assert_eq!(updated, res);
        assert_eq!(1, f.books.len());

        let id = stored.id.expect("stored book has id");
        let loaded = f.svc.find_book_by_id(id).await.expect("should return book");
        assert_eq!(updated, loaded);

        let events = f.events.events();
        assert_eq!(2, events.len());
        assert_eq!(ChangeEvent::updated(&updated), events[1]);
    }

    #[tokio::test]
    async fn test_should_reject_update_without_id() {
        let f = fixture(true).await;
        let res = f.svc.update_book(&default_book()).await;
        assert_eq!(Some(REASON_ID_NULL), res.expect_err("should fail").reason_code());
        assert!(f.books.is_empty());
        assert!(f.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_update_of_unknown_book_when_strict() {
        let f = fixture(true).await;
        let book = BookDto { id: Some(404), ..default_book() };
        let res = f.svc.update_book(&book).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert!(f.books.is_empty());
        assert!(f.events.events().is_empty());
    }

    #[tokio::test]
    async fn test_should_upsert_unknown_book_when_lenient() {
        let f = fixture(false).await;
        let book = BookDto { id: Some(404), ..default_book() };
        let _ = f.svc.update_book(&book).await.expect("should upsert book");
        assert_eq!(book, f.svc.find_book_by_id(404).await.expect("should return book"));
        assert_eq!(vec![ChangeEvent::updated(&book)], f.events.events());
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let f = fixture(true).await;
        let stored = f.svc.add_book(&default_book()).await.expect("should add book");
        let id = stored.id.expect("stored book has id");

        f.svc.remove_book(id).await.expect("should remove book");
        assert!(matches!(f.svc.find_book_by_id(id).await, Err(LibraryError::NotFound { .. })));

        let events = f.events.events();
        assert_eq!(2, events.len());
        assert_eq!(ChangeType::Delete, events[1].change_type);
        assert_eq!(BookDto::with_id_only(id), events[1].changed_book);
    }

    #[tokio::test]
    async fn test_should_remove_book_twice() {
        let f = fixture(true).await;
        let stored = f.svc.add_book(&default_book()).await.expect("should add book");
        let _ = f.svc.add_book(&war_and_peace()).await.expect("should add book");
        let id = stored.id.expect("stored book has id");

        f.svc.remove_book(id).await.expect("should remove book");
        f.svc.remove_book(id).await.expect("should remove absent book");
        assert_eq!(1, f.books.len());

        let deletions: Vec<ChangeEvent> = f.events.events().into_iter()
            .filter(|e| e.change_type == ChangeType::Delete).collect();
        assert_eq!(vec![ChangeEvent::deleted(id), ChangeEvent::deleted(id)], deletions);
    }

    #[tokio::test]
    async fn test_should_not_find_unknown_book() {
        let f = fixture(true).await;
        assert!(matches!(f.svc.find_book_by_id(i64::MAX).await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_find_all_books_across_pages() {
        let f = fixture(true).await;
        for i in 0..7 {
            let _ = f.svc.add_book(&BookDto::new(format!("title_{}", i).as_str(), "author", "publisher", 2000 + i, i))
                .await.expect("should add book");
        }
        let books = f.svc.find_books(None).await.expect("should return books");
        assert_eq!(7, books.len());

        let sort = BookSort::parse("id,desc").expect("sort");
        let books = f.svc.find_books(Some(&sort)).await.expect("should return books");
        assert_eq!(Some(7), books[0].id);
        assert_eq!(Some(1), books[6].id);
    }

    #[tokio::test]
    async fn test_should_find_books_by_example() {
        let f = fixture(true).await;
        let _ = f.svc.add_book(&war_and_peace()).await.expect("should add book");
        let _ = f.svc.add_book(&hitchhikers_guide()).await.expect("should add book");

        let res = f.svc.find_books_by_example(&BookFilter::new().title("War and Peace").author("Leo Tolstoy"))
            .await.expect("should return books");
        assert_eq!(1, res.len());
        assert_eq!("Leo Tolstoy", res[0].author.as_str());

        let res = f.svc.find_books_by_example(&BookFilter::new().count(2)).await.expect("should return books");
        assert_eq!(2, res.len());

        let res = f.svc.find_books_by_example(&BookFilter::new().title("NON_EXISTING")).await.expect("should return books");
        assert!(res.is_empty());
    }

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn create_topic(&self, topic: &str) -> Result<String, LibraryError> {
            Ok(topic.to_string())
        }

        async fn get_topics(&self) -> Result<Vec<String>, LibraryError> {
            Ok(vec![])
        }

        async fn publish(&self, _destination: &str, _event: &ChangeEvent) -> Result<(), LibraryError> {
            Err(LibraryError::runtime("broker unavailable", None))
        }
    }

    #[tokio::test]
    async fn test_should_keep_mutation_when_notification_fails() {
        let config = Configuration::new("test", RepositoryStore::Memory);
        let books = MemoryBookRepository::new(true);
        let svc = CatalogServiceImpl::new(&config, Box::new(books.clone()), Box::new(FailingPublisher));

        let mut stored = svc.add_book(&default_book()).await.expect("should add book despite publisher");
        stored.count = 9;
        let _ = svc.update_book(&stored).await.expect("should update book despite publisher");
        assert_eq!(9, books.get(stored.id.expect("id")).await.expect("should return book").count);
        svc.remove_book(stored.id.expect("id")).await.expect("should remove book despite publisher");
        assert!(books.is_empty());
    }

    struct FailingRepository;

    #[async_trait]
    impl Repository<BookEntity> for FailingRepository {
        async fn create(&self, _entity: &BookEntity) -> LibraryResult<BookEntity> {
            Err(LibraryError::database("disk full", None, false))
        }

        async fn update(&self, _entity: &BookEntity) -> LibraryResult<BookEntity> {
            Err(LibraryError::database("disk full", None, false))
        }

        async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
            Err(LibraryError::not_found(format!("book not found for {}", id).as_str()))
        }

        async fn delete(&self, _id: i64) -> LibraryResult<usize> {
            Err(LibraryError::unavailable("throttled", None, true))
        }

        async fn find_all(&self, _page: Option<&str>, _page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
            Err(LibraryError::unavailable("throttled", None, true))
        }
    }

    #[async_trait]
    impl BookRepository for FailingRepository {
        async fn find_by_example(&self, _filter: &BookFilter, _page: Option<&str>, _page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
            Err(LibraryError::unavailable("throttled", None, true))
        }
    }

    #[tokio::test]
    async fn test_should_not_notify_when_store_fails() {
        let config = Configuration::new("test", RepositoryStore::Memory);
        let events = MemoryPublisher::new();
        let _ = events.create_topic(DEFAULT_DESTINATION).await.expect("should create topic");
        let svc = CatalogServiceImpl::new(&config, Box::new(FailingRepository), Box::new(events.clone()));

        assert!(matches!(svc.add_book(&default_book()).await, Err(LibraryError::Database { .. })));
        let book = BookDto { id: Some(1), ..default_book() };
        assert!(matches!(svc.update_book(&book).await, Err(LibraryError::Database { .. })));
        assert!(matches!(svc.remove_book(1).await, Err(LibraryError::CurrentlyUnavailable { .. })));
        assert!(svc.find_books(None).await.is_err());
        assert!(events.events().is_empty());
    }
}
