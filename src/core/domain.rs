use std::env;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    // None until the store has assigned an identifier
    fn id(&self) -> Option<i64>;
}

pub const DEFAULT_DESTINATION: &str = "shelfChanged";

// Configuration abstracts config options for the shelf catalog
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub store: RepositoryStore,
    pub destination: String,
    pub books_table: String,
    pub events_table: String,
    pub sequences_table: String,
    pub strict_updates: bool,
    pub page_size: usize,
    pub listen_addr: String,
}

impl Configuration {
    pub fn new(branch_id: &str, store: RepositoryStore) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            store,
            destination: DEFAULT_DESTINATION.to_string(),
            books_table: "books".to_string(),
            events_table: "events".to_string(),
            sequences_table: "sequences".to_string(),
            strict_updates: true,
            page_size: 100,
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    // builds configuration from defaults overridden by SHELF_* variables
    pub fn from_lookup<F>(lookup: F) -> Self where F: Fn(&str) -> Option<String> {
        let store = match lookup("SHELF_MODE") {
            Some(mode) => RepositoryStore::parse(mode.as_str()).unwrap_or_else(|| {
                warn!(mode = mode.as_str(), "unknown SHELF_MODE, using memory");
                RepositoryStore::Memory
            }),
            None => RepositoryStore::Memory,
        };
        let branch = lookup("SHELF_BRANCH").unwrap_or_else(|| store.to_string());
        let mut config = Configuration::new(branch.as_str(), store);
        if let Some(destination) = lookup("SHELF_DESTINATION") {
            config.destination = destination;
        }
        if let Some(table) = lookup("SHELF_BOOKS_TABLE") {
            config.books_table = table;
        }
        if let Some(table) = lookup("SHELF_EVENTS_TABLE") {
            config.events_table = table;
        }
        if let Some(table) = lookup("SHELF_SEQUENCES_TABLE") {
            config.sequences_table = table;
        }
        if let Some(strict) = lookup("SHELF_STRICT_UPDATES") {
            match strict.parse::<bool>() {
                Ok(strict) => config.strict_updates = strict,
                Err(_) => warn!(value = strict.as_str(), "invalid SHELF_STRICT_UPDATES, keeping default"),
            }
        }
        if let Some(size) = lookup("SHELF_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => warn!(value = size.as_str(), "invalid SHELF_PAGE_SIZE, keeping default"),
            }
        }
        if let Some(addr) = lookup("SHELF_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        config
    }
}
