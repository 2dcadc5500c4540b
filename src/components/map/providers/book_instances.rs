use std::pin::Pin;
use std::sync::Mutex;

use futures_util::Future;
use itertools::Itertools;

use crate::environment::model::{Api, ApiError, BookInstance, Coordinate};
use crate::view_model::MarkerViewModel;

use super::MarkerProvider;

/// Search parameters for the book instance population.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub center: Coordinate,
    pub offerings: Option<Vec<String>>,
}

/// Book instances around the search center, as returned by the search
/// query.
#[derive(Debug)]
pub struct BookInstanceProvider {
    api: Api,
    query: Mutex<SearchQuery>,
    items: Mutex<im::Vector<BookInstance>>,
}

impl BookInstanceProvider {
    pub fn new(api: Api, query: SearchQuery) -> Self {
        Self {
            api,
            query: Mutex::new(query),
            items: Mutex::new(im::Vector::new()),
        }
    }

    /// Replace the search parameters for the next load.
    pub fn set_query(&self, query: SearchQuery) {
        let _ = self.query.lock().map(|mut q| *q = query);
    }

    fn current_query(&self) -> SearchQuery {
        self.query.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl MarkerProvider for BookInstanceProvider {
    type Item = BookInstance;

    fn identifier(&self) -> &str {
        "book-instances"
    }

    fn request_items(
        &self,
        token: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<BookInstance>, ApiError>> + Send>> {
        let api = self.api.clone();
        let query = self.current_query();
        Box::pin(async move {
            api.book_instances(
                token.as_deref(),
                query.term.as_deref(),
                query.center,
                query.offerings.as_deref(),
            )
            .await
        })
    }

    fn process_new_items(&self, items: Vec<BookInstance>) {
        let _ = self
            .items
            .lock()
            .map(|mut current| *current = items.into_iter().collect());
    }

    fn markers(&self) -> Vec<MarkerViewModel> {
        let Ok(items) = self.items.lock() else {
            return Vec::new();
        };
        items
            .iter()
            .unique_by(|instance| instance.id.clone())
            .map(MarkerViewModel::book_instance)
            .collect()
    }

    fn reset(&self) {
        let _ = self.items.lock().map(|mut current| current.clear());
    }
}
