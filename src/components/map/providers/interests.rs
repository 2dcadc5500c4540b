use std::pin::Pin;
use std::sync::Mutex;

use futures_util::Future;

use crate::environment::model::{Api, ApiError, Connection, UserInterest};
use crate::view_model::MarkerViewModel;

use super::MarkerProvider;

/// A reader's interests, loaded off their profile. Only located interests
/// are kept; the rest never reach the map.
#[derive(Debug)]
pub struct InterestProvider {
    api: Api,
    reader_id: String,
    items: Mutex<im::Vector<UserInterest>>,
}

impl InterestProvider {
    pub fn new(api: Api, reader_id: impl Into<String>) -> Self {
        Self {
            api,
            reader_id: reader_id.into(),
            items: Mutex::new(im::Vector::new()),
        }
    }
}

impl MarkerProvider for InterestProvider {
    type Item = UserInterest;

    fn identifier(&self) -> &str {
        "reader-interests"
    }

    fn request_items(
        &self,
        token: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<UserInterest>, ApiError>> + Send>> {
        let api = self.api.clone();
        let reader_id = self.reader_id.clone();
        Box::pin(async move {
            let reader = api.reader(token.as_deref(), &reader_id).await?;
            Ok(reader
                .interests
                .map(Connection::nodes)
                .unwrap_or_default())
        })
    }

    fn process_new_items(&self, items: Vec<UserInterest>) {
        let _ = self.items.lock().map(|mut current| {
            *current = items
                .into_iter()
                .filter(|interest| interest.location.is_some())
                .collect()
        });
    }

    fn markers(&self) -> Vec<MarkerViewModel> {
        let Ok(items) = self.items.lock() else {
            return Vec::new();
        };
        items.iter().filter_map(MarkerViewModel::interest).collect()
    }

    fn reset(&self) {
        let _ = self.items.lock().map(|mut current| current.clear());
    }
}
