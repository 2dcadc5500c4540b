mod book_instances;
pub use book_instances::{BookInstanceProvider, SearchQuery};

mod interests;
pub use interests::InterestProvider;

use std::pin::Pin;

use futures_util::Future;

use crate::environment::model::{ApiError, BookInstance, Coordinate, UserInterest};
use crate::view_model::MarkerViewModel;

/// What the map needs from an item: a stable id and, usually, a position
/// to aim the camera at.
pub trait MapItem: Clone + std::fmt::Debug + PartialEq {
    fn item_id(&self) -> &str;
    fn location(&self) -> Option<Coordinate>;
}

impl MapItem for BookInstance {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> Option<Coordinate> {
        Some(self.location)
    }
}

impl MapItem for UserInterest {
    fn item_id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> Option<Coordinate> {
        self.location
    }
}

/// One population of markers. Implementations wrap a single service
/// client each and keep the most recent page of results.
pub trait MarkerProvider: std::fmt::Debug {
    type Item: MapItem;

    fn identifier(&self) -> &str;
    /// Load one page of items. A single independent request per call; a
    /// completed load corresponds to `ResultsChanged` on the component.
    #[allow(clippy::type_complexity)]
    fn request_items(
        &self,
        token: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Self::Item>, ApiError>> + Send>>;
    fn process_new_items(&self, items: Vec<Self::Item>);
    fn markers(&self) -> Vec<MarkerViewModel>;
    fn reset(&self);
}
