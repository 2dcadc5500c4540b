use itertools::Itertools;

use crate::environment::model::{BookInstance, Coordinate, UserInterest};

/// What the map surface needs to draw one marker, regardless of which
/// item kind produced it.
#[derive(Clone, Debug)]
pub struct MarkerViewModel {
    pub id: String,
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

impl PartialEq for MarkerViewModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MarkerViewModel {}

impl MarkerViewModel {
    pub fn book_instance(instance: &BookInstance) -> Self {
        Self {
            id: instance.id.clone(),
            coordinate: instance.location,
            title: instance.book.title.clone(),
            subtitle: Some(instance.reader.name.clone()),
            image: instance.book.small_cover_url.clone(),
        }
    }

    /// `None` for interests without a location; those never reach the map.
    pub fn interest(interest: &UserInterest) -> Option<Self> {
        let coordinate = interest.location?;
        let creators = interest
            .creators
            .as_ref()
            .map(|c| c.iter().map(|a| a.name.as_str()).join(", "))
            .filter(|names| !names.is_empty());
        Some(Self {
            id: interest.id.clone(),
            coordinate,
            title: interest.title.clone(),
            subtitle: creators,
            image: interest.thumbnail.clone(),
        })
    }
}
