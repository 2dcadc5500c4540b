use crate::environment::model::Coordinate;

use super::providers::MapItem;

#[derive(Clone, Debug)]
pub enum MapAction<M: MapItem> {
    /// A marker was clicked.
    ItemSelected(M),
    ResetSelect,
    /// The candidate item list changed; a stale selection must not survive.
    ResultsChanged,
    /// A geolocation fix arrived, or failed to (`None`).
    LocationUpdated(Option<Coordinate>),
    /// The map style finished loading.
    StyleLoaded,
    /// The user dragged the camera.
    Drag,
    /// Pointer entered (`true`) or left (`false`) a marker.
    Hover(bool),
}
