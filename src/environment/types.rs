use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::model::Coordinate;
use crate::view_model::MarkerViewModel;

/// Camera zoom when nothing is selected.
pub const DEFAULT_ZOOM: f64 = 13.0;
/// Camera zoom after a marker was selected.
pub const SELECTION_ZOOM: f64 = 15.0;
/// Delay between the style finishing to load and the one-shot
/// geolocation request.
pub const GEOLOCATE_DELAY_MS: u64 = 500;

// Map Widget Configuration

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Style reference handed to the map widget
    pub style: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub fly_to_speed: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/mapbox/streets-v11".to_string(),
            min_zoom: 8.0,
            max_zoom: 15.0,
            fly_to_speed: 0.8,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeolocationConfig {
    pub enable_high_accuracy: bool,
    pub track_user_location: bool,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: false,
            track_user_location: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CursorStyle {
    Pointer,
    Default,
}

impl CursorStyle {
    /// The value assigned to the map canvas cursor style. An empty string
    /// reverts to the widget default.
    pub fn css_value(&self) -> &'static str {
        match self {
            CursorStyle::Pointer => "pointer",
            CursorStyle::Default => "",
        }
    }
}

// Collaborators

/// The rendering side of the map. Implemented by the host over whatever
/// widget actually draws tiles and markers.
pub trait MapSurface: std::fmt::Debug + Send + Sync {
    fn show_markers(&self, markers: &[MarkerViewModel]);
    fn fly_to(&self, center: Coordinate, zoom: f64);
    fn set_cursor(&self, cursor: CursorStyle);
}

/// Device position access. A failed or denied request yields `None`.
#[async_trait]
pub trait Geolocator: std::fmt::Debug + Send + Sync {
    fn config(&self) -> GeolocationConfig {
        GeolocationConfig::default()
    }
    async fn locate(&self) -> Option<Coordinate>;
}

/// Where the current session token lives.
pub trait TokenStore: std::fmt::Debug + Send + Sync {
    fn token(&self) -> Option<String>;
}
