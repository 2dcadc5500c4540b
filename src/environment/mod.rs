pub mod model;
pub mod queries;
pub mod types;

use std::sync::Arc;

use self::model::Api;
use self::types::{Geolocator, MapConfig, MapSurface, TokenStore};

/// Everything a component needs from the outside world: the backend
/// client and the rendering/positioning/token collaborators.
#[derive(Clone, Debug)]
pub struct Environment {
    pub api: Api,
    pub surface: Arc<dyn MapSurface>,
    pub geolocator: Arc<dyn Geolocator>,
    pub tokens: Arc<dyn TokenStore>,
    pub map_config: MapConfig,
}

impl Environment {
    pub fn new(
        api: Api,
        surface: Arc<dyn MapSurface>,
        geolocator: Arc<dyn Geolocator>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            api,
            surface,
            geolocator,
            tokens,
            map_config: MapConfig::default(),
        }
    }
}

/// A token store over a value known up front. Hosts with real session
/// handling implement [`TokenStore`] themselves.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenStore(pub Option<String>);

impl TokenStore for StaticTokenStore {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}
