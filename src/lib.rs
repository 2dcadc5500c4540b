mod components;
mod effect;
mod environment;
mod view_model;

pub use components::map;
pub use effect::Effect;
pub use environment::{model, queries, types, Environment, StaticTokenStore};
pub use view_model::MarkerViewModel;
