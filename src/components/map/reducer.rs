use std::time::Duration;

use crate::effect::Effect;
use crate::environment::types::{CursorStyle, GEOLOCATE_DELAY_MS, SELECTION_ZOOM};
use crate::environment::Environment;

use super::action::MapAction;
use super::providers::MapItem;
use super::state::ViewState;

/// Pure transition: the next state is a function of (state, action) only.
/// Everything with an outside effect is returned as an [`Effect`] or, for
/// the cursor, delegated to the surface without touching state.
pub fn reduce<M: MapItem + Send + 'static>(
    action: MapAction<M>,
    state: &mut ViewState<M>,
    environment: &Environment,
) -> Effect<MapAction<M>> {
    log::trace!("{action:?}");
    match action {
        MapAction::ItemSelected(item) => {
            if let Some(location) = item.location() {
                state.center = location;
                state.zoom = SELECTION_ZOOM;
            }
            state.selected = Some(item);
            Effect::NONE
        }
        MapAction::ResetSelect | MapAction::ResultsChanged => {
            // Leave the state value untouched when nothing is selected,
            // so observers can skip a re-render.
            if state.selected.is_some() {
                state.selected = None;
            }
            Effect::NONE
        }
        MapAction::Drag => {
            // Panning away from a selected item deselects it.
            if state.selected.is_some() {
                Effect::action(MapAction::ResetSelect)
            } else {
                Effect::NONE
            }
        }
        MapAction::LocationUpdated(Some(center)) => {
            state.center = center;
            Effect::NONE
        }
        MapAction::LocationUpdated(None) => Effect::NONE,
        MapAction::Hover(hovering) => {
            let cursor = if hovering {
                CursorStyle::Pointer
            } else {
                CursorStyle::Default
            };
            environment.surface.set_cursor(cursor);
            Effect::NONE
        }
        MapAction::StyleLoaded => {
            // Best-effort recenter on the device position once the map is
            // up. No retry; a failed fix leaves the initial coordinate.
            let geolocator = environment.geolocator.clone();
            Effect::future(
                async move {
                    tokio::time::sleep(Duration::from_millis(GEOLOCATE_DELAY_MS)).await;
                    geolocator.locate().await
                },
                MapAction::LocationUpdated,
            )
        }
    }
}
