mod action;
mod providers;
mod reducer;
mod state;

pub use action::MapAction;
pub use providers::{BookInstanceProvider, InterestProvider, MapItem, MarkerProvider, SearchQuery};
pub use reducer::reduce;
pub use state::ViewState;

use crate::effect::Effect;
use crate::environment::model::Coordinate;
use crate::environment::Environment;

/// Drives one map view: applies actions through the reducer, runs the
/// resulting effects, and keeps the surface camera in sync with the
/// observed state. One instance per rendered map; parametrized over the
/// item kind it displays.
pub struct MapComponent<M: MapItem> {
    state: ViewState<M>,
    environment: Environment,
    sender: flume::Sender<MapAction<M>>,
    receiver: flume::Receiver<MapAction<M>>,
}

impl<M: MapItem + Send + 'static> MapComponent<M> {
    pub fn new(initial: Coordinate, environment: Environment) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            state: ViewState::new(initial),
            environment,
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &ViewState<M> {
        &self.state
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Apply one action. Synchronous follow-up effects run immediately;
    /// future effects are spawned and their results picked up by
    /// [`Self::drain_pending`].
    pub fn dispatch(&mut self, action: MapAction<M>) {
        let camera_before = self.state.camera();
        let effect = reduce(action, &mut self.state, &self.environment);
        self.run_effect(effect);
        if self.state.camera() != camera_before {
            self.environment
                .surface
                .fly_to(self.state.center, self.state.zoom);
        }
    }

    /// Actions produced by spawned effects since the last call, applied
    /// in arrival order. The host calls this from its event loop.
    pub fn drain_pending(&mut self) {
        let pending: Vec<_> = self.receiver.try_iter().collect();
        for action in pending {
            self.dispatch(action);
        }
    }

    /// Feed a completed provider load into the view: store the page,
    /// clear any stale selection, and hand the markers to the surface.
    pub fn results_loaded<P: MarkerProvider<Item = M>>(&mut self, provider: &P, items: Vec<M>) {
        provider.process_new_items(items);
        self.dispatch(MapAction::ResultsChanged);
        self.environment.surface.show_markers(&provider.markers());
    }

    fn run_effect(&mut self, effect: Effect<MapAction<M>>) {
        match effect {
            Effect::Nothing => {}
            Effect::Action(action) => self.dispatch(action),
            Effect::Future(future) => {
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let _ = sender.send(future.await);
                });
            }
        }
    }
}
