use std::future::Future;
use std::pin::Pin;

/// What a reducer wants to happen after it returned: nothing, a follow-up
/// action applied synchronously, or a future whose output re-enters the
/// component loop as an action.
pub enum Effect<A> {
    Nothing,
    Action(A),
    Future(Pin<Box<dyn Future<Output = A> + Send + 'static>>),
}

impl<A: Send + 'static> Effect<A> {
    pub const NONE: Self = Effect::Nothing;

    pub fn action(action: A) -> Self {
        Effect::Action(action)
    }

    pub fn future<T, F, M>(future: F, transform: M) -> Self
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        M: FnOnce(T) -> A + Send + 'static,
    {
        Effect::Future(Box::pin(async move { transform(future.await) }))
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::Nothing => write!(f, "Effect::Nothing"),
            Effect::Action(a) => write!(f, "Effect::Action({a:?})"),
            Effect::Future(_) => write!(f, "Effect::Future"),
        }
    }
}
