//! Session driver
//!
//! Runs the effects a [`Session`] asks for against a [`GoalClient`] and
//! feeds each completion back in, until the session is quiet again.

use crate::state::{Effect, Event, Session};
use goalboard_store::{GoalClient, Transport};
use std::collections::VecDeque;
use tracing::debug;

/// Event loop binding a session to a store client
#[derive(Debug)]
pub struct SessionDriver<T> {
    client: GoalClient<T>,
    session: Session,
}

impl<T: Transport> SessionDriver<T> {
    /// Create new driver with an empty session
    #[must_use]
    pub fn new(client: GoalClient<T>) -> Self {
        Self::with_session(client, Session::new())
    }

    /// Create new driver resuming an existing session
    #[must_use]
    pub fn with_session(client: GoalClient<T>, session: Session) -> Self {
        Self { client, session }
    }

    /// Current session state
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Store client
    #[inline]
    #[must_use]
    pub fn client(&self) -> &GoalClient<T> {
        &self.client
    }

    /// Take the session back
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Apply `event` and run every effect it causes, in order
    ///
    /// Completions are applied as they arrive, so a mutation is always
    /// followed by its refetch before this returns.
    pub async fn handle(&mut self, event: Event) -> &Session {
        let mut pending: VecDeque<Effect> = self.session.apply(event).into();
        while let Some(effect) = pending.pop_front() {
            let completion = self.run(effect).await;
            pending.extend(self.session.apply(completion));
        }
        &self.session
    }

    async fn run(&self, effect: Effect) -> Event {
        match effect {
            Effect::Fetch => {
                debug!("running fetch");
                Event::FetchCompleted(self.client.fetch_all().await)
            }
            Effect::Dispatch(mutation) => {
                debug!(kind = %mutation.kind(), "running dispatch");
                Event::MutationCompleted {
                    kind: mutation.kind(),
                    result: self.client.dispatch(&mutation).await,
                }
            }
        }
    }
}
