use std::collections::VecDeque;

use board_client::BoardClient;
use board_session::{IdentityStore, SessionManager};
use board_types::SessionState;

use crate::catalog::{EnglishCatalog, MessageCatalog};
use crate::controller::{Call, Completion, Controller, Effect, Event};
use crate::view::View;

/// Upper bound on events processed by one dispatch. Guards against redirect cycles.
const MAX_EVENTS_PER_DISPATCH: usize = 64;

/// Owns the session, the remote client and the controller, and carries out
/// the controller's effects one at a time.
pub struct Engine<S, C = EnglishCatalog> {
    session: SessionManager<S>,
    client: BoardClient,
    controller: Controller<C>,
}

impl<S: IdentityStore> Engine<S, EnglishCatalog> {
    #[must_use]
    pub fn new(store: S, client: BoardClient) -> Self {
        Self::with_catalog(store, client, EnglishCatalog)
    }
}

impl<S: IdentityStore, C: MessageCatalog> Engine<S, C> {
    #[must_use]
    pub fn with_catalog(store: S, client: BoardClient, catalog: C) -> Self {
        let configured = client.is_configured();
        Self {
            session: SessionManager::new(store),
            client,
            controller: Controller::with_catalog(catalog, configured),
        }
    }

    /// Read the durable identity slot and let any pending view proceed.
    pub async fn resolve_session(&mut self) {
        self.session.resolve();
        self.dispatch(Event::SessionResolved).await;
    }

    /// Feed `event` to the controller and run every resulting effect.
    ///
    /// Effects run in order. Each call is awaited and its completion fed back
    /// before the next effect starts, so a re-fetch always follows the
    /// mutation that triggered it. Returns once nothing is left to do.
    pub async fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        let mut processed = 0usize;

        while let Some(event) = queue.pop_front() {
            processed += 1;
            if processed > MAX_EVENTS_PER_DISPATCH {
                tracing::warn!(
                    dropped = queue.len() + 1,
                    "Dispatch limit reached; remaining events dropped"
                );
                break;
            }

            let state = self.session.state();
            for effect in self.controller.handle(&state, event) {
                match effect {
                    Effect::Call(ticket, call) => {
                        let completion = self.execute(call).await;
                        queue.push_back(Event::Completed(ticket, completion));
                    }
                    Effect::Navigate(route) => queue.push_back(Event::Navigate(route)),
                    Effect::SetIdentity(identity) => self.session.set_identity(identity),
                }
            }
        }
    }

    async fn execute(&self, call: Call) -> Completion {
        tracing::debug!(operation = %call.operation(), "Executing call");
        let client = &self.client;
        match call {
            Call::ListThreads => Completion::Threads(client.list_threads().await),
            Call::ThreadPosts(thread) => {
                Completion::ThreadPosts(client.list_thread_posts(thread).await)
            }
            Call::IdentityDetails(identity) => {
                Completion::IdentityDetails(client.identity_details(&identity).await)
            }
            Call::CreateThread { identity, title } => {
                Completion::ThreadCreated(client.create_thread(&identity, &title).await)
            }
            Call::CreatePost {
                identity,
                thread,
                content,
            } => Completion::PostCreated(client.create_post(&identity, thread, &content).await),
            Call::Register(credentials) => {
                Completion::Registered(client.register(&credentials).await)
            }
            Call::Login(credentials) => Completion::LoggedIn(client.login(&credentials).await),
        }
    }

    #[must_use]
    pub fn view(&self) -> &View {
        self.controller.view()
    }

    #[must_use]
    pub fn controller(&self) -> &Controller<C> {
        &self.controller
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }
}
