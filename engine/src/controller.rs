//! View-gate and refresh controller.
//!
//! [`Controller::handle`] is a pure transition: it takes the current session
//! snapshot and one [`Event`], updates view state, and returns the
//! [`Effect`]s the driver must carry out. It never performs IO.

use std::fmt;

use board_client::{Ack, LoggedIn, Operation, Registered, RemoteError, RemoteResult, ThreadCreated};
use board_types::{
    Credentials, CredentialsPurpose, Identity, IdentityDetails, PostContent, SessionState, Thread,
    ThreadId, ThreadPosts, ThreadTitle,
};

use crate::catalog::{EnglishCatalog, MessageCatalog, field_of};
use crate::route::{GateDecision, Route, gate};
use crate::ticket::{Activation, FetchTicket, TicketBook};
use crate::view::{AuthForm, LoadState, Notice, View};

/// Raw credentials as typed into a form.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialsInput {
    pub email: String,
    pub password: String,
}

impl CredentialsInput {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for CredentialsInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum Event {
    Navigate(Route),
    /// The session left its resolving state.
    SessionResolved,
    SubmitThread { title: String },
    SubmitPost { content: String },
    SubmitRegister(CredentialsInput),
    SubmitLogin(CredentialsInput),
    Logout,
    Completed(FetchTicket, Completion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Call(FetchTicket, Call),
    Navigate(Route),
    SetIdentity(Option<Identity>),
}

/// A remote call the driver must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListThreads,
    ThreadPosts(ThreadId),
    IdentityDetails(Identity),
    CreateThread {
        identity: Identity,
        title: ThreadTitle,
    },
    CreatePost {
        identity: Identity,
        thread: ThreadId,
        content: PostContent,
    },
    Register(Credentials),
    Login(Credentials),
}

impl Call {
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::ListThreads => Operation::ListThreads,
            Self::ThreadPosts(_) => Operation::ListThreadPosts,
            Self::IdentityDetails(_) => Operation::IdentityDetails,
            Self::CreateThread { .. } => Operation::CreateThread,
            Self::CreatePost { .. } => Operation::CreatePost,
            Self::Register(_) => Operation::Register,
            Self::Login(_) => Operation::Login,
        }
    }
}

/// Result of a [`Call`], fed back as [`Event::Completed`].
#[derive(Debug)]
pub enum Completion {
    Threads(RemoteResult<Vec<Thread>>),
    ThreadPosts(RemoteResult<ThreadPosts>),
    IdentityDetails(RemoteResult<IdentityDetails>),
    ThreadCreated(RemoteResult<ThreadCreated>),
    PostCreated(RemoteResult<Ack>),
    Registered(RemoteResult<Registered>),
    LoggedIn(RemoteResult<LoggedIn>),
}

impl Completion {
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Threads(_) => Operation::ListThreads,
            Self::ThreadPosts(_) => Operation::ListThreadPosts,
            Self::IdentityDetails(_) => Operation::IdentityDetails,
            Self::ThreadCreated(_) => Operation::CreateThread,
            Self::PostCreated(_) => Operation::CreatePost,
            Self::Registered(_) => Operation::Register,
            Self::LoggedIn(_) => Operation::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// No view is active.
    Idle,
    Pending,
    Redirected(Route),
    Open,
}

#[derive(Debug)]
pub struct Controller<C = EnglishCatalog> {
    catalog: C,
    configured: bool,
    tickets: TicketBook,
    route: Option<Route>,
    gate: GateStatus,
    view: View,
}

impl Controller<EnglishCatalog> {
    /// `configured` is false when no API base URL is set; no call is emitted then.
    #[must_use]
    pub fn new(configured: bool) -> Self {
        Self::with_catalog(EnglishCatalog, configured)
    }
}

impl<C: MessageCatalog> Controller<C> {
    #[must_use]
    pub fn with_catalog(catalog: C, configured: bool) -> Self {
        Self {
            catalog,
            configured,
            tickets: TicketBook::default(),
            route: None,
            gate: GateStatus::Idle,
            view: View::Blank,
        }
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.route
    }

    #[must_use]
    pub fn gate(&self) -> GateStatus {
        self.gate
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.tickets.current()
    }

    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn handle(&mut self, session: &SessionState, event: Event) -> Vec<Effect> {
        match event {
            Event::Navigate(route) => self.navigate(session, route),
            Event::SessionResolved => {
                if self.gate == GateStatus::Pending {
                    self.enter(session)
                } else {
                    Vec::new()
                }
            }
            Event::SubmitThread { title } => self.submit_thread(session, title),
            Event::SubmitPost { content } => self.submit_post(session, content),
            Event::SubmitRegister(input) => {
                self.submit_credentials(input, CredentialsPurpose::Register)
            }
            Event::SubmitLogin(input) => self.submit_credentials(input, CredentialsPurpose::Login),
            Event::Logout => {
                tracing::info!("Logout requested");
                vec![Effect::SetIdentity(None)]
            }
            Event::Completed(ticket, completion) => self.complete(ticket, completion),
        }
    }

    fn navigate(&mut self, session: &SessionState, route: Route) -> Vec<Effect> {
        let activation = self.tickets.activate();
        tracing::debug!(route = %route, activation = %activation, "View activated");
        self.route = Some(route);
        self.view = View::for_route(route);
        self.enter(session)
    }

    /// Run the identity gate for the current activation, then mount the view.
    fn enter(&mut self, session: &SessionState) -> Vec<Effect> {
        let Some(route) = self.route else {
            return Vec::new();
        };
        match gate(route, session) {
            GateDecision::Pending => {
                self.gate = GateStatus::Pending;
                Vec::new()
            }
            GateDecision::Redirect(target) => {
                tracing::info!(from = %route, to = %target, "Redirecting");
                self.gate = GateStatus::Redirected(target);
                vec![Effect::Navigate(target)]
            }
            GateDecision::Proceed(identity) => {
                self.gate = GateStatus::Open;
                self.mount(identity)
            }
        }
    }

    fn mount(&mut self, identity: Option<Identity>) -> Vec<Effect> {
        let call = match &mut self.view {
            View::Home(_) => Call::ListThreads,
            View::Thread(view) => Call::ThreadPosts(view.thread_id),
            View::UserInfo(view) => {
                view.identity.clone_from(&identity);
                match identity {
                    Some(identity) => Call::IdentityDetails(identity),
                    None => return Vec::new(),
                }
            }
            View::Register(_) | View::Login(_) | View::Blank => return Vec::new(),
        };
        self.fetch_list(call)
    }

    /// Issue the view's list fetch, or fail it locally when unconfigured.
    fn fetch_list(&mut self, call: Call) -> Vec<Effect> {
        if !self.configured {
            let message = self.catalog.configuration_missing();
            tracing::warn!(operation = %call.operation(), "No API base URL; fetch not issued");
            match &mut self.view {
                View::Home(home) => home.threads = LoadState::Failed(message),
                View::Thread(thread) => thread.posts = LoadState::Failed(message),
                View::UserInfo(info) => {
                    info.details = LoadState::Loaded(IdentityDetails::default());
                }
                View::Register(_) | View::Login(_) | View::Blank => {}
            }
            return Vec::new();
        }

        match &mut self.view {
            View::Home(home) => home.threads = LoadState::Loading,
            View::Thread(thread) => thread.posts = LoadState::Loading,
            View::UserInfo(info) => info.details = LoadState::Loading,
            View::Register(_) | View::Login(_) | View::Blank => {}
        }
        let ticket = self.tickets.issue(true);
        vec![Effect::Call(ticket, call)]
    }

    /// Identity for a mutation on an identity-requiring view.
    ///
    /// `Err` carries the effects to return instead: nothing while the gate is
    /// not open, a redirect when the identity has gone away since activation.
    fn acting_identity(&self, session: &SessionState) -> Result<Identity, Vec<Effect>> {
        if self.gate != GateStatus::Open {
            tracing::debug!(gate = ?self.gate, "Submission ignored before gate opened");
            return Err(Vec::new());
        }
        session
            .identity
            .clone()
            .ok_or_else(|| vec![Effect::Navigate(Route::Register)])
    }

    fn submit_thread(&mut self, session: &SessionState, title: String) -> Vec<Effect> {
        let identity = match self.acting_identity(session) {
            Ok(identity) => identity,
            Err(effects) => return effects,
        };
        let View::Home(home) = &mut self.view else {
            tracing::debug!("Thread submission outside the home view ignored");
            return Vec::new();
        };
        if home.composer.submitting {
            return Vec::new();
        }
        home.composer.begin(title);

        let title = match ThreadTitle::parse(&home.composer.draft) {
            Ok(title) => title,
            Err(e) => {
                tracing::debug!(field = %e.field(), "Thread rejected locally");
                home.composer.fail(self.catalog.validation(&e));
                return Vec::new();
            }
        };
        if !self.configured {
            home.composer.fail(self.catalog.configuration_missing());
            return Vec::new();
        }

        home.composer.submitting = true;
        let ticket = self.tickets.issue(false);
        vec![Effect::Call(ticket, Call::CreateThread { identity, title })]
    }

    fn submit_post(&mut self, session: &SessionState, content: String) -> Vec<Effect> {
        let identity = match self.acting_identity(session) {
            Ok(identity) => identity,
            Err(effects) => return effects,
        };
        let View::Thread(view) = &mut self.view else {
            tracing::debug!("Post submission outside a thread view ignored");
            return Vec::new();
        };
        if view.composer.submitting {
            return Vec::new();
        }
        view.composer.begin(content);

        let content = match PostContent::parse(&view.composer.draft) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(field = %e.field(), "Post rejected locally");
                view.composer.fail(self.catalog.validation(&e));
                return Vec::new();
            }
        };
        if !self.configured {
            view.composer.fail(self.catalog.configuration_missing());
            return Vec::new();
        }

        view.composer.submitting = true;
        let thread = view.thread_id;
        let ticket = self.tickets.issue(false);
        vec![Effect::Call(
            ticket,
            Call::CreatePost {
                identity,
                thread,
                content,
            },
        )]
    }

    fn submit_credentials(
        &mut self,
        input: CredentialsInput,
        purpose: CredentialsPurpose,
    ) -> Vec<Effect> {
        if self.gate != GateStatus::Open {
            return Vec::new();
        }
        let form = match (&mut self.view, purpose) {
            (View::Register(form), CredentialsPurpose::Register)
            | (View::Login(form), CredentialsPurpose::Login) => form,
            _ => {
                tracing::debug!(?purpose, "Credentials submitted to the wrong view; ignored");
                return Vec::new();
            }
        };
        if form.submitting {
            return Vec::new();
        }
        form.email.clone_from(&input.email);
        form.field_errors.clear();
        form.notice = None;

        let credentials = match Credentials::parse(&input.email, &input.password, purpose) {
            Ok(credentials) => credentials,
            Err(errors) => {
                tracing::debug!(count = errors.len(), "Credentials rejected locally");
                form.field_errors = errors
                    .iter()
                    .map(|e| (e.field(), self.catalog.validation(e)))
                    .collect();
                form.notice = errors
                    .first()
                    .map(|e| Notice::Error(self.catalog.validation(e)));
                return Vec::new();
            }
        };
        if !self.configured {
            form.notice = Some(Notice::Error(self.catalog.configuration_missing()));
            return Vec::new();
        }

        form.submitting = true;
        let ticket = self.tickets.issue(false);
        let call = match purpose {
            CredentialsPurpose::Register => Call::Register(credentials),
            CredentialsPurpose::Login => Call::Login(credentials),
        };
        vec![Effect::Call(ticket, call)]
    }

    fn complete(&mut self, ticket: FetchTicket, completion: Completion) -> Vec<Effect> {
        let operation = completion.operation();
        if !self.tickets.accepts(ticket, !operation.is_mutation()) {
            tracing::debug!(
                ticket = %ticket,
                current = %self.tickets.current(),
                operation = %operation,
                "Discarding stale result"
            );
            return Vec::new();
        }

        let mut refetch = None;
        let effects = match (&mut self.view, completion) {
            (View::Home(home), Completion::Threads(result)) => {
                home.threads = match result {
                    Ok(threads) => LoadState::Loaded(threads),
                    Err(e) => LoadState::Failed(self.catalog.describe(&e)),
                };
                Vec::new()
            }
            (View::Thread(view), Completion::ThreadPosts(result)) => {
                match result {
                    Ok(ThreadPosts { thread, posts }) => {
                        view.title = Some(thread.title);
                        view.posts = LoadState::Loaded(posts);
                    }
                    Err(e) => view.posts = LoadState::Failed(self.catalog.describe(&e)),
                }
                Vec::new()
            }
            (View::UserInfo(info), Completion::IdentityDetails(result)) => {
                let details = result.unwrap_or_else(|e| {
                    tracing::warn!(kind = %e.kind(), "Identity details unavailable: {e}");
                    IdentityDetails::default()
                });
                info.details = LoadState::Loaded(details);
                Vec::new()
            }
            (View::Home(home), Completion::ThreadCreated(result)) => {
                match result {
                    Ok(created) => {
                        let text = self.catalog.success(operation, created.message.as_deref());
                        home.composer.succeed(text);
                        refetch = Some(Call::ListThreads);
                    }
                    Err(e) => home.composer.fail(self.catalog.describe(&e)),
                }
                Vec::new()
            }
            (View::Thread(view), Completion::PostCreated(result)) => {
                match result {
                    Ok(ack) => {
                        let text = self.catalog.success(operation, ack.message.as_deref());
                        view.composer.succeed(text);
                        refetch = Some(Call::ThreadPosts(view.thread_id));
                    }
                    Err(e) => view.composer.fail(self.catalog.describe(&e)),
                }
                Vec::new()
            }
            (View::Register(form), Completion::Registered(result)) => {
                let outcome = result.map(|r| (r.registration.identity, r.message));
                Self::finish_auth(&self.catalog, form, operation, outcome)
            }
            (View::Login(form), Completion::LoggedIn(result)) => {
                let outcome = result.map(|r| (r.identity, r.message));
                Self::finish_auth(&self.catalog, form, operation, outcome)
            }
            (_, completion) => {
                tracing::debug!(
                    operation = %completion.operation(),
                    "Result does not match the active view; discarded"
                );
                Vec::new()
            }
        };

        // Read-after-write: the mutation has completed, so re-fetch now.
        match refetch {
            Some(call) => self.fetch_list(call),
            None => effects,
        }
    }

    fn finish_auth(
        catalog: &C,
        form: &mut AuthForm,
        operation: Operation,
        outcome: Result<(Identity, Option<String>), RemoteError>,
    ) -> Vec<Effect> {
        form.submitting = false;
        match outcome {
            Ok((identity, message)) => {
                form.notice = Some(Notice::Success(
                    catalog.success(operation, message.as_deref()),
                ));
                vec![
                    Effect::SetIdentity(Some(identity)),
                    Effect::Navigate(Route::Home),
                ]
            }
            Err(e) => {
                let message = catalog.describe(&e);
                if let Some(field) = e.code().and_then(field_of) {
                    form.field_errors.push((field, message.clone()));
                }
                form.notice = Some(Notice::Error(message));
                Vec::new()
            }
        }
    }
}
