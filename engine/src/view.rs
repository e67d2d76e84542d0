//! View-local state exposed to consumers.

use board_types::{CredentialsPurpose, Field, Identity, IdentityDetails, Post, Thread, ThreadId};

use crate::Route;

/// Lifecycle of one fetched resource. Any state may re-enter `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Error(text) | Self::Success(text) => text,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Draft input plus submission status shared by the compose forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub draft: String,
    pub submitting: bool,
    pub notice: Option<Notice>,
}

impl Composer {
    pub(crate) fn begin(&mut self, draft: String) {
        self.draft = draft;
        self.notice = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.submitting = false;
        self.notice = Some(Notice::Error(message));
    }

    pub(crate) fn succeed(&mut self, message: String) {
        self.submitting = false;
        self.draft.clear();
        self.notice = Some(Notice::Success(message));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeView {
    pub threads: LoadState<Vec<Thread>>,
    pub composer: Composer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView {
    pub thread_id: ThreadId,
    /// Title as reported alongside the posts.
    pub title: Option<String>,
    /// Newest first.
    pub posts: LoadState<Vec<Post>>,
    pub composer: Composer,
}

impl ThreadView {
    #[must_use]
    pub fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            title: None,
            posts: LoadState::Idle,
            composer: Composer::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub purpose: CredentialsPurpose,
    /// Email as last submitted; the password is never retained.
    pub email: String,
    pub submitting: bool,
    pub field_errors: Vec<(Field, String)>,
    pub notice: Option<Notice>,
}

impl AuthForm {
    #[must_use]
    pub fn new(purpose: CredentialsPurpose) -> Self {
        Self {
            purpose,
            email: String::new(),
            submitting: false,
            field_errors: Vec::new(),
            notice: None,
        }
    }

    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfoView {
    pub identity: Option<Identity>,
    /// Best effort. Failures resolve to empty details.
    pub details: LoadState<IdentityDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing has been navigated to yet.
    Blank,
    Home(HomeView),
    Thread(ThreadView),
    Register(AuthForm),
    Login(AuthForm),
    UserInfo(UserInfoView),
}

impl View {
    pub(crate) fn for_route(route: Route) -> Self {
        match route {
            Route::Home => Self::Home(HomeView::default()),
            Route::Thread(id) => Self::Thread(ThreadView::new(id)),
            Route::Register => Self::Register(AuthForm::new(CredentialsPurpose::Register)),
            Route::Login => Self::Login(AuthForm::new(CredentialsPurpose::Login)),
            Route::UserInfo => Self::UserInfo(UserInfoView::default()),
        }
    }
}
