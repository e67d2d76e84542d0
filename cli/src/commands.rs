use clap::Subcommand;

use board_engine::{CredentialsInput, Engine, Event, MessageCatalog, Route, View};
use board_session::IdentityStore;
use board_types::ThreadId;

use crate::render;

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create an account and become its identity
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored identity
    Logout,
    /// Show the active identity and its account details
    Whoami,
    /// List threads
    Threads,
    /// Start a new thread
    NewThread {
        /// Up to 100 characters
        title: String,
    },
    /// Show a thread's posts, newest first
    Posts { thread_id: ThreadId },
    /// Reply to a thread
    Reply {
        thread_id: ThreadId,
        /// Up to 500 characters
        content: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub(crate) fn is_success(self) -> bool {
        self == Self::Success
    }

    fn from_view(view: &View) -> Self {
        if render::has_error(view) {
            Self::Failure
        } else {
            Self::Success
        }
    }
}

pub(crate) async fn run<S, C>(engine: &mut Engine<S, C>, command: Command) -> Outcome
where
    S: IdentityStore,
    C: MessageCatalog,
{
    match command {
        Command::Register { email, password } => {
            engine.dispatch(Event::Navigate(Route::Register)).await;
            let input = CredentialsInput::new(email, password);
            submit_credentials(engine, Event::SubmitRegister(input)).await
        }
        Command::Login { email, password } => {
            if let Some(identity) = engine.session_state().identity {
                println!(
                    "Already signed in as {}. Run `anonboard logout` first.",
                    identity.abbreviated()
                );
                return Outcome::Success;
            }
            engine.dispatch(Event::Navigate(Route::Login)).await;
            submit_credentials(engine, Event::SubmitLogin(CredentialsInput::new(email, password)))
                .await
        }
        Command::Logout => {
            engine.dispatch(Event::Logout).await;
            println!("Signed out.");
            Outcome::Success
        }
        Command::Whoami => {
            if engine.session_state().identity.is_none() {
                println!("Not signed in.");
                return Outcome::Success;
            }
            show(engine, Route::UserInfo).await
        }
        Command::Threads => show(engine, Route::Home).await,
        Command::NewThread { title } => {
            if !open(engine, Route::Home).await {
                return Outcome::Failure;
            }
            engine.dispatch(Event::SubmitThread { title }).await;
            render::view(engine.view());
            Outcome::from_view(engine.view())
        }
        Command::Posts { thread_id } => show(engine, Route::Thread(thread_id)).await,
        Command::Reply { thread_id, content } => {
            if !open(engine, Route::Thread(thread_id)).await {
                return Outcome::Failure;
            }
            engine.dispatch(Event::SubmitPost { content }).await;
            render::view(engine.view());
            Outcome::from_view(engine.view())
        }
    }
}

/// Navigate to `route`; false if the gate sent us elsewhere.
async fn open<S, C>(engine: &mut Engine<S, C>, route: Route) -> bool
where
    S: IdentityStore,
    C: MessageCatalog,
{
    engine.dispatch(Event::Navigate(route)).await;
    if engine.controller().route() == Some(route) {
        return true;
    }
    if matches!(engine.view(), View::Register(_)) {
        eprintln!("Not signed in. Run `anonboard register` or `anonboard login` first.");
    }
    false
}

async fn show<S, C>(engine: &mut Engine<S, C>, route: Route) -> Outcome
where
    S: IdentityStore,
    C: MessageCatalog,
{
    if !open(engine, route).await {
        return Outcome::Failure;
    }
    render::view(engine.view());
    Outcome::from_view(engine.view())
}

async fn submit_credentials<S, C>(engine: &mut Engine<S, C>, event: Event) -> Outcome
where
    S: IdentityStore,
    C: MessageCatalog,
{
    engine.dispatch(event).await;
    match engine.view() {
        View::Register(form) | View::Login(form) => {
            render::auth_form(form);
            Outcome::Failure
        }
        _ => match engine.session_state().identity {
            Some(identity) => {
                println!("Signed in as {}.", identity.abbreviated());
                Outcome::Success
            }
            None => Outcome::Failure,
        },
    }
}
