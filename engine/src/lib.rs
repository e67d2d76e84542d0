//! View gating and refresh control for the board client.
//!
//! The crate is split into a pure decision layer and a thin async driver:
//!
//! - [`Controller`] - reduces [`Event`]s against the session snapshot into
//!   view state plus [`Effect`]s; no IO
//! - [`Engine`] - owns the [`SessionManager`](board_session::SessionManager)
//!   and [`BoardClient`](board_client::BoardClient) and executes effects in order
//! - [`MessageCatalog`] - the single table turning failures into user-facing text
//!
//! # Staleness
//!
//! Every navigation starts a new activation. Calls are tagged with a
//! [`FetchTicket`]; a completion whose activation has been replaced, or whose
//! list fetch has been superseded by a newer one, is dropped without touching
//! view state.

mod catalog;
mod controller;
mod driver;
mod route;
mod ticket;
mod view;

pub use catalog::{EnglishCatalog, MessageCatalog, field_of};
pub use controller::{Call, Completion, Controller, CredentialsInput, Effect, Event, GateStatus};
pub use driver::Engine;
pub use route::{GateDecision, IdentityRequirement, Route, gate};
pub use ticket::{Activation, FetchTicket};
pub use view::{AuthForm, Composer, HomeView, LoadState, Notice, ThreadView, UserInfoView, View};
