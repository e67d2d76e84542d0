use std::fmt;

use board_types::{Identity, SessionState, ThreadId};

/// Views a user can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Thread(ThreadId),
    Register,
    Login,
    UserInfo,
}

/// What a view expects of the session before it may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRequirement {
    /// Redirect to registration when no identity is active.
    Required,
    /// Redirect home when an identity is already active.
    Anonymous,
    Any,
}

impl Route {
    #[must_use]
    pub const fn requirement(self) -> IdentityRequirement {
        match self {
            Self::Home | Self::Thread(_) | Self::UserInfo => IdentityRequirement::Required,
            Self::Login => IdentityRequirement::Anonymous,
            Self::Register => IdentityRequirement::Any,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Thread(id) => write!(f, "/thread/{id}"),
            Self::Register => f.write_str("/register-user"),
            Self::Login => f.write_str("/login-user"),
            Self::UserInfo => f.write_str("/user-info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The session is still resolving; show a neutral pending state.
    Pending,
    Redirect(Route),
    /// Proceed, with the active identity when there is one.
    Proceed(Option<Identity>),
}

/// Decide whether `route` may proceed under `session`.
#[must_use]
pub fn gate(route: Route, session: &SessionState) -> GateDecision {
    if session.resolving {
        return GateDecision::Pending;
    }
    match (route.requirement(), &session.identity) {
        (IdentityRequirement::Required, None) => GateDecision::Redirect(Route::Register),
        (IdentityRequirement::Anonymous, Some(_)) => GateDecision::Redirect(Route::Home),
        (_, identity) => GateDecision::Proceed(identity.clone()),
    }
}

#[cfg(test)]
mod tests {
    use board_types::{Identity, SessionState, ThreadId};

    use super::{GateDecision, Route, gate};

    fn signed_in() -> SessionState {
        SessionState::resolved(Some(Identity::new("U1").unwrap()))
    }

    #[test]
    fn every_route_waits_while_resolving() {
        for route in [
            Route::Home,
            Route::Thread(ThreadId::new(1)),
            Route::Register,
            Route::Login,
            Route::UserInfo,
        ] {
            assert_eq!(gate(route, &SessionState::resolving()), GateDecision::Pending);
        }
    }

    #[test]
    fn identity_requiring_routes_redirect_to_registration() {
        let anonymous = SessionState::resolved(None);
        for route in [Route::Home, Route::Thread(ThreadId::new(3)), Route::UserInfo] {
            assert_eq!(
                gate(route, &anonymous),
                GateDecision::Redirect(Route::Register)
            );
        }
    }

    #[test]
    fn login_redirects_home_when_already_signed_in() {
        assert_eq!(
            gate(Route::Login, &signed_in()),
            GateDecision::Redirect(Route::Home)
        );
        assert_eq!(
            gate(Route::Login, &SessionState::resolved(None)),
            GateDecision::Proceed(None)
        );
    }

    #[test]
    fn registration_is_open_to_everyone() {
        assert!(matches!(
            gate(Route::Register, &signed_in()),
            GateDecision::Proceed(Some(_))
        ));
        assert_eq!(
            gate(Route::Register, &SessionState::resolved(None)),
            GateDecision::Proceed(None)
        );
    }

    #[test]
    fn routes_render_as_paths() {
        assert_eq!(Route::Thread(ThreadId::new(12)).to_string(), "/thread/12");
        assert_eq!(Route::Home.to_string(), "/");
    }
}
