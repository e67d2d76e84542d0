use std::fmt;

use reqwest::Method;

/// Remote operations exposed by the board API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Login,
    ListThreads,
    CreateThread,
    ListThreadPosts,
    CreatePost,
    /// Auxiliary lookup of the account details behind an identity.
    IdentityDetails,
}

impl Operation {
    pub const ALL: [Self; 7] = [
        Self::Register,
        Self::Login,
        Self::ListThreads,
        Self::CreateThread,
        Self::ListThreadPosts,
        Self::CreatePost,
        Self::IdentityDetails,
    ];

    /// Endpoint path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Register => "register_user.php",
            Self::Login => "login.php",
            Self::ListThreads => "get_threads.php",
            Self::CreateThread => "create_thread.php",
            Self::ListThreadPosts => "get_thread_posts.php",
            Self::CreatePost => "create_post_to_thread.php",
            Self::IdentityDetails => "get_user_email.php",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Register | Self::Login | Self::CreateThread | Self::CreatePost => Method::POST,
            Self::ListThreads | Self::ListThreadPosts | Self::IdentityDetails => Method::GET,
        }
    }

    /// True for calls that change server state.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Register | Self::Login | Self::CreateThread | Self::CreatePost
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::ListThreads => "list_threads",
            Self::CreateThread => "create_thread",
            Self::ListThreadPosts => "list_thread_posts",
            Self::CreatePost => "create_post",
            Self::IdentityDetails => "identity_details",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
