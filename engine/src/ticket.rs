//! Activation and fetch tagging.
//!
//! Each navigation starts a new [`Activation`]. Every call the controller emits
//! carries a [`FetchTicket`] naming the activation that issued it, so a result
//! that arrives after its view was replaced can be recognized and dropped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Activation(u64);

impl Activation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub activation: Activation,
    /// Issue order within the activation.
    pub seq: u64,
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.activation, self.seq)
    }
}

/// Issues tickets and remembers which are still current.
#[derive(Debug, Default)]
pub(crate) struct TicketBook {
    activation: Activation,
    next_seq: u64,
    latest_list: Option<u64>,
}

impl TicketBook {
    /// Start a new activation. Tickets from earlier activations become stale.
    pub(crate) fn activate(&mut self) -> Activation {
        self.activation = Activation(self.activation.0 + 1);
        self.next_seq = 0;
        self.latest_list = None;
        self.activation
    }

    pub(crate) fn current(&self) -> Activation {
        self.activation
    }

    pub(crate) fn issue(&mut self, is_list: bool) -> FetchTicket {
        let ticket = FetchTicket {
            activation: self.activation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        if is_list {
            self.latest_list = Some(ticket.seq);
        }
        ticket
    }

    /// A result is current if it belongs to this activation and, for list
    /// fetches, no newer list fetch has been issued since.
    pub(crate) fn accepts(&self, ticket: FetchTicket, is_list: bool) -> bool {
        ticket.activation == self.activation && (!is_list || self.latest_list == Some(ticket.seq))
    }
}
