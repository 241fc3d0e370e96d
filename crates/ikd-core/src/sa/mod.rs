//! Security Association (SA) model.
//!
//! SAs exist at two levels sharing one state machine:
//!
//! - [`IkeSession`]: the session-level SA controlling the negotiation with a
//!   peer. It owns every tunnel-level SA negotiated under it.
//! - [`ChildSa`]: a tunnel-level SA protecting an actual data flow,
//!   identified by (protocol, inbound SPI, destination address).
//!
//! # Key Concepts
//!
//! - **Ownership**: a session owns its children outright. The daemon's SA
//!   store owns all live sessions; a checkout yields a temporary exclusive
//!   handle, never a transfer of ownership.
//! - **Passive sessions**: placeholder sessions that never carry traffic.
//!   They are exempt from rekeying and only leave [`SaState::Passive`] on
//!   activation or teardown.
//! - **State validation**: every state change goes through
//!   [`SaState::can_transition_to`]; invalid transitions are rejected with
//!   [`SaError::TransitionNotAllowed`].

mod child;
mod error;
mod keys;
mod session;
mod state;

pub use child::ChildSa;
pub use error::SaError;
pub use keys::{ChildSaKey, IkeSaId, Protocol};
pub use session::IkeSession;
pub use state::SaState;
