//! Authentication lifecycle.
//!
//! [`SessionState`] is changed only through [`reduce`]; the store turns each
//! auth operation into a `Started` event followed by one settle event.

mod reducer;
mod state;

pub use reducer::{SessionEvent, reduce};
pub use state::{AuthActivity, SessionState};
