pub use self::state::{Room, State, User, DEFAULT_PENDING_POT};
pub use self::state_store::StateStore;

pub mod action;
mod state;
#[allow(clippy::module_inception)]
mod state_store;
