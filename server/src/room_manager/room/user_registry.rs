use std::collections::{BTreeSet, HashMap, HashSet};

use super::user_session_handle::UserSessionHandle;

#[derive(Debug, Default)]
pub struct UserRegistry {
    name_to_sessions: HashMap<String, HashSet<String>>,
    names: BTreeSet<String>,
}

/// [UserRegistry] keeps track of the members connected to a room
///
/// The same name can be connected more than once, so every name points to its live sessions
impl UserRegistry {
    pub fn new() -> Self {
        UserRegistry::default()
    }

    /// Registers a session, returns true if the name was not connected before
    pub fn insert(&mut self, user_session_handle: &UserSessionHandle) -> bool {
        let sessions = self
            .name_to_sessions
            .entry(String::from(user_session_handle.user_name()))
            .or_default();

        sessions.insert(String::from(user_session_handle.session_id()));

        let is_new_user = sessions.len() == 1;

        if is_new_user {
            self.names
                .insert(String::from(user_session_handle.user_name()));
        }

        is_new_user
    }

    /// Drops a session, returns true if the name has no session left
    /// Unknown sessions are ignored
    pub fn remove(&mut self, user_session_handle: &UserSessionHandle) -> bool {
        let name = user_session_handle.user_name();

        let Some(sessions) = self.name_to_sessions.get_mut(name) else {
            return false;
        };

        if !sessions.remove(user_session_handle.session_id()) {
            return false;
        }

        if sessions.is_empty() {
            self.name_to_sessions.remove(name);
            self.names.remove(name);

            true
        } else {
            false
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn session_count(&self) -> usize {
        self.name_to_sessions.values().map(HashSet::len).sum()
    }
}
