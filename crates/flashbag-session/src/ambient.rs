use tracing::debug;

use crate::shared::SharedSession;

/// The request-scoped session context a host resolves before handling a
/// request.
///
/// Passed explicitly to [`crate::open`]; flash stores built without their own
/// backing store fall back to the session held here. Until [`start`] is
/// called there is no session and that fallback fails.
///
/// [`start`]: AmbientSession::start
#[derive(Debug, Clone, Default)]
pub struct AmbientSession {
    session: Option<SharedSession>,
}

impl AmbientSession {
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn with_session(session: SharedSession) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Start a session if none is active, returning a handle to it.
    pub fn start(&mut self) -> SharedSession {
        self.session
            .get_or_insert_with(|| {
                debug!("starting ambient session");
                SharedSession::new()
            })
            .clone()
    }

    pub fn session(&self) -> Option<&SharedSession> {
        self.session.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// End the current session, returning it if one was active.
    pub fn end(&mut self) -> Option<SharedSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_has_no_session() {
        let ambient = AmbientSession::uninitialized();
        assert!(!ambient.is_started());
        assert!(ambient.session().is_none());
    }

    #[test]
    fn start_is_idempotent() {
        let mut ambient = AmbientSession::uninitialized();
        let first = ambient.start();
        let second = ambient.start();
        assert!(first.same_session(&second));
        assert!(ambient.end().is_some());
        assert!(!ambient.is_started());
    }
}
