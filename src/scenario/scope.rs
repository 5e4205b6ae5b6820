use tracing::{debug, warn};

use crate::browser::driver::{Driver, SessionFactory};
use crate::browser::error::CheckError;

/// Owns a session and quits it exactly once: on `release` or on drop,
/// whichever comes first.
pub struct SessionGuard<S: Driver> {
    session: Option<S>,
}

impl<S: Driver> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// The guarded session. `None` only after release.
    pub fn session(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// Quit the session now. Later calls and the drop are no-ops.
    pub fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            match session.quit() {
                Ok(()) => debug!("browser session released"),
                Err(e) => warn!(error = %e, "browser session teardown failed"),
            }
        }
    }
}

impl<S: Driver> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Acquire a fresh session, run `body` on it, and release it on every exit
/// path, including a panic inside `body`.
pub fn with_session<F, T>(
    factory: &mut F,
    body: impl FnOnce(&mut F::Session) -> T,
) -> Result<T, CheckError>
where
    F: SessionFactory,
{
    let mut guard = SessionGuard::new(factory.create()?);
    let value = match guard.session() {
        Some(session) => body(session),
        None => return Err(CheckError::SessionIo("session released before use".into())),
    };
    guard.release();
    Ok(value)
}
