use tracing::info;

/// In-memory authentication session. The token is trusted as issued by the
/// backend; nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    token: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        info!("session started");
    }

    pub fn logout(&mut self) {
        self.token = None;
        info!("session ended");
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}
