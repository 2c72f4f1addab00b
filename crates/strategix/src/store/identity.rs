use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Signed-in visitor as reported by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            full_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Email used for the duplicate-application lookup, if the provider shared one.
    pub fn lookup_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;
    /// Receiver that observes every sign-in and sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Session-scoped identity holder backed by a watch channel.
#[derive(Debug)]
pub struct SessionIdentity {
    sender: watch::Sender<Option<Identity>>,
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionIdentity {
    pub fn new(initial: Option<Identity>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn sign_in(&self, identity: Identity) {
        tracing::debug!(identity_id = %identity.id, "identity signed in");
        self.sender.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        tracing::debug!("identity signed out");
        self.sender.send_replace(None);
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_not_used_for_lookup() {
        let identity = Identity::new("user-1").with_email("   ");
        assert_eq!(identity.lookup_email(), None);
        assert_eq!(
            Identity::new("user-2")
                .with_email(" dev@example.com ")
                .lookup_email(),
            Some("dev@example.com")
        );
    }

    #[tokio::test]
    async fn subscribers_observe_sign_in() {
        let session = SessionIdentity::default();
        let mut changes = session.subscribe();
        assert!(session.current_identity().is_none());

        session.sign_in(Identity::new("user-9").with_email("nine@example.com"));
        changes.changed().await.expect("sender alive");

        let seen = changes.borrow_and_update().clone();
        assert_eq!(seen.map(|identity| identity.id), Some("user-9".to_string()));
    }
}
