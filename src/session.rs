//! The signed-in user, as seen by this crate
//!
//! Sign-in flows belong to the identity provider. This module only keeps "the current user, or none",
//! hands out its bearer token to the [`Client`](crate::client::Client), and lets view models subscribe to changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// A user, as exposed by the identity provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The stable identifier the API knows this user by
    uid: String,
    email: Option<String>,
    /// The identity token, sent as a bearer token with every request
    id_token: Option<String>,
}

impl User {
    pub fn new<S: ToString>(uid: S) -> Self {
        Self { uid: uid.to_string(), email: None, id_token: None }
    }

    pub fn with_email<S: ToString>(mut self, email: S) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_id_token<S: ToString>(mut self, id_token: S) -> Self {
        self.id_token = Some(id_token.to_string());
        self
    }

    pub fn uid(&self) -> &str               { &self.uid }
    pub fn email(&self) -> Option<&str>     { self.email.as_deref() }
    pub fn id_token(&self) -> Option<&str>  { self.id_token.as_deref() }
}


/// The session context
///
/// Cloning a `Session` is cheap, and every clone shares the same state.
#[derive(Clone, Debug)]
pub struct Session {
    sender: Arc<watch::Sender<Option<User>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session where nobody is signed in
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender: Arc::new(sender) }
    }

    /// Create a session where `user` is already signed in
    pub fn signed_in(user: User) -> Self {
        let session = Self::new();
        session.sign_in(user);
        session
    }

    /// Called when the identity provider reports a signed-in user (or a refreshed token)
    pub fn sign_in(&self, user: User) {
        log::info!("User {} signed in", user.uid());
        self.publish(Some(user));
    }

    pub fn sign_out(&self) {
        log::info!("User signed out");
        self.publish(None);
    }

    fn publish(&self, user: Option<User>) {
        // Unlike `send`, this stores the value even when there is no receiver
        self.sender.send_replace(user);
    }

    pub fn current_user(&self) -> Option<User> {
        self.sender.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.sender.borrow().as_ref().map(|user| user.uid().to_string())
    }

    /// The token to attach to outgoing requests, if any
    pub fn bearer_token(&self) -> Option<String> {
        self.sender.borrow()
            .as_ref()
            .and_then(|user| user.id_token().map(String::from))
    }

    /// Start listening to sign-in and sign-out events.
    ///
    /// Dropping the returned value unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { receiver: self.sender.subscribe() }
    }
}


/// A listener of a [`Session`]. Tie its lifetime to the view that needs it.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<User>>,
}

impl SessionSubscription {
    /// The user at the time of the call
    pub fn current(&self) -> Option<User> {
        self.receiver.borrow().clone()
    }

    /// Wait until the signed-in user changes, and return the new one.
    ///
    /// Returns `None` (the outer option) when the session has been dropped.
    pub async fn changed(&mut self) -> Option<Option<User>> {
        match self.receiver.changed().await {
            Err(_) => None,
            Ok(()) => Some(self.receiver.borrow().clone()),
        }
    }
}
