//! Bearer-token sources.
//!
//! Operations take the provider explicitly instead of reading an ambient
//! session. Any `Fn` closure returning a `'static` future is a provider.

use std::future::Future;

use async_trait::async_trait;

/// Supplies the current bearer token, or `None` when the user is signed out.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

#[async_trait]
impl<F, Fut> TokenProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    async fn token(&self) -> Option<String> {
        (self)().await
    }
}

/// A fixed token, handy for scripts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Filters out empty and whitespace-only tokens.
pub(crate) fn usable(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}
