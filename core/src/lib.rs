//! Async API client core for the flashcard deck service.
//!
//! # Overview
//! `DeckClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `DeckApi` pairs it
//! with a `Transport` and a caller-supplied `TokenProvider` to run the deck
//! and flashcard operations, including the sequential create/edit flows.
//! `StudySession` is the card-flip state used by study mode.
//!
//! # Design
//! - `DeckClient` and `DeckApi` are stateless between calls; no caching.
//! - The bearer token comes from an explicit provider on every operation.
//! - Non-2xx responses become `ApiError::Request` with the backend's text.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod study;
pub mod transport;
pub mod types;

pub use api::DeckApi;
pub use auth::{StaticToken, TokenProvider};
pub use client::DeckClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use study::{StudyKey, StudySession};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Deck, DeckFields, ExistingFlashcard, Flashcard, FlashcardEdit, NewFlashcard};
