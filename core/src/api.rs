//! Async deck operations: token lookup, request building, execution, parsing.
//!
//! # Design
//! Every operation asks the `TokenProvider` exactly once before touching the
//! network; an unusable token fails with `MissingToken` and no requests.
//! Create/edit run their sub-requests one at a time and stop at the first
//! failure. Earlier steps are not rolled back, so the backend may hold a
//! partially applied deck afterwards.

use tracing::{debug, warn};

use crate::auth::{usable, TokenProvider};
use crate::client::DeckClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::study::StudySession;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Deck, DeckFields, Flashcard, FlashcardEdit, NewFlashcard};

#[derive(Debug, Clone)]
pub struct DeckApi<T> {
    client: DeckClient,
    transport: T,
}

impl DeckApi<ReqwestTransport> {
    /// API over reqwest, pointed at the configured backend.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(DeckClient::from_config(config), ReqwestTransport::new())
    }
}

impl<T: Transport> DeckApi<T> {
    pub fn new(client: DeckClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DeckClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_decks(&self, tokens: &impl TokenProvider) -> Result<Vec<Deck>, ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_list_decks(&token)).await?;
        self.client.parse_list_decks(response).inspect_err(log_failure)
    }

    pub async fn get_deck(&self, id: &str, tokens: &impl TokenProvider) -> Result<Deck, ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_get_deck(id, &token)?).await?;
        self.client.parse_get_deck(response).inspect_err(log_failure)
    }

    pub async fn list_flashcards(
        &self,
        deck_id: &str,
        tokens: &impl TokenProvider,
    ) -> Result<Vec<Flashcard>, ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_list_flashcards(deck_id, &token)?).await?;
        self.client.parse_list_flashcards(response).inspect_err(log_failure)
    }

    pub async fn get_flashcard(&self, id: &str, tokens: &impl TokenProvider) -> Result<Flashcard, ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_get_flashcard(id, &token)?).await?;
        self.client.parse_get_flashcard(response).inspect_err(log_failure)
    }

    /// Creates the deck, then each card under it in order.
    pub async fn create_deck_with_flashcards(
        &self,
        fields: &DeckFields,
        cards: &[NewFlashcard],
        tokens: &impl TokenProvider,
    ) -> Result<Deck, ApiError> {
        let token = self.token(tokens).await?;

        let response = self.send(self.client.build_create_deck(fields, &token)?).await?;
        let deck = self.client.parse_create_deck(response).inspect_err(log_failure)?;
        debug!(deck_id = %deck.id, cards = cards.len(), "deck created");

        for (position, card) in cards.iter().enumerate() {
            let request = self.client.build_create_flashcard(&deck.id, card, &token)?;
            let response = self.send(request).await?;
            self.client.parse_create_flashcard(response).inspect_err(|e| {
                warn!(deck_id = %deck.id, position, error = %e, "flashcard create failed");
            })?;
        }

        Ok(deck)
    }

    /// Replaces the deck's fields, then applies each edit in order: existing
    /// cards are updated in place, new cards are created under the deck.
    pub async fn edit_deck_with_flashcards(
        &self,
        id: &str,
        fields: &DeckFields,
        edits: &[FlashcardEdit],
        tokens: &impl TokenProvider,
    ) -> Result<Deck, ApiError> {
        let token = self.token(tokens).await?;

        let response = self.send(self.client.build_update_deck(id, fields, &token)?).await?;
        let deck = self.client.parse_update_deck(response).inspect_err(log_failure)?;

        for (position, edit) in edits.iter().enumerate() {
            let result = match edit {
                FlashcardEdit::Existing(card) => {
                    let response = self.send(self.client.build_update_flashcard(card, &token)?).await?;
                    self.client.parse_update_flashcard(response)
                }
                FlashcardEdit::New(card) => {
                    let response = self.send(self.client.build_create_flashcard(id, card, &token)?).await?;
                    self.client.parse_create_flashcard(response).map(drop)
                }
            };
            result.inspect_err(|e| {
                warn!(deck_id = %id, position, error = %e, "flashcard edit failed");
            })?;
        }

        Ok(deck)
    }

    pub async fn delete_deck(&self, id: &str, tokens: &impl TokenProvider) -> Result<(), ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_delete_deck(id, &token)?).await?;
        self.client.parse_delete_deck(response).inspect_err(log_failure)
    }

    pub async fn delete_flashcard(&self, id: &str, tokens: &impl TokenProvider) -> Result<(), ApiError> {
        let token = self.token(tokens).await?;
        let response = self.send(self.client.build_delete_flashcard(id, &token)?).await?;
        self.client.parse_delete_flashcard(response).inspect_err(log_failure)
    }

    /// Fetches the deck, then its cards, and opens a study session on them.
    /// These are two operations, so `tokens` is consulted twice.
    pub async fn load_study_session(
        &self,
        deck_id: &str,
        tokens: &impl TokenProvider,
    ) -> Result<StudySession, ApiError> {
        let deck = self.get_deck(deck_id, tokens).await?;
        let cards = self.list_flashcards(deck_id, tokens).await?;
        Ok(StudySession::new(deck, cards))
    }

    async fn token(&self, tokens: &impl TokenProvider) -> Result<String, ApiError> {
        usable(tokens.token().await).ok_or_else(|| {
            warn!("no authentication token available");
            ApiError::MissingToken
        })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await.inspect_err(log_failure)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn log_failure(err: &ApiError) {
    warn!(status = ?err.status(), error = %err, "deck api request failed");
}
