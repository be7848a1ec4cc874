//! Stateless HTTP request builder and response parser for the deck API.
//!
//! # Design
//! `DeckClient` holds only a `base_url` and carries no mutable state between
//! calls. Each backend route is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Execution of the round-trip happens elsewhere (`DeckApi` or the caller),
//! keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Deck, DeckFields, ExistingFlashcard, Flashcard, FlashcardBody, NewFlashcard};

/// Synchronous, stateless client for the deck API.
#[derive(Debug, Clone)]
pub struct DeckClient {
    base_url: String,
}

impl DeckClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8000/api/go`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_decks(&self, token: &str) -> HttpRequest {
        self.read(HttpMethod::Get, format!("{}/decks", self.base_url), token)
    }

    pub fn build_get_deck(&self, id: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("deck", id)?;
        Ok(self.read(HttpMethod::Get, format!("{}/decks/{id}", self.base_url), token))
    }

    pub fn build_create_deck(&self, fields: &DeckFields, token: &str) -> Result<HttpRequest, ApiError> {
        self.write(HttpMethod::Post, format!("{}/decks", self.base_url), token, fields)
    }

    pub fn build_update_deck(&self, id: &str, fields: &DeckFields, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("deck", id)?;
        self.write(HttpMethod::Put, format!("{}/decks/{id}", self.base_url), token, fields)
    }

    pub fn build_delete_deck(&self, id: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("deck", id)?;
        Ok(self.read(HttpMethod::Delete, format!("{}/decks/{id}", self.base_url), token))
    }

    pub fn build_list_flashcards(&self, deck_id: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let deck_id = require_id("deck", deck_id)?;
        Ok(self.read(
            HttpMethod::Get,
            format!("{}/decks/{deck_id}/flashcards", self.base_url),
            token,
        ))
    }

    pub fn build_get_flashcard(&self, id: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("flashcard", id)?;
        Ok(self.read(HttpMethod::Get, format!("{}/flashcards/{id}", self.base_url), token))
    }

    pub fn build_create_flashcard(
        &self,
        deck_id: &str,
        card: &NewFlashcard,
        token: &str,
    ) -> Result<HttpRequest, ApiError> {
        let deck_id = require_id("deck", deck_id)?;
        self.write(
            HttpMethod::Post,
            format!("{}/decks/{deck_id}/flashcards", self.base_url),
            token,
            &FlashcardBody::from(card),
        )
    }

    pub fn build_update_flashcard(&self, card: &ExistingFlashcard, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("flashcard", &card.id)?;
        self.write(
            HttpMethod::Put,
            format!("{}/flashcards/{id}", self.base_url),
            token,
            &FlashcardBody::from(card),
        )
    }

    pub fn build_delete_flashcard(&self, id: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id("flashcard", id)?;
        Ok(self.read(HttpMethod::Delete, format!("{}/flashcards/{id}", self.base_url), token))
    }

    pub fn parse_list_decks(&self, response: HttpResponse) -> Result<Vec<Deck>, ApiError> {
        parse_list(response)
    }

    pub fn parse_get_deck(&self, response: HttpResponse) -> Result<Deck, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_deck(&self, response: HttpResponse) -> Result<Deck, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_deck(&self, response: HttpResponse) -> Result<Deck, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_deck(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(drop)
    }

    pub fn parse_list_flashcards(&self, response: HttpResponse) -> Result<Vec<Flashcard>, ApiError> {
        parse_list(response)
    }

    pub fn parse_get_flashcard(&self, response: HttpResponse) -> Result<Flashcard, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_flashcard(&self, response: HttpResponse) -> Result<Flashcard, ApiError> {
        parse_json(response)
    }

    /// The backend answers a flashcard update with a status message, not the
    /// card, so only the status matters.
    pub fn parse_update_flashcard(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(drop)
    }

    pub fn parse_delete_flashcard(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(drop)
    }

    fn read(&self, method: HttpMethod, path: String, token: &str) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: vec![bearer(token)],
            body: None,
        }
    }

    fn write<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: String,
        token: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![
                bearer(token),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

/// Rejects blank ids and percent-encodes the rest as one path segment.
/// Ids are opaque, so they are never trimmed or otherwise rewritten.
fn require_id(resource: &'static str, id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::MissingId { resource });
    }
    // URL parsers collapse "." and ".." (encoded or not), so no encoding
    // keeps them inside the resource path.
    if id == "." || id == ".." {
        return Err(ApiError::InvalidId {
            resource,
            id: id.to_string(),
        });
    }
    Ok(encode_segment(id))
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Turn any non-2xx response into `ApiError::Request` carrying the body text
/// verbatim, whitespace included. The body is never parsed on this path; only
/// an empty body gets the generic message.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    let message = if response.body.is_empty() {
        format!("request failed with status {}", response.status)
    } else {
        response.body
    };
    Err(ApiError::Request {
        status: response.status,
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

// The backend encodes an empty collection as `null`.
fn parse_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    parse_json::<Option<Vec<T>>>(response).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "tok";

    fn client() -> DeckClient {
        DeckClient::new("http://localhost:8000/api/go")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn fields() -> DeckFields {
        DeckFields {
            title: "New Deck".to_string(),
            description: "Desc".to_string(),
            labels: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[test]
    fn build_list_decks_produces_correct_request() {
        let req = client().build_list_decks(TOKEN);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/go/decks");
        assert_eq!(req.headers, vec![("authorization".to_string(), "Bearer tok".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_deck_produces_correct_request() {
        let req = client().build_get_deck("1", TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/1");
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_create_deck_produces_correct_request() {
        let req = client().build_create_deck(&fields(), TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/go/decks");
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "New Deck");
        assert_eq!(body["labels"], serde_json::json!(["a", "b"]));
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_deck_targets_deck_path() {
        let req = client().build_update_deck("d-1", &fields(), TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/d-1");
    }

    #[test]
    fn build_delete_deck_has_no_body() {
        let req = client().build_delete_deck("d-1", TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_flashcard_defaults_starred() {
        let card = NewFlashcard {
            front: "Q1".to_string(),
            back: "A1".to_string(),
            starred: None,
        };
        let req = client().build_create_flashcard("d-1", &card, TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/d-1/flashcards");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"front":"Q1","back":"A1","starred":false}));
    }

    #[test]
    fn build_create_flashcard_requires_deck_id() {
        let card = NewFlashcard {
            front: "Q1".to_string(),
            back: "A1".to_string(),
            starred: Some(true),
        };
        let err = client().build_create_flashcard("  ", &card, TOKEN).unwrap_err();
        assert!(matches!(err, ApiError::MissingId { resource: "deck" }));
    }

    #[test]
    fn build_update_flashcard_targets_flashcard_path() {
        let card = ExistingFlashcard {
            id: "fc-1".to_string(),
            front: "Q".to_string(),
            back: "A".to_string(),
            starred: Some(true),
        };
        let req = client().build_update_flashcard(&card, TOKEN).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/api/go/flashcards/fc-1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["starred"], true);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn parse_list_decks_success() {
        let resp = response(200, r#"[{"id":"1","owner_id":"u","title":"T","description":"","labels":["x"]}]"#);
        let decks = client().parse_list_decks(resp).unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].labels, vec!["x".to_string()]);
    }

    #[test]
    fn parse_list_decks_null_is_empty() {
        let decks = client().parse_list_decks(response(200, "null")).unwrap();
        assert!(decks.is_empty());
    }

    #[test]
    fn parse_get_deck_failure_uses_body_text() {
        let err = client().parse_get_deck(response(404, "Deck not found")).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 404, .. }));
        assert_eq!(err.to_string(), "Deck not found");
    }

    #[test]
    fn failure_body_is_not_parsed_as_json() {
        let err = client().parse_list_decks(response(500, r#"{"error":"boom"}"#)).unwrap_err();
        assert_eq!(err.to_string(), r#"{"error":"boom"}"#);
    }

    #[test]
    fn empty_failure_body_falls_back_to_generic_message() {
        let err = client().parse_delete_deck(response(502, "")).unwrap_err();
        assert_eq!(err.to_string(), "request failed with status 502");
    }

    #[test]
    fn parse_create_flashcard_accepts_201() {
        let resp = response(201, r#"{"id":"c","parent_deck":"d","front":"Q","back":"A","starred":true}"#);
        let card = client().parse_create_flashcard(resp).unwrap();
        assert!(card.is_starred());
    }

    #[test]
    fn parse_update_flashcard_ignores_message_body() {
        let resp = response(200, r#"{"message":"Flashcard updated successfully"}"#);
        assert!(client().parse_update_flashcard(resp).is_ok());
    }

    #[test]
    fn parse_delete_flashcard_accepts_204() {
        assert!(client().parse_delete_flashcard(response(204, "")).is_ok());
    }

    #[test]
    fn parse_get_flashcard_bad_json() {
        let err = client().parse_get_flashcard(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn whitespace_failure_body_is_kept_verbatim() {
        let err = client().parse_get_deck(response(500, " \n")).unwrap_err();
        assert_eq!(err.to_string(), " \n");
    }

    #[test]
    fn ids_are_not_trimmed() {
        let req = client().build_get_deck(" 1", TOKEN).unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/%201");
    }

    #[test]
    fn ids_are_percent_encoded_as_one_segment() {
        let req = client().build_get_flashcard("a/b?c#d", TOKEN).unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/go/flashcards/a%2Fb%3Fc%23d");

        let req = client().build_list_flashcards("deck-1.v2", TOKEN).unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/deck-1.v2/flashcards");

        let req = client().build_get_deck("ünï", TOKEN).unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/go/decks/%C3%BCn%C3%AF");
    }

    #[test]
    fn dot_segments_are_rejected() {
        let err = client().build_delete_deck("..", TOKEN).unwrap_err();
        assert!(matches!(err, ApiError::InvalidId { resource: "deck", ref id } if id == ".."));
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = client().build_delete_flashcard(" ", TOKEN).unwrap_err();
        assert!(matches!(err, ApiError::MissingId { resource: "flashcard" }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = DeckClient::new("http://localhost:8000/api/go/");
        assert_eq!(client.build_list_decks(TOKEN).path, "http://localhost:8000/api/go/decks");
    }
}
