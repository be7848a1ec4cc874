use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub labels: Vec<String>,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub parent_deck: Uuid,
    pub starred: Option<bool>,
    pub front: String,
    pub back: String,
}

#[derive(Deserialize)]
pub struct DeckInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct FlashcardInput {
    pub front: String,
    pub back: String,
    pub starred: Option<bool>,
}

/// Decks and flashcards are kept in insertion order; bearer tokens map to
/// owner ids on first sight.
#[derive(Default)]
pub struct Store {
    owners: HashMap<String, Uuid>,
    decks: Vec<Deck>,
    flashcards: Vec<Flashcard>,
}

pub type Db = Arc<RwLock<Store>>;

/// Id of the authenticated caller, inserted by `require_bearer`.
#[derive(Clone, Copy)]
struct Owner(Uuid);

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/decks", get(list_decks).post(create_deck))
        .route("/decks/{id}", get(get_deck).put(update_deck).delete(delete_deck))
        .route("/decks/{id}/flashcards", get(list_flashcards).post(create_flashcard))
        .route(
            "/flashcards/{id}",
            get(get_flashcard).put(update_flashcard).delete(delete_flashcard),
        )
        .layer(middleware::from_fn_with_state(db.clone(), require_bearer))
        .with_state(db);
    Router::new().nest("/api/go", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(State(db): State<Db>, mut req: Request, next: Next) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return (StatusCode::UNAUTHORIZED, "Authorization header is required").into_response();
    };
    let token = match value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() && !token.contains(' ') => token.to_string(),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                "Authorization header format must be Bearer {token}",
            )
                .into_response()
        }
    };

    let owner = *db.write().await.owners.entry(token).or_insert_with(Uuid::new_v4);
    debug!(method = %req.method(), path = req.uri().path(), %owner, "authenticated request");
    req.extensions_mut().insert(Owner(owner));
    next.run(req).await
}

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid UUID format".to_string()))
}

fn deck_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Deck not found".to_string())
}

fn flashcard_not_found() -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        "Flashcard not found or access denied".to_string(),
    )
}

fn validate_deck(input: &DeckInput) -> ApiResult<()> {
    if input.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "title is required".to_string()));
    }
    Ok(())
}

fn validate_flashcard(input: &FlashcardInput) -> ApiResult<()> {
    if input.front.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "front is required".to_string()));
    }
    if input.back.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "back is required".to_string()));
    }
    if input.starred.is_none() {
        return Err((StatusCode::BAD_REQUEST, "starred is required".to_string()));
    }
    Ok(())
}

impl Store {
    fn owned_deck(&self, id: Uuid, owner: Uuid) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id && d.owner_id == owner)
    }

    fn owns_card(&self, card: &Flashcard, owner: Uuid) -> bool {
        self.owned_deck(card.parent_deck, owner).is_some()
    }
}

async fn list_decks(State(db): State<Db>, Extension(Owner(owner)): Extension<Owner>) -> Json<Vec<Deck>> {
    let store = db.read().await;
    Json(store.decks.iter().filter(|d| d.owner_id == owner).cloned().collect())
}

async fn get_deck(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deck>> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store.owned_deck(id, owner).cloned().map(Json).ok_or_else(deck_not_found)
}

async fn create_deck(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Json(input): Json<DeckInput>,
) -> ApiResult<Json<Deck>> {
    validate_deck(&input)?;
    let deck = Deck {
        id: Uuid::new_v4(),
        owner_id: owner,
        labels: input.labels.unwrap_or_default(),
        title: input.title,
        description: input.description,
    };
    db.write().await.decks.push(deck.clone());
    Ok(Json(deck))
}

async fn update_deck(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
    Json(input): Json<DeckInput>,
) -> ApiResult<Json<Deck>> {
    let id = parse_id(&id)?;
    validate_deck(&input)?;
    let mut store = db.write().await;
    let deck = store
        .decks
        .iter_mut()
        .find(|d| d.id == id && d.owner_id == owner)
        .ok_or_else(deck_not_found)?;
    deck.title = input.title;
    deck.description = input.description;
    deck.labels = input.labels.unwrap_or_default();
    Ok(Json(deck.clone()))
}

async fn delete_deck(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store.owned_deck(id, owner).ok_or_else(deck_not_found)?;
    store.decks.retain(|d| d.id != id);
    store.flashcards.retain(|f| f.parent_deck != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_flashcards(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(deck_id): Path<String>,
) -> ApiResult<Json<Vec<Flashcard>>> {
    let deck_id = parse_id(&deck_id)?;
    let store = db.read().await;
    store.owned_deck(deck_id, owner).ok_or_else(deck_not_found)?;
    Ok(Json(
        store
            .flashcards
            .iter()
            .filter(|f| f.parent_deck == deck_id)
            .cloned()
            .collect(),
    ))
}

async fn create_flashcard(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(deck_id): Path<String>,
    Json(input): Json<FlashcardInput>,
) -> ApiResult<(StatusCode, Json<Flashcard>)> {
    let deck_id = parse_id(&deck_id)?;
    let mut store = db.write().await;
    if store.owned_deck(deck_id, owner).is_none() {
        return Err((StatusCode::FORBIDDEN, "Access to deck denied".to_string()));
    }
    validate_flashcard(&input)?;
    let card = Flashcard {
        id: Uuid::new_v4(),
        parent_deck: deck_id,
        starred: input.starred,
        front: input.front,
        back: input.back,
    };
    store.flashcards.push(card.clone());
    Ok((StatusCode::CREATED, Json(card)))
}

async fn get_flashcard(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
) -> ApiResult<Json<Flashcard>> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store
        .flashcards
        .iter()
        .find(|f| f.id == id && store.owns_card(f, owner))
        .cloned()
        .map(Json)
        .ok_or_else(flashcard_not_found)
}

async fn update_flashcard(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
    Json(input): Json<FlashcardInput>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id)?;
    validate_flashcard(&input)?;
    let mut store = db.write().await;
    let position = store
        .flashcards
        .iter()
        .position(|f| f.id == id && store.owns_card(f, owner))
        .ok_or_else(flashcard_not_found)?;
    let card = &mut store.flashcards[position];
    card.starred = input.starred;
    card.front = input.front;
    card.back = input.back;
    Ok(Json(serde_json::json!({ "message": "Flashcard updated successfully" })))
}

async fn delete_flashcard(
    State(db): State<Db>,
    Extension(Owner(owner)): Extension<Owner>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let position = store
        .flashcards
        .iter()
        .position(|f| f.id == id && store.owns_card(f, owner))
        .ok_or_else(flashcard_not_found)?;
    store.flashcards.remove(position);
    Ok(StatusCode::NO_CONTENT)
}
