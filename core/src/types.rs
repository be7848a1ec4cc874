//! Domain DTOs for the deck API.
//!
//! # Design
//! These mirror the backend's JSON but are defined independently of the
//! mock-server crate; integration tests catch schema drift. Ids are opaque
//! strings: the client never interprets them.

use serde::{Deserialize, Deserializer, Serialize};

/// A deck as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
}

/// Writable deck fields, sent on create and on full-replace edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
}

/// A flashcard as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub id: String,
    pub parent_deck: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub starred: Option<bool>,
}

impl Flashcard {
    pub fn is_starred(&self) -> bool {
        self.starred.unwrap_or(false)
    }
}

/// A flashcard that does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub starred: Option<bool>,
}

/// A flashcard already stored under some deck, edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExistingFlashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub starred: Option<bool>,
}

/// One entry of a deck edit: update an existing card or create a new one.
///
/// Deserializing picks `Existing` exactly when the record carries a non-null
/// `id`. An `id` of any type other than string is an error, never a new card.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FlashcardEdit {
    Existing(ExistingFlashcard),
    New(NewFlashcard),
}

#[derive(Deserialize)]
struct EditRecord {
    #[serde(default)]
    id: Option<String>,
    front: String,
    back: String,
    #[serde(default)]
    starred: Option<bool>,
}

impl<'de> Deserialize<'de> for FlashcardEdit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let EditRecord {
            id,
            front,
            back,
            starred,
        } = EditRecord::deserialize(deserializer)?;
        Ok(match id {
            Some(id) => FlashcardEdit::Existing(ExistingFlashcard {
                id,
                front,
                back,
                starred,
            }),
            None => FlashcardEdit::New(NewFlashcard { front, back, starred }),
        })
    }
}

impl From<ExistingFlashcard> for FlashcardEdit {
    fn from(card: ExistingFlashcard) -> Self {
        FlashcardEdit::Existing(card)
    }
}

impl From<NewFlashcard> for FlashcardEdit {
    fn from(card: NewFlashcard) -> Self {
        FlashcardEdit::New(card)
    }
}

/// Wire body for flashcard create/update. `starred` is always present.
#[derive(Debug, Serialize)]
pub(crate) struct FlashcardBody<'a> {
    pub front: &'a str,
    pub back: &'a str,
    pub starred: bool,
}

impl<'a> From<&'a NewFlashcard> for FlashcardBody<'a> {
    fn from(card: &'a NewFlashcard) -> Self {
        Self {
            front: &card.front,
            back: &card.back,
            starred: card.starred.unwrap_or(false),
        }
    }
}

impl<'a> From<&'a ExistingFlashcard> for FlashcardBody<'a> {
    fn from(card: &'a ExistingFlashcard) -> Self {
        Self {
            front: &card.front,
            back: &card.back,
            starred: card.starred.unwrap_or(false),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
