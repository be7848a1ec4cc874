//! Study mode: step through a deck's cards and flip them.
//!
//! Navigation wraps in both directions and always lands on the front face.
//! On an empty deck every navigation key is a no-op.

use crate::types::{Deck, Flashcard};

/// Commands bound to keys in study mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyKey {
    Flip,
    Next,
    Prev,
}

impl StudyKey {
    /// Maps a DOM-style key name (`" "`, `"ArrowRight"`, `"ArrowLeft"`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " => Some(StudyKey::Flip),
            "ArrowRight" => Some(StudyKey::Next),
            "ArrowLeft" => Some(StudyKey::Prev),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudySession {
    deck: Deck,
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl StudySession {
    pub fn new(deck: Deck, cards: Vec<Flashcard>) -> Self {
        Self {
            deck,
            cards,
            index: 0,
            flipped: false,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    /// Text of the face currently showing.
    pub fn visible_text(&self) -> Option<&str> {
        self.current().map(|card| {
            if self.flipped {
                card.back.as_str()
            } else {
                card.front.as_str()
            }
        })
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + 1) % self.cards.len();
    }

    pub fn prev(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
    }

    pub fn apply(&mut self, key: StudyKey) {
        match key {
            StudyKey::Flip => self.flip(),
            StudyKey::Next => self.next(),
            StudyKey::Prev => self.prev(),
        }
    }

    /// Applies a key press by name. Returns `false` for unbound keys.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match StudyKey::from_key(key) {
            Some(key) => {
                self.apply(key);
                true
            }
            None => false,
        }
    }
}
