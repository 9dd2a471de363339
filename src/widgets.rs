//! Headless models of the page behaviors: like clicks, the search
//! autocomplete and the stat panels' active marker.

use crate::client::{ClientError, Suggestion, WarblerApi};
use crate::models::LikeResponse;
use std::{collections::BTreeSet, fmt, str::FromStr};
use tracing::{debug, warn};

pub const LIKE_CLASS: &str = "like";
pub const STAT_CLASS: &str = "stat";
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    id: String,
    classes: BTreeSet<String>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            classes: BTreeSet::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }
}

/// Sends one like request per click on a `.like` element.
///
/// Clicks are neither debounced nor blocked while a request is in flight,
/// so repeated clicks toggle the like repeatedly.
pub struct LikeHandler<A> {
    api: A,
}

impl<A: WarblerApi> LikeHandler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// `Ok(None)` when the target is not a like control.
    pub async fn on_click(&self, target: &Element) -> Result<Option<LikeResponse>, ClientError> {
        if !target.has_class(LIKE_CLASS) {
            return Ok(None);
        }

        match self.api.like(target.id()).await {
            Ok(response) => {
                debug!(
                    message_id = response.message_id,
                    liked = response.liked,
                    likes = response.likes,
                    "like applied"
                );
                Ok(Some(response))
            }
            Err(err) => {
                warn!(message_id = target.id(), "like request failed: {err}");
                Err(err)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    Pending,
    Ready(Vec<Suggestion>),
    Failed,
}

#[derive(Debug, Clone)]
pub struct Autocomplete {
    min_length: usize,
    source: SourceState,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl Autocomplete {
    pub const DEFAULT_MIN_LENGTH: usize = 1;

    pub fn new() -> Self {
        Self {
            min_length: Self::DEFAULT_MIN_LENGTH,
            source: SourceState::Pending,
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Fetches the source once. A failed fetch leaves the widget inactive for good.
    pub async fn initialize<A: WarblerApi>(&mut self, api: &A) -> bool {
        self.resolve(api.suggestions().await);
        self.is_active()
    }

    pub fn resolve(&mut self, result: Result<Vec<Suggestion>, ClientError>) {
        self.source = match result {
            Ok(suggestions) => {
                debug!(count = suggestions.len(), "autocomplete source loaded");
                SourceState::Ready(suggestions)
            }
            Err(err) => {
                warn!("autocomplete source unavailable: {err}");
                SourceState::Failed
            }
        };
    }

    pub fn state(&self) -> &SourceState {
        &self.source
    }

    pub fn is_active(&self) -> bool {
        matches!(self.source, SourceState::Ready(_))
    }

    /// Suggestions whose label contains `term`, ignoring case.
    ///
    /// `None` means no search ran: the source has not resolved or the term
    /// is shorter than the minimum length.
    pub fn search(&self, term: &str) -> Option<Vec<&Suggestion>> {
        let SourceState::Ready(suggestions) = &self.source else {
            return None;
        };
        if term.chars().count() < self.min_length {
            return None;
        }

        let needle = term.to_lowercase();
        Some(
            suggestions
                .iter()
                .filter(|suggestion| suggestion.label().to_lowercase().contains(&needle))
                .collect(),
        )
    }
}

/// Whether activating one stat panel clears the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatMode {
    #[default]
    Accumulate,
    Exclusive,
}

impl StatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StatMode::Accumulate => "accumulate",
            StatMode::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for StatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accumulate" => Ok(StatMode::Accumulate),
            "exclusive" => Ok(StatMode::Exclusive),
            other => Err(format!("expected 'accumulate' or 'exclusive', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatGroup {
    elements: Vec<Element>,
    mode: StatMode,
}

impl StatGroup {
    /// Keeps only the `.stat` elements, in order.
    pub fn collect(elements: impl IntoIterator<Item = Element>, mode: StatMode) -> Self {
        Self {
            elements: elements
                .into_iter()
                .filter(|element| element.has_class(STAT_CLASS))
                .collect(),
            mode,
        }
    }

    /// Marks the element with `id` active. Returns false if no such stat exists.
    pub fn click(&mut self, id: &str) -> bool {
        if !self.elements.iter().any(|element| element.id() == id) {
            return false;
        }

        for element in &mut self.elements {
            if element.id() == id {
                element.add_class(ACTIVE_CLASS);
            } else if self.mode == StatMode::Exclusive {
                element.remove_class(ACTIVE_CLASS);
            }
        }
        true
    }

    pub fn active_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|element| element.has_class(ACTIVE_CLASS))
            .map(Element::id)
            .collect()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}
