use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::engine::schedule::{DuePolicy, StudyStatistics};
use crate::error::AppError;

/// Split text into words on runs of whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// A stored unit of text to be memorized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub id: u32,
    pub title: String,
    pub tag_ids: Vec<u32>,
    text: String,
    words: Vec<String>,
}

impl Passage {
    pub fn new(id: u32, title: &str, text: &str, tag_ids: Vec<u32>) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            tag_ids,
            text: text.to_string(),
            words: tokenize(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Why a candidate title was rejected.
pub fn title_problem(title: &str) -> Option<&'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Some("The title of a passage cannot be empty.");
    }
    if trimmed.parse::<i64>().is_ok() {
        return Some("The title of a passage cannot be an integer.");
    }
    if trimmed
        .split_whitespace()
        .next()
        .is_some_and(|first| first.parse::<i64>().is_ok())
    {
        return Some("The first word of a title cannot be an integer.");
    }
    None
}

/// How a command names a passage: by id, or by exact title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Id(u32),
    Title(String),
}

impl Selector {
    /// Build a selector from command arguments. A lone integer is an id;
    /// anything else is a title, rejoined with single spaces.
    pub fn from_args(args: &[&str]) -> Option<Self> {
        if args.is_empty() {
            return None;
        }
        if let [single] = args
            && let Ok(id) = single.parse::<u32>()
        {
            return Some(Selector::Id(id));
        }
        Some(Selector::Title(args.join(" ")))
    }

    pub fn matches(&self, passage: &Passage) -> bool {
        match self {
            Selector::Id(id) => passage.id == *id,
            Selector::Title(title) => passage.title == *title,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "{id}"),
            Selector::Title(title) => f.write_str(title),
        }
    }
}

/// The in-memory passage collection and its scheduling state.
#[derive(Clone, Debug, Default)]
pub struct Library {
    passages: Vec<Passage>,
    stats: BTreeMap<u32, StudyStatistics>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// One past the largest id in use. Fails once `u32::MAX` is taken.
    pub fn next_id(&self) -> Result<u32, AppError> {
        self.passages
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(AppError::InvalidPassage("No passage ids are left."))
    }

    /// Create a passage with the next free id and fresh statistics due `today`.
    pub fn add(&mut self, title: &str, text: &str, today: NaiveDate) -> Result<u32, AppError> {
        if let Some(problem) = title_problem(title) {
            return Err(AppError::InvalidPassage(problem));
        }
        if text.trim().is_empty() {
            return Err(AppError::InvalidPassage("The text of a passage cannot be empty."));
        }
        let id = self.next_id()?;
        self.passages.push(Passage::new(id, title, text, Vec::new()));
        self.stats.insert(id, StudyStatistics::new(id, today));
        log::debug!("added passage {id}");
        Ok(id)
    }

    /// Insert a passage as-is, keeping its id. Callers guarantee uniqueness.
    pub fn insert(&mut self, passage: Passage, stats: StudyStatistics) {
        debug_assert_eq!(passage.id, stats.passage_id());
        self.stats.insert(passage.id, stats);
        self.passages.push(passage);
    }

    /// Append another library, renumbering incoming passages whose id is already taken.
    /// Returns how many passages were renumbered. Nothing is appended if the
    /// renumbering runs out of ids.
    pub fn merge(&mut self, other: Library, today: NaiveDate) -> Result<usize, AppError> {
        let Library {
            passages,
            mut stats,
        } = other;
        let mut merged = self.clone();
        let mut renumbered = 0;
        for mut passage in passages {
            let mut passage_stats = stats
                .remove(&passage.id)
                .unwrap_or_else(|| StudyStatistics::new(passage.id, today));
            if merged.get(passage.id).is_some() {
                let id = merged.next_id()?;
                log::debug!("renumbering loaded passage {} to {id}", passage.id);
                passage.id = id;
                passage_stats.reassign(id);
                renumbered += 1;
            }
            merged.insert(passage, passage_stats);
        }
        *self = merged;
        Ok(renumbered)
    }

    pub fn get(&self, id: u32) -> Option<&Passage> {
        self.passages.iter().find(|p| p.id == id)
    }

    /// First passage matching the selector.
    pub fn find(&self, selector: &Selector) -> Result<&Passage, AppError> {
        self.passages
            .iter()
            .find(|p| selector.matches(p))
            .ok_or_else(|| AppError::NotFound(selector.to_string()))
    }

    pub fn stats(&self, id: u32) -> Option<&StudyStatistics> {
        self.stats.get(&id)
    }

    pub fn stats_mut(&mut self, id: u32) -> Option<&mut StudyStatistics> {
        self.stats.get_mut(&id)
    }

    /// Ids of passages due on `today`, in collection order.
    pub fn due_ids(&self, today: NaiveDate, policy: DuePolicy) -> Vec<u32> {
        self.passages
            .iter()
            .filter(|p| self.stats.get(&p.id).is_some_and(|s| s.is_due(today, policy)))
            .map(|p| p.id)
            .collect()
    }
}
