use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How `is_due` decides whether a passage should be presented today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuePolicy {
    /// Due only on the exact due date. A passage skipped past its due date
    /// stays undue.
    #[default]
    Exact,
    /// Due on the due date and every day after it.
    OnOrBefore,
}

/// Per-passage scheduling state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyStatistics {
    passage_id: u32,
    last_studied: Option<NaiveDate>,
    study_count: u32,
    correct_in_a_row: u32,
    due_date: NaiveDate,
}

impl StudyStatistics {
    /// Fresh statistics for a passage created on `today`: never studied, due immediately.
    pub fn new(passage_id: u32, today: NaiveDate) -> Self {
        Self {
            passage_id,
            last_studied: None,
            study_count: 0,
            correct_in_a_row: 0,
            due_date: today,
        }
    }

    /// Rebuild statistics from persisted fields. The due date is taken as stored,
    /// since it was derived from the streak on the day it was last set.
    pub fn restore(
        passage_id: u32,
        last_studied: Option<NaiveDate>,
        study_count: u32,
        correct_in_a_row: u32,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            passage_id,
            last_studied,
            study_count,
            correct_in_a_row,
            due_date,
        }
    }

    pub fn passage_id(&self) -> u32 {
        self.passage_id
    }

    pub fn last_studied(&self) -> Option<NaiveDate> {
        self.last_studied
    }

    pub fn study_count(&self) -> u32 {
        self.study_count
    }

    pub fn correct_in_a_row(&self) -> u32 {
        self.correct_in_a_row
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Move these statistics to a renumbered passage.
    pub(crate) fn reassign(&mut self, passage_id: u32) {
        self.passage_id = passage_id;
    }

    pub fn is_due(&self, today: NaiveDate, policy: DuePolicy) -> bool {
        match policy {
            DuePolicy::Exact => self.due_date == today,
            DuePolicy::OnOrBefore => self.due_date <= today,
        }
    }

    /// Record one completed recitation and reschedule.
    pub fn update_after_attempt(&mut self, was_correct: bool, today: NaiveDate) {
        self.correct_in_a_row = if was_correct {
            self.correct_in_a_row.saturating_add(1)
        } else {
            0
        };
        self.due_date = next_due_date(self.correct_in_a_row, today);
        self.study_count = self.study_count.saturating_add(1);
        self.last_studied = Some(today);

        log::debug!(
            "passage {} rescheduled: streak={} due={}",
            self.passage_id,
            self.correct_in_a_row,
            self.due_date
        );
    }
}

/// Interval in whole days for a streak: `floor(streak * 1.5)`.
pub fn interval_days(correct_in_a_row: u32) -> u64 {
    u64::from(correct_in_a_row) * 3 / 2
}

pub fn next_due_date(correct_in_a_row: u32, today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(interval_days(correct_in_a_row)))
        .unwrap_or(NaiveDate::MAX)
}
