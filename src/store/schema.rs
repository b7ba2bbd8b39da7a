use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::schedule::StudyStatistics;
use crate::passage::{Library, Passage};

pub const SCHEMA_VERSION: u32 = 1;

/// A calendar date stored as three integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRecord {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for DateRecord {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

impl TryFrom<DateRecord> for NaiveDate {
    type Error = anyhow::Error;

    fn try_from(record: DateRecord) -> Result<Self> {
        NaiveDate::from_ymd_opt(record.year, record.month, record.day).with_context(|| {
            format!(
                "invalid date {}-{:02}-{:02}",
                record.year, record.month, record.day
            )
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRecord {
    pub title: String,
    pub text: String,
    pub id: u32,
    #[serde(rename = "tagIDs", default)]
    pub tag_ids: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    #[serde(rename = "passageID")]
    pub passage_id: u32,
    #[serde(default)]
    pub last_studied: Option<DateRecord>,
    #[serde(default)]
    pub study_count: u32,
    #[serde(default)]
    pub correct_in_a_row: u32,
    pub due_date: DateRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryData {
    pub schema_version: u32,
    #[serde(default)]
    pub passages: Vec<PassageRecord>,
    #[serde(default)]
    pub statistics: Vec<StatisticsRecord>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            passages: Vec::new(),
            statistics: Vec::new(),
        }
    }
}

impl LibraryData {
    pub fn from_library(library: &Library) -> Self {
        let passages = library
            .passages()
            .iter()
            .map(|p| PassageRecord {
                title: p.title.clone(),
                text: p.text().to_string(),
                id: p.id,
                tag_ids: p.tag_ids.clone(),
            })
            .collect();
        let statistics = library
            .passages()
            .iter()
            .filter_map(|p| library.stats(p.id))
            .map(|s| StatisticsRecord {
                passage_id: s.passage_id(),
                last_studied: s.last_studied().map(DateRecord::from),
                study_count: s.study_count(),
                correct_in_a_row: s.correct_in_a_row(),
                due_date: s.due_date().into(),
            })
            .collect();
        Self {
            schema_version: SCHEMA_VERSION,
            passages,
            statistics,
        }
    }

    /// Rebuild a library. Passages without statistics are due `today`;
    /// statistics for unknown passages are dropped. Duplicate ids within one
    /// file are rejected.
    pub fn into_library(self, today: NaiveDate) -> Result<Library> {
        if self.schema_version != SCHEMA_VERSION {
            bail!(
                "Unsupported schema version: {} (expected {})",
                self.schema_version,
                SCHEMA_VERSION
            );
        }

        let mut stats: Vec<StatisticsRecord> = self.statistics;
        let mut library = Library::new();
        for record in self.passages {
            if library.get(record.id).is_some() {
                bail!("duplicate passage id {}", record.id);
            }
            let passage = Passage::new(record.id, &record.title, &record.text, record.tag_ids);
            let passage_stats = match stats.iter().position(|s| s.passage_id == record.id) {
                Some(pos) => {
                    let s = stats.swap_remove(pos);
                    let last_studied = s.last_studied.map(NaiveDate::try_from).transpose()?;
                    StudyStatistics::restore(
                        s.passage_id,
                        last_studied,
                        s.study_count,
                        s.correct_in_a_row,
                        s.due_date.try_into()?,
                    )
                }
                None => {
                    log::warn!("passage {} has no statistics; scheduling it for today", record.id);
                    StudyStatistics::new(record.id, today)
                }
            };
            library.insert(passage, passage_stats);
        }

        for orphan in &stats {
            log::warn!(
                "dropping statistics for unknown passage {}",
                orphan.passage_id
            );
        }
        Ok(library)
    }
}
