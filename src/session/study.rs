use std::io;

use chrono::NaiveDate;
use rand::rngs::SmallRng;

use crate::engine::schedule::DuePolicy;
use crate::passage::Library;
use crate::session::blank::{self, BlankOutcome};
use crate::session::rote::{self, RoteVerdict};
use crate::session::DrillSettings;
use crate::ui::console::Console;

/// What a study session did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyReport {
    /// Passages whose statistics were updated, with the correctness recorded.
    pub studied: Vec<(u32, bool)>,
    /// The user left before every due passage was studied.
    pub aborted: bool,
}

impl StudyReport {
    pub fn studied_anything(&self) -> bool {
        !self.studied.is_empty()
    }
}

enum Step {
    Scored(bool),
    Aborted,
}

/// Study every passage due on `today`.
///
/// New passages get a learn drill. Studied passages get one rote attempt and
/// fall back to a learn drill when it fails. Exiting anywhere stops the whole
/// session and leaves the in-progress passage's statistics untouched.
pub fn run(
    library: &mut Library,
    console: &mut dyn Console,
    rng: &mut SmallRng,
    settings: DrillSettings,
    today: NaiveDate,
    policy: DuePolicy,
) -> io::Result<StudyReport> {
    let mut report = StudyReport::default();

    for id in library.due_ids(today, policy) {
        let Some(passage) = library.get(id) else {
            continue;
        };
        let first_time = library.stats(id).is_none_or(|s| s.study_count() == 0);

        let step = if first_time {
            match blank::run(passage, console, rng, settings)? {
                BlankOutcome::Completed => Step::Scored(true),
                BlankOutcome::Exit => Step::Aborted,
            }
        } else {
            match rote::run(passage, console, settings)? {
                RoteVerdict::Exit => Step::Aborted,
                RoteVerdict::Correct => Step::Scored(true),
                RoteVerdict::Incorrect(_) => {
                    log::debug!("rote failed on passage {id}, falling back to learn drill");
                    match blank::run(passage, console, rng, settings)? {
                        BlankOutcome::Completed => Step::Scored(true),
                        BlankOutcome::Exit => Step::Aborted,
                    }
                }
            }
        };

        match step {
            Step::Aborted => {
                log::debug!("study session aborted on passage {id}");
                report.aborted = true;
                return Ok(report);
            }
            Step::Scored(correct) => {
                if let Some(stats) = library.stats_mut(id) {
                    stats.update_after_attempt(correct, today);
                }
                report.studied.push((id, correct));
            }
        }
    }

    if report.studied_anything() {
        console.write_line(&format!(
            "Studied {} passage(s). Nothing else is due today.",
            report.studied.len()
        ))?;
    } else {
        console.write_line("Nothing is due today.")?;
    }
    console.write_line("")?;
    Ok(report)
}
