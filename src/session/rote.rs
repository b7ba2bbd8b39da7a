use std::io;

use crate::engine::compare::{Comparison, compare};
use crate::passage::{Passage, tokenize};
use crate::session::{ATTEMPT_PROMPT, DrillSettings, feedback, is_exit};
use crate::ui::console::Console;

/// Verdict of a single rote recitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoteVerdict {
    Exit,
    Correct,
    Incorrect(Comparison),
}

/// Judge one recitation line against the passage.
pub fn judge(passage: &Passage, input: &str) -> RoteVerdict {
    if is_exit(input) {
        return RoteVerdict::Exit;
    }
    match compare(passage.words(), &tokenize(input)) {
        Comparison::Match => RoteVerdict::Correct,
        outcome => RoteVerdict::Incorrect(outcome),
    }
}

/// Ask for the whole passage once, from memory.
pub fn run(
    passage: &Passage,
    console: &mut dyn Console,
    settings: DrillSettings,
) -> io::Result<RoteVerdict> {
    if settings.clear_screen {
        console.clear()?;
    }
    console.write_line(&format!("Recite \"{}\" from memory.", passage.title))?;
    console.write_line("")?;

    let Some(line) = console.read_line(ATTEMPT_PROMPT)? else {
        return Ok(RoteVerdict::Exit);
    };

    let verdict = judge(passage, &line);
    match verdict {
        RoteVerdict::Exit => console.write_line("Exiting.")?,
        RoteVerdict::Correct => console.write_line("Correct!")?,
        RoteVerdict::Incorrect(outcome) => {
            let message = feedback::describe(outcome, passage.words(), &tokenize(&line));
            console.write_line(&message)?;
            console.pause(settings.pause);
        }
    }
    console.write_line("")?;
    log::debug!("rote drill on passage {}: {verdict:?}", passage.id);
    Ok(verdict)
}
