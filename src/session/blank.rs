use std::io;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::compare::{Comparison, compare};
use crate::passage::{Passage, tokenize};
use crate::session::{ATTEMPT_PROMPT, DrillSettings, feedback, is_exit};
use crate::ui::console::Console;

/// What one attempt did to a progressive-blank drill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    /// The user asked to leave. Nothing changed.
    Exit,
    /// Exact recitation with every word concealed.
    Done,
    /// Exact recitation; the word at this index is now concealed.
    Concealed(usize),
    /// Recitation diverged; the mask is unchanged.
    Rejected(Comparison),
}

/// How a whole progressive-blank drill ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlankOutcome {
    Completed,
    Exit,
}

/// Concealment state over a fixed word sequence.
///
/// The mask only ever gains concealed entries. Unconcealed indices are kept in
/// their own list so each pick is a single uniform draw.
pub struct BlankDrill<'a> {
    words: &'a [String],
    mask: Vec<bool>,
    unconcealed: Vec<usize>,
}

impl<'a> BlankDrill<'a> {
    pub fn new(words: &'a [String]) -> Self {
        Self {
            words,
            mask: vec![false; words.len()],
            unconcealed: (0..words.len()).collect(),
        }
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn concealed_count(&self) -> usize {
        self.words.len() - self.unconcealed.len()
    }

    pub fn is_fully_concealed(&self) -> bool {
        self.unconcealed.is_empty()
    }

    /// Each word followed by a space; concealed words become underscores of
    /// the same length.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (word, &hidden) in self.words.iter().zip(&self.mask) {
            if hidden {
                out.extend(std::iter::repeat_n('_', word.chars().count()));
            } else {
                out.push_str(word);
            }
            out.push(' ');
        }
        out
    }

    pub fn attempt(&mut self, input: &str, rng: &mut SmallRng) -> Turn {
        if is_exit(input) {
            return Turn::Exit;
        }

        let outcome = compare(self.words, &tokenize(input));
        if !outcome.is_match() {
            return Turn::Rejected(outcome);
        }
        if self.is_fully_concealed() {
            return Turn::Done;
        }

        let pick = rng.gen_range(0..self.unconcealed.len());
        let index = self.unconcealed.swap_remove(pick);
        self.mask[index] = true;
        Turn::Concealed(index)
    }
}

/// Drive a progressive-blank drill on `passage` until it completes or the user exits.
pub fn run(
    passage: &Passage,
    console: &mut dyn Console,
    rng: &mut SmallRng,
    settings: DrillSettings,
) -> io::Result<BlankOutcome> {
    log::debug!("learn drill started on passage {}", passage.id);
    let mut drill = BlankDrill::new(passage.words());

    loop {
        if settings.clear_screen {
            console.clear()?;
        }
        console.write_line(&passage.title)?;
        console.write_line("")?;
        console.write_line(&drill.render())?;

        let Some(line) = console.read_line(ATTEMPT_PROMPT)? else {
            log::debug!("input closed during learn drill on passage {}", passage.id);
            return Ok(BlankOutcome::Exit);
        };

        match drill.attempt(&line, rng) {
            Turn::Exit => {
                console.write_line("Exiting.")?;
                console.write_line("")?;
                return Ok(BlankOutcome::Exit);
            }
            Turn::Done => {
                console.write_line("Correct! You recited the whole passage from memory.")?;
                console.write_line("")?;
                log::debug!("learn drill completed on passage {}", passage.id);
                return Ok(BlankOutcome::Completed);
            }
            Turn::Concealed(index) => {
                log::debug!(
                    "concealed word {index} ({}/{})",
                    drill.concealed_count(),
                    passage.words().len()
                );
                console.write_line("Correct!")?;
            }
            Turn::Rejected(outcome) => {
                let message = feedback::describe(outcome, passage.words(), &tokenize(&line));
                console.write_line(&message)?;
            }
        }
        console.pause(settings.pause);
    }
}
