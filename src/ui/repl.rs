use std::io;

use crate::app::App;
use crate::error::AppError;
use crate::ui::commands::{CommandTable, Flow};
use crate::ui::console::Console;

pub const COMMAND_PROMPT: &str = ">> ";

/// Read and dispatch commands until `exit` or end of input.
///
/// Command errors are printed and the loop continues. Only a failing console
/// ends the loop early.
pub fn run(app: &mut App, table: &CommandTable, console: &mut dyn Console) -> io::Result<()> {
    if let Some(err) = app.load_error() {
        console.write_line(&format!(
            "Could not load {}: {err}",
            app.store.path().display()
        ))?;
        console.write_line("Autosave is off until the data file is saved with \"save\".")?;
        console.write_line("")?;
    }

    loop {
        let line = match console.read_line(COMMAND_PROMPT)? {
            Some(line) => line,
            None => "exit".to_string(),
        };

        match table.dispatch(&line, app, console) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(AppError::Io(e)) => return Err(e),
            Err(e) => {
                log::debug!("command failed: {e:?}");
                console.write_line(&e.to_string())?;
                console.write_line("")?;
            }
        }
    }
}
