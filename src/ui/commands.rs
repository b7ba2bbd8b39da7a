use std::collections::BTreeMap;

use crate::app::App;
use crate::error::AppError;
use crate::passage::{Passage, Selector, title_problem};
use crate::session::{blank, is_exit, rote, study};
use crate::store::json_store::JsonStore;
use crate::ui::console::Console;

/// Whether the command loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Command {
    fn help(&self) -> &'static str;

    fn execute(
        &self,
        args: &[&str],
        app: &mut App,
        console: &mut dyn Console,
    ) -> Result<Flow, AppError>;
}

/// Commands keyed by name.
pub struct CommandTable {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandTable {
    pub fn new() -> Self {
        let mut table = Self {
            commands: BTreeMap::new(),
        };
        table.register("new", Box::new(NewCommand));
        table.register("print", Box::new(PrintCommand));
        table.register("list", Box::new(ListCommand));
        table.register("study", Box::new(StudyCommand));
        table.register("learn", Box::new(LearnCommand));
        table.register("rote", Box::new(RoteCommand));
        table.register("due", Box::new(DueCommand));
        table.register("save", Box::new(SaveCommand));
        table.register("load", Box::new(LoadCommand));
        table.register("exit", Box::new(ExitCommand));

        let mut entries: Vec<(&'static str, &'static str)> = table
            .commands
            .iter()
            .map(|(name, cmd)| (*name, cmd.help()))
            .collect();
        entries.push(("help", HELP_HELP));
        entries.sort();
        table.register("help", Box::new(HelpCommand { entries }));
        table
    }

    pub fn register(&mut self, name: &'static str, command: Box<dyn Command>) {
        self.commands.insert(name, command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Run one input line. Blank lines do nothing; unknown names are reported.
    pub fn dispatch(
        &self,
        line: &str,
        app: &mut App,
        console: &mut dyn Console,
    ) -> Result<Flow, AppError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let name = name.to_lowercase();
        match self.get(&name) {
            Some(command) => {
                log::debug!("running command {name}");
                command.execute(args, app, console)
            }
            None => {
                console.write_line(&format!("Unrecognized command \"{name}\""))?;
                console.write_line("")?;
                Ok(Flow::Continue)
            }
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

fn select<'a>(app: &'a App, args: &[&str], usage: &'static str) -> Result<&'a Passage, AppError> {
    let selector = Selector::from_args(args).ok_or(AppError::Usage(usage))?;
    app.library.find(&selector)
}

/// Resolve an optional path argument to a store, defaulting to the configured one.
fn store_for<'a>(app: &'a App, args: &[&str], custom: &'a mut Option<JsonStore>) -> &'a JsonStore {
    if args.is_empty() {
        &app.store
    } else {
        custom.insert(JsonStore::new(args.join(" ")))
    }
}

struct NewCommand;

impl Command for NewCommand {
    fn help(&self) -> &'static str {
        "creates a new passage."
    }

    fn execute(&self, _args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let title = loop {
            let Some(title) = console.read_line("title? >>> ")? else {
                return Ok(Flow::Continue);
            };
            if is_exit(&title) {
                console.write_line("")?;
                return Ok(Flow::Continue);
            }
            match title_problem(&title) {
                Some(problem) => {
                    console.write_line(problem)?;
                    console.write_line("")?;
                }
                None => break title,
            }
        };

        let text = loop {
            let Some(text) = console.read_line("text? >>> ")? else {
                return Ok(Flow::Continue);
            };
            if is_exit(&text) {
                console.write_line("")?;
                return Ok(Flow::Continue);
            }
            if !text.trim().is_empty() {
                break text;
            }
        };

        let today = app.today();
        let id = app.library.add(&title, &text, today)?;
        console.write_line(&format!("Added passage {id}: {}", title.trim()))?;
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

struct PrintCommand;

impl Command for PrintCommand {
    fn help(&self) -> &'static str {
        "prints a passage."
    }

    fn execute(&self, args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let passage = select(app, args, "print <title | id>")?;
        console.write_line(&passage.title)?;
        console.write_line("")?;
        console.write_line(passage.text())?;
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

struct ListCommand;

impl Command for ListCommand {
    fn help(&self) -> &'static str {
        "lists passages."
    }

    fn execute(&self, _args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        for passage in app.library.passages() {
            console.write_line(&format!("{}: {}", passage.id, passage.title))?;
        }
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

struct StudyCommand;

impl Command for StudyCommand {
    fn help(&self) -> &'static str {
        "studies every passage due today."
    }

    fn execute(&self, _args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let today = app.today();
        let settings = app.drill_settings();
        let policy = app.config.due_policy;
        let report = study::run(
            &mut app.library,
            console,
            &mut app.rng,
            settings,
            today,
            policy,
        )?;
        if report.studied_anything() && app.can_autosave() {
            app.store.save(&app.library).map_err(AppError::persistence)?;
        }
        Ok(Flow::Continue)
    }
}

struct LearnCommand;

impl Command for LearnCommand {
    fn help(&self) -> &'static str {
        "plays a memorization game with the provided passage."
    }

    fn execute(&self, args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let settings = app.drill_settings();
        let selector = Selector::from_args(args).ok_or(AppError::Usage("learn <title | id>"))?;
        let passage = app.library.find(&selector)?;
        blank::run(passage, console, &mut app.rng, settings)?;
        Ok(Flow::Continue)
    }
}

struct RoteCommand;

impl Command for RoteCommand {
    fn help(&self) -> &'static str {
        "tests recitation of the provided passage in one attempt."
    }

    fn execute(&self, args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let passage = select(app, args, "rote <title | id>")?;
        rote::run(passage, console, app.drill_settings())?;
        Ok(Flow::Continue)
    }
}

struct DueCommand;

impl Command for DueCommand {
    fn help(&self) -> &'static str {
        "lists passages due today."
    }

    fn execute(&self, _args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let due = app.library.due_ids(app.today(), app.config.due_policy);
        if due.is_empty() {
            console.write_line("Nothing is due today.")?;
        }
        for id in due {
            let (Some(passage), Some(stats)) = (app.library.get(id), app.library.stats(id)) else {
                continue;
            };
            console.write_line(&format!(
                "{}: {} (due {})",
                passage.id,
                passage.title,
                stats.due_date()
            ))?;
        }
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

struct SaveCommand;

impl Command for SaveCommand {
    fn help(&self) -> &'static str {
        "saves passages to the data file, or to the given path."
    }

    fn execute(&self, args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let overwrites_unloaded = args.is_empty() && app.load_error().is_some();
        if overwrites_unloaded && !confirm_overwrite(app, console)? {
            console.write_line("Save cancelled.")?;
            console.write_line("")?;
            return Ok(Flow::Continue);
        }

        let mut custom = None;
        let store = store_for(app, args, &mut custom);
        store.save(&app.library).map_err(AppError::persistence)?;
        console.write_line(&format!(
            "Saved {} passage(s) to {}",
            app.library.len(),
            store.path().display()
        ))?;
        console.write_line("")?;
        if overwrites_unloaded {
            app.clear_load_error();
        }
        Ok(Flow::Continue)
    }
}

/// Ask before replacing a data file that could not be read at startup.
fn confirm_overwrite(app: &App, console: &mut dyn Console) -> Result<bool, AppError> {
    console.write_line(&format!(
        "{} failed to load, so saving replaces everything in it.",
        app.store.path().display()
    ))?;
    let answer = console.read_line("overwrite? (yes/no) >>> ")?;
    Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("yes")))
}

struct LoadCommand;

impl Command for LoadCommand {
    fn help(&self) -> &'static str {
        "loads passages from the data file, or from the given path."
    }

    fn execute(&self, args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        let today = app.today();
        let mut custom = None;
        let store = store_for(app, args, &mut custom);
        if !store.exists() {
            return Err(AppError::Persistence(format!(
                "{} does not exist",
                store.path().display()
            )));
        }
        let loaded = store.load(today).map_err(AppError::persistence)?;
        let count = loaded.len();
        let renumbered = app.library.merge(loaded, today)?;
        console.write_line(&format!("Loaded {count} passage(s)."))?;
        if renumbered > 0 {
            console.write_line(&format!(
                "{renumbered} passage(s) were given new ids to avoid collisions."
            ))?;
        }
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

const HELP_HELP: &str = "prints a short description of all commands.";

struct HelpCommand {
    entries: Vec<(&'static str, &'static str)>,
}

impl Command for HelpCommand {
    fn help(&self) -> &'static str {
        HELP_HELP
    }

    fn execute(&self, _args: &[&str], _app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        for (name, help) in &self.entries {
            console.write_line(&format!("{name:<8}{help}"))?;
        }
        console.write_line("")?;
        Ok(Flow::Continue)
    }
}

struct ExitCommand;

impl Command for ExitCommand {
    fn help(&self) -> &'static str {
        "exits the program."
    }

    fn execute(&self, _args: &[&str], app: &mut App, console: &mut dyn Console) -> Result<Flow, AppError> {
        if app.config.autosave && app.load_error().is_some() {
            console.write_line(&format!(
                "Not saving: {} failed to load at startup.",
                app.store.path().display()
            ))?;
        } else if app.can_autosave()
            && let Err(e) = app.store.save(&app.library)
        {
            console.write_line(&AppError::persistence(e).to_string())?;
        }
        Ok(Flow::Quit)
    }
}
