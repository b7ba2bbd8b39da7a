use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::passage::Library;
use crate::session::DrillSettings;
use crate::store::json_store::JsonStore;

/// State shared by every command for the lifetime of one session.
pub struct App {
    pub library: Library,
    pub config: Config,
    pub store: JsonStore,
    pub rng: SmallRng,
    fixed_today: Option<NaiveDate>,
    load_error: Option<String>,
}

impl App {
    /// An app with an empty library backed by the configured data file.
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new(&config.data_file);
        Self {
            library: Library::new(),
            config,
            store,
            rng: SmallRng::from_entropy(),
            fixed_today: None,
            load_error: None,
        }
    }

    /// Like `new`, then load the data file. A file that fails to load leaves
    /// the session empty and is never written back by autosave.
    pub fn open(config: Config) -> Self {
        let mut app = Self::new(config);
        let today = app.today();
        match app.store.load(today) {
            Ok(library) => app.library = library,
            Err(e) => {
                log::warn!("could not load {}: {e:#}", app.store.path().display());
                app.load_error = Some(format!("{e:#}"));
            }
        }
        app
    }

    /// Why the data file failed to load at startup, if it did.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Called once the data file has been deliberately overwritten.
    pub fn clear_load_error(&mut self) {
        self.load_error = None;
    }

    pub fn can_autosave(&self) -> bool {
        self.config.autosave && self.load_error.is_none()
    }

    /// Pin the calendar and the RNG, for reproducible sessions.
    pub fn with_fixed_day(mut self, today: NaiveDate, seed: u64) -> Self {
        self.fixed_today = Some(today);
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn drill_settings(&self) -> DrillSettings {
        DrillSettings::from_config(&self.config)
    }
}
