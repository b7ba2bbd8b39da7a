use std::time::Duration;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use recite::app::App;
use recite::config::Config;
use recite::engine::compare::{Comparison, compare};
use recite::engine::schedule::DuePolicy;
use recite::passage::{Library, Passage, tokenize};
use recite::session::blank::{self, BlankDrill, BlankOutcome, Turn};
use recite::session::rote::{self, RoteVerdict};
use recite::session::{DrillSettings, study};
use recite::store::json_store::JsonStore;
use recite::ui::commands::CommandTable;
use recite::ui::console::ScriptedConsole;
use recite::ui::repl;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings() -> DrillSettings {
    DrillSettings {
        pause: Duration::from_millis(750),
        clear_screen: true,
    }
}

#[test]
fn quick_fox_learn_drill_conceals_one_word_per_correct_turn() {
    let passage = Passage::new(1, "Fox", "the quick fox", Vec::new());
    let mut drill = BlankDrill::new(passage.words());
    let mut rng = SmallRng::seed_from_u64(17);

    assert_eq!(drill.render(), "the quick fox ");

    for concealed in 1..=3 {
        let turn = drill.attempt("the quick fox", &mut rng);
        assert!(matches!(turn, Turn::Concealed(_)), "turn {concealed}: {turn:?}");
        assert_eq!(drill.mask().iter().filter(|&&m| m).count(), concealed);
        let rendered = drill.render();
        assert!(rendered.contains('_'));
        assert_eq!(rendered.len(), "the quick fox ".len());
    }

    assert_eq!(drill.render(), "___ _____ ___ ");
    assert_eq!(drill.attempt("the quick fox", &mut rng), Turn::Done);
}

#[test]
fn quick_fox_learn_drill_through_console() {
    let passage = Passage::new(1, "Fox", "the quick fox", Vec::new());
    let mut console = ScriptedConsole::new(vec!["the quick fox"; 4]);
    let mut rng = SmallRng::seed_from_u64(17);

    let outcome = blank::run(&passage, &mut console, &mut rng, settings()).unwrap();
    assert_eq!(outcome, BlankOutcome::Completed);
    assert_eq!(console.pauses, vec![Duration::from_millis(750); 3]);
    assert!(console.output.contains(&"the quick fox ".to_string()));
    assert!(console.output.contains(&"___ _____ ___ ".to_string()));
}

#[test]
fn rote_reports_hello_world_mismatch() {
    let passage = Passage::new(1, "Greeting", "hello world", Vec::new());
    let mut console = ScriptedConsole::new(["hello wrld"]);
    let verdict = rote::run(&passage, &mut console, settings()).unwrap();
    assert_eq!(
        verdict,
        RoteVerdict::Incorrect(Comparison::Mismatch { word: 1, char: 1 })
    );
    assert!(console.transcript().contains("you typed \"wrld\", expected \"world\""));
}

#[test]
fn missing_last_word_is_too_short_at_word_one() {
    assert_eq!(
        compare(&["a", "b"], &["a"]),
        Comparison::InputTooShort {
            word: 1,
            char: None
        }
    );
}

#[test]
fn every_word_sequence_matches_itself() {
    for text in ["", "x", "the quick fox", "a  b\tc\nd", "ünïcödé wörds"] {
        let words = tokenize(text);
        assert_eq!(compare(&words, &words), Comparison::Match);
    }
}

#[test]
fn streak_grows_over_days_and_exit_leaves_schedule_alone() {
    let mut library = Library::new();
    let id = library.add("Fox", "the quick fox", day(2026, 10, 19)).unwrap();
    let mut rng = SmallRng::seed_from_u64(5);
    let quiet = DrillSettings {
        pause: Duration::ZERO,
        clear_screen: false,
    };

    // Day 1: first study is a learn drill.
    let mut console = ScriptedConsole::new(vec!["the quick fox"; 4]);
    let report = study::run(&mut library, &mut console, &mut rng, quiet, day(2026, 10, 19), DuePolicy::Exact)
        .unwrap();
    assert_eq!(report.studied, vec![(id, true)]);
    assert_eq!(library.stats(id).unwrap().due_date(), day(2026, 10, 20));

    // Day 2: rote succeeds, streak 2 pushes the due date three days out.
    let mut console = ScriptedConsole::new(["the quick fox"]);
    study::run(&mut library, &mut console, &mut rng, quiet, day(2026, 10, 20), DuePolicy::Exact).unwrap();
    let stats = library.stats(id).unwrap();
    assert_eq!(stats.correct_in_a_row(), 2);
    assert_eq!(stats.due_date(), day(2026, 10, 23));

    // Not due in between.
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let report = study::run(&mut library, &mut console, &mut rng, quiet, day(2026, 10, 21), DuePolicy::Exact)
        .unwrap();
    assert!(!report.studied_anything());

    // Day 5: exit mid-session leaves the schedule alone.
    let mut console = ScriptedConsole::new(["exit"]);
    let report = study::run(&mut library, &mut console, &mut rng, quiet, day(2026, 10, 23), DuePolicy::Exact)
        .unwrap();
    assert!(report.aborted);
    assert_eq!(library.stats(id).unwrap().study_count(), 2);
    assert_eq!(library.stats(id).unwrap().due_date(), day(2026, 10, 23));

    // Same day: a failed rote falls back to the learn drill, which still scores.
    let mut input = vec!["the quick box"];
    input.extend(["the quick fox"; 4]);
    let mut console = ScriptedConsole::new(input);
    let report = study::run(&mut library, &mut console, &mut rng, quiet, day(2026, 10, 23), DuePolicy::Exact)
        .unwrap();
    assert_eq!(report.studied, vec![(id, true)]);
    let stats = library.stats(id).unwrap();
    assert_eq!(stats.correct_in_a_row(), 3);
    assert_eq!(stats.study_count(), 3);
    assert_eq!(stats.due_date(), day(2026, 10, 27));
}

#[test]
fn console_session_creates_studies_and_persists() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("library.json");
    let config = Config {
        data_file: data_file.to_string_lossy().to_string(),
        feedback_pause_ms: 0,
        clear_screen: false,
        autosave: true,
        ..Config::default()
    };
    let mut app = App::new(config.clone()).with_fixed_day(day(2026, 10, 19), 3);
    let mut console = ScriptedConsole::new([
        "new",
        "Amen",
        "so be it",
        "list",
        "due",
        "study",
        "so be it",
        "so be it",
        "so be it",
        "so be it",
        "exit",
    ]);

    repl::run(&mut app, &CommandTable::new(), &mut console).unwrap();
    let transcript = console.transcript();
    assert!(transcript.contains("1: Amen"));
    assert!(transcript.contains("1: Amen (due 2026-10-19)"));
    assert!(transcript.contains("Studied 1 passage(s)"));

    let saved = JsonStore::new(&data_file).load(day(2026, 10, 19)).unwrap();
    let stats = saved.stats(1).unwrap();
    assert_eq!(stats.study_count(), 1);
    assert_eq!(stats.correct_in_a_row(), 1);
    assert_eq!(stats.last_studied(), Some(day(2026, 10, 19)));
    assert_eq!(stats.due_date(), day(2026, 10, 20));

    let reopened = App::open(config);
    assert_eq!(reopened.library.passages(), saved.passages());
}

#[test]
fn unreadable_data_file_survives_a_session() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("library.json");
    let newer = r#"{"schema_version": 2, "passages": [{"title": "Psalm", "text": "The Lord is my shepherd", "id": 1, "tagIDs": []}], "statistics": []}"#;
    std::fs::write(&data_file, newer).unwrap();
    let config = Config {
        data_file: data_file.to_string_lossy().to_string(),
        feedback_pause_ms: 0,
        clear_screen: false,
        autosave: true,
        ..Config::default()
    };

    let mut app = App::open(config).with_fixed_day(day(2026, 10, 19), 3);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    repl::run(&mut app, &CommandTable::new(), &mut console).unwrap();

    assert!(console.transcript().contains("Could not load"));
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), newer);
}
