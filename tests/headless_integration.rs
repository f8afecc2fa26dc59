use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use guessword::{
    app::{App, AppState},
    config::SelectionStrategy,
    loader::{load_all, EmbeddedData, LoadedData},
    runtime::{ChannelEventSource, FixedTicker, GameEvent, Runner},
    CompletionReason,
};

fn sequential_data() -> LoadedData {
    let mut data = load_all(&EmbeddedData, None).unwrap();
    data.app.selection.strategy = SelectionStrategy::Sequential;
    data
}

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn send_word(tx: &mpsc::Sender<GameEvent>, word: &str) {
    for c in word.chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
}

/// Minimal event loop, the same shape as the binary's
fn drive<F: Fn(&App) -> bool>(
    app: &mut App,
    runner: &mut Runner<ChannelEventSource, FixedTicker>,
    done: F,
) {
    for _ in 0..10_000u32 {
        if done(app) {
            return;
        }
        match runner.step() {
            GameEvent::Tick(elapsed) => app.on_tick(elapsed).unwrap(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => app.handle_key(key).unwrap(),
        }
    }
    panic!("event loop did not reach the expected state");
}

// Plays a whole round through the runner: every answer right, each answer
// card dismissed by a key press.
#[test]
fn headless_perfect_round() {
    let data = sequential_data();
    let answers: Vec<String> = data.puzzles.iter().map(|p| p.answer.clone()).collect();
    let mut app = App::new(data, None).unwrap();

    let (tx, rx) = mpsc::channel();
    for answer in &answers {
        send_word(&tx, answer);
        tx.send(key(KeyCode::Char(' '))).unwrap();
    }
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(50)),
    );

    drive(&mut app, &mut runner, |app| app.state == AppState::Summary);

    let summary = app.summary.unwrap();
    assert_eq!(summary.reason, CompletionReason::Completed);
    assert_eq!(summary.correct as usize, answers.len());
    assert!(summary.is_perfect());
    assert!(app.effects.confetti.is_active());
}

// The answer card goes away on its own when nobody touches a key.
#[test]
fn headless_answer_card_auto_dismisses() {
    let mut data = sequential_data();
    data.app.answer_card.duration_ms = 20;
    let mut app = App::new(data, None).unwrap();

    let (tx, rx) = mpsc::channel();
    send_word(&tx, "gjetning");
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    drive(&mut app, &mut runner, |app| {
        app.game().is_some_and(|g| g.index() == 1)
    });

    assert_eq!(app.state, AppState::Playing);
    assert_eq!(app.game().unwrap().correct(), 0);
    assert_eq!(app.game().unwrap().total(), 1);
}

#[test]
fn headless_timed_round_runs_out() {
    let mut data = sequential_data();
    data.app.timer.default = 1;
    let mut app = App::new(data, Some("timed".to_string())).unwrap();

    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(10)),
    );

    drive(&mut app, &mut runner, |app| app.state == AppState::Summary);

    assert_eq!(app.summary.unwrap().reason, CompletionReason::Timeup);
}

#[test]
fn headless_replay_in_other_mode() {
    let mut app = App::new(sequential_data(), None).unwrap();

    let (tx, rx) = mpsc::channel();
    tx.send(key(KeyCode::Esc)).unwrap();
    tx.send(key(KeyCode::Char('m'))).unwrap();
    let mut runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(1)),
    );

    drive(&mut app, &mut runner, |app| app.mode == "timed");

    assert_eq!(app.state, AppState::Playing);
    assert_eq!(app.game().unwrap().time_left(), Some(60));
}
