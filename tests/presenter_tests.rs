//! Presenter side effects observed through the public mocks.

use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use tokio::sync::mpsc;

use pomotimer::daemon::presenter::Presenter;
use pomotimer::daemon::runner::{Command, TimerRunner};
use pomotimer::daemon::timer::TimerEngine;
use pomotimer::menubar::{TrayIconManager, TrayUpdate};
use pomotimer::notification::{MockNotificationSender, NotificationActionEvent};
use pomotimer::sound::{MockSoundPlayer, SoundSource};
use pomotimer::types::{Configuration, PhaseKind};

fn one_minute_config() -> Configuration {
    Configuration::default()
        .with_work_minutes(1)
        .with_short_break_minutes(1)
        .with_long_break_minutes(1)
        .with_long_break_every(2)
}

#[tokio::test]
async fn test_full_cycle_cues_and_menu_bar() {
    let config = one_minute_config();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(config.clone()).unwrap();
    let state = engine.snapshot();
    let mut runner = TimerRunner::new(engine, event_tx);

    let (tray_tx, tray_rx) = unbounded();
    let mut tray = TrayIconManager::new(state.clone(), config.long_break_every, tray_rx);
    let (mut presenter, mut courier) = Presenter::new(
        config,
        state,
        Some(MockSoundPlayer::new()),
        MockNotificationSender::new(),
        Some(tray_tx),
    );

    let t0 = Instant::now();
    runner.apply(Command::Start, t0).unwrap();
    // Work, short break, work, then into the long break
    for minute in 1..=3 {
        runner.on_tick(t0 + Duration::from_secs(60 * minute));
    }
    while let Ok(event) = event_rx.try_recv() {
        presenter.present(event);
    }
    courier.flush().await;
    tray.process_pending_updates();

    let bodies: Vec<String> = presenter
        .notifier()
        .get_notifications()
        .into_iter()
        .map(|m| m.body)
        .collect();
    assert_eq!(
        bodies,
        vec![
            "Work finished, next: Short break",
            "Break finished, next: Work",
            "Work finished, next: Long break",
        ]
    );

    let sounds = presenter.sound_player().unwrap().get_play_calls();
    assert_eq!(sounds.len(), 3);
    assert!(sounds.iter().all(|s: &SoundSource| !s.name().is_empty()));

    assert_eq!(tray.current_state().phase, PhaseKind::LongBreak);
    assert_eq!(tray.generate_title(), "🌴 01:00");
}

#[test]
fn test_notification_actions_become_commands() {
    let config = one_minute_config();
    let state = TimerEngine::new(config.clone()).unwrap().snapshot();
    let (tray_tx, _tray_rx) = unbounded::<TrayUpdate>();
    let (presenter, _courier): (Presenter<MockSoundPlayer, _>, _) =
        Presenter::new(config, state, None, MockNotificationSender::new(), Some(tray_tx));

    presenter
        .notifier()
        .inject_action_event(NotificationActionEvent::Dismiss);
    presenter
        .notifier()
        .inject_action_event(NotificationActionEvent::StartNext);

    assert_eq!(presenter.pending_commands(), vec![Command::Start]);
}
