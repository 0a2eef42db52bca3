use std::time::Duration;

use volume_bridge::volume::{MuteSwitchMonitor, MuteSwitchStatus};

mod test_utils;
use test_utils::{EventSink, MockSystemBuilder};

#[test]
fn initial_delivery_is_mandatory_even_without_a_change() {
    // The backend default matches the notifier's internal default (false),
    // yet the first tick must still deliver.
    let mock = MockSystemBuilder::new().mute_switch(false).build();
    let monitor = MuteSwitchMonitor::new(mock);

    let sink: EventSink<MuteSwitchStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());
    monitor.poll_once();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].initial_query);
    assert!(!events[0].is_muted);
}

#[test]
fn delivery_on_change_suppression_on_repeat() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = MuteSwitchMonitor::new(mock);

    let sink: EventSink<MuteSwitchStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());

    monitor.poll_once(); // initial
    monitor.poll_once(); // repeat, suppressed
    monitor.poll_once(); // repeat, suppressed
    control.set_mock_mute_switch(true);
    monitor.poll_once(); // change
    monitor.poll_once(); // repeat, suppressed
    control.set_mock_mute_switch(false);
    monitor.poll_once(); // change

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        (events[0].is_muted, events[0].initial_query),
        (false, true)
    );
    assert_eq!((events[1].is_muted, events[1].initial_query), (true, false));
    assert_eq!(
        (events[2].is_muted, events[2].initial_query),
        (false, false)
    );
}

#[test]
fn observation_restart_resets_the_session() {
    let mock = MockSystemBuilder::new().mute_switch(true).build();
    let monitor = MuteSwitchMonitor::new(mock);

    let sink: EventSink<MuteSwitchStatus> = EventSink::new();
    let sub = monitor.subscribe(sink.callback());
    monitor.poll_once();
    sub.remove();

    // Polling pauses with no subscribers; ticks deliver nothing
    assert!(monitor.is_paused());
    monitor.poll_once();
    assert_eq!(sink.len(), 1);

    // A fresh session delivers an initial event again, even though the
    // value never changed
    let sink2: EventSink<MuteSwitchStatus> = EventSink::new();
    let _sub2 = monitor.subscribe(sink2.callback());
    monitor.poll_once();

    let events = sink2.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].initial_query);
    assert!(events[0].is_muted);
}

#[test]
fn unsupported_backend_returns_noop_subscription() {
    let mock = MockSystemBuilder::new().unsupported().build();
    let monitor = MuteSwitchMonitor::new(mock);

    let sink: EventSink<MuteSwitchStatus> = EventSink::new();
    let sub = monitor.subscribe(sink.callback());
    assert_eq!(monitor.subscriber_count(), 0);
    assert!(monitor.is_paused());

    sub.remove();
    assert!(sink.is_empty());
}

#[tokio::test]
async fn spawned_poller_delivers_on_the_configured_interval() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = MuteSwitchMonitor::new(mock);
    monitor.set_check_interval(Duration::from_millis(10));

    let sink: EventSink<MuteSwitchStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());

    let poller = monitor.spawn();

    // Wait out a few ticks, then flip the switch and wait again
    tokio::time::sleep(Duration::from_millis(100)).await;
    control.set_mock_mute_switch(true);
    tokio::time::sleep(Duration::from_millis(100)).await;

    poller.abort();

    let events = sink.events();
    assert!(events.len() >= 2, "expected initial + change, got {events:?}");
    assert!(events[0].initial_query);
    assert!(!events[0].is_muted);
    assert!(events.last().unwrap().is_muted);
}
