use volume_bridge::volume::{Mode, RingerMode, RingerMonitor, SilentStatus, StreamType};

mod test_utils;
use test_utils::{EventSink, MockSystemBuilder};

#[test]
fn reference_counted_subscriber_intent() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    let sink_a: EventSink<SilentStatus> = EventSink::new();
    let sink_b: EventSink<SilentStatus> = EventSink::new();

    let sub_a = monitor.subscribe(sink_a.callback());
    let sub_b = monitor.subscribe(sink_b.callback());
    assert!(control.is_ringer_listener_registered());

    // Removing one of two subscribers keeps the OS listener registered
    sub_a.remove();
    assert!(control.is_ringer_listener_registered());

    // Removing the last one deregisters
    sub_b.remove();
    assert!(!control.is_ringer_listener_registered());
}

#[test]
fn lifecycle_pause_deregisters_resume_reregisters() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    let sink: EventSink<SilentStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());
    assert!(control.is_ringer_listener_registered());

    monitor.on_host_pause();
    assert!(!control.is_ringer_listener_registered());

    // No events are delivered while paused
    control.set_mock_ringer_mode(RingerMode::Silent);
    assert!(sink.is_empty());

    monitor.on_host_resume();
    assert!(control.is_ringer_listener_registered());

    control.set_mock_ringer_mode(RingerMode::Vibrate);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.events()[0].mode, Mode::Vibrate);
}

#[test]
fn resume_without_subscribers_does_not_register() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    monitor.on_host_resume();
    assert!(!control.is_ringer_listener_registered());
}

#[test]
fn destroy_deregisters() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    let sink: EventSink<SilentStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());
    monitor.on_host_destroy();
    assert!(!control.is_ringer_listener_registered());
}

#[test]
fn registration_failure_is_not_observable_to_the_caller() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    control.set_registration_failure(true);

    let monitor = RingerMonitor::new(mock);
    let sink: EventSink<SilentStatus> = EventSink::new();

    // Subscribe succeeds even though the backend refused registration;
    // the invariant self-heals on the next lifecycle transition.
    let sub = monitor.subscribe(sink.callback());
    assert_eq!(monitor.subscriber_count(), 1);

    control.set_registration_failure(false);
    monitor.on_host_pause();
    monitor.on_host_resume();
    assert!(control.is_ringer_listener_registered());

    sub.remove();
    assert!(!control.is_ringer_listener_registered());
}

#[test]
fn every_broadcast_is_forwarded_without_deduplication() {
    let mock = MockSystemBuilder::new().build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    let sink: EventSink<SilentStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());

    // The same mode broadcast twice is delivered twice
    control.set_mock_ringer_mode(RingerMode::Silent);
    control.set_mock_ringer_mode(RingerMode::Silent);
    assert_eq!(sink.len(), 2);
}

#[test]
fn classifier_runs_against_fresh_volume_state() {
    let mock = MockSystemBuilder::new()
        .volume(StreamType::Music, 0, 15)
        .build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    let sink: EventSink<SilentStatus> = EventSink::new();
    let _sub = monitor.subscribe(sink.callback());

    control.set_mock_ringer_mode(RingerMode::Normal);
    let events = sink.events();
    assert_eq!(events[0].mode, Mode::Muted);
    assert!(events[0].status);

    control.set_mock_volume(StreamType::Music, 10, 15);
    control.trigger_ringer_change();
    let events = sink.events();
    assert_eq!(events[1].mode, Mode::Normal);
    assert!(!events[1].status);
}

#[test]
fn synchronous_query_does_not_need_a_subscriber() {
    let mock = MockSystemBuilder::new()
        .ringer_mode(RingerMode::Vibrate)
        .build();
    let control = mock.handle();
    let monitor = RingerMonitor::new(mock);

    assert_eq!(monitor.is_device_silent().unwrap(), Some(true));
    let status = monitor.silent_status().unwrap().unwrap();
    assert_eq!(status.mode, Mode::Vibrate);
    assert!(!control.is_ringer_listener_registered());
}
