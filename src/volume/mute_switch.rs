use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::{EventEmitter, Subscription, subscription_for};
use crate::system::AudioSystemInterface;

use super::types::MuteSwitchStatus;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Delivery suppression for the poll-based notifier.
///
/// One mandatory initial delivery per observation session, then only
/// changes. Pure state, no clock, so the contract is testable tick by tick.
#[derive(Debug, Default)]
struct DeliveryState {
    last_delivered: Option<bool>,
    initial_reported: bool,
}

impl DeliveryState {
    /// Feed one poll sample; `Some` means deliver to subscribers.
    fn on_sample(&mut self, is_muted: bool) -> Option<MuteSwitchStatus> {
        if self.initial_reported && self.last_delivered == Some(is_muted) {
            return None;
        }

        let initial_query = !self.initial_reported;
        self.initial_reported = true;
        self.last_delivered = Some(is_muted);
        Some(MuteSwitchStatus {
            is_muted,
            initial_query,
        })
    }

    /// Forget the session so the next delivery is an initial one again.
    fn reset(&mut self) {
        self.last_delivered = None;
        self.initial_reported = false;
    }
}

struct PollState {
    delivery: DeliveryState,
    interval: Duration,
    /// Polling is paused whenever nobody is listening, so an idle host pays
    /// no background cost.
    paused: bool,
}

struct MuteSwitchInner<A: AudioSystemInterface> {
    backend: A,
    emitter: EventEmitter<MuteSwitchStatus>,
    state: Mutex<PollState>,
}

/// Poll-driven hardware mute-switch notifier.
///
/// The backend's mute flag is sampled on a fixed interval (default 2 s,
/// adjustable at runtime). Attaching the first subscriber starts a fresh
/// observation session; detaching the last one pauses polling and resets
/// the session.
pub struct MuteSwitchMonitor<A: AudioSystemInterface + 'static> {
    inner: Arc<MuteSwitchInner<A>>,
}

impl<A: AudioSystemInterface + 'static> MuteSwitchMonitor<A> {
    pub fn new(backend: A) -> Self {
        Self {
            inner: Arc::new(MuteSwitchInner {
                backend,
                emitter: EventEmitter::new(),
                state: Mutex::new(PollState {
                    delivery: DeliveryState::default(),
                    interval: DEFAULT_CHECK_INTERVAL,
                    paused: true,
                }),
            }),
        }
    }

    /// Subscribe to mute-switch events. No-op handle on backends without a
    /// hardware mute switch.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MuteSwitchStatus) + Send + Sync + 'static,
    {
        if !self.inner.backend.capabilities().mute_switch {
            debug!("Mute switch subscribe on backend without a switch, returning no-op");
            return Subscription::noop();
        }

        let id = self.inner.emitter.add(Arc::new(callback));
        self.inner.sync_observation();

        subscription_for(&self.inner, move |inner| {
            if inner.emitter.remove(id) {
                inner.sync_observation();
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.emitter.subscriber_count()
    }

    /// Adjust the poll interval; takes effect from the next tick.
    pub fn set_check_interval(&self, interval: Duration) {
        info!("Mute switch check interval set to {:?}", interval);
        self.inner.state.lock().unwrap().interval = interval;
    }

    pub fn check_interval(&self) -> Duration {
        self.inner.state.lock().unwrap().interval
    }

    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().unwrap().paused
    }

    /// Run one poll tick synchronously. The spawned loop calls this every
    /// interval; tests call it directly to avoid waiting on a clock.
    pub fn poll_once(&self) {
        self.inner.poll_once();
    }

    /// Spawn the polling loop on the current tokio runtime. The loop exits
    /// once the monitor (and every subscription handle) has been dropped.
    pub fn spawn(&self) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            loop {
                let interval = match weak.upgrade() {
                    Some(inner) => inner.state.lock().unwrap().interval,
                    None => break,
                };

                tokio::time::sleep(interval).await;

                match weak.upgrade() {
                    Some(inner) => inner.poll_once(),
                    None => break,
                }
            }
            debug!("Mute switch poll loop stopped");
        })
    }
}

impl<A: AudioSystemInterface> MuteSwitchInner<A> {
    /// Pause/resume observation to match subscriber presence. A restart
    /// resets delivery state so the next event is an initial query again.
    fn sync_observation(&self) {
        let has_subscribers = self.emitter.subscriber_count() > 0;
        let mut state = self.state.lock().unwrap();

        if has_subscribers && state.paused {
            info!("Mute switch observation started");
            state.delivery.reset();
            state.paused = false;
        } else if !has_subscribers && !state.paused {
            info!("Mute switch observation paused");
            state.paused = true;
        }
    }

    fn poll_once(&self) {
        let paused = self.state.lock().unwrap().paused;
        if paused {
            return;
        }

        let sample = match self.backend.mute_switch_engaged() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Mute switch sample failed: {e}");
                return;
            }
        };

        let delivery = self.state.lock().unwrap().delivery.on_sample(sample);
        if let Some(status) = delivery {
            debug!(
                "Mute switch event: muted={} initial={}",
                status.is_muted, status.initial_query
            );
            self.emitter.emit(&status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mocks::MockAudioSystem;

    fn collected() -> (
        Arc<Mutex<Vec<MuteSwitchStatus>>>,
        impl Fn(&MuteSwitchStatus) + Send + Sync + 'static,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |status: &MuteSwitchStatus| {
            sink.lock().unwrap().push(*status)
        })
    }

    #[test]
    fn first_delivery_is_initial_query() {
        let mock = MockAudioSystem::new();
        let monitor = MuteSwitchMonitor::new(mock);

        let (events, callback) = collected();
        let _sub = monitor.subscribe(callback);
        monitor.poll_once();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].initial_query);
        assert!(!events[0].is_muted);
    }

    #[test]
    fn unchanged_sample_is_suppressed_changed_sample_is_not() {
        let mock = MockAudioSystem::new();
        let control = mock.handle();
        let monitor = MuteSwitchMonitor::new(mock);

        let (events, callback) = collected();
        let _sub = monitor.subscribe(callback);

        monitor.poll_once();
        monitor.poll_once(); // same value, no delivery
        control.set_mock_mute_switch(true);
        monitor.poll_once();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].initial_query);
        assert!(!events[1].initial_query);
        assert!(events[1].is_muted);
    }

    #[test]
    fn restart_resets_initial_query() {
        let mock = MockAudioSystem::new();
        let monitor = MuteSwitchMonitor::new(mock);

        let (events, callback) = collected();
        let sub = monitor.subscribe(callback);
        monitor.poll_once();
        sub.remove();
        assert!(monitor.is_paused());

        let (events2, callback2) = collected();
        let _sub2 = monitor.subscribe(callback2);
        assert!(!monitor.is_paused());
        monitor.poll_once();

        assert_eq!(events.lock().unwrap().len(), 1);
        let events2 = events2.lock().unwrap();
        assert_eq!(events2.len(), 1);
        assert!(events2[0].initial_query);
    }

    #[test]
    fn polling_is_paused_without_subscribers() {
        let mock = MockAudioSystem::new();
        let monitor = MuteSwitchMonitor::new(mock);
        assert!(monitor.is_paused());
        monitor.poll_once(); // must not panic or deliver anything
    }

    #[test]
    fn interval_is_adjustable() {
        let monitor = MuteSwitchMonitor::new(MockAudioSystem::new());
        assert_eq!(monitor.check_interval(), DEFAULT_CHECK_INTERVAL);
        monitor.set_check_interval(Duration::from_millis(500));
        assert_eq!(monitor.check_interval(), Duration::from_millis(500));
    }
}
