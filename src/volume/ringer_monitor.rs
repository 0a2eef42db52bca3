use anyhow::Result;
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

use crate::events::{EventEmitter, Subscription, subscription_for};
use crate::system::AudioSystemInterface;

use super::classifier::classify;
use super::types::{SilentStatus, StreamType};

/// Registration bookkeeping for a broadcast-style notifier.
///
/// The OS-level listener must be registered exactly when both subscriber
/// intent and host foreground state hold; `sync` re-establishes that
/// invariant after every subscribe/unsubscribe and lifecycle transition.
struct RegistrationState {
    observer_registered: bool,
    foregrounded: bool,
}

struct RingerMonitorInner<A: AudioSystemInterface> {
    backend: A,
    emitter: EventEmitter<SilentStatus>,
    state: Mutex<RegistrationState>,
}

/// Broadcast-driven ringer/silent state notifier.
///
/// Subscribers receive a freshly classified `SilentStatus` every time the
/// backend reports a ringer-mode change. Subscriber intent is reference
/// counted: the backend listener stays registered until the last handle is
/// removed or the host application leaves the foreground.
pub struct RingerMonitor<A: AudioSystemInterface + 'static> {
    inner: Arc<RingerMonitorInner<A>>,
}

impl<A: AudioSystemInterface + 'static> RingerMonitor<A> {
    pub fn new(backend: A) -> Self {
        Self {
            inner: Arc::new(RingerMonitorInner {
                backend,
                emitter: EventEmitter::new(),
                state: Mutex::new(RegistrationState {
                    observer_registered: false,
                    // The host is assumed foregrounded until a lifecycle
                    // hook says otherwise.
                    foregrounded: true,
                }),
            }),
        }
    }

    /// Subscribe to silent-status change events.
    ///
    /// On a backend without a ringer concept this returns a no-op handle and
    /// registers nothing, per the unsupported-platform contract.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SilentStatus) + Send + Sync + 'static,
    {
        if !self.inner.backend.capabilities().ringer_mode {
            debug!("Ringer monitor subscribe on backend without ringer mode, returning no-op");
            return Subscription::noop();
        }

        let id = self.inner.emitter.add(Arc::new(callback));
        RingerMonitorInner::sync_registration(&self.inner);

        subscription_for(&self.inner, move |inner| {
            if inner.emitter.remove(id) {
                RingerMonitorInner::sync_registration(inner);
            }
        })
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.emitter.subscriber_count()
    }

    /// Host application came to the foreground.
    pub fn on_host_resume(&self) {
        debug!("Ringer monitor: host resume");
        self.inner.state.lock().unwrap().foregrounded = true;
        RingerMonitorInner::sync_registration(&self.inner);
    }

    /// Host application left the foreground.
    pub fn on_host_pause(&self) {
        debug!("Ringer monitor: host pause");
        self.inner.state.lock().unwrap().foregrounded = false;
        RingerMonitorInner::sync_registration(&self.inner);
    }

    /// Host application is shutting down.
    pub fn on_host_destroy(&self) {
        debug!("Ringer monitor: host destroy");
        self.inner.state.lock().unwrap().foregrounded = false;
        RingerMonitorInner::sync_registration(&self.inner);
    }

    /// Synchronous one-shot classification, independent of registration.
    ///
    /// Returns `None` on backends without a ringer concept.
    pub fn silent_status(&self) -> Result<Option<SilentStatus>> {
        self.inner.classify_now()
    }

    /// "Is the device currently silent" as a plain boolean.
    pub fn is_device_silent(&self) -> Result<Option<bool>> {
        Ok(self.inner.classify_now()?.map(|status| status.status))
    }
}

impl<A: AudioSystemInterface + 'static> RingerMonitorInner<A> {
    fn classify_now(&self) -> Result<Option<SilentStatus>> {
        if !self.backend.capabilities().ringer_mode {
            return Ok(None);
        }

        let mode = self.backend.ringer_mode()?;
        let current = self.backend.stream_volume(StreamType::Music)?;
        let max = self.backend.stream_max_volume(StreamType::Music)?;
        Ok(Some(classify(mode, current, max)))
    }

    /// Re-establish the registration invariant:
    /// registered iff (subscribers > 0 && foregrounded).
    fn sync_registration(inner: &Arc<Self>) {
        // Backend calls happen outside the state lock; broadcast dispatch
        // takes backend-internal locks before re-entering this state.
        let (want, registered) = {
            let state = inner.state.lock().unwrap();
            let want = inner.emitter.subscriber_count() > 0 && state.foregrounded;
            (want, state.observer_registered)
        };

        if want && !registered {
            let weak: Weak<Self> = Arc::downgrade(inner);
            let result = inner.backend.add_ringer_change_listener(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_ringer_change();
                }
            }));

            match result {
                Ok(()) => info!("Registered ringer change listener"),
                // A duplicate registration means the OS listener is already
                // in place; the invariant holds either way.
                Err(e) => warn!("Ringer listener registration failed, ignoring: {e}"),
            }
            inner.state.lock().unwrap().observer_registered = true;
        } else if !want && registered {
            match inner.backend.remove_ringer_change_listener() {
                Ok(()) => info!("Deregistered ringer change listener"),
                Err(e) => warn!("Ringer listener deregistration failed, ignoring: {e}"),
            }
            inner.state.lock().unwrap().observer_registered = false;
        }
    }

    /// Backend broadcast arrived: classify fresh state and fan out.
    fn handle_ringer_change(&self) {
        let registered = self.state.lock().unwrap().observer_registered;
        if !registered {
            // Late delivery after deregistration, drop it.
            return;
        }

        match self.classify_now() {
            Ok(Some(status)) => {
                debug!("Ringer change: {status}");
                self.emitter.emit(&status);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to classify ringer change: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mocks::MockAudioSystem;
    use crate::volume::types::{Mode, RingerMode};

    fn collected() -> (
        Arc<Mutex<Vec<SilentStatus>>>,
        impl Fn(&SilentStatus) + Send + Sync + 'static,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |status: &SilentStatus| {
            sink.lock().unwrap().push(*status)
        })
    }

    #[test]
    fn first_subscriber_registers_backend_listener() {
        let mock = MockAudioSystem::new();
        let control = mock.handle();
        let monitor = RingerMonitor::new(mock);

        assert!(!control.is_ringer_listener_registered());
        let (_events, callback) = collected();
        let sub = monitor.subscribe(callback);
        assert!(control.is_ringer_listener_registered());

        sub.remove();
        assert!(!control.is_ringer_listener_registered());
    }

    #[test]
    fn broadcast_reclassifies_and_emits() {
        let mock = MockAudioSystem::new();
        let control = mock.handle();
        let monitor = RingerMonitor::new(mock);

        let (events, callback) = collected();
        let _sub = monitor.subscribe(callback);

        control.set_mock_ringer_mode(RingerMode::Vibrate);
        control.set_mock_ringer_mode(RingerMode::Silent);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].mode, Mode::Vibrate);
        assert!(events[0].status);
        assert_eq!(events[1].mode, Mode::Silent);
    }

    #[test]
    fn query_works_without_registration() {
        let mock = MockAudioSystem::new();
        let control = mock.handle();
        let monitor = RingerMonitor::new(mock);

        control.set_mock_ringer_mode(RingerMode::Silent);
        assert_eq!(monitor.is_device_silent().unwrap(), Some(true));
        assert!(!control.is_ringer_listener_registered());
    }

    #[test]
    fn unsupported_backend_yields_noop_subscription() {
        let monitor = RingerMonitor::new(MockAudioSystem::unsupported());
        let (events, callback) = collected();
        let sub = monitor.subscribe(callback);
        assert_eq!(monitor.subscriber_count(), 0);
        sub.remove();
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(monitor.is_device_silent().unwrap(), None);
    }
}
