use anyhow::Result;
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

use crate::events::{EventEmitter, Subscription, subscription_for};
use crate::system::AudioSystemInterface;

use super::types::{StreamType, VolumeEvent};

struct VolumeMonitorInner<A: AudioSystemInterface> {
    backend: A,
    emitter: EventEmitter<VolumeEvent>,
    state: Mutex<VolumeMonitorState>,
}

struct VolumeMonitorState {
    observer_registered: bool,
    foregrounded: bool,
    /// Optional stream filter; events for other streams are dropped.
    category: Option<StreamType>,
}

/// Broadcast-driven volume change notifier.
///
/// Each backend volume callback is turned into a normalized `VolumeEvent`
/// for the stream that changed. Registration follows the same invariant as
/// the ringer monitor: listener registered iff subscribers exist and the
/// host is foregrounded.
pub struct VolumeMonitor<A: AudioSystemInterface + 'static> {
    inner: Arc<VolumeMonitorInner<A>>,
}

impl<A: AudioSystemInterface + 'static> VolumeMonitor<A> {
    pub fn new(backend: A) -> Self {
        Self {
            inner: Arc::new(VolumeMonitorInner {
                backend,
                emitter: EventEmitter::new(),
                state: Mutex::new(VolumeMonitorState {
                    observer_registered: false,
                    foregrounded: true,
                    category: None,
                }),
            }),
        }
    }

    /// Restrict delivered events to a single stream, or lift the restriction
    /// with `None`.
    pub fn set_category(&self, category: Option<StreamType>) {
        self.inner.state.lock().unwrap().category = category;
    }

    /// Subscribe to volume change events. No-op handle on backends without
    /// graded stream volumes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&VolumeEvent) + Send + Sync + 'static,
    {
        if !self.inner.backend.capabilities().stream_volume {
            debug!("Volume monitor subscribe on backend without stream volume, returning no-op");
            return Subscription::noop();
        }

        let id = self.inner.emitter.add(Arc::new(callback));
        VolumeMonitorInner::sync_registration(&self.inner);

        subscription_for(&self.inner, move |inner| {
            if inner.emitter.remove(id) {
                VolumeMonitorInner::sync_registration(inner);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.emitter.subscriber_count()
    }

    pub fn on_host_resume(&self) {
        debug!("Volume monitor: host resume");
        self.inner.state.lock().unwrap().foregrounded = true;
        VolumeMonitorInner::sync_registration(&self.inner);
    }

    pub fn on_host_pause(&self) {
        debug!("Volume monitor: host pause");
        self.inner.state.lock().unwrap().foregrounded = false;
        VolumeMonitorInner::sync_registration(&self.inner);
    }

    pub fn on_host_destroy(&self) {
        debug!("Volume monitor: host destroy");
        self.inner.state.lock().unwrap().foregrounded = false;
        VolumeMonitorInner::sync_registration(&self.inner);
    }
}

impl<A: AudioSystemInterface + 'static> VolumeMonitorInner<A> {
    fn sync_registration(inner: &Arc<Self>) {
        let (want, registered) = {
            let state = inner.state.lock().unwrap();
            let want = inner.emitter.subscriber_count() > 0 && state.foregrounded;
            (want, state.observer_registered)
        };

        if want && !registered {
            let weak: Weak<Self> = Arc::downgrade(inner);
            let result = inner
                .backend
                .add_volume_change_listener(Box::new(move |stream| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_volume_change(stream);
                    }
                }));

            match result {
                Ok(()) => info!("Registered volume change listener"),
                Err(e) => warn!("Volume listener registration failed, ignoring: {e}"),
            }
            inner.state.lock().unwrap().observer_registered = true;
        } else if !want && registered {
            match inner.backend.remove_volume_change_listener() {
                Ok(()) => info!("Deregistered volume change listener"),
                Err(e) => warn!("Volume listener deregistration failed, ignoring: {e}"),
            }
            inner.state.lock().unwrap().observer_registered = false;
        }
    }

    fn handle_volume_change(&self, stream: StreamType) {
        let (registered, category) = {
            let state = self.state.lock().unwrap();
            (state.observer_registered, state.category)
        };
        if !registered {
            return;
        }
        if let Some(category) = category {
            if category != stream {
                debug!("Dropping volume event for filtered stream {stream}");
                return;
            }
        }

        match self.normalized_volume(stream) {
            Ok(volume) => {
                let event = VolumeEvent { volume, stream };
                debug!("Volume change: {stream} -> {volume:.3}");
                self.emitter.emit(&event);
            }
            Err(e) => warn!("Failed to read volume for {stream}: {e}"),
        }
    }

    fn normalized_volume(&self, stream: StreamType) -> Result<f64> {
        let current = self.backend.stream_volume(stream)?;
        let max = self.backend.stream_max_volume(stream)?;
        if max == 0 {
            return Ok(0.0);
        }
        Ok(f64::from(current) / f64::from(max))
    }
}
