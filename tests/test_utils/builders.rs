use std::sync::{Arc, Mutex};

use volume_bridge::system::mocks::MockAudioSystem;
use volume_bridge::system::Capabilities;
use volume_bridge::volume::{RingerMode, StreamType};

/// Builder for mock audio backends in test scenarios
pub struct MockSystemBuilder {
    mock: MockAudioSystem,
}

impl MockSystemBuilder {
    pub fn new() -> Self {
        Self {
            mock: MockAudioSystem::new(),
        }
    }

    pub fn ringer_mode(self, mode: RingerMode) -> Self {
        *self.mock.ringer_mode.lock().unwrap() = mode;
        self
    }

    pub fn volume(self, stream: StreamType, current: u32, max: u32) -> Self {
        self.mock.set_mock_volume(stream, current, max);
        self
    }

    pub fn mute_switch(self, engaged: bool) -> Self {
        self.mock.set_mock_mute_switch(engaged);
        self
    }

    pub fn capabilities(self, capabilities: Capabilities) -> Self {
        *self.mock.capabilities.lock().unwrap() = capabilities;
        self
    }

    pub fn unsupported(self) -> Self {
        self.capabilities(Capabilities::default())
    }

    pub fn applied_ringer_override(self, mode: RingerMode) -> Self {
        *self.mock.applied_ringer_override.lock().unwrap() = Some(mode);
        self
    }

    pub fn build(self) -> MockAudioSystem {
        self.mock
    }
}

impl Default for MockSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects delivered events so tests can assert on exact delivery order
pub struct EventSink<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone + Send + 'static> EventSink<E> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn callback(&self) -> impl Fn(&E) + Send + Sync + 'static {
        let events = self.events.clone();
        move |event: &E| events.lock().unwrap().push(event.clone())
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Clone + Send + 'static> Default for EventSink<E> {
    fn default() -> Self {
        Self::new()
    }
}
