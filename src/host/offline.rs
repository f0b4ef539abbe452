use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use crate::{
    error::{EngineError, Result},
    graph::VoiceGraph,
    host::{AudioContext, AudioHost, Renderer, StreamInfo},
};

/*
Offline Host
============

A host with no device behind it. Contexts render only when asked to,
through `OfflineHost::render`, which makes playback deterministic and lets
tests look at the graph a session handed over.

Clones share state, so a test can keep one clone while the session owns
another:

    let host = OfflineHost::new(48_000, 2);
    let mut session = PlaybackSession::new("rain", host.clone(), preset, config);
    session.start()?;
    assert_eq!(host.contexts_opened(), 1);
    let audio = host.render(4_800);

`set_available(false)` makes `open()` fail like a machine without an output
device would.
*/

type Slot = Arc<Mutex<Option<Renderer>>>;

struct Shared {
    info: StreamInfo,
    available: AtomicBool,
    opened: AtomicUsize,
    closed: AtomicUsize,
    slots: Mutex<Vec<Slot>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<Renderer>> {
    lock(&**slot)
}

#[derive(Clone)]
pub struct OfflineHost {
    shared: Arc<Shared>,
}

impl OfflineHost {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            shared: Arc::new(Shared {
                info: StreamInfo {
                    sample_rate,
                    channels,
                },
                available: AtomicBool::new(true),
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
                slots: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn info(&self) -> StreamInfo {
        self.shared.info
    }

    /// Make later `open()` calls fail with `PlatformUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::SeqCst);
    }

    pub fn contexts_opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub fn contexts_closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    pub fn live_contexts(&self) -> usize {
        self.contexts_opened() - self.contexts_closed()
    }

    fn latest_playing(&self) -> Option<Slot> {
        lock(&self.shared.slots)
            .iter()
            .rev()
            .find(|slot| lock_slot(slot).is_some())
            .cloned()
    }

    /// Render `frames` interleaved frames from the newest playing context.
    /// `None` when nothing is playing.
    pub fn render(&self, frames: usize) -> Option<Vec<f32>> {
        let slot = self.latest_playing()?;
        let mut guard = lock_slot(&slot);
        let renderer = guard.as_mut()?;
        let mut out = vec![0.0f32; frames * renderer.channels()];
        renderer.process(&mut out);
        Some(out)
    }

    /// Inspect the graph of the newest playing context.
    pub fn with_latest_graph<T>(&self, f: impl FnOnce(&VoiceGraph) -> T) -> Option<T> {
        let slot = self.latest_playing()?;
        let guard = lock_slot(&slot);
        let inspected = guard.as_ref().map(|renderer| f(renderer.graph()));
        inspected
    }
}

impl AudioHost for OfflineHost {
    type Context = OfflineContext;

    fn open(&self) -> Result<OfflineContext> {
        if !self.shared.available.load(Ordering::SeqCst) {
            return Err(EngineError::platform("offline host marked unavailable"));
        }
        self.shared.opened.fetch_add(1, Ordering::SeqCst);

        let slot: Slot = Arc::new(Mutex::new(None));
        let mut slots = lock(&self.shared.slots);
        slots.retain(|slot| Arc::strong_count(slot) > 1);
        slots.push(Arc::clone(&slot));

        Ok(OfflineContext {
            shared: Arc::clone(&self.shared),
            slot,
        })
    }
}

pub struct OfflineContext {
    shared: Arc<Shared>,
    slot: Slot,
}

impl AudioContext for OfflineContext {
    fn info(&self) -> StreamInfo {
        self.shared.info
    }

    fn play(&mut self, renderer: Renderer) -> Result<()> {
        let mut slot = lock_slot(&self.slot);
        if slot.is_some() {
            return Err(EngineError::stream("context is already playing"));
        }
        *slot = Some(renderer);
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for OfflineContext {
    fn drop(&mut self) {
        lock_slot(&self.slot).take();
    }
}
