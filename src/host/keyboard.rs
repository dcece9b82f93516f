//! Keyboard polling worker.
//!
//! A dedicated thread owns the `KeyDispatcher` and the pointer backend. It
//! samples pressed keys every `poll_interval_ms` and serves pointer requests
//! from IPC commands in between, so the core is only ever touched from here.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use device_query::{DeviceQuery, DeviceState};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::pointer::{EnigoPointer, UnavailablePointer};
use crate::config::app as app_config;
use crate::error::{NinError, NinResult};
use crate::nin::{ChordTracker, Direction, HostEmitter, KeyDispatcher, NinCore, PointerDriver};

pub enum HostRequest {
    MoveCursor {
        direction: Direction,
        reply: oneshot::Sender<NinResult<()>>,
    },
    Shutdown,
}

pub struct KeyboardWorker {
    tx: Sender<HostRequest>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl KeyboardWorker {
    pub fn spawn(emitter: Box<dyn HostEmitter>) -> NinResult<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name("nin-keyboard".to_string())
            .spawn(move || run(rx, emitter))?;

        Ok(Self {
            tx,
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Move the pointer one step regardless of mode.
    pub async fn move_cursor(&self, direction: Direction) -> NinResult<()> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(HostRequest::MoveCursor { direction, reply })
            .map_err(|_| NinError::WorkerUnavailable)?;
        response.await.map_err(|_| NinError::WorkerUnavailable)?
    }

    pub fn shutdown(&self) {
        let Some(thread) = self.thread.lock().take() else {
            return;
        };
        let _ = self.tx.send(HostRequest::Shutdown);
        if thread.join().is_err() {
            log::error!("[NIN] Keyboard worker panicked");
        }
    }
}

impl Drop for KeyboardWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn open_pointer() -> Box<dyn PointerDriver> {
    match EnigoPointer::new() {
        Ok(pointer) => Box::new(pointer),
        Err(e) => {
            log::error!("[NIN] Pointer control disabled: {}", e);
            Box::new(UnavailablePointer(e.to_string()))
        },
    }
}

fn run(rx: Receiver<HostRequest>, emitter: Box<dyn HostEmitter>) {
    let device_state = DeviceState::new();
    let core = NinCore::with_step(app_config::cursor_step());
    let mut dispatcher = KeyDispatcher::new(core, emitter, open_pointer());
    let mut tracker = ChordTracker::default();

    log::info!("[NIN] Keyboard worker started in {} mode", dispatcher.mode());

    loop {
        let poll = Duration::from_millis(app_config::poll_interval_ms());
        match rx.recv_timeout(poll) {
            Ok(HostRequest::MoveCursor { direction, reply }) => {
                dispatcher.set_step(app_config::cursor_step());
                let _ = reply.send(dispatcher.move_cursor(direction));
            },
            Ok(HostRequest::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {},
        }

        let names: Vec<String> = device_state
            .get_keys()
            .iter()
            .map(|key| format!("{:?}", key))
            .collect();
        if let Some(chord) = tracker.update(&names) {
            dispatcher.set_step(app_config::cursor_step());
            if let Err(e) = dispatcher.dispatch(&chord) {
                log::warn!("[NIN] {}", e);
            }
        }
    }

    log::info!("[NIN] Keyboard worker stopped");
}
