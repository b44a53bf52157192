use std::sync::mpsc::{self, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::api::BackendApi;
use crate::config::Settings;
use crate::queue::Queue;
use crate::state::{StateHandle, StateStore};

use super::thread::spawn_player_thread;
use super::types::{PlayerCmd, QueueHandle};

/// Handle to the player actor. Cheap to share: surfaces keep a [`Sender`]
/// for commands plus the state/queue handles for reads.
pub struct Player {
    tx: Sender<PlayerCmd>,
    state: StateHandle,
    queue: QueueHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn new(backend: Arc<dyn BackendApi>, settings: Settings) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let store = StateStore::new(settings.playback.volume);
        let state = store.handle();
        let queue: QueueHandle = Arc::new(Mutex::new(Queue::new(
            settings.playback.shuffle,
            settings.playback.loop_mode.into(),
        )));

        let join = spawn_player_thread(rx, tx.clone(), store, queue.clone(), backend, settings);

        Self {
            tx,
            state,
            queue,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Sender clone for surfaces that emit device events or intents from
    /// their own threads.
    pub fn sender(&self) -> Sender<PlayerCmd> {
        self.tx.clone()
    }

    pub fn state_handle(&self) -> StateHandle {
        self.state.clone()
    }

    pub fn queue_handle(&self) -> QueueHandle {
        self.queue.clone()
    }

    /// Consume the one-shot auto-play flag. Called by the surface that just
    /// loaded the current track into the device to decide whether to start
    /// it. This is the single sanctioned mutation outside the actor thread;
    /// it is an atomic swap under the state lock.
    pub fn take_auto_play(&self) -> bool {
        let mut s = self.state.lock().unwrap();
        std::mem::take(&mut s.auto_play)
    }

    /// Stop the actor and wait for it to finish.
    pub fn shutdown(&self) {
        let _ = self.send(PlayerCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
