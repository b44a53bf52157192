use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::api::{BackendApi, LIKED_BY_USER_TAG};
use crate::config::Settings;
use crate::like::LikeSyncService;
use crate::like::LikeToggle;
use crate::queue::{Advance, ContextKind, LoadTicket, PlayContext, SourceKind};
use crate::seek::SeekDebouncer;
use crate::state::{Origin, PlaybackState, SetTrackOptions, StateStore};
use crate::track::Track;
use crate::transport::{
    DeviceCmd, Surface, TransportController, device_commands, should_apply, track_changed,
};

use super::types::{DeviceEvent, PlayerCmd, QueueHandle};

/// Wakeup interval for debouncer deadlines when no command arrives.
const TICK: Duration = Duration::from_millis(25);

pub(super) fn spawn_player_thread(
    rx: Receiver<PlayerCmd>,
    tx: Sender<PlayerCmd>,
    store: StateStore,
    queue: QueueHandle,
    backend: Arc<dyn BackendApi>,
    settings: Settings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut actor = Actor {
            tx,
            store,
            queue,
            backend,
            debouncer: SeekDebouncer::new(
                Duration::from_millis(settings.seek.debounce_ms),
                Duration::from_millis(settings.seek.grace_ms),
            ),
            like: LikeSyncService::new(),
            surfaces: Vec::new(),
            live: None,
            settings,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(PlayerCmd::Quit) => break,
                Ok(cmd) => {
                    actor.handle(cmd);
                    actor.tick(Instant::now());
                }
                Err(RecvTimeoutError::Timeout) => actor.tick(Instant::now()),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

struct Actor {
    tx: Sender<PlayerCmd>,
    store: StateStore,
    queue: QueueHandle,
    backend: Arc<dyn BackendApi>,
    debouncer: SeekDebouncer,
    like: LikeSyncService,
    surfaces: Vec<Box<dyn Surface>>,
    live: Option<(Origin, Box<dyn TransportController>)>,
    settings: Settings,
}

impl Actor {
    fn handle(&mut self, cmd: PlayerCmd) {
        match cmd {
            PlayerCmd::PlayTrack { track, ctx, origin } => self.play_track(track, ctx, origin),
            PlayerCmd::Play { origin } => self.play(origin),
            PlayerCmd::Pause { origin } => self.pause(origin),
            PlayerCmd::SeekTo { seconds, origin } => self.seek_to(seconds, origin),
            PlayerCmd::SetVolume { level } => self.set_volume(level),
            PlayerCmd::Next { origin } => self.advance(origin),
            PlayerCmd::Prev { origin } => self.step_back(origin),
            PlayerCmd::SetShuffle(on) => self.queue.lock().unwrap().set_shuffle(on),
            PlayerCmd::SetLoopMode(mode) => self.queue.lock().unwrap().set_loop_mode(mode),
            PlayerCmd::ToggleLike { track_id } => self.toggle_like(track_id),
            PlayerCmd::DeviceEvent { origin, event } => self.device_event(origin, event),
            PlayerCmd::RegisterTransport { owner, controller } => {
                self.register_transport(owner, controller)
            }
            PlayerCmd::UnregisterTransport { owner } => self.unregister_transport(owner),
            PlayerCmd::RegisterSurface(surface) => self.surfaces.push(surface),
            PlayerCmd::QueueLoaded {
                ticket,
                kind,
                source_id,
                tracks,
                target,
            } => self.queue_loaded(ticket, kind, source_id, tracks, target),
            PlayerCmd::LikedIdsLoaded { checked, ids } => self.liked_ids_loaded(checked, ids),
            PlayerCmd::LikeResult {
                track_id,
                toggle,
                ok,
            } => self.like_result(track_id, toggle, ok),
            PlayerCmd::Quit => {}
        }
    }

    /// Fire due debouncer deadlines: the coalesced device seek, then the
    /// grace expiry that releases `is_seeking`.
    fn tick(&mut self, now: Instant) {
        if let Some(fired) = self.debouncer.poll(now) {
            debug!(seconds = fired.target, "issuing debounced device seek");
            if let Some((_, controller)) = self.live.as_mut() {
                controller.seek(fired.target);
            }
        }
        if let Some(origin) = self.debouncer.grace_elapsed(now) {
            let prev = self.store.snapshot();
            self.store.set_seeking(false, origin);
            self.sync_surfaces(&prev, false);
        }
    }

    /// Reconcile the live device (when `command_device`) and every passive
    /// surface that did not originate the change. A track identity change
    /// reaches every surface regardless of origin: the one owning the device
    /// must load the new track even when its own event caused the advance.
    fn sync_surfaces(&mut self, prev: &PlaybackState, command_device: bool) {
        let next = self.store.snapshot();
        if command_device {
            if let Some((_, controller)) = self.live.as_mut() {
                for cmd in device_commands(prev, &next) {
                    match cmd {
                        DeviceCmd::Play => controller.play(),
                        DeviceCmd::Pause => controller.pause(),
                        DeviceCmd::SetVolume(level) => controller.set_volume(level),
                    }
                }
            }
        }
        let new_track = track_changed(prev, &next);
        for surface in self.surfaces.iter_mut() {
            if new_track || should_apply(surface.origin(), &next) {
                surface.apply(&next);
            }
        }
    }

    fn live_owner(&self) -> Option<Origin> {
        self.live.as_ref().map(|(owner, _)| *owner)
    }

    fn play_track(&mut self, track: Track, ctx: PlayContext, origin: Origin) {
        // A pending seek belongs to the track being replaced.
        self.debouncer.cancel();

        let prev = self.store.snapshot();
        self.store.set_current_track(
            track.clone(),
            SetTrackOptions {
                is_playing: false,
                current_time: 0.0,
                auto_play: true,
                origin: Some(origin),
            },
        );
        self.sync_surfaces(&prev, false);

        let (kind, source_id) = resolve_source(&ctx, &track);
        {
            let mut q = self.queue.lock().unwrap();
            let same_collection = q
                .source()
                .is_some_and(|(k, id)| *k == kind && *id == source_id);
            if same_collection && q.select(&track.id).is_some() {
                // Same collection, track already queued: just move the
                // position, no reload.
                self.spawn_like_check(track.id.clone());
                return;
            }
            let ticket = q.begin_load();
            self.spawn_queue_load(ticket, kind, source_id, track.id.clone());
        }
        self.spawn_like_check(track.id);
    }

    fn play(&mut self, origin: Origin) {
        let prev = self.store.snapshot();
        if prev.current_track.is_none() || prev.is_playing {
            return;
        }
        self.store.set_playing(true, origin);
        self.sync_surfaces(&prev, true);
    }

    fn pause(&mut self, origin: Origin) {
        let prev = self.store.snapshot();
        if !prev.is_playing {
            return;
        }
        self.store.set_playing(false, origin);
        self.sync_surfaces(&prev, true);
    }

    fn seek_to(&mut self, seconds: f64, origin: Origin) {
        let prev = self.store.snapshot();
        if prev.current_track.is_none() {
            return;
        }

        let mut target = seconds.max(0.0);
        if prev.duration > 0.0 {
            target = target.min(prev.duration);
        }
        if (target - prev.current_time).abs() <= self.settings.seek.min_delta_secs {
            return;
        }

        // Local position updates immediately; only the device command is
        // debounced.
        self.store.set_seeking(true, origin);
        self.store.set_current_time(target, origin);
        self.debouncer.request(target, origin, Instant::now());
        self.sync_surfaces(&prev, false);
    }

    fn set_volume(&mut self, level: u8) {
        let prev = self.store.snapshot();
        self.store.set_volume(level);
        self.sync_surfaces(&prev, true);
    }

    /// Queue advance shared by the explicit Next intent and track-end
    /// auto-advance.
    fn advance(&mut self, origin: Origin) {
        self.debouncer.cancel();

        let advance = self.queue.lock().unwrap().play_next();
        match advance {
            Advance::Next(index) => self.start_queued_track(index, origin),
            Advance::Stop => {
                let prev = self.store.snapshot();
                if prev.is_playing {
                    self.store.set_playing(false, origin);
                    self.sync_surfaces(&prev, true);
                }
            }
            Advance::None => {}
        }
    }

    fn step_back(&mut self, origin: Origin) {
        self.debouncer.cancel();
        let index = self.queue.lock().unwrap().play_previous();
        if let Some(index) = index {
            self.start_queued_track(index, origin);
        }
    }

    fn start_queued_track(&mut self, index: usize, origin: Origin) {
        let track = {
            let q = self.queue.lock().unwrap();
            q.track_at(index).cloned()
        };
        let Some(track) = track else {
            warn!(index, "queue advance pointed at a missing track");
            return;
        };

        let prev = self.store.snapshot();
        self.store.set_current_track(
            track.clone(),
            SetTrackOptions {
                is_playing: false,
                current_time: 0.0,
                auto_play: true,
                origin: Some(origin),
            },
        );
        self.sync_surfaces(&prev, false);
        self.spawn_like_check(track.id);
    }

    fn toggle_like(&mut self, track_id: String) {
        let prev = self.store.snapshot();
        let toggle = self.like.toggle(&self.store, &track_id);
        self.sync_surfaces(&prev, false);

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let ok = match backend.submit_like(&track_id, toggle.quantity) {
                Ok(()) => {
                    if let Err(err) = backend.revalidate(LIKED_BY_USER_TAG) {
                        warn!(%err, "like cache revalidation failed");
                    }
                    true
                }
                Err(err) => {
                    warn!(%err, %track_id, "like mutation failed");
                    false
                }
            };
            let _ = tx.send(PlayerCmd::LikeResult {
                track_id,
                toggle,
                ok,
            });
        });
    }

    fn like_result(&mut self, track_id: String, toggle: LikeToggle, ok: bool) {
        if ok {
            return;
        }
        let prev = self.store.snapshot();
        self.like.rollback(&self.store, &track_id, toggle);
        self.sync_surfaces(&prev, false);
    }

    fn device_event(&mut self, origin: Origin, event: DeviceEvent) {
        if event == DeviceEvent::Ended {
            self.advance(origin);
            return;
        }

        let prev = self.store.snapshot();
        match event {
            DeviceEvent::Played => {
                if prev.is_playing {
                    return;
                }
                self.store.set_playing(true, origin);
            }
            DeviceEvent::Paused => {
                if !prev.is_playing {
                    return;
                }
                self.store.set_playing(false, origin);
            }
            DeviceEvent::TimeUpdate(seconds) => {
                // The device keeps reporting its pre-seek position until the
                // seek lands; those reports must not fight the seek target.
                if prev.is_seeking {
                    return;
                }
                self.store.set_current_time(seconds, origin);
            }
            DeviceEvent::DurationChanged(seconds) => {
                self.store.set_duration(seconds, origin);
            }
            DeviceEvent::SeekDone => {
                self.debouncer.confirm();
                self.store.set_seeking(false, origin);
            }
            DeviceEvent::Ended => unreachable!("handled above"),
        }

        // Never echo a command back at the device that reported the event.
        let command_device = self.live_owner() != Some(origin);
        self.sync_surfaces(&prev, command_device);
    }

    fn register_transport(&mut self, owner: Origin, mut controller: Box<dyn TransportController>) {
        if let Some((old, _)) = self.live.as_ref() {
            debug!(?old, ?owner, "live transport ownership transferred");
        }
        // Bring the fresh device up to the shared volume.
        controller.set_volume(self.store.snapshot().volume);
        self.live = Some((owner, controller));
    }

    fn unregister_transport(&mut self, owner: Origin) {
        match self.live.as_ref() {
            Some((current, _)) if *current == owner => {
                self.live = None;
            }
            Some((current, _)) => {
                warn!(?owner, ?current, "ignoring transport release from non-owner");
            }
            None => {}
        }
    }

    fn queue_loaded(
        &mut self,
        ticket: LoadTicket,
        kind: SourceKind,
        source_id: Option<String>,
        tracks: Vec<Track>,
        target: String,
    ) {
        let mut q = self.queue.lock().unwrap();
        if !q.complete_load(ticket, kind, source_id, tracks, &target) {
            debug!(%target, "discarding stale queue load");
        }
    }

    fn liked_ids_loaded(&mut self, checked: String, ids: Vec<String>) {
        self.like.set_liked_ids(ids);
        if self.store.current_track_id().as_deref() == Some(checked.as_str()) {
            let prev = self.store.snapshot();
            let liked = self.like.liked_ids().iter().any(|id| *id == checked);
            self.store.set_liked(liked);
            self.sync_surfaces(&prev, false);
        }
    }

    fn spawn_queue_load(
        &self,
        ticket: LoadTicket,
        kind: SourceKind,
        source_id: Option<String>,
        target: String,
    ) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let page_size = self.settings.queue.page_size;
        let sort = self.settings.queue.sort.clone();
        thread::spawn(move || {
            let fetched = match (&kind, source_id.as_deref()) {
                (SourceKind::Playlist, Some(id)) => backend.playlist_tracks(id),
                (SourceKind::LikedList, _) => backend.liked_tracks(page_size, &sort),
                (SourceKind::Category | SourceKind::Search, Some(name)) => {
                    backend.category_tracks(name, page_size, &sort)
                }
                _ => Ok(Vec::new()),
            };
            match fetched {
                Ok(tracks) => {
                    let _ = tx.send(PlayerCmd::QueueLoaded {
                        ticket,
                        kind,
                        source_id,
                        tracks,
                        target,
                    });
                }
                Err(err) => warn!(%err, "queue load failed"),
            }
        });
    }

    fn spawn_like_check(&self, track_id: String) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let page_size = self.settings.queue.page_size;
        let sort = self.settings.queue.sort.clone();
        thread::spawn(move || match backend.liked_tracks(page_size, &sort) {
            Ok(tracks) => {
                let ids = tracks.into_iter().map(|t| t.id).collect();
                let _ = tx.send(PlayerCmd::LikedIdsLoaded {
                    checked: track_id,
                    ids,
                });
            }
            Err(err) => warn!(%err, "like status check failed"),
        });
    }
}

/// Map a play context onto the collection the queue should load.
fn resolve_source(ctx: &PlayContext, track: &Track) -> (SourceKind, Option<String>) {
    match ctx.kind {
        ContextKind::Playlist => (SourceKind::Playlist, ctx.id.clone()),
        ContextKind::LikedList => (SourceKind::LikedList, None),
        ContextKind::Category => (
            SourceKind::Category,
            ctx.id.clone().or_else(|| Some(track.category.clone())),
        ),
        ContextKind::Detail => (SourceKind::Category, Some(track.category.clone())),
        ContextKind::Search => (SourceKind::Search, Some(track.category.clone())),
    }
}
