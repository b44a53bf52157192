use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::api::{ApiError, BackendApi};
use crate::config::{SeekSettings, Settings};
use crate::queue::{LoopMode, PlayContext, SourceKind};
use crate::state::{Origin, PlaybackState};
use crate::track::Track;
use crate::transport::{Surface, TransportController};

use super::{DeviceEvent, Player, PlayerCmd};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeviceCall {
    Play,
    Pause,
    Seek(f64),
    Volume(u8),
}

struct RecordingTransport {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
}

impl RecordingTransport {
    fn new() -> (Self, Arc<Mutex<Vec<DeviceCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl TransportController for RecordingTransport {
    fn play(&mut self) {
        self.calls.lock().unwrap().push(DeviceCall::Play);
    }
    fn pause(&mut self) {
        self.calls.lock().unwrap().push(DeviceCall::Pause);
    }
    fn seek(&mut self, seconds: f64) {
        self.calls.lock().unwrap().push(DeviceCall::Seek(seconds));
    }
    fn set_volume(&mut self, level: u8) {
        self.calls.lock().unwrap().push(DeviceCall::Volume(level));
    }
}

struct RecordingSurface {
    origin: Origin,
    applied: Arc<Mutex<Vec<PlaybackState>>>,
}

impl RecordingSurface {
    fn new(origin: Origin) -> (Self, Arc<Mutex<Vec<PlaybackState>>>) {
        let applied = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                origin,
                applied: applied.clone(),
            },
            applied,
        )
    }
}

impl Surface for RecordingSurface {
    fn origin(&self) -> Origin {
        self.origin
    }
    fn apply(&mut self, state: &PlaybackState) {
        self.applied.lock().unwrap().push(state.clone());
    }
}

#[derive(Default)]
struct FakeBackend {
    categories: HashMap<String, Vec<Track>>,
    delays: HashMap<String, Duration>,
    liked: Vec<Track>,
    likes_submitted: Mutex<Vec<(String, i8)>>,
    revalidated: Mutex<Vec<String>>,
    sorts_requested: Mutex<Vec<String>>,
    fail_likes: bool,
}

impl BackendApi for FakeBackend {
    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ApiError> {
        Err(ApiError::NotFound(playlist_id.to_string()))
    }

    fn liked_tracks(&self, limit: usize, sort: &str) -> Result<Vec<Track>, ApiError> {
        self.sorts_requested.lock().unwrap().push(sort.to_string());
        Ok(self.liked.iter().take(limit).cloned().collect())
    }

    fn category_tracks(&self, category: &str, limit: usize, sort: &str)
    -> Result<Vec<Track>, ApiError> {
        self.sorts_requested.lock().unwrap().push(sort.to_string());
        if let Some(delay) = self.delays.get(category) {
            thread::sleep(*delay);
        }
        let tracks = self.categories.get(category).cloned().unwrap_or_default();
        Ok(tracks.into_iter().take(limit).collect())
    }

    fn submit_like(&self, track_id: &str, quantity: i8) -> Result<(), ApiError> {
        if self.fail_likes {
            return Err(ApiError::Status {
                status: 500,
                message: "like rejected".to_string(),
            });
        }
        self.likes_submitted
            .lock()
            .unwrap()
            .push((track_id.to_string(), quantity));
        Ok(())
    }

    fn revalidate(&self, tag: &str) -> Result<(), ApiError> {
        self.revalidated.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}

fn track(id: &str, category: &str) -> Track {
    let mut t = Track::with_id(id);
    t.title = format!("track {id}");
    t.category = category.to_string();
    t.duration = 180.0;
    t
}

fn fast_settings() -> Settings {
    Settings {
        seek: SeekSettings {
            debounce_ms: 20,
            grace_ms: 40,
            min_delta_secs: 0.1,
        },
        ..Settings::default()
    }
}

fn settle() {
    thread::sleep(Duration::from_millis(250));
}

fn snapshot(player: &Player) -> PlaybackState {
    player.state_handle().lock().unwrap().clone()
}

fn non_volume(calls: &Arc<Mutex<Vec<DeviceCall>>>) -> Vec<DeviceCall> {
    calls
        .lock()
        .unwrap()
        .iter()
        .copied()
        .filter(|c| !matches!(c, DeviceCall::Volume(_)))
        .collect()
}

#[test]
fn distinct_intents_command_the_device_exactly_once_each() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    // Each intent, then the device's own echo of what it did. The echoes
    // must not turn into further device commands.
    player.send(PlayerCmd::Play { origin: Origin::TransportBar }).unwrap();
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Played,
        })
        .unwrap();
    player.send(PlayerCmd::Pause { origin: Origin::WaveView }).unwrap();
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Paused,
        })
        .unwrap();
    player.send(PlayerCmd::Play { origin: Origin::ProfileCard }).unwrap();
    settle();

    assert_eq!(
        non_volume(&calls),
        vec![DeviceCall::Play, DeviceCall::Pause, DeviceCall::Play]
    );
    assert!(snapshot(&player).is_playing);
    player.shutdown();
}

#[test]
fn redundant_intents_cost_no_device_call() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();

    for _ in 0..3 {
        player.send(PlayerCmd::Play { origin: Origin::WaveView }).unwrap();
    }
    settle();

    assert_eq!(non_volume(&calls), vec![DeviceCall::Play]);
    player.shutdown();
}

#[test]
fn seek_burst_coalesces_into_one_device_seek() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    for target in [10.0, 20.0, 30.0, 40.0, 55.5] {
        player
            .send(PlayerCmd::SeekTo {
                seconds: target,
                origin: Origin::WaveView,
            })
            .unwrap();
    }
    settle();

    let seeks: Vec<_> = calls
        .lock()
        .unwrap()
        .iter()
        .copied()
        .filter(|c| matches!(c, DeviceCall::Seek(_)))
        .collect();
    assert_eq!(seeks, vec![DeviceCall::Seek(55.5)]);

    let state = snapshot(&player);
    assert_eq!(state.current_time, 55.5);
    // The grace window has long passed without a confirmation.
    assert!(!state.is_seeking);
    player.shutdown();
}

#[test]
fn time_updates_are_suppressed_while_seeking() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    player
        .send(PlayerCmd::SeekTo {
            seconds: 90.0,
            origin: Origin::WaveView,
        })
        .unwrap();
    // Stale pre-seek position report, racing the seek.
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::TimeUpdate(12.0),
        })
        .unwrap();
    // Long enough for the actor to process both commands, well short of the
    // debounce delay plus grace window.
    thread::sleep(Duration::from_millis(10));

    let seeking_now = snapshot(&player);
    assert!(seeking_now.is_seeking);
    assert_eq!(seeking_now.current_time, 90.0);

    settle();
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::TimeUpdate(91.0),
        })
        .unwrap();
    settle();
    assert_eq!(snapshot(&player).current_time, 91.0);
    player.shutdown();
}

#[test]
fn newest_queue_load_wins_over_a_slow_older_one() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("slow".to_string(), vec![track("s1", "slow"), track("s2", "slow")]);
    backend
        .categories
        .insert("fast".to_string(), vec![track("f1", "fast"), track("f2", "fast")]);
    backend
        .delays
        .insert("slow".to_string(), Duration::from_millis(150));
    let player = Player::new(Arc::new(backend), fast_settings());

    player
        .send(PlayerCmd::PlayTrack {
            track: track("s1", "slow"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("f1", "fast"),
            ctx: PlayContext::detail(),
            origin: Origin::ProfileCard,
        })
        .unwrap();
    thread::sleep(Duration::from_millis(500));

    let queue = player.queue_handle();
    let q = queue.lock().unwrap();
    assert_eq!(
        q.source(),
        Some(&(SourceKind::Category, Some("fast".to_string())))
    );
    let ids: Vec<_> = q.tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2"]);
    assert_eq!(q.current_track().map(|t| t.id.as_str()), Some("f1"));
    player.shutdown();
}

#[test]
fn ended_event_advances_then_stops_at_queue_end() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop"), track("t2", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();
    assert!(player.take_auto_play());

    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Ended,
        })
        .unwrap();
    settle();

    let state = snapshot(&player);
    assert_eq!(
        state.current_track.as_ref().map(|t| t.id.as_str()),
        Some("t2")
    );
    assert_eq!(state.current_time, 0.0);
    // The loading surface consumes this to start the next track.
    assert!(player.take_auto_play());

    player.send(PlayerCmd::Play { origin: Origin::TransportBar }).unwrap();
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Ended,
        })
        .unwrap();
    settle();

    let state = snapshot(&player);
    assert!(!state.is_playing);
    assert_eq!(
        state.current_track.as_ref().map(|t| t.id.as_str()),
        Some("t2")
    );
    assert!(non_volume(&calls).contains(&DeviceCall::Pause));
    player.shutdown();
}

#[test]
fn loop_one_repeats_the_current_track_on_end() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop"), track("t2", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    player.send(PlayerCmd::SetLoopMode(LoopMode::LoopOne)).unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Ended,
        })
        .unwrap();
    settle();

    let state = snapshot(&player);
    assert_eq!(
        state.current_track.as_ref().map(|t| t.id.as_str()),
        Some("t1")
    );
    assert!(state.auto_play);
    player.shutdown();
}

#[test]
fn latest_registered_transport_owns_the_device() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (first, first_calls) = RecordingTransport::new();
    let (second, second_calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::WaveView,
            controller: Box::new(first),
        })
        .unwrap();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(second),
        })
        .unwrap();
    // Release request from a surface that no longer owns the device.
    player
        .send(PlayerCmd::UnregisterTransport { owner: Origin::WaveView })
        .unwrap();
    player.send(PlayerCmd::Play { origin: Origin::ProfileCard }).unwrap();
    settle();

    assert_eq!(non_volume(&first_calls), Vec::new());
    assert_eq!(non_volume(&second_calls), vec![DeviceCall::Play]);
    player.shutdown();
}

#[test]
fn surfaces_skip_field_changes_they_originated() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (wave, wave_applied) = RecordingSurface::new(Origin::WaveView);
    let (bar, bar_applied) = RecordingSurface::new(Origin::TransportBar);
    player.send(PlayerCmd::RegisterSurface(Box::new(wave))).unwrap();
    player.send(PlayerCmd::RegisterSurface(Box::new(bar))).unwrap();

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    // A track load reaches every surface, its originator included.
    let wave_count = wave_applied.lock().unwrap().len();
    assert!(wave_count >= 1);
    assert_eq!(
        bar_applied
            .lock()
            .unwrap()
            .last()
            .and_then(|s| s.current_track.as_ref())
            .map(|t| t.id.as_str()),
        Some("t1")
    );

    // Field-level changes stay origin-gated: the authoring surface is
    // already in sync and must not be re-triggered.
    player.send(PlayerCmd::Play { origin: Origin::WaveView }).unwrap();
    settle();

    assert_eq!(wave_applied.lock().unwrap().len(), wave_count);
    assert!(bar_applied.lock().unwrap().last().unwrap().is_playing);
    player.shutdown();
}

#[test]
fn self_originated_advance_still_reaches_the_device_owner() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop"), track("t2", "pop")]);
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, _calls) = RecordingTransport::new();
    let (bar, bar_applied) = RecordingSurface::new(Origin::TransportBar);
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player.send(PlayerCmd::RegisterSurface(Box::new(bar))).unwrap();

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    // The bar's own device reports the end of t1. The resulting advance is
    // tagged with the bar's origin, but the bar is the only surface that can
    // load t2 into the device, so it must still be told.
    player
        .send(PlayerCmd::DeviceEvent {
            origin: Origin::TransportBar,
            event: DeviceEvent::Ended,
        })
        .unwrap();
    settle();

    assert_eq!(
        bar_applied
            .lock()
            .unwrap()
            .last()
            .and_then(|s| s.current_track.as_ref())
            .map(|t| t.id.as_str()),
        Some("t2")
    );
    player.shutdown();
}

#[test]
fn volume_intent_reaches_state_and_device() {
    let backend = FakeBackend::default();
    let player = Player::new(Arc::new(backend), fast_settings());

    let (transport, calls) = RecordingTransport::new();
    player
        .send(PlayerCmd::RegisterTransport {
            owner: Origin::TransportBar,
            controller: Box::new(transport),
        })
        .unwrap();
    player.send(PlayerCmd::SetVolume { level: 80 }).unwrap();
    settle();

    assert_eq!(snapshot(&player).volume, 80);
    // Registration pushes the initial volume, then the change follows.
    assert_eq!(
        *calls.lock().unwrap(),
        vec![DeviceCall::Volume(50), DeviceCall::Volume(80)]
    );
    player.shutdown();
}

#[test]
fn like_toggle_submits_and_revalidates() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let backend = Arc::new(backend);
    let player = Player::new(backend.clone(), fast_settings());

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();
    assert!(!snapshot(&player).is_liked);

    player
        .send(PlayerCmd::ToggleLike {
            track_id: "t1".to_string(),
        })
        .unwrap();
    settle();

    let state = snapshot(&player);
    assert!(state.is_liked);
    assert_eq!(state.current_track.as_ref().map(|t| t.count_like), Some(1));
    assert_eq!(
        *backend.likes_submitted.lock().unwrap(),
        vec![("t1".to_string(), 1)]
    );
    assert_eq!(
        *backend.revalidated.lock().unwrap(),
        vec!["liked-by-user".to_string()]
    );
    player.shutdown();
}

#[test]
fn failed_like_toggle_rolls_back() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    backend.fail_likes = true;
    let backend = Arc::new(backend);
    let player = Player::new(backend.clone(), fast_settings());

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    player
        .send(PlayerCmd::ToggleLike {
            track_id: "t1".to_string(),
        })
        .unwrap();
    settle();

    let state = snapshot(&player);
    assert!(!state.is_liked);
    assert_eq!(state.current_track.as_ref().map(|t| t.count_like), Some(0));
    assert!(backend.revalidated.lock().unwrap().is_empty());
    player.shutdown();
}

#[test]
fn listing_requests_carry_the_configured_sort() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    let backend = Arc::new(backend);
    let mut settings = fast_settings();
    settings.queue.sort = "-countPlay".to_string();
    let player = Player::new(backend.clone(), settings);

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    let sorts = backend.sorts_requested.lock().unwrap();
    assert!(!sorts.is_empty());
    assert!(sorts.iter().all(|s| s == "-countPlay"));
    player.shutdown();
}

#[test]
fn current_track_like_flag_follows_the_liked_fetch() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop")]);
    backend.liked = vec![track("t1", "pop")];
    let player = Player::new(Arc::new(backend), fast_settings());

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();

    assert!(snapshot(&player).is_liked);
    player.shutdown();
}

#[test]
fn replaying_a_queued_track_moves_the_index_without_reloading() {
    let mut backend = FakeBackend::default();
    backend
        .categories
        .insert("pop".to_string(), vec![track("t1", "pop"), track("t2", "pop")]);
    backend
        .delays
        .insert("pop".to_string(), Duration::from_millis(20));
    let player = Player::new(Arc::new(backend), fast_settings());

    player
        .send(PlayerCmd::PlayTrack {
            track: track("t1", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::WaveView,
        })
        .unwrap();
    settle();
    player
        .send(PlayerCmd::PlayTrack {
            track: track("t2", "pop"),
            ctx: PlayContext::detail(),
            origin: Origin::ProfileCard,
        })
        .unwrap();
    // Shorter than the category delay: a reload could not have finished.
    thread::sleep(Duration::from_millis(10));

    let queue = player.queue_handle();
    let q = queue.lock().unwrap();
    assert_eq!(q.current_track().map(|t| t.id.as_str()), Some("t2"));
    drop(q);
    player.shutdown();
}
