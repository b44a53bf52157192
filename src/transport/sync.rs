use crate::state::{Origin, PlaybackState};

/// Operations the state layer may invoke on the surface that owns the real
/// audio device.
///
/// Implementor obligations: `play` and `pause` are idempotent, `seek` clamps
/// out-of-range input to `[0, duration]` instead of failing, and `set_volume`
/// maps 0–100 onto the device's native range. None of these report errors;
/// the device's actual state flows back as device events (e.g. a blocked
/// autoplay surfaces as a `Paused` event, and `is_playing` reconciles).
pub trait TransportController: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, level: u8);
}

/// Passive observer owned by a surface that does not command real audio.
///
/// `apply` receives every state change whose origin differs from
/// [`Surface::origin`]; the surface reconciles whatever passive
/// representation it owns (waveform cursor, list highlight).
pub trait Surface: Send {
    fn origin(&self) -> Origin;
    fn apply(&mut self, state: &PlaybackState);
}

/// A real device command derived from a state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceCmd {
    Play,
    Pause,
    SetVolume(u8),
}

/// Whether a surface should reconcile play/pause/time state to a change:
/// only when somebody else authored it. A surface observing its own write is
/// already in sync; re-applying would re-trigger its native events and loop.
///
/// This gate covers field-level sync only. Track identity changes are
/// delivered unconditionally (see [`track_changed`]): the device-owning
/// surface must load the new track even when it originated the advance, e.g.
/// its own `Ended` event auto-advancing the queue.
pub fn should_apply(me: Origin, state: &PlaybackState) -> bool {
    state.origin != Some(me)
}

/// Whether the loaded track's identity differs between two states.
pub fn track_changed(prev: &PlaybackState, next: &PlaybackState) -> bool {
    prev.current_track.as_ref().map(|t| t.id.as_str())
        != next.current_track.as_ref().map(|t| t.id.as_str())
}

/// Minimal device commands for the transition `prev -> next`.
///
/// Purely diff-based, so redundant intents (play while playing) cost no
/// device call. Seeks are deliberately absent: the seek debouncer is the
/// only path that issues device seeks.
pub fn device_commands(prev: &PlaybackState, next: &PlaybackState) -> Vec<DeviceCmd> {
    let mut cmds = Vec::new();
    if prev.is_playing != next.is_playing {
        cmds.push(if next.is_playing {
            DeviceCmd::Play
        } else {
            DeviceCmd::Pause
        });
    }
    if prev.volume != next.volume {
        cmds.push(DeviceCmd::SetVolume(next.volume));
    }
    cmds
}
