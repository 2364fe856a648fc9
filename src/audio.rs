//! Sound cues
//!
//! Scenes never play audio themselves; they push [`AudioCue`]s into the frame
//! context and the director hands them to an [`AudioSink`] with the current
//! volume settings applied.

use log::debug;
use std::rc::Rc;

use crate::resources::{MusicHandle, SoundHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCue {
    Sound(Rc<SoundHandle>),
    /// Start (looping) background music, replacing whatever is playing
    Music(Rc<MusicHandle>),
    StopMusic,
}

/// Audio back end
pub trait AudioSink {
    fn play_sound(&mut self, sound: &SoundHandle, volume: f32);
    fn play_music(&mut self, track: &MusicHandle, volume: f32);
    fn stop_music(&mut self);
}

/// Sink that only logs what would be played.
#[derive(Debug, Default)]
pub struct LogAudio {
    current_track: Option<String>,
}

impl LogAudio {
    pub fn current_track(&self) -> Option<&str> {
        self.current_track.as_deref()
    }
}

impl AudioSink for LogAudio {
    fn play_sound(&mut self, sound: &SoundHandle, volume: f32) {
        debug!("sound {} at volume {:.1}", sound.name, volume);
    }

    fn play_music(&mut self, track: &MusicHandle, volume: f32) {
        if self.current_track.as_deref() == Some(track.name.as_str()) {
            return;
        }
        debug!("music {} at volume {:.1}", track.name, volume);
        self.current_track = Some(track.name.clone());
    }

    fn stop_music(&mut self) {
        if let Some(track) = self.current_track.take() {
            debug!("music {} stopped", track);
        }
    }
}
