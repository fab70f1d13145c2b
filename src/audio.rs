//! Audio playback
//!
//! Sounds are named handles on preloaded media. Playback is best-effort:
//! browsers may refuse to play before a user gesture, and that must never stop
//! the game loop.

use crate::error::AudioError;
use crate::settings::Settings;

/// Named sound handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Looping background music
    Background,
    /// Collectible caught
    Collect,
    /// Obstacle hit
    Caught,
    /// Special-catch fanfare
    Fanfare,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Background, Sound::Collect, Sound::Caught, Sound::Fanfare];

    pub fn as_str(self) -> &'static str {
        match self {
            Sound::Background => "background",
            Sound::Collect => "collect",
            Sound::Caught => "caught",
            Sound::Fanfare => "fanfare",
        }
    }

    /// DOM id of the `<audio>` element backing this sound
    pub fn element_id(self) -> &'static str {
        match self {
            Sound::Background => "background-music",
            Sound::Collect => "collect-sound",
            Sound::Caught => "caught-sound",
            Sound::Fanfare => "justin-sound",
        }
    }
}

/// Playback controls on named sounds
pub trait AudioPort {
    /// Start playing from the current position
    fn play(&mut self, sound: Sound) -> Result<(), AudioError>;
    fn pause(&mut self, sound: Sound);
    /// Seek back to the start
    fn rewind(&mut self, sound: Sound);
    /// Set element volume (0.0 - 1.0)
    fn set_volume(&mut self, sound: Sound, volume: f32);
    /// Amplify beyond full volume where the backend supports it
    fn boost(&mut self, _sound: Sound, _gain: f32) {}
}

/// Play and swallow any refusal
pub fn play_quietly(audio: &mut dyn AudioPort, sound: Sound) {
    if let Err(e) = audio.play(sound) {
        log::debug!("{} not played: {e}", sound.as_str());
    }
}

/// Restart a sound from the beginning
pub fn replay(audio: &mut dyn AudioPort, sound: Sound) {
    audio.rewind(sound);
    play_quietly(audio, sound);
}

/// Stop a sound and seek it back to the start
pub fn stop(audio: &mut dyn AudioPort, sound: Sound) {
    audio.pause(sound);
    audio.rewind(sound);
}

/// Push the volume settings to every sound
pub fn apply_settings(audio: &mut dyn AudioPort, settings: &Settings) {
    for sound in Sound::ALL {
        let volume = match sound {
            Sound::Background => settings.effective_music_volume(),
            Sound::Collect | Sound::Caught => settings.effective_sfx_volume(),
            Sound::Fanfare => settings.effective_fanfare_volume(),
        };
        audio.set_volume(sound, volume);
    }
}

/// Backend that plays nothing (headless runs)
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioPort for SilentAudio {
    fn play(&mut self, _sound: Sound) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self, _sound: Sound) {}

    fn rewind(&mut self, _sound: Sound) {}

    fn set_volume(&mut self, _sound: Sound, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, Document, GainNode, HtmlAudioElement};

    use super::{AudioPort, Sound};
    use crate::error::AudioError;

    /// `<audio>` element backed playback, with Web Audio gain for boosting
    pub struct AudioManager {
        elements: HashMap<Sound, HtmlAudioElement>,
        ctx: Option<AudioContext>,
        gains: HashMap<Sound, GainNode>,
    }

    impl AudioManager {
        pub fn new(document: &Document) -> Self {
            let mut elements = HashMap::new();
            for sound in Sound::ALL {
                match document
                    .get_element_by_id(sound.element_id())
                    .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
                {
                    Some(el) => {
                        elements.insert(sound, el);
                    }
                    None => log::warn!("Missing audio element #{}", sound.element_id()),
                }
            }

            // May fail outside a secure context; boosting is then skipped
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Web Audio API not supported - volume boost disabled");
            }

            Self {
                elements,
                ctx,
                gains: HashMap::new(),
            }
        }

        fn element(&self, sound: Sound) -> Option<&HtmlAudioElement> {
            self.elements.get(&sound)
        }

        /// Route an element through a gain node; only possible once per element
        fn gain_for(&mut self, sound: Sound) -> Option<GainNode> {
            if let Some(gain) = self.gains.get(&sound) {
                return Some(gain.clone());
            }
            let ctx = self.ctx.as_ref()?;
            let el = self.elements.get(&sound)?;
            let source = ctx.create_media_element_source(el).ok()?;
            let gain = ctx.create_gain().ok()?;
            source.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            self.gains.insert(sound, gain.clone());
            Some(gain)
        }
    }

    impl AudioPort for AudioManager {
        fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
            let el = self
                .element(sound)
                .ok_or(AudioError::NotLoaded(sound.as_str()))?;

            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }

            let promise = el
                .play()
                .map_err(|e| AudioError::Rejected(format!("{e:?}")))?;
            // Autoplay refusals arrive asynchronously
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("{} playback rejected: {e:?}", sound.as_str());
                }
            });
            Ok(())
        }

        fn pause(&mut self, sound: Sound) {
            if let Some(el) = self.element(sound) {
                let _ = el.pause();
            }
        }

        fn rewind(&mut self, sound: Sound) {
            if let Some(el) = self.element(sound) {
                el.set_current_time(0.0);
            }
        }

        fn set_volume(&mut self, sound: Sound, volume: f32) {
            if let Some(el) = self.element(sound) {
                el.set_volume(volume.clamp(0.0, 1.0) as f64);
            }
        }

        fn boost(&mut self, sound: Sound, gain: f32) {
            match self.gain_for(sound) {
                Some(node) => node.gain().set_value(gain),
                None => log::debug!("Audio boost unavailable for {}", sound.as_str()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        refuse: bool,
    }

    impl AudioPort for Recorder {
        fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
            self.calls.push(format!("play {}", sound.as_str()));
            if self.refuse {
                Err(AudioError::Rejected("autoplay".to_string()))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self, sound: Sound) {
            self.calls.push(format!("pause {}", sound.as_str()));
        }

        fn rewind(&mut self, sound: Sound) {
            self.calls.push(format!("rewind {}", sound.as_str()));
        }

        fn set_volume(&mut self, sound: Sound, volume: f32) {
            self.calls.push(format!("volume {} {volume}", sound.as_str()));
        }
    }

    #[test]
    fn test_replay_rewinds_first() {
        let mut audio = Recorder::default();
        replay(&mut audio, Sound::Collect);
        assert_eq!(audio.calls, vec!["rewind collect", "play collect"]);
    }

    #[test]
    fn test_refused_play_is_swallowed() {
        let mut audio = Recorder {
            refuse: true,
            ..Default::default()
        };
        play_quietly(&mut audio, Sound::Background);
        assert_eq!(audio.calls, vec!["play background"]);
    }

    #[test]
    fn test_element_ids_match_page_markup() {
        let ids: Vec<&str> = Sound::ALL.iter().map(|s| s.element_id()).collect();
        assert_eq!(
            ids,
            vec!["background-music", "collect-sound", "caught-sound", "justin-sound"]
        );
    }

    #[test]
    fn test_apply_settings_routes_volumes() {
        let mut audio = Recorder::default();
        let settings = Settings {
            music_volume: 0.5,
            sfx_volume: 0.25,
            ..Default::default()
        };
        apply_settings(&mut audio, &settings);
        assert_eq!(
            audio.calls,
            vec![
                "volume background 0.5",
                "volume collect 0.25",
                "volume caught 0.25",
                "volume fanfare 1",
            ]
        );
    }
}
