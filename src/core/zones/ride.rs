//=========================================================================
// Ride Controller
//=========================================================================
//
// Running/stopped flag for one ride plus its looping audio.
//
// Stopping fades the ride's audio on the host and tracks the fade as a
// `Tween`; once it finishes the source is stopped and its volume reset
// so a later start plays at full level.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::RideKind;
use crate::core::config::RideConfig;
use crate::core::host_bridge::Outbox;
use crate::core::timing::{TickClock, Tween};

//=== RideController ======================================================

#[derive(Debug, Clone, PartialEq)]
struct RideAudio {
    source: String,
    clip: String,
    volume: f32,
    fade_secs: f32,
    fade_ticks: u32,
}

/// One ride's motion and audio.
#[derive(Debug, Clone, PartialEq)]
pub struct RideController {
    name: String,
    kind: RideKind,
    running: bool,
    audio: Option<RideAudio>,
    fade: Option<Tween>,
}

impl RideController {
    /// Creates a stopped ride.
    pub fn from_config(config: &RideConfig, clock: &TickClock) -> Self {
        let audio = config.audio.as_ref().map(|audio| RideAudio {
            source: audio.source.clone(),
            clip: audio.clip.clone(),
            volume: audio.volume,
            fade_secs: audio.fade_secs,
            fade_ticks: clock.ticks_for(audio.fade_secs),
        });

        Self {
            name: config.name.clone(),
            kind: config.kind,
            running: false,
            audio,
            fade: None,
        }
    }

    /// Resumes motion and looping audio. Returns false if already running.
    pub fn start(&mut self, out: &mut Outbox) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        out.set_ride_motion(&self.name, true);

        if let Some(audio) = &self.audio {
            if self.fade.take().is_some() {
                debug!("{} restarted mid-fade", self.name);
                out.set_volume(&audio.source, audio.volume);
            }
            out.play_looping(&audio.source, &audio.clip, audio.volume);
        }
        true
    }

    /// Halts motion and fades audio out. Returns false if already stopped.
    pub fn stop(&mut self, out: &mut Outbox) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        out.set_ride_motion(&self.name, false);

        if let Some(audio) = &self.audio {
            if audio.fade_ticks == 0 {
                out.stop_audio(&audio.source);
                out.set_volume(&audio.source, audio.volume);
            } else {
                out.fade_audio(&audio.source, 0.0, audio.fade_secs);
                self.fade = Some(Tween::new(audio.fade_ticks));
            }
        }
        true
    }

    /// Advances an in-flight audio fade.
    pub fn tick(&mut self, out: &mut Outbox) {
        let Some(fade) = &mut self.fade else {
            return;
        };
        fade.advance();
        if !fade.is_finished() {
            return;
        }
        self.fade = None;
        if let Some(audio) = &self.audio {
            out.stop_audio(&audio.source);
            out.set_volume(&audio.source, audio.volume);
        }
    }

    /// Drops any pending fade without emitting commands.
    pub fn abandon(&mut self) {
        self.fade = None;
    }

    //--- Queries ----------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RideKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RideAudioConfig;
    use crate::core::host_bridge::HostCommand;

    fn carousel(fade_secs: f32) -> RideController {
        let config = RideConfig {
            name: "carousel".into(),
            kind: RideKind::Carousel,
            audio: Some(RideAudioConfig {
                source: "organ".into(),
                clip: "organ_loop".into(),
                volume: 0.5,
                fade_secs,
            }),
        };
        RideController::from_config(&config, &TickClock::new(10.0))
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut ride = carousel(0.3);
        let mut out = Outbox::new();

        assert!(ride.start(&mut out));
        assert!(!ride.start(&mut out));
        assert_eq!(out.take().len(), 2);

        assert!(ride.stop(&mut out));
        assert!(!ride.stop(&mut out));
        assert_eq!(
            out.take(),
            vec![
                HostCommand::SetRideMotion {
                    ride: "carousel".into(),
                    running: false
                },
                HostCommand::FadeAudio {
                    source: "organ".into(),
                    target_volume: 0.0,
                    duration_secs: 0.3
                },
            ]
        );
    }

    #[test]
    fn finished_fade_stops_and_resets_source() {
        let mut ride = carousel(0.3);
        let mut out = Outbox::new();
        ride.start(&mut out);
        ride.stop(&mut out);
        out.take();

        ride.tick(&mut out);
        ride.tick(&mut out);
        assert!(out.is_empty());
        ride.tick(&mut out);
        assert!(!ride.is_fading());
        assert_eq!(
            out.take(),
            vec![
                HostCommand::StopAudio {
                    source: "organ".into()
                },
                HostCommand::SetVolume {
                    source: "organ".into(),
                    volume: 0.5
                },
            ]
        );
        ride.tick(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn start_cancels_fade() {
        let mut ride = carousel(1.0);
        let mut out = Outbox::new();
        ride.start(&mut out);
        ride.stop(&mut out);
        ride.tick(&mut out);
        out.take();

        assert!(ride.start(&mut out));
        assert!(!ride.is_fading());
        assert!(out.commands().contains(&HostCommand::SetVolume {
            source: "organ".into(),
            volume: 0.5
        }));
    }

    #[test]
    fn silent_ride_only_toggles_motion() {
        let config = RideConfig {
            name: "teacups".into(),
            kind: RideKind::Teacups,
            audio: None,
        };
        let mut ride = RideController::from_config(&config, &TickClock::default());
        let mut out = Outbox::new();
        ride.start(&mut out);
        ride.stop(&mut out);
        assert_eq!(out.commands().len(), 2);
        assert!(!ride.is_fading());
    }
}
