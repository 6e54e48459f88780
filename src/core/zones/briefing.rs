//=========================================================================
// Radio Briefing
//=========================================================================
//
// Narrative cues played on request, in order, with a press cooldown.
// A cue that names a zone unlocks it once its clip has finished playing.
// After the last cue the sequence starts over; repeated unlocks are
// no-ops in `ZoneProgression`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use super::events::{BriefingCueFinished, BriefingCueStarted};
use super::ZoneId;
use crate::core::config::BriefingConfig;
use crate::core::globals::GlobalContext;
use crate::core::timing::{Countdown, TickClock};

//=== Outcomes ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingOutcome {
    Playing { cue: usize },
    OnCooldown { remaining_ticks: u32 },
    NoCues,
}

//=== RadioBriefing =======================================================

#[derive(Debug, Clone, PartialEq)]
struct Cue {
    clip: String,
    duration_ticks: u32,
    unlocks: Option<ZoneId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioBriefing {
    cues: Vec<Cue>,
    next: usize,
    cooldown_ticks: u32,
    cooldown: Option<Countdown>,
    /// Cues whose clips are still playing.
    playing: Vec<(usize, Countdown)>,
}

impl RadioBriefing {
    pub fn from_config(config: &BriefingConfig, clock: &TickClock) -> Self {
        let cues = config
            .cues
            .iter()
            .map(|cue| Cue {
                clip: cue.clip.clone(),
                duration_ticks: clock.ticks_for(cue.duration_secs),
                unlocks: cue.unlocks,
            })
            .collect();

        Self {
            cues,
            next: 0,
            cooldown_ticks: clock.ticks_for(config.cooldown_secs),
            cooldown: None,
            playing: Vec::new(),
        }
    }

    /// Plays the next cue unless the radio is cooling down.
    pub fn request(&mut self, ctx: &mut GlobalContext) -> BriefingOutcome {
        if let Some(cooldown) = &self.cooldown {
            info!("Radio on cooldown for {} more ticks", cooldown.remaining());
            return BriefingOutcome::OnCooldown {
                remaining_ticks: cooldown.remaining(),
            };
        }
        let Some(cue) = self.cues.get(self.next) else {
            error!("Radio has no briefing cues");
            return BriefingOutcome::NoCues;
        };

        let index = self.next;
        ctx.outbox.play_sound(&cue.clip, None);
        self.playing.push((index, Countdown::new(cue.duration_ticks)));
        ctx.message_bus.push(BriefingCueStarted { cue: index });
        info!("Playing briefing {} of {}", index + 1, self.cues.len());

        self.next = (self.next + 1) % self.cues.len();
        if self.next == 0 {
            info!("Briefing sequence complete, restarting from the first cue");
        }
        if self.cooldown_ticks > 0 {
            self.cooldown = Some(Countdown::new(self.cooldown_ticks));
        }
        BriefingOutcome::Playing { cue: index }
    }

    /// Advances the cooldown and finishes cues whose clips have ended.
    pub fn tick(&mut self, ctx: &mut GlobalContext) {
        if let Some(cooldown) = &mut self.cooldown {
            if cooldown.advance() {
                self.cooldown = None;
            }
        }

        let mut finished = Vec::new();
        self.playing.retain_mut(|(cue, remaining)| {
            if remaining.advance() {
                finished.push(*cue);
                false
            } else {
                true
            }
        });

        for cue in finished {
            ctx.message_bus.push(BriefingCueFinished { cue });
            if let Some(zone) = self.cues.get(cue).and_then(|c| c.unlocks) {
                ctx.progression.unlock_zone(zone, &mut ctx.message_bus);
            }
        }
    }

    pub fn cue_count(&self) -> usize {
        self.cues.len()
    }

    /// Index of the cue the next request will play.
    pub fn next_cue(&self) -> usize {
        self.next
    }

    pub fn is_playing(&self) -> bool {
        !self.playing.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
