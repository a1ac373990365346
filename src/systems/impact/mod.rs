//! Impact feedback: turns collision starts into hit-sound requests.
//!
//! Deciding whether an impact is audible is a pure function of the event and
//! the threshold. The dispatcher around it only tracks which bodies are
//! subscribed and how many cues the host may receive per frame; playback
//! itself is fire-and-forget on the host side.

use std::collections::HashSet;

use crate::core::random::next_unit;
use crate::systems::physics::{BodyHandle, CollisionEvent};

/// One play request for the hit sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioCue {
    /// Random in [0, 1); deliberately unrelated to impact strength.
    pub volume: f32,
    /// Rewind to the start before playing, so rapid hits retrigger.
    pub restart: bool,
}

/// `Some(cue)` iff the closing speed along the normal is strictly above
/// `threshold`.
pub fn impact_cue(event: &CollisionEvent, threshold: f32, rng_state: &mut u32) -> Option<AudioCue> {
    let intensity = event.relative_velocity_along_normal.abs();
    if intensity > threshold {
        Some(AudioCue {
            volume: next_unit(rng_state),
            restart: true,
        })
    } else {
        None
    }
}

/// Fixed-capacity cue buffer, refilled every frame. Extra cues in a frame are
/// dropped, not queued, which bounds how many overlapping sounds the host
/// starts. Whatever the host has not taken by the next frame is discarded.
pub struct CueQueue {
    cues: Vec<AudioCue>,
    capacity: usize,
    dropped: u32,
}

impl CueQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            cues: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Returns false when the cue was dropped.
    pub fn push(&mut self, cue: AudioCue) -> bool {
        if self.cues.len() >= self.capacity {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        self.cues.push(cue);
        true
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Hand the pending cues to the host and start a fresh frame.
    pub fn drain(&mut self) -> std::vec::Drain<'_, AudioCue> {
        self.dropped = 0;
        self.cues.drain(..)
    }

    pub fn clear(&mut self) {
        self.cues.clear();
        self.dropped = 0;
    }
}

pub struct ImpactDispatcher {
    threshold: f32,
    rng_state: u32,
    listeners: HashSet<BodyHandle>,
    queue: CueQueue,
    audio_enabled: bool,
    total_cues: u64,
}

impl ImpactDispatcher {
    pub fn new(threshold: f32, max_cues_per_frame: usize, seed: u32) -> Self {
        Self {
            threshold,
            rng_state: seed,
            listeners: HashSet::new(),
            queue: CueQueue::new(max_cues_per_frame),
            audio_enabled: true,
            total_cues: 0,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Host audio not loaded yet (or muted): impacts are still detected but
    /// produce no cues.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
        if !enabled {
            self.queue.clear();
        }
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn subscribe(&mut self, body: BodyHandle) {
        self.listeners.insert(body);
    }

    pub fn unsubscribe(&mut self, body: BodyHandle) {
        self.listeners.remove(&body);
    }

    pub fn unsubscribe_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_subscribed(&self, body: BodyHandle) -> bool {
        self.listeners.contains(&body)
    }

    /// Feed one batch of collision events. Returns the cues emitted.
    pub fn dispatch(&mut self, events: &[CollisionEvent]) -> usize {
        if !self.audio_enabled {
            return 0;
        }
        let mut emitted = 0;
        for event in events {
            if !self.listeners.contains(&event.body_a) {
                continue;
            }
            if let Some(cue) = impact_cue(event, self.threshold, &mut self.rng_state) {
                if self.queue.push(cue) {
                    emitted += 1;
                }
            }
        }
        self.total_cues = self.total_cues.saturating_add(emitted as u64);
        emitted
    }

    pub fn queue(&self) -> &CueQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut CueQueue {
        &mut self.queue
    }

    pub fn total_cues(&self) -> u64 {
        self.total_cues
    }
}
