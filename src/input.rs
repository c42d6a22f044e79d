//! Key timing for the two-button controls
//!
//! Tracks press/release times per logical control so callers can detect
//! holds and double taps. Owned explicitly by whoever drives input; reset it
//! when the input system restarts.

use serde::{Deserialize, Serialize};

/// Logical controls: each player has a turn and a shoot button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    P1Turn,
    P1Shoot,
    P2Turn,
    P2Shoot,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::P1Turn,
        Control::P1Shoot,
        Control::P2Turn,
        Control::P2Shoot,
    ];

    /// Turn control for a player index (0 or 1)
    pub fn turn_for(player: usize) -> Control {
        if player == 0 { Control::P1Turn } else { Control::P2Turn }
    }

    /// Shoot control for a player index (0 or 1)
    pub fn shoot_for(player: usize) -> Control {
        if player == 0 { Control::P1Shoot } else { Control::P2Shoot }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct KeyTiming {
    last_press: Option<f64>,
    prev_press: Option<f64>,
    last_release: Option<f64>,
}

/// Press/release history for every control (times in seconds)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTiming {
    keys: [KeyTiming; 4],
}

impl InputTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.keys = Default::default();
    }

    pub fn press(&mut self, control: Control, now: f64) {
        let key = &mut self.keys[control.index()];
        // Key repeat while held is not a new press
        if key.last_press.is_some() && key.last_press > key.last_release {
            return;
        }
        key.prev_press = key.last_press;
        key.last_press = Some(now);
    }

    pub fn release(&mut self, control: Control, now: f64) {
        self.keys[control.index()].last_release = Some(now);
    }

    pub fn last_press(&self, control: Control) -> Option<f64> {
        self.keys[control.index()].last_press
    }

    pub fn last_release(&self, control: Control) -> Option<f64> {
        self.keys[control.index()].last_release
    }

    /// Pressed more recently than released
    pub fn is_held(&self, control: Control) -> bool {
        let key = &self.keys[control.index()];
        match (key.last_press, key.last_release) {
            (Some(press), Some(release)) => press > release,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Seconds the control has been held, zero when released
    pub fn held_time(&self, control: Control, now: f64) -> f64 {
        match self.last_press(control) {
            Some(press) if self.is_held(control) => (now - press).max(0.0),
            _ => 0.0,
        }
    }

    /// The latest press followed the previous one within `threshold` seconds
    pub fn is_double_tap(&self, control: Control, threshold: f64) -> bool {
        let key = &self.keys[control.index()];
        match (key.prev_press, key.last_press) {
            (Some(prev), Some(last)) => last - prev <= threshold,
            _ => false,
        }
    }
}
