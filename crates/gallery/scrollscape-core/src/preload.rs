//! Join barrier over named readiness signals (fonts, images).
//!
//! The gate opens when every signal has fired and reports `Opened` exactly
//! once. There is no timeout: a signal that never fires keeps the gate shut.

use serde::{Deserialize, Serialize};

/// Signals the default gallery waits on before building the scene.
pub const DEFAULT_SIGNALS: [&str; 3] = ["font:Open Sans", "font:Playfair Display", "images"];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Still waiting on at least one signal.
    Waiting { remaining: usize },
    /// This call completed the join.
    Opened,
    /// The gate was already open (or the signal was a repeat after opening).
    AlreadyOpen,
    /// The name is not one of the gate's signals.
    Unknown,
}

#[derive(Clone, Debug)]
pub struct PreloadGate {
    signals: Vec<(String, bool)>,
    opened: bool,
}

impl PreloadGate {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut signals: Vec<(String, bool)> = Vec::new();
        for name in names {
            let name = name.into();
            if !signals.iter().any(|(n, _)| *n == name) {
                signals.push((name, false));
            }
        }
        let opened = signals.is_empty();
        Self { signals, opened }
    }

    /// Mark one signal ready. Repeats are harmless.
    pub fn signal(&mut self, name: &str) -> GateStatus {
        if self.opened {
            return GateStatus::AlreadyOpen;
        }
        let Some(slot) = self.signals.iter_mut().find(|(n, _)| n == name) else {
            log::warn!("preload gate: unknown signal '{name}'");
            return GateStatus::Unknown;
        };
        slot.1 = true;

        let remaining = self.signals.iter().filter(|(_, done)| !done).count();
        if remaining == 0 {
            self.opened = true;
            log::debug!("preload gate opened");
            GateStatus::Opened
        } else {
            GateStatus::Waiting { remaining }
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Names of signals that have not fired yet.
    pub fn pending(&self) -> Vec<String> {
        self.signals
            .iter()
            .filter(|(_, done)| !done)
            .map(|(n, _)| n.clone())
            .collect()
    }
}

impl Default for PreloadGate {
    fn default() -> Self {
        PreloadGate::new(DEFAULT_SIGNALS)
    }
}
