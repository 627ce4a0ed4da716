//! Per-measure time and key signature resolution.
//!
//! Signatures are declared with the measure at which they take effect. A
//! measure uses the latest signature activated at or before it; measures
//! before the first activation (scores that declare their signature on
//! measure 1) use the first declared one.

use crate::error::LayoutError;
use crate::model::{KeySignature, TimeSignature, Track};

/// Anything tagged with the measure index it becomes active at.
pub trait Activation: Copy {
    fn activation(&self) -> usize;
}

impl Activation for TimeSignature {
    fn activation(&self) -> usize {
        self.measure
    }
}

impl Activation for KeySignature {
    fn activation(&self) -> usize {
        self.measure
    }
}

/// One signature kind, sorted for lookup by measure.
#[derive(Debug, Clone)]
pub struct SignatureTrack<T> {
    sorted: Vec<T>,
    first_declared: T,
}

impl<T: Activation> SignatureTrack<T> {
    /// Returns `None` when nothing is declared.
    pub fn new(declared: &[T]) -> Option<Self> {
        let first_declared = *declared.first()?;
        let mut sorted = declared.to_vec();
        // Stable: among equal activations the later declaration wins.
        sorted.sort_by_key(|s| s.activation());
        Some(Self {
            sorted,
            first_declared,
        })
    }

    /// The signature in effect at `measure`.
    pub fn at(&self, measure: usize) -> T {
        let active = self.sorted.partition_point(|s| s.activation() <= measure);
        match active {
            0 => self.first_declared,
            n => self.sorted[n - 1],
        }
    }
}

/// The signatures in effect for one measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSignature {
    pub beats: u32,
    pub key_fifths: i32,
}

/// Time and key signatures of the reference track.
#[derive(Debug, Clone)]
pub struct Signatures {
    time: SignatureTrack<TimeSignature>,
    key: SignatureTrack<KeySignature>,
}

impl Signatures {
    pub fn for_track(track: &Track) -> Result<Self, LayoutError> {
        if let Some(ts) = track.time_signatures.iter().find(|ts| ts.beats == 0) {
            return Err(LayoutError::Structure(format!(
                "time signature at measure {} has zero beats",
                ts.measure + 1
            )));
        }
        let time = SignatureTrack::new(&track.time_signatures).ok_or_else(|| {
            LayoutError::Structure("no time signature declared".to_string())
        })?;
        let key = SignatureTrack::new(&track.key_signatures).ok_or_else(|| {
            LayoutError::Structure("no key signature declared".to_string())
        })?;
        Ok(Self { time, key })
    }

    pub fn at(&self, measure: usize) -> ResolvedSignature {
        ResolvedSignature {
            beats: self.time.at(measure).beats,
            key_fifths: self.key.at(measure).fifths,
        }
    }
}
