//! Fixed phase lists of a scene.

/// Ordered phases, each with a duration in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<P> {
    phases: Vec<(P, f64)>,
}

impl<P: Copy> Timeline<P> {
    /// Negative durations count as zero.
    pub fn new(phases: Vec<(P, f64)>) -> Self {
        Self {
            phases: phases.into_iter().map(|(p, d)| (p, d.max(0.0))).collect(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.phases.iter().map(|(_, d)| d).sum()
    }

    pub fn phases(&self) -> &[(P, f64)] {
        &self.phases
    }

    /// Phase active at `time` and the seconds elapsed inside it.
    ///
    /// A phase boundary belongs to the later phase and zero-length phases are
    /// skipped. Times past the end land at the end of the last phase. `None`
    /// only for an empty timeline.
    pub fn locate(&self, time: f64) -> Option<(P, f64)> {
        let (last, last_duration) = *self.phases.last()?;
        let mut start = 0.0;
        for &(phase, duration) in &self.phases {
            if duration > 0.0 && time < start + duration {
                return Some((phase, (time - start).max(0.0)));
            }
            start += duration;
        }
        Some((last, last_duration))
    }
}

/// Fraction of a phase completed after `elapsed` seconds, clamped to `[0, 1]`.
/// Zero-length phases count as complete.
pub fn phase_fraction(elapsed: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}
