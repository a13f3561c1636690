use crate::model::{AnimationKind, AnimationSettings, StaggerStyle};

/// Per-element timing for one animation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingSchedule {
    /// Seconds from document load until this element's animation begins.
    pub start: f64,
    /// Seconds the element's own animation runs.
    pub duration: f64,
    /// Keyframe positions as fractions of `duration`, when the family needs
    /// a non-uniform schedule.
    pub key_times: Option<Vec<f64>>,
}

impl TimingSchedule {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Seconds between consecutive element starts under the sequential style.
pub fn stagger_step(kind: AnimationKind) -> f64 {
    match kind {
        AnimationKind::Typewriter | AnimationKind::Fade => 0.2,
        _ => 0.1,
    }
}

/// Pure timing function: element index + settings in, schedule out.
///
/// Typewriter ignores the chosen stagger style and the duration setting: it
/// is always sequential with a fixed 0.3 s window per element, hidden for
/// the first 70% of that window.
pub fn schedule(index: usize, count: usize, settings: &AnimationSettings) -> TimingSchedule {
    debug_assert!(index < count);

    if settings.kind == AnimationKind::Typewriter {
        return TimingSchedule {
            start: settings.delay + index as f64 * stagger_step(settings.kind),
            duration: 0.3,
            key_times: Some(vec![0.0, 0.7, 1.0]),
        };
    }

    let start = match settings.style {
        StaggerStyle::Sequential => settings.delay + index as f64 * stagger_step(settings.kind),
        StaggerStyle::Simultaneous | StaggerStyle::Continuous => settings.delay,
    };

    let key_times = match settings.kind {
        AnimationKind::Bounce => Some(vec![0.0, 0.5, 0.8, 1.0]),
        _ => None,
    };

    TimingSchedule {
        start,
        duration: settings.duration,
        key_times,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnimationSettings;

    fn settings(kind: AnimationKind, style: StaggerStyle, delay: f64) -> AnimationSettings {
        AnimationSettings {
            kind,
            style,
            delay,
            ..AnimationSettings::default()
        }
    }

    #[test]
    fn simultaneous_starts_are_identical() {
        let s = settings(AnimationKind::Stroke, StaggerStyle::Simultaneous, 0.5);
        for i in 0..4 {
            assert_eq!(schedule(i, 4, &s).start, 0.5);
        }
    }

    #[test]
    fn continuous_starts_match_simultaneous() {
        let s = settings(AnimationKind::Stroke, StaggerStyle::Continuous, 1.5);
        assert_eq!(schedule(0, 1, &s).start, 1.5);
    }

    #[test]
    fn sequential_starts_increase_with_constant_step() {
        let s = settings(AnimationKind::Stroke, StaggerStyle::Sequential, 0.0);
        let starts: Vec<f64> = (0..5).map(|i| schedule(i, 5, &s).start).collect();
        for w in starts.windows(2) {
            assert!((w[1] - w[0] - 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn sequential_fade_uses_the_wider_step() {
        let s = settings(AnimationKind::Fade, StaggerStyle::Sequential, 1.0);
        let starts: Vec<f64> = (0..3).map(|i| schedule(i, 3, &s).start).collect();
        for (start, expected) in starts.iter().zip([1.0, 1.2, 1.4]) {
            assert!((start - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn typewriter_is_sequential_regardless_of_style() {
        for style in [
            StaggerStyle::Simultaneous,
            StaggerStyle::Sequential,
            StaggerStyle::Continuous,
        ] {
            let s = settings(AnimationKind::Typewriter, style, 0.0);
            let sched = schedule(3, 5, &s);
            assert!((sched.start - 0.6).abs() < 1e-12);
            assert_eq!(sched.duration, 0.3);
            assert_eq!(sched.key_times.as_deref(), Some(&[0.0, 0.7, 1.0][..]));
        }
    }

    #[test]
    fn bounce_carries_its_key_times() {
        let s = settings(AnimationKind::Bounce, StaggerStyle::Simultaneous, 0.0);
        let sched = schedule(0, 1, &s);
        assert_eq!(sched.key_times.as_deref(), Some(&[0.0, 0.5, 0.8, 1.0][..]));
        assert_eq!(sched.duration, s.duration);
    }

    #[test]
    fn end_is_start_plus_duration() {
        let s = settings(AnimationKind::Slide, StaggerStyle::Sequential, 0.25);
        let sched = schedule(2, 3, &s);
        assert!((sched.end() - (0.25 + 0.2 + s.duration)).abs() < 1e-12);
    }
}
