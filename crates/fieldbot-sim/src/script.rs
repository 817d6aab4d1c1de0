//! Scripted match timeline.

use std::time::Duration;

use fieldbot_robot::ModeSource;
use fieldbot_scheduler::Mode;

/// Phase lengths of a simulated match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTimeline {
    pub pre_match: Duration,
    pub autonomous: Duration,
    pub gap: Duration,
    pub teleop: Duration,
    pub post_match: Duration,
}

impl MatchTimeline {
    /// Total length of the match.
    pub fn total(&self) -> Duration {
        self.pre_match + self.autonomous + self.gap + self.teleop + self.post_match
    }

    /// Mode requested at `t`, `None` once the match is over.
    pub fn mode_at(&self, t: Duration) -> Option<Mode> {
        let phases = [
            (self.pre_match, Mode::Disabled),
            (self.autonomous, Mode::Autonomous),
            (self.gap, Mode::Disabled),
            (self.teleop, Mode::Teleop),
            (self.post_match, Mode::Disabled),
        ];

        let mut end = Duration::ZERO;
        for (length, mode) in phases {
            end += length;
            if t < end {
                return Some(mode);
            }
        }
        None
    }
}

/// [`ModeSource`] that follows a [`MatchTimeline`] on the loop clock.
#[derive(Debug)]
pub struct ScriptedMatch {
    timeline: MatchTimeline,
    last: Option<Mode>,
}

impl ScriptedMatch {
    pub fn new(timeline: MatchTimeline) -> Self {
        Self {
            timeline,
            last: None,
        }
    }
}

impl ModeSource for ScriptedMatch {
    fn requested_mode(&mut self, now: Duration) -> Option<Mode> {
        let mode = self.timeline.mode_at(now);
        if mode != self.last {
            if let Some(m) = mode {
                tracing::info!(mode = %m, at_s = now.as_secs_f64(), "field requests mode");
            }
            self.last = mode;
        }
        mode
    }
}
