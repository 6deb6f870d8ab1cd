//! Frame playback on the strip
//!
//! Two ways of driving playback are provided:
//! - [`Player::tick`] is a non-blocking state machine that returns how long
//!   the caller may sleep, for firmware with its own timer or executor.
//! - [`Player::run_once`] and [`Player::play_pass`] block on an
//!   `embedded-hal` delay, mirroring a plain polling main loop.
//!
//! Touch is only sampled between passes; a started pass always completes.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;

use crate::config::PlaybackConfig;
use crate::frame::{Frame, FrameSequence};
use crate::{StripWriter, TouchInput};

/// How often an idle player wants to be ticked.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where the player is within its trigger cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Waiting for a touch
    Armed,
    /// Writing frames; `next` is due at `deadline`
    Playing { next: usize, deadline: Instant },
    /// Pass finished, waiting for the touch to be released
    Releasing,
}

/// Result of a player tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTick {
    /// Index of the frame written during this tick, if any.
    pub written: Option<usize>,
    /// How long to wait before ticking again.
    pub sleep_duration: Duration,
}

impl PlayerTick {
    const fn idle() -> Self {
        Self {
            written: None,
            sleep_duration: POLL_INTERVAL,
        }
    }
}

/// Plays a loaded image on the strip.
///
/// Owns the frame sequence for the rest of the program; it is never
/// modified after loading.
pub struct Player<W: StripWriter, const MAX_LEDS: usize, const MAX_FRAMES: usize> {
    output: W,
    frames: FrameSequence<MAX_LEDS, MAX_FRAMES>,
    frame_delay: Duration,
    loop_playback: bool,
    state: PlaybackState,
}

impl<W: StripWriter, const MAX_LEDS: usize, const MAX_FRAMES: usize>
    Player<W, MAX_LEDS, MAX_FRAMES>
{
    /// Create a player for loaded frames.
    ///
    /// Loop mode follows how the frames were built; `config` only supplies
    /// the frame delay. A looping player starts on the first tick without a
    /// touch.
    pub fn new(
        frames: FrameSequence<MAX_LEDS, MAX_FRAMES>,
        output: W,
        config: &PlaybackConfig,
    ) -> Self {
        let loop_playback = frames.is_looping();
        let state = if loop_playback {
            PlaybackState::Playing {
                next: 0,
                deadline: Instant::from_ticks(0),
            }
        } else {
            PlaybackState::Armed
        };
        Self {
            output,
            frames,
            frame_delay: config.frame_delay(),
            loop_playback,
            state,
        }
    }

    /// Switch every LED off.
    pub fn blank_strip(&mut self) {
        let blank = Frame::<MAX_LEDS>::blank(self.frames.strip_length());
        self.output.write(blank.as_bytes());
    }

    /// Advance playback.
    ///
    /// `touched` is the current level of the touch input.
    pub fn tick(&mut self, now: Instant, touched: bool) -> PlayerTick {
        match self.state {
            PlaybackState::Armed => {
                if !touched {
                    return PlayerTick::idle();
                }
                self.advance(now, 0, now)
            }
            PlaybackState::Playing { next, deadline } => self.advance(now, next, deadline),
            PlaybackState::Releasing => {
                if !touched {
                    self.state = PlaybackState::Armed;
                }
                PlayerTick::idle()
            }
        }
    }

    fn advance(&mut self, now: Instant, mut next: usize, mut deadline: Instant) -> PlayerTick {
        if now < deadline {
            self.state = PlaybackState::Playing { next, deadline };
            return PlayerTick {
                written: None,
                sleep_duration: deadline.saturating_duration_since(now),
            };
        }

        // Skip the backlog after a long stall instead of bursting frames
        let max_drift = self.frame_delay + self.frame_delay;
        if now > deadline + max_drift {
            deadline = now;
        }

        if next >= self.frames.len() && self.loop_playback {
            next = 0;
        }
        let Some(frame) = self.frames.get(next) else {
            // An empty loop keeps idling instead of waiting for a touch
            self.state = if self.loop_playback {
                PlaybackState::Playing { next: 0, deadline }
            } else {
                PlaybackState::Releasing
            };
            return PlayerTick::idle();
        };

        self.output.write(frame.as_bytes());
        deadline += self.frame_delay;
        self.state = PlaybackState::Playing {
            next: next + 1,
            deadline,
        };

        PlayerTick {
            written: Some(next),
            sleep_duration: deadline.saturating_duration_since(now),
        }
    }

    /// Play every frame once, blocking for the frame delay after each.
    pub fn play_pass<D: DelayNs>(&mut self, delay: &mut D) {
        let delay_us = u32::try_from(self.frame_delay.as_micros()).unwrap_or(u32::MAX);
        for frame in &self.frames {
            self.output.write(frame.as_bytes());
            delay.delay_us(delay_us);
        }
    }

    /// One iteration of a blocking main loop.
    ///
    /// Waits for a touch, plays a pass, then waits for release. In loop mode
    /// the touch is ignored and a pass is played straight away.
    pub fn run_once<T: TouchInput, D: DelayNs>(&mut self, touch: &mut T, delay: &mut D) {
        if self.loop_playback {
            self.play_pass(delay);
            return;
        }

        while !touch.is_touched() {}
        self.play_pass(delay);
        while touch.is_touched() {}
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub const fn frames(&self) -> &FrameSequence<MAX_LEDS, MAX_FRAMES> {
        &self.frames
    }

    pub const fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Get a reference to the strip writer.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Get a mutable reference to the strip writer.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }
}
