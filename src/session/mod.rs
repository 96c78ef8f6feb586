// Session - One run of a sequence, driven by wall clock and user commands
// Owns the sequencer, converts elapsed time into ticks and records a summary

pub mod summary;
pub mod ticker;

pub use summary::SessionSummary;
pub use ticker::{DEFAULT_TICK_INTERVAL, Ticker};

use crate::messaging::{Command, CommandConsumer};
use crate::sequencer::{Sequence, SequencerError, SequencerResult, SequencerStatus, StepSequencer};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A sequencer plus its clock
///
/// The host calls `pump` from its loop and feeds user input through `apply`
/// or `drain_commands`.
pub struct Session {
    id: Uuid,
    sequencer: StepSequencer,
    ticker: Ticker,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    steps_reached: usize,
}

impl Session {
    pub fn new(sequencer: StepSequencer, tick_interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequencer,
            ticker: Ticker::new(tick_interval),
            started_at: None,
            finished_at: None,
            steps_reached: 0,
        }
    }

    /// Load a sequence into the sequencer, starting a fresh record
    pub fn load(&mut self, sequence: Sequence) -> SequencerResult<()> {
        self.sequencer.load(sequence)?;
        self.id = Uuid::new_v4();
        self.started_at = None;
        self.finished_at = None;
        self.steps_reached = 0;
        self.ticker.disarm();
        Ok(())
    }

    /// Route one user command to the sequencer
    pub fn apply(&mut self, command: Command) -> SequencerResult<()> {
        self.apply_at(command, Instant::now())
    }

    /// Route one user command, with `now` as the time it took effect
    ///
    /// Starting or resuming the clock rearms the ticker so the first tick
    /// lands one interval after `now`.
    pub fn apply_at(&mut self, command: Command, now: Instant) -> SequencerResult<()> {
        let before = self.sequencer.status();

        match command {
            Command::Start => self.sequencer.start()?,
            Command::Pause => self.sequencer.pause()?,
            Command::Resume => self.sequencer.resume()?,
            Command::TogglePause => match before {
                SequencerStatus::Running => self.sequencer.pause()?,
                SequencerStatus::Paused => self.sequencer.resume()?,
                _ => {}
            },
            Command::Advance => self.sequencer.advance()?,
            Command::Retreat => self.sequencer.retreat()?,
            Command::CompleteSubIteration => self.sequencer.complete_sub_iteration()?,
            Command::Stop => {
                self.sequencer.stop();
                if before.is_active() {
                    self.finished_at = Some(Utc::now());
                }
            }
        }

        if command == Command::Start
            && matches!(before, SequencerStatus::Idle | SequencerStatus::Completed)
        {
            self.started_at = Some(Utc::now());
            self.finished_at = None;
            self.steps_reached = 0;
            tracing::info!(session = %self.id, "Session run started");
        }

        self.sync();
        if !before.is_running() && self.sequencer.status().is_running() {
            self.ticker.rearm(now);
        }
        Ok(())
    }

    /// Apply every queued command
    ///
    /// Commands that do not apply in the current state are logged and
    /// ignored. Returns the number of commands that were applied.
    pub fn drain_commands(&mut self, rx: &mut CommandConsumer) -> usize {
        let mut applied = 0;
        while let Some(command) = ringbuf::traits::Consumer::try_pop(rx) {
            match self.apply(command) {
                Ok(()) => applied += 1,
                Err(e @ SequencerError::InvalidState { .. }) => {
                    tracing::debug!(?command, error = %e, "Ignoring command");
                }
                Err(e) => {
                    tracing::warn!(?command, error = %e, "Command failed");
                }
            }
        }
        applied
    }

    /// Tick the sequencer if a logical second is due at `now`
    ///
    /// The ticker is disarmed whenever the sequencer is not running. A
    /// sequencer started through `sequencer_mut` instead of `apply` gets its
    /// ticker armed here. Returns true when a tick was processed.
    pub fn pump(&mut self, now: Instant) -> SequencerResult<bool> {
        if !self.sequencer.status().is_running() {
            self.ticker.disarm();
            return Ok(false);
        }

        if !self.ticker.is_armed() {
            self.ticker.rearm(now);
            return Ok(false);
        }

        if !self.ticker.poll(now) {
            return Ok(false);
        }

        self.sequencer.tick()?;
        self.sync();
        Ok(true)
    }

    /// Time until the next tick, `None` when not running
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_due(now)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            sequence_name: self
                .sequencer
                .sequence()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            total_steps: self.sequencer.sequence().map_or(0, Sequence::len),
            steps_reached: self.steps_reached,
            session_elapsed: self.sequencer.session_elapsed(),
            completed: self.sequencer.status().is_completed(),
            status: self.sequencer.status(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SequencerStatus {
        self.sequencer.status()
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut StepSequencer {
        &mut self.sequencer
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Bookkeeping after every transition
    fn sync(&mut self) {
        let status = self.sequencer.status();

        if status.is_active() {
            self.steps_reached = self.steps_reached.max(self.sequencer.cursor() + 1);
        }

        if status.is_completed() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
            tracing::info!(
                session = %self.id,
                elapsed = self.sequencer.session_elapsed(),
                "Session finished"
            );
        }

        if !status.is_running() {
            self.ticker.disarm();
        }
    }
}
