//! Game selection and session lifetime
//!
//! The watch shows a two-entry menu. Picking a game creates a fresh session;
//! going back throws it away. Nothing survives a session.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::driver::{Driver, InputSlot};
use crate::settings::{ConfigError, Settings};
use crate::sim::{
    BreakoutEvent, BreakoutSimulation, BreakoutState, PongEvent, PongSimulation, PongState,
    Simulation,
};

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Pong,
    Breakout,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::Pong, GameKind::Breakout];

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Pong => "Pong",
            GameKind::Breakout => "BreakOut",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Event from whichever game is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", content = "event", rename_all = "snake_case")]
pub enum ArcadeEvent {
    Pong(PongEvent),
    Breakout(BreakoutEvent),
}

/// State of whichever game is running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "state", rename_all = "snake_case")]
pub enum SessionSnapshot {
    Pong(PongState),
    Breakout(BreakoutState),
}

/// A running game
pub enum Session {
    Pong(Driver<PongSimulation>),
    Breakout(Driver<BreakoutSimulation>),
}

impl Session {
    /// Fails if the chosen game's config does not validate
    pub fn new(kind: GameKind, settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        let session = match kind {
            GameKind::Pong => {
                Session::Pong(Driver::new(PongSimulation::new(settings.pong, seed)?, settings))
            }
            GameKind::Breakout => Session::Breakout(Driver::new(
                BreakoutSimulation::new(settings.breakout, seed)?,
                settings,
            )),
        };
        Ok(session)
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Session::Pong(_) => GameKind::Pong,
            Session::Breakout(_) => GameKind::Breakout,
        }
    }

    /// Handle for the crown / drag input source
    pub fn input(&self) -> Arc<InputSlot> {
        match self {
            Session::Pong(d) => d.input(),
            Session::Breakout(d) => d.input(),
        }
    }

    /// Run the ticks `frame_dt` seconds pay for
    pub fn advance(&mut self, frame_dt: f32) -> Vec<ArcadeEvent> {
        match self {
            Session::Pong(d) => d.advance(frame_dt).into_iter().map(ArcadeEvent::Pong).collect(),
            Session::Breakout(d) => d
                .advance(frame_dt)
                .into_iter()
                .map(ArcadeEvent::Breakout)
                .collect(),
        }
    }

    /// Run exactly one tick
    pub fn step(&mut self) -> Vec<ArcadeEvent> {
        match self {
            Session::Pong(d) => d.step().into_iter().map(ArcadeEvent::Pong).collect(),
            Session::Breakout(d) => d.step().into_iter().map(ArcadeEvent::Breakout).collect(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match self {
            Session::Pong(d) => SessionSnapshot::Pong(d.sim().snapshot()),
            Session::Breakout(d) => SessionSnapshot::Breakout(d.sim().snapshot()),
        }
    }

    pub fn time_ticks(&self) -> u64 {
        match self {
            Session::Pong(d) => d.sim().time_ticks(),
            Session::Breakout(d) => d.sim().time_ticks(),
        }
    }

    /// Paddle target that tracks the ball
    pub fn autopilot_target(&self) -> f32 {
        match self {
            Session::Pong(d) => d.sim().autopilot_target(),
            Session::Breakout(d) => d.sim().autopilot_target(),
        }
    }

    /// Only Pong can end on its own
    pub fn is_finished(&self) -> bool {
        match self {
            Session::Pong(d) => d.sim().is_finished(),
            Session::Breakout(_) => false,
        }
    }
}

/// The menu plus at most one running game
pub struct Arcade {
    settings: Settings,
    session: Option<Session>,
}

impl Arcade {
    /// Rejects settings that would not validate
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            session: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start `kind`, discarding whatever was running
    pub fn start(&mut self, kind: GameKind, seed: u64) -> Result<&mut Session, ConfigError> {
        if let Some(old) = self.session.take() {
            log::debug!("Discarding {} session after {} ticks", old.kind(), old.time_ticks());
        }
        log::info!("Starting {} (seed {})", kind, seed);
        let session = Session::new(kind, &self.settings, seed)?;
        Ok(self.session.insert(session))
    }

    /// Back to the menu
    pub fn end(&mut self) -> Option<Session> {
        let session = self.session.take();
        if let Some(s) = &session {
            log::info!("Leaving {} after {} ticks", s.kind(), s.time_ticks());
        }
        session
    }

    pub fn current(&self) -> Option<GameKind> {
        self.session.as_ref().map(Session::kind)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }
}
