// Control commands - Communication UI → session

/// In-page control surface of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    Advance,
    Retreat,
    CompleteSubIteration,
    Stop,
}

impl Command {
    /// Parse a single-key terminal shortcut
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "s" | "start" => Some(Command::Start),
            "p" | "pause" => Some(Command::Pause),
            "r" | "resume" => Some(Command::Resume),
            "" | "t" => Some(Command::TogglePause),
            "n" | "next" => Some(Command::Advance),
            "b" | "back" => Some(Command::Retreat),
            "c" | "done" => Some(Command::CompleteSubIteration),
            "q" | "stop" => Some(Command::Stop),
            _ => None,
        }
    }
}
