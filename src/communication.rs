use std::{
    path::{Path, PathBuf},
    sync::mpsc::{SendError, Sender},
};

use crate::alarm::AlarmId;

/// commands for the thread that owns the audio output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    AlarmTriggered { alarm_id: AlarmId, sound: PathBuf },
    // the ringing alarm was stopped, removed or disabled
    AlarmStopped,
}

/// Plays the alarm sound somewhere else.
///
/// Calls must not block: they hand the command off and return.
/// Failures are reported to the caller, the ringing state moves on regardless.
pub trait SoundPlayer {
    type Error: std::error::Error;

    /// # Errors
    /// if the command couldn't be handed to the player
    fn play(&mut self, alarm: AlarmId, sound: &Path) -> Result<(), Self::Error>;

    /// # Errors
    /// if the command couldn't be handed to the player
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// forwards player commands over a channel to a player thread
#[derive(Debug, Clone)]
pub struct ChannelPlayer {
    sender: Sender<Message>,
}

impl ChannelPlayer {
    #[must_use]
    pub const fn new(sender: Sender<Message>) -> Self {
        Self { sender }
    }
}

impl SoundPlayer for ChannelPlayer {
    type Error = SendError<Message>;

    fn play(&mut self, alarm_id: AlarmId, sound: &Path) -> Result<(), Self::Error> {
        self.sender.send(Message::AlarmTriggered {
            alarm_id,
            sound: sound.to_path_buf(),
        })
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.sender.send(Message::AlarmStopped)
    }
}
