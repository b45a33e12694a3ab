//! Sound cue playback

use std::{
    collections::HashMap,
    path::PathBuf,
    process::Stdio,
    sync::Mutex,
    time::Duration,
};
use futures::future::BoxFuture;
use tokio::{
    process::{Child, Command},
    time::timeout,
};
use tracing::{debug, info};

use crate::timer::Cue;

/// How long a deferred probe watches the player for an early failure
const VERIFY_WINDOW: Duration = Duration::from_millis(300);

/// Something that can play the notification cues
pub trait SoundPlayer: Send + Sync {
    /// Start playing a cue from the beginning
    fn play(&self, cue: Cue) -> Result<(), String>;

    /// Stop a cue and rewind it; stopping a silent cue is fine
    fn stop(&self, cue: Cue);

    /// Play then immediately stop, proving playback is permitted right now
    fn probe(&self, cue: Cue) -> Result<(), String>;

    /// Deferred probe used when the immediate one fails
    fn verify(&self, cue: Cue) -> BoxFuture<'static, Result<(), String>>;
}

/// Plays cues by spawning a player program with a per-cue sound file
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    sounds: HashMap<Cue, PathBuf>,
    playing: Mutex<HashMap<Cue, Child>>,
}

impl CommandPlayer {
    pub fn new(program: String, sounds: HashMap<Cue, PathBuf>) -> Self {
        Self {
            program,
            sounds,
            playing: Mutex::new(HashMap::new()),
        }
    }

    fn command_for(&self, cue: Cue) -> Result<Command, String> {
        let path = self
            .sounds
            .get(&cue)
            .ok_or_else(|| format!("No sound file configured for {}", cue.name()))?;

        if !path.exists() {
            return Err(format!("Sound file for {} not found: {}", cue.name(), path.display()));
        }

        let mut command = Command::new(&self.program);
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        Ok(command)
    }

    fn spawn(&self, cue: Cue) -> Result<Child, String> {
        self.command_for(cue)?
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.program, e))
    }
}

impl SoundPlayer for CommandPlayer {
    fn play(&self, cue: Cue) -> Result<(), String> {
        self.stop(cue);
        let child = self.spawn(cue)?;

        let mut playing = self.playing.lock()
            .map_err(|e| format!("Failed to lock player state: {}", e))?;
        playing.insert(cue, child);
        debug!("Playing {}", cue.name());
        Ok(())
    }

    fn stop(&self, cue: Cue) {
        let child = match self.playing.lock() {
            Ok(mut playing) => playing.remove(&cue),
            Err(_) => None,
        };

        if let Some(mut child) = child {
            if let Err(e) = child.start_kill() {
                debug!("{} already finished: {}", cue.name(), e);
            }
        }
    }

    fn probe(&self, cue: Cue) -> Result<(), String> {
        let mut child = self.spawn(cue)?;
        // Dropping the handle would also kill it, but do it eagerly
        if let Err(e) = child.start_kill() {
            debug!("Probe of {} already finished: {}", cue.name(), e);
        }
        debug!("Probe of {} succeeded", cue.name());
        Ok(())
    }

    fn verify(&self, cue: Cue) -> BoxFuture<'static, Result<(), String>> {
        let spawned = self.spawn(cue);
        let program = self.program.clone();

        Box::pin(async move {
            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => return Err(e),
            };
            match timeout(VERIFY_WINDOW, child.wait()).await {
                // Still playing after the window: playback works
                Err(_) => {
                    if let Err(e) = child.start_kill() {
                        debug!("Deferred probe of {} already finished: {}", cue.name(), e);
                    }
                    info!("Deferred probe of {} succeeded", cue.name());
                    Ok(())
                }
                Ok(Ok(status)) if status.success() => Ok(()),
                Ok(Ok(status)) => Err(format!("{} exited with {}", program, status)),
                Ok(Err(e)) => Err(format!("Failed to wait for {}: {}", program, e)),
            }
        })
    }
}
