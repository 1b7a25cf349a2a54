use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};

use crate::room::coordinator::Command;

/// One game-clock second
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Feeds `Command::Tick` into a coordinator once per second. The task holds
/// only a weak sender so it never keeps a room alive on its own.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking; any previous task is stopped and its ticks go stale
    pub fn start(&mut self, commands: WeakUnboundedSender<Command>) {
        self.stop();
        self.generation += 1;
        let generation = self.generation;

        self.handle = Some(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

            loop {
                timer.tick().await;

                let Some(commands) = commands.upgrade() else {
                    break;
                };
                if commands.send(Command::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Idempotent
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Ticks carrying any other generation are stale
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
