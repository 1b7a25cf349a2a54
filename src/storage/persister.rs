//! Ordered snapshot writer for one room
//!
//! Writes are applied in submission order by a dedicated task, so a slow
//! write never lets an older snapshot overwrite a newer one.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::{PixelwarError, Result};
use crate::storage::snapshot::RoomSnapshot;
use crate::storage::store::RoomStore;

struct WriteJob {
    snapshot: RoomSnapshot,
    ack: Option<oneshot::Sender<Result<()>>>,
}

pub struct Persister {
    jobs: mpsc::UnboundedSender<WriteJob>,
}

impl Persister {
    pub fn spawn(store: RoomStore) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = store.save_snapshot(&job.snapshot).await;
                match &result {
                    Ok(()) => debug!("Snapshot written for room {}", store.scope()),
                    Err(e) => error!("Snapshot write for room {} failed: {}", store.scope(), e),
                }
                if let Some(ack) = job.ack {
                    let _ = ack.send(result);
                }
            }
        });

        Self { jobs }
    }

    /// Queue a write without waiting for it
    pub fn persist(&self, snapshot: RoomSnapshot) {
        let job = WriteJob {
            snapshot,
            ack: None,
        };
        if self.jobs.send(job).is_err() {
            error!("Snapshot writer is gone, dropping write");
        }
    }

    /// Queue a write and wait until it and every earlier write are durable
    pub async fn persist_and_wait(&self, snapshot: RoomSnapshot) -> Result<()> {
        let (ack, done) = oneshot::channel();
        let job = WriteJob {
            snapshot,
            ack: Some(ack),
        };
        self.jobs
            .send(job)
            .map_err(|_| PixelwarError::RoomUnavailable)?;
        done.await.map_err(|_| PixelwarError::RoomUnavailable)?
    }
}
