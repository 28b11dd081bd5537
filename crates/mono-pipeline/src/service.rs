//! Async pipeline service — a serialized worker with atomic publishes.
//!
//! Commands queue on an mpsc channel and run in order on a dedicated
//! worker task, keeping decode and recompute off the caller's task.
//! In-flight policy: serialize — a command arriving during a recompute
//! waits for it rather than superseding it. Every state change is
//! published as one whole [`PipelineSnapshot`] through a watch channel,
//! so readers never observe a torn artifact set. A failed command keeps
//! the previous artifacts and carries the error message instead.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use mono_codec::RgbImage;

use crate::artifacts::ArtifactSet;
use crate::options::PipelineOptions;
use crate::pipeline::Pipeline;
use crate::{PipelineError, Result};

/// Maximum number of queued pipeline commands.
const COMMAND_CAPACITY: usize = 32;

/// Commands accepted by the pipeline worker.
#[derive(Debug)]
pub enum PipelineCommand {
    /// Decode an encoded image and run the full chain.
    LoadEncoded(Vec<u8>),

    /// Install an already decoded image and run the chain.
    LoadDecoded(RgbImage),

    /// Update the threshold and re-run binarize→pack→format.
    SetThreshold(i64),

    /// Dismiss the last error message without touching artifacts.
    ClearError,
}

/// Point-in-time view of the pipeline published to readers.
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    /// Latest completed artifact set; `None` until an image loads.
    pub artifacts: Option<Arc<ArtifactSet>>,

    /// Threshold currently in effect.
    pub threshold: u8,

    /// True while the worker is processing a command.
    pub busy: bool,

    /// Message from the most recent failed command, if not dismissed.
    pub last_error: Option<String>,
}

/// Handle to a running pipeline worker.
///
/// Dropping the handle closes the command queue; the worker drains what
/// is already queued and stops.
#[derive(Debug)]
pub struct PipelineService {
    commands: mpsc::Sender<PipelineCommand>,
    snapshots: watch::Receiver<PipelineSnapshot>,
    worker: JoinHandle<()>,
}

impl PipelineService {
    /// Spawn a worker with the given options.
    pub fn spawn(options: PipelineOptions) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let initial = PipelineSnapshot {
            artifacts: None,
            threshold: options.threshold,
            busy: false,
            last_error: None,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let worker = tokio::spawn(worker_loop(
            Pipeline::with_options(options),
            command_rx,
            snapshot_tx,
        ));
        info!("Pipeline worker started (capacity={COMMAND_CAPACITY})");

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            worker,
        }
    }

    /// Queue a command for the worker.
    pub async fn send(&self, command: PipelineCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PipelineError::ServiceStopped)
    }

    /// Queue a load of encoded image bytes.
    pub async fn load_encoded(&self, bytes: Vec<u8>) -> Result<()> {
        self.send(PipelineCommand::LoadEncoded(bytes)).await
    }

    /// Queue a load of an already decoded image.
    pub async fn load_decoded(&self, image: RgbImage) -> Result<()> {
        self.send(PipelineCommand::LoadDecoded(image)).await
    }

    /// Queue a threshold update.
    pub async fn set_threshold(&self, value: i64) -> Result<()> {
        self.send(PipelineCommand::SetThreshold(value)).await
    }

    /// Queue a dismissal of the last error message.
    pub async fn clear_error(&self) -> Result<()> {
        self.send(PipelineCommand::ClearError).await
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Close the queue, let the worker drain it, and wait for it to stop.
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "Pipeline worker did not stop cleanly");
        }
    }
}

/// Worker loop — processes commands sequentially.
async fn worker_loop(
    mut pipeline: Pipeline,
    mut commands: mpsc::Receiver<PipelineCommand>,
    snapshots: watch::Sender<PipelineSnapshot>,
) {
    let mut last_error: Option<String> = None;

    while let Some(command) = commands.recv().await {
        let name = match &command {
            PipelineCommand::LoadEncoded(_) => "load_encoded",
            PipelineCommand::LoadDecoded(_) => "load_decoded",
            PipelineCommand::SetThreshold(_) => "set_threshold",
            PipelineCommand::ClearError => "clear_error",
        };
        debug!(command = name, "Processing pipeline command");
        publish(&snapshots, &pipeline, true, last_error.clone());

        let result = match command {
            PipelineCommand::LoadEncoded(bytes) => pipeline.load_encoded(&bytes).map(|_| ()),
            PipelineCommand::LoadDecoded(image) => {
                pipeline.load_image(image);
                Ok(())
            }
            PipelineCommand::SetThreshold(value) => pipeline.set_threshold(value).map(|_| ()),
            PipelineCommand::ClearError => {
                last_error = None;
                Ok(())
            }
        };

        match result {
            // A successful command also clears a stale error.
            Ok(()) => last_error = None,
            Err(e) => {
                warn!(error = %e, "Pipeline command failed, previous artifacts retained");
                last_error = Some(e.to_string());
            }
        }

        publish(&snapshots, &pipeline, false, last_error.clone());
    }

    info!("Pipeline worker stopped");
}

/// Publish one whole snapshot; ignored when every receiver is gone.
fn publish(
    snapshots: &watch::Sender<PipelineSnapshot>,
    pipeline: &Pipeline,
    busy: bool,
    last_error: Option<String>,
) {
    let snapshot = PipelineSnapshot {
        artifacts: pipeline.artifacts().cloned(),
        threshold: pipeline.threshold(),
        busy,
        last_error,
    };
    let _ = snapshots.send(snapshot);
}
