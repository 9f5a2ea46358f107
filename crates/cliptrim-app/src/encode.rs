//! Runs ffmpeg trim jobs on a worker thread and reports into the session mailbox.

use cliptrim_core::CliptrimError;
use cliptrim_media::{ExportCancel, TrimJob};
use cliptrim_session::{ExportLauncher, ExportRequest, Mailbox};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, warn};

pub struct FfmpegLauncher {
    output: PathBuf,
}

impl FfmpegLauncher {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl ExportLauncher for FfmpegLauncher {
    fn launch(&mut self, request: ExportRequest, mailbox: Mailbox) -> ExportCancel {
        let cancel = ExportCancel::new();
        let run = request.run;

        let job = match TrimJob::new(
            request.input,
            self.output.clone(),
            request.in_point,
            request.out_point,
            request.format,
            request.quality,
        ) {
            Ok(job) => job,
            Err(e) => {
                let _ = mailbox.export_failed(run, e.to_string());
                return cancel;
            }
        };

        let worker_cancel = cancel.clone();
        let worker_mailbox = mailbox.clone();
        let spawned = thread::Builder::new()
            .name("cliptrim-encoder".into())
            .spawn(move || {
                let result = job.run(
                    |line| {
                        let _ = worker_mailbox.export_progress(run, line);
                    },
                    &worker_cancel,
                );
                match result {
                    Ok(()) => {
                        let _ = worker_mailbox.export_finished(run);
                    }
                    Err(CliptrimError::Cancelled) => debug!(%run, "Encoder stopped"),
                    Err(e) => {
                        let _ = worker_mailbox.export_failed(run, e.to_string());
                    }
                }
            });

        if let Err(e) = spawned {
            warn!(error = %e, "Could not start encoder thread");
            let _ = mailbox.export_failed(run, e.to_string());
        }
        cancel
    }
}
