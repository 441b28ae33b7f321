use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::debug;

use crate::processing;
use crate::state::EditState;

/// A finished render, tagged with the request that produced it.
pub struct RenderOutput {
    pub generation: u64,
    pub image: RgbaImage,
}

struct Job {
    generation: u64,
    original: Arc<RgbaImage>,
    state: EditState,
}

/// Renders on a background thread, one job at a time.
///
/// A request made while a render is running takes the single pending slot,
/// replacing whatever was waiting there. Only results for the newest request are
/// handed back; anything older is dropped on arrival.
pub struct RenderWorker {
    tx: mpsc::Sender<RenderOutput>,
    rx: mpsc::Receiver<RenderOutput>,
    latest: u64,
    in_flight: bool,
    pending: Option<Job>,
}

impl Default for RenderWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderWorker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            latest: 0,
            in_flight: false,
            pending: None,
        }
    }

    /// Queue a render and return its generation number.
    pub fn request(&mut self, original: Arc<RgbaImage>, state: EditState) -> u64 {
        self.latest += 1;
        let job = Job {
            generation: self.latest,
            original,
            state,
        };
        if self.in_flight {
            if let Some(old) = self.pending.replace(job) {
                debug!(generation = old.generation, "superseded before starting");
            }
        } else {
            self.spawn(job);
        }
        self.latest
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight || self.pending.is_some()
    }

    /// Drain finished renders without blocking; returns the newest one if it is current.
    pub fn poll(&mut self) -> Option<RenderOutput> {
        let mut current = None;
        while let Ok(out) = self.rx.try_recv() {
            if let Some(out) = self.finish(out) {
                current = Some(out);
            }
        }
        current
    }

    /// Block until the newest request has rendered, or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<RenderOutput> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let out = self.rx.recv_timeout(remaining).ok()?;
            if let Some(out) = self.finish(out) {
                return Some(out);
            }
        }
    }

    fn finish(&mut self, out: RenderOutput) -> Option<RenderOutput> {
        self.in_flight = false;
        if let Some(job) = self.pending.take() {
            self.spawn(job);
        }
        if out.generation == self.latest {
            Some(out)
        } else {
            debug!(generation = out.generation, latest = self.latest, "dropping stale render");
            None
        }
    }

    fn spawn(&mut self, job: Job) {
        self.in_flight = true;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let image = processing::render(&job.original, &job.state);
            let _ = tx.send(RenderOutput {
                generation: job.generation,
                image,
            });
        });
    }
}
