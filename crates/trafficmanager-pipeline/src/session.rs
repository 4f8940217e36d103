//! One running pipeline: stage threads, the links between them and the
//! shared registry.
//!
//! Teardown order matters. `shutdown` raises the shutdown flag, stops every
//! link so blocked receivers wake up, and only then joins the stage threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use trafficmanager_messenger::{Link, Messenger};
use trafficmanager_track::TrackTraffic;

use crate::config::{PipelineConfig, TrafficManagerConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::report::{LinkReport, SessionReport};
use crate::stage::{Stage, StageCounters, StageLoop};

struct StageHandle {
    name: String,
    counters: Arc<StageCounters>,
    thread: Option<JoinHandle<()>>,
    panicked: bool,
}

/// A pipeline instance.
pub struct Session {
    config: PipelineConfig,
    track: Arc<TrackTraffic>,
    links: Vec<Arc<dyn Link>>,
    stages: Vec<StageHandle>,
    shutdown: Arc<AtomicBool>,
    paused: bool,
    finished: bool,
}

impl Session {
    /// Create a session with a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &TrafficManagerConfig) -> PipelineResult<Self> {
        config.validate()?;
        let track = Arc::new(TrackTraffic::with_config(&config.track));
        Ok(Self::with_track(config.pipeline.clone(), track))
    }

    /// Create a session around an existing registry. The pipeline section is
    /// used as given.
    #[must_use]
    pub fn with_track(config: PipelineConfig, track: Arc<TrackTraffic>) -> Self {
        tracing::info!(
            shards = track.shard_count(),
            backoff_ms = config.stage_backoff_ms,
            "Traffic manager session created"
        );
        Self {
            config,
            track,
            links: Vec::new(),
            stages: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            paused: false,
            finished: false,
        }
    }

    /// The registry shared by every stage of this session.
    #[must_use]
    pub fn track(&self) -> &Arc<TrackTraffic> {
        &self.track
    }

    /// Create a link and register it for pause, resume and shutdown.
    pub fn link<T: Send + 'static>(&mut self, name: impl Into<String>) -> Arc<Messenger<T>> {
        let messenger = Arc::new(Messenger::named(name));
        if self.finished {
            messenger.stop();
        }
        self.links.push(Arc::clone(&messenger) as Arc<dyn Link>);
        messenger
    }

    /// Run `stage` on its own thread, reading `inbound` and writing
    /// `outbound`. A stage without an outbound link is a sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is shut down or the thread cannot be
    /// spawned.
    pub fn spawn_stage<S: Stage>(
        &mut self,
        stage: S,
        inbound: Arc<Messenger<S::Input>>,
        outbound: Option<Arc<Messenger<S::Output>>>,
    ) -> PipelineResult<()> {
        if self.finished {
            return Err(PipelineError::ShutDown);
        }

        let name = stage.name().to_string();
        let counters = Arc::new(StageCounters::default());
        let stage_loop = StageLoop {
            stage,
            inbound,
            outbound,
            shutdown: Arc::clone(&self.shutdown),
            counters: Arc::clone(&counters),
            backoff: self.config.stage_backoff(),
        };

        let thread = thread::Builder::new()
            .name(format!("{}-{}", self.config.thread_name_prefix, name))
            .spawn(move || stage_loop.run())
            .map_err(|e| PipelineError::spawn_failed(name.clone(), e))?;

        tracing::debug!(stage = %name, "Stage spawned");
        self.stages.push(StageHandle {
            name,
            counters,
            thread: Some(thread),
            panicked: false,
        });
        Ok(())
    }

    /// Stop every link. Stage threads stay alive and back off until resumed.
    pub fn pause(&mut self) {
        for link in &self.links {
            link.stop();
        }
        self.paused = true;
        tracing::info!(links = self.links.len(), "Session paused");
    }

    /// Restart every link; queued packets flow again.
    pub fn resume(&mut self) {
        if self.finished {
            return;
        }
        for link in &self.links {
            link.start();
        }
        self.paused = false;
        tracing::info!(links = self.links.len(), "Session resumed");
    }

    /// Whether links are currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of spawned stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of registered links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Stop every link, join every stage thread and report.
    ///
    /// Calling it again returns the same counters without blocking.
    pub fn shutdown(&mut self) -> SessionReport {
        if !self.finished {
            tracing::info!(stages = self.stages.len(), "Shutting down session");
            self.shutdown.store(true, Ordering::Release);
            for link in &self.links {
                link.stop();
            }
        }

        let mut report = SessionReport::default();
        for handle in &mut self.stages {
            if let Some(thread) = handle.thread.take()
                && thread.join().is_err()
            {
                tracing::error!(stage = %handle.name, "Stage thread panicked");
                handle.panicked = true;
            }
            report
                .stages
                .push(handle.counters.report(&handle.name, handle.panicked));
        }
        report.links = self
            .links
            .iter()
            .map(|link| LinkReport {
                name: link.name().to_string(),
                stats: link.stats(),
            })
            .collect();

        if !self.finished {
            self.finished = true;
            tracing::info!(
                pending = report.pending_packets(),
                "Session shut down"
            );
        }
        report
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.finished {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("stages", &self.stages.len())
            .field("links", &self.links.len())
            .field("paused", &self.paused)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
