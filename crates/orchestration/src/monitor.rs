//! Monitor context

use crate::MonitorSettings;
use alerting::{AlertDispatcher, AlertEffects, Clock};
use calibration::{CaptureError, CaptureProgress, CaptureSchedule, CaptureSession};
use chrono::Utc;
use detection::{AlertEvent, PostureDetector, PostureScore, ProximityDetector};
use landmarks::{Observation, ReferencePose};
use std::sync::Arc;
use storage::{ReferenceStore, StorageError};
use tracing::{debug, info, warn};

/// What the monitor does with incoming frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Frames are ignored
    Idle,
    /// Frames go to the detectors
    Monitoring,
    /// Frames go to the capture session; no alerts
    Calibrating,
}

/// Outcome of one processed frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Alert that actually fired this frame
    pub alert: Option<AlertEvent>,
    /// Capture status signals that became due
    pub progress: Vec<CaptureProgress>,
    /// Set on the frame that ends a capture session
    pub capture: Option<Result<ReferencePose, CaptureError>>,
    /// Posture score snapshot after this frame
    pub score: Option<PostureScore>,
}

/// Orchestration context owning every stateful component
pub struct Monitor {
    proximity: ProximityDetector,
    posture: PostureDetector,
    dispatcher: AlertDispatcher,
    store: Arc<dyn ReferenceStore>,
    clock: Arc<dyn Clock>,
    schedule: CaptureSchedule,
    /// Current reference, refreshed on capture or clear
    reference: Option<ReferencePose>,
    monitoring: bool,
    capture: Option<CaptureSession>,
}

impl Monitor {
    /// Create a monitor, loading any stored reference
    pub fn new(
        settings: MonitorSettings,
        store: Arc<dyn ReferenceStore>,
        clock: Arc<dyn Clock>,
        effects: Arc<dyn AlertEffects>,
    ) -> Self {
        let reference = match store.load() {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Could not load stored reference: {}", e);
                None
            }
        };
        if let Some(reference) = &reference {
            info!(
                "Loaded reference pose (ratio {:.3}, captured {})",
                reference.ratio(),
                reference.captured_at()
            );
        }

        Self {
            proximity: ProximityDetector::new(settings.proximity),
            posture: PostureDetector::new(settings.posture),
            dispatcher: AlertDispatcher::new(settings.alert, clock.clone(), effects),
            store,
            clock,
            schedule: settings.capture,
            reference,
            monitoring: false,
            capture: None,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.capture.is_some() {
            Mode::Calibrating
        } else if self.monitoring {
            Mode::Monitoring
        } else {
            Mode::Idle
        }
    }

    /// Start feeding frames to the detectors
    pub fn start_monitoring(&mut self) {
        if !self.monitoring {
            info!("Monitoring started");
        }
        self.monitoring = true;
    }

    /// Stop monitoring and drop all streak/latch/smoothing state
    pub fn stop_monitoring(&mut self) {
        if self.monitoring {
            info!("Monitoring stopped");
        }
        self.monitoring = false;
        self.reset_detectors();
    }

    /// Begin a capture session (restarting any session in progress)
    pub fn begin_capture(&mut self) -> Vec<CaptureProgress> {
        if self.capture.is_some() {
            debug!("Restarting capture session");
        }
        self.reset_detectors();

        let mut session = CaptureSession::begin(self.schedule.clone(), self.clock.now_ms());
        let progress = session.advance(self.clock.now_ms());
        self.capture = Some(session);
        progress
    }

    /// Discard the current capture session; the prior reference is kept
    pub fn abandon_capture(&mut self) -> bool {
        let abandoned = self.capture.take().is_some();
        if abandoned {
            info!("Capture session abandoned");
        }
        abandoned
    }

    /// Remove the stored reference and stop posture evaluation
    pub fn clear_reference(&mut self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.reference = None;
        self.posture.reset();
        info!("Reference pose cleared");
        Ok(())
    }

    pub fn reference(&self) -> Option<&ReferencePose> {
        self.reference.as_ref()
    }

    /// Latest posture score, while monitoring against a reference
    pub fn posture_score(&self) -> Option<PostureScore> {
        self.posture.score()
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    /// Process one observation
    pub fn process(&mut self, observation: &Observation) -> FrameReport {
        if let Some(session) = self.capture.as_mut() {
            session.ingest(observation);
            return self.poll_capture();
        }

        if !self.monitoring {
            return FrameReport::default();
        }

        let proximity_event = self.proximity.update(observation);
        let posture_event = match &self.reference {
            Some(reference) => self.posture.update(observation, reference),
            None => None,
        };

        // Proximity outranks posture; one dispatch per frame
        let alert = if let Some(event) = proximity_event {
            if self.dispatcher.dispatch(&event) {
                self.proximity.acknowledge();
                Some(event)
            } else {
                None
            }
        } else if let Some(event) = posture_event {
            if self.dispatcher.dispatch(&event) {
                self.posture.acknowledge();
                Some(event)
            } else {
                None
            }
        } else {
            None
        };

        FrameReport {
            alert,
            score: self.posture_score(),
            ..Default::default()
        }
    }

    /// Advance the capture schedule without a new frame
    pub fn tick(&mut self) -> FrameReport {
        if self.capture.is_some() {
            self.poll_capture()
        } else {
            FrameReport::default()
        }
    }

    fn poll_capture(&mut self) -> FrameReport {
        let now = self.clock.now_ms();
        let mut report = FrameReport::default();

        let due = match self.capture.as_mut() {
            Some(session) => {
                report.progress = session.advance(now);
                session.is_due(now)
            }
            None => return report,
        };
        if !due {
            return report;
        }

        if let Some(session) = self.capture.take() {
            let result = session.complete(self.store.as_ref(), Utc::now());
            match &result {
                Ok(reference) => {
                    self.reference = Some(reference.clone());
                    // Smoothed values are meaningless against a new baseline
                    self.posture.reset();
                    report.progress.push(CaptureProgress::Success);
                }
                Err(e) => report.progress.push(CaptureProgress::Failure(e.user_message())),
            }
            report.capture = Some(result);
        }
        report
    }

    fn reset_detectors(&mut self) {
        self.proximity.reset();
        self.posture.reset();
    }
}
