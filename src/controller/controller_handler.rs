//! The recording controller: a polling state machine over [`Status`].
//!
//! Every tick performs one status check, reacts to it and sleeps. Captures run inside the
//! tick: the controller awaits the capture process's exit before it polls again, so the
//! channel is not monitored while a capture is in progress and a capture tool crash is only
//! noticed on the next tick.
//!
//! | state | status       | action                                             | next  |
//! |-------|--------------|----------------------------------------------------|-------|
//! | Idle  | Offline      | sleep                                              | Idle  |
//! | any   | NotFound     | log, sleep                                         | same  |
//! | any   | Error        | notify, short backoff, fatal error                 | -     |
//! | any   | Unauthorized | notify, refresh credential                         | same  |
//! | any   | Online       | notify start, capture, process, sleep              | Live  |
//! | Live  | Offline      | notify stop, drop session, sleep                   | Idle  |
//!
//! Every Online poll announces a start, even when it only resumes a capture that ended
//! while the channel stayed live. The session survives until an Offline poll, so the stop
//! goes out once.

use std::sync::Arc;

use chrono::Local;
use log::{debug, error, info, warn};

use crate::configuration::config::Config;
use crate::data_capture::capture_process::{Capturer, StreamlinkCapturer};
use crate::data_capture::filename::capture_filename;
use crate::error_handling::types::ControllerError;
use crate::notification::notifier::Notifier;
use crate::notification::types::Notification;
use crate::post_processing::post_processor::ArtifactProcessor;
use crate::session_management::{RecorderState, StreamSession};
use crate::storage::recording_layout::RecordingLayout;
use crate::twitch_api::credentials::{ClientCredentialsProvider, CredentialProvider};
use crate::twitch_api::status_classifier::{HelixStatusClassifier, StatusSource};
use crate::twitch_api::types::{ChannelInfo, Credential, Status};

/// Detail sent with the notification that precedes a fatal exit.
pub const FATAL_STATUS_MESSAGE: &str = "Unexpected error while checking the stream status, exiting";

/// Detail sent when the API rejects the current token.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized, will attempt to log back in immediately";

/// External collaborators of the controller.
pub struct Collaborators {
    pub credentials: Arc<dyn CredentialProvider>,
    pub status: Arc<dyn StatusSource>,
    pub capturer: Arc<dyn Capturer>,
    pub processor: Arc<dyn ArtifactProcessor>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct Controller {
    config: Config,
    layout: RecordingLayout,
    credentials: Arc<dyn CredentialProvider>,
    status: Arc<dyn StatusSource>,
    capturer: Arc<dyn Capturer>,
    processor: Arc<dyn ArtifactProcessor>,
    notifier: Arc<dyn Notifier>,
    /// Current bearer token; `None` until the first authentication and after a rejection
    credential: Option<Credential>,
    session: Option<StreamSession>,
}

impl Controller {
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        info!("Creating controller for channel {}", config.username);
        Self {
            layout: config.layout(),
            config,
            credentials: collaborators.credentials,
            status: collaborators.status,
            capturer: collaborators.capturer,
            processor: collaborators.processor,
            notifier: collaborators.notifier,
            credential: None,
            session: None,
        }
    }

    /// Wires the production collaborators (Helix API, streamlink) around the given notifier
    /// and post-processor.
    pub fn from_config(
        config: Config,
        notifier: Arc<dyn Notifier>,
        processor: Arc<dyn ArtifactProcessor>,
    ) -> Result<Self, ControllerError> {
        let collaborators = Collaborators {
            credentials: Arc::new(ClientCredentialsProvider::from_config(&config)?),
            status: Arc::new(HelixStatusClassifier::from_config(&config)?),
            capturer: Arc::new(StreamlinkCapturer::from_config(&config)),
            processor,
            notifier,
        };
        Ok(Self::new(config, collaborators))
    }

    pub fn state(&self) -> RecorderState {
        match self.session {
            Some(_) => RecorderState::Live,
            None => RecorderState::Idle,
        }
    }

    pub fn session(&self) -> Option<&StreamSession> {
        self.session.as_ref()
    }

    fn channel(&self) -> &str {
        &self.config.username
    }

    /// Obtains the initial credential: the configured token if any, a fresh one otherwise.
    pub async fn authenticate(&mut self) -> Result<(), ControllerError> {
        if let Some(token) = self.config.oauth_token() {
            info!("Using configured access token");
            self.credential = Some(Credential::new(token));
            return Ok(());
        }
        self.refresh_credential().await
    }

    async fn refresh_credential(&mut self) -> Result<(), ControllerError> {
        self.credential = None;
        let credential = self.credentials.refresh().await.map_err(|e| {
            error!("Unable to obtain an access token: {}", e);
            ControllerError::Authentication(e)
        })?;
        self.credential = Some(credential);
        Ok(())
    }

    /// Polls until something fatal happens. Never returns `Ok`.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        info!("Watching channel {}", self.channel());
        if self.credential.is_none() {
            self.authenticate().await?;
        }
        loop {
            self.tick().await?;
        }
    }

    /// One status check, the reaction to it, and the sleep that follows.
    pub async fn tick(&mut self) -> Result<(), ControllerError> {
        if self.credential.is_none() {
            self.authenticate().await?;
        }
        let credential = match &self.credential {
            Some(credential) => credential.clone(),
            None => {
                return Err(ControllerError::InitializationFailed(
                    "no credential after authentication".into(),
                ))
            }
        };

        let (status, info) = self.status.check(self.channel(), &credential).await;
        debug!("[{}] Status: {} ({:?})", self.channel(), status, self.state());

        match status {
            Status::Offline => self.on_offline().await,
            Status::NotFound => {
                error!(
                    "Channel {} not found, invalid username or typo",
                    self.channel()
                );
                tokio::time::sleep(self.config.poll_interval()).await;
            }
            Status::Error => {
                error!("{}", FATAL_STATUS_MESSAGE);
                self.notifier
                    .notify(Notification::error(self.channel(), FATAL_STATUS_MESSAGE));
                tokio::time::sleep(self.config.error_backoff()).await;
                return Err(ControllerError::StatusCheckFailed(
                    FATAL_STATUS_MESSAGE.to_string(),
                ));
            }
            Status::Unauthorized => {
                warn!("{}", UNAUTHORIZED_MESSAGE);
                self.notifier
                    .notify(Notification::error(self.channel(), UNAUTHORIZED_MESSAGE));
                self.refresh_credential().await?;
            }
            Status::Online => self.on_online(info).await,
        }
        Ok(())
    }

    async fn on_offline(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                "[{}] Stream ended (started {}, {} capture(s))",
                session.id,
                session.start_date(),
                session.captures
            );
            self.notifier.notify(Notification::stop(self.channel()));
        }
        info!(
            "{} currently offline, checking again in {} seconds",
            self.channel(),
            self.config.poll_interval_secs
        );
        tokio::time::sleep(self.config.poll_interval()).await;
    }

    async fn on_online(&mut self, info: Option<ChannelInfo>) {
        let title = info
            .as_ref()
            .map(|info| info.title().to_string())
            .unwrap_or_default();

        self.notifier.notify(Notification::start(self.channel()));
        let mut session = match self.session.take() {
            Some(session) => {
                info!("[{}] {} still live, capturing again", session.id, self.channel());
                session
            }
            None => {
                let session = StreamSession::new(self.channel(), &title);
                info!(
                    "[{}] {} online, stream recording in session",
                    session.id,
                    self.channel()
                );
                session
            }
        };
        session.captures += 1;
        let session_id = session.id;
        self.session = Some(session);

        self.capture(session_id, &title).await;

        info!("[{}] Going back to checking", session_id);
        tokio::time::sleep(self.config.poll_interval()).await;
    }

    /// Runs one capture to completion and hands the file to the post-processor.
    async fn capture(&self, session_id: uuid::Uuid, title: &str) {
        let filename = capture_filename(self.channel(), &Local::now(), title);
        let artifact = self.layout.artifact_for(&filename);

        if let Err(e) = tokio::fs::create_dir_all(self.layout.recorded_dir()).await {
            error!(
                "[{}] Cannot create {}: {}",
                session_id,
                self.layout.recorded_dir().display(),
                e
            );
        }

        match self.capturer.capture(self.channel(), &artifact.raw).await {
            Ok(outcome) => debug!("[{}] Capture ended: {:?}", session_id, outcome),
            Err(e) => error!("[{}] Capture failed: {}", session_id, e),
        }

        info!("[{}] Recording is done, processing video file", session_id);
        match tokio::fs::try_exists(&artifact.raw).await {
            Ok(true) => {
                if let Err(e) = self.processor.process(&artifact).await {
                    error!(
                        "[{}] Processing of {} failed, file left in place: {}",
                        session_id,
                        artifact.raw.display(),
                        e
                    );
                }
            }
            Ok(false) => info!("[{}] Skip processing, file not found", session_id),
            Err(e) => error!(
                "[{}] Cannot check {}: {}",
                session_id,
                artifact.raw.display(),
                e
            ),
        }
    }
}
