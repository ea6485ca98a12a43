// ── Controller abstraction ──
//
// Full lifecycle management for a set of Slide covers.
// Handles cloud login, local device setup, the periodic poll, command
// routing, and reactive data streaming through the CoverStore.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use slide_api::{CloudClient, LocalClient, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{IntegrationConfig, LocalCoverConfig};
use crate::convert::{CloudObservation, LocalObservation, SkippedEntry};
use crate::error::CoreError;
use crate::model::{Cover, CoverBackend, CoverId, MoveIntent};
use crate::store::CoverStore;
use crate::stream::EntityStream;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Manages the full
/// lifecycle: cloud login, local device setup, background polling,
/// command routing, and reactive cover streaming.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: IntegrationConfig,
    store: Arc<CoverStore>,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    cloud: Mutex<Option<Arc<CloudClient>>>,
    local: Mutex<Option<Arc<LocalClient>>>,
    pending: Mutex<Vec<PendingSetup>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

/// A local device whose setup failed and will be attempted again.
struct PendingSetup {
    cover: LocalCoverConfig,
    last_attempt: Instant,
}

/// Result of one local setup attempt.
enum SetupOutcome {
    Ready,
    Retry,
    Abandoned,
}

/// Backend call derived from a [`Command`].
#[derive(Debug, Clone, Copy)]
enum Action {
    Open,
    Close,
    Stop,
    SetPosition(f64),
    Calibrate,
    Motor { max_current: u32, calib_current: u32 },
    TouchGo(bool),
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to log in and start background tasks.
    pub fn new(config: IntegrationConfig) -> Self {
        let store = Arc::new(CoverStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();

        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                connection_state,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cloud: Mutex::new(None),
                local: Mutex::new(None),
                pending: Mutex::new(Vec::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the integration configuration.
    pub fn config(&self) -> &IntegrationConfig {
        &self.inner.config
    }

    /// Access the underlying CoverStore.
    pub fn store(&self) -> &Arc<CoverStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Log in to the cloud, set up local devices, run the first poll and
    /// spawn background tasks (command processor, periodic poll).
    ///
    /// Rejected cloud credentials abort with
    /// [`CoreError::AuthenticationFailed`]. Unreachable local devices do
    /// not fail the connect; they are retried on later poll cycles.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        if let Err(e) = self.setup().await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        // Spawn background tasks
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval = self.inner.config.scan_interval;
        if !interval.is_zero() {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(poll_task(ctrl, interval, cancel)));
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!(covers = self.inner.store.cover_count(), "controller connected");
        Ok(())
    }

    async fn setup(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        config.validate()?;
        let transport = TransportConfig::default().with_timeout(config.timeout);

        if let Some(cloud) = &config.cloud {
            let client = CloudClient::new(cloud.base_url.clone(), &transport)?;
            client.login(&cloud.username, &cloud.password).await?;
            info!(username = %cloud.username, "logged in to Slide cloud");
            *self.inner.cloud.lock().await = Some(Arc::new(client));
            self.poll_cloud().await;
        }

        if !config.local.is_empty() {
            let client = Arc::new(LocalClient::new(&transport)?);
            *self.inner.local.lock().await = Some(Arc::clone(&client));

            let outcomes =
                join_all(config.local.iter().map(|cover| self.setup_local(&client, cover))).await;

            let mut pending = self.inner.pending.lock().await;
            for (cover, outcome) in config.local.iter().zip(outcomes) {
                if matches!(outcome, SetupOutcome::Retry) {
                    pending.push(PendingSetup {
                        cover: cover.clone(),
                        last_attempt: Instant::now(),
                    });
                }
            }
        }

        self.inner.store.mark_polled();
        Ok(())
    }

    /// Register a local device and fetch its first reading.
    async fn setup_local(&self, client: &LocalClient, cover: &LocalCoverConfig) -> SetupOutcome {
        let host = cover.host.as_str();
        client.add_host(host, cover.password.clone(), cover.api_version);

        match client.info(host).await {
            Ok(info) => {
                let obs = LocalObservation::from(info);
                match self.inner.store.apply_local_info(
                    host,
                    obs,
                    cover.invert_position,
                    self.inner.config.offset,
                ) {
                    Some(stored) => {
                        debug!(host, id = %stored.id, "local slide set up");
                        SetupOutcome::Ready
                    }
                    None => {
                        error!(host, "slide info has no slide_id, will retry");
                        SetupOutcome::Retry
                    }
                }
            }
            Err(slide_api::Error::UnsupportedOperation(what)) => {
                error!(host, api_version = %cover.api_version, "unsupported: {what}");
                client.remove_host(host);
                SetupOutcome::Abandoned
            }
            Err(e) => {
                warn!(host, error = %e, "unable to set up slide, will retry");
                SetupOutcome::Retry
            }
        }
    }

    /// Cancel background tasks, log out of the cloud and clear the store.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        // Join all background tasks
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if let Some(client) = self.inner.cloud.lock().await.take() {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }

        *self.inner.local.lock().await = None;
        self.inner.pending.lock().await.clear();
        self.inner.store.clear();
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Run one poll cycle over cloud and local covers, then retry due
    /// pending setups.
    ///
    /// Never fails: errors are logged and affected covers marked offline.
    pub async fn poll(&self) {
        tokio::join!(self.poll_cloud(), self.poll_local());
        self.retry_pending().await;
        self.inner.store.mark_polled();
        debug!(covers = self.inner.store.cover_count(), "poll complete");
    }

    async fn poll_cloud(&self) {
        let Some(cloud) = &self.inner.config.cloud else {
            return;
        };
        let Some(client) = self.cloud_client().await else {
            return;
        };

        let overview = match client.slides_overview().await {
            Err(e) if e.is_auth_expired() => {
                warn!("cloud session expired, logging in again");
                match client.login(&cloud.username, &cloud.password).await {
                    Ok(()) => client.slides_overview().await,
                    Err(e) => Err(e),
                }
            }
            other => other,
        };

        let overview = match overview {
            Ok(overview) => overview,
            Err(e) => {
                error!(error = %e, "Slide cloud overview failed");
                self.inner.store.mark_cloud_offline();
                return;
            }
        };

        if overview.slides.is_empty() {
            warn!("Slide cloud returned 0 slides");
        }

        let observations: Vec<CloudObservation> = overview
            .slides
            .iter()
            .filter_map(|slide| match CloudObservation::try_from(slide) {
                Ok(obs) => Some(obs),
                Err(skipped) => {
                    log_skipped(&skipped, slide);
                    None
                }
            })
            .collect();

        self.inner.store.apply_cloud_overview(
            observations,
            cloud.invert_position,
            self.inner.config.offset,
        );
    }

    async fn poll_local(&self) {
        let Some(client) = self.local_client().await else {
            return;
        };
        let snapshot = self.inner.store.covers_snapshot();
        join_all(
            snapshot
                .iter()
                .filter(|cover| cover.is_local())
                .map(|cover| self.poll_local_cover(&client, cover)),
        )
        .await;
    }

    async fn poll_local_cover(&self, client: &LocalClient, cover: &Cover) {
        let CoverBackend::Local { host } = &cover.backend else {
            return;
        };
        match client.info(host).await {
            Ok(info) => {
                self.inner.store.apply_local_info(
                    host,
                    LocalObservation::from(info),
                    cover.invert_position,
                    cover.offset(),
                );
            }
            Err(e) if e.is_transient() => {
                warn!(host = %host, id = %cover.id, error = %e, "slide unreachable, marking offline");
                self.inner.store.mark_offline(&cover.id);
            }
            Err(e) => {
                error!(host = %host, id = %cover.id, error = %e, "unable to get information from slide");
                self.inner.store.mark_offline(&cover.id);
            }
        }
    }

    /// Attempt pending local setups whose retry delay has elapsed.
    async fn retry_pending(&self) {
        let due: Vec<LocalCoverConfig> = {
            let mut pending = self.inner.pending.lock().await;
            if pending.is_empty() {
                return;
            }
            let retry = self.inner.config.setup_retry;
            let now = Instant::now();
            let (due, waiting): (Vec<_>, Vec<_>) = pending
                .drain(..)
                .partition(|p| now.duration_since(p.last_attempt) >= retry);
            *pending = waiting;
            due.into_iter().map(|p| p.cover).collect()
        };
        if due.is_empty() {
            return;
        }
        let Some(client) = self.local_client().await else {
            return;
        };

        for cover in due {
            debug!(host = %cover.host, "retrying local slide setup");
            if let SetupOutcome::Retry = self.setup_local(&client, &cover).await {
                self.inner.pending.lock().await.push(PendingSetup {
                    cover,
                    last_attempt: Instant::now(),
                });
            }
        }
    }

    /// Hosts whose setup has not succeeded yet.
    pub async fn pending_hosts(&self) -> Vec<String> {
        self.inner
            .pending
            .lock()
            .await
            .iter()
            .map(|p| p.cover.host.clone())
            .collect()
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against a cover.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::ControllerDisconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ControllerDisconnected)?;

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Disables periodic polling since a CLI invocation only needs the
    /// initial fetch.
    pub async fn oneshot<F, Fut, T>(config: IntegrationConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.scan_interval = Duration::ZERO;

        let controller = Controller::new(cfg);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn covers_snapshot(&self) -> Arc<Vec<Arc<Cover>>> {
        self.inner.store.covers_snapshot()
    }

    pub fn cover(&self, id: &CoverId) -> Option<Arc<Cover>> {
        self.inner.store.cover(id)
    }

    /// Resolve a user-supplied identifier (id, host, cloud id or name).
    pub fn find(&self, identifier: &str) -> Result<Arc<Cover>, CoreError> {
        self.inner
            .store
            .find(identifier)
            .ok_or_else(|| CoreError::CoverNotFound {
                identifier: identifier.to_owned(),
            })
    }

    pub fn covers(&self) -> EntityStream<Cover> {
        self.inner.store.subscribe_covers()
    }

    // ── Client access ────────────────────────────────────────────

    async fn cloud_client(&self) -> Option<Arc<CloudClient>> {
        self.inner.cloud.lock().await.clone()
    }

    async fn local_client(&self) -> Option<Arc<LocalClient>> {
        self.inner.local.lock().await.clone()
    }

    /// Perform the backend call for `action` on `cover`.
    async fn dispatch(&self, cover: &Cover, action: Action) -> Result<(), CoreError> {
        match &cover.backend {
            CoverBackend::Cloud { slide_id } => {
                let client = self
                    .cloud_client()
                    .await
                    .ok_or(CoreError::ControllerDisconnected)?;
                let id = *slide_id;
                match action {
                    Action::Open => client.open(id).await?,
                    Action::Close => client.close(id).await?,
                    Action::Stop => client.stop(id).await?,
                    Action::SetPosition(pos) => client.set_position(id, pos).await?,
                    Action::Calibrate => client.calibrate(id).await?,
                    Action::Motor { .. } | Action::TouchGo(_) => {
                        return Err(local_only(&format!("{action:?}")));
                    }
                }
            }
            CoverBackend::Local { host } => {
                let client = self
                    .local_client()
                    .await
                    .ok_or(CoreError::ControllerDisconnected)?;
                match action {
                    Action::Open => client.open(host).await?,
                    Action::Close => client.close(host).await?,
                    Action::Stop => client.stop(host).await?,
                    Action::SetPosition(pos) => client.set_position(host, pos).await?,
                    Action::Calibrate => client.calibrate(host).await?,
                    Action::Motor {
                        max_current,
                        calib_current,
                    } => {
                        client
                            .set_motor_strength(host, max_current, calib_current)
                            .await?;
                    }
                    Action::TouchGo(enabled) => client.set_touch_go(host, enabled).await?,
                }
            }
        }
        Ok(())
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Poll all covers every `period` until cancelled.
async fn poll_task(controller: Controller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => controller.poll().await,
        }
    }
}

/// Process commands from the mpsc channel, routing each to the
/// backend that owns the cover.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Validate a command, apply its optimistic status and dispatch it.
///
/// A backend failure that means the device could not be reached marks
/// the cover offline before the error is returned.
async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let store = &controller.inner.store;
    let cover = store
        .cover(cmd.cover_id())
        .ok_or_else(|| CoreError::CoverNotFound {
            identifier: cmd.cover_id().to_string(),
        })?;

    if cmd.is_local_only() && !cover.is_local() {
        return Err(local_only(cmd.name()));
    }

    let (action, intent) = match &cmd {
        Command::Open { .. } => (Action::Open, Some(MoveIntent::Open)),
        Command::Close { .. } => (Action::Close, Some(MoveIntent::Close)),
        Command::Stop { .. } => (Action::Stop, Some(MoveIntent::Stop)),
        Command::SetPosition { percent, .. } => {
            if *percent > 100 {
                return Err(CoreError::ValidationFailed {
                    message: format!("position must be between 0 and 100, got {percent}"),
                });
            }
            let target = cover.target_fraction(*percent);
            (Action::SetPosition(target), Some(MoveIntent::MoveTo(target)))
        }
        Command::Calibrate { .. } => (Action::Calibrate, None),
        Command::SetMotorStrength { strength, .. } => {
            let (max_current, calib_current) = strength.currents();
            (
                Action::Motor {
                    max_current,
                    calib_current,
                },
                None,
            )
        }
        Command::SetTouchGo { enabled, .. } => (Action::TouchGo(*enabled), None),
    };

    if let Some(intent) = intent {
        store.apply_intent(&cover.id, intent);
    }

    debug!(command = cmd.name(), id = %cover.id, ?action, "dispatching command");
    if let Err(e) = controller.dispatch(&cover, action).await {
        if e.is_unreachable() {
            warn!(id = %cover.id, error = %e, "slide unreachable, marking offline");
            store.mark_offline(&cover.id);
        }
        return Err(e);
    }

    if let Action::TouchGo(enabled) = action {
        store.update(&cover.id, |c| {
            c.touch_go = Some(enabled);
            c.touch();
        });
    }

    let cover = store.cover(&cover.id).unwrap_or(cover);
    Ok(CommandResult { cover })
}

// ── Helpers ──────────────────────────────────────────────────────

fn local_only(operation: &str) -> CoreError {
    CoreError::Unsupported {
        operation: operation.into(),
        required: "a local API connection".into(),
    }
}

fn log_skipped(skipped: &SkippedEntry, slide: &slide_api::cloud::models::CloudSlide) {
    match skipped {
        SkippedEntry::MissingDeviceId => {
            error!(entry = ?slide, "invalid Slide cloud entry, 'device_id' is missing");
        }
        SkippedEntry::MissingId { device_id } => {
            error!(device_id = %device_id, "Slide cloud entry has no numeric 'id'");
        }
        SkippedEntry::MissingDeviceInfo { device_id } => {
            error!(device_id = %device_id, entry = ?slide, "slide has no 'device_info' entry");
        }
    }
}
