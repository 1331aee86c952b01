//! Workspace runtime: owns state, executes effects, collects async results.
//!
//! This is the boundary where side effects happen. The reducer stays pure
//! and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers send `UiEvent`s to `inbox_tx`
//! - The runtime drains `inbox_rx` and feeds each event to the reducer
//! - A display surface calls [`WorkspaceRuntime::dispatch`] for user input
//!   and [`WorkspaceRuntime::view`] to draw
//!
//! Structure:
//! - `mod.rs`: core runtime (WorkspaceRuntime, effect dispatch)
//! - `inbox.rs`: inbox channel types
//! - `handlers/`: effect handler implementations (network I/O)

mod handlers;
mod inbox;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use docgenie_core::api::ApiClient;
use docgenie_core::config::Config;
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render::{self, WorkspaceView};
use crate::state::AppState;
use crate::update;

/// How long to wait for a result before re-checking whether work remains.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Headless workspace runtime.
pub struct WorkspaceRuntime {
    pub state: AppState,
    api: ApiClient,
    /// Inbox sender - handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - the runtime drains this.
    inbox_rx: UiEventReceiver,
    /// Spawned handlers that have not delivered their result yet.
    in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when a spawned handler finishes or panics.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkspaceRuntime {
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::with_client(config, api))
    }

    pub fn with_client(config: &Config, api: ApiClient) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config);
        // Links must point at the server the client actually talks to.
        state.server_url = Some(api.base_url().clone());
        Self {
            state,
            api,
            inbox_tx,
            inbox_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Initial load: fetch the session list for the sidebar.
    pub fn start(&mut self) {
        self.dispatch(UiEvent::RefreshSessions);
    }

    /// Feeds one event through the reducer and executes its effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    pub fn view(&self) -> WorkspaceView {
        render::view(&self.state)
    }

    /// True when no handler is running and no result is waiting.
    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0 && self.inbox_rx.is_empty()
    }

    /// Processes results until every spawned handler has reported back.
    pub async fn run_until_idle(&mut self) {
        self.run_until_idle_with(|_| {}).await;
    }

    /// Like [`Self::run_until_idle`], calling `observe` after every event.
    pub async fn run_until_idle_with<F>(&mut self, mut observe: F)
    where
        F: FnMut(&AppState),
    {
        loop {
            self.drain_inbox(&mut observe);
            // Handlers send before releasing their guard, so a zero count
            // means every result is already queued.
            if self.is_idle() {
                break;
            }
            if let Ok(Some(event)) = tokio::time::timeout(POLL_INTERVAL, self.inbox_rx.recv()).await
            {
                self.dispatch(event);
                observe(&self.state);
            }
        }
    }

    fn drain_inbox<F>(&mut self, observe: &mut F) -> usize
    where
        F: FnMut(&AppState),
    {
        let mut count = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            observe(&self.state);
            count += 1;
        }
        count
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        tokio::spawn(async move {
            let _guard = guard;
            let _ = tx.send(f().await);
        });
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    ///
    /// `TaskStarted` is applied before this returns, so a cancel issued right
    /// after the spawning event already sees the task's token.
    fn spawn_task<F, Fut>(&mut self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let started = TaskStarted {
            id,
            cancel: cancelable.then(|| cancel.clone()),
        };
        self.dispatch(UiEvent::TaskStarted { kind, started });

        let tx = self.inbox_tx.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        tokio::spawn(async move {
            let _guard = guard;
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::RefreshSessions => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::sessions::session_list_load(api));
            }
            UiEffect::LoadSession {
                task,
                session_id,
                epoch,
            } => {
                let api = self.api.clone();
                self.spawn_task(TaskKind::SessionLoad, task, false, move |_| {
                    handlers::sessions::session_load(api, session_id, epoch)
                });
            }
            UiEffect::DeleteSession { task, session_id } => {
                let api = self.api.clone();
                self.spawn_task(TaskKind::SessionDelete, task, false, move |_| {
                    handlers::sessions::session_delete(api, session_id)
                });
            }
            UiEffect::StartUpload {
                task,
                batch,
                options,
            } => {
                let api = self.api.clone();
                let inbox = self.inbox_tx.clone();
                self.spawn_task(TaskKind::Upload, task, true, move |cancel| {
                    handlers::upload::upload_pipeline(api, batch, options, task, inbox, cancel)
                });
            }
            UiEffect::SendChat {
                session_id,
                query,
                epoch,
            } => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::chat::send_chat(api, session_id, query, epoch));
            }
            UiEffect::OpenBrowser { url } => {
                if let Err(error) = open::that(&url) {
                    tracing::warn!(%url, %error, "failed to open browser");
                }
            }
            UiEffect::CancelTask { kind, token } => {
                tracing::debug!(?kind, "cancel requested");
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }
        }
    }
}
