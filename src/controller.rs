// src/controller.rs
//
// Application state: the record list, the active view, the loading flag and
// the configured endpoint. The UI thread owns all of it.
//
// Requests to the store run on short-lived worker threads and report back over
// a channel. `poll()` (once per frame) applies whatever has finished;
// `wait_idle()` blocks until nothing is in flight.
//
// Reload results carry a sequence number. Only the newest reload may replace
// the list, and an optimistic insert makes every reload issued before it
// stale: those can only have read the sheet without the new row.

use std::{
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use crate::{
    config::{consts::RECONCILE_DELAY_MS, state::View, store::ConfigStore},
    error::{StoreError, ValidationError},
    model::{self, Record, StudentFields},
    remote::{CreateAck, RemoteStore},
};

/// Called from a worker once its result is queued (GUI: request a repaint).
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A message for the user (status bar).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

enum Event {
    Fetched { seq: u64, result: Result<Vec<Record>, StoreError> },
    Created { name: String, result: Result<CreateAck, StoreError> },
    /// The job panicked before producing a result.
    Aborted { job: Job },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Job {
    Reload,
    Submit,
}

const MAX_NOTICES: usize = 32;

pub struct Controller {
    store: Arc<dyn RemoteStore>,
    config: ConfigStore,

    endpoint: String,
    records: Vec<Record>,
    active_view: View,
    notices: VecDeque<Notice>,

    // jobs
    tx: Sender<Event>,
    rx: Receiver<Event>,
    waker: Option<Waker>,
    in_flight: usize,

    // reload sequencing
    reload_seq: u64,
    stale_upto: u64,

    reconcile_delay: Duration,
    reconcile_at: Option<Instant>,
}

impl Controller {
    /// Reads the endpoint (storing the default if there was none). Does not
    /// fetch; call `start()` for the initial load.
    pub fn new(store: Arc<dyn RemoteStore>, config: ConfigStore) -> Self {
        let endpoint = config.load_endpoint();
        let (tx, rx) = mpsc::channel();
        tracing::info!("Init: endpoint {}", if endpoint.is_empty() { "unset" } else { "set" });

        Self {
            store,
            config,
            endpoint,
            records: Vec::new(),
            active_view: View::default(),
            notices: VecDeque::new(),
            tx,
            rx,
            waker: None,
            in_flight: 0,
            reload_seq: 0,
            stale_upto: 0,
            reconcile_delay: Duration::from_millis(RECONCILE_DELAY_MS),
            reconcile_at: None,
        }
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn with_reconcile_delay(mut self, delay: Duration) -> Self {
        self.reconcile_delay = delay;
        self
    }

    /// Initial load.
    pub fn start(&mut self) {
        self.reload();
    }

    /* ---------- accessors ---------- */

    #[inline]
    pub fn records(&self) -> &[Record] { &self.records }

    #[inline]
    pub fn endpoint(&self) -> &str { &self.endpoint }

    #[inline]
    pub fn active_view(&self) -> View { self.active_view }

    #[inline]
    pub fn set_active_view(&mut self, view: View) {
        if view != self.active_view {
            tracing::debug!("UI: View {:?} → {:?}", self.active_view, view);
            self.active_view = view;
        }
    }

    #[inline]
    pub fn loading(&self) -> bool { self.in_flight > 0 }

    #[inline]
    pub fn reconcile_pending(&self) -> bool { self.reconcile_at.is_some() }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> { self.notices.iter() }

    pub fn last_notice(&self) -> Option<&Notice> { self.notices.back() }

    pub fn take_notices(&mut self) -> Vec<Notice> { self.notices.drain(..).collect() }

    /* ---------- operations ---------- */

    /// Re-fetch the whole list. Returns false (and sends nothing) when no
    /// endpoint is configured.
    pub fn reload(&mut self) -> bool {
        if self.endpoint.trim().is_empty() {
            tracing::debug!("Reload: Skipped, no endpoint");
            return false;
        }

        self.reload_seq += 1;
        let seq = self.reload_seq;
        let endpoint = self.endpoint.clone();
        tracing::info!("Reload: Begin seq={seq}");

        self.spawn(Job::Reload, move |store| Event::Fetched { seq, result: store.fetch_records(&endpoint) });
        true
    }

    /// Send a new record. Refused up front without an endpoint (the user is
    /// sent to the setup view) or with an incomplete form.
    pub fn submit(&mut self, fields: StudentFields) -> Result<(), ValidationError> {
        if self.endpoint.trim().is_empty() {
            self.notify(NoticeKind::Error, "Please configure the spreadsheet web-app URL first!");
            self.set_active_view(View::Setup);
            return Err(ValidationError::NoEndpoint);
        }
        if let Err(e) = fields.validate() {
            self.notify(NoticeKind::Error, format!("Please check the form: {e}."));
            return Err(e);
        }

        let endpoint = self.endpoint.clone();
        let name = fields.full_name.clone();
        tracing::info!("Submit: Begin");

        self.spawn(Job::Submit, move |store| Event::Created { name, result: store.create_record(&endpoint, &fields) });
        Ok(())
    }

    /// Persist a new endpoint, switch to it and reload.
    pub fn set_endpoint(&mut self, url: &str) {
        let url = url.trim().to_string();

        match self.config.save_endpoint(&url) {
            Ok(()) => self.notify(NoticeKind::Success, "Connection settings updated!"),
            Err(e) => {
                tracing::error!("Config: Save failed: {e}");
                self.notify(
                    NoticeKind::Error,
                    format!("Connection settings apply to this session only (save failed: {e})."),
                );
            }
        }

        // Reads still out went to the old endpoint.
        self.reload_seq += 1;
        self.endpoint = url;
        self.reconcile_at = None;
        self.reload();
    }

    /* ---------- event pump ---------- */

    /// Apply finished jobs and fire a due reconciliation. Never blocks.
    pub fn poll(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            self.apply(ev);
        }
        self.tick(Instant::now());
    }

    /// Fire the reconciliation reload if it is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.reconcile_at {
            if now >= at {
                self.reconcile_at = None;
                tracing::debug!("Reload: Reconciling after write");
                self.reload();
            }
        }
    }

    /// Time until the pending reconciliation, if any.
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.reconcile_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Block until no job is in flight. False if `timeout` ran out first.
    /// Does not fire reconciliations.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(ev) => self.apply(ev),
                Err(RecvTimeoutError::Timeout) => return false,
                // Unreachable while we hold a sender.
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /* ---------- internals ---------- */

    fn spawn<F>(&mut self, kind: Job, job: F)
    where
        F: FnOnce(&dyn RemoteStore) -> Event + Send + 'static,
    {
        self.in_flight += 1;
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let waker = self.waker.clone();

        thread::spawn(move || {
            // Always report back, or `in_flight` never drops.
            let ev = panic::catch_unwind(AssertUnwindSafe(|| job(store.as_ref())))
                .unwrap_or(Event::Aborted { job: kind });
            let _ = tx.send(ev);
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    fn apply(&mut self, ev: Event) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match ev {
            Event::Fetched { seq, result } => {
                if seq != self.reload_seq || seq <= self.stale_upto {
                    tracing::debug!("Reload: Dropped stale seq={seq} (latest={})", self.reload_seq);
                    // Latest read predates an insert and nothing else will re-read.
                    if seq == self.reload_seq && self.reconcile_at.is_none() {
                        self.reload();
                    }
                    return;
                }
                match result {
                    Ok(mut rows) => {
                        model::sort_newest_first(&mut rows);
                        tracing::info!("Reload: OK seq={seq} rows={}", rows.len());
                        self.records = rows;
                    }
                    Err(e) => {
                        // Keep what we have; the next reload may do better.
                        tracing::error!("Reload: Error seq={seq}: {e}");
                    }
                }
            }

            Event::Created { name, result } => match result {
                Ok(ack) => {
                    let reconcile = ack.needs_reconcile();
                    let record = ack.into_record();
                    tracing::info!("Submit: OK id={} reconcile={reconcile}", record.id);

                    self.records.insert(0, record);
                    self.stale_upto = self.reload_seq;
                    self.notify(NoticeKind::Success, format!("Saved student {name} successfully!"));

                    if reconcile {
                        self.reconcile_at = Some(Instant::now() + self.reconcile_delay);
                    }
                }
                Err(e) => {
                    tracing::error!("Submit: Error: {e}");
                    self.notify(NoticeKind::Error, "Connection to the server failed!");
                }
            },

            Event::Aborted { job } => {
                tracing::error!("{job:?}: Worker panicked");
                if job == Job::Submit {
                    self.notify(NoticeKind::Error, "Connection to the server failed!");
                }
            }
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice::new(kind, text));
    }
}
