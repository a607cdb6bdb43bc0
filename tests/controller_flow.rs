// tests/controller_flow.rs
use std::{
    sync::{
        Arc, Condvar, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use chrono::Utc;
use educollect::{
    config::{
        consts::ENDPOINT_KEY,
        state::View,
        store::{ConfigBackend, ConfigStore, MemoryBackend},
    },
    controller::{Controller, NoticeKind},
    error::{StoreError, ValidationError},
    model::{Record, StudentFields},
    remote::{CreateAck, RemoteStore},
};

const URL: &str = "http://sheet.test/exec";

/* ---------- fake bridge ---------- */

#[derive(Default)]
struct FakeStore {
    rows: Mutex<Vec<Record>>,
    endpoints: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    creates: AtomicUsize,
    confirm: bool,
    fail_fetch: AtomicBool,
    fail_create: AtomicBool,

    // while closed, reads block after taking their snapshot
    closed: Mutex<bool>,
    cv: Condvar,
}

impl FakeStore {
    fn with_rows(rows: Vec<Record>) -> Self {
        Self { rows: Mutex::new(rows), ..Self::default() }
    }

    fn confirming() -> Self {
        Self { confirm: true, ..Self::default() }
    }

    fn close(&self) { *self.closed.lock().unwrap() = true; }

    fn open(&self) {
        *self.closed.lock().unwrap() = false;
        self.cv.notify_all();
    }

    fn fetches(&self) -> usize { self.fetches.load(Ordering::SeqCst) }
    fn creates(&self) -> usize { self.creates.load(Ordering::SeqCst) }
}

impl RemoteStore for FakeStore {
    fn fetch_records(&self, endpoint: &str) -> Result<Vec<Record>, StoreError> {
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.rows.lock().unwrap().clone();

        let mut closed = self.closed.lock().unwrap();
        while *closed {
            closed = self.cv.wait(closed).unwrap();
        }
        drop(closed);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Status(503));
        }
        Ok(snapshot)
    }

    fn create_record(&self, _endpoint: &str, fields: &StudentFields) -> Result<CreateAck, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Status(500));
        }
        let rec = Record::from_fields(fields);
        self.rows.lock().unwrap().push(rec.clone());
        Ok(if self.confirm { CreateAck::Confirmed(rec) } else { CreateAck::Dispatched(rec) })
    }
}

/* ---------- tiny helpers ---------- */

fn old_record(id: &str, name: &str) -> Record {
    Record {
        id: id.into(),
        full_name: name.into(),
        class_name: "10A".into(),
        dob: "2009-03-02".into(),
        created_at: Some("2024-01-01T00:00:00.000Z".into()),
    }
}

fn controller(store: &Arc<FakeStore>, backend: &MemoryBackend) -> Controller {
    Controller::new(store.clone(), ConfigStore::new(backend.clone()))
}

fn minh() -> StudentFields {
    StudentFields::new("Nguyễn Văn Minh", "12A1", "2008-05-04")
}

fn pump_until(c: &mut Controller, done: impl Fn(&Controller) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(c) {
        assert!(Instant::now() < deadline, "timed out waiting for controller");
        c.poll();
        thread::sleep(Duration::from_millis(5));
    }
}

fn idle(c: &mut Controller) {
    assert!(c.wait_idle(Duration::from_secs(5)), "jobs still in flight");
}

/* ---------- tests ---------- */

#[test]
fn blank_endpoint_sends_nothing() {
    let store = Arc::new(FakeStore::default());
    let backend = MemoryBackend::with(ENDPOINT_KEY, "");
    let mut c = controller(&store, &backend);

    c.start();
    assert!(!c.reload());
    assert!(!c.loading());

    let err = c.submit(minh()).unwrap_err();
    assert_eq!(err, ValidationError::NoEndpoint);
    assert_eq!(c.active_view(), View::Setup);

    let notice = c.last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("configure"));

    assert_eq!(store.fetches(), 0);
    assert_eq!(store.creates(), 0);
}

#[test]
fn first_start_stores_the_default_url() {
    let store = Arc::new(FakeStore::default());
    let backend = MemoryBackend::new();
    let mut c = Controller::new(
        store.clone(),
        ConfigStore::new(backend.clone()).with_default(URL),
    );

    assert_eq!(c.endpoint(), URL);
    assert_eq!(backend.get(ENDPOINT_KEY).unwrap().as_deref(), Some(URL));

    c.start();
    idle(&mut c);
    assert_eq!(store.fetches(), 1);
    assert_eq!(store.endpoints.lock().unwrap().as_slice(), [URL.to_string()]);
}

#[test]
fn startup_load_is_sorted_newest_first() {
    let mut older = old_record("1", "A");
    older.created_at = Some("2023-05-05T08:00:00.000Z".into());
    let mut blank = old_record("2", "B");
    blank.created_at = None;
    let newer = old_record("3", "C");

    let store = Arc::new(FakeStore::with_rows(vec![older, blank, newer]));
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));
    c.start();
    idle(&mut c);

    let ids: Vec<&str> = c.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["3", "1", "2"]);
}

#[test]
fn submit_prepends_and_reconciles_after_the_delay() {
    let store = Arc::new(FakeStore::with_rows(vec![old_record("1", "Old")]));
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL))
        .with_reconcile_delay(Duration::from_secs(1));
    c.start();
    idle(&mut c);
    assert_eq!(c.records().len(), 1);

    let before = Utc::now();
    c.submit(minh()).unwrap();
    idle(&mut c);

    let first = &c.records()[0];
    assert_eq!(first.full_name, "Nguyễn Văn Minh");
    assert_eq!(first.class_name, "12A1");
    assert!(!first.id.is_empty());
    let created = first.created().unwrap();
    assert!(created <= Utc::now());
    assert!(created >= before - chrono::Duration::seconds(1));
    assert_eq!(c.records().len(), 2);

    let notice = c.last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Saved student Nguyễn Văn Minh successfully!");

    // not due yet
    assert!(c.reconcile_pending());
    c.tick(Instant::now());
    idle(&mut c);
    assert_eq!(store.fetches(), 1);

    // due
    c.tick(Instant::now() + Duration::from_secs(2));
    assert!(!c.reconcile_pending());
    idle(&mut c);
    assert_eq!(store.fetches(), 2);
    assert_eq!(c.records().len(), 2);
    assert_eq!(c.records()[0].full_name, "Nguyễn Văn Minh");
}

#[test]
fn confirmed_writes_skip_reconciliation() {
    let store = Arc::new(FakeStore::confirming());
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));
    c.start();
    idle(&mut c);

    c.submit(minh()).unwrap();
    idle(&mut c);
    assert_eq!(c.records().len(), 1);
    assert!(!c.reconcile_pending());
    assert_eq!(c.next_wakeup(), None);
}

#[test]
fn failed_dispatch_leaves_the_list_alone() {
    let store = Arc::new(FakeStore::with_rows(vec![old_record("1", "Old")]));
    store.fail_create.store(true, Ordering::SeqCst);
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));
    c.start();
    idle(&mut c);
    let before = c.records().to_vec();

    c.submit(minh()).unwrap();
    idle(&mut c);

    assert_eq!(c.records(), before.as_slice());
    assert!(!c.loading());
    assert!(!c.reconcile_pending());
    let notice = c.last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Connection to the server failed!");
}

#[test]
fn incomplete_form_is_refused_before_sending() {
    let store = Arc::new(FakeStore::default());
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));

    let err = c.submit(StudentFields::new("A B", "", "2008-01-01")).unwrap_err();
    assert_eq!(err, ValidationError::MissingField("class"));

    let err = c.submit(StudentFields::new("A B", "9C", "04/05/2008")).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDate(_)));

    assert!(!c.loading());
    assert_eq!(store.creates(), 0);
    assert_eq!(c.active_view(), View::Entry);
}

#[test]
fn failed_reload_keeps_what_is_shown() {
    let store = Arc::new(FakeStore::with_rows(vec![old_record("1", "Old")]));
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));
    c.start();
    idle(&mut c);

    store.fail_fetch.store(true, Ordering::SeqCst);
    assert!(c.reload());
    idle(&mut c);

    assert_eq!(c.records().len(), 1);
    assert!(!c.loading());
}

#[test]
fn reload_issued_before_an_insert_is_dropped_then_redone() {
    let store = Arc::new(FakeStore {
        rows: Mutex::new(vec![old_record("1", "Old A"), old_record("2", "Old B")]),
        ..FakeStore::confirming()
    });
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));

    // The startup read takes its snapshot (the two old rows), then hangs.
    store.close();
    c.start();
    pump_until(&mut c, |_| store.fetches() == 1);

    c.submit(minh()).unwrap();
    pump_until(&mut c, |c| c.records().len() == 1);
    assert!(c.loading());
    assert!(!c.reconcile_pending());

    store.open();
    idle(&mut c);

    // The stale read was replaced by a fresh one that sees every row.
    assert_eq!(store.fetches(), 2);
    assert_eq!(c.records().len(), 3);
    assert_eq!(c.records()[0].full_name, "Nguyễn Văn Minh");
    let ids: Vec<&str> = c.records().iter().map(|r| r.id.as_str()).collect();
    assert!(ids.contains(&"1") && ids.contains(&"2"));
}

#[test]
fn only_the_newest_reload_is_applied() {
    let store = Arc::new(FakeStore::default());
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL));

    store.close();
    c.start();
    pump_until(&mut c, |_| store.fetches() == 1);

    store.rows.lock().unwrap().push(old_record("9", "Later"));
    c.reload();
    pump_until(&mut c, |_| store.fetches() == 2);

    store.open();
    idle(&mut c);
    assert_eq!(c.records().len(), 1);
    assert_eq!(c.records()[0].id, "9");
}

#[test]
fn new_url_survives_a_restart() {
    let store = Arc::new(FakeStore::default());
    let backend = MemoryBackend::with(ENDPOINT_KEY, URL);

    {
        let mut c = controller(&store, &backend);
        c.set_endpoint("  http://other.test/exec  ");
        assert_eq!(c.endpoint(), "http://other.test/exec");
        assert_eq!(c.last_notice().unwrap().text, "Connection settings updated!");
        idle(&mut c);
    }

    assert_eq!(store.endpoints.lock().unwrap().last().map(String::as_str), Some("http://other.test/exec"));

    let c = controller(&store, &backend);
    assert_eq!(c.endpoint(), "http://other.test/exec");
}

#[test]
fn clearing_the_url_discards_reads_still_out() {
    let store = Arc::new(FakeStore::with_rows(vec![old_record("1", "Old")]));
    let backend = MemoryBackend::with(ENDPOINT_KEY, URL);
    let mut c = controller(&store, &backend);

    store.close();
    c.start();
    pump_until(&mut c, |_| store.fetches() == 1);

    c.set_endpoint("");
    assert_eq!(c.endpoint(), "");

    store.open();
    idle(&mut c);
    assert!(c.records().is_empty());
    assert_eq!(store.fetches(), 1);
    assert_eq!(backend.get(ENDPOINT_KEY).unwrap().as_deref(), Some(""));
}

#[test]
fn first_url_loads_sorted_rows_and_persists() {
    let mut untimed = old_record("u", "Untimed");
    untimed.created_at = None;
    let mut oldest = old_record("o", "Oldest");
    oldest.created_at = Some("2023-02-01T09:00:00.000Z".into());
    let mut newest = old_record("n", "Newest");
    newest.created_at = Some("2025-09-30T12:00:00.000Z".into());
    let middle = old_record("m", "Middle");

    let store = Arc::new(FakeStore::with_rows(vec![untimed, oldest, newest, middle]));
    let backend = MemoryBackend::with(ENDPOINT_KEY, "");
    let mut c = controller(&store, &backend);

    c.start();
    assert!(!c.loading());
    assert_eq!(store.fetches(), 0);

    c.set_endpoint(URL);
    idle(&mut c);

    let ids: Vec<&str> = c.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["n", "m", "o", "u"]);
    assert_eq!(store.endpoints.lock().unwrap().as_slice(), [URL.to_string()]);

    let again = controller(&store, &backend);
    assert_eq!(again.endpoint(), URL);
}

/* ---------- panicking store ---------- */

struct PanicStore;

impl RemoteStore for PanicStore {
    fn fetch_records(&self, _endpoint: &str) -> Result<Vec<Record>, StoreError> {
        panic!("bridge client blew up");
    }

    fn create_record(&self, _endpoint: &str, _fields: &StudentFields) -> Result<CreateAck, StoreError> {
        panic!("bridge client blew up");
    }
}

#[test]
fn panicking_jobs_still_clear_loading() {
    let mut c = Controller::new(Arc::new(PanicStore), ConfigStore::new(MemoryBackend::with(ENDPOINT_KEY, URL)));

    c.start();
    assert!(c.wait_idle(Duration::from_secs(5)));
    assert!(!c.loading());
    assert!(c.records().is_empty());

    c.submit(minh()).unwrap();
    assert!(c.wait_idle(Duration::from_secs(5)));
    assert!(!c.loading());
    assert!(c.records().is_empty());
    let notice = c.last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Connection to the server failed!");
}

#[test]
fn waker_runs_after_each_job() {
    let store = Arc::new(FakeStore::default());
    let woken = Arc::new(AtomicUsize::new(0));
    let w = woken.clone();
    let mut c = controller(&store, &MemoryBackend::with(ENDPOINT_KEY, URL))
        .with_waker(Arc::new(move || { w.fetch_add(1, Ordering::SeqCst); }));

    c.start();
    idle(&mut c);

    let deadline = Instant::now() + Duration::from_secs(5);
    while woken.load(Ordering::SeqCst) == 0 {
        assert!(Instant::now() < deadline, "waker never ran");
        thread::sleep(Duration::from_millis(5));
    }
}
