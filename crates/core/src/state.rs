//! Dashboard state: the loaded dataset, the active filters, and the alert list.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::alerts::Alert;
use crate::config::DashboardConfig;
use crate::domain::dataset::Dataset;
use crate::selectors::{FilterSpec, FilterUpdate, Selectors};

#[derive(Clone, Debug)]
pub struct DashboardState {
    pub data: Option<Arc<Dataset>>,
    pub filters: FilterSpec,
    /// Newest first.
    pub alerts: Vec<Alert>,
    pub loading: bool,
}

impl DashboardState {
    /// No data yet, so the state starts out loading.
    pub fn new(filters: FilterSpec) -> Self {
        Self { data: None, filters, alerts: Vec::new(), loading: true }
    }

    /// Default filters: the configured trailing window ending at `now`.
    pub fn from_config(config: &DashboardConfig, now: DateTime<Utc>) -> Self {
        Self::new(FilterSpec::trailing_days(now, config.window_days))
    }

    pub fn set_data(&mut self, data: Arc<Dataset>) {
        self.data = Some(data);
        self.loading = false;
    }

    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
    }

    pub fn add_alert(&mut self, alert: Alert) {
        self.alerts.insert(0, alert);
    }

    /// Returns whether an alert with `id` exists.
    pub fn acknowledge_alert(&mut self, id: &str) -> bool {
        self.alerts_with_id(id).fold(false, |_, alert| {
            alert.acknowledged = true;
            true
        })
    }

    /// Returns whether an alert with `id` exists.
    pub fn assign_alert(&mut self, id: &str, assignee: &str) -> bool {
        self.alerts_with_id(id).fold(false, |_, alert| {
            alert.assigned_to = Some(assignee.to_string());
            true
        })
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn selectors(&self) -> Selectors<'_> {
        Selectors::new(self.data.as_deref(), &self.filters)
    }

    fn alerts_with_id<'s>(&'s mut self, id: &'s str) -> impl Iterator<Item = &'s mut Alert> + 's {
        self.alerts.iter_mut().filter(move |alert| alert.id == id)
    }
}

type FilterListener = Box<dyn Fn(&FilterSpec, u64) + Send + Sync>;

/// One registered listener and the newest revision it has been handed.
struct Subscription {
    id: u64,
    delivered: Mutex<u64>,
    listener: FilterListener,
}

impl Subscription {
    /// Delivers `revision` unless a newer one already went out. Calls to one
    /// listener are serialized, so it sees strictly increasing revisions.
    fn deliver(&self, filters: &FilterSpec, revision: u64) -> bool {
        let mut delivered = self.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        if revision <= *delivered {
            return false;
        }
        *delivered = revision;
        (self.listener)(filters, revision);
        true
    }
}

/// Thread-safe [`DashboardState`]. Each update is applied atomically under a
/// write lock and bumps the revision; concurrent filter updates are
/// last-write-wins. Filter listeners run after the state lock is released.
pub struct DashboardStore {
    inner: RwLock<Versioned>,
    listeners: RwLock<Vec<Arc<Subscription>>>,
}

struct Versioned {
    state: DashboardState,
    revision: u64,
    next_listener: u64,
}

impl DashboardStore {
    pub fn new(state: DashboardState) -> Self {
        Self {
            inner: RwLock::new(Versioned { state, revision: 0, next_listener: 0 }),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).revision
    }

    /// A consistent copy of the current state. The dataset is shared, not cloned.
    pub fn snapshot(&self) -> DashboardState {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).state.clone()
    }

    /// Evaluates `view` against one consistent state.
    pub fn selectors<R>(&self, view: impl FnOnce(&Selectors<'_>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        view(&guard.state.selectors())
    }

    /// Registers a listener called with the new filters and revision after
    /// filter updates. Returns a handle for [`Self::unsubscribe`].
    ///
    /// Revisions reach a listener in increasing order. When concurrent updates
    /// race, a notification older than one already delivered is dropped, so
    /// the last call always carries the newest filters. A listener must not
    /// update filters from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&FilterSpec, u64) + Send + Sync + 'static) -> u64 {
        let id = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.next_listener += 1;
            inner.next_listener
        };
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(Subscription {
                id,
                delivered: Mutex::new(0),
                listener: Box::new(listener),
            }));
        id
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|subscription| subscription.id != id);
        listeners.len() != before
    }

    fn update<R>(&self, apply: impl FnOnce(&mut DashboardState) -> R) -> (R, u64) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let outcome = apply(&mut inner.state);
        inner.revision += 1;
        (outcome, inner.revision)
    }

    pub fn set_data(&self, data: Arc<Dataset>) -> u64 {
        let records = data.metadata.total_records;
        let ((), revision) = self.update(|state| state.set_data(data));
        info!(event_name = "dashboard.data.loaded", records, revision, "dataset loaded");
        revision
    }

    pub fn set_filters(&self, update: FilterUpdate) -> u64 {
        let (filters, revision) = self.update(|state| {
            state.set_filters(update);
            state.filters.clone()
        });
        debug!(
            event_name = "dashboard.filters.updated",
            revision,
            stores = filters.store_ids.len(),
            categories = filters.categories.len(),
            "filters updated"
        );

        self.notify(&filters, revision);
        revision
    }

    fn notify(&self, filters: &FilterSpec, revision: u64) {
        let subscriptions: Vec<Arc<Subscription>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(Arc::clone)
            .collect();
        for subscription in subscriptions {
            if !subscription.deliver(filters, revision) {
                debug!(
                    event_name = "dashboard.filters.stale_notification",
                    listener = subscription.id,
                    revision,
                    "newer filters already delivered"
                );
            }
        }
    }

    pub fn add_alert(&self, alert: Alert) -> u64 {
        self.update(|state| state.add_alert(alert)).1
    }

    pub fn acknowledge_alert(&self, id: &str) -> bool {
        self.update(|state| state.acknowledge_alert(id)).0
    }

    pub fn assign_alert(&self, id: &str, assignee: &str) -> bool {
        self.update(|state| state.assign_alert(id, assignee)).0
    }

    pub fn set_loading(&self, loading: bool) -> u64 {
        self.update(|state| state.set_loading(loading)).1
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use chrono::{TimeZone, Utc};

    use super::{DashboardState, DashboardStore};
    use crate::alerts::{Alert, AlertKind, Severity};
    use crate::config::AppConfig;
    use crate::domain::catalog::Category;
    use crate::fixtures::DatasetBuilder;
    use crate::selectors::FilterUpdate;

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            kind: AlertKind::System,
            severity: Severity::Low,
            title: "Sync".to_string(),
            message: "Nightly sync finished".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            store_id: None,
            product_id: None,
            acknowledged: false,
            assigned_to: None,
        }
    }

    fn state() -> DashboardState {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        DashboardState::from_config(&AppConfig::default().dashboard, now)
    }

    #[test]
    fn alerts_are_prepended_and_updated_by_id() {
        let mut state = state();
        state.add_alert(alert("alert-0"));
        state.add_alert(alert("alert-1"));

        assert_eq!(state.alerts[0].id, "alert-1");
        assert!(state.acknowledge_alert("alert-0"));
        assert!(state.assign_alert("alert-0", "ops-team"));
        assert!(!state.acknowledge_alert("missing"));

        assert!(state.alerts[1].acknowledged);
        assert_eq!(state.alerts[1].assigned_to.as_deref(), Some("ops-team"));
        assert!(!state.alerts[0].acknowledged);
    }

    #[test]
    fn loading_clears_once_data_arrives() {
        let mut state = state();
        assert!(state.loading);
        state.set_data(Arc::new(DatasetBuilder::new().build()));
        assert!(!state.loading);
        assert!(state.data.is_some());
    }

    #[test]
    fn filter_listeners_see_latest_value() {
        let store = DashboardStore::new(state());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |filters, revision| {
            sink.lock().unwrap().push((filters.categories.len(), revision));
        });

        let first = store.set_filters(FilterUpdate::categories([Category::Bakery]));
        let second = store.set_filters(FilterUpdate::categories([]));
        assert!(store.unsubscribe(id));
        store.set_filters(FilterUpdate::categories([Category::Meat]));

        assert_eq!(*seen.lock().unwrap(), vec![(1, first), (0, second)]);
        assert!(second > first);
    }

    #[test]
    fn out_of_order_notifications_are_dropped() {
        let store = DashboardStore::new(state());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |filters, revision| {
            sink.lock().unwrap().push((filters.categories.len(), revision));
        });

        let newer = store.snapshot().filters;
        let mut older = newer.clone();
        older.merge(FilterUpdate::categories([Category::Dairy]));
        store.notify(&newer, 7);
        store.notify(&older, 6);
        store.notify(&newer, 7);

        assert_eq!(*seen.lock().unwrap(), vec![(0, 7)]);
    }

    #[test]
    fn concurrent_updates_each_bump_the_revision() {
        let store = Arc::new(DashboardStore::new(state()));
        let calls = Arc::new(AtomicU64::new(0));
        let revisions = Arc::new(Mutex::new(Vec::new()));
        let counter = Arc::clone(&calls);
        let sink = Arc::clone(&revisions);
        store.subscribe(move |_, revision| {
            counter.fetch_add(1, Ordering::SeqCst);
            sink.lock().unwrap().push(revision);
        });

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for round in 0..25 {
                        let ids = [format!("ST{:04}", worker * 100 + round)];
                        store.set_filters(FilterUpdate::stores(ids.iter().map(String::as_str)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.revision(), 200);
        let revisions = revisions.lock().unwrap();
        assert!(revisions.windows(2).all(|pair| pair[0] < pair[1]), "{revisions:?}");
        assert_eq!(revisions.last(), Some(&200));
        assert_eq!(calls.load(Ordering::SeqCst), revisions.len() as u64);
        assert_eq!(store.snapshot().filters.store_ids.len(), 1);
    }

    #[test]
    fn selectors_read_a_consistent_snapshot() {
        let store = DashboardStore::new(state());
        assert_eq!(store.selectors(|view| view.kpis().revenue), 0.0);
        store.set_data(Arc::new(DatasetBuilder::new().build()));
        assert_eq!(store.selectors(|view| view.filtered_sales().len()), 0);
    }
}
