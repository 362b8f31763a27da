//! In-memory doubles for the API ports, the notifier and the clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::oneshot;

use crate::api::{ApiError, ResourceApi, RevenueApi};
use crate::model::{
    Customer, CustomerDraft, CustomerPatch, Entity, Expense, ExpenseDraft, ExpensePatch,
    MonthlyRevenue, Order, OrderDraft, OrderPatch, Product, ProductDraft, ProductPatch, RecordId,
};
use crate::notify::{Notice, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How the in-memory server builds, edits and searches a record.
pub trait MemoryRecord: Entity {
    fn from_draft(id: RecordId, draft: &Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: &Self::Patch);

    /// Case-insensitive match used for the `search` query.
    fn matches(&self, term: &str) -> bool;
}

fn contains(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

impl MemoryRecord for Product {
    fn from_draft(id: RecordId, draft: &ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            quantity: draft.quantity,
            date: draft.date.unwrap_or(now),
        }
    }

    fn apply(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    fn matches(&self, term: &str) -> bool {
        contains(&self.name, term)
    }
}

impl MemoryRecord for Expense {
    fn from_draft(id: RecordId, draft: &ExpenseDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            category: draft.category.clone(),
            amount: draft.amount,
            date: draft.date,
        }
    }

    fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    fn matches(&self, term: &str) -> bool {
        contains(&self.category, term)
    }
}

impl MemoryRecord for Customer {
    fn from_draft(id: RecordId, draft: &CustomerDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            contact: draft.contact.clone(),
            location: draft.location.clone(),
            date: draft.date,
        }
    }

    fn apply(&mut self, patch: &CustomerPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(contact) = &patch.contact {
            self.contact.clone_from(contact);
        }
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    fn matches(&self, term: &str) -> bool {
        contains(&self.name, term) || contains(&self.location, term)
    }
}

impl MemoryRecord for Order {
    fn from_draft(id: RecordId, draft: &OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_name: draft.customer_name.clone(),
            items: draft.items.clone(),
            date: draft.date.unwrap_or(now),
            status: draft.status,
            created_at: Some(now),
            total_amount: Some(draft.items.iter().map(|item| item.price).sum()),
        }
    }

    fn apply(&mut self, patch: &OrderPatch) {
        if let Some(customer_name) = &patch.customer_name {
            self.customer_name.clone_from(customer_name);
        }
        if let Some(items) = &patch.items {
            self.items.clone_from(items);
            self.total_amount = Some(items.iter().map(|item| item.price).sum());
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn matches(&self, term: &str) -> bool {
        contains(&self.customer_name, term)
            || self
                .items
                .iter()
                .any(|item| contains(&item.product_name, term))
    }
}

/// One request as seen by [`MemoryApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Option<String>),
    Create,
    Update(RecordId),
    Delete(RecordId),
}

struct MemoryState<E> {
    records: Vec<E>,
    next_id: u64,
    failures: VecDeque<ApiError>,
    gates: VecDeque<oneshot::Receiver<()>>,
    calls: Vec<Call>,
}

/// In-memory collection server.
///
/// Failures queued with [`fail_next`](Self::fail_next) are returned by the
/// following requests in order. A gate from
/// [`hold_next_list`](Self::hold_next_list) parks the next list request
/// after its result is taken and before it is returned.
pub struct MemoryApi<E> {
    state: Mutex<MemoryState<E>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<E: MemoryRecord> MemoryApi<E> {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self::seeded(Vec::new(), clock)
    }

    pub fn seeded(records: Vec<E>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records,
                next_id: 1,
                failures: VecDeque::new(),
                gates: VecDeque::new(),
                calls: Vec::new(),
            }),
            clock,
        }
    }

    pub fn fail_next(&self, error: ApiError) {
        lock(&self.state).failures.push_back(error);
    }

    /// Park the next list request until the returned sender fires or drops.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        lock(&self.state).gates.push_back(gate);
        release
    }

    pub fn records(&self) -> Vec<E> {
        lock(&self.state).records.clone()
    }

    /// Replace the server-side records without going through the API.
    pub fn set_records(&self, records: Vec<E>) {
        lock(&self.state).records = records;
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.state).calls.clone()
    }

    fn begin(&self, call: Call) -> Result<(), ApiError> {
        let mut state = lock(&self.state);
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::rejected(404, Some(format!("{} not found", E::KIND.label)))
    }
}

#[async_trait]
impl<E: MemoryRecord> ResourceApi<E> for MemoryApi<E> {
    async fn list(&self, search: Option<&str>) -> Result<Vec<E>, ApiError> {
        let (result, gate) = {
            let result = self.begin(Call::List(search.map(str::to_owned))).map(|()| {
                let state = lock(&self.state);
                state
                    .records
                    .iter()
                    .filter(|record| search.map_or(true, |term| record.matches(term)))
                    .cloned()
                    .collect::<Vec<_>>()
            });
            (result, lock(&self.state).gates.pop_front())
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ApiError> {
        self.begin(Call::Create)?;
        let mut state = lock(&self.state);
        let id = RecordId::new(format!("{}-{}", E::KIND.singular, state.next_id));
        state.next_id += 1;
        let record = E::from_draft(id, draft, self.clock.utc());
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, patch: &E::Patch) -> Result<E, ApiError> {
        self.begin(Call::Update(id.clone()))?;
        let mut state = lock(&self.state);
        let record = state
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(Self::not_found)?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.begin(Call::Delete(id.clone()))?;
        let mut state = lock(&self.state);
        let before = state.records.len();
        state.records.retain(|record| record.id() != id);
        if state.records.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Revenue port answering with fixed figures.
#[derive(Debug, Default)]
pub struct StaticRevenue {
    total: f64,
    monthly: MonthlyRevenue,
    failure: Mutex<Option<ApiError>>,
}

impl StaticRevenue {
    pub fn new(total: f64, monthly: MonthlyRevenue) -> Self {
        Self {
            total,
            monthly,
            failure: Mutex::new(None),
        }
    }

    /// Fail every request with `error` until cleared.
    pub fn fail_with(&self, error: Option<ApiError>) {
        *lock(&self.failure) = error;
    }

    fn check(&self) -> Result<(), ApiError> {
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RevenueApi for StaticRevenue {
    async fn total_revenue(&self) -> Result<f64, ApiError> {
        self.check().map(|()| self.total)
    }

    async fn monthly_revenue(&self) -> Result<MonthlyRevenue, ApiError> {
        self.check().map(|()| self.monthly)
    }
}

/// Notifier that keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<Notice>>);

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.0).clone()
    }

    pub fn texts(&self) -> Vec<String> {
        lock(&self.0).iter().map(|notice| notice.text.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.0).push(notice);
    }
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *lock(&self.0) = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        *lock(&self.0) += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}
