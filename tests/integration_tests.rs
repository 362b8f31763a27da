//! Integration tests for the bakehouse stores against in-memory ports.

use std::sync::Arc;

use bakehouse::api::ApiError;
use bakehouse::model::{
    Expense, MonthlyRevenue, Order, OrderDraft, OrderItem, OrderPatch, OrderStatus, Product,
    ProductDraft, ProductPatch, RecordId,
};
use bakehouse::orders::{due_soon_window, StatusAdvance};
use bakehouse::test_support::{Call, MemoryApi, MutableClock, RecordingNotifier, StaticRevenue};
use bakehouse::{DueSoonWatch, OrderStore, ResourceStore};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(now()))
}

fn product(id: &str, name: &str, quantity: u32) -> Product {
    Product {
        id: RecordId::new(id),
        name: name.to_owned(),
        quantity,
        date: now(),
    }
}

fn order(id: &str, due: DateTime<Utc>, status: OrderStatus) -> Order {
    Order {
        id: RecordId::new(id),
        customer_name: "Abena".to_owned(),
        items: vec![OrderItem {
            product_name: "Meat pie".to_owned(),
            price: 12.5,
        }],
        date: due,
        status,
        created_at: Some(now()),
        total_amount: None,
    }
}

fn products(
    clock: &Arc<MutableClock>,
    seed: Vec<Product>,
) -> (Arc<MemoryApi<Product>>, ResourceStore<Product>) {
    let api = Arc::new(MemoryApi::seeded(seed, clock.clone()));
    let store = ResourceStore::new(api.clone());
    (api, store)
}

fn order_store(
    clock: &Arc<MutableClock>,
    seed: Vec<Order>,
) -> (Arc<MemoryApi<Order>>, Arc<RecordingNotifier>, OrderStore) {
    let api = Arc::new(MemoryApi::seeded(seed, clock.clone()));
    let notifier = Arc::new(RecordingNotifier::default());
    let revenue = Arc::new(StaticRevenue::new(
        900.0,
        MonthlyRevenue {
            current_month: 600.0,
            last_month: 300.0,
        },
    ));
    let store = OrderStore::new(api.clone(), revenue, notifier.clone());
    (api, notifier, store)
}

#[rstest]
#[tokio::test]
async fn fetch_replaces_items_with_server_list(clock: Arc<MutableClock>) {
    let (api, store) = products(&clock, vec![product("p1", "Sourdough", 4)]);

    store.fetch_all(None).await;
    store.fetch_all(None).await;
    assert_eq!(store.items(), api.records());

    api.set_records(vec![product("p2", "Baguette", 9)]);
    store.fetch_all(None).await;

    let state = store.state();
    assert_eq!(state.items, vec![product("p2", "Baguette", 9)]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[rstest]
#[tokio::test]
async fn blank_search_is_not_sent(clock: Arc<MutableClock>) {
    let (api, store) = products(
        &clock,
        vec![product("p1", "Sourdough", 4), product("p2", "Baguette", 9)],
    );

    store.fetch_all(Some("  ")).await;
    store.fetch_all(Some(" sour ")).await;

    assert_eq!(
        api.calls(),
        vec![Call::List(None), Call::List(Some("sour".to_owned()))]
    );
    assert_eq!(store.items(), vec![product("p1", "Sourdough", 4)]);
}

#[rstest]
#[tokio::test]
async fn failed_fetch_keeps_stale_items(clock: Arc<MutableClock>) {
    let (api, store) = products(&clock, vec![product("p1", "Sourdough", 4)]);
    store.fetch_all(None).await;

    api.fail_next(ApiError::transport("connection refused"));
    store.fetch_all(None).await;

    let state = store.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Something went wrong"));
    assert!(!state.loading);
}

#[rstest]
#[tokio::test]
async fn create_appends_canonical_record(clock: Arc<MutableClock>) {
    let (_api, store) = products(&clock, vec![product("p1", "Sourdough", 4)]);
    store.fetch_all(None).await;

    store
        .create(ProductDraft {
            name: "Croissant".to_owned(),
            quantity: 12,
            date: Some(now()),
        })
        .await;

    let state = store.state();
    assert_eq!(state.items.len(), 2);
    let created = &state.items[1];
    assert_eq!(created.name, "Croissant");
    assert_eq!(created.id, RecordId::new("product-1"));
    assert_eq!(state.success.as_deref(), Some("Product added successfully!"));
}

#[rstest]
#[tokio::test]
async fn rejected_create_reports_server_message(clock: Arc<MutableClock>) {
    let (api, store) = products(&clock, vec![product("p1", "Sourdough", 4)]);
    store.fetch_all(None).await;
    let before = store.items();

    api.fail_next(ApiError::rejected(409, Some("name taken".to_owned())));
    store
        .create(ProductDraft {
            name: "Croissant".to_owned(),
            quantity: 3,
            date: Some(now()),
        })
        .await;

    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("name taken"));
    assert_eq!(state.items, before);
    assert!(!state.loading);
}

#[rstest]
#[tokio::test]
async fn invalid_draft_never_reaches_the_server(clock: Arc<MutableClock>) {
    let (api, store) = products(&clock, Vec::new());

    store
        .create(ProductDraft {
            name: "Croissant".to_owned(),
            quantity: 0,
            date: Some(now()),
        })
        .await;

    assert!(api.calls().is_empty());
    assert_eq!(store.state().error.as_deref(), Some("Please fill all fields!"));
}

#[rstest]
#[tokio::test]
async fn update_changes_only_the_matching_entry(clock: Arc<MutableClock>) {
    let seed = vec![product("p1", "Sourdough", 4), product("p2", "Baguette", 9)];
    let (api, store) = products(&clock, seed);
    store.fetch_all(None).await;

    store
        .update(
            &RecordId::new("p2"),
            ProductPatch {
                quantity: Some(20),
                ..ProductPatch::default()
            },
        )
        .await;

    let state = store.state();
    assert_eq!(state.items[0], product("p1", "Sourdough", 4));
    assert_eq!(state.items[1].quantity, 20);
    assert_eq!(state.success.as_deref(), Some("Product updated successfully!"));

    // known to the server but not loaded locally
    let mut remote = api.records();
    remote.push(product("p3", "Rye", 1));
    api.set_records(remote);
    store
        .update(
            &RecordId::new("p3"),
            ProductPatch {
                quantity: Some(2),
                ..ProductPatch::default()
            },
        )
        .await;
    assert_eq!(store.items().len(), 2);
    assert!(store.read(|state| state.find(&RecordId::new("p3")).is_none()));
}

#[rstest]
#[tokio::test]
async fn delete_removes_entry_by_id(clock: Arc<MutableClock>) {
    let seed = vec![product("p1", "Sourdough", 4), product("p2", "Baguette", 9)];
    let (api, store) = products(&clock, seed);
    store.fetch_all(None).await;

    store.delete(&RecordId::new("p1")).await;
    assert_eq!(store.items(), vec![product("p2", "Baguette", 9)]);
    assert_eq!(
        store.state().success.as_deref(),
        Some("Product deleted successfully!")
    );

    let mut remote = api.records();
    remote.push(product("p9", "Rye", 1));
    api.set_records(remote);
    store.delete(&RecordId::new("p9")).await;
    assert_eq!(store.items().len(), 1);
}

#[rstest]
#[tokio::test]
async fn last_response_wins_on_overlapping_fetches(clock: Arc<MutableClock>) {
    let seed = vec![product("p1", "Sourdough", 4), product("p2", "Baguette", 9)];
    let (api, store) = products(&clock, seed);

    let release = api.hold_next_list();
    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_all(Some("sour")).await }
    });
    tokio::task::yield_now().await;

    store.fetch_all(None).await;
    assert_eq!(store.items().len(), 2);

    release.send(()).unwrap();
    slow.await.unwrap();

    assert_eq!(store.items(), vec![product("p1", "Sourdough", 4)]);
}

#[rstest]
#[tokio::test]
async fn status_advances_until_completed(clock: Arc<MutableClock>) {
    let due = now() + TimeDelta::hours(30);
    let (api, notifier, orders) =
        order_store(&clock, vec![order("o1", due, OrderStatus::Pending)]);
    orders.fetch_all(None).await;
    let id = RecordId::new("o1");
    let status = |orders: &OrderStore| orders.read(|state| state.find(&id).map(|o| o.status));

    assert_eq!(
        orders.advance_status(&id).await,
        StatusAdvance::Requested(OrderStatus::Processing)
    );
    assert_eq!(status(&orders), Some(OrderStatus::Processing));

    assert_eq!(
        orders.advance_status(&id).await,
        StatusAdvance::Requested(OrderStatus::Completed)
    );
    assert_eq!(status(&orders), Some(OrderStatus::Completed));

    assert_eq!(
        orders.advance_status(&id).await,
        StatusAdvance::AlreadyCompleted
    );
    assert_eq!(status(&orders), Some(OrderStatus::Completed));
    assert_eq!(notifier.texts(), vec!["Order already completed!".to_owned()]);

    let updates = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Update(_)))
        .count();
    assert_eq!(updates, 2);

    assert_eq!(
        orders.advance_status(&RecordId::new("missing")).await,
        StatusAdvance::Unknown
    );
}

#[rstest]
#[tokio::test]
async fn order_due_tomorrow_fires_one_reminder(clock: Arc<MutableClock>) {
    let tomorrow = now() + TimeDelta::days(1);
    let (_api, notifier, orders) =
        order_store(&clock, vec![order("1", tomorrow, OrderStatus::Pending)]);
    let watch = DueSoonWatch::attach(
        orders.resource(),
        clock.clone(),
        notifier.clone(),
        due_soon_window(),
    );
    assert_eq!(watch.badge(), None);

    orders.fetch_all(None).await;
    orders.fetch_all(None).await;

    assert_eq!(watch.count(), 1);
    assert_eq!(watch.badge(), Some(1));
    assert_eq!(
        notifier.texts(),
        vec!["You have 1 order(s) due within 24 hours!".to_owned()]
    );
}

#[rstest]
#[tokio::test]
async fn reminder_fires_again_only_when_count_changes(clock: Arc<MutableClock>) {
    let soon = now() + TimeDelta::hours(3);
    let (api, notifier, orders) =
        order_store(&clock, vec![order("1", soon, OrderStatus::Pending)]);
    let watch = DueSoonWatch::attach(
        orders.resource(),
        clock.clone(),
        notifier.clone(),
        due_soon_window(),
    );
    orders.fetch_all(None).await;

    api.set_records(vec![
        order("1", soon, OrderStatus::Pending),
        order("2", soon, OrderStatus::Processing),
        order("3", soon, OrderStatus::Completed),
    ]);
    orders.fetch_all(None).await;
    assert_eq!(watch.count(), 2);

    api.set_records(Vec::new());
    orders.fetch_all(None).await;
    assert_eq!(watch.badge(), None);

    watch.hover();
    assert_eq!(
        notifier.texts(),
        vec![
            "You have 1 order(s) due within 24 hours!".to_owned(),
            "You have 2 order(s) due within 24 hours!".to_owned(),
            "No pending orders within 24 hours!".to_owned(),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn order_validation_names_missing_price(clock: Arc<MutableClock>) {
    let (api, _notifier, orders) = order_store(&clock, Vec::new());

    orders
        .create(
            OrderDraft::new("Kojo", now())
                .with_item("Sourdough", 15.0)
                .with_item("Rye", 0.0),
        )
        .await;

    assert!(api.calls().is_empty());
    assert_eq!(
        orders.state().error.as_deref(),
        Some("Price for Rye is required")
    );
}

#[rstest]
#[tokio::test]
async fn invalid_order_edit_never_reaches_the_server(clock: Arc<MutableClock>) {
    let due = now() + TimeDelta::days(2);
    let (api, _notifier, orders) =
        order_store(&clock, vec![order("o1", due, OrderStatus::Pending)]);
    orders.fetch_all(None).await;

    let accepted = orders
        .update(
            &RecordId::new("o1"),
            OrderPatch {
                customer_name: Some("   ".to_owned()),
                items: Some(vec![OrderItem {
                    product_name: "Pie".to_owned(),
                    price: 0.0,
                }]),
                ..OrderPatch::default()
            },
        )
        .await;

    assert!(!accepted);
    assert_eq!(api.calls(), vec![Call::List(None)]);
    assert_eq!(
        orders.state().error.as_deref(),
        Some("Please fill all fields and add at least one product")
    );
    assert_eq!(orders.items(), vec![order("o1", due, OrderStatus::Pending)]);
}

#[rstest]
#[tokio::test]
async fn refused_status_change_reports_failure(clock: Arc<MutableClock>) {
    let due = now() + TimeDelta::days(2);
    let (api, _notifier, orders) =
        order_store(&clock, vec![order("o1", due, OrderStatus::Pending)]);
    orders.fetch_all(None).await;

    api.fail_next(ApiError::rejected(500, Some("Database offline".to_owned())));
    let id = RecordId::new("o1");

    assert_eq!(
        orders.advance_status(&id).await,
        StatusAdvance::Failed(OrderStatus::Processing)
    );
    assert_eq!(
        orders.read(|state| state.find(&id).map(|o| o.status)),
        Some(OrderStatus::Pending)
    );
    assert_eq!(orders.state().error.as_deref(), Some("Database offline"));
}

#[rstest]
#[tokio::test]
async fn revenue_figures_load_into_their_own_state(clock: Arc<MutableClock>) {
    let (_api, _notifier, orders) = order_store(&clock, Vec::new());

    orders.fetch_revenue().await;
    orders.fetch_monthly_revenue().await;

    let revenue = orders.revenue();
    assert_eq!(revenue.total, 900.0);
    assert_eq!(revenue.monthly.current_month, 600.0);
    assert!(!revenue.loading);
    assert!(orders.state().items.is_empty());
}

#[rstest]
#[tokio::test]
async fn expense_store_uses_its_own_fallback(clock: Arc<MutableClock>) {
    let api = Arc::new(MemoryApi::<Expense>::new(clock.clone()));
    let store = ResourceStore::new(api.clone());

    api.fail_next(ApiError::rejected(500, None));
    store.fetch_all(None).await;

    assert_eq!(
        store.state().error.as_deref(),
        Some("Failed to fetch expenses")
    );
}
