//! Integration tests for `SqliteStore` against an in-memory database.

use depot_core::{
  Error,
  asset::{AVAILABLE, AssetPatch, NewAsset},
  health::{Health, health},
  ledger::TxAction,
  query::AssetQuery,
  scope::Scope,
  store::{AssetStore, CredentialStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn laptop(serial: &str) -> NewAsset {
  NewAsset {
    device_type: "Laptop".into(),
    make: "Dell".into(),
    model: "Latitude 7420".into(),
    serial_number: serial.into(),
    account_code: "65000".into(),
    price: Some(1299.5),
    building: "Main HQ".into(),
    room: "101".into(),
    tags: vec!["loaner".into()],
    ..Default::default()
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_asset() {
  let s = store().await;

  let asset = s.create_asset(laptop("SN-1")).await.unwrap();
  assert!(asset.id > 0);
  assert_eq!(asset.assigned_to, AVAILABLE);
  assert_eq!(asset.last_scanned, None);
  assert_eq!(asset.date_added, asset.last_modified);

  let fetched = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(fetched.serial_number, "SN-1");
  assert_eq!(fetched.make, "Dell");
  assert_eq!(fetched.price, Some(1299.5));
  assert_eq!(fetched.tags, vec!["loaner".to_owned()]);
}

#[tokio::test]
async fn get_asset_missing_returns_none() {
  let s = store().await;
  assert!(s.get_asset(9999).await.unwrap().is_none());
  assert!(s.get_asset_by_serial("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn get_asset_by_serial() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-2")).await.unwrap();

  let fetched = s.get_asset_by_serial("SN-2").await.unwrap().unwrap();
  assert_eq!(fetched.id, asset.id);
}

#[tokio::test]
async fn duplicate_serial_leaves_registry_unchanged() {
  let s = store().await;
  s.create_asset(laptop("SN-3")).await.unwrap();

  let mut dup = laptop("SN-3");
  dup.make = "HP".into();
  let err = s.create_asset(dup).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateSerial(serial) if serial == "SN-3"));

  let page = s.list_assets(&AssetQuery::default()).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].make, "Dell");
}

#[tokio::test]
async fn create_with_initial_assignee() {
  let s = store().await;

  let mut input = laptop("SN-4");
  input.assigned_to = Some("Alice".into());
  let asset = s.create_asset(input).await.unwrap();
  assert_eq!(asset.assigned_to, "Alice");
  assert!(!asset.is_available());
}

#[tokio::test]
async fn update_applies_patch_and_stamps_modified() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-5")).await.unwrap();

  let patch = AssetPatch {
    make: Some("Lenovo".into()),
    price: Some(499.0),
    tags: Some(vec![" spare ".into(), String::new(), "spare".into()]),
    ..Default::default()
  };
  assert!(s.update_asset(asset.id, patch).await.unwrap());

  let updated = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(updated.make, "Lenovo");
  assert_eq!(updated.price, Some(499.0));
  // Tags are normalised on write.
  assert_eq!(updated.tags, vec!["spare".to_owned()]);
  // Untouched fields survive.
  assert_eq!(updated.model, "Latitude 7420");
  assert!(updated.last_modified >= asset.last_modified);
}

#[tokio::test]
async fn update_unknown_id_is_a_noop() {
  let s = store().await;
  let patch = AssetPatch { make: Some("X".into()), ..Default::default() };
  assert!(!s.update_asset(4242, patch).await.unwrap());
}

#[tokio::test]
async fn update_to_taken_serial_is_rejected() {
  let s = store().await;
  s.create_asset(laptop("SN-6")).await.unwrap();
  let other = s.create_asset(laptop("SN-7")).await.unwrap();

  let patch = AssetPatch {
    serial_number: Some("SN-6".into()),
    ..Default::default()
  };
  let err = s.update_asset(other.id, patch).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateSerial(_)));
}

#[tokio::test]
async fn delete_is_idempotent() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-8")).await.unwrap();

  s.delete_asset(asset.id).await.unwrap();
  assert!(s.get_asset(asset.id).await.unwrap().is_none());
  // Deleting again is not an error and changes nothing.
  s.delete_asset(asset.id).await.unwrap();
}

#[tokio::test]
async fn delete_cascades_to_transactions() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-9")).await.unwrap();
  s.record(asset.id, "carol".into(), TxAction::Checkout, Some("Dan".into()))
    .await
    .unwrap();

  s.delete_asset(asset.id).await.unwrap();

  assert!(s.history(asset.id).await.unwrap().is_empty());
  assert!(s.recent_activity(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn scan_time_stamping() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-10")).await.unwrap();
  assert_eq!(health(asset.last_scanned.as_deref()), Health::Never);

  s.update_scan_time("SN-10").await.unwrap();
  let scanned = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(health(scanned.last_scanned.as_deref()), Health::Healthy);

  // Unknown serials are silently ignored.
  s.update_scan_time("no-such-serial").await.unwrap();
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_orders_newest_first() {
  let s = store().await;
  let a = s.create_asset(laptop("SN-11")).await.unwrap();
  let b = s.create_asset(laptop("SN-12")).await.unwrap();
  let c = s.create_asset(laptop("SN-13")).await.unwrap();

  let page = s.list_assets(&AssetQuery::default()).await.unwrap();
  assert_eq!(page.total, 3);
  let ids: Vec<_> = page.items.iter().map(|a| a.id).collect();
  assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[tokio::test]
async fn tag_filter_matches_whole_tags_only() {
  let s = store().await;

  let mut tagged = laptop("SN-14");
  tagged.tags = vec!["net".into()];
  s.create_asset(tagged).await.unwrap();

  let mut near_miss = laptop("SN-15");
  near_miss.tags = vec!["network".into()];
  s.create_asset(near_miss).await.unwrap();

  let query = AssetQuery { tag: Some("net".into()), ..Default::default() };
  let page = s.list_assets(&query).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].serial_number, "SN-14");

  // The "All" sentinel disables the filter.
  let query = AssetQuery { tag: Some("All".into()), ..Default::default() };
  assert_eq!(s.list_assets(&query).await.unwrap().total, 2);
}

#[tokio::test]
async fn search_terms_are_anded_and_fields_ored() {
  let s = store().await;

  let mut dell = laptop("SN1");
  dell.make = "Dell".into();
  dell.model = "Latitude 7420".into();
  s.create_asset(dell).await.unwrap();

  let mut hp = laptop("SN2");
  hp.make = "HP".into();
  hp.model = "Omen 7420".into();
  s.create_asset(hp).await.unwrap();

  // Both terms must match (in any field): only the Dell qualifies.
  let query = AssetQuery {
    search: Some("Dell 7420".into()),
    ..Default::default()
  };
  let page = s.list_assets(&query).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].serial_number, "SN1");

  // A single shared term matches both.
  let query =
    AssetQuery { search: Some("7420".into()), ..Default::default() };
  assert_eq!(s.list_assets(&query).await.unwrap().total, 2);
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
  let s = store().await;

  let mut input = laptop("SN-16");
  input.assigned_to = Some("Alice".into());
  s.create_asset(input).await.unwrap();
  s.create_asset(laptop("SN-17")).await.unwrap();

  let query =
    AssetQuery { search: Some("alice".into()), ..Default::default() };
  let page = s.list_assets(&query).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].serial_number, "SN-16");
}

#[tokio::test]
async fn pagination_total_counts_the_full_filtered_set() {
  let s = store().await;
  for i in 0..7 {
    s.create_asset(laptop(&format!("PG-{i}"))).await.unwrap();
  }

  let query = AssetQuery { limit: Some(3), ..Default::default() };
  let page = s.list_assets(&query).await.unwrap();
  assert_eq!(page.items.len(), 3);
  assert_eq!(page.total, 7);

  let query = AssetQuery { limit: Some(3), offset: 6, ..Default::default() };
  let page = s.list_assets(&query).await.unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.total, 7);

  // Past the end: an empty page, not an error.
  let query = AssetQuery { limit: Some(3), offset: 9, ..Default::default() };
  let page = s.list_assets(&query).await.unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.total, 7);
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_checkin_roundtrip() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-20")).await.unwrap();

  let out = s
    .record(asset.id, "carol".into(), TxAction::Checkout, Some("Alice".into()))
    .await
    .unwrap();
  assert_eq!(out.action, TxAction::Checkout);
  assert_eq!(out.assignee.as_deref(), Some("Alice"));

  let assigned = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(assigned.assigned_to, "Alice");
  assert!(assigned.last_modified >= asset.last_modified);

  s.record(asset.id, "carol".into(), TxAction::Checkin, None)
    .await
    .unwrap();
  let returned = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(returned.assigned_to, AVAILABLE);

  // History holds both events, newest first.
  let history = s.history(asset.id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].action, TxAction::Checkin);
  assert_eq!(history[1].action, TxAction::Checkout);
  assert_eq!(history[1].assignee.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn checkout_of_assigned_asset_is_rejected() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-21")).await.unwrap();
  s.record(asset.id, "carol".into(), TxAction::Checkout, Some("Alice".into()))
    .await
    .unwrap();

  let err = s
    .record(asset.id, "dave".into(), TxAction::Checkout, Some("Bob".into()))
    .await
    .unwrap_err();
  assert!(
    matches!(err, Error::AlreadyAssigned { assignee, .. } if assignee == "Alice")
  );

  // The failed attempt wrote nothing: custody and history are untouched.
  let current = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(current.assigned_to, "Alice");
  assert_eq!(s.history(asset.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_requires_an_assignee() {
  let s = store().await;
  let asset = s.create_asset(laptop("SN-22")).await.unwrap();

  let err = s
    .record(asset.id, "carol".into(), TxAction::Checkout, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingAssignee));

  let err = s
    .record(asset.id, "carol".into(), TxAction::Checkout, Some("  ".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingAssignee));
}

#[tokio::test]
async fn record_against_unknown_asset_is_rejected() {
  let s = store().await;
  let err = s
    .record(777, "carol".into(), TxAction::Checkin, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AssetNotFound(777)));
  assert!(s.recent_activity(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn creation_entries_never_change_custody() {
  let s = store().await;

  let asset = s.create_asset(laptop("SN-23")).await.unwrap();
  s.record(asset.id, "carol".into(), TxAction::Create, None)
    .await
    .unwrap();
  let after = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(after.assigned_to, AVAILABLE);

  let mut assigned = laptop("SN-24");
  assigned.assigned_to = Some("Alice".into());
  let asset = s.create_asset(assigned).await.unwrap();
  s.record(
    asset.id,
    "carol".into(),
    TxAction::CreateAssign,
    Some("Alice".into()),
  )
  .await
  .unwrap();
  let after = s.get_asset(asset.id).await.unwrap().unwrap();
  assert_eq!(after.assigned_to, "Alice");
}

#[tokio::test]
async fn recent_activity_joins_asset_identity() {
  let s = store().await;
  let a = s.create_asset(laptop("SN-25")).await.unwrap();
  let b = s.create_asset(laptop("SN-26")).await.unwrap();

  s.record(a.id, "carol".into(), TxAction::Create, None).await.unwrap();
  s.record(b.id, "carol".into(), TxAction::Checkout, Some("Eve".into()))
    .await
    .unwrap();
  s.record(b.id, "dave".into(), TxAction::Checkin, None).await.unwrap();

  let entries = s.recent_activity(None).await.unwrap();
  assert_eq!(entries.len(), 3);
  // Newest first, carrying the joined asset identity.
  assert_eq!(entries[0].action, TxAction::Checkin);
  assert_eq!(entries[0].serial_number, "SN-26");
  assert_eq!(entries[0].make, "Dell");

  let capped = s.recent_activity(Some(2)).await.unwrap();
  assert_eq!(capped.len(), 2);
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_aggregation() {
  let s = store().await;

  let mut a = laptop("ST-1");
  a.price = Some(100.0);
  a.tags = vec!["a".into(), "b".into()];
  s.create_asset(a).await.unwrap();

  let mut b = laptop("ST-2");
  b.price = None;
  b.device_type = "Monitor".into();
  b.tags = vec!["b".into(), "c".into()];
  s.create_asset(b).await.unwrap();

  let mut c = laptop("ST-3");
  c.price = Some(250.5);
  c.tags = Vec::new();
  s.create_asset(c).await.unwrap();

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.total_assets, 3);
  assert_eq!(stats.total_value, 350.5);
  assert_eq!(stats.distinct_types, 2);
  assert_eq!(stats.tags, vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]);
  assert_eq!(
    stats.device_types,
    vec!["Laptop".to_owned(), "Monitor".to_owned()]
  );
  assert_eq!(stats.added_this_month, 3);
}

#[tokio::test]
async fn stats_on_empty_registry() {
  let s = store().await;
  let stats = s.stats().await.unwrap();
  assert_eq!(stats.total_assets, 0);
  assert_eq!(stats.total_value, 0.0);
  assert_eq!(stats.distinct_types, 0);
  assert!(stats.tags.is_empty());
  assert!(stats.device_types.is_empty());
}

// ─── Credentials ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_accepts_only_the_right_password() {
  let s = store().await;
  s.add_user("carol".into(), "hunter2".into(), "User".into(), Scope::ReadWrite)
    .await
    .unwrap();

  let principal = s.verify("carol", "hunter2").await.unwrap().unwrap();
  assert_eq!(principal.username, "carol");
  assert_eq!(principal.scope, Scope::ReadWrite);

  // Wrong password and unknown user yield the same shape.
  assert!(s.verify("carol", "wrong").await.unwrap().is_none());
  assert!(s.verify("mallory", "hunter2").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.add_user("carol".into(), "pw".into(), "User".into(), Scope::ReadOnly)
    .await
    .unwrap();

  let err = s
    .add_user("carol".into(), "other".into(), "User".into(), Scope::Admin)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateUsername(name) if name == "carol"));
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn scope_and_password_updates_take_effect() {
  let s = store().await;
  let user = s
    .add_user("carol".into(), "pw".into(), "User".into(), Scope::ReadOnly)
    .await
    .unwrap();

  s.update_user_scope(user.id, Scope::ReadWrite).await.unwrap();
  let principal = s.verify("carol", "pw").await.unwrap().unwrap();
  assert_eq!(principal.scope, Scope::ReadWrite);

  s.update_user_password(user.id, "newpw".into()).await.unwrap();
  assert!(s.verify("carol", "pw").await.unwrap().is_none());
  assert!(s.verify("carol", "newpw").await.unwrap().is_some());
}

#[tokio::test]
async fn user_mutations_on_unknown_ids_are_noops() {
  let s = store().await;
  s.update_user_scope(404, Scope::Admin).await.unwrap();
  s.update_user_password(404, "pw".into()).await.unwrap();
  s.delete_user(404).await.unwrap();
}

#[tokio::test]
async fn the_last_admin_is_protected() {
  let s = store().await;
  assert!(s.ensure_default_admin().await.unwrap());
  let users = s.list_users().await.unwrap();
  let admin_id = users[0].id;

  // Neither deletion nor demotion may remove the only admin.
  let err = s.delete_user(admin_id).await.unwrap_err();
  assert!(matches!(err, Error::LastAdmin));
  let err = s.update_user_scope(admin_id, Scope::ReadOnly).await.unwrap_err();
  assert!(matches!(err, Error::LastAdmin));

  // With a second admin present both operations go through.
  s.add_user("root2".into(), "pw".into(), "Admin".into(), Scope::Admin)
    .await
    .unwrap();
  s.update_user_scope(admin_id, Scope::ReadOnly).await.unwrap();
  s.delete_user(admin_id).await.unwrap();
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn default_admin_is_seeded_once() {
  let s = store().await;
  assert!(s.ensure_default_admin().await.unwrap());
  assert!(!s.ensure_default_admin().await.unwrap());

  let principal = s
    .verify(crate::DEFAULT_ADMIN_USERNAME, crate::DEFAULT_ADMIN_PASSWORD)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(principal.scope, Scope::Admin);

  // A populated users table is never reseeded.
  let s = store().await;
  s.add_user("carol".into(), "pw".into(), "User".into(), Scope::ReadOnly)
    .await
    .unwrap();
  assert!(!s.ensure_default_admin().await.unwrap());
}
