//! [`SqliteStore`] — the SQLite implementation of [`AssetStore`] and
//! [`CredentialStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, params, params_from_iter, types::Value};

use depot_core::{
  Error, Result,
  asset::{AVAILABLE, Asset, AssetId, AssetPatch, NewAsset},
  ledger::{AuditEntry, DEFAULT_AUDIT_LIMIT, Transaction, TxAction},
  query::{AssetQuery, Page},
  scope::Scope,
  stats::Stats,
  store::{AssetStore, CredentialStore},
  user::{Principal, UserSummary},
};

use crate::{
  encode::{
    ASSET_COLUMNS, RawAsset, RawAuditEntry, RawTransaction, decode_tags,
    encode_dt, encode_tags, search_column,
  },
  password::{hash_password, verify_password},
  schema::SCHEMA,
};

/// Username of the account seeded on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Initial password of the seeded account. Expected to be changed promptly.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Depot store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Append `col = ?N` to a dynamic SET clause.
fn bind_set(sets: &mut Vec<String>, binds: &mut Vec<Value>, col: &str, value: Value) {
  binds.push(value);
  sets.push(format!("{col} = ?{}", binds.len()));
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  /// Seed the initial admin account when the users table is empty.
  /// Returns `true` if seeding happened.
  pub async fn ensure_default_admin(&self) -> Result<bool> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
      })
      .await
      .map_err(Error::storage)?;

    if count > 0 {
      return Ok(false);
    }

    self
      .add_user(
        DEFAULT_ADMIN_USERNAME.to_owned(),
        DEFAULT_ADMIN_PASSWORD.to_owned(),
        "Admin".to_owned(),
        Scope::Admin,
      )
      .await?;
    Ok(true)
  }
}

// ─── AssetStore impl ─────────────────────────────────────────────────────────

impl AssetStore for SqliteStore {
  async fn create_asset(&self, input: NewAsset) -> Result<Asset> {
    let now = Utc::now();
    let mut asset = Asset {
      id:             0,
      assigned_to:    input.initial_assignee().to_owned(),
      device_type:    input.device_type,
      make:           input.make,
      model:          input.model,
      serial_number:  input.serial_number,
      stock_number:   input.stock_number,
      account_code:   input.account_code,
      price:          input.price,
      building:       input.building,
      room:           input.room,
      classification: input.classification,
      rack:           input.rack,
      row:            input.row,
      table:          input.table,
      tags:           decode_tags(&encode_tags(&input.tags)),
      date_added:     now,
      last_modified:  now,
      last_scanned:   None,
    };

    let row = asset.clone();
    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM assets WHERE serial_number = ?1",
            params![row.serial_number],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(Error::DuplicateSerial(row.serial_number)));
        }

        tx.execute(
          "INSERT INTO assets (
             device_type, make, model, serial_number, stock_number,
             account_code, price, building, room, classification,
             rack, row_num, table_num, assigned_to, tags,
             date_added, last_modified, last_scanned
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
          params![
            row.device_type,
            row.make,
            row.model,
            row.serial_number,
            row.stock_number,
            row.account_code,
            row.price,
            row.building,
            row.room,
            row.classification,
            row.rack,
            row.row,
            row.table,
            row.assigned_to,
            encode_tags(&row.tags),
            encode_dt(row.date_added),
            encode_dt(row.last_modified),
            row.last_scanned,
          ],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await
      .map_err(Error::storage)??;

    asset.id = id;
    Ok(asset)
  }

  async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>> {
    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?1"),
              params![id],
              RawAsset::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    raw.map(RawAsset::into_asset).transpose()
  }

  async fn get_asset_by_serial(&self, serial: &str) -> Result<Option<Asset>> {
    let serial = serial.to_owned();
    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSET_COLUMNS} FROM assets WHERE serial_number = ?1"
              ),
              params![serial],
              RawAsset::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    raw.map(RawAsset::into_asset).transpose()
  }

  async fn update_asset(&self, id: AssetId, patch: AssetPatch) -> Result<bool> {
    let now_str = encode_dt(Utc::now());
    let new_serial = patch.serial_number.clone();

    self
      .conn
      .call(move |conn| {
        let mut sets: Vec<String> = Vec::new();
        let mut binds: Vec<Value> = Vec::new();

        if let Some(v) = patch.device_type {
          bind_set(&mut sets, &mut binds, "device_type", Value::Text(v));
        }
        if let Some(v) = patch.make {
          bind_set(&mut sets, &mut binds, "make", Value::Text(v));
        }
        if let Some(v) = patch.model {
          bind_set(&mut sets, &mut binds, "model", Value::Text(v));
        }
        if let Some(v) = patch.serial_number {
          bind_set(&mut sets, &mut binds, "serial_number", Value::Text(v));
        }
        if let Some(v) = patch.stock_number {
          bind_set(&mut sets, &mut binds, "stock_number", Value::Text(v));
        }
        if let Some(v) = patch.account_code {
          bind_set(&mut sets, &mut binds, "account_code", Value::Text(v));
        }
        if let Some(v) = patch.price {
          bind_set(&mut sets, &mut binds, "price", Value::Real(v));
        }
        if let Some(v) = patch.building {
          bind_set(&mut sets, &mut binds, "building", Value::Text(v));
        }
        if let Some(v) = patch.room {
          bind_set(&mut sets, &mut binds, "room", Value::Text(v));
        }
        if let Some(v) = patch.classification {
          bind_set(&mut sets, &mut binds, "classification", Value::Text(v));
        }
        if let Some(v) = patch.rack {
          bind_set(&mut sets, &mut binds, "rack", Value::Text(v));
        }
        if let Some(v) = patch.row {
          bind_set(&mut sets, &mut binds, "row_num", Value::Text(v));
        }
        if let Some(v) = patch.table {
          bind_set(&mut sets, &mut binds, "table_num", Value::Text(v));
        }
        if let Some(v) = patch.assigned_to {
          bind_set(&mut sets, &mut binds, "assigned_to", Value::Text(v));
        }
        if let Some(v) = patch.tags {
          bind_set(&mut sets, &mut binds, "tags", Value::Text(encode_tags(&v)));
        }
        if let Some(v) = patch.last_scanned {
          bind_set(&mut sets, &mut binds, "last_scanned", Value::Text(v));
        }
        bind_set(&mut sets, &mut binds, "last_modified", Value::Text(now_str));

        let sql = format!(
          "UPDATE assets SET {} WHERE id = ?{}",
          sets.join(", "),
          binds.len() + 1
        );
        binds.push(Value::Integer(id));

        let changed = match conn.execute(&sql, params_from_iter(binds)) {
          Ok(n) => n,
          Err(ref e) if is_unique_violation(e) => {
            return Ok(Err(Error::DuplicateSerial(
              new_serial.unwrap_or_default(),
            )));
          }
          Err(e) => return Err(e.into()),
        };
        Ok(Ok(changed > 0))
      })
      .await
      .map_err(Error::storage)?
  }

  async fn delete_asset(&self, id: AssetId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM assets WHERE id = ?1", params![id])?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn update_scan_time(&self, serial: &str) -> Result<()> {
    let serial = serial.to_owned();
    let now_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE assets SET last_scanned = ?1 WHERE serial_number = ?2",
          params![now_str, serial],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn list_assets(&self, query: &AssetQuery) -> Result<Page> {
    let tag_pattern = query.effective_tag().map(|t| format!("%,{t},%"));
    let term_patterns: Vec<String> =
      query.terms().iter().map(|t| format!("%{t}%")).collect();
    let columns: Vec<&'static str> =
      query.fields.iter().copied().map(search_column).collect();
    let limit = query.limit.map_or(-1, |l| l as i64);
    let offset = query.offset as i64;

    let (raws, total): (Vec<RawAsset>, i64) = self
      .conn
      .call(move |conn| {
        // Build the WHERE clause dynamically; all operands are LIKE
        // patterns, so every bind is text. SQLite LIKE is ASCII
        // case-insensitive, matching the search contract.
        let mut conds: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(pattern) = tag_pattern {
          binds.push(pattern);
          conds.push(format!(
            "(',' || tags || ',') LIKE ?{}",
            binds.len()
          ));
        }

        for term in &term_patterns {
          let mut ors: Vec<String> = Vec::new();
          for col in &columns {
            binds.push(term.clone());
            ors.push(format!("{col} LIKE ?{}", binds.len()));
          }
          conds.push(format!("({})", ors.join(" OR ")));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM assets {where_clause}"),
          params_from_iter(binds.iter()),
          |r| r.get(0),
        )?;

        let sql = format!(
          "SELECT {ASSET_COLUMNS} FROM assets {where_clause}
           ORDER BY id DESC LIMIT {limit} OFFSET {offset}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(binds.iter()), RawAsset::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await
      .map_err(Error::storage)?;

    let items = raws
      .into_iter()
      .map(RawAsset::into_asset)
      .collect::<Result<_>>()?;
    Ok(Page { items, total: total as usize })
  }

  async fn record(
    &self,
    asset_id: AssetId,
    user_name: String,
    action: TxAction,
    assignee: Option<String>,
  ) -> Result<Transaction> {
    if action == TxAction::Checkout
      && assignee.as_deref().is_none_or(|s| s.trim().is_empty())
    {
      return Err(Error::MissingAssignee);
    }

    let now = Utc::now();
    let now_str = encode_dt(now);
    let user = user_name.clone();
    let who = assignee.clone();

    let id = self
      .conn
      .call(move |conn| {
        // The assignee read, guard, asset mutation, and ledger append all
        // share one transaction: a concurrent checkout serialises behind
        // this writer and then fails the guard instead of overwriting.
        let tx = conn.transaction()?;

        let current: Option<String> = tx
          .query_row(
            "SELECT assigned_to FROM assets WHERE id = ?1",
            params![asset_id],
            |r| r.get(0),
          )
          .optional()?;
        let Some(current) = current else {
          return Ok(Err(Error::AssetNotFound(asset_id)));
        };

        match action {
          TxAction::Checkout => {
            if current != AVAILABLE {
              return Ok(Err(Error::AlreadyAssigned {
                id:       asset_id,
                assignee: current,
              }));
            }
            tx.execute(
              "UPDATE assets SET assigned_to = ?1, last_modified = ?2
               WHERE id = ?3",
              params![who, now_str, asset_id],
            )?;
          }
          TxAction::Checkin => {
            tx.execute(
              "UPDATE assets SET assigned_to = ?1, last_modified = ?2
               WHERE id = ?3",
              params![AVAILABLE, now_str, asset_id],
            )?;
          }
          // Informational entries: no custody change.
          TxAction::Create | TxAction::CreateAssign => {
            tx.execute(
              "UPDATE assets SET last_modified = ?1 WHERE id = ?2",
              params![now_str, asset_id],
            )?;
          }
        }

        tx.execute(
          "INSERT INTO transactions (asset_id, user_name, assignee, action, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![asset_id, user, who, action.as_str(), now_str],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await
      .map_err(Error::storage)??;

    Ok(Transaction {
      id,
      asset_id,
      user_name,
      assignee,
      action,
      timestamp: now,
    })
  }

  async fn history(&self, asset_id: AssetId) -> Result<Vec<Transaction>> {
    let raws: Vec<RawTransaction> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, asset_id, user_name, assignee, action, timestamp
           FROM transactions WHERE asset_id = ?1 ORDER BY id DESC",
        )?;
        let rows = stmt
          .query_map(params![asset_id], RawTransaction::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws
      .into_iter()
      .map(RawTransaction::into_transaction)
      .collect()
  }

  async fn recent_activity(
    &self,
    limit: Option<usize>,
  ) -> Result<Vec<AuditEntry>> {
    let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT) as i64;

    let raws: Vec<RawAuditEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.timestamp, t.action, t.user_name, t.assignee,
                  t.asset_id, a.serial_number, a.make, a.model
           FROM transactions t
           JOIN assets a ON a.id = t.asset_id
           ORDER BY t.timestamp DESC, t.id DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(params![limit], RawAuditEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawAuditEntry::into_entry).collect()
  }

  async fn stats(&self) -> Result<Stats> {
    let month_key = Utc::now().format("%Y-%m").to_string();

    let (total, value, distinct_types, tag_rows, device_types, added) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM assets", [], |r| r.get(0))?;

        let value: f64 = conn.query_row(
          "SELECT COALESCE(SUM(price), 0) FROM assets",
          [],
          |r| r.get(0),
        )?;

        let distinct_types: i64 = conn.query_row(
          "SELECT COUNT(DISTINCT device_type) FROM assets
           WHERE device_type != ''",
          [],
          |r| r.get(0),
        )?;

        let mut stmt =
          conn.prepare("SELECT tags FROM assets WHERE tags != ''")?;
        let tag_rows = stmt
          .query_map([], |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT DISTINCT device_type FROM assets
           WHERE device_type != '' ORDER BY device_type",
        )?;
        let device_types = stmt
          .query_map([], |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // RFC 3339 timestamps start with `YYYY-MM`, so a prefix compare
        // selects the calendar month.
        let added: i64 = conn.query_row(
          "SELECT COUNT(*) FROM assets WHERE substr(date_added, 1, 7) = ?1",
          params![month_key],
          |r| r.get(0),
        )?;

        Ok((total, value, distinct_types, tag_rows, device_types, added))
      })
      .await
      .map_err(Error::storage)?;

    let mut tags: Vec<String> = Vec::new();
    for row in &tag_rows {
      for tag in decode_tags(row) {
        if !tags.contains(&tag) {
          tags.push(tag);
        }
      }
    }
    tags.sort();

    Ok(Stats {
      total_assets: total as usize,
      total_value: value,
      distinct_types: distinct_types as usize,
      tags,
      device_types,
      added_this_month: added as usize,
    })
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  async fn verify(
    &self,
    username: &str,
    password: &str,
  ) -> Result<Option<Principal>> {
    let username = username.to_owned();

    let row: Option<(i64, String, String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, username, password_hash, role, scope
               FROM users WHERE username = ?1",
              params![username],
              |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    let Some((id, username, hash, role, scope)) = row else {
      return Ok(None);
    };
    if !verify_password(password, &hash) {
      return Ok(None);
    }

    Ok(Some(Principal {
      id,
      username,
      role,
      scope: scope.parse()?,
    }))
  }

  async fn add_user(
    &self,
    username: String,
    password: String,
    role: String,
    scope: Scope,
  ) -> Result<UserSummary> {
    let hash = hash_password(&password)?;
    let name = username.clone();
    let role_copy = role.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            params![name],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(Error::DuplicateUsername(name)));
        }

        tx.execute(
          "INSERT INTO users (username, password_hash, role, scope)
           VALUES (?1, ?2, ?3, ?4)",
          params![name, hash, role_copy, scope.as_str()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await
      .map_err(Error::storage)??;

    Ok(UserSummary { id, username, role, scope })
  }

  async fn list_users(&self) -> Result<Vec<UserSummary>> {
    let rows: Vec<(i64, String, String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, username, role, scope FROM users ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    rows
      .into_iter()
      .map(|(id, username, role, scope)| {
        Ok(UserSummary { id, username, role, scope: scope.parse()? })
      })
      .collect()
  }

  async fn update_user_scope(&self, id: i64, scope: Scope) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<String> = tx
          .query_row(
            "SELECT scope FROM users WHERE id = ?1",
            params![id],
            |r| r.get(0),
          )
          .optional()?;
        // Unknown id is a no-op, per the mutation contract.
        let Some(current) = current else {
          return Ok(Ok(()));
        };

        if current == Scope::Admin.as_str() && scope != Scope::Admin {
          let admins: i64 = tx.query_row(
            "SELECT COUNT(*) FROM users WHERE scope = ?1",
            params![Scope::Admin.as_str()],
            |r| r.get(0),
          )?;
          if admins <= 1 {
            return Ok(Err(Error::LastAdmin));
          }
        }

        tx.execute(
          "UPDATE users SET scope = ?1 WHERE id = ?2",
          params![scope.as_str(), id],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::storage)?
  }

  async fn update_user_password(&self, id: i64, password: String) -> Result<()> {
    let hash = hash_password(&password)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?1 WHERE id = ?2",
          params![hash, id],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn delete_user(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let scope: Option<String> = tx
          .query_row(
            "SELECT scope FROM users WHERE id = ?1",
            params![id],
            |r| r.get(0),
          )
          .optional()?;
        let Some(scope) = scope else {
          return Ok(Ok(()));
        };

        if scope == Scope::Admin.as_str() {
          let admins: i64 = tx.query_row(
            "SELECT COUNT(*) FROM users WHERE scope = ?1",
            params![Scope::Admin.as_str()],
            |r| r.get(0),
          )?;
          if admins <= 1 {
            return Ok(Err(Error::LastAdmin));
          }
        }

        tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::storage)?
  }
}
