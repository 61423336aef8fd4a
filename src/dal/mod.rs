//! Bindings to the database.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the database, or any other
//! > IO or interaction with other kinds of externalized state for that matter.
//!
//! Queries live on `Store`, a handle borrowed from a pooled connection. Anything that changes
//! state should be run through `DB::transaction` (or its async twin), so a failure at any step
//! rolls the whole operation back.

mod pull_requests;
mod registry;
#[allow(proc_macro_derive_resolution_fallback, unused_import_braces)]
mod schema;

#[allow(dead_code, missing_docs, unused_results)]
mod migrations {
    embed_migrations!("migrations");

    pub use self::embedded_migrations::run;
}

use crate::{error::Error, util::blocking};
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use futures::Future;
use log::info;
use std::sync::Arc;

/// A pool of connections to the database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct DB {
    pool: Arc<Pool<ConnectionManager<PgConnection>>>,
}

impl DB {
    /// Connects to the database at the given URL with a pool of the given size, running any
    /// pending migrations.
    pub fn connect(database_url: &str, pool_size: u32) -> Result<DB, Error> {
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(ConnectionManager::new(database_url))?;
        migrations::run(&*pool.get()?)?;
        info!("Connected to the database; migrations are up to date.");
        Ok(DB {
            pool: Arc::new(pool),
        })
    }

    /// A pool that never opens a connection unless something asks it for one, for testing
    /// requests that are rejected before they reach the store.
    #[cfg(test)]
    pub(crate) fn unconnected() -> DB {
        let pool = Pool::builder()
            .min_idle(Some(0))
            .build_unchecked(ConnectionManager::new("postgres://localhost/unused"));
        DB {
            pool: Arc::new(pool),
        }
    }

    /// Runs a function against the store without opening a transaction. Only suitable for
    /// functions that read.
    pub fn query<F, T>(&self, func: F) -> Result<T, Error>
    where
        F: FnOnce(&Store) -> Result<T, Error>,
    {
        let conn = self.pool.get()?;
        func(&Store { conn: &*conn })
    }

    /// Runs a function against the store inside a single transaction. The transaction commits if
    /// the function succeeds and rolls back if it fails.
    pub fn transaction<F, T>(&self, func: F) -> Result<T, Error>
    where
        F: FnOnce(&Store) -> Result<T, Error>,
    {
        let conn = self.pool.get()?;
        let conn: &PgConnection = &*conn;
        conn.transaction(|| func(&Store { conn }))
    }

    /// Like `query`, but runs on the blocking pool and returns a future.
    pub fn async_query<F, T>(&self, mut func: F) -> impl Future<Item = T, Error = Error>
    where
        F: FnMut(&Store) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        blocking(move || db.query(|store| func(store)))
    }

    /// Like `transaction`, but runs on the blocking pool and returns a future.
    ///
    /// Diesel doesn't do async (libpq exposes a synchronous interface), so this parks the
    /// transaction on one of the threadpool's blocking threads. That means we can only have as
    /// many transactions in flight as the runtime allows blocking threads.
    pub fn async_transaction<F, T>(&self, mut func: F) -> impl Future<Item = T, Error = Error>
    where
        F: FnMut(&Store) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        blocking(move || db.transaction(|store| func(store)))
    }
}

/// A handle to the database, usually scoped to a transaction.
#[allow(missing_debug_implementations)]
pub struct Store<'a> {
    conn: &'a PgConnection,
}
