//! Database and platform operations.
//!
//! Direct Postgres access (connection pool, transactional SQL application,
//! schema introspection) plus the platform REST client used when no direct
//! connection is available (SQL execution RPC, storage buckets).

pub mod introspect;
pub mod migrate;
pub mod platform;
pub mod pool;

pub use introspect::{list_tables, table_count, TableInfo};
pub use migrate::{apply_sql, apply_sql_file};
pub use platform::{BucketConfig, BucketInfo, PlatformClient};
pub use pool::{connect, ping, server_version};
