//! Embedded SQL migrations for the two DuckDB files
//!
//! Both files share `000_migrations.sql`, which creates the `sys_migrations`
//! bookkeeping table. Entries are applied in list order; append new files
//! with the next `NNN_` prefix.

/// Schema of `halisaha.duckdb`
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_kv_store.sql", include_str!("001_kv_store.sql")),
];

/// Schema of `logs.duckdb`
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_log_schema.sql", include_str!("001_log_schema.sql")),
];
