// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistent storage.
use std::collections::BTreeSet;
use std::str::FromStr;

use onboard_core::{Role, RoleId, Software, SoftwareId, SoftwarePatch};
use sqlx::migrate;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, query, query_as, query_scalar};
use thiserror::Error;

use crate::sqlite::models::{RoleRow, SoftwareRow};
use crate::{AssociationStore, RoleStore, SoftwareStore};

/// Re-export of SQLite connection pool type.
pub type Pool = SqlitePool;

/// Errors from the SQLite-backed store.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// SQLite-based persistent store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) pool: Pool,
}

impl SqliteStore {
    /// Create a new `SqliteStore` using the provided db `Pool`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Create the database if it doesn't already exist.
pub async fn create_database(url: &str) -> Result<(), SqliteStoreError> {
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?;
    }

    Ok(())
}

/// Create a connection pool.
pub async fn connection_pool(
    url: &str,
    max_connections: u32,
) -> Result<Pool, SqliteStoreError> {
    let pool: Pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Run any pending database migrations from inside the application.
pub async fn run_pending_migrations(pool: &Pool) -> Result<(), SqliteStoreError> {
    migrate!().run(pool).await?;
    Ok(())
}

impl RoleStore for SqliteStore {
    type Error = SqliteStoreError;

    async fn insert_role(&mut self, role: Role) -> Result<bool, Self::Error> {
        let result = query(
            "
            INSERT OR IGNORE INTO
                roles_v1 (id, name, label)
            VALUES
                ($1, $2, $3)
            ",
        )
        .bind(role.id.to_string())
        .bind(role.name)
        .bind(role.label)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_role(&self, id: RoleId) -> Result<Option<Role>, Self::Error> {
        let row = query_as::<_, RoleRow>(
            "
            SELECT
                id, name, label
            FROM
                roles_v1
            WHERE
                id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Role::from))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, Self::Error> {
        let rows = query_as::<_, RoleRow>(
            "
            SELECT
                id, name, label
            FROM
                roles_v1
            ORDER BY
                id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn delete_role(&mut self, id: RoleId) -> Result<bool, Self::Error> {
        let result = query("DELETE FROM roles_v1 WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl SoftwareStore for SqliteStore {
    type Error = SqliteStoreError;

    async fn insert_software(&mut self, software: Software) -> Result<bool, Self::Error> {
        let result = query(
            "
            INSERT OR IGNORE INTO
                software_v1 (id, name, description, url, is_active)
            VALUES
                ($1, $2, $3, $4, $5)
            ",
        )
        .bind(software.id.to_string())
        .bind(software.name)
        .bind(software.description)
        .bind(software.url)
        .bind(software.is_active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        let row = query_as::<_, SoftwareRow>(
            "
            SELECT
                id, name, description, url, is_active
            FROM
                software_v1
            WHERE
                id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Software::from))
    }

    async fn list_software(&self) -> Result<Vec<Software>, Self::Error> {
        let rows = query_as::<_, SoftwareRow>(
            "
            SELECT
                id, name, description, url, is_active
            FROM
                software_v1
            ORDER BY
                id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Software::from).collect())
    }

    async fn update_software(
        &mut self,
        id: SoftwareId,
        patch: &SoftwarePatch,
    ) -> Result<Option<Software>, Self::Error> {
        // Read, patch in memory, write back in one transaction. Concurrent
        // updates of the same record are serialized by the transaction.
        let mut tx = self.pool.begin().await?;

        let row = query_as::<_, SoftwareRow>(
            "
            SELECT
                id, name, description, url, is_active
            FROM
                software_v1
            WHERE
                id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut software = Software::from(row);
        patch.apply_to(&mut software);

        query(
            "
            UPDATE
                software_v1
            SET
                name = $2, description = $3, url = $4, is_active = $5
            WHERE
                id = $1
            ",
        )
        .bind(software.id.to_string())
        .bind(software.name.clone())
        .bind(software.description.clone())
        .bind(software.url.clone())
        .bind(software.is_active)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(software))
    }

    async fn delete_software(&mut self, id: SoftwareId) -> Result<bool, Self::Error> {
        let result = query("DELETE FROM software_v1 WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl AssociationStore for SqliteStore {
    type Error = SqliteStoreError;

    async fn attach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        // The composite primary key plus OR IGNORE makes attachment
        // idempotent.
        let result = query(
            "
            INSERT OR IGNORE INTO
                software_roles_v1 (software_id, role_id)
            VALUES
                ($1, $2)
            ",
        )
        .bind(software_id.to_string())
        .bind(role_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn detach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        let result = query(
            "
            DELETE FROM
                software_roles_v1
            WHERE
                software_id = $1 AND role_id = $2
            ",
        )
        .bind(software_id.to_string())
        .bind(role_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn role_ids_for(
        &self,
        software_id: SoftwareId,
    ) -> Result<BTreeSet<RoleId>, Self::Error> {
        let ids: Vec<String> = query_scalar(
            "
            SELECT
                role_id
            FROM
                software_roles_v1
            WHERE
                software_id = $1
            ",
        )
        .bind(software_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids
            .iter()
            // We assume database values are valid and therefore we're safe to unwrap.
            .map(|id| RoleId::from_str(id).unwrap())
            .collect())
    }

    async fn detach_all(&mut self, software_id: SoftwareId) -> Result<usize, Self::Error> {
        let result = query("DELETE FROM software_roles_v1 WHERE software_id = $1")
            .bind(software_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}
