//! Writes for the space and cluster collections.
//!
//! Spaces and clusters are managed elsewhere; these let a deployment
//!  (or a test) seed the local database with them.

use common::prelude::{Cluster, ClusterId, Space};

use crate::database::{types::DUuid, Database};

impl Database {
    /// Insert a space together with its `usedBy` accounts
    pub async fn insert_space(&self, space: &Space) -> Result<(), sqlx::Error> {
        let mut tx = self.begin().await?;

        sqlx::query("INSERT INTO spaces (id, name, owner) VALUES (?1, ?2, ?3)")
            .bind(DUuid::from(space.id))
            .bind(&space.name)
            .bind(DUuid::from(space.owner))
            .execute(&mut *tx)
            .await?;

        for user in &space.used_by {
            sqlx::query("INSERT OR IGNORE INTO space_users (space_id, account) VALUES (?1, ?2)")
                .bind(DUuid::from(space.id))
                .bind(DUuid::from(user.account))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    /// Insert a cluster. Its `igfss` list is stored as given, dangling
    ///  ids included.
    pub async fn insert_cluster(&self, cluster: &Cluster) -> Result<(), sqlx::Error> {
        let mut tx = self.begin().await?;

        sqlx::query("INSERT INTO clusters (id, name, space_id) VALUES (?1, ?2, ?3)")
            .bind(DUuid::from(cluster.id))
            .bind(&cluster.name)
            .bind(DUuid::from(cluster.space))
            .execute(&mut *tx)
            .await?;

        for (seq, igfs) in cluster.igfss.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO cluster_igfss (cluster_id, igfs_id, seq) VALUES (?1, ?2, ?3)",
            )
            .bind(DUuid::from(cluster.id))
            .bind(DUuid::from(*igfs))
            .bind(seq as i64 + 1)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// Delete a cluster and its membership list. IGFS documents that
    ///  still reference it are left alone.
    pub async fn delete_cluster(&self, id: ClusterId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clusters WHERE id = ?1")
            .bind(DUuid::from(id))
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
