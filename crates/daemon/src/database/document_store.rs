use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{FromRow, QueryBuilder, Sqlite};

use common::prelude::{
    Cluster, ClusterId, ClusterRef, DocumentStore, Igfs, IgfsId, IgfsPayload, PrincipalId, Space,
    SpaceId, SpaceUser, StoreError,
};

use crate::database::{types::DUuid, Database};

type StoreResult<T> = Result<T, StoreError<sqlx::Error>>;

#[derive(FromRow)]
struct SpaceRow {
    id: DUuid,
    name: String,
    owner: DUuid,
}

#[derive(FromRow)]
struct SpaceUserRow {
    space_id: DUuid,
    account: DUuid,
}

#[derive(FromRow)]
struct ClusterRow {
    id: DUuid,
    name: String,
    space_id: DUuid,
}

#[derive(FromRow)]
struct ClusterRefRow {
    id: DUuid,
    name: String,
}

#[derive(FromRow)]
struct IgfsRow {
    id: DUuid,
    name: String,
    space_id: DUuid,
    clusters: String,
    settings: String,
}

impl IgfsRow {
    fn into_igfs(self) -> Result<Igfs, sqlx::Error> {
        let clusters: Vec<ClusterId> = serde_json::from_str(&self.clusters)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let settings: Map<String, Value> = serde_json::from_str(&self.settings)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Igfs {
            id: self.id.into(),
            name: self.name,
            space: self.space_id.into(),
            clusters,
            settings,
        })
    }
}

/// JSON columns for the cluster list and the free-form settings
fn encode_documents(
    clusters: &[ClusterId],
    settings: &Map<String, Value>,
) -> Result<(String, String), sqlx::Error> {
    let clusters = serde_json::to_string(clusters).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let settings = serde_json::to_string(settings).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    Ok((clusters, settings))
}

/// Turn a violation of the (space_id, name) index into a name conflict
fn map_write_error(e: sqlx::Error, space: SpaceId, name: &str) -> StoreError<sqlx::Error> {
    if let sqlx::Error::Database(db_error) = &e {
        if db_error.is_unique_violation() {
            return StoreError::DuplicateName {
                space,
                name: name.to_string(),
            };
        }
    }
    StoreError::Provider(e)
}

/// Append `(id1, id2, ...)` to the query
fn push_id_list<I>(qb: &mut QueryBuilder<'_, Sqlite>, ids: I)
where
    I: IntoIterator,
    I::Item: Into<DUuid>,
{
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        let id: DUuid = id.into();
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
}

#[async_trait]
impl DocumentStore for Database {
    type Error = sqlx::Error;

    async fn spaces_for_principal(&self, principal: PrincipalId) -> StoreResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.name, s.owner
            FROM spaces s
            WHERE s.owner = ?1
               OR EXISTS (
                    SELECT 1 FROM space_users u
                    WHERE u.space_id = s.id AND u.account = ?1
               )
            ORDER BY s.name, s.id
            "#,
        )
        .bind(DUuid::from(principal))
        .fetch_all(&**self)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT space_id, account FROM space_users WHERE space_id IN ",
        );
        push_id_list(&mut qb, rows.iter().map(|row| row.id));
        qb.push(" ORDER BY rowid");
        let users: Vec<SpaceUserRow> = qb.build_query_as().fetch_all(&**self).await?;

        let mut used_by: HashMap<DUuid, Vec<SpaceUser>> = HashMap::new();
        for user in users {
            used_by.entry(user.space_id).or_default().push(SpaceUser {
                account: user.account.into(),
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| Space {
                used_by: used_by.remove(&row.id).unwrap_or_default(),
                id: row.id.into(),
                name: row.name,
                owner: row.owner.into(),
            })
            .collect())
    }

    async fn clusters_in_spaces(&self, spaces: &[SpaceId]) -> StoreResult<Vec<ClusterRef>> {
        if spaces.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, name FROM clusters WHERE space_id IN ");
        push_id_list(&mut qb, spaces.iter().copied());
        qb.push(" ORDER BY name, id");
        let rows: Vec<ClusterRefRow> = qb.build_query_as().fetch_all(&**self).await?;

        Ok(rows
            .into_iter()
            .map(|row| ClusterRef {
                id: row.id.into(),
                name: row.name,
            })
            .collect())
    }

    async fn igfss_in_spaces(&self, spaces: &[SpaceId]) -> StoreResult<Vec<Igfs>> {
        if spaces.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, space_id, clusters, settings FROM igfss WHERE space_id IN ",
        );
        push_id_list(&mut qb, spaces.iter().copied());
        qb.push(" ORDER BY name, id");
        let rows: Vec<IgfsRow> = qb.build_query_as().fetch_all(&**self).await?;

        let igfss = rows
            .into_iter()
            .map(IgfsRow::into_igfs)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(igfss)
    }

    async fn find_igfs_by_name(&self, space: SpaceId, name: &str) -> StoreResult<Option<Igfs>> {
        let row: Option<IgfsRow> = sqlx::query_as(
            r#"
            SELECT id, name, space_id, clusters, settings
            FROM igfss
            WHERE space_id = ?1 AND name = ?2
            "#,
        )
        .bind(DUuid::from(space))
        .bind(name)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(IgfsRow::into_igfs).transpose()?)
    }

    async fn get_igfs(&self, id: IgfsId) -> StoreResult<Option<Igfs>> {
        let row: Option<IgfsRow> = sqlx::query_as(
            "SELECT id, name, space_id, clusters, settings FROM igfss WHERE id = ?1",
        )
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(IgfsRow::into_igfs).transpose()?)
    }

    async fn get_cluster(&self, id: ClusterId) -> StoreResult<Option<Cluster>> {
        let row: Option<ClusterRow> =
            sqlx::query_as("SELECT id, name, space_id FROM clusters WHERE id = ?1")
                .bind(DUuid::from(id))
                .fetch_optional(&**self)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let igfss: Vec<DUuid> = sqlx::query_scalar(
            "SELECT igfs_id FROM cluster_igfss WHERE cluster_id = ?1 ORDER BY seq",
        )
        .bind(row.id)
        .fetch_all(&**self)
        .await?;

        Ok(Some(Cluster {
            id: row.id.into(),
            name: row.name,
            space: row.space_id.into(),
            igfss: igfss.into_iter().map(Into::into).collect(),
        }))
    }

    async fn upsert_igfs(&self, igfs: &Igfs) -> StoreResult<()> {
        let (clusters, settings) = encode_documents(&igfs.clusters, &igfs.settings)?;

        sqlx::query(
            r#"
            INSERT INTO igfss (id, name, space_id, clusters, settings)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                space_id = excluded.space_id,
                clusters = excluded.clusters,
                settings = excluded.settings
            "#,
        )
        .bind(DUuid::from(igfs.id))
        .bind(&igfs.name)
        .bind(DUuid::from(igfs.space))
        .bind(clusters)
        .bind(settings)
        .execute(&**self)
        .await
        .map_err(|e| map_write_error(e, igfs.space, &igfs.name))?;

        Ok(())
    }

    async fn insert_igfs(&self, payload: &IgfsPayload) -> StoreResult<IgfsId> {
        let id = IgfsId::new();
        let (clusters, settings) = encode_documents(&payload.clusters, &payload.settings)?;

        sqlx::query(
            r#"
            INSERT INTO igfss (id, name, space_id, clusters, settings)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(DUuid::from(id))
        .bind(&payload.name)
        .bind(DUuid::from(payload.space))
        .bind(clusters)
        .bind(settings)
        .execute(&**self)
        .await
        .map_err(|e| map_write_error(e, payload.space, &payload.name))?;

        Ok(id)
    }

    async fn add_igfs_to_clusters(&self, igfs: IgfsId, clusters: &[ClusterId]) -> StoreResult<u64> {
        if clusters.is_empty() {
            return Ok(0);
        }

        // Unknown cluster ids select no row, existing links are ignored
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT OR IGNORE INTO cluster_igfss (cluster_id, igfs_id, seq) SELECT c.id, ",
        );
        qb.push_bind(DUuid::from(igfs));
        qb.push(
            ", (SELECT COALESCE(MAX(ci.seq), 0) + 1 FROM cluster_igfss ci WHERE ci.cluster_id = c.id) \
             FROM clusters c WHERE c.id IN ",
        );
        push_id_list(&mut qb, clusters.iter().copied());

        let result = qb.build().execute(&**self).await?;
        Ok(result.rows_affected())
    }

    async fn pull_igfs_from_clusters_except(
        &self,
        igfs: IgfsId,
        keep: &[ClusterId],
    ) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM cluster_igfss WHERE igfs_id = ");
        qb.push_bind(DUuid::from(igfs));
        if !keep.is_empty() {
            qb.push(" AND cluster_id NOT IN ");
            push_id_list(&mut qb, keep.iter().copied());
        }

        let result = qb.build().execute(&**self).await?;
        Ok(result.rows_affected())
    }

    async fn remove_igfs(&self, id: IgfsId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM igfss WHERE id = ?1")
            .bind(DUuid::from(id))
            .execute(&**self)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remove_igfss_in_spaces(&self, spaces: &[SpaceId]) -> StoreResult<u64> {
        if spaces.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM igfss WHERE space_id IN ");
        push_id_list(&mut qb, spaces.iter().copied());

        let result = qb.build().execute(&**self).await?;
        Ok(result.rows_affected())
    }

    async fn reset_cluster_igfss_in_spaces(&self, spaces: &[SpaceId]) -> StoreResult<u64> {
        if spaces.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "DELETE FROM cluster_igfss WHERE cluster_id IN (SELECT id FROM clusters WHERE space_id IN ",
        );
        push_id_list(&mut qb, spaces.iter().copied());
        qb.push(")");

        let result = qb.build().execute(&**self).await?;
        Ok(result.rows_affected())
    }
}
