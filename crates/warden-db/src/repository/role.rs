//! SurrealDB implementation of [`RoleRepository`].
//!
//! Memberships are `has_role` graph edges from `user` to `role`
//! records. The unique index on (`in`, `out`) keeps each (user, role)
//! pair to a single edge; grant and revoke are both idempotent.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::role::{CreateRole, Role};
use warden_core::models::user::User;
use warden_core::repository::{PaginatedResult, Pagination, RoleRepository};

use crate::error::DbError;
use crate::repository::user::UserRowWithId;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Role {
            id,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Whether a record with the given id exists in the table.
    async fn record_exists(&self, table: &'static str, id: Uuid) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM {table} \
                 WHERE id = type::record('{table}', $id) GROUP ALL"
            ))
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn membership_exists(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM has_role \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('role', $role_id) GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, input: CreateRole) -> WardenResult<Role> {
        let name = input.name.trim().to_lowercase();

        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM role WHERE name = $name GROUP ALL")
            .bind(("name", name.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        if count_rows.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Err(WardenError::DuplicateRoleName { name });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('role', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(Role {
            id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    async fn ensure(&self, name: &str) -> WardenResult<Role> {
        match self.get_by_name(name).await {
            Ok(role) => Ok(role),
            Err(WardenError::NotFound { .. }) => {
                match self.create(CreateRole { name: name.into() }).await {
                    Ok(role) => Ok(role),
                    // Lost a race with a concurrent ensure.
                    Err(WardenError::DuplicateRoleName { .. }) => self.get_by_name(name).await,
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(Role {
            id,
            name: row.name,
            created_at: row.created_at,
        })
    }

    async fn get_by_name(&self, name: &str) -> WardenResult<Role> {
        let name = name.trim().to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE name = $name",
            )
            .bind(("name", name.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_role()?)
    }

    async fn delete(&self, id: Uuid) -> WardenResult<()> {
        let id_str = id.to_string();

        if !self.record_exists("role", id).await? {
            return Err(DbError::NotFound {
                entity: "role".into(),
                id: id_str,
            }
            .into());
        }

        // Cascade: memberships first, then the role record.
        let query = format!(
            "DELETE has_role WHERE out = role:`{id_str}`; \
             DELETE type::record('role', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> WardenResult<PaginatedResult<Role>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM role GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn grant_to_user(&self, user_id: Uuid, role_id: Uuid) -> WardenResult<()> {
        // Referential integrity: a membership may not point at a
        // missing user or role.
        if !self.record_exists("user", user_id).await? {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            }
            .into());
        }
        if !self.record_exists("role", role_id).await? {
            return Err(DbError::NotFound {
                entity: "role".into(),
                id: role_id.to_string(),
            }
            .into());
        }

        // Already granted: no-op. The unique (in, out) index rejects a
        // racing duplicate edge.
        if self.membership_exists(user_id, role_id).await? {
            return Ok(());
        }

        let user_id_str = user_id.to_string();
        let role_id_str = role_id.to_string();

        let query = format!("RELATE user:`{user_id_str}` -> has_role -> role:`{role_id_str}`;");

        self.db
            .query(query)
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn revoke_from_user(&self, user_id: Uuid, role_id: Uuid) -> WardenResult<()> {
        // Deleting an absent edge is a no-op.
        self.db
            .query(
                "DELETE has_role WHERE \
                 in = type::record('user', $user_id) AND \
                 out = type::record('role', $role_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn roles_of_user(&self, user_id: Uuid) -> WardenResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE id IN (\
                     SELECT VALUE out FROM has_role \
                     WHERE in = type::record('user', $user_id)\
                 ) \
                 ORDER BY name ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }

    async fn user_has_role(&self, user_id: Uuid, role_name: &str) -> WardenResult<bool> {
        let role_name = role_name.trim().to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM has_role \
                 WHERE in = type::record('user', $user_id) \
                 AND out IN (SELECT VALUE id FROM role WHERE name = $name) \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("name", role_name))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn members(
        &self,
        role_id: Uuid,
        pagination: Pagination,
    ) -> WardenResult<PaginatedResult<User>> {
        let role_id_str = role_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM has_role \
                 WHERE out = type::record('role', $role_id) GROUP ALL",
            )
            .bind(("role_id", role_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (\
                     SELECT VALUE in FROM has_role \
                     WHERE out = type::record('role', $role_id)\
                 ) \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("role_id", role_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
