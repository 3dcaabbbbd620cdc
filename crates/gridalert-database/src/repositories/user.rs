//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use gridalert_core::error::{AppError, ErrorKind};
use gridalert_core::result::AppResult;
use gridalert_core::traits::repository::UserRepository;
use gridalert_core::types::id::{CircleId, DivisionId, SubdivisionId, UserId, ZoneId};
use gridalert_core::types::role::{HierarchyLevel, UserRole};
use gridalert_core::types::user::{AssignedLevels, User};

type UserRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// PostgreSQL-backed user registry mirror.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Column recording a user's assignment at a hierarchy level.
    fn level_column(level: HierarchyLevel) -> &'static str {
        match level {
            HierarchyLevel::Subdivision => "subdivision_id",
            HierarchyLevel::Division => "division_id",
            HierarchyLevel::Circle => "circle_id",
            HierarchyLevel::Zone => "zone_id",
        }
    }

    fn map_rows(rows: Vec<UserRow>) -> Vec<User> {
        rows.into_iter()
            .filter_map(|(id, role, subdivision, division, circle, zone)| {
                let role = match role.parse::<UserRole>() {
                    Ok(role) => role,
                    Err(e) => {
                        // A registry row with an unrecognized role is skipped,
                        // not fatal.
                        warn!(user = %id, error = %e, "Skipping user with unknown role");
                        return None;
                    }
                };
                Some(User {
                    id: UserId::new(id),
                    role,
                    assigned_levels: AssignedLevels {
                        subdivision_id: subdivision.map(SubdivisionId::new),
                        division_id: division.map(DivisionId::new),
                        circle_id: circle.map(CircleId::new),
                        zone_id: zone.map(ZoneId::new),
                    },
                })
            })
            .collect()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn users_by_role_and_level(
        &self,
        role: UserRole,
        level: HierarchyLevel,
        level_id: &str,
    ) -> AppResult<Vec<User>> {
        // The column name comes from a closed enum, never from input.
        let query = format!(
            "SELECT id, role, subdivision_id, division_id, circle_id, zone_id \
             FROM users WHERE role = $1 AND {} = $2 ORDER BY id",
            Self::level_column(level)
        );

        let rows: Vec<UserRow> = sqlx::query_as(&query)
            .bind(role.as_str())
            .bind(level_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to query users by level", e)
            })?;

        Ok(Self::map_rows(rows))
    }

    async fn users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, role, subdivision_id, division_id, circle_id, zone_id \
             FROM users WHERE role = $1 ORDER BY id",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to query users by role", e)
        })?;

        Ok(Self::map_rows(rows))
    }
}
