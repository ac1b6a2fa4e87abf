//! Staff and session administration.

use anyhow::{anyhow, bail};
use sqlx::PgPool;

use clearance_core::hash_password;
use clearance_models::{ClearanceSession, SessionId, StaffUser, roles};

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Creates a staff account with the given role (`admin` or `staff`).
pub async fn create_staff_user(
    pool: &PgPool,
    username: &str,
    full_name: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<StaffUser> {
    if !roles::STAFF_ROLES.contains(&role) {
        bail!(
            "unknown role '{}', expected one of: {}",
            role,
            roles::STAFF_ROLES.join(", ")
        );
    }

    let password_hash = hash_password(password).map_err(|e| anyhow!(e.message()))?;

    let user = sqlx::query_as::<_, StaffUser>(
        r#"INSERT INTO staff_users (username, full_name, password_hash, role_id)
           SELECT $1, $2, $3, r.id FROM roles r WHERE r.name = $4
           RETURNING id, username, full_name, role_id, created_at"#,
    )
    .bind(username)
    .bind(full_name)
    .bind(&password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return anyhow!("username '{}' is already taken", username);
        }
        anyhow::Error::from(e)
    })?;

    user.ok_or_else(|| anyhow!("role '{}' is missing from the roles table", role))
}

/// Creates a session. With `activate`, any currently active session is
/// deactivated in the same transaction.
pub async fn create_session(
    pool: &PgPool,
    name: &str,
    activate: bool,
) -> anyhow::Result<ClearanceSession> {
    let mut tx = pool.begin().await?;

    if activate {
        sqlx::query("UPDATE clearance_sessions SET is_active = FALSE WHERE is_active")
            .execute(&mut *tx)
            .await?;
    }

    let session = sqlx::query_as::<_, ClearanceSession>(
        r#"INSERT INTO clearance_sessions (name, is_active)
           VALUES ($1, $2)
           RETURNING id, name, is_active, created_at"#,
    )
    .bind(name)
    .bind(activate)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return anyhow!("session '{}' already exists", name);
        }
        anyhow::Error::from(e)
    })?;

    tx.commit().await?;
    Ok(session)
}

/// Makes `id` the single active session.
pub async fn activate_session(pool: &PgPool, id: SessionId) -> anyhow::Result<ClearanceSession> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE clearance_sessions SET is_active = FALSE WHERE is_active AND id <> $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let session = sqlx::query_as::<_, ClearanceSession>(
        r#"UPDATE clearance_sessions SET is_active = TRUE
           WHERE id = $1
           RETURNING id, name, is_active, created_at"#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| anyhow!("clearance session {} not found", id))?;

    tx.commit().await?;
    Ok(session)
}

pub async fn list_sessions(pool: &PgPool) -> anyhow::Result<Vec<ClearanceSession>> {
    let sessions = sqlx::query_as::<_, ClearanceSession>(
        "SELECT id, name, is_active, created_at FROM clearance_sessions ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}
