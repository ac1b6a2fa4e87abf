//! Demo data seeding.
//!
//! Creates departments, one approver per department, one clearance item per
//! department and a batch of students with fake names. Everything is
//! inserted in a single transaction.

use std::time::Instant;

use anyhow::anyhow;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::{PgPool, Postgres, Transaction};

use clearance_core::hash_password;
use clearance_models::{DepartmentId, StaffUserId, roles};

/// Password given to every seeded approver account.
pub const DEFAULT_PASSWORD: &str = "password123";

const DEPARTMENTS: &[(&str, &str)] = &[
    ("LIB", "Library"),
    ("BUR", "Bursary"),
    ("SAF", "Student Affairs"),
    ("HST", "Hostel"),
    ("SPT", "Sports"),
    ("FAC", "Faculty Office"),
];

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub departments: usize,
    pub students: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            departments: 3,
            students: 25,
        }
    }
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub departments: usize,
    pub approvers: usize,
    pub items: usize,
    pub students: usize,
}

pub async fn seed_all(pool: &PgPool, config: SeedConfig) -> anyhow::Result<SeedSummary> {
    let start = Instant::now();
    let password_hash = hash_password(DEFAULT_PASSWORD).map_err(|e| anyhow!(e.message()))?;
    let departments = &DEPARTMENTS[..config.departments.min(DEPARTMENTS.len())];

    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();
    let mut department_ids = Vec::with_capacity(departments.len());

    for (sequence, (code, name)) in departments.iter().enumerate() {
        let department_id = insert_department(&mut tx, name).await?;
        let approver_id = insert_approver(&mut tx, code, name, &password_hash).await?;
        insert_item(&mut tx, code, name, department_id, approver_id, sequence as i32).await?;

        department_ids.push(department_id);
        summary.departments += 1;
        summary.approvers += 1;
        summary.items += 1;
    }

    if !department_ids.is_empty() {
        for n in 0..config.students {
            let department_id = department_ids[n % department_ids.len()];
            insert_student(&mut tx, n, department_id).await?;
            summary.students += 1;
        }
    }

    tx.commit().await?;

    println!(
        "✅ Seeded {} departments, {} approvers, {} items, {} students in {:.2?}",
        summary.departments,
        summary.approvers,
        summary.items,
        summary.students,
        start.elapsed()
    );

    Ok(summary)
}

async fn insert_department(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> anyhow::Result<DepartmentId> {
    let id = sqlx::query_scalar::<_, DepartmentId>(
        r#"INSERT INTO departments (name) VALUES ($1)
           ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
           RETURNING id"#,
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

async fn insert_approver(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    department: &str,
    password_hash: &str,
) -> anyhow::Result<StaffUserId> {
    let id = sqlx::query_scalar::<_, StaffUserId>(
        r#"INSERT INTO staff_users (username, full_name, password_hash, role_id)
           SELECT $1, $2, $3, r.id FROM roles r WHERE r.name = $4
           ON CONFLICT (username) DO UPDATE SET full_name = EXCLUDED.full_name
           RETURNING id"#,
    )
    .bind(format!("{}.approver", code.to_lowercase()))
    .bind(format!("{department} Approver"))
    .bind(password_hash)
    .bind(roles::STAFF)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

async fn insert_item(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    department: &str,
    department_id: DepartmentId,
    approver_id: StaffUserId,
    sequence: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"INSERT INTO clearance_items
               (code, title, description, department_id, approver_staff_id, sequence)
           VALUES ($1, $2, $3, $4, $5, $6)
           ON CONFLICT (code) DO NOTHING"#,
    )
    .bind(code)
    .bind(format!("{department} Clearance"))
    .bind(format!("No outstanding obligations with the {department}"))
    .bind(department_id)
    .bind(approver_id)
    .bind(sequence)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_student(
    tx: &mut Transaction<'_, Postgres>,
    n: usize,
    department_id: DepartmentId,
) -> anyhow::Result<()> {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    sqlx::query(
        r#"INSERT INTO students (student_number, full_name, department_id)
           VALUES ($1, $2, $3)
           ON CONFLICT (student_number) DO NOTHING"#,
    )
    .bind(format!("STU{:05}", n + 1))
    .bind(format!("{first_name} {last_name}"))
    .bind(department_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
