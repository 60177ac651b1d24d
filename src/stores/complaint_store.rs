use crate::core::error::StoreError;
use crate::models::complaint::{Complaint, NewComplaint, Priority, Status};
use crate::models::views::{DashboardStats, Series};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

const COMPLAINT_COLUMNS: &str = "id, text, category, priority, status, location, user_id";

#[derive(FromRow)]
struct ComplaintRow {
    id: i64,
    text: String,
    category: String,
    priority: String,
    status: String,
    location: String,
    user_id: i64,
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = StoreError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        Ok(Complaint {
            id: row.id,
            text: row.text,
            category: row.category,
            priority: row.priority.parse::<Priority>()?,
            status: row.status.parse::<Status>()?,
            location: row.location,
            user_id: row.user_id,
        })
    }
}

fn into_complaints(rows: Vec<ComplaintRow>) -> Result<Vec<Complaint>, StoreError> {
    rows.into_iter().map(Complaint::try_from).collect()
}

/// Complaints table access. Every write runs in its own transaction.
pub struct ComplaintStore {
    pool: SqlitePool,
}

impl ComplaintStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, complaint: &NewComplaint) -> Result<Complaint, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            r#"
            INSERT INTO complaints (text, category, priority, status, location, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(&complaint.text)
        .bind(&complaint.category)
        .bind(complaint.priority.as_str())
        .bind(Status::default().as_str())
        .bind(&complaint.location)
        .bind(complaint.user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Complaint>, StoreError> {
        sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Complaint::try_from)
        .transpose()
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Complaint>, StoreError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_complaints(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<Complaint>, StoreError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_complaints(rows)
    }

    /// Delete `id` only if `user_id` owns it. Returns whether a row went away.
    pub async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM complaints WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete `id` only while its status is Resolved. Returns whether a row went away.
    pub async fn delete_if_resolved(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM complaints WHERE id = ? AND status = ?")
            .bind(id)
            .bind(Status::Resolved.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no complaint has this id
    pub async fn update_status(&self, id: i64, status: Status) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE complaints SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Dashboard aggregates: totals plus grouped counts by category, priority and status
    pub async fn stats(&self) -> Result<DashboardStats, StoreError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM complaints")
            .fetch_one(&self.pool)
            .await?;

        let categories = self
            .grouped_counts("SELECT category, COUNT(*) FROM complaints GROUP BY category ORDER BY category")
            .await?;
        let priorities = self
            .grouped_counts("SELECT priority, COUNT(*) FROM complaints GROUP BY priority ORDER BY priority")
            .await?;
        let statuses = self
            .grouped_counts("SELECT status, COUNT(*) FROM complaints GROUP BY status ORDER BY status")
            .await?;

        Ok(DashboardStats {
            total,
            pending: statuses.get(Status::Pending.as_str()),
            in_progress: statuses.get(Status::InProgress.as_str()),
            resolved: statuses.get(Status::Resolved.as_str()),
            categories,
            priorities,
            statuses,
        })
    }

    async fn grouped_counts(&self, sql: &'static str) -> Result<Series, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }
}
