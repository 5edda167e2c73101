//! SQL for jobs, organizations and reference tables.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::job::{JobRow, JobStatusRow, LocationRow, OrgRow};

const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.description, j.org_id, o.name AS org_name,
           j.status_id, s.name AS status_name,
           j.location_id, l.name AS location_name,
           j.min_salary, j.max_salary, j.fit_rating, j.match_percentage,
           j.created_at, j.updated_at
    FROM jobs j
    INNER JOIN orgs o ON j.org_id = o.id
    LEFT JOIN job_statuses s ON j.status_id = s.id
    LEFT JOIN locations l ON j.location_id = l.id
"#;

/// Optional filters for the job list. All present filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub status_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    /// Case-insensitive match against title or description.
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub org_id: Uuid,
    pub status_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub fit_rating: Option<i16>,
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub status_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub fit_rating: Option<i16>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub match_percentage: Option<i16>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.status_id.is_none()
            && self.location_id.is_none()
            && self.fit_rating.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.match_percentage.is_none()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocationCount {
    pub location: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalaryStatistics {
    pub average_min_salary: Option<f64>,
    pub average_max_salary: Option<f64>,
    pub lowest_salary: Option<i32>,
    pub highest_salary: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStatistics {
    pub status_distribution: Vec<StatusCount>,
    pub location_distribution: Vec<LocationCount>,
    pub salary_statistics: SalaryStatistics,
}

pub async fn list_jobs(pool: &PgPool, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
    let mut qb = build_job_search(filter);
    qb.build_query_as::<JobRow>().fetch_all(pool).await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(JOB_SELECT);
    qb.push(" WHERE j.id = ").push_bind(job_id);
    qb.build_query_as::<JobRow>().fetch_optional(pool).await
}

pub async fn get_job_description(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT description FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_job(pool: &PgPool, job: &NewJob) -> Result<Uuid, sqlx::Error> {
    let job_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO jobs
            (id, title, description, org_id, status_id, location_id,
             min_salary, max_salary, fit_rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(job_id)
    .bind(job.title.trim())
    .bind(&job.description)
    .bind(job.org_id)
    .bind(job.status_id)
    .bind(job.location_id)
    .bind(job.min_salary)
    .bind(job.max_salary)
    .bind(job.fit_rating)
    .execute(pool)
    .await?;

    info!("Saved job {job_id} ({})", job.title.trim());
    Ok(job_id)
}

/// Returns the number of rows touched (0 when the job does not exist).
pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    update: &JobUpdate,
) -> Result<u64, sqlx::Error> {
    let mut qb = build_job_update(job_id, update);
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn job_statistics(pool: &PgPool) -> Result<JobStatistics, sqlx::Error> {
    let status_distribution = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT COALESCE(s.name, 'Unspecified') AS status, COUNT(*) AS count
        FROM jobs j
        LEFT JOIN job_statuses s ON j.status_id = s.id
        GROUP BY 1
        ORDER BY 2 DESC, 1
        "#,
    )
    .fetch_all(pool)
    .await?;

    let location_distribution = sqlx::query_as::<_, LocationCount>(
        r#"
        SELECT COALESCE(l.name, 'Unspecified') AS location, COUNT(*) AS count
        FROM jobs j
        LEFT JOIN locations l ON j.location_id = l.id
        GROUP BY 1
        ORDER BY 2 DESC, 1
        "#,
    )
    .fetch_all(pool)
    .await?;

    let salary_statistics = sqlx::query_as::<_, SalaryStatistics>(
        r#"
        SELECT AVG(min_salary)::FLOAT8 AS average_min_salary,
               AVG(max_salary)::FLOAT8 AS average_max_salary,
               MIN(min_salary) AS lowest_salary,
               MAX(max_salary) AS highest_salary
        FROM jobs
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(JobStatistics {
        status_distribution,
        location_distribution,
        salary_statistics,
    })
}

pub async fn list_orgs(pool: &PgPool) -> Result<Vec<OrgRow>, sqlx::Error> {
    sqlx::query_as::<_, OrgRow>("SELECT id, name FROM orgs ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

/// Inserts an organization, or returns the id of the existing one with that name.
pub async fn upsert_org(pool: &PgPool, name: &str) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO orgs (id, name) VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn list_locations(pool: &PgPool) -> Result<Vec<LocationRow>, sqlx::Error> {
    sqlx::query_as::<_, LocationRow>("SELECT id, name FROM locations ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn list_statuses(pool: &PgPool) -> Result<Vec<JobStatusRow>, sqlx::Error> {
    sqlx::query_as::<_, JobStatusRow>("SELECT id, name FROM job_statuses ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

fn build_job_search(filter: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(JOB_SELECT);
    qb.push(" WHERE TRUE");

    if let Some(status_id) = filter.status_id {
        qb.push(" AND j.status_id = ").push_bind(status_id);
    }
    if let Some(location_id) = filter.location_id {
        qb.push(" AND j.location_id = ").push_bind(location_id);
    }
    if let Some(min_salary) = filter.min_salary {
        qb.push(" AND j.min_salary >= ").push_bind(min_salary);
    }
    if let Some(max_salary) = filter.max_salary {
        qb.push(" AND j.max_salary <= ").push_bind(max_salary);
    }
    if let Some(keyword) = filter.keyword.as_deref().map(str::trim) {
        if !keyword.is_empty() {
            let pattern = format!("%{}%", escape_like(keyword));
            qb.push(" AND (j.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR j.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    qb.push(" ORDER BY j.updated_at DESC");
    qb
}

fn build_job_update(job_id: Uuid, update: &JobUpdate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET updated_at = now()");

    if let Some(status_id) = update.status_id {
        qb.push(", status_id = ").push_bind(status_id);
    }
    if let Some(location_id) = update.location_id {
        qb.push(", location_id = ").push_bind(location_id);
    }
    if let Some(fit_rating) = update.fit_rating {
        qb.push(", fit_rating = ").push_bind(fit_rating);
    }
    if let Some(min_salary) = update.min_salary {
        qb.push(", min_salary = ").push_bind(min_salary);
    }
    if let Some(max_salary) = update.max_salary {
        qb.push(", max_salary = ").push_bind(max_salary);
    }
    if let Some(match_percentage) = update.match_percentage {
        qb.push(", match_percentage = ").push_bind(match_percentage);
    }

    qb.push(" WHERE id = ").push_bind(job_id);
    qb
}

/// Escapes LIKE wildcards so user input is matched literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
