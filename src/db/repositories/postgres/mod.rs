//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//! The schema (courses, course_modules, enrollments, lectures) is owned by
//! the surrounding application; this backend only reads and writes it.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Transactional batch lecture creation (all-or-nothing confirm)
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task;

use crate::api::{CourseId, FacultyId, LectureId, StudentId};
use crate::db::repository::{
    CourseRepository, EnrollmentRepository, ErrorContext, FullRepository, LectureRepository,
    RepositoryError, RepositoryResult,
};
use crate::models::{
    Course, CourseModule, Enrollment, Lecture, LectureStatus, NewLecture,
};

mod models;
mod schema;

use models::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository backed by a connection pool.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Execute a database operation with automatic retry for transient
    /// failures (connection errors, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics for monitoring.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl CourseRepository for PostgresRepository {
    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course> {
        let raw_id = id.value();
        let row = self
            .with_conn(move |conn| {
                schema::courses::table
                    .find(raw_id)
                    .first::<CourseRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;

        match row {
            Some(row) => Course::try_from(row),
            None => Err(RepositoryError::not_found_with_context(
                format!("Course {} not found", id),
                ErrorContext::new("get_course")
                    .with_entity("course")
                    .with_entity_id(id),
            )),
        }
    }

    async fn store_course(&self, course: &Course) -> RepositoryResult<Course> {
        let course = course.clone();
        let row = self
            .with_conn(move |conn| {
                use schema::courses;

                match course.id {
                    Some(id) => diesel::update(courses::table.find(id.value()))
                        .set((
                            courses::code.eq(course.code.clone()),
                            courses::title.eq(course.title.clone()),
                            courses::credits.eq(course.credits),
                            courses::year.eq(course.year),
                            courses::semester.eq(course.semester.to_string()),
                        ))
                        .get_result::<CourseRow>(conn)
                        .map_err(RepositoryError::from),
                    None => diesel::insert_into(courses::table)
                        .values(NewCourseRow::from(&course))
                        .get_result::<CourseRow>(conn)
                        .map_err(RepositoryError::from),
                }
            })
            .await?;
        Course::try_from(row)
    }

    async fn list_modules(&self, course_id: CourseId) -> RepositoryResult<Vec<CourseModule>> {
        let raw_id = course_id.value();
        let rows = self
            .with_conn(move |conn| {
                use schema::course_modules;

                course_modules::table
                    .filter(course_modules::course_id.eq(raw_id))
                    .order(course_modules::sequence.asc())
                    .load::<CourseModuleRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(rows.into_iter().map(CourseModule::from).collect())
    }

    async fn store_module(&self, module: &CourseModule) -> RepositoryResult<CourseModule> {
        let module = module.clone();
        let row = self
            .with_conn(move |conn| {
                use schema::course_modules;

                match module.id {
                    Some(id) => diesel::update(course_modules::table.find(id.value()))
                        .set((
                            course_modules::sequence.eq(module.sequence),
                            course_modules::title.eq(module.title.clone()),
                            course_modules::duration_weeks.eq(module.duration_weeks),
                        ))
                        .get_result::<CourseModuleRow>(conn)
                        .map_err(RepositoryError::from),
                    None => diesel::insert_into(course_modules::table)
                        .values(NewCourseModuleRow::from(&module))
                        .get_result::<CourseModuleRow>(conn)
                        .map_err(RepositoryError::from),
                }
            })
            .await?;
        Ok(CourseModule::from(row))
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresRepository {
    async fn students_in_course(&self, course_id: CourseId) -> RepositoryResult<Vec<StudentId>> {
        let raw_id = course_id.value();
        let ids = self
            .with_conn(move |conn| {
                use schema::enrollments;

                enrollments::table
                    .filter(enrollments::course_id.eq(raw_id))
                    .filter(enrollments::active.eq(true))
                    .select(enrollments::student_id)
                    .load::<i64>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(ids.into_iter().map(StudentId::new).collect())
    }

    async fn record_enrollment(&self, enrollment: &Enrollment) -> RepositoryResult<()> {
        let row = EnrollmentRow::from(enrollment);
        self.with_conn(move |conn| {
            use schema::enrollments;

            diesel::insert_into(enrollments::table)
                .values(row.clone())
                .on_conflict((enrollments::course_id, enrollments::student_id))
                .do_update()
                .set(enrollments::active.eq(row.active))
                .execute(conn)
                .map_err(RepositoryError::from)
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LectureRepository for PostgresRepository {
    async fn get_lecture(&self, id: LectureId) -> RepositoryResult<Lecture> {
        let raw_id = id.value();
        let row = self
            .with_conn(move |conn| {
                schema::lectures::table
                    .find(raw_id)
                    .first::<LectureRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;

        match row {
            Some(row) => Lecture::try_from(row),
            None => Err(RepositoryError::not_found_with_context(
                format!("Lecture {} not found", id),
                ErrorContext::new("get_lecture")
                    .with_entity("lecture")
                    .with_entity_id(id),
            )),
        }
    }

    async fn lectures_on_date(&self, date: chrono::NaiveDate) -> RepositoryResult<Vec<Lecture>> {
        let rows = self
            .with_conn(move |conn| {
                use schema::lectures;

                lectures::table
                    .filter(lectures::date.eq(date))
                    .filter(lectures::status.ne(LectureStatus::Cancelled.to_string()))
                    .order(lectures::start_time.asc())
                    .load::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Lecture::try_from).collect()
    }

    async fn lectures_for_course(&self, course_id: CourseId) -> RepositoryResult<Vec<Lecture>> {
        let raw_id = course_id.value();
        let rows = self
            .with_conn(move |conn| {
                use schema::lectures;

                lectures::table
                    .filter(lectures::course_id.eq(raw_id))
                    .order((lectures::date.asc(), lectures::start_time.asc()))
                    .load::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Lecture::try_from).collect()
    }

    async fn lectures_for_instructor(
        &self,
        faculty_id: FacultyId,
        date: chrono::NaiveDate,
    ) -> RepositoryResult<Vec<Lecture>> {
        let raw_id = faculty_id.value();
        let rows = self
            .with_conn(move |conn| {
                use schema::lectures;

                lectures::table
                    .filter(lectures::faculty_id.eq(raw_id))
                    .filter(lectures::date.eq(date))
                    .filter(lectures::status.ne(LectureStatus::Cancelled.to_string()))
                    .order(lectures::start_time.asc())
                    .load::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Lecture::try_from).collect()
    }

    async fn create_lecture(&self, lecture: &NewLecture) -> RepositoryResult<Lecture> {
        let row = NewLectureRow::from(lecture);
        let stored = self
            .with_conn(move |conn| {
                diesel::insert_into(schema::lectures::table)
                    .values(row.clone())
                    .get_result::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Lecture::try_from(stored)
    }

    async fn create_lectures(&self, lectures: &[NewLecture]) -> RepositoryResult<Vec<Lecture>> {
        let rows: Vec<NewLectureRow> = lectures.iter().map(NewLectureRow::from).collect();
        let stored = self
            .with_conn(move |conn| {
                // Single transaction: any failed insert rolls the batch back.
                conn.transaction::<Vec<LectureRow>, RepositoryError, _>(|conn| {
                    let mut created = Vec::with_capacity(rows.len());
                    for row in &rows {
                        let stored = diesel::insert_into(schema::lectures::table)
                            .values(row.clone())
                            .get_result::<LectureRow>(conn)?;
                        created.push(stored);
                    }
                    Ok(created)
                })
            })
            .await?;
        stored.into_iter().map(Lecture::try_from).collect()
    }

    async fn update_lecture(&self, lecture: &Lecture) -> RepositoryResult<Lecture> {
        let lecture = lecture.clone();
        let row = self
            .with_conn(move |conn| {
                use schema::lectures;

                diesel::update(lectures::table.find(lecture.id.value()))
                    .set((
                        lectures::course_id.eq(lecture.course_id.value()),
                        lectures::module_id.eq(lecture.module_id.map(|m| m.value())),
                        lectures::date.eq(lecture.date),
                        lectures::start_time.eq(lecture.start_time),
                        lectures::end_time.eq(lecture.end_time),
                        lectures::mode.eq(lecture.mode.to_string()),
                        lectures::location.eq(lecture.location.clone()),
                        lectures::meeting_link.eq(lecture.meeting_link.clone()),
                        lectures::topic.eq(lecture.topic.clone()),
                        lectures::faculty_id.eq(lecture.faculty_id.value()),
                        lectures::week_number.eq(lecture.week_number),
                        lectures::status.eq(lecture.status.to_string()),
                    ))
                    .get_result::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Lecture::try_from(row)
    }

    async fn set_lecture_status(
        &self,
        id: LectureId,
        status: LectureStatus,
    ) -> RepositoryResult<Lecture> {
        let raw_id = id.value();
        let status_str = status.to_string();
        let row = self
            .with_conn(move |conn| {
                use schema::lectures;

                diesel::update(lectures::table.find(raw_id))
                    .set(lectures::status.eq(status_str.clone()))
                    .get_result::<LectureRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Lecture::try_from(row)
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(RepositoryError::from)
        })
        .await
        .map(|_| true)
    }
}
