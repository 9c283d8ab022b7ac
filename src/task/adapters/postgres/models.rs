//! Diesel row models for volunteer task persistence.

use super::schema::volunteer_tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = volunteer_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub created_by: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub priority: String,
    pub difficulty: String,
    pub required_skills: Value,
    pub status: String,
    pub max_volunteers: i32,
    pub current_volunteers: i32,
    pub assigned_to: Option<String>,
    pub estimated_hours_centi: Option<i32>,
    pub actual_hours_centi: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = volunteer_tasks)]
pub struct NewTaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub created_by: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub priority: String,
    pub difficulty: String,
    pub required_skills: Value,
    pub status: String,
    pub max_volunteers: i32,
    pub current_volunteers: i32,
    pub assigned_to: Option<String>,
    pub estimated_hours_centi: Option<i32>,
    pub actual_hours_centi: Option<i32>,
    pub deadline: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// Lifecycle columns written by a versioned save.
///
/// Descriptive columns never change after insert.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = volunteer_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskLifecycleChangeset {
    pub status: String,
    pub current_volunteers: i32,
    pub assigned_to: Option<String>,
    pub actual_hours_centi: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}
