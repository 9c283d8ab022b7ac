//! Query objects for listing tasks.

use crate::task::domain::{
    CategoryId, GeoPoint, TaskDifficulty, TaskPriority, TaskStatus, UserId, VolunteerTask,
};
use chrono::{DateTime, Utc};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// One-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Creates a page selector. The number is raised to at least 1 and the
    /// size is clamped to `1..=100`.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Search radius applied when a listing is centred on a point without an
/// explicit radius.
pub const DEFAULT_RADIUS_METRES: u32 = 10_000;

/// Circle around a point that task locations must fall within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Centre of the search.
    pub centre: GeoPoint,
    /// Inclusive radius in metres.
    pub radius_metres: u32,
}

impl Proximity {
    /// Returns `true` when `point` lies within the radius.
    #[must_use]
    pub fn contains(self, point: GeoPoint) -> bool {
        self.centre.distance_metres(point) <= f64::from(self.radius_metres)
    }
}

/// Filter and page selection for task listings.
///
/// Unset filters match every task. A proximity filter excludes tasks without
/// a location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this difficulty.
    pub difficulty: Option<TaskDifficulty>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only tasks in this category.
    pub category_id: Option<CategoryId>,
    /// Only tasks created by this user.
    pub created_by: Option<UserId>,
    /// Only tasks assigned to this user.
    pub assigned_to: Option<UserId>,
    /// Only tasks accepting assignments at this instant.
    pub accepting_at: Option<DateTime<Utc>>,
    /// Only tasks located within this circle.
    pub near: Option<Proximity>,
    /// Page to return.
    pub page: Page,
}

impl TaskQuery {
    /// Creates a query matching every task, first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to a difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: TaskDifficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Restricts results to a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts results to a category.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restricts results to tasks created by a user.
    #[must_use]
    pub fn created_by(mut self, user_id: UserId) -> Self {
        self.created_by = Some(user_id);
        self
    }

    /// Restricts results to tasks assigned to a user.
    #[must_use]
    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    /// Restricts results to tasks accepting assignments at `now`.
    #[must_use]
    pub const fn accepting_at(mut self, now: DateTime<Utc>) -> Self {
        self.accepting_at = Some(now);
        self
    }

    /// Restricts results to tasks within `radius_metres` of `centre`.
    #[must_use]
    pub const fn near(mut self, centre: GeoPoint, radius_metres: u32) -> Self {
        self.near = Some(Proximity {
            centre,
            radius_metres,
        });
        self
    }

    /// Selects the page to return.
    #[must_use]
    pub const fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Returns `true` when `task` passes every filter.
    #[must_use]
    pub fn matches(&self, task: &VolunteerTask) -> bool {
        let details = task.details();
        self.status.is_none_or(|status| task.status() == status)
            && self.difficulty.is_none_or(|difficulty| details.difficulty() == difficulty)
            && self.priority.is_none_or(|priority| details.priority() == priority)
            && self
                .category_id
                .as_ref()
                .is_none_or(|category| details.category_id() == category)
            && self
                .created_by
                .as_ref()
                .is_none_or(|creator| task.created_by() == creator)
            && self
                .assigned_to
                .as_ref()
                .is_none_or(|assignee| task.assigned_to() == Some(assignee))
            && self
                .accepting_at
                .is_none_or(|now| task.is_accepting_assignments(now))
            && self.near.is_none_or(|near| {
                details
                    .location()
                    .is_some_and(|location| near.contains(location))
            })
    }
}

/// One page of listed tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPage {
    /// Tasks on this page, newest first.
    pub tasks: Vec<VolunteerTask>,
    /// Number of tasks matching the filters across all pages.
    pub total_items: u64,
    /// Page that was returned.
    pub page: Page,
}

impl TaskPage {
    /// Returns the number of pages needed for all matching tasks.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.page.size()))
    }
}
