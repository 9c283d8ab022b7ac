//! Descriptive task attributes validated at the domain boundary.

use super::{CategoryId, TaskDifficulty, TaskDomainError, TaskPriority};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

const TITLE_LENGTH: RangeInclusive<usize> = 5..=200;
const DESCRIPTION_LENGTH: RangeInclusive<usize> = 10..=2000;

/// Short human-readable task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitleLength`] when the trimmed title
    /// is not between 5 and 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !TITLE_LENGTH.contains(&length) {
            return Err(TaskDomainError::InvalidTitleLength(length));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskTitle> for String {
    fn from(value: TaskTitle) -> Self {
        value.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text description of the work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDescriptionLength`] when the trimmed
    /// description is not between 10 and 2000 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !DESCRIPTION_LENGTH.contains(&length) {
            return Err(TaskDomainError::InvalidDescriptionLength(length));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskDescription> for String {
    fn from(value: TaskDescription) -> Self {
        value.0
    }
}

/// Mean Earth radius used for distance calculations.
pub const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// WGS84 point where the work takes place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = TaskDomainError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCoordinates`] when latitude is outside
    /// `-90..=90`, longitude is outside `-180..=180`, or either is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TaskDomainError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(TaskDomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Returns the haversine distance to `other` in metres.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "haversine needs floating-point trigonometry")]
    pub fn distance_metres(self, other: Self) -> f64 {
        let half_delta_lat = (other.latitude - self.latitude).to_radians() / 2.0;
        let half_delta_lon = (other.longitude - self.longitude).to_radians() / 2.0;
        let chord = half_delta_lat.sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * half_delta_lon.sin().powi(2);
        2.0 * EARTH_RADIUS_METRES * chord.sqrt().min(1.0).asin()
    }
}

/// Descriptive attributes of a task that the lifecycle never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: TaskTitle,
    description: TaskDescription,
    category_id: CategoryId,
    location: Option<GeoPoint>,
    address: Option<String>,
    priority: TaskPriority,
    difficulty: TaskDifficulty,
    required_skills: Vec<String>,
}

impl TaskDetails {
    /// Creates details with required attributes and default priority and
    /// difficulty.
    #[must_use]
    pub const fn new(
        title: TaskTitle,
        description: TaskDescription,
        category_id: CategoryId,
    ) -> Self {
        Self {
            title,
            description,
            category_id,
            location: None,
            address: None,
            priority: TaskPriority::Medium,
            difficulty: TaskDifficulty::Medium,
            required_skills: Vec::new(),
        }
    }

    /// Sets the task location.
    #[must_use]
    pub const fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the street address. Blank addresses are ignored.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        let raw = address.into();
        let trimmed = raw.trim();
        self.address = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: TaskDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the required skills.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySkill`] when any skill is blank.
    pub fn with_required_skills(
        mut self,
        skills: impl IntoIterator<Item = String>,
    ) -> Result<Self, TaskDomainError> {
        self.required_skills = skills
            .into_iter()
            .map(|skill| {
                let trimmed = skill.trim();
                if trimmed.is_empty() {
                    Err(TaskDomainError::EmptySkill)
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    /// Returns the location, if any.
    #[must_use]
    pub const fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Returns the street address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> TaskDifficulty {
        self.difficulty
    }

    /// Returns the required skills.
    #[must_use]
    pub fn required_skills(&self) -> &[String] {
        &self.required_skills
    }
}
