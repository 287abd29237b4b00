use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical room and the number of seats it has left.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room {
    location: String,
    capacity: u64,
}

impl Room {
    /// Creates a room, rejecting negative capacities.
    pub fn new(location: impl Into<String>, capacity: i64) -> Result<Self, ScheduleError> {
        let capacity =
            u64::try_from(capacity).map_err(|_| ScheduleError::InvalidCapacity { capacity })?;
        Ok(Self {
            location: location.into(),
            capacity,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns a copy of this room with `amount` fewer seats.
    ///
    /// Fails with `InvalidCapacity` if the result would go negative; `self` is untouched either way.
    pub fn reduce_capacity(&self, amount: u64) -> Result<Self, ScheduleError> {
        match self.capacity.checked_sub(amount) {
            Some(capacity) => Ok(Self {
                location: self.location.clone(),
                capacity,
            }),
            None => {
                let shortfall = amount - self.capacity;
                Err(ScheduleError::InvalidCapacity {
                    capacity: -i64::try_from(shortfall).unwrap_or(i64::MAX),
                })
            }
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (cap {})", self.location, self.capacity)
    }
}

/// A course and the number of students sitting its exam.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Course {
    name: String,
    enrollment: u64,
}

impl Course {
    /// Creates a course, rejecting negative enrollments.
    pub fn new(name: impl Into<String>, enrollment: i64) -> Result<Self, ScheduleError> {
        let enrollment = u64::try_from(enrollment)
            .map_err(|_| ScheduleError::InvalidEnrollment { enrollment })?;
        Ok(Self {
            name: name.into(),
            enrollment,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enrollment(&self) -> u64 {
        self.enrollment
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} enrolled)", self.name, self.enrollment)
    }
}

/// A room as it arrives over the wire, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomInput {
    pub location: String,
    pub capacity: i64,
}

/// A course as it arrives over the wire, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseInput {
    pub name: String,
    pub enrollment: i64,
}

/// The complete input for a scheduling request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub rooms: Vec<RoomInput>,
    pub courses: Vec<CourseInput>,
}

impl SchedulingInput {
    /// Validates every entry, reporting the first one that breaks a construction invariant.
    pub fn validate(&self) -> Result<(Vec<Room>, Vec<Course>), ScheduleError> {
        let rooms = self
            .rooms
            .iter()
            .map(|r| Room::new(r.location.clone(), r.capacity))
            .collect::<Result<Vec<_>, _>>()?;
        let courses = self
            .courses
            .iter()
            .map(|c| Course::new(c.name.clone(), c.enrollment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rooms, courses))
    }
}

/// One course placed in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentView {
    pub course: String,
    pub enrollment: u64,
    pub room: String,
}

/// A room after the search, with the courses it ended up hosting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLoad {
    pub location: String,
    pub remaining_capacity: u64,
    pub courses: Vec<String>,
}

/// A complete schedule as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleView {
    pub assignments: Vec<AssignmentView>,
    pub rooms: Vec<RoomLoad>,
    pub summary: String,
}

/// Output of the single-schedule search.
#[derive(Debug, Clone, Serialize)]
pub struct FindOneOutput {
    pub schedule: ScheduleView,
}

/// Output of the exhaustive search.
#[derive(Debug, Clone, Serialize)]
pub struct FindAllOutput {
    pub count: usize,
    pub schedules: Vec<ScheduleView>,
}
