use thiserror::Error;

/// Errors raised by the schedule value types and the search.
///
/// Construction and bounds errors are contract violations: the caller handed in
/// something it should not have. `CapacityExceeded` is the one recoverable signal,
/// consumed locally by the search. `Infeasible` is the normal "no solution" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("room capacity cannot be negative (got {capacity})")]
    InvalidCapacity { capacity: i64 },

    #[error("course enrollment cannot be negative (got {enrollment})")]
    InvalidEnrollment { enrollment: i64 },

    #[error("{what} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("course {course} has not been assigned a room yet")]
    NotYetAssigned { course: usize },

    #[error("course {course} is already assigned to room {room}")]
    AlreadyAssigned { course: usize, room: usize },

    #[error(
        "course {course} ({enrollment} enrolled) does not fit room {room} ({capacity} seats remaining)"
    )]
    CapacityExceeded {
        course: usize,
        room: usize,
        enrollment: u64,
        capacity: u64,
    },

    #[error("no schedule can be created for the given rooms and courses")]
    Infeasible,
}

impl ScheduleError {
    /// True for the room-does-not-fit signal the search prunes on.
    pub fn is_capacity_conflict(&self) -> bool {
        matches!(self, ScheduleError::CapacityExceeded { .. })
    }

    /// True for errors caused by misuse of the API rather than by the input having no solution.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            ScheduleError::CapacityExceeded { .. } | ScheduleError::Infeasible
        )
    }

    pub(crate) fn room_index(index: usize, len: usize) -> Self {
        ScheduleError::IndexOutOfRange {
            what: "room",
            index,
            len,
        }
    }

    pub(crate) fn course_index(index: usize, len: usize) -> Self {
        ScheduleError::IndexOutOfRange {
            what: "course",
            index,
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_conflict_is_not_a_contract_violation() {
        let err = ScheduleError::CapacityExceeded {
            course: 0,
            room: 1,
            enrollment: 20,
            capacity: 10,
        };
        assert!(err.is_capacity_conflict());
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_infeasible_is_not_a_contract_violation() {
        assert!(!ScheduleError::Infeasible.is_contract_violation());
        assert!(!ScheduleError::Infeasible.is_capacity_conflict());
    }

    #[test]
    fn test_bounds_errors_are_contract_violations() {
        let err = ScheduleError::room_index(4, 2);
        assert!(err.is_contract_violation());
        assert_eq!(err.to_string(), "room index 4 is out of range (len 2)");
        assert!(ScheduleError::AlreadyAssigned { course: 0, room: 0 }.is_contract_violation());
        assert!(ScheduleError::InvalidEnrollment { enrollment: -1 }.is_contract_violation());
    }
}
