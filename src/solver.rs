use crate::data::{Course, FindAllOutput, FindOneOutput, Room, ScheduleView, SchedulingInput};
use crate::error::ScheduleError;
use crate::state::ScheduleState;
use log::{debug, info, trace};
use std::time::Instant;

/// Finds the first complete schedule in depth-first order.
///
/// Courses are visited in index order and, for each course, rooms are tried in ascending
/// index order; the first complete state reached wins. Returns
/// [`ScheduleError::Infeasible`] when no assignment fits.
pub fn find_schedule(rooms: &[Room], courses: &[Course]) -> Result<ScheduleState, ScheduleError> {
    let start_time = Instant::now();
    info!(
        "Searching for a schedule with {} courses and {} rooms...",
        courses.len(),
        rooms.len()
    );

    let mut search = Search::default();
    let initial = ScheduleState::new(rooms.to_vec(), courses.to_vec());
    let result = search.first(&initial, 0);

    match &result {
        Ok(_) => info!(
            "Schedule found in {:.2?} after visiting {} states",
            start_time.elapsed(),
            search.visited
        ),
        Err(ScheduleError::Infeasible) => debug!(
            "No schedule exists; visited {} states in {:.2?}",
            search.visited,
            start_time.elapsed()
        ),
        Err(_) => {}
    }
    result
}

/// Collects every complete schedule, in the order a depth-first traversal reaches them.
///
/// An empty vector means no assignment fits. `Err` is only returned for contract
/// violations inside the state, never for infeasibility.
pub fn find_all_schedules(
    rooms: &[Room],
    courses: &[Course],
) -> Result<Vec<ScheduleState>, ScheduleError> {
    let start_time = Instant::now();
    info!(
        "Enumerating all schedules for {} courses and {} rooms...",
        courses.len(),
        rooms.len()
    );

    let mut search = Search::default();
    let mut found = Vec::new();
    let initial = ScheduleState::new(rooms.to_vec(), courses.to_vec());
    search.all(&initial, 0, &mut found)?;

    info!(
        "Found {} schedules in {:.2?} after visiting {} states",
        found.len(),
        start_time.elapsed(),
        search.visited
    );
    Ok(found)
}

/// Validates a wire request and runs the single-schedule search on it.
pub fn solve(input: &SchedulingInput) -> Result<FindOneOutput, ScheduleError> {
    let (rooms, courses) = input.validate()?;
    let schedule = find_schedule(&rooms, &courses)?;
    Ok(FindOneOutput {
        schedule: ScheduleView::from(&schedule),
    })
}

/// Validates a wire request and runs the exhaustive search on it.
pub fn solve_all(input: &SchedulingInput) -> Result<FindAllOutput, ScheduleError> {
    let (rooms, courses) = input.validate()?;
    let schedules: Vec<ScheduleView> = find_all_schedules(&rooms, &courses)?
        .iter()
        .map(ScheduleView::from)
        .collect();
    Ok(FindAllOutput {
        count: schedules.len(),
        schedules,
    })
}

#[derive(Debug, Default)]
struct Search {
    visited: usize,
}

impl Search {
    fn first(
        &mut self,
        state: &ScheduleState,
        course: usize,
    ) -> Result<ScheduleState, ScheduleError> {
        self.visited += 1;

        if course == state.course_count() {
            if state.is_complete() {
                return Ok(state.clone());
            }
            debug!(
                "Reached the last course with {} courses still unassigned",
                state.unassigned_count()
            );
            return Err(ScheduleError::Infeasible);
        }

        if state.is_assigned(course)? {
            return self.first(state, course + 1);
        }

        for room in 0..state.room_count() {
            let Some(next) = Self::try_assign(state, course, room)? else {
                continue;
            };
            match self.first(&next, course + 1) {
                Ok(found) => return Ok(found),
                Err(ScheduleError::Infeasible) => {
                    trace!("Course {course} in room {room} leads nowhere, backtracking");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ScheduleError::Infeasible)
    }

    fn all(
        &mut self,
        state: &ScheduleState,
        course: usize,
        found: &mut Vec<ScheduleState>,
    ) -> Result<(), ScheduleError> {
        self.visited += 1;

        if course == state.course_count() {
            if state.is_complete() {
                found.push(state.clone());
            } else {
                debug!(
                    "Reached the last course with {} courses still unassigned",
                    state.unassigned_count()
                );
            }
            return Ok(());
        }

        if state.is_assigned(course)? {
            return self.all(state, course + 1, found);
        }

        for room in 0..state.room_count() {
            if let Some(next) = Self::try_assign(state, course, room)? {
                self.all(&next, course + 1, found)?;
            }
        }
        Ok(())
    }

    /// Commits `course` to `room`, or `None` if the room cannot seat it.
    fn try_assign(
        state: &ScheduleState,
        course: usize,
        room: usize,
    ) -> Result<Option<ScheduleState>, ScheduleError> {
        match state.assign(course, room) {
            Ok(next) => Ok(Some(next)),
            Err(e) if e.is_capacity_conflict() => {
                trace!("{e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
