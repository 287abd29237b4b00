//! Persistent schedule state.
//!
//! A [`ScheduleState`] never changes once built. [`ScheduleState::assign`] returns a new state
//! that shares the original room and course tables plus every earlier commit with its parent,
//! so branching the search from one state any number of times is cheap and leaves the parent
//! usable.
//!
//! Committed assignments form a parent-linked log, newest first. A room's current remaining
//! capacity is the capacity recorded by the newest commit that touched it, or the base table
//! entry when no commit did.

use crate::data::{AssignmentView, Course, Room, RoomLoad, ScheduleView};
use crate::error::ScheduleError;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::sync::Arc;

const UNASSIGNED: &str = "Unassigned";

#[derive(Debug)]
struct Commit {
    course: usize,
    room_index: usize,
    /// The room as it stands after this commit.
    room: Room,
    parent: Option<Arc<Commit>>,
}

impl Drop for Commit {
    // Unlink iteratively; the default recursive drop overflows the stack on long logs.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(commit) = next {
            match Arc::try_unwrap(commit) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Rooms, courses and the course-to-room assignment reached so far.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    rooms: Arc<[Room]>,
    courses: Arc<[Course]>,
    head: Option<Arc<Commit>>,
    assigned: usize,
}

impl ScheduleState {
    /// Creates a state with every course unassigned and every room at full capacity.
    pub fn new(rooms: Vec<Room>, courses: Vec<Course>) -> Self {
        Self {
            rooms: rooms.into(),
            courses: courses.into(),
            head: None,
            assigned: 0,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Returns the room at `index` with its current remaining capacity.
    pub fn room_at(&self, index: usize) -> Result<&Room, ScheduleError> {
        let base = self
            .rooms
            .get(index)
            .ok_or_else(|| ScheduleError::room_index(index, self.rooms.len()))?;
        Ok(self
            .commits()
            .find(|c| c.room_index == index)
            .map_or(base, |c| &c.room))
    }

    pub fn course_at(&self, index: usize) -> Result<&Course, ScheduleError> {
        self.courses
            .get(index)
            .ok_or_else(|| ScheduleError::course_index(index, self.courses.len()))
    }

    pub fn is_assigned(&self, course: usize) -> Result<bool, ScheduleError> {
        self.check_course(course)?;
        Ok(self.room_index_of(course).is_some())
    }

    /// Returns the room currently hosting `course`.
    pub fn assigned_room(&self, course: usize) -> Result<&Room, ScheduleError> {
        self.check_course(course)?;
        let room = self
            .room_index_of(course)
            .ok_or(ScheduleError::NotYetAssigned { course })?;
        self.room_at(room)
    }

    pub fn is_complete(&self) -> bool {
        self.assigned == self.courses.len()
    }

    pub fn unassigned_count(&self) -> usize {
        self.courses.len() - self.assigned
    }

    /// Commits `course` to `room`, returning the resulting state.
    ///
    /// `self` is left exactly as it was, whether the commit succeeds or not.
    pub fn assign(&self, course: usize, room: usize) -> Result<ScheduleState, ScheduleError> {
        let enrollment = self.course_at(course)?.enrollment();
        let target = self.room_at(room)?;
        if let Some(existing) = self.room_index_of(course) {
            return Err(ScheduleError::AlreadyAssigned {
                course,
                room: existing,
            });
        }
        if enrollment > target.capacity() {
            return Err(ScheduleError::CapacityExceeded {
                course,
                room,
                enrollment,
                capacity: target.capacity(),
            });
        }

        let reduced = target.reduce_capacity(enrollment)?;
        Ok(Self {
            rooms: Arc::clone(&self.rooms),
            courses: Arc::clone(&self.courses),
            head: Some(Arc::new(Commit {
                course,
                room_index: room,
                room: reduced,
                parent: self.head.clone(),
            })),
            assigned: self.assigned + 1,
        })
    }

    /// Every course in index order, paired with its current room if it has one.
    pub fn assignments(&self) -> Vec<(&Course, Option<&Room>)> {
        let rooms = self.current_rooms();
        self.courses
            .iter()
            .zip(self.assignment_table())
            .map(|(course, slot)| (course, slot.map(|r| rooms[r])))
            .collect()
    }

    /// `"CS300: AG 150, CS400: Unassigned"`: one entry per course in index order.
    pub fn render(&self) -> String {
        self.assignments()
            .into_iter()
            .map(|(course, room)| {
                format!(
                    "{}: {}",
                    course.name(),
                    room.map_or(UNASSIGNED, Room::location)
                )
            })
            .join(", ")
    }

    fn check_course(&self, course: usize) -> Result<(), ScheduleError> {
        if course >= self.courses.len() {
            return Err(ScheduleError::course_index(course, self.courses.len()));
        }
        Ok(())
    }

    fn commits(&self) -> impl Iterator<Item = &Commit> {
        iter::successors(self.head.as_deref(), |c| c.parent.as_deref())
    }

    fn room_index_of(&self, course: usize) -> Option<usize> {
        self.commits()
            .find(|c| c.course == course)
            .map(|c| c.room_index)
    }

    pub(crate) fn assignment_table(&self) -> Vec<Option<usize>> {
        let mut table = vec![None; self.courses.len()];
        for commit in self.commits() {
            table[commit.course] = Some(commit.room_index);
        }
        table
    }

    fn current_rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<Option<&Room>> = vec![None; self.rooms.len()];
        // Newest commit first, so the first one seen per room wins.
        for commit in self.commits() {
            rooms[commit.room_index].get_or_insert(&commit.room);
        }
        rooms
            .into_iter()
            .zip(self.rooms.iter())
            .map(|(current, base)| current.unwrap_or(base))
            .collect()
    }
}

impl PartialEq for ScheduleState {
    fn eq(&self, other: &Self) -> bool {
        self.courses == other.courses
            && self.current_rooms() == other.current_rooms()
            && self.assignment_table() == other.assignment_table()
    }
}

impl Eq for ScheduleState {}

impl fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&ScheduleState> for ScheduleView {
    fn from(state: &ScheduleState) -> Self {
        let rooms = state.current_rooms();
        let table = state.assignment_table();

        let assignments = state
            .courses
            .iter()
            .zip(&table)
            .filter_map(|(course, slot)| {
                slot.map(|r| AssignmentView {
                    course: course.name().to_string(),
                    enrollment: course.enrollment(),
                    room: rooms[r].location().to_string(),
                })
            })
            .collect();

        let mut hosted: HashMap<usize, Vec<String>> = table
            .iter()
            .enumerate()
            .filter_map(|(c, slot)| slot.map(|r| (r, state.courses[c].name().to_string())))
            .into_group_map();

        let loads = rooms
            .iter()
            .enumerate()
            .map(|(r, room)| RoomLoad {
                location: room.location().to_string(),
                remaining_capacity: room.capacity(),
                courses: hosted.remove(&r).unwrap_or_default(),
            })
            .collect();

        ScheduleView {
            assignments,
            rooms: loads,
            summary: state.render(),
        }
    }
}
