//! Entity types for the gradebook schema
//!
//! Persisted entities carry their surrogate id; the `New*` payloads are
//! what callers hand to a [`UnitOfWork`](crate::storage::UnitOfWork) and
//! have no id until the store assigns one.
//!
//! - `Group`: a cohort of students
//! - `Student`: belongs to at most one group
//! - `Teacher`: teaches any number of subjects
//! - `Subject`: taught by exactly one teacher
//! - `Grade`: one score for one student in one subject

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cohort of students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// A student, optionally assigned to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// `None` until the student is assigned to a group
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
}

/// A subject and the teacher who teaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
}

/// A single score a student received in a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    /// Not range-checked by the schema; generated data stays within 50..=100
    pub score: i64,
    pub date_received: NaiveDate,
}

// ========== Insert Payloads ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub group_id: Option<i64>,
}

impl NewStudent {
    /// Create an unassigned student
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id: None,
        }
    }

    /// Assign the student to a group
    pub fn in_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub name: String,
}

impl NewTeacher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    pub name: String,
    pub teacher_id: i64,
}

impl NewSubject {
    pub fn new(name: impl Into<String>, teacher_id: i64) -> Self {
        Self {
            name: name.into(),
            teacher_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrade {
    pub student_id: i64,
    pub subject_id: i64,
    pub score: i64,
    pub date_received: NaiveDate,
}

impl NewGrade {
    pub fn new(student_id: i64, subject_id: i64, score: i64, date_received: NaiveDate) -> Self {
        Self {
            student_id,
            subject_id,
            score,
            date_received,
        }
    }
}

// ========== Joined Views ==========

/// A student loaded together with its group in one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithGroup {
    pub student: Student,
    pub group: Option<Group>,
}

/// A subject loaded together with its teacher in one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWithTeacher {
    pub subject: Subject,
    pub teacher: Teacher,
}

/// A grade loaded together with the student and subject it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDetail {
    pub grade: Grade,
    pub student: Student,
    pub subject: Subject,
}
