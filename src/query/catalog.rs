//! Report queries over the gradebook
//!
//! Ten fixed read-only questions:
//! 1. Top students by overall average
//! 2. Best student in a subject
//! 3. Average of one group in a subject
//! 4. Average of every group in a subject
//! 5. Average over all grades
//! 6. Subjects a teacher teaches
//! 7. Students in a group
//! 8. Scores of a group in a subject
//! 9. Average over all of a teacher's subjects
//! 10. Subjects a student has grades in
//!
//! Lookups by a name that matches nothing return an empty list or `None`.

use rusqlite::{Connection, OptionalExtension, Params};
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::model::{Group, Student};
use crate::storage::Session;
use crate::storage::session::{group_at, student_at};

/// Row limit used by the top-students report
pub const TOP_STUDENTS_LIMIT: usize = 5;

/// A student with an average score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    pub student: Student,
    pub average: f64,
}

/// A group with an average score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAverage {
    pub group: Group,
    pub average: f64,
}

/// One grade of one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentScore {
    pub student_name: String,
    pub score: i64,
}

/// The report query catalog
pub struct QueryCatalog<'a> {
    conn: &'a Connection,
}

impl<'a> QueryCatalog<'a> {
    /// Run reports against a store or an open unit of work
    pub fn new<S: Session + ?Sized>(session: &'a S) -> Self {
        Self { conn: session.conn() }
    }

    /// Students with the highest average across all their grades.
    ///
    /// Sorted by average descending, ties by student id. Students without
    /// grades are left out.
    pub fn top_students(&self, limit: usize) -> Result<Vec<StudentAverage>> {
        tracing::debug!(limit, "query: top students");
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.student_id, s.name, s.group_id, AVG(gr.score) AS average
            FROM students s
            JOIN grades gr ON gr.student_id = s.student_id
            GROUP BY s.student_id
            ORDER BY average DESC, s.student_id
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map([limit as i64], student_average)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Student with the highest average in one subject
    pub fn best_student_in_subject(&self, subject: &str) -> Result<Option<StudentAverage>> {
        tracing::debug!(subject, "query: best student in subject");
        self.conn
            .query_row(
                r#"
                SELECT s.student_id, s.name, s.group_id, AVG(gr.score) AS average
                FROM students s
                JOIN grades gr ON gr.student_id = s.student_id
                JOIN subjects sub ON sub.subject_id = gr.subject_id
                WHERE sub.name = ?1
                GROUP BY s.student_id
                ORDER BY average DESC, s.student_id
                LIMIT 1
                "#,
                [subject],
                student_average,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Average score of one group in one subject
    pub fn group_average_in_subject(&self, group: &str, subject: &str) -> Result<Option<f64>> {
        tracing::debug!(group, subject, "query: group average in subject");
        self.average(
            r#"
            SELECT AVG(gr.score)
            FROM grades gr
            JOIN students s ON s.student_id = gr.student_id
            JOIN groups g ON g.group_id = s.group_id
            JOIN subjects sub ON sub.subject_id = gr.subject_id
            WHERE g.name = ?1 AND sub.name = ?2
            "#,
            [group, subject],
        )
    }

    /// Average score in one subject for every group that has grades in it
    pub fn group_averages_in_subject(&self, subject: &str) -> Result<Vec<GroupAverage>> {
        tracing::debug!(subject, "query: group averages in subject");
        let mut stmt = self.conn.prepare(
            r#"
            SELECT g.group_id, g.name, AVG(gr.score) AS average
            FROM groups g
            JOIN students s ON s.group_id = g.group_id
            JOIN grades gr ON gr.student_id = s.student_id
            JOIN subjects sub ON sub.subject_id = gr.subject_id
            WHERE sub.name = ?1
            GROUP BY g.group_id
            ORDER BY g.name, g.group_id
            "#,
        )?;

        let rows = stmt
            .query_map([subject], |row| {
                Ok(GroupAverage {
                    group: group_at(row, 0)?,
                    average: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Average over every grade; `None` when there are no grades
    pub fn overall_average(&self) -> Result<Option<f64>> {
        tracing::debug!("query: overall average");
        self.average("SELECT AVG(score) FROM grades", [])
    }

    /// Names of the subjects taught by a teacher
    pub fn subjects_taught_by(&self, teacher: &str) -> Result<Vec<String>> {
        tracing::debug!(teacher, "query: subjects taught by");
        self.names(
            r#"
            SELECT sub.name
            FROM subjects sub
            JOIN teachers t ON t.teacher_id = sub.teacher_id
            WHERE t.name = ?1
            ORDER BY sub.subject_id
            "#,
            [teacher],
        )
    }

    /// Names of the students in a group
    pub fn students_in_group(&self, group: &str) -> Result<Vec<String>> {
        tracing::debug!(group, "query: students in group");
        self.names(
            r#"
            SELECT s.name
            FROM students s
            JOIN groups g ON g.group_id = s.group_id
            WHERE g.name = ?1
            ORDER BY s.student_id
            "#,
            [group],
        )
    }

    /// Every score the students of a group received in a subject
    pub fn group_scores_in_subject(&self, group: &str, subject: &str) -> Result<Vec<StudentScore>> {
        tracing::debug!(group, subject, "query: group scores in subject");
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.name, gr.score
            FROM grades gr
            JOIN students s ON s.student_id = gr.student_id
            JOIN groups g ON g.group_id = s.group_id
            JOIN subjects sub ON sub.subject_id = gr.subject_id
            WHERE g.name = ?1 AND sub.name = ?2
            ORDER BY gr.grade_id
            "#,
        )?;

        let rows = stmt
            .query_map([group, subject], |row| {
                Ok(StudentScore {
                    student_name: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Average over every grade in every subject a teacher teaches
    pub fn teacher_average(&self, teacher: &str) -> Result<Option<f64>> {
        tracing::debug!(teacher, "query: teacher average");
        self.average(
            r#"
            SELECT AVG(gr.score)
            FROM grades gr
            JOIN subjects sub ON sub.subject_id = gr.subject_id
            JOIN teachers t ON t.teacher_id = sub.teacher_id
            WHERE t.name = ?1
            "#,
            [teacher],
        )
    }

    /// Subjects a student has at least one grade in, each listed once
    pub fn subjects_of_student(&self, student: &str) -> Result<Vec<String>> {
        tracing::debug!(student, "query: subjects of student");
        self.names(
            r#"
            SELECT sub.name
            FROM subjects sub
            WHERE EXISTS (
                SELECT 1
                FROM grades gr
                JOIN students s ON s.student_id = gr.student_id
                WHERE gr.subject_id = sub.subject_id AND s.name = ?1
            )
            ORDER BY sub.subject_id
            "#,
            [student],
        )
    }

    /// Single-column name listing
    fn names<P: Params>(&self, sql: &str, params: P) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names = stmt
            .query_map(params, |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Aggregate query yielding one nullable AVG
    fn average<P: Params>(&self, sql: &str, params: P) -> Result<Option<f64>> {
        let avg: Option<f64> = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(avg)
    }
}

fn student_average(row: &rusqlite::Row) -> rusqlite::Result<StudentAverage> {
    Ok(StudentAverage {
        student: student_at(row, 0)?,
        average: row.get(3)?,
    })
}
