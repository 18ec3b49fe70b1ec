//! Read access shared by the store and by open units of work
//!
//! Relations are never followed implicitly. Each fetch method states
//! whether it reads one table, performs a join, or issues a separate
//! round-trip per relation.

use rusqlite::{Connection, OptionalExtension, Row};
use crate::Result;
use crate::model::{
    Grade, GradeDetail, Group, Student, StudentWithGroup, Subject, SubjectWithTeacher, Teacher,
};
use super::schema;
use super::sqlite::DbStats;

const GROUP_COLUMNS: &str = "group_id, name";
const STUDENT_COLUMNS: &str = "student_id, name, group_id";
const TEACHER_COLUMNS: &str = "teacher_id, name";
const SUBJECT_COLUMNS: &str = "subject_id, name, teacher_id";
const GRADE_COLUMNS: &str = "grade_id, student_id, subject_id, score, date_received";

/// Anything that can run read queries against the gradebook.
pub trait Session {
    /// Connection the reads run on
    fn conn(&self) -> &Connection;

    // ========== Single-table reads ==========

    /// Get a group by id
    fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM groups WHERE group_id = ?1");
        Ok(self.conn().query_row(&sql, [id], |row| group_at(row, 0)).optional()?)
    }

    /// Get a student by id
    fn get_student(&self, id: i64) -> Result<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1");
        Ok(self.conn().query_row(&sql, [id], |row| student_at(row, 0)).optional()?)
    }

    /// Get a teacher by id
    fn get_teacher(&self, id: i64) -> Result<Option<Teacher>> {
        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE teacher_id = ?1");
        Ok(self.conn().query_row(&sql, [id], |row| teacher_at(row, 0)).optional()?)
    }

    /// Get a subject by id
    fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = ?1");
        Ok(self.conn().query_row(&sql, [id], |row| subject_at(row, 0)).optional()?)
    }

    /// Get a grade by id
    fn get_grade(&self, id: i64) -> Result<Option<Grade>> {
        let sql = format!("SELECT {GRADE_COLUMNS} FROM grades WHERE grade_id = ?1");
        Ok(self.conn().query_row(&sql, [id], |row| grade_at(row, 0)).optional()?)
    }

    /// First group with this name (lowest id)
    fn find_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE name = ?1 ORDER BY group_id LIMIT 1"
        );
        Ok(self.conn().query_row(&sql, [name], |row| group_at(row, 0)).optional()?)
    }

    /// First student with this name (lowest id)
    fn find_student_by_name(&self, name: &str) -> Result<Option<Student>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE name = ?1 ORDER BY student_id LIMIT 1"
        );
        Ok(self.conn().query_row(&sql, [name], |row| student_at(row, 0)).optional()?)
    }

    /// First teacher with this name (lowest id)
    fn find_teacher_by_name(&self, name: &str) -> Result<Option<Teacher>> {
        let sql = format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE name = ?1 ORDER BY teacher_id LIMIT 1"
        );
        Ok(self.conn().query_row(&sql, [name], |row| teacher_at(row, 0)).optional()?)
    }

    /// First subject with this name (lowest id)
    fn find_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        let sql = format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects WHERE name = ?1 ORDER BY subject_id LIMIT 1"
        );
        Ok(self.conn().query_row(&sql, [name], |row| subject_at(row, 0)).optional()?)
    }

    /// All grades with exactly this score, by id
    fn find_grades_by_score(&self, score: i64) -> Result<Vec<Grade>> {
        let sql = format!("SELECT {GRADE_COLUMNS} FROM grades WHERE score = ?1 ORDER BY grade_id");
        let mut stmt = self.conn().prepare(&sql)?;
        let grades = stmt
            .query_map([score], |row| grade_at(row, 0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(grades)
    }

    // ========== Separate round-trips ==========

    /// Load a student's group with a second query. No query when unassigned.
    fn student_group(&self, student: &Student) -> Result<Option<Group>> {
        match student.group_id {
            Some(group_id) => self.get_group(group_id),
            None => Ok(None),
        }
    }

    /// Load a subject's teacher with a second query
    fn subject_teacher(&self, subject: &Subject) -> Result<Option<Teacher>> {
        self.get_teacher(subject.teacher_id)
    }

    /// Load the student a grade belongs to with a second query
    fn grade_student(&self, grade: &Grade) -> Result<Option<Student>> {
        self.get_student(grade.student_id)
    }

    /// Load the subject a grade was given in with a second query
    fn grade_subject(&self, grade: &Grade) -> Result<Option<Subject>> {
        self.get_subject(grade.subject_id)
    }

    // ========== Joins ==========

    /// First student with this name and its group, in one LEFT JOIN
    fn find_student_with_group(&self, name: &str) -> Result<Option<StudentWithGroup>> {
        self.conn()
            .query_row(
                r#"
                SELECT s.student_id, s.name, s.group_id, g.group_id, g.name
                FROM students s
                LEFT JOIN groups g ON g.group_id = s.group_id
                WHERE s.name = ?1
                ORDER BY s.student_id
                LIMIT 1
                "#,
                [name],
                |row| {
                    let student = student_at(row, 0)?;
                    let group = match row.get::<_, Option<i64>>(3)? {
                        Some(id) => Some(Group { id, name: row.get(4)? }),
                        None => None,
                    };
                    Ok(StudentWithGroup { student, group })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// First subject with this name and its teacher, in one JOIN
    fn find_subject_with_teacher(&self, name: &str) -> Result<Option<SubjectWithTeacher>> {
        self.conn()
            .query_row(
                r#"
                SELECT sub.subject_id, sub.name, sub.teacher_id, t.teacher_id, t.name
                FROM subjects sub
                JOIN teachers t ON t.teacher_id = sub.teacher_id
                WHERE sub.name = ?1
                ORDER BY sub.subject_id
                LIMIT 1
                "#,
                [name],
                |row| {
                    Ok(SubjectWithTeacher {
                        subject: subject_at(row, 0)?,
                        teacher: teacher_at(row, 3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Grades with this score plus their student and subject, in one JOIN
    fn find_grade_details_by_score(&self, score: i64) -> Result<Vec<GradeDetail>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT gr.grade_id, gr.student_id, gr.subject_id, gr.score, gr.date_received,
                   s.student_id, s.name, s.group_id,
                   sub.subject_id, sub.name, sub.teacher_id
            FROM grades gr
            JOIN students s ON s.student_id = gr.student_id
            JOIN subjects sub ON sub.subject_id = gr.subject_id
            WHERE gr.score = ?1
            ORDER BY gr.grade_id
            "#,
        )?;

        let details = stmt
            .query_map([score], |row| {
                Ok(GradeDetail {
                    grade: grade_at(row, 0)?,
                    student: student_at(row, 5)?,
                    subject: subject_at(row, 8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(details)
    }

    // ========== Id listings ==========

    fn group_ids(&self) -> Result<Vec<i64>> {
        query_ids(self.conn(), "SELECT group_id FROM groups ORDER BY group_id")
    }

    fn teacher_ids(&self) -> Result<Vec<i64>> {
        query_ids(self.conn(), "SELECT teacher_id FROM teachers ORDER BY teacher_id")
    }

    fn student_ids(&self) -> Result<Vec<i64>> {
        query_ids(self.conn(), "SELECT student_id FROM students ORDER BY student_id")
    }

    fn subject_ids(&self) -> Result<Vec<i64>> {
        query_ids(self.conn(), "SELECT subject_id FROM subjects ORDER BY subject_id")
    }

    /// Row counts for every table
    fn stats(&self) -> Result<DbStats> {
        let mut counts = [0usize; 5];
        for (count, table) in counts.iter_mut().zip(schema::TABLES) {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let n: i64 = self.conn().query_row(&sql, [], |row| row.get(0))?;
            *count = n as usize;
        }
        let [groups, students, teachers, subjects, grades] = counts;
        Ok(DbStats { groups, students, teachers, subjects, grades })
    }
}

fn query_ids(conn: &Connection, sql: &str) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;
    Ok(ids)
}

// Row mappers read consecutive columns starting at `at`.

pub(crate) fn group_at(row: &Row, at: usize) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(at)?,
        name: row.get(at + 1)?,
    })
}

pub(crate) fn student_at(row: &Row, at: usize) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        group_id: row.get(at + 2)?,
    })
}

pub(crate) fn teacher_at(row: &Row, at: usize) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(at)?,
        name: row.get(at + 1)?,
    })
}

pub(crate) fn subject_at(row: &Row, at: usize) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        teacher_id: row.get(at + 2)?,
    })
}

pub(crate) fn grade_at(row: &Row, at: usize) -> rusqlite::Result<Grade> {
    Ok(Grade {
        id: row.get(at)?,
        student_id: row.get(at + 1)?,
        subject_id: row.get(at + 2)?,
        score: row.get(at + 3)?,
        date_received: row.get(at + 4)?,
    })
}
