//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, Transaction, params};
use crate::Result;
use crate::model::{
    Grade, Group, NewGrade, NewGroup, NewStudent, NewSubject, NewTeacher, Student, Subject, Teacher,
};
use super::{migrations, schema};
use super::session::Session;

/// SQLite-backed storage handle for the gradebook.
///
/// Construct once and pass it to whatever needs the database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an existing database file for reading only.
    ///
    /// Fails instead of creating the file when it does not exist.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::from_connection(Connection::open_with_flags(path, flags)?)
    }

    /// Open an isolated in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Create every table and index. Safe to call when they already exist.
    pub fn create_tables(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::debug!("Schema tables ensured");
        Ok(())
    }

    /// Apply pending migrations up to head, returning the ids applied now
    pub fn migrate(&mut self) -> Result<Vec<&'static str>> {
        migrations::apply_migrations(&mut self.conn)
    }

    /// Migration ids already recorded in this database
    pub fn applied_migrations(&self) -> Result<Vec<String>> {
        migrations::applied_migrations(&self.conn)
    }

    /// Embedded migrations this database has not applied yet
    pub fn pending_migrations(&self) -> Result<Vec<&'static str>> {
        migrations::pending_migrations(&self.conn)
    }

    /// Begin a unit of work.
    ///
    /// Writes become durable only on [`UnitOfWork::commit`]; dropping the
    /// unit without committing discards them.
    pub fn unit_of_work(&mut self) -> Result<UnitOfWork<'_>> {
        Ok(UnitOfWork {
            tx: self.conn.transaction()?,
        })
    }
}

impl Session for SqliteStore {
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// A scoped transaction in which entities are inserted and then committed
/// together.
pub struct UnitOfWork<'a> {
    tx: Transaction<'a>,
}

impl UnitOfWork<'_> {
    pub fn add_group(&self, group: &NewGroup) -> Result<Group> {
        self.tx.execute("INSERT INTO groups (name) VALUES (?1)", [&group.name])?;
        Ok(Group {
            id: self.tx.last_insert_rowid(),
            name: group.name.clone(),
        })
    }

    pub fn add_teacher(&self, teacher: &NewTeacher) -> Result<Teacher> {
        self.tx.execute("INSERT INTO teachers (name) VALUES (?1)", [&teacher.name])?;
        Ok(Teacher {
            id: self.tx.last_insert_rowid(),
            name: teacher.name.clone(),
        })
    }

    /// Insert a subject; the teacher must already exist
    pub fn add_subject(&self, subject: &NewSubject) -> Result<Subject> {
        self.tx.execute(
            "INSERT INTO subjects (name, teacher_id) VALUES (?1, ?2)",
            params![subject.name, subject.teacher_id],
        )?;
        Ok(Subject {
            id: self.tx.last_insert_rowid(),
            name: subject.name.clone(),
            teacher_id: subject.teacher_id,
        })
    }

    /// Insert a student; the group, if given, must already exist
    pub fn add_student(&self, student: &NewStudent) -> Result<Student> {
        self.tx.execute(
            "INSERT INTO students (name, group_id) VALUES (?1, ?2)",
            params![student.name, student.group_id],
        )?;
        Ok(Student {
            id: self.tx.last_insert_rowid(),
            name: student.name.clone(),
            group_id: student.group_id,
        })
    }

    /// Insert a grade; the student and subject must already exist
    pub fn add_grade(&self, grade: &NewGrade) -> Result<Grade> {
        self.tx.execute(
            r#"
            INSERT INTO grades (student_id, subject_id, score, date_received)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![grade.student_id, grade.subject_id, grade.score, grade.date_received],
        )?;
        Ok(Grade {
            id: self.tx.last_insert_rowid(),
            student_id: grade.student_id,
            subject_id: grade.subject_id,
            score: grade.score,
            date_received: grade.date_received,
        })
    }

    /// Make every staged write durable
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    /// Discard every staged write
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

impl Session for UnitOfWork<'_> {
    fn conn(&self) -> &Connection {
        &self.tx
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub groups: usize,
    pub students: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub grades: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_tables().unwrap();
        store
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
    }

    #[test]
    fn test_group_model() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let created = uow.add_group(&NewGroup::new("Test Group")).unwrap();
        uow.commit().unwrap();

        let result = store.find_group_by_name("Test Group").unwrap().unwrap();
        assert_eq!(result.name, "Test Group");
        assert_eq!(store.get_group(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_student_model() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let group = uow.add_group(&NewGroup::new("Test Group")).unwrap();
        uow.add_student(&NewStudent::new("Test Student").in_group(group.id)).unwrap();
        uow.commit().unwrap();

        let joined = store.find_student_with_group("Test Student").unwrap().unwrap();
        assert_eq!(joined.student.name, "Test Student");
        assert_eq!(joined.group.as_ref().map(|g| g.name.as_str()), Some("Test Group"));

        let student = store.find_student_by_name("Test Student").unwrap().unwrap();
        let group = store.student_group(&student).unwrap().unwrap();
        assert_eq!(group.name, "Test Group");
    }

    #[test]
    fn test_unassigned_student_has_no_group() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        uow.add_student(&NewStudent::new("Loner")).unwrap();
        uow.commit().unwrap();

        let joined = store.find_student_with_group("Loner").unwrap().unwrap();
        assert_eq!(joined.student.group_id, None);
        assert!(joined.group.is_none());
        assert!(store.student_group(&joined.student).unwrap().is_none());
    }

    #[test]
    fn test_teacher_model() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        uow.add_teacher(&NewTeacher::new("Test Teacher")).unwrap();
        uow.commit().unwrap();

        let result = store.find_teacher_by_name("Test Teacher").unwrap().unwrap();
        assert_eq!(result.name, "Test Teacher");
    }

    #[test]
    fn test_subject_model() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let teacher = uow.add_teacher(&NewTeacher::new("Test Teacher")).unwrap();
        uow.add_subject(&NewSubject::new("Test Subject", teacher.id)).unwrap();
        uow.commit().unwrap();

        let joined = store.find_subject_with_teacher("Test Subject").unwrap().unwrap();
        assert_eq!(joined.subject.name, "Test Subject");
        assert_eq!(joined.teacher.name, "Test Teacher");

        let subject = store.find_subject_by_name("Test Subject").unwrap().unwrap();
        assert_eq!(store.subject_teacher(&subject).unwrap(), Some(teacher));
    }

    #[test]
    fn test_grade_model() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let group = uow.add_group(&NewGroup::new("Test Group")).unwrap();
        let student = uow.add_student(&NewStudent::new("Test Student").in_group(group.id)).unwrap();
        let teacher = uow.add_teacher(&NewTeacher::new("Test Teacher")).unwrap();
        let subject = uow.add_subject(&NewSubject::new("Test Subject", teacher.id)).unwrap();
        uow.add_grade(&NewGrade::new(student.id, subject.id, 90, date())).unwrap();
        uow.commit().unwrap();

        let details = store.find_grade_details_by_score(90).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].grade.score, 90);
        assert_eq!(details[0].grade.date_received, date());
        assert_eq!(details[0].student.name, "Test Student");
        assert_eq!(details[0].subject.name, "Test Subject");

        let grade = &store.find_grades_by_score(90).unwrap()[0];
        assert_eq!(store.grade_student(grade).unwrap().unwrap().name, "Test Student");
        assert_eq!(store.grade_subject(grade).unwrap().unwrap().name, "Test Subject");
    }

    #[test]
    fn test_staged_rows_visible_inside_unit_of_work() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        uow.add_group(&NewGroup::new("Staged")).unwrap();
        assert!(uow.find_group_by_name("Staged").unwrap().is_some());
        uow.commit().unwrap();
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let mut store = setup();

        {
            let uow = store.unit_of_work().unwrap();
            uow.add_group(&NewGroup::new("Dropped")).unwrap();
        }
        let uow = store.unit_of_work().unwrap();
        uow.add_group(&NewGroup::new("Rolled Back")).unwrap();
        uow.rollback().unwrap();

        assert_eq!(store.stats().unwrap().groups, 0);
    }

    #[test]
    fn test_foreign_key_violation_is_storage_error() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let err = uow.add_subject(&NewSubject::new("Orphan", 42)).unwrap_err();
        assert!(matches!(err, crate::Error::Storage(_)));
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let store = setup();

        assert!(store.get_group(1).unwrap().is_none());
        assert!(store.find_student_by_name("Nobody").unwrap().is_none());
        assert!(store.find_subject_with_teacher("Nothing").unwrap().is_none());
        assert!(store.find_grades_by_score(100).unwrap().is_empty());
    }

    #[test]
    fn test_create_tables_idempotent_with_migrations() {
        let mut store = setup();
        store.create_tables().unwrap();

        let applied = store.migrate().unwrap();
        assert_eq!(applied.len(), migrations::MIGRATIONS.len());
        assert!(store.pending_migrations().unwrap().is_empty());
        store.create_tables().unwrap();
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.create_tables().unwrap();
            let uow = store.unit_of_work().unwrap();
            uow.add_teacher(&NewTeacher::new("Persistent")).unwrap();
            uow.commit().unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.find_teacher_by_name("Persistent").unwrap().is_some());
        assert_eq!(store.stats().unwrap().teachers, 1);
    }

    #[test]
    fn test_entities_read_back_by_id() {
        let mut store = setup();

        let uow = store.unit_of_work().unwrap();
        let group = uow.add_group(&NewGroup::new("Round Trip")).unwrap();
        let student = uow.add_student(&NewStudent::new("Rita Ramos").in_group(group.id)).unwrap();
        let teacher = uow.add_teacher(&NewTeacher::new("Tomas Tell")).unwrap();
        let subject = uow.add_subject(&NewSubject::new("Geometry", teacher.id)).unwrap();
        let grade = uow.add_grade(&NewGrade::new(student.id, subject.id, 77, date())).unwrap();
        uow.commit().unwrap();

        assert_eq!(store.get_group(group.id).unwrap(), Some(group));
        assert_eq!(store.get_student(student.id).unwrap(), Some(student));
        assert_eq!(store.get_teacher(teacher.id).unwrap(), Some(teacher));
        assert_eq!(store.get_subject(subject.id).unwrap(), Some(subject));

        let read = store.get_grade(grade.id).unwrap().unwrap();
        assert_eq!(read.date_received, date());
        assert_eq!(read, grade);
    }

    #[test]
    fn test_read_only_open_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");

        assert!(matches!(SqliteStore::open_read_only(&path), Err(crate::Error::Storage(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_only_store_reads_but_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.create_tables().unwrap();
            let uow = store.unit_of_work().unwrap();
            uow.add_group(&NewGroup::new("Existing")).unwrap();
            uow.commit().unwrap();
        }

        let mut store = SqliteStore::open_read_only(&path).unwrap();
        assert!(store.find_group_by_name("Existing").unwrap().is_some());
        assert!(store.applied_migrations().unwrap().is_empty());

        let uow = store.unit_of_work().unwrap();
        assert!(uow.add_group(&NewGroup::new("Blocked")).is_err());
    }
}
