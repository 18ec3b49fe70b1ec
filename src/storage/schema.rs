//! Database schema definitions

/// SQL to create the groups table
pub const CREATE_GROUPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS groups (
    group_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#;

/// SQL to create the students table
/// `group_id` stays NULL until the student is assigned
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    group_id INTEGER REFERENCES groups(group_id)
)
"#;

/// SQL to create the teachers table
pub const CREATE_TEACHERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS teachers (
    teacher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#;

/// SQL to create the subjects table
pub const CREATE_SUBJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS subjects (
    subject_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    teacher_id INTEGER NOT NULL REFERENCES teachers(teacher_id)
)
"#;

/// SQL to create the grades table
/// `date_received` holds an ISO-8601 date (YYYY-MM-DD)
pub const CREATE_GRADES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS grades (
    grade_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(student_id),
    subject_id INTEGER NOT NULL REFERENCES subjects(subject_id),
    score INTEGER NOT NULL,
    date_received TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_groups_name ON groups(name)",
    "CREATE INDEX IF NOT EXISTS idx_students_name ON students(name)",
    "CREATE INDEX IF NOT EXISTS idx_students_group ON students(group_id)",
    "CREATE INDEX IF NOT EXISTS idx_teachers_name ON teachers(name)",
    "CREATE INDEX IF NOT EXISTS idx_subjects_name ON subjects(name)",
    "CREATE INDEX IF NOT EXISTS idx_subjects_teacher ON subjects(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_grades_student ON grades(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_grades_subject ON grades(subject_id)",
];

/// Tables in dependency order (parents before children)
pub const TABLES: &[&str] = &["groups", "students", "teachers", "subjects", "grades"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_GROUPS_TABLE,
        CREATE_STUDENTS_TABLE,
        CREATE_TEACHERS_TABLE,
        CREATE_SUBJECTS_TABLE,
        CREATE_GRADES_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
