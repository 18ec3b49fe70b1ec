use tabled::{settings::Style, Table, Tabled};
use crate::query::{GroupAverage, StudentAverage, StudentScore};
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        render(&self.rows)
    }
}

#[derive(Tabled)]
struct StudentAverageRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Average")]
    average: String,
}

#[derive(Tabled)]
struct GroupAverageRow {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Average")]
    average: String,
}

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Score")]
    score: i64,
}

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "Name")]
    name: String,
}

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Groups", &stats.groups.to_string());
    builder.add_row("Students", &stats.students.to_string());
    builder.add_row("Teachers", &stats.teachers.to_string());
    builder.add_row("Subjects", &stats.subjects.to_string());
    builder.add_row("Grades", &stats.grades.to_string());
    builder.build()
}

pub fn student_averages_table(rows: &[StudentAverage]) -> String {
    render(rows.iter().enumerate().map(|(i, r)| StudentAverageRow {
        rank: i + 1,
        name: r.student.name.clone(),
        average: format!("{:.2}", r.average),
    }))
}

pub fn group_averages_table(rows: &[GroupAverage]) -> String {
    render(rows.iter().map(|r| GroupAverageRow {
        name: r.group.name.clone(),
        average: format!("{:.2}", r.average),
    }))
}

pub fn scores_table(rows: &[StudentScore]) -> String {
    render(rows.iter().map(|r| ScoreRow {
        name: r.student_name.clone(),
        score: r.score,
    }))
}

pub fn names_table(names: &[String]) -> String {
    render(names.iter().map(|name| NameRow { name: name.clone() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Student};

    #[test]
    fn test_stats_table_lists_every_table() {
        let stats = DbStats { groups: 3, students: 50, teachers: 5, subjects: 8, grades: 20 };
        let table = stats_table(&stats);
        for label in ["Groups", "Students", "Teachers", "Subjects", "Grades"] {
            assert!(table.contains(label));
        }
        assert!(table.contains("50"));
    }

    #[test]
    fn test_student_averages_ranked() {
        let rows = vec![
            StudentAverage {
                student: Student { id: 4, name: "Cid".into(), group_id: Some(1) },
                average: 100.0,
            },
            StudentAverage {
                student: Student { id: 1, name: "Ann".into(), group_id: None },
                average: 85.5,
            },
        ];
        let table = student_averages_table(&rows);
        assert!(table.contains("Cid"));
        assert!(table.contains("85.50"));
    }

    #[test]
    fn test_group_and_score_tables() {
        let groups = vec![GroupAverage { group: Group { id: 1, name: "Alpha".into() }, average: 80.0 }];
        assert!(group_averages_table(&groups).contains("80.00"));

        let scores = vec![StudentScore { student_name: "Eve".into(), score: 90 }];
        let table = scores_table(&scores);
        assert!(table.contains("Eve") && table.contains("90"));
    }

    #[test]
    fn test_empty_builder_renders_nothing() {
        assert!(TableBuilder::new().build().is_empty());
        assert!(names_table(&["Math".to_string()]).contains("Math"));
    }
}
