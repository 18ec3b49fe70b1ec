//! Random sample data
//!
//! The seeder fills the schema with random but relationally consistent
//! rows: every subject gets an existing teacher, every student an existing
//! group, and every grade an existing student and subject.

pub mod names;

use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::model::{NewGrade, NewGroup, NewStudent, NewSubject, NewTeacher};
use crate::storage::{Session, UnitOfWork};
use crate::{Error, Result};

/// Lowest generated score
pub const MIN_SCORE: i64 = 50;
/// Highest generated score
pub const MAX_SCORE: i64 = 100;

/// How many rows of each kind to generate.
///
/// `grades` is the total number of grades, not a per-student count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedPlan {
    pub students: usize,
    pub groups: usize,
    pub subjects: usize,
    pub teachers: usize,
    pub grades: usize,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            students: 50,
            groups: 3,
            subjects: 8,
            teachers: 5,
            grades: 20,
        }
    }
}

/// Rows inserted by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub groups: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub grades: usize,
}

impl std::fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} groups, {} teachers, {} subjects, {} students, {} grades",
            self.groups, self.teachers, self.subjects, self.students, self.grades
        )
    }
}

/// Generates sample data with the wrapped random source
pub struct Seeder<R: Rng> {
    rng: R,
}

impl Seeder<StdRng> {
    /// Deterministic seeder for reproducible data sets
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Seeder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Insert the rows described by `plan` and commit them as one unit.
    ///
    /// Parents are drawn from every row visible in the unit of work, so
    /// data committed earlier can be picked too. On error nothing is
    /// committed.
    pub fn generate(&mut self, uow: UnitOfWork<'_>, plan: &SeedPlan) -> Result<SeedSummary> {
        let today = chrono::Local::now().date_naive();
        let mut summary = SeedSummary::default();

        for _ in 0..plan.groups {
            uow.add_group(&NewGroup::new(names::word(&mut self.rng)))?;
            summary.groups += 1;
        }

        for _ in 0..plan.teachers {
            uow.add_teacher(&NewTeacher::new(names::full_name(&mut self.rng)))?;
            summary.teachers += 1;
        }

        if plan.subjects > 0 {
            let teacher_ids = require_parents(uow.teacher_ids()?, "subjects", "teachers")?;
            for _ in 0..plan.subjects {
                let teacher_id = self.pick(&teacher_ids);
                uow.add_subject(&NewSubject::new(names::word(&mut self.rng), teacher_id))?;
                summary.subjects += 1;
            }
        }

        if plan.students > 0 {
            let group_ids = require_parents(uow.group_ids()?, "students", "groups")?;
            for _ in 0..plan.students {
                let group_id = self.pick(&group_ids);
                uow.add_student(&NewStudent::new(names::full_name(&mut self.rng)).in_group(group_id))?;
                summary.students += 1;
            }
        }

        if plan.grades > 0 {
            let student_ids = require_parents(uow.student_ids()?, "grades", "students")?;
            let subject_ids = require_parents(uow.subject_ids()?, "grades", "subjects")?;
            for _ in 0..plan.grades {
                let grade = NewGrade::new(
                    self.pick(&student_ids),
                    self.pick(&subject_ids),
                    self.rng.gen_range(MIN_SCORE..=MAX_SCORE),
                    random_date_this_decade(&mut self.rng, today),
                );
                uow.add_grade(&grade)?;
                summary.grades += 1;
            }
        }

        uow.commit()?;
        tracing::debug!("Seeded {}", summary);
        Ok(summary)
    }

    // Callers guarantee `ids` is non-empty.
    fn pick(&mut self, ids: &[i64]) -> i64 {
        ids.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

/// Seed with a thread-local random source
pub fn generate(uow: UnitOfWork<'_>, plan: &SeedPlan) -> Result<SeedSummary> {
    Seeder::new(rand::thread_rng()).generate(uow, plan)
}

fn require_parents(ids: Vec<i64>, child: &str, parent: &str) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Err(Error::Seed(format!("cannot create {child} without any {parent}")));
    }
    Ok(ids)
}

/// First day of the decade `today` falls in
pub fn decade_start(today: NaiveDate) -> NaiveDate {
    let year = today.year() - today.year().rem_euclid(10);
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today)
}

/// Uniform date between the start of the current decade and `today`, inclusive
pub fn random_date_this_decade<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let start = decade_start(today);
    let span = (today - start).num_days().max(0) as u64;
    start
        .checked_add_days(Days::new(rng.gen_range(0..=span)))
        .unwrap_or(today)
}
