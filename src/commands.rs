use crate::{OutputFormat, Report};
use anyhow::Context;
use gradebook::config::{self, GradebookConfig};
use gradebook::query::QueryCatalog;
use gradebook::ui::{self, Icons};
use gradebook::{SeedPlan, Seeder, Session, SqliteStore};
use serde::Serialize;
use std::path::Path;

fn open_store(database: &Path) -> anyhow::Result<SqliteStore> {
    config::ensure_db_dir(database)?;
    SqliteStore::open(database)
        .with_context(|| format!("failed to open database {}", database.display()))
}

/// Read-only handle; a mistyped path fails rather than creating an empty file
fn open_existing(database: &Path) -> anyhow::Result<SqliteStore> {
    SqliteStore::open_read_only(database)
        .with_context(|| format!("no readable database at {}", database.display()))
}

/// Tables plus migrations; any failure here aborts startup
fn prepare(store: &mut SqliteStore) -> anyhow::Result<()> {
    store.create_tables()?;
    let applied = store.migrate().context("failed to apply migrations")?;
    for id in applied {
        ui::summary_row("applied", id);
    }
    Ok(())
}

fn seed(store: &mut SqliteStore, plan: &SeedPlan, rng_seed: Option<u64>) -> anyhow::Result<()> {
    let uow = store.unit_of_work()?;
    let summary = match rng_seed {
        Some(seed) => Seeder::from_seed(seed).generate(uow, plan)?,
        None => gradebook::seed::generate(uow, plan)?,
    };
    ui::success(&format!("Seeded {}", summary));
    Ok(())
}

/// Default entry point: create tables, migrate to head, seed, report counts
pub fn run_bootstrap(database: &Path, config: &GradebookConfig) -> anyhow::Result<()> {
    ui::header("Bootstrapping gradebook");
    ui::info("Database", &database.display().to_string());

    let mut store = open_store(database)?;
    prepare(&mut store)?;
    seed(&mut store, &config.seed_plan(), None)?;

    ui::section(Icons::STATS, "Row counts");
    println!("{}", ui::stats_table(&store.stats()?));
    Ok(())
}

pub fn run_init(database: &Path) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    prepare(&mut store)?;
    ui::success(&format!(
        "Database ready at {} (schema {})",
        database.display(),
        gradebook::storage::migrations::head()
    ));
    Ok(())
}

pub fn run_write_config(
    path: &Path,
    database: &Path,
    current: &GradebookConfig,
    force: bool,
) -> anyhow::Result<()> {
    let config = GradebookConfig {
        database: Some(database.display().to_string()),
        seed: Some(current.seed_plan()),
    };
    config::write_config(path, &config, force)?;
    ui::success(&format!("Wrote config to {}", path.display()));
    Ok(())
}

pub fn run_seed(database: &Path, plan: &SeedPlan, rng_seed: Option<u64>) -> anyhow::Result<()> {
    let mut store = open_store(database)?;
    prepare(&mut store)?;
    ui::section(Icons::SEED, "Seeding sample data");
    seed(&mut store, plan, rng_seed)
}

pub fn run_stats(database: &Path) -> anyhow::Result<()> {
    let store = open_existing(database)?;

    ui::section(Icons::DATABASE, &format!("Gradebook Statistics ({})", database.display()));
    println!("{}", ui::stats_table(&store.stats()?));
    Ok(())
}

pub fn run_migrations(database: &Path) -> anyhow::Result<()> {
    let store = open_existing(database)?;

    ui::section(Icons::SCROLL, "Migrations");
    for id in store.applied_migrations()? {
        ui::summary_row("applied", &id);
    }
    let pending = store.pending_migrations()?;
    for id in &pending {
        ui::summary_row("pending", id);
    }
    if pending.is_empty() {
        ui::success(&format!("At head ({})", gradebook::storage::migrations::head()));
    } else {
        ui::warn(&format!("{} pending migration(s); run `gradebook init`", pending.len()));
    }
    Ok(())
}

/// Print `value` as JSON, or call `text` to render it for humans
fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn print_average(label: &str, value: Option<f64>) {
    match value {
        Some(avg) => ui::info(label, &ui::average(avg)),
        None => println!("{} No grades found.", Icons::EMPTY),
    }
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("{} Nothing found.", Icons::EMPTY);
    } else {
        println!("{}", ui::names_table(names));
    }
}

pub fn run_report(database: &Path, format: OutputFormat, query: Report) -> anyhow::Result<()> {
    let store = open_existing(database)?;
    let catalog = QueryCatalog::new(&store);

    match query {
        Report::TopStudents { limit } => {
            let rows = catalog.top_students(limit)?;
            emit(format, &rows, || {
                ui::section(Icons::TROPHY, &format!("Top {} students", limit));
                if rows.is_empty() {
                    println!("{} No grades recorded.", Icons::EMPTY);
                } else {
                    println!("{}", ui::student_averages_table(&rows));
                }
            })
        }

        Report::BestStudent { subject } => {
            let best = catalog.best_student_in_subject(&subject)?;
            emit(format, &best, || {
                ui::section(Icons::TROPHY, &format!("Best student in {}", subject));
                match &best {
                    Some(row) => ui::info(&row.student.name, &ui::average(row.average)),
                    None => println!("{} No grades found.", Icons::EMPTY),
                }
            })
        }

        Report::GroupAverage { group, subject } => {
            let avg = catalog.group_average_in_subject(&group, &subject)?;
            emit(format, &avg, || {
                ui::section(Icons::CAP, &format!("Group {} in {}", group, subject));
                print_average("Average", avg);
            })
        }

        Report::GroupAverages { subject } => {
            let rows = catalog.group_averages_in_subject(&subject)?;
            emit(format, &rows, || {
                ui::section(Icons::CAP, &format!("Group averages in {}", subject));
                if rows.is_empty() {
                    println!("{} No grades found.", Icons::EMPTY);
                } else {
                    println!("{}", ui::group_averages_table(&rows));
                }
            })
        }

        Report::OverallAverage => {
            let avg = catalog.overall_average()?;
            emit(format, &avg, || {
                ui::section(Icons::STATS, "Overall average");
                print_average("Average", avg);
            })
        }

        Report::TeacherSubjects { teacher } => {
            let names = catalog.subjects_taught_by(&teacher)?;
            emit(format, &names, || {
                ui::section(Icons::TEACHER, &format!("Subjects taught by {}", teacher));
                print_names(&names);
            })
        }

        Report::GroupStudents { group } => {
            let names = catalog.students_in_group(&group)?;
            emit(format, &names, || {
                ui::section(Icons::CAP, &format!("Students in {}", group));
                print_names(&names);
            })
        }

        Report::GroupScores { group, subject } => {
            let rows = catalog.group_scores_in_subject(&group, &subject)?;
            emit(format, &rows, || {
                ui::section(Icons::BOOKS, &format!("Scores of {} in {}", group, subject));
                if rows.is_empty() {
                    println!("{} No grades found.", Icons::EMPTY);
                } else {
                    println!("{}", ui::scores_table(&rows));
                }
            })
        }

        Report::TeacherAverage { teacher } => {
            let avg = catalog.teacher_average(&teacher)?;
            emit(format, &avg, || {
                ui::section(Icons::TEACHER, &format!("Average across {}'s subjects", teacher));
                print_average("Average", avg);
            })
        }

        Report::StudentSubjects { student } => {
            let names = catalog.subjects_of_student(&student)?;
            emit(format, &names, || {
                ui::section(Icons::BOOKS, &format!("Subjects of {}", student));
                print_names(&names);
            })
        }
    }
}
