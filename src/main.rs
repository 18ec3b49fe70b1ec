//! Gradebook CLI - seed and report on a school gradebook database

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use gradebook::query::TOP_STUDENTS_LIMIT;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(version)]
#[command(about = "School gradebook - schema, sample data and reports over SQLite")]
#[command(long_about = r#"
Gradebook keeps groups, students, teachers, subjects and grades in SQLite.

Without a subcommand it creates the tables, migrates to head and seeds a
default sample (50 students, 3 groups, 8 subjects, 5 teachers, 20 grades).

Example usage:
  gradebook init
  gradebook seed --students 120 --grades 400
  gradebook report top-students --limit 5
  gradebook report group-scores --group alpha --subject orbit
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tables and apply pending migrations
    Init {
        /// Also write a config file with the effective settings
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Insert random sample data
    Seed {
        #[arg(long)]
        students: Option<usize>,

        #[arg(long)]
        groups: Option<usize>,

        #[arg(long)]
        subjects: Option<usize>,

        #[arg(long)]
        teachers: Option<usize>,

        /// Total number of grades (not per student)
        #[arg(long)]
        grades: Option<usize>,

        /// Seed for a reproducible data set
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Show row counts per table
    Stats,

    /// List applied and pending migrations
    Migrations,

    /// Run one of the report queries
    Report {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(subcommand)]
        query: Report,
    },
}

#[derive(Subcommand)]
pub enum Report {
    /// Students with the highest overall average
    TopStudents {
        #[arg(short, long, default_value_t = TOP_STUDENTS_LIMIT)]
        limit: usize,
    },

    /// Student with the highest average in a subject
    BestStudent {
        #[arg(long)]
        subject: String,
    },

    /// Average score of a group in a subject
    GroupAverage {
        #[arg(long)]
        group: String,

        #[arg(long)]
        subject: String,
    },

    /// Average score of every group in a subject
    GroupAverages {
        #[arg(long)]
        subject: String,
    },

    /// Average over all grades
    OverallAverage,

    /// Subjects taught by a teacher
    TeacherSubjects {
        #[arg(long)]
        teacher: String,
    },

    /// Students in a group
    GroupStudents {
        #[arg(long)]
        group: String,
    },

    /// Scores of a group's students in a subject
    GroupScores {
        #[arg(long)]
        group: String,

        #[arg(long)]
        subject: String,
    },

    /// Average over all subjects a teacher teaches
    TeacherAverage {
        #[arg(long)]
        teacher: String,
    },

    /// Subjects a student has grades in
    StudentSubjects {
        #[arg(long)]
        student: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        gradebook::ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = gradebook::config::load_config(cli.config.as_deref())?;
    let database = config.database_path(cli.database.as_deref());

    match cli.command {
        None => commands::run_bootstrap(&database, &config),

        Some(Commands::Init { write_config, force }) => {
            commands::run_init(&database)?;
            if write_config {
                let path = cli.config.unwrap_or_else(gradebook::config::default_config_path);
                commands::run_write_config(&path, &database, &config, force)?;
            }
            Ok(())
        }

        Some(Commands::Seed { students, groups, subjects, teachers, grades, rng_seed }) => {
            let defaults = config.seed_plan();
            let plan = gradebook::SeedPlan {
                students: students.unwrap_or(defaults.students),
                groups: groups.unwrap_or(defaults.groups),
                subjects: subjects.unwrap_or(defaults.subjects),
                teachers: teachers.unwrap_or(defaults.teachers),
                grades: grades.unwrap_or(defaults.grades),
            };
            commands::run_seed(&database, &plan, rng_seed)
        }

        Some(Commands::Stats) => commands::run_stats(&database),

        Some(Commands::Migrations) => commands::run_migrations(&database),

        Some(Commands::Report { format, query }) => commands::run_report(&database, format, query),
    }
}
