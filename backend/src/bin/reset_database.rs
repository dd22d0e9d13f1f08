//! Provision the relational schema and load a freshly generated university.
//!
//! Runs the embedded Diesel migrations, then wipes every table and seeds it
//! inside one transaction. Prints the inserted counts on success.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use registrar::domain::DatabaseResetService;
use registrar::domain::ports::DatabaseResetCommand;
use registrar::outbound::persistence::{
    DbPool, DieselDatabaseReset, PoolConfig, run_migrations_async,
};
use seed_data::DatasetPlan;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

/// `reset-database` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reset-database",
    about = "Create the schema and replace all data with a generated university",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `REGISTRAR_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Seed for the dataset generator; equal seeds give equal data.
    #[arg(long, value_name = "n")]
    seed: Option<u64>,
    /// Number of students to generate.
    #[arg(long, value_name = "n")]
    students: Option<usize>,
    /// Skip schema migrations and only reload data.
    #[arg(long)]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to stderr so the summary on stdout stays machine-readable.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args))
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| env::var("REGISTRAR_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no database URL: pass --database-url or set REGISTRAR_DATABASE_URL"))
}

fn plan_from(args: &CliArgs) -> DatasetPlan {
    let mut plan = DatasetPlan::default();
    if let Some(seed) = args.seed {
        plan = plan.with_seed(seed);
    }
    if let Some(students) = args.students {
        plan = plan.with_students(students);
    }
    plan
}

async fn run(args: CliArgs) -> Result<()> {
    let plan = plan_from(&args);
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        let applied = run_migrations_async(database_url.clone())
            .await
            .wrap_err("failed to run migrations")?;
        println!("migrations_applied={applied}");
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let service =
        DatabaseResetService::new(Arc::new(DieselDatabaseReset::new(pool))).with_plan(plan);
    let summary = service.reset().await.wrap_err("database reset failed")?;

    println!("departments={}", summary.departments);
    println!("professors={}", summary.professors);
    println!("students={}", summary.students);
    println!("courses={}", summary.courses);
    println!("enrollments={}", summary.enrollments);
    Ok(())
}
