//! Command implementations for the Portal BSA CLI.
//!
//! Each subcommand is a thin call into the `bsa-db` services. Store work is
//! synchronous, so it runs on tokio's blocking pool.

use bsa_core::{RecordStatus, WasteCategory};
use bsa_db::Database;
use chrono::NaiveDate;
use clap::Subcommand;

pub mod admin;
pub mod records;
pub mod report;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the aggregate documents, optionally seeding sample records
    Init {
        /// Also insert the ten December 2024 sample records
        #[arg(long)]
        sample: bool,
    },

    /// Record a weighing
    Add {
        /// Waste category: organik, anorganik or b3
        #[arg(short = 't', long = "type")]
        category: WasteCategory,

        /// Weight in kilograms
        #[arg(short, long)]
        weight: f64,

        /// Date of the weighing (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Officer name
        #[arg(short, long)]
        officer: Option<String>,

        /// Class label
        #[arg(short, long)]
        class: Option<String>,

        /// selesai or pending
        #[arg(short, long)]
        status: Option<RecordStatus>,
    },

    /// List records, newest first
    List {
        #[arg(short = 't', long = "type")]
        category: Option<WasteCategory>,

        #[arg(short, long)]
        status: Option<RecordStatus>,

        /// Earliest record date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest record date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change fields of an existing record
    Update {
        id: String,

        #[arg(short = 't', long = "type")]
        category: Option<WasteCategory>,

        #[arg(short, long)]
        weight: Option<f64>,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        officer: Option<String>,

        #[arg(short, long)]
        class: Option<String>,

        #[arg(short, long)]
        status: Option<RecordStatus>,
    },

    /// Delete a record
    Delete { id: String },

    /// Import records from a CSV file (date,officer,class,type,weight,status)
    Import { csv: String },

    /// Show totals, monthly changes and environmental impact
    Stats,

    /// Show the monthly weight series of a year
    Chart {
        /// Calendar year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show each category's share of the combined total
    Composition,

    /// Show the environmental impact estimate
    Impact,

    /// Export stats, records and impact as JSON
    Export {
        /// Output path, defaults to portal-bsa-export-<date>.json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Delete every record and zero the aggregates
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Open the store at `db_path` and run `command` against it.
pub async fn run(db_path: String, command: Command) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || {
        let db = Database::open(&db_path)?;
        execute(&db, command)
    })
    .await?
}

/// Run `command` against an open store.
pub fn execute(db: &Database, command: Command) -> anyhow::Result<()> {
    log::debug!("executing {:?}", command);
    match command {
        Command::Init { sample } => admin::run_init(db, sample),
        Command::Add {
            category,
            weight,
            date,
            officer,
            class,
            status,
        } => records::run_add(db, category, weight, date, officer, class, status),
        Command::List {
            category,
            status,
            from,
            to,
            limit,
            json,
        } => {
            let filter = records::build_filter(category, status, from, to, limit);
            records::run_list(db, &filter, json)
        }
        Command::Update {
            id,
            category,
            weight,
            date,
            officer,
            class,
            status,
        } => {
            let patch = bsa_core::RecordPatch {
                date,
                officer,
                class,
                category,
                weight,
                status,
            };
            records::run_update(db, &id, patch)
        }
        Command::Delete { id } => records::run_delete(db, &id),
        Command::Import { csv } => admin::run_import(db, &csv),
        Command::Stats => report::run_stats(db),
        Command::Chart { year } => report::run_chart(db, year),
        Command::Composition => report::run_composition(db),
        Command::Impact => report::run_impact(db),
        Command::Export { output } => report::run_export(db, output),
        Command::Reset { yes } => admin::run_reset(db, yes),
    }
}
