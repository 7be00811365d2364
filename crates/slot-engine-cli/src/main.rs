//! `slots` CLI -- query bookable appointment slots from a console snapshot.
//!
//! A snapshot is the JSON export of the console's units, appointments and
//! services (`{"units": [...], "appointments": [...], "services": [...]}`).
//!
//! ## Usage
//!
//! ```sh
//! # Bookable start times for staff "ana" at unit "centro"
//! slots available -s snapshot.json --date 2024-01-10 --staff ana --unit centro --service cut
//!
//! # Same, as a JSON array, with the clock pinned
//! slots available -s snapshot.json --date 2024-01-10 --staff ana --unit centro \
//!   --now 2024-01-10T09:15 --json
//!
//! # Would a 10:00 booking collide with anything? (exit code 1 if so)
//! slots check -s snapshot.json --date 2024-01-10 --staff ana --time 10:00 --service cut
//!
//! # Operating hours of a unit on a date (snapshot from stdin)
//! cat snapshot.json | slots hours --unit centro --date 2024-01-10
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::time::{parse_date, weekday_index};
use slot_engine::{
    available_slots, check_booking, parse_local_datetime, BookingRequest, Clock, SlotQuery,
    Snapshot, SystemClock, UnitDirectory, ZonedClock,
};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable appointment slots from console snapshots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable start times for one staff member on one day
    Available {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        snapshot: Option<String>,
        /// Requested date (YYYY-MM-DD, time suffix ignored)
        #[arg(long)]
        date: String,
        /// Staff member id
        #[arg(long)]
        staff: String,
        /// Unit id
        #[arg(long)]
        unit: String,
        /// Service id; slots must fit its duration
        #[arg(long)]
        service: Option<String>,
        /// Appointment being edited (never conflicts with itself)
        #[arg(long)]
        exclude: Option<String>,
        /// Pin the local clock (e.g. 2024-01-10T09:15)
        #[arg(long, conflicts_with = "tz")]
        now: Option<String>,
        /// Read the clock in this IANA timezone instead of the host's
        #[arg(long)]
        tz: Option<String>,
        /// Print a JSON array instead of one slot per line
        #[arg(long)]
        json: bool,
    },
    /// Report existing appointments a proposed booking would collide with
    Check {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        snapshot: Option<String>,
        /// Booking date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Staff member id
        #[arg(long)]
        staff: String,
        /// Proposed start time (HH:MM)
        #[arg(long)]
        time: String,
        /// Service id of the proposed booking
        #[arg(long)]
        service: Option<String>,
        /// Appointment being edited (never conflicts with itself)
        #[arg(long)]
        exclude: Option<String>,
        /// Print the conflicts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a unit's operating hours on a date
    Hours {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        snapshot: Option<String>,
        /// Unit id
        #[arg(long)]
        unit: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Available {
            snapshot,
            date,
            staff,
            unit,
            service,
            exclude,
            now,
            tz,
            json,
        } => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            let now = match (now, tz) {
                (Some(now), _) => parse_local_datetime(&now)
                    .with_context(|| format!("Invalid --now value: {}", now))?,
                (None, Some(tz)) => ZonedClock::from_name(&tz)
                    .with_context(|| format!("Invalid --tz value: {}", tz))?
                    .now(),
                (None, None) => SystemClock.now(),
            };
            debug!(%now, "clock reading");

            let query = SlotQuery {
                date: Some(date),
                staff_id: Some(staff),
                unit_id: Some(unit),
                service_id: service,
                exclude_appointment_id: exclude,
            };
            let slots = available_slots(&query, &snapshot, &snapshot, &snapshot, now);

            if json {
                println!("{}", serde_json::to_string(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}", slot);
                }
            }
        }
        Commands::Check {
            snapshot,
            date,
            staff,
            time,
            service,
            exclude,
            json,
        } => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            let request = BookingRequest {
                date,
                staff_id: staff,
                time,
                service_id: service,
                exclude_appointment_id: exclude,
            };
            let conflicts = check_booking(&request, &snapshot, &snapshot)
                .context("Failed to check booking")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("{} is free", request.time);
            } else {
                for c in &conflicts {
                    println!("conflict: {} {}-{}", c.appointment_id, c.start, c.end);
                }
            }

            if !conflicts.is_empty() {
                process::exit(1);
            }
        }
        Commands::Hours {
            snapshot,
            unit,
            date,
        } => {
            let snapshot = load_snapshot(snapshot.as_deref())?;
            if !snapshot.contains_unit(&unit) {
                anyhow::bail!("Unknown unit: '{}'", unit);
            }
            let day = parse_date(&date).with_context(|| format!("Invalid --date value: {}", date))?;
            let weekday = weekday_index(day);
            let label = day.format("%A %Y-%m-%d").to_string();

            match snapshot.operating_hours(&unit, weekday) {
                Some(h) if h.open => {
                    let mut line = format!("{}: {}-{}", label, h.start_time, h.end_time);
                    if let (Some(s), Some(e)) = (&h.break_start, &h.break_end) {
                        line.push_str(&format!(" (break {}-{})", s, e));
                    }
                    println!("{}", line);
                }
                _ => println!("{}: closed", label),
            }
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "slot_engine=debug,slots=debug"
    } else {
        "slot_engine=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_snapshot(path: Option<&str>) -> Result<Snapshot> {
    let json = read_input(path)?;
    Snapshot::from_json(&json).context("Failed to parse snapshot JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
