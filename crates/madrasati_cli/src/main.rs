//! Command-line host for the Madrasati portal core.
//!
//! # Responsibility
//! - Open a portal database and run one read or sign-in query against it.
//! - Keep output plain text, one record per line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use madrasati_core::{
    init_logging_from_config, GradeLevel, PortalConfig, Role, SchoolPortal, Weekday,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "madrasati",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and query a Madrasati school portal database"
)]
struct Cli {
    /// TOML portal config. `--db` overrides its `db_path`.
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite file to open. Without it (and without a config path) the
    /// portal runs in memory on seed data.
    #[clap(long, global = true)]
    db: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check core linkage
    Ping,
    /// Create and seed the database, then report table counts
    Init,
    /// List students, optionally for one grade (e.g. "Grade 1")
    Students {
        #[clap(long)]
        grade: Option<GradeLevel>,
    },
    /// Print the weekly schedule of a grade
    Schedule {
        #[clap(long)]
        grade: GradeLevel,
    },
    /// List notifications, optionally as a parent or a student grade sees them
    Notifications {
        #[clap(long, conflicts_with = "grade")]
        parent: Option<String>,
        #[clap(long)]
        grade: Option<GradeLevel>,
    },
    /// Verify credentials for a role
    Login {
        #[clap(long)]
        role: Role,
        /// Seat number for students, username otherwise
        #[clap(long)]
        id: String,
        #[clap(long)]
        password: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Init => "init",
            Self::Students { .. } => "students",
            Self::Schedule { .. } => "schedule",
            Self::Notifications { .. } => "notifications",
            Self::Login { .. } => "login",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Ping = cli.command {
        println!("madrasati_core ping={}", madrasati_core::ping());
        println!("madrasati_core version={}", madrasati_core::core_version());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => PortalConfig::load(path)?,
        None => PortalConfig::default(),
    };
    if cli.db.is_some() {
        config.db_path = cli.db.clone();
    }
    init_logging_from_config(&config)
        .map_err(anyhow::Error::msg)
        .context("failed to start logging")?;

    let mut portal = SchoolPortal::open(&config).context("failed to open portal database")?;
    run(&mut portal, cli.command)
}

fn run(portal: &mut SchoolPortal, command: Command) -> Result<()> {
    info!("event=cli_command module=cli status=start command={}", command.name());
    match command {
        Command::Ping => {}
        Command::Init => {
            println!("students={}", portal.list_students()?.len());
            println!("teachers={}", portal.list_teachers()?.len());
            println!("parents={}", portal.list_parents()?.len());
            println!("notifications={}", portal.list_notifications()?.len());
        }
        Command::Students { grade } => {
            let students = match grade {
                Some(grade) => portal.list_students_by_grade(grade)?,
                None => portal.list_students()?,
            };
            for student in students {
                println!(
                    "{}\t{}\t{}\t{}",
                    student.id, student.seat_number, student.grade_level, student.name
                );
            }
        }
        Command::Schedule { grade } => {
            let week = portal.get_schedule(grade)?;
            for day in week.days() {
                let periods: Vec<_> = day.periods.iter().map(|period| period.label()).collect();
                println!("{:<9} {}", weekday_name(day.day), periods.join(" | "));
            }
        }
        Command::Notifications { parent, grade } => {
            let notifications = match (parent, grade) {
                (Some(parent_id), _) => portal.notifications_for_parent(&parent_id)?,
                (None, Some(grade)) => portal.notifications_for_student_grade(grade)?,
                (None, None) => portal.list_notifications()?,
            };
            for notification in notifications {
                println!(
                    "{}\t{}\t{}\t{}",
                    notification.date, notification.kind, notification.sender, notification.title
                );
            }
        }
        Command::Login { role, id, password } => match portal.login(role, &id, &password)? {
            Some(account) => println!(
                "ok role={} id={} name={}",
                account.role(),
                account.id(),
                account.name()
            ),
            None => bail!("invalid {} or password for role {role}", role.identifier_field()),
        },
    }
    Ok(())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sunday => "Sunday",
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
    }
}
