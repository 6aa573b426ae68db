//! Command-line dashboard for the course engine.
//!
//! # Responsibility
//! - Hydrate a session from an application-start JSON document.
//! - Print the grade summary and deadline preview the dashboard would show.
//!
//! Usage: `coursetrack <application-start.json> [--now <RFC3339>] [--log-level <level>]`

use chrono::{DateTime, Utc};
use clap::Parser;
use coursetrack_core::{
    core_version, default_log_level, init_logging, ApplicationStart, CourseSession,
    DeadlinePreview,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "coursetrack", version, about = "Course grade and deadline dashboard")]
struct Cli {
    /// Application-start JSON document (`{ courses, notification }`)
    path: PathBuf,

    /// Reference moment for deadline filtering (RFC 3339), defaults to now
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "COURSETRACK_LOG_LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("coursetrack: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    start_logging(cli.log_level.as_deref().unwrap_or(default_log_level()));

    let path = cli.path.display();
    let raw =
        std::fs::read_to_string(&cli.path).map_err(|err| format!("cannot read {path}: {err}"))?;
    let start: ApplicationStart =
        serde_json::from_str(&raw).map_err(|err| format!("invalid document {path}: {err}"))?;
    let session = CourseSession::hydrate(start).map_err(|err| err.to_string())?;

    Ok(render(&session, cli.now.unwrap_or_else(Utc::now)))
}

fn start_logging(level: &str) {
    let dir = std::env::temp_dir().join("coursetrack-logs");
    let Some(dir) = dir.to_str() else {
        return;
    };
    // Logging is best-effort here.
    if let Err(err) = init_logging(level, dir) {
        eprintln!("coursetrack: logging disabled: {err}");
        return;
    }
    info!("event=cli_start module=cli status=ok version={}", core_version());
}

fn render(session: &CourseSession, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let summary = session.grade_summary();
    if summary.is_no_data() {
        out.push_str("no courses\n");
    } else {
        out.push_str(&format!(
            "completed={:.2} left={:.2}\n",
            summary.completed, summary.left
        ));
    }
    for course in session.courses() {
        out.push_str(&format!(
            "course {} current={:.2} expected={:.2}\n",
            course.code, course.current_mark, course.expected_mark
        ));
    }
    match session.deadline_preview(now) {
        DeadlinePreview::NoUpcomingDeadlines => out.push_str("no upcoming deadlines\n"),
        DeadlinePreview::Upcoming(items) => {
            for item in items {
                out.push_str(&format!(
                    "due {} {} {}\n",
                    item.deadline.format("%Y-%m-%d"),
                    item.key.course_code,
                    item.key.name
                ));
            }
        }
    }
    out
}
