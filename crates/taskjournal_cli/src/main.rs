//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open (or create) a journal file, or an in-memory journal when no path
//!   is given, and print its classification counts.
//! - Optionally start core file logging with `--log-dir <absolute dir>`.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use taskjournal_core::{
    default_log_level, init_logging, Journal, ListView, LogConfig, RepoResult,
};

#[derive(Debug, Parser)]
#[command(version, about = "Print view and list counts of a task journal")]
struct Args {
    /// Journal file to open or create; in-memory when omitted
    journal_path: Option<PathBuf>,
    /// Absolute directory for rotating log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn print_summary(journal: &Journal) -> RepoResult<()> {
    let name = journal.journal_name()?;
    println!("journal name={}", name.as_deref().unwrap_or("-"));
    for view in [ListView::Pending, ListView::Completed, ListView::Trashed] {
        println!("view {view} count={}", journal.count(view)?);
    }

    let lists = journal.lists()?;
    let ids = lists.iter().map(|list| list.list_id).collect::<Vec<_>>();
    let counts = journal.list_counts(&ids)?;
    for list in &lists {
        println!(
            "list {} name={} count={}",
            list.list_id,
            list.name,
            counts.get(&list.list_id).copied().unwrap_or_default()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(dir) = &args.log_dir {
        let started = LogConfig::parse(default_log_level().as_str(), dir)
            .and_then(|config| init_logging(&config));
        if let Err(err) = started {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!("taskjournal_core version={}", taskjournal_core::core_version());

    let opened = match &args.journal_path {
        Some(path) => Journal::open(path),
        None => Journal::open_in_memory(),
    };
    let result = opened.and_then(|journal| {
        print_summary(&journal)?;
        journal.close()
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_summary module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn journal_path_is_optional() {
        let args = Args::try_parse_from(["taskjournal_cli"]).unwrap();
        assert!(args.journal_path.is_none());
        assert!(args.log_dir.is_none());
    }

    #[test]
    fn parses_path_and_log_dir_in_any_order() {
        let args =
            Args::try_parse_from(["taskjournal_cli", "--log-dir=/tmp/logs", "todo.db"]).unwrap();
        assert_eq!(args.journal_path, Some(PathBuf::from("todo.db")));
        assert_eq!(args.log_dir, Some(PathBuf::from("/tmp/logs")));

        let args =
            Args::try_parse_from(["taskjournal_cli", "todo.db", "--log-dir", "/tmp/logs"]).unwrap();
        assert_eq!(args.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn rejects_missing_value_and_extra_arguments() {
        assert!(Args::try_parse_from(["taskjournal_cli", "--log-dir"]).is_err());
        assert!(Args::try_parse_from(["taskjournal_cli", "a.db", "b.db"]).is_err());
        assert!(Args::try_parse_from(["taskjournal_cli", "--verbose"]).is_err());

        let err = Args::try_parse_from(["taskjournal_cli", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
