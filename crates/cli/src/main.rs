//! credgroups CLI - inspect and change the supplementary groups of a process
//!
//! Changes only affect the `credgroups` process itself (and anything it
//! would exec); they are useful as a privilege check or from scripts run as
//! root.

mod logging;
mod output;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, warn};

use credgroups_core::application::{GroupService, PrivilegeService};
use credgroups_core::domain::GroupList;
use credgroups_core::port::ProcessIdentity;
use credgroups_core::Result;
use credgroups_infra_system::{NixGroupCredentials, NixProcessIdentity};

use logging::LogFormat;
use output::{OutputFormat, Report};

#[derive(Parser)]
#[command(name = "credgroups")]
#[command(about = "Supplementary group management (getgroups, setgroups, initgroups)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, env = "CREDGROUPS_OUTPUT", default_value = "text")]
    output: OutputFormat,

    /// Log format for diagnostics on stderr
    #[arg(long, global = true, value_enum, env = "CREDGROUPS_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the supplementary groups of this process
    Getgroups,

    /// Replace the supplementary groups (no ids clears the list)
    Setgroups {
        /// Group ids, e.g. 100 200 300
        #[arg(conflicts_with = "json")]
        gids: Vec<String>,

        /// Group ids as a JSON array, e.g. '[100, 200, 300]'
        #[arg(long)]
        json: Option<String>,
    },

    /// Load the supplementary groups of USER from the group database, plus GID
    Initgroups {
        /// User name looked up in the group database
        user: String,

        /// Primary group id added to the list
        gid: String,
    },

    /// Become USER: setgid, initgroups, then setuid
    SwitchUser {
        /// Target user name
        user: String,
    },
}

/// Supplementary groups after a change that already succeeded
///
/// A failed query here must not turn the command into a failure, so it is
/// logged and reported as unavailable.
fn current_groups(groups: &GroupService) -> Option<GroupList> {
    match groups.getgroups() {
        Ok(list) => Some(list),
        Err(e) => {
            warn!(error = %e, "Change applied but the resulting groups could not be read");
            None
        }
    }
}

fn run(command: Commands, groups: &GroupService, identity: Arc<dyn ProcessIdentity>) -> Result<Report> {
    match command {
        Commands::Getgroups => Ok(Report::Getgroups {
            groups: groups.getgroups()?,
        }),

        Commands::Setgroups { gids, json } => {
            let applied = match json {
                Some(document) => groups.setgroups_from_json(&document)?,
                None => groups.setgroups_from_args(&gids)?,
            };
            Ok(Report::Setgroups { groups: applied })
        }

        Commands::Initgroups { user, gid } => {
            let (user, primary_gid) = groups.initgroups_from_args(&user, &gid)?;
            Ok(Report::Initgroups {
                user: user.to_string(),
                primary_gid: primary_gid.as_raw(),
                groups: current_groups(groups),
            })
        }

        Commands::SwitchUser { user } => {
            let privilege = PrivilegeService::new(identity, groups.clone());
            let account = privilege.change_to_user(&user)?;
            Ok(Report::SwitchUser {
                account,
                groups: current_groups(groups),
            })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_format) {
        eprintln!("warning: {:#}", e);
    }

    debug!(version = credgroups_core::VERSION, "credgroups starting");

    let groups = GroupService::new(Arc::new(NixGroupCredentials::new()));
    let identity = Arc::new(NixProcessIdentity::new());

    match run(cli.command, &groups, identity) {
        Ok(report) => {
            println!("{}", report.render(cli.output));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", output::render_error(&e, cli.output));
            ExitCode::from(output::exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use credgroups_core::domain::GroupId;
    use credgroups_core::port::group_credentials::mocks::{MockGroupCredentials, EINVAL};
    use credgroups_core::port::process_identity::mocks::MockProcessIdentity;
    use credgroups_core::ErrorKind;

    fn groups(raw: &[u32]) -> GroupList {
        raw.iter().copied().map(GroupId::new).collect()
    }

    fn command(args: &[&str]) -> Commands {
        let argv = std::iter::once("credgroups").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    fn run_with(args: &[&str], mock: &Arc<MockGroupCredentials>) -> Result<Report> {
        let service = GroupService::new(mock.clone());
        run(command(args), &service, Arc::new(MockProcessIdentity::root()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_setgroups_positional() {
        let cli = Cli::try_parse_from(["credgroups", "setgroups", "100", "200"]).unwrap();
        match cli.command {
            Commands::Setgroups { gids, json } => {
                assert_eq!(gids, vec!["100", "200"]);
                assert!(json.is_none());
            }
            _ => panic!("expected setgroups"),
        }
    }

    #[test]
    fn test_parse_setgroups_json_conflicts_with_positional() {
        assert!(Cli::try_parse_from(["credgroups", "setgroups", "--json", "[1]", "2"]).is_err());
        assert!(Cli::try_parse_from(["credgroups", "setgroups", "--json", "[1]"]).is_ok());
    }

    #[test]
    fn test_parse_global_output_flag() {
        let cli = Cli::try_parse_from(["credgroups", "getgroups", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_parse_initgroups_requires_both_arguments() {
        assert!(Cli::try_parse_from(["credgroups", "initgroups", "alice"]).is_err());
        let cli = Cli::try_parse_from(["credgroups", "initgroups", "alice", "1000"]).unwrap();
        assert!(matches!(cli.command, Commands::Initgroups { ref user, ref gid } if user == "alice" && gid == "1000"));
    }

    #[test]
    fn test_setgroups_reports_applied_list_without_requery() {
        let mock = Arc::new(MockGroupCredentials::new(groups(&[4]), true));
        // Would fail a follow-up getgroups, if one were made
        mock.fail_next_get(EINVAL);

        let wanted = groups(&[100, 200]);
        let report = run_with(&["setgroups", "100", "200"], &mock).unwrap();
        assert!(matches!(report, Report::Setgroups { groups: ref applied } if *applied == wanted));

        let wanted = groups(&[300]);
        let report = run_with(&["setgroups", "--json", "[300]"], &mock).unwrap();
        assert!(matches!(report, Report::Setgroups { groups: ref applied } if *applied == wanted));
        assert_eq!(mock.snapshot(), wanted);
    }

    #[test]
    fn test_initgroups_succeeds_when_requery_fails() {
        let mock = Arc::new(
            MockGroupCredentials::new(groups(&[0]), true).with_member("alice", &[100, 200]),
        );
        mock.fail_next_get(EINVAL);

        let report = run_with(&["initgroups", "alice", "1000"], &mock).unwrap();
        match report {
            Report::Initgroups {
                user,
                primary_gid,
                groups: current,
            } => {
                assert_eq!(user, "alice");
                assert_eq!(primary_gid, 1000);
                assert!(current.is_none());
            }
            other => panic!("expected initgroups report, got {other:?}"),
        }
        assert!(mock.snapshot().same_members(&groups(&[1000, 100, 200])));
    }

    #[test]
    fn test_initgroups_reports_resulting_groups() {
        let mock = Arc::new(MockGroupCredentials::new(groups(&[0]), true).with_member("alice", &[100]));

        let report = run_with(&["initgroups", "alice", "1000"], &mock).unwrap();
        match report {
            Report::Initgroups { groups: Some(current), .. } => {
                assert!(current.same_members(&groups(&[1000, 100])));
            }
            other => panic!("expected initgroups report with groups, got {other:?}"),
        }
    }

    #[test]
    fn test_initgroups_bad_arguments_are_invalid_and_make_no_call() {
        let mock = Arc::new(MockGroupCredentials::new(groups(&[4]), true));

        for args in [["initgroups", "alice", "staff"], ["initgroups", "", "1000"]] {
            let err = run_with(&args, &mock).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{args:?}");
        }
        assert!(mock.journal().is_empty());
    }

    #[test]
    fn test_switch_user_succeeds_when_requery_fails() {
        let mock = Arc::new(MockGroupCredentials::new(groups(&[0]), true).with_member("www", &[33]));
        let service = GroupService::new(mock.clone());
        let identity = Arc::new(MockProcessIdentity::root().with_account("www", 33, 33));
        mock.fail_next_get(EINVAL);

        let report = run(command(&["switch-user", "www"]), &service, identity).unwrap();
        match report {
            Report::SwitchUser { account, groups } => {
                assert_eq!(account.uid.as_raw(), 33);
                assert!(groups.is_none());
            }
            other => panic!("expected switch-user report, got {other:?}"),
        }
    }
}
