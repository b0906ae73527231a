use std::path::PathBuf;

use clap::Parser;

use crate::ssh::ConnectOptions;

#[derive(Debug, Parser)]
#[command(name = "scp-form", version, about = "Upload or download one file over SCP")]
pub(crate) struct Cli {
    /// History file used for autocomplete [default: <config dir>/scp-form/history.json]
    #[arg(long, value_name = "PATH")]
    pub(crate) history: Option<PathBuf>,

    /// Log file [default: <data dir>/scp-form/scp-form.log]
    #[arg(long, value_name = "PATH")]
    pub(crate) log_file: Option<PathBuf>,

    /// Known-hosts file for server key verification [default: ~/.ssh/known_hosts]
    #[arg(long, value_name = "PATH", conflicts_with = "accept_any_host_key")]
    pub(crate) known_hosts: Option<PathBuf>,

    /// Accept any server host key without verification
    #[arg(long)]
    pub(crate) accept_any_host_key: bool,
}

impl Cli {
    pub(crate) fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            known_hosts: self.known_hosts.clone(),
            accept_any_host_key: self.accept_any_host_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn host_key_checking_is_on_by_default() {
        let cli = Cli::parse_from(["scp-form"]);
        let options = cli.connect_options();
        assert!(!options.accept_any_host_key);
        assert!(options.known_hosts.is_none());
        assert!(cli.history.is_none());
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::parse_from([
            "scp-form",
            "--history",
            "/tmp/h.json",
            "--log-file",
            "/tmp/scp.log",
            "--accept-any-host-key",
        ]);
        assert_eq!(cli.history, Some(PathBuf::from("/tmp/h.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/scp.log")));
        assert!(cli.connect_options().accept_any_host_key);
    }

    #[test]
    fn known_hosts_conflicts_with_accept_any() {
        let result = Cli::try_parse_from([
            "scp-form",
            "--known-hosts",
            "/tmp/kh",
            "--accept-any-host-key",
        ]);
        assert!(result.is_err());
    }
}
