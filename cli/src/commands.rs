//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for dealdesk
#[derive(Parser, Debug)]
#[command(name = "dealdesk")]
#[command(author, version, about = "Tenant-scoped CRM tools for LLM agents")]
#[command(long_about = r#"
dealdesk exposes a catalog of CRM tools (deals, contacts, activities, notes,
stages and pipeline analytics) that an LLM agent can call. Every call is
bound to one organization; rows of other organizations are never visible.

Configuration files are loaded from (later entries win):
1. ~/.config/dealdesk/config.toml   Global config
2. ./dealdesk.toml                  Project-level config
3. --config <path>                  Explicit config file
4. DEALDESK_<SECTION>__<KEY>        Environment variables

Example:
  dealdesk list-tools --read-only
  dealdesk --seed fixtures/sales_seed.json --org org-acme --owner seller-1 \
      --board board-s1 call listStagnantDeals '{"daysStagnant": 10}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the JSON Schema of every tool
    ListTools {
        /// Only tools that never write
        #[arg(long)]
        read_only: bool,
    },

    /// Execute one tool call against a seeded store
    Call(CallArgs),

    /// Show the effective configuration and where it was loaded from
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name or alias (e.g. moveDeal, winDeal)
    pub tool: String,

    /// Arguments as a JSON object
    #[arg(default_value = "{}")]
    pub args: String,

    /// JSON seed file loaded into the in-memory store
    #[arg(long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Organization the call acts for
    #[arg(long, value_name = "ID")]
    pub org: String,

    /// Profile that owns created records
    #[arg(long, value_name = "ID")]
    pub owner: String,

    /// Acting user recorded in the audit trail (defaults to --owner)
    #[arg(long, value_name = "ID")]
    pub user: Option<String>,

    /// Board in focus
    #[arg(long, value_name = "ID")]
    pub board: Option<String>,

    /// Deal in focus
    #[arg(long, value_name = "ID")]
    pub deal: Option<String>,

    /// Stage label that counts as won when no lifecycle link exists
    #[arg(long, value_name = "LABEL")]
    pub won_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::parse_from([
            "dealdesk",
            "-vv",
            "call",
            "moveDeal",
            r#"{"dealId":"d1","stageName":"Proposta"}"#,
            "--org",
            "org-acme",
            "--owner",
            "seller-1",
            "--board",
            "board-s1",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Call(args) = cli.command else {
            panic!("expected call");
        };
        assert_eq!(args.tool, "moveDeal");
        assert_eq!(args.board.as_deref(), Some("board-s1"));
        assert!(args.user.is_none());
    }

    #[test]
    fn test_call_args_default_to_empty_object() {
        let cli = Cli::parse_from([
            "dealdesk", "call", "listStages", "--org", "o", "--owner", "u",
        ]);
        let Command::Call(args) = cli.command else {
            panic!("expected call");
        };
        assert_eq!(args.args, "{}");
    }
}
