//! The operation the binary runs after authenticating

use anyhow::{Result, bail};
use serde_json::Value;
use tindr::Tindr;

/// One post-authentication request, chosen from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Recs,
    Groups,
    Profile,
    Updates,
    Like(String),
    Pass(String),
    SendToken(String),
}

impl Command {
    /// Parse positional arguments (program name and `--config <path>` already removed).
    ///
    /// No arguments means `recs`.
    pub fn parse(args: &[&str]) -> Result<Self> {
        let command = match args {
            [] | ["recs"] => Command::Recs,
            ["groups"] => Command::Groups,
            ["profile"] => Command::Profile,
            ["updates"] => Command::Updates,
            ["like", user] => Command::Like((*user).to_string()),
            ["pass", user] => Command::Pass((*user).to_string()),
            ["send-token", phone] => Command::SendToken((*phone).to_string()),
            _ => bail!(
                "usage: tindr [--config <path>] [recs | groups | profile | updates | like <user> | pass <user> | send-token <phone>]"
            ),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Recs => "recs",
            Command::Groups => "groups",
            Command::Profile => "profile",
            Command::Updates => "updates",
            Command::Like(_) => "like",
            Command::Pass(_) => "pass",
            Command::SendToken(_) => "send-token",
        }
    }

    pub async fn run(&self, client: &Tindr) -> tindr::Result<Value> {
        match self {
            Command::Recs => client.get_recommendations().await,
            Command::Groups => client.get_groups().await,
            Command::Profile => client.my_profile().await,
            Command::Updates => client.update().await,
            Command::Like(user) => client.like(user).await,
            Command::Pass(user) => client.pass(user).await,
            Command::SendToken(phone) => client.send_token(phone).await,
        }
    }
}

/// Split raw process args into the `--config` value and the remaining positionals.
pub fn split_args(args: &[String]) -> (Option<&str>, Vec<&str>) {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config = iter.next().map(String::as_str);
        } else {
            rest.push(arg.as_str());
        }
    }
    (config, rest)
}
