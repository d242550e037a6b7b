//! Command-line argument parsing for the signup front-end.

use std::{error::Error, fmt::Display, path::PathBuf};

/// Parsed command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    ConfigPath(PathBuf),
    BaseUrl(String),
    Name(String),
    Username(String),
    Version,
    Help,
}

pub fn usage(app_name: &str) -> String {
    format!(
        r#"
Usage: {app_name} [OPTIONS]

Options:
    --config <PATH>     Path of the configuration file
    --base-url <URL>    Signup service to register with
    --name <NAME>       Full name, prompted if missing
    --username <NAME>   Username, prompted if missing
    -v, --version       Display {app_name} version
    -h, --help          Print help

Passwords are always prompted.
        "#
    )
}

/// Parse command-line arguments, `args[0]` being the program name.
pub fn parse_args(args: &[String]) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| -> Result<String, Box<dyn Error>> {
            iter.next()
                .cloned()
                .ok_or_else(|| missing(flag).into())
        };
        match arg.as_str() {
            "-v" | "--version" => res.push(Arg::Version),
            "-h" | "--help" => res.push(Arg::Help),
            "--config" => res.push(Arg::ConfigPath(PathBuf::from(value("--config")?))),
            "--base-url" => res.push(Arg::BaseUrl(value("--base-url")?)),
            "--name" => res.push(Arg::Name(value("--name")?)),
            "--username" => res.push(Arg::Username(value("--username")?)),
            other => return Err(format!("unknown argument '{}'", other).into()),
        }
    }

    Ok(res)
}

fn missing(flag: impl Display) -> String {
    format!("missing arg to {}", flag)
}
