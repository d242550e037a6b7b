mod args;

use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use tracing::{error, info};

use signup_form::{
    config::BASE_URL_ENV, logger, Config, Field, NavigationChannel, NotificationChannel,
    SignupClient, SignupForm, SignupFormSchema, SubmissionController, SubmitOutcome, VERSION,
};

use args::{parse_args, usage, Arg};

const CONFIG_FILE_NAME: &str = "config.toml";

/// `signup/config.toml` in the XDG configuration directory.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("signup");
        path.push(CONFIG_FILE_NAME);
        path
    })
}

fn load_config(args: &[Arg]) -> Result<Config, Box<dyn Error>> {
    let config_path = args.iter().find_map(|a| match a {
        Arg::ConfigPath(p) => Some(p.clone()),
        _ => None,
    });
    let base_url = args.iter().find_map(|a| match a {
        Arg::BaseUrl(url) => Some(url.clone()),
        _ => None,
    });

    let config = match (config_path, default_config_path()) {
        (Some(path), _) => Config::from_file(&path)?,
        (None, Some(path)) if path.exists() => Config::from_file(&path)?,
        _ => match base_url.clone().or_else(|| std::env::var(BASE_URL_ENV).ok()) {
            Some(url) => Config::new(url),
            None => {
                return Err(format!(
                    "no configuration found, use --config, --base-url or {}",
                    BASE_URL_ENV
                )
                .into())
            }
        },
    };

    let mut config = config.with_env_overrides();
    if let Some(url) = base_url {
        config.base_url = url;
    }
    Ok(config)
}

fn prompt(stdin: &mut impl BufRead, field: Field) -> Result<String, Box<dyn Error>> {
    eprint!("{}: ", field.label());
    io::stderr().flush()?;
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        return Err(format!("no input for {}", field.label()).into());
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Print each field with its inline messages, if any.
fn render(form: &SignupForm, controller: &SubmissionController<SignupClient>) {
    let state = controller.state();
    for field in Field::ALL {
        for message in form.messages(field, state.errors.as_ref()) {
            eprintln!("  {:<17} {}", field.label(), message);
        }
    }
}

async fn run(config: Config, args: &[Arg]) -> Result<(), Box<dyn Error>> {
    let notifications = NotificationChannel::new();
    let navigations = NavigationChannel::new();
    let client = SignupClient::with_path(config.base_url.clone(), config.signup_path.clone());
    info!("registering with {}", client.url());
    let controller = SubmissionController::new(
        client,
        Arc::new(notifications.sender()),
        Arc::new(navigations.sender()),
    )
    .with_redirect_path(config.redirect_path.clone());

    let mut form = SignupForm::new();
    for arg in args {
        match arg {
            Arg::Name(name) => form.on_update(Field::Name, name.clone()),
            Arg::Username(username) => form.on_update(Field::Username, username.clone()),
            _ => {}
        }
    }

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut to_prompt: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|f| f.is_secret() || form.value(*f).value.is_empty())
        .collect();

    loop {
        for field in &to_prompt {
            let value = prompt(&mut stdin, *field)?;
            form.on_update(*field, value);
        }

        eprintln!("{}", controller.state().submit_label());
        let outcome = controller.submit_form(&mut form, &SignupFormSchema).await;

        while let Some(message) = notifications.try_next() {
            eprintln!("error: {}", message);
        }

        match outcome {
            SubmitOutcome::Navigated(path) => {
                for target in navigations.drain() {
                    println!("Account created, continue at {}{}", config.base_url, target);
                }
                info!("signup complete, redirected to {}", path);
                return Ok(());
            }
            SubmitOutcome::Invalid(_) | SubmitOutcome::FieldErrors(_) => {
                render(&form, &controller);
                let state = controller.state();
                to_prompt = Field::ALL
                    .into_iter()
                    .filter(|f| !form.messages(*f, state.errors.as_ref()).is_empty())
                    .collect();
                if to_prompt.is_empty() {
                    // Errors on keys that are not form inputs, nothing to fix here.
                    return Err("signup rejected".into());
                }
            }
            SubmitOutcome::Notified(_) => {
                eprint!("Retry? [y/N] ");
                io::stderr().flush()?;
                let mut answer = String::new();
                stdin.read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    return Err("signup failed".into());
                }
                to_prompt.clear();
            }
            SubmitOutcome::Rejected => return Err("a submission is already in flight".into()),
        }
    }
}

fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let level = logger::parse_log_level()?.unwrap_or(config.log_level);
    logger::setup_logger(level, config.log_file.as_deref())
}

#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let app_name = argv
        .first()
        .and_then(|a| Path::new(a).file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("signup")
        .to_string();

    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", usage(&app_name));
            process::exit(1);
        }
    };
    if args.contains(&Arg::Version) {
        eprintln!("{}", VERSION);
        process::exit(0);
    }
    if args.contains(&Arg::Help) {
        eprintln!("{}", usage(&app_name));
        process::exit(0);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = setup_logging(&config) {
        eprintln!("Failed to set up logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(config, &args).await {
        error!("{}", e);
        process::exit(1);
    }
}
