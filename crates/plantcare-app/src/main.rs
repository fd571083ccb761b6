#![warn(missing_docs)]
//! # plantcare binary
//!
//! Terminal entry point for the plant-care client.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plantcare_app::render::{render_notification, render_profile, render_screen};
use plantcare_app::{AppError, Config, app_version, build_router, init_logging, redact_sensitive};
use plantcare_core::decode_image;
use plantcare_ui::{Notification, NotificationLevel, Route, Router, Screen};

/// Plant disease detection client.
#[derive(Parser)]
#[command(name = "plantcare", version = app_version(), long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        username: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Sign in and store the session token
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Show the dashboard with recent predictions
    Home,
    /// List prediction history
    History,
    /// Show one prediction
    Show {
        /// Prediction id
        id: String,
        /// Write the uploaded photo to this path
        #[arg(long, value_name = "PATH")]
        save_image: Option<PathBuf>,
    },
    /// Upload a JPG, PNG or WEBP photo for classification
    Upload {
        /// Image file
        path: PathBuf,
    },
    /// Open a client route such as `/history/42`
    Open {
        /// Route path
        route: String,
    },
    /// Inspect configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,
        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// CLI entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("plantcare: {}", redact_sensitive(&error.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, AppError> {
    let config = Config::load()?;

    if let Command::Config { show, path } = command {
        return show_config(&config, show, path);
    }

    init_logging(&config)?;
    tracing::info!(stage = "app", action = "start", version = app_version());
    let mut router = build_router(&config)?;
    let header_only = matches!(command, Command::Whoami);

    let notifications = match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let mut notifications = router.open(Route::Register);
            notifications.extend(router.dispatch(|screen, api| match screen {
                Screen::Register(page) => {
                    let form = page.form_mut();
                    form.username = username;
                    form.email = email;
                    form.password = password;
                    page.submit(api)
                }
                _ => Default::default(),
            }));
            notifications
        }
        Command::Login { email, password } => {
            let mut notifications = router.open(Route::Login);
            notifications.extend(router.dispatch(|screen, api| match screen {
                Screen::Login(page) => {
                    let form = page.form_mut();
                    form.email = email;
                    form.password = password;
                    page.submit(api)
                }
                _ => Default::default(),
            }));
            notifications
        }
        Command::Logout => router.logout(),
        Command::Whoami => router.load_profile(),
        Command::Home => router.open(Route::Home),
        Command::History => router.open(Route::History),
        Command::Show { id, save_image } => {
            let notifications = router.open(Route::HistoryDetail(id));
            if let Some(target) = save_image {
                save_detail_image(&router, &target)?;
            }
            notifications
        }
        Command::Upload { path } => {
            let mut notifications = router.open(Route::Home);
            if matches!(router.screen(), Screen::Home(_)) {
                notifications.extend(router.dispatch(|screen, api| match screen {
                    Screen::Home(page) => {
                        let mut effects = page.upload_mut().select_path(&path);
                        if effects.is_empty() {
                            effects = page.upload_mut().submit(api);
                        }
                        effects
                    }
                    _ => Default::default(),
                }));
            }
            notifications
        }
        Command::Open { route } => router.open(Route::parse(&route)?),
        Command::Config { .. } => Vec::new(),
    };

    let view = if header_only {
        render_profile(&router)
    } else {
        render_screen(&router)
    };
    Ok(present(&notifications, &view))
}

/// Prints notifications and the rendered view. Any error notification makes
/// the run fail.
fn present(notifications: &[Notification], view: &str) -> ExitCode {
    for notification in notifications {
        match notification.level {
            NotificationLevel::Success => println!("{}", render_notification(notification)),
            NotificationLevel::Error => eprintln!("{}", render_notification(notification)),
        }
    }
    print!("{view}");

    if notifications
        .iter()
        .any(|notification| notification.level == NotificationLevel::Error)
    {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn save_detail_image(router: &Router, target: &Path) -> Result<(), AppError> {
    let Screen::Detail(page) = router.screen() else {
        return Ok(());
    };
    let Some(detail) = page.state().ready() else {
        return Ok(());
    };

    let bytes = decode_image(detail.image.as_deref().unwrap_or_default())?;
    std::fs::write(target, &bytes).map_err(|source| AppError::Write {
        path: target.to_path_buf(),
        source,
    })?;
    println!("Saved image to {} ({} bytes)", target.display(), bytes.len());
    Ok(())
}

fn show_config(config: &Config, show: bool, path: bool) -> Result<ExitCode, AppError> {
    if path || !show {
        match Config::config_path() {
            Some(config_path) => println!("{}", config_path.display()),
            None => println!("(no home directory; using defaults)"),
        }
    }
    if show {
        print!("{}", config.to_toml()?);
    }
    Ok(ExitCode::SUCCESS)
}
