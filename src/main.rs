use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uni_social::api::{HttpApiClient, SocialApi};
use uni_social::auth::{LoginForm, LoginOutcome};
use uni_social::composer::{PostComposer, SubmitOutcome};
use uni_social::host::RecordingNotifier;
use uni_social::models::{Config, Visibility};
use uni_social::reports::{export::export_csv, DownloadOutcome, ReportId, ReportState, ReportViewer};

const DEFAULT_LOG_FILTER: &str = "uni_social=info";

/// University social network client
#[derive(Parser)]
#[command(name = "uni-social")]
#[command(version)]
#[command(about = "Terminal client for the university social network: post, log in and browse reports")]
struct Cli {
    /// Override UNI_API_BASE_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal app (default)
    Tui,
    /// Log in and persist the session
    Login {
        #[arg(long, short = 'e')]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, short = 'p')]
        password: Option<String>,
    },
    /// Forget the persisted session
    Logout,
    /// Show the user of the persisted session
    Whoami,
    /// Publish a post
    Post {
        #[arg(long, short = 't')]
        text: String,
        /// publico, conexiones or privado
        #[arg(long, short = 'v', default_value = "publico")]
        visibility: Visibility,
        /// Image attached to the post
        #[arg(long, short = 'i')]
        image: Option<PathBuf>,
    },
    /// Print a report summary and its ranked table
    Report {
        /// authority or areas
        report: ReportId,
        /// Also download the server-rendered PDF
        #[arg(long)]
        pdf: bool,
        /// Write the ranked table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// The TUI owns the terminal, so its logs go to a file
fn init_file_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("setting default subscriber failed: {}", e))
}

fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("setting default subscriber failed: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration Error: {}", e);
            eprintln!("Check UNI_API_BASE_URL in your environment or .env file.");
            std::process::exit(1);
        }
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url = Config::parse_base_url(url)?;
    }

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            init_file_logging(&config)?;
            info!("Starting TUI against {}", config.api_base_url);
            if let Err(e) = uni_social::ui::run_app(config).await {
                error!("TUI failed: {}", e);
                eprintln!("❌ TUI Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        command => {
            init_stderr_logging()?;
            let client = HttpApiClient::new(&config)?;
            run_command(command, &client).await
        }
    }
}

async fn run_command(command: Commands, client: &HttpApiClient) -> Result<()> {
    match command {
        Commands::Tui => Ok(()),
        Commands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            login(client, &email, &password).await
        }
        Commands::Logout => {
            client.logout()?;
            println!("Sesión cerrada");
            Ok(())
        }
        Commands::Whoami => {
            match client.get_current_user() {
                Some(user) => println!("{}", user.display_name()),
                None => println!("Sin sesión activa"),
            }
            Ok(())
        }
        Commands::Post { text, visibility, image } => post(client, text, visibility, image).await,
        Commands::Report { report, pdf, csv } => print_report(client, report, pdf, csv).await,
    }
}

fn prompt_password() -> Result<String> {
    print!("Contraseña: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn login(api: &dyn SocialApi, email: &str, password: &str) -> Result<()> {
    let mut form = LoginForm::new();
    form.set_email(email);
    form.set_password(password);

    let notifier = RecordingNotifier::new();
    match form.submit(api, &notifier).await? {
        LoginOutcome::LoggedIn => {
            let name = api
                .get_current_user()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| email.to_string());
            println!("✅ Bienvenido, {}", name);
            Ok(())
        }
        LoginOutcome::Failed(message) => bail!(message),
    }
}

async fn post(
    api: &dyn SocialApi,
    text: String,
    visibility: Visibility,
    image: Option<PathBuf>,
) -> Result<()> {
    let mut composer = PostComposer::new();
    composer.set_text(text);
    composer.set_visibility(visibility);
    if let Some(path) = image {
        composer
            .attach_image(&path)
            .with_context(|| format!("cannot attach {}", path.display()))?;
    }

    let notifier = RecordingNotifier::new();
    match composer.submit(api, &notifier).await? {
        SubmitOutcome::Posted => {
            println!("✅ Publicación creada ({})", visibility);
            Ok(())
        }
        SubmitOutcome::Failed(message) => bail!(message),
    }
}

async fn print_report(
    api: &dyn SocialApi,
    report: ReportId,
    pdf: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let mut viewer = ReportViewer::for_report(report);
    viewer.load(api).await;

    let spec = viewer.spec().clone();
    println!("{}", spec.title);
    println!("{}", spec.description);
    println!();

    let rows = match viewer.state() {
        ReportState::Loaded(rows) => rows.clone(),
        ReportState::Failed(message) => bail!(message.clone()),
        ReportState::Loading => bail!("report did not finish loading"),
    };

    if let Some(summary) = viewer.summary() {
        for metric in &summary.metrics {
            println!("{:<22} {}", metric.label, metric.value);
        }
        println!();
    }

    if rows.is_empty() {
        println!("{}", spec.empty_message);
    } else {
        let mut header = format!("{:>4}", "#");
        for column in &spec.columns {
            header.push_str(&format!("  {:<28}", column.header));
        }
        println!("{}", header);
        for (index, row) in rows.iter().enumerate() {
            let mut line = format!("{:>4}", index + 1);
            for column in &spec.columns {
                line.push_str(&format!("  {:<28}", row.cell(column)));
            }
            println!("{}", line);
        }
    }

    if let Some(path) = csv {
        let written = export_csv(&spec, &rows, &path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("📄 {} filas exportadas a {}", written, path.display());
    }

    if pdf {
        match viewer.download_pdf(api).await {
            DownloadOutcome::Saved(path) => println!("📄 PDF guardado en {}", path.display()),
            DownloadOutcome::Failed(alert) => bail!("{}: {}", alert.title, alert.message),
            DownloadOutcome::Skipped => {}
        }
    }

    Ok(())
}
