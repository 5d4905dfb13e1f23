//! zenin-run: headless access to the analysis service.
//!
//! Drives the same workflows as the browser console: inspect configuration
//! and profile sets, submit recordings, and read back results.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use zenin_client::data_source::{read_file, read_folder, resolve_folder, resolve_single};
use zenin_client::model::{display_timestamp, Band, RunResult};
use zenin_client::settings::ClientSettings;
use zenin_client::workflow::{ProfileSetEditor, ResultView, RunSubmission, RunsHistory, SubmissionState};
use zenin_client::{Backend, HttpBackend};

#[derive(Parser, Debug)]
#[command(name = "zenin-run")]
#[command(about = "Submit recordings to the Zenin analysis service and inspect runs")]
#[command(version)]
struct Args {
    /// Backend address (overrides ZENIN_API_URL and the settings file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the backend's default run configuration as JSON
    Config,

    /// Manage profile sets
    #[command(subcommand)]
    Profiles(ProfilesCommand),

    /// Submit a recording file or a folder of recordings
    Run {
        /// Recording file, or folder of recordings
        path: PathBuf,

        /// Profile set to classify against
        #[arg(long)]
        profile_set: Option<String>,

        /// Treat the path as a location on the server instead of uploading
        #[arg(long)]
        server: bool,
    },

    /// Inspect past runs
    #[command(subcommand)]
    Runs(RunsCommand),
}

#[derive(Subcommand, Debug)]
enum ProfilesCommand {
    List,
    Show { id: String },
    Create { name: String },
    Duplicate { id: String },
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum RunsCommand {
    List,
    Show { run_id: String },
    Log { run_id: String },
    Summary {
        run_id: String,
        /// Also save the spreadsheet to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = ClientSettings::load(args.config.as_deref())?;
    let base = settings.api_base(args.api_url.as_deref())?;
    info!("Using backend at {}", base.as_str());
    let backend = HttpBackend::new(base);

    match args.command {
        Command::Config => {
            let config = backend.default_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Profiles(command) => profiles(&backend, command).await?,
        Command::Run {
            path,
            profile_set,
            server,
        } => run(&backend, &settings, &path, profile_set, server).await?,
        Command::Runs(command) => runs(&backend, command).await?,
    }
    Ok(())
}

async fn profiles(backend: &HttpBackend, command: ProfilesCommand) -> Result<()> {
    let mut editor = ProfileSetEditor::new();
    match command {
        ProfilesCommand::List => {
            editor.load(backend).await?;
            for set in editor.summaries() {
                println!("{:<24} {:<32} {:>3} profiles", set.id, set.name, set.profile_count);
            }
        }
        ProfilesCommand::Show { id } => {
            editor.select(backend, &id).await?;
            if let Some(set) = editor.current() {
                println!("{} ({})", set.name, set.id);
                if !set.description.is_empty() {
                    println!("{}", set.description);
                }
                let header: Vec<&str> = Band::ALL.iter().map(|b| b.name()).collect();
                println!("{:<24} {}", "Profile", header.join(" | "));
                for profile in &set.profiles {
                    let levels: Vec<&str> = Band::ALL.iter().map(|b| profile.level(*b).as_str()).collect();
                    println!("{:<24} {}", profile.id, levels.join(" | "));
                }
            }
        }
        ProfilesCommand::Create { name } => {
            editor.create(backend, &name).await?;
            if let Some(id) = editor.selected_id() {
                println!("Created profile set '{}'", id);
            }
        }
        ProfilesCommand::Duplicate { id } => {
            editor.select(backend, &id).await?;
            editor.duplicate(backend).await?;
            if let Some(copy) = editor.selected_id() {
                println!("Duplicated '{}' as '{}'", id, copy);
            }
        }
        ProfilesCommand::Delete { id, yes } => {
            editor.select(backend, &id).await?;
            let token = editor.request_delete()?;
            if !yes {
                bail!("Refusing to delete '{}' without --yes", token.id());
            }
            editor.confirm_delete(backend, token).await?;
            println!("Deleted profile set '{}'", id);
        }
    }
    Ok(())
}

async fn run(
    backend: &HttpBackend,
    settings: &ClientSettings,
    path: &Path,
    profile_set: Option<String>,
    server: bool,
) -> Result<()> {
    let mut config = backend
        .default_config()
        .await
        .context("Could not fetch the default configuration")?;
    if let Some(id) = profile_set {
        config.profile_set_id = id;
    }

    let mut submission = RunSubmission::new();
    let request = if server {
        let location = path.to_string_lossy().into_owned();
        if path.is_dir() || location.ends_with('/') {
            config.data_root = Some(location);
            submission.begin_server_batch(Some(&config))?
        } else {
            submission.begin_server_single(Some(&config), &location)?
        }
    } else {
        let payload = if path.is_dir() {
            resolve_folder(read_folder(path)?, &settings.extension)
        } else {
            resolve_single(Some(read_file(path)?))
        };
        if let Some(payload) = &payload {
            let summary = payload.summary(settings.preview_limit);
            println!("{} ({})", payload.describe(), summary.total_size_label());
            for name in &summary.preview {
                println!("  {}", name);
            }
            if let Some(more) = summary.more_label() {
                println!("  {}", more);
            }
        }
        submission.begin(Some(&config), payload.as_ref())?
    };

    submission.run(backend, request).await;
    match submission.state() {
        SubmissionState::Succeeded(result) => {
            print_result(result);
            print_artifacts(backend, submission.view());
            Ok(())
        }
        SubmissionState::Failed(message) => bail!("{}", message),
        other => bail!("Submission ended in unexpected state {:?}", other),
    }
}

async fn runs(backend: &HttpBackend, command: RunsCommand) -> Result<()> {
    let mut history = RunsHistory::new();
    match command {
        RunsCommand::List => {
            history.load(backend).await;
            if let Some(error) = history.error() {
                bail!("{}", error);
            }
            for run in history.runs() {
                println!(
                    "{}  {}  {:<16} files={} matched={} unmatched={}  {}",
                    run.run_id,
                    display_timestamp(&run.timestamp),
                    run.profile_set_id,
                    run.processed_files,
                    run.matched_count,
                    run.unmatched_count,
                    run.config_label()
                );
            }
        }
        RunsCommand::Show { run_id } => {
            open_run(backend, &mut history, &run_id).await?;
            history.view_mut().load_summary(backend).await;
            if let Some(result) = history.view().result() {
                print_result(result);
            }
            print_artifacts(backend, history.view());
        }
        RunsCommand::Log { run_id } => {
            open_run(backend, &mut history, &run_id).await?;
            let view = history.view_mut();
            view.load_log(backend).await;
            if let Some(error) = view.log_error() {
                bail!("{}", error);
            }
            print!("{}", view.log().unwrap_or_default());
        }
        RunsCommand::Summary { run_id, output } => {
            open_run(backend, &mut history, &run_id).await?;
            let view = history.view_mut();
            view.load_summary(backend).await;
            if let Some(error) = view.summary_error() {
                bail!("{}", error);
            }
            let sheets: Vec<String> = view
                .summary()
                .map(|s| s.sheet_names().map(str::to_string).collect())
                .unwrap_or_default();
            if sheets.is_empty() {
                println!("Run {} has no summary", run_id);
            }
            for sheet in sheets {
                view.select_sheet(&sheet);
                println!("== {} ==", sheet);
                let columns = view.columns();
                println!("{}", columns.join("\t"));
                for row in view.active_rows() {
                    let cells: Vec<String> = columns.iter().map(|c| row.display(c)).collect();
                    println!("{}", cells.join("\t"));
                }
            }
            if let Some(output) = output {
                let bytes = backend.download_summary(&run_id).await?;
                std::fs::write(&output, bytes)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!("Saved spreadsheet to {}", output.display());
            }
        }
    }
    Ok(())
}

async fn open_run(backend: &HttpBackend, history: &mut RunsHistory, run_id: &str) -> Result<()> {
    history.open(backend, run_id).await;
    if let Some(error) = history.error() {
        bail!("{}", error);
    }
    Ok(())
}

fn print_result(result: &RunResult) {
    println!("Run {} at {}", result.run_id, display_timestamp(&result.timestamp));
    println!("  profile set:     {}", result.config.profile_set_id);
    println!("  processed files: {}", result.processed_files);
    println!("  matched:         {}", result.matched_count);
    println!("  unmatched:       {}", result.unmatched_count);
    println!("  log:             {}", result.log_file);
    println!("  plots:           {}", result.plots_dir);
    if let Some(summary) = &result.summary_xlsx {
        println!("  summary:         {}", summary);
    }
}

fn print_artifacts(backend: &HttpBackend, view: &ResultView) {
    let Some(run_id) = view.run_id() else {
        return;
    };
    let base = backend.base();
    if let Some(error) = view.plots_error() {
        println!("Plots: {}", error);
    } else if view.plots().is_empty() {
        println!("No plots generated");
    } else {
        println!("Plots ({}):", view.plots().len());
        for name in view.plots() {
            println!("  {}", base.plot_url(run_id, name));
        }
    }
    println!("Log: {}", base.log_url(run_id));
    if let Some(error) = view.summary_error() {
        println!("Summary: {}", error);
    } else if view.summary().is_some() {
        println!("Summary: {}", base.summary_download_url(run_id));
    }
}
