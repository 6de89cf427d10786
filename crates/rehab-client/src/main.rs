use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use rehab_client::commands::{export, images, import, maintenance, project, templates};
use rehab_client::reconciler::PendingImport;
use rehab_client::{init_tracing, messages, AppState, ClientConfig};

#[derive(Parser)]
#[command(author, version, about = "Local store for rehabilitation exercise sheets")]
struct Cli {
    /// Directory holding the local store (overrides REHAB_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current project
    Show,
    /// Start a new empty project
    New {
        title: String,
        /// Discard the current project without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Append an exercise card
    AddCard {
        title: String,
        /// Stored image id or sample image id
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove an exercise card by id
    RemoveCard { id: String },
    /// Store an image file and print its id
    AddImage { path: PathBuf },
    /// Export the current project
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Zip)]
        format: ExportFormat,
        /// Output file; defaults to the download name in the working directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Open a project file (.zip or .json)
    Import {
        path: PathBuf,
        /// Overwrite the current project without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// List bundled templates
    Templates,
    /// Replace the current project with a template
    ApplyTemplate {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete the current project and its images
    Delete {
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove stored images no card references
    CleanupOrphans,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Project plus images
    Zip,
    /// Text only
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ClientConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    info!(data_dir = %config.data_dir.display(), "opening local store");

    let mut state = AppState::open(config)
        .await
        .context("failed to open the local store")?;

    if let Err(e) = run(cli.command, &mut state).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, state: &mut AppState) -> rehab_client::Result<()> {
    match command {
        Command::Show => {
            let summary = project::show(state);
            let json = serde_json::to_string_pretty(&summary)
                .map_err(io::Error::other)?;
            println!("{json}");
        }
        Command::New { title, yes } => {
            if state.session.has_unsaved_work()
                && !yes
                && !confirm(messages::IMPORT_CONFIRM_TITLE, messages::IMPORT_CONFIRM_DESCRIPTION)?
            {
                return Ok(());
            }
            project::new_project(state, &title).await?;
        }
        Command::AddCard { title, image } => {
            let id = project::add_card(state, &title, image.as_deref()).await?;
            println!("{id}");
        }
        Command::RemoveCard { id } => {
            project::remove_card(state, &id).await?;
            println!("{}", messages::DELETE_SUCCESS_MESSAGE);
        }
        Command::AddImage { path } => {
            let saved = images::add_image_file(state, &path).await?;
            println!("{}\t{}", saved.id, saved.display_name);
            eprintln!("{}", messages::IMAGE_SAVED_MESSAGE);
        }
        Command::Export { format, output } => {
            let file = match format {
                ExportFormat::Zip => export::export_zip(state).await?,
                ExportFormat::Json => export::export_json(state)?,
            };
            let cwd = std::env::current_dir()?;
            let written = export::write_export(&file, &cwd, output.as_deref()).await?;
            println!("{}", written.display());
        }
        Command::Import { path, yes } => {
            let pending = import::stage_path(state, &path).await?;
            if apply_pending(state, pending, yes).await? {
                println!("{}", messages::IMPORT_SUCCESS_MESSAGE);
            }
        }
        Command::Templates => {
            for t in templates::list_templates(state) {
                println!("{}\t{}（{}枚）\t{}", t.id, t.name, t.card_count, t.description);
            }
        }
        Command::ApplyTemplate { id, yes } => {
            let pending = import::stage_template(state, &id).await?;
            if apply_pending(state, pending, yes).await? {
                println!("{}", messages::TEMPLATE_APPLY_SUCCESS);
            }
        }
        Command::Delete { yes } => {
            if !yes
                && !confirm(
                    messages::PROJECT_DELETE_CONFIRM_TITLE,
                    messages::PROJECT_DELETE_CONFIRM_DESCRIPTION,
                )?
            {
                return Ok(());
            }
            maintenance::delete_project(state).await?;
            println!("{}", messages::PROJECT_DELETE_SUCCESS_MESSAGE);
        }
        Command::CleanupOrphans => {
            let removed = maintenance::cleanup_orphans(state).await?;
            println!("{}", messages::image_delete_success(removed));
        }
    }
    Ok(())
}

/// Returns false when the user declined and nothing was applied.
async fn apply_pending(
    state: &mut AppState,
    pending: PendingImport,
    yes: bool,
) -> rehab_client::Result<bool> {
    let confirmed = if !pending.requires_confirmation() {
        pending.proceed()?
    } else if yes || confirm(messages::IMPORT_CONFIRM_TITLE, messages::IMPORT_CONFIRM_DESCRIPTION)? {
        pending.confirm()
    } else {
        return Ok(false);
    };
    import::apply(state, confirmed).await?;
    Ok(true)
}

fn confirm(title: &str, description: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{title}: {description} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let accepted = matches!(answer.trim(), "y" | "Y" | "yes");
    if !accepted {
        eprintln!("{}", messages::BUTTON_CANCEL);
    }
    Ok(accepted)
}
