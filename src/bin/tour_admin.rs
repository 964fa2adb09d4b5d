use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use tour_admin::client::{load_session_file, save_session_file, ApiClient, ClientError, SessionGuard};
use tour_admin::domains::tour::models::{Tour, TourInput};
use tour_admin::shared::clients::ImageUpload;

/// Terminal dashboard for the tour admin API
#[derive(Parser)]
#[command(name = "tour_admin", version)]
struct Cli {
    /// API base URL
    #[arg(long, env = "TOUR_ADMIN_API", default_value = "http://localhost:8000")]
    base_url: String,

    /// Where the login session is kept between commands
    #[arg(long, default_value = ".tour_admin_session.json")]
    session_file: PathBuf,

    /// Emit JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TOUR_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and remove the stored session
    Logout,

    /// Show the logged-in identity
    Whoami,

    /// List your tours, newest first
    List {
        /// Case-insensitive match on name or location
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one tour
    Show { tour_id: Uuid },

    /// Create a tour (admin)
    Create {
        #[command(flatten)]
        fields: TourFields,
        /// Image file
        #[arg(long)]
        image: PathBuf,
    },

    /// Update a tour's fields (admin)
    Update {
        tour_id: Uuid,
        #[command(flatten)]
        fields: TourFields,
    },

    /// Replace a tour's image (admin)
    UploadImage { tour_id: Uuid, path: PathBuf },
}

#[derive(Args)]
struct TourFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    price: f64,
    /// Duration in days
    #[arg(long)]
    duration: f64,
}

impl From<TourFields> for TourInput {
    fn from(fields: TourFields) -> Self {
        TourInput {
            name: fields.name,
            description: fields.description,
            location: fields.location,
            price: fields.price,
            duration: fields.duration,
        }
    }
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let content_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => bail!("Only image files are allowed (jpg, png, gif, webp): {}", path.display()),
    };
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(ImageUpload {
        bytes,
        file_name,
        content_type: content_type.to_string(),
    })
}

fn print_tour(tour: &Tour) {
    println!("{}  {}", tour.id, tour.name);
    println!("  location:    {}", tour.location);
    println!("  price:       {}", tour.price);
    println!("  duration:    {} day(s)", tour.duration);
    println!("  description: {}", tour.description);
    println!("  image:       {}", tour.image_url);
}

fn emit<T: serde::Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

async fn run(guard: &mut SessionGuard, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let session = guard.login(&email, &password).await?;
            println!("Logged in as {} ({})", session.user.email, session.user.role);
        }
        Commands::Logout => {
            guard.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let user = guard.me().await?;
            emit(json, &user, |user| {
                println!(
                    "{} {} <{}> role={} id={}",
                    user.first_name, user.last_name, user.email, user.role, user.id
                )
            })?;
        }
        Commands::List { search } => {
            let tours = guard.list_tours(search.as_deref()).await?;
            emit(json, &tours, |tours| {
                if tours.is_empty() {
                    println!("No tours");
                }
                for tour in tours {
                    println!("{}  {:<30} {:<20} {:>10}", tour.id, tour.name, tour.location, tour.price);
                }
            })?;
        }
        Commands::Show { tour_id } => {
            let tour = guard.get_tour(tour_id).await?;
            emit(json, &tour, print_tour)?;
        }
        Commands::Create { fields, image } => {
            let image = read_image(&image)?;
            let tour = guard.create_tour(&fields.into(), &image).await?;
            emit(json, &tour, print_tour)?;
        }
        Commands::Update { tour_id, fields } => {
            let tour = guard.update_tour(tour_id, &fields.into()).await?;
            emit(json, &tour, print_tour)?;
        }
        Commands::UploadImage { tour_id, path } => {
            let image = read_image(&path)?;
            let uploaded = guard.upload_tour_image(tour_id, &image).await?;
            emit(json, &uploaded, |image| println!("Image replaced: {}", image.image_url))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.base_url)?;
    let session = load_session_file(&cli.session_file)
        .with_context(|| format!("Failed to load session from {}", cli.session_file.display()))?;
    let mut guard = SessionGuard::new(api, session);

    let result = run(&mut guard, cli.command, cli.json).await;
    save_session_file(&cli.session_file, guard.session())
        .with_context(|| format!("Failed to save session to {}", cli.session_file.display()))?;

    if let Err(e) = &result {
        if let Some(ClientError::SessionExpired | ClientError::NotAuthenticated) = e.downcast_ref::<ClientError>() {
            bail!("Session expired or missing, run `tour_admin login` first");
        }
    }
    result
}
