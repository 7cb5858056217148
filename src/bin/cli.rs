//! `mqlm-admin` - operate an MQL Manager backend from a terminal
//!
//! Every subcommand is one library call; results are printed as JSON on
//! stdout, logs go to stderr (`RUST_LOG=debug` for request tracing).
//!
//! ```bash
//! export MQLM_API_URL=http://127.0.0.1:8080
//! mqlm-admin login --token "$TOKEN"
//! mqlm-admin users list
//! mqlm-admin assign user-packages 7 1 2 3
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mqlm_admin::api::{
    AssociationDiff, ChannelQuery, CreateUserRequest, NewPackage, NewPlaylistFromUrl,
    NewSubscription, PlaylistUpload, PresenceQuery, UpdateUserRequest,
};
use mqlm_admin::{AdminClient, ClientConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mqlm-admin", version, about = "MQL Manager admin console")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "MQLM_API_URL", global = true)]
    api_url: Option<String>,

    /// File holding the session credential between runs
    #[arg(long, env = "MQLM_CREDENTIAL_FILE", global = true)]
    credential_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the backend
    Health,
    /// Store a credential, or continue without one
    Login(LoginArgs),
    /// Forget the stored credential
    Logout,
    /// Show whether this session is logged in
    Whoami,
    #[command(subcommand)]
    Users(UserCommand),
    #[command(subcommand)]
    Subscriptions(SubscriptionCommand),
    #[command(subcommand)]
    Playlists(PlaylistCommand),
    /// List channels
    Channels(ChannelArgs),
    #[command(subcommand)]
    Packages(PackageCommand),
    /// Replace an association set
    #[command(subcommand)]
    Assign(AssignCommand),
    /// Show device presence
    Presence {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, conflicts_with = "no_auth")]
    token: Option<String>,
    /// Continue without a credential (backend running without auth)
    #[arg(long)]
    no_auth: bool,
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    Get { id: i64 },
    /// User with subscriptions, packages and channels
    Show { id: i64 },
    Create {
        username: String,
        display_name: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long = "package", value_name = "ID")]
        packages: Vec<i64>,
        #[arg(long, requires = "expires_at")]
        plan: Option<String>,
        #[arg(long, requires = "plan")]
        expires_at: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
    },
    SetPassword { id: i64, password: String },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum SubscriptionCommand {
    List { user_id: i64 },
    Create { user_id: i64, plan: String, expires_at: String },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PlaylistCommand {
    List,
    AddUrl { name: String, url: String },
    Upload {
        path: PathBuf,
        #[arg(long, default_value = "")]
        name: String,
    },
    Delete { id: i64 },
    Reimport { id: i64 },
}

#[derive(Args)]
struct ChannelArgs {
    #[arg(long)]
    playlist: Option<i64>,
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Subcommand)]
enum PackageCommand {
    List,
    Get { id: i64 },
    Create {
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: i64,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum AssignCommand {
    /// Set (or with no id, clear) a user's playlist
    UserPlaylist { user_id: i64, playlist_id: Option<i64> },
    UserChannels(SetArgs),
    UserPackages(SetArgs),
    PackageChannels(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    owner_id: i64,
    /// Complete new set; ids not listed are removed
    ids: Vec<i64>,
    /// Only show what would change
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(path) = cli.credential_file {
        config.credential_file = Some(path);
    }

    let client = AdminClient::from_config(&config).context("failed to open admin session")?;
    run(&client, cli.command).await
}

async fn run(client: &AdminClient, command: Command) -> Result<()> {
    match command {
        Command::Health => print(&client.health().await?),
        Command::Login(args) => login(client, args).await,
        Command::Logout => {
            client.session().clear()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            println!("{}", client.session().snapshot().masked());
            Ok(())
        }
        Command::Users(cmd) => users(client, cmd).await,
        Command::Subscriptions(cmd) => subscriptions(client, cmd).await,
        Command::Playlists(cmd) => playlists(client, cmd).await,
        Command::Channels(args) => {
            let query = ChannelQuery {
                playlist_id: args.playlist,
                q: args.query,
                limit: args.limit,
            };
            print(&client.list_channels(&query).await?)
        }
        Command::Packages(cmd) => packages(client, cmd).await,
        Command::Assign(cmd) => assign(client, cmd).await,
        Command::Presence { all, limit } => {
            print(&client.list_presence(&PresenceQuery { all, limit }).await?)
        }
    }
}

async fn login(client: &AdminClient, args: LoginArgs) -> Result<()> {
    let session = client.session();
    if args.no_auth {
        session.mark_no_auth()?;
    } else if let Some(token) = args.token {
        session.set_credential(Some(&token))?;
        if !session.is_logged_in() {
            bail!("token is blank");
        }
    } else {
        let mode = client
            .detect_auth_mode()
            .await
            .context("health probe failed")?;
        if mode.needs_credential() && !session.is_logged_in() {
            bail!("backend requires a credential; pass --token");
        }
    }

    // Confirm the session actually works before reporting success.
    client
        .list_users()
        .await
        .context("credential rejected by backend")?;
    println!("{}", session.snapshot().masked());
    Ok(())
}

async fn users(client: &AdminClient, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::List => print(&client.list_users().await?),
        UserCommand::Get { id } => print(&client.get_user(id).await?),
        UserCommand::Show { id } => {
            let overview = client.user_overview(id).await?;
            print(&serde_json::json!({
                "user": overview.user,
                "subscriptions": overview.subscriptions,
                "packages": overview.packages,
                "channels": overview.channels,
            }))
        }
        UserCommand::Create {
            username,
            display_name,
            password,
            packages,
            plan,
            expires_at,
        } => {
            let mut request = CreateUserRequest::new(username, display_name);
            request.password = password;
            if !packages.is_empty() {
                request = request.with_packages(packages);
            }
            if let (Some(plan), Some(expires_at)) = (plan, expires_at) {
                request = request.with_subscription(NewSubscription::new(plan, expires_at));
            }
            print(&client.create_user(&request).await?)
        }
        UserCommand::Update {
            id,
            username,
            display_name,
        } => {
            let request = UpdateUserRequest {
                username,
                display_name,
            };
            print(&client.update_user(id, &request).await?)
        }
        UserCommand::SetPassword { id, password } => {
            print(&client.set_user_password(id, &password).await?)
        }
        UserCommand::Delete { id } => {
            client.delete_user(id).await?;
            println!("deleted user {id}");
            Ok(())
        }
    }
}

async fn subscriptions(client: &AdminClient, cmd: SubscriptionCommand) -> Result<()> {
    match cmd {
        SubscriptionCommand::List { user_id } => print(&client.list_subscriptions(user_id).await?),
        SubscriptionCommand::Create {
            user_id,
            plan,
            expires_at,
        } => print(
            &client
                .create_subscription(user_id, &NewSubscription::new(plan, expires_at))
                .await?,
        ),
        SubscriptionCommand::Delete { id } => {
            client.delete_subscription(id).await?;
            println!("deleted subscription {id}");
            Ok(())
        }
    }
}

async fn playlists(client: &AdminClient, cmd: PlaylistCommand) -> Result<()> {
    match cmd {
        PlaylistCommand::List => print(&client.list_playlists().await?),
        PlaylistCommand::AddUrl { name, url } => print(
            &client
                .create_playlist_from_url(&NewPlaylistFromUrl::new(name, url))
                .await?,
        ),
        PlaylistCommand::Upload { path, name } => {
            let upload = PlaylistUpload::from_path(name, &path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            print(&client.upload_playlist(upload).await?)
        }
        PlaylistCommand::Delete { id } => {
            client.delete_playlist(id).await?;
            println!("deleted playlist {id}");
            Ok(())
        }
        PlaylistCommand::Reimport { id } => print(&client.reimport_playlist(id).await?),
    }
}

async fn packages(client: &AdminClient, cmd: PackageCommand) -> Result<()> {
    match cmd {
        PackageCommand::List => print(&client.list_packages().await?),
        PackageCommand::Get { id } => print(&client.get_package(id).await?),
        PackageCommand::Create { name, price } => {
            print(&client.create_package(&NewPackage::new(name, price)).await?)
        }
        PackageCommand::Delete { id } => {
            client.delete_package(id).await?;
            println!("deleted package {id}");
            Ok(())
        }
    }
}

async fn assign(client: &AdminClient, cmd: AssignCommand) -> Result<()> {
    match cmd {
        AssignCommand::UserPlaylist {
            user_id,
            playlist_id,
        } => print(&client.set_user_playlist(user_id, playlist_id).await?),
        AssignCommand::UserChannels(args) => {
            if args.dry_run {
                return report(client.preview_user_channels(args.owner_id, &args.ids).await?);
            }
            print(&client.set_user_channels(args.owner_id, &args.ids).await?)
        }
        AssignCommand::UserPackages(args) => {
            if args.dry_run {
                return report(client.preview_user_packages(args.owner_id, &args.ids).await?);
            }
            print(&client.set_user_packages(args.owner_id, &args.ids).await?)
        }
        AssignCommand::PackageChannels(args) => {
            if args.dry_run {
                return report(client.preview_package_channels(args.owner_id, &args.ids).await?);
            }
            print(&client.set_package_channels(args.owner_id, &args.ids).await?)
        }
    }
}

fn report(diff: AssociationDiff) -> Result<()> {
    println!("{diff}");
    print(&serde_json::json!({
        "added": diff.added,
        "removed": diff.removed,
        "kept": diff.kept,
    }))
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
