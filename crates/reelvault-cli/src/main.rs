//! Reelvault operations CLI.
//!
//! Provisions the Dropbox delivery tree and manages the backing database.
//! Credentials come from the environment (or a local `.env` file); each
//! command reports the exact variables it is missing.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use reelvault_cli::{format_size, init_tracing, truncate_string};
use reelvault_core::constants::{CLIENTS_ROOT, DASHBOARD_ROOT, LIST_PAGE_LIMIT};
use reelvault_core::{Entry, OpsConfig, RemotePath};
use reelvault_db::{
    apply_sql_file, connect, list_tables, ping, server_version, table_count, BucketConfig,
    PlatformClient,
};
use reelvault_dropbox::{
    list_children, walk, DropboxClient, FolderProvisioner, TreeNode, TreeNodeKind,
};

#[derive(Parser)]
#[command(name = "reelvault", about = "Reelvault operations CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dropbox folder operations
    Folders {
        #[command(subcommand)]
        sub: FolderCommands,
    },
    /// Database and platform operations
    Db {
        #[command(subcommand)]
        sub: DbCommands,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Provision the dashboard folder skeleton
    Setup,
    /// Provision a client folder under the clients root
    Client {
        /// Client folder name
        name: String,
    },
    /// List a folder, folders first
    Ls {
        /// Folder path (defaults to the clients root)
        path: Option<String>,
    },
    /// Print a folder tree with video classification
    Tree {
        /// Folder path (defaults to the dashboard root)
        path: Option<String>,
        /// Maximum folder depth to descend
        #[arg(long, default_value = "3")]
        depth: u32,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Verify database connectivity and the expected tables
    Check,
    /// Apply a SQL file to the database
    Migrate {
        /// Path to the SQL file
        file: std::path::PathBuf,
        /// Apply through the platform SQL RPC instead of a direct connection
        #[arg(long)]
        rpc: bool,
    },
    /// List tables and row counts
    Schema {
        /// Schema to inspect
        #[arg(long, default_value = "public")]
        schema: String,
    },
    /// Ensure the storage buckets exist
    Buckets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = OpsConfig::from_env().context("Failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Folders { sub } => match sub {
            FolderCommands::Setup => folders_setup(&config).await?,
            FolderCommands::Client { name } => folders_client(&config, &name).await?,
            FolderCommands::Ls { path } => folders_ls(&config, path.as_deref()).await?,
            FolderCommands::Tree { path, depth } => {
                folders_tree(&config, path.as_deref(), depth).await?
            }
        },
        Commands::Db { sub } => match sub {
            DbCommands::Check => db_check(&config).await?,
            DbCommands::Migrate { file, rpc } => db_migrate(&config, &file, rpc).await?,
            DbCommands::Schema { schema } => db_schema(&config, &schema).await?,
            DbCommands::Buckets => db_buckets(&config).await?,
        },
    }

    Ok(())
}

async fn folders_setup(config: &OpsConfig) -> anyhow::Result<()> {
    let client = DropboxClient::connect(&config.dropbox).await?;
    let provisioner = FolderProvisioner::new(Arc::new(client));

    let clients_root = RemotePath::new(CLIENTS_ROOT)?;
    for level in clients_root.ancestors() {
        let folder = provisioner.ensure_folder(&level).await?;
        println!("ok {}", folder.path);
    }
    Ok(())
}

async fn folders_client(config: &OpsConfig, name: &str) -> anyhow::Result<()> {
    let client = DropboxClient::connect(&config.dropbox).await?;
    let provisioner = FolderProvisioner::new(Arc::new(client));

    let target = RemotePath::new(CLIENTS_ROOT)?
        .join(name)
        .with_context(|| format!("Invalid client folder name: {}", name))?;
    let folder = provisioner.ensure_path(&target).await?;
    println!("ok {}", folder.path);
    Ok(())
}

async fn folders_ls(config: &OpsConfig, path: Option<&str>) -> anyhow::Result<()> {
    let client = DropboxClient::connect(&config.dropbox).await?;
    let path = RemotePath::new(path.unwrap_or(CLIENTS_ROOT))?;

    let listing = list_children(&client, &path).await?;
    if listing.entries.is_empty() {
        println!("{} is empty", path);
        return Ok(());
    }

    for entry in &listing.entries {
        match entry {
            Entry::Folder(folder) => println!("{:<7} {}", "folder", folder.name),
            Entry::File(file) => {
                let kind = if file.is_video() { "video" } else { "file" };
                let size = file
                    .size
                    .map(format_size)
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<7} {:<40} {}", kind, truncate_string(&file.name, 38), size);
            }
        }
    }
    if listing.truncated {
        println!("... listing truncated at {} entries", LIST_PAGE_LIMIT);
    }
    Ok(())
}

async fn folders_tree(config: &OpsConfig, path: Option<&str>, depth: u32) -> anyhow::Result<()> {
    let client = DropboxClient::connect(&config.dropbox).await?;
    let path = RemotePath::new(path.unwrap_or(DASHBOARD_ROOT))?;

    let tree = walk(&client, &path, depth).await?;
    println!("{}", path);
    print_tree(&tree, 1);
    Ok(())
}

fn print_tree(nodes: &[TreeNode], indent: usize) {
    for node in nodes {
        match node.kind {
            TreeNodeKind::Folder => println!("{}{}/", "  ".repeat(indent), node.name),
            kind => println!("{}{} [{}]", "  ".repeat(indent), node.name, kind),
        }
        print_tree(&node.children, indent + 1);
    }
}

async fn db_check(config: &OpsConfig) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    ping(&pool).await?;
    let version = server_version(&pool).await?;
    println!("Database connection OK (PostgreSQL {})", version);

    for table in ["profiles", "videos", "invites"] {
        match table_count(&pool, table).await {
            Ok(rows) => println!("{:<12} {:>8} rows", table, rows),
            Err(err) => println!("{:<12} unavailable ({})", table, err),
        }
    }
    Ok(())
}

async fn db_migrate(config: &OpsConfig, file: &Path, rpc: bool) -> anyhow::Result<()> {
    let use_rpc = rpc || config.database.database_url.is_none();
    if use_rpc && !rpc {
        tracing::warn!("DATABASE_URL is not set; applying through the SQL RPC instead");
    }

    if use_rpc {
        let (url, key) = config.database.require_rest()?;
        let platform = PlatformClient::new(url, key)?;
        let sql = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read SQL file {}", file.display()))?;
        platform.exec_sql(&sql).await?;
        println!(
            "Applied {} via the SQL RPC (no transaction; a failure can leave it partially applied)",
            file.display()
        );
    } else {
        let pool = connect(&config.database).await?;
        apply_sql_file(&pool, file).await?;
        println!("Applied {} in a single transaction", file.display());
    }
    Ok(())
}

async fn db_schema(config: &OpsConfig, schema: &str) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    let tables = list_tables(&pool, schema).await?;

    if tables.is_empty() {
        println!("No tables in schema {}", schema);
        return Ok(());
    }

    println!("{:<32} {:>10}", "table", "rows");
    for table in tables {
        println!("{:<32} {:>10}", truncate_string(&table.name, 30), table.rows);
    }
    Ok(())
}

async fn db_buckets(config: &OpsConfig) -> anyhow::Result<()> {
    let (url, key) = config.database.require_rest()?;
    let platform = PlatformClient::new(url, key)?;

    let buckets = [
        BucketConfig {
            id: "videos".to_string(),
            name: "videos".to_string(),
            public: false,
            file_size_limit: Some(2 * 1024 * 1024 * 1024),
            allowed_mime_types: Some(vec![
                "video/mp4".to_string(),
                "video/quicktime".to_string(),
                "video/x-msvideo".to_string(),
                "video/x-ms-wmv".to_string(),
                "video/x-flv".to_string(),
                "video/webm".to_string(),
            ]),
        },
        BucketConfig {
            id: "thumbnails".to_string(),
            name: "thumbnails".to_string(),
            public: true,
            file_size_limit: Some(10 * 1024 * 1024),
            allowed_mime_types: Some(vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ]),
        },
    ];

    for bucket in &buckets {
        let info = platform.ensure_bucket(bucket).await?;
        println!("ok {} (public: {})", info.id, info.public);
    }
    Ok(())
}
