use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use quill_cli::seeder::{self, SeedConfig};
use quill_config::DatabaseConfig;
use quill_core::hash_password;
use quill_db::bson::doc;
use quill_db::{DocumentStore, MongoStore};

#[derive(Parser)]
#[command(name = "quill-cli")]
#[command(about = "Quill CLI - Administrative tools for the Quill blog API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Username (at least 8 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users and blog posts
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "10")]
        users: usize,

        /// Number of blog posts to create
        #[arg(short = 'b', long, default_value = "50")]
        blogs: usize,

        /// Password for every seeded user
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Clear all seeded data (keeps data created through the API)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let store = match MongoStore::connect(&DatabaseConfig::from_env()).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ensure_indexes(&store).await {
        eprintln!("❌ Failed to prepare database: {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Commands::CreateUser {
            first_name,
            last_name,
            username,
            email,
            password,
        } => handle_create_user(&store, first_name, last_name, username, email, password).await,
        Commands::Seed {
            users,
            blogs,
            password,
        } => handle_seed(&store, users, blogs, password).await,
        Commands::ClearSeed => handle_clear_seed(&store).await,
    }
}

async fn ensure_indexes(store: &MongoStore) -> Result<(), quill_core::StoreError> {
    store.ensure_unique("users", "email").await?;
    store.ensure_unique("users", "username").await
}

fn prompt(label: &str) -> String {
    match Input::<String>::new().with_prompt(label).interact_text() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", label.to_lowercase(), e);
            std::process::exit(1);
        }
    }
}

async fn handle_create_user(
    store: &MongoStore,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));
    let username = username.unwrap_or_else(|| prompt("Username"));
    let email = email.unwrap_or_else(|| prompt("Email address"));

    let password = match password {
        Some(password) => password,
        None => match Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
        {
            Ok(password) => password,
            Err(e) => {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            }
        },
    };

    match create_user_internal(store, &first_name, &last_name, &username, &email, &password).await
    {
        Ok(id) => {
            println!("\n✅ User created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", username.trim().to_lowercase());
            println!("   Email: {}", email.trim().to_lowercase());
        }
        Err(e) => {
            eprintln!("\n❌ Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn create_user_internal(
    store: &MongoStore,
    first_name: &str,
    last_name: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let username = username.trim().to_lowercase();
    if username.chars().count() < 8 {
        return Err("Username must be at least 8 characters long.".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let inserted = store
        .insert_one(
            "users",
            doc! {
                "firstName": first_name.trim(),
                "lastName": last_name.trim(),
                "username": username,
                "email": email.trim().to_lowercase(),
                "password": hashed_password,
                "blogsPosted": 0,
                "__v": 0,
            },
        )
        .await?;

    Ok(inserted.get_object_id("_id")?.to_hex())
}

async fn handle_seed(store: &MongoStore, users: usize, blogs: usize, password: String) {
    let config = SeedConfig::new(users)
        .with_blogs(blogs)
        .with_password(password);

    if let Err(e) = seeder::seed_all(store, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(store: &MongoStore) {
    if let Err(e) = seeder::clear_all(store).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
