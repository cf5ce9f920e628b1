use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use threads_client::{
    AuthResponse, Post, Profile, ProfileUpdate, Session, SignupForm, ThreadsClient,
    ThreadsClientError,
};

const TOKEN_FILE: &str = ".threads_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:5000";
const SERVER_ENV: &str = "THREADS_SERVER";

#[derive(Debug, Parser)]
#[command(name = "threads-cli", version, about = "Command line client for threads-server")]
struct Cli {
    /// Server address. Falls back to $THREADS_SERVER, then the local default.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and log in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Sign up as a student; enables the school/programs/batch fields.
        #[arg(long)]
        student: bool,
        #[arg(long, requires = "student")]
        school: Option<String>,
        #[arg(long, requires = "student")]
        programs: Option<String>,
        #[arg(long, requires = "student")]
        batch: Option<String>,
    },
    /// Log in.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Publish a post (requires login).
    Post {
        #[arg(long)]
        text: String,
        /// Image URL or data URI.
        #[arg(long)]
        img: Option<String>,
    },
    /// Show a post by id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Delete one of your posts (requires login).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Like a post, or unlike it if already liked (requires login).
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Reply to a post (requires login).
    Reply {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        text: String,
    },
    /// Posts of the users you follow (requires login).
    Feed,
    /// Posts of one user.
    Timeline {
        #[arg(long)]
        username: String,
    },
    /// Follow a user, or unfollow if already following (requires login).
    Follow {
        #[arg(long)]
        id: i64,
    },
    /// Show a profile, or update yours when any of --name/--bio/--pic is set.
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// New picture as an image URL or data URI.
        #[arg(long)]
        pic: Option<String>,
    },
    /// Print the AR lens embed snippets.
    Lenses,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = ThreadsClient::new(server).map_err(map_client_error)?;

    if let Some(session) = load_session().context("failed to read .threads_token")? {
        client.set_session(session);
    }

    match cli.command {
        Command::Signup {
            name,
            username,
            email,
            password,
            student,
            school,
            programs,
            batch,
        } => {
            let form = SignupForm {
                name,
                username,
                email,
                password,
                is_student: student,
                school,
                programs,
                batch,
            };
            let auth = client.signup(&form).await.map_err(map_client_error)?;
            persist_session(&client).context("failed to save session")?;
            print_auth("Signed up", &auth);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_session(&client).context("failed to save session")?;
            print_auth("Logged in", &auth);
        }
        Command::Post { text, img } => {
            let post = client
                .create_post(&text, img.as_deref())
                .await
                .map_err(map_client_error)?;
            print_post("Post created", &post);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Post", &post);
        }
        Command::Delete { id } => {
            let message = client.delete_post(id).await.map_err(map_client_error)?;
            println!("{message}");
        }
        Command::Like { id } => {
            let message = client.toggle_like(id).await.map_err(map_client_error)?;
            println!("{message}");
        }
        Command::Reply { id, text } => {
            let reply = client.reply(id, &text).await.map_err(map_client_error)?;
            println!("Reply {} added by @{}", reply.id, reply.username);
        }
        Command::Feed => {
            let posts = client.feed().await.map_err(map_client_error)?;
            print_posts("Feed", &posts);
        }
        Command::Timeline { username } => {
            let posts = client
                .user_posts(&username)
                .await
                .map_err(map_client_error)?;
            print_posts(&format!("Posts of @{username}"), &posts);
        }
        Command::Follow { id } => {
            let message = client.toggle_follow(id).await.map_err(map_client_error)?;
            println!("{message}");
        }
        Command::Profile {
            username,
            name,
            bio,
            pic,
        } => {
            let update = ProfileUpdate {
                name,
                bio,
                profile_pic: pic,
            };
            if is_update(&update) {
                let user = client
                    .update_profile(&update)
                    .await
                    .map_err(map_client_error)?;
                println!("Profile updated: @{} ({})", user.username, user.name);
            } else {
                let username = username
                    .context("pass --username to look up a profile, or --name/--bio/--pic")?;
                let profile = client
                    .get_profile(&username)
                    .await
                    .map_err(map_client_error)?;
                print_profile(&profile);
            }
        }
        Command::Lenses => {
            let embeds = client.lenses().await.map_err(map_client_error)?;
            for embed in embeds {
                println!("{embed}\n");
            }
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|server| !server.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn is_update(update: &ProfileUpdate) -> bool {
    update.name.is_some() || update.bio.is_some() || update.profile_pic.is_some()
}

fn parse_session(raw: &str) -> Option<Session> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

fn load_session() -> io::Result<Option<Session>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_session(&raw))
}

fn persist_session(client: &ThreadsClient) -> io::Result<()> {
    if let Some(session) = client.session() {
        let raw = serde_json::to_string(session).map_err(io::Error::other)?;
        fs::write(TOKEN_FILE, raw)?;
    }
    Ok(())
}

fn map_client_error(err: ThreadsClientError) -> anyhow::Error {
    let message = match err {
        ThreadsClientError::Unauthorized(message) => format!(
            "unauthorized ({message}): run `threads-cli login ...` or `threads-cli signup ...`"
        ),
        ThreadsClientError::NotFound(message) => format!("not found: {message}"),
        ThreadsClientError::Conflict(message) => format!("already exists: {message}"),
        ThreadsClientError::InvalidRequest(message) => format!("invalid request: {message}"),
        ThreadsClientError::Http(err) => format!("http error: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  name: {}", auth.user.name);
    println!("  username: {}", auth.user.username);
    println!("  email: {}", auth.user.email);
    if auth.user.is_student {
        println!(
            "  student: {} / {} / {}",
            auth.user.school.as_deref().unwrap_or("-"),
            auth.user.programs.as_deref().unwrap_or("-"),
            auth.user.batch.as_deref().unwrap_or("-")
        );
    }
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("posted_by: {}", post.posted_by);
    println!("text: {}", post.text);
    if let Some(img) = &post.img {
        println!("img: {img}");
    }
    println!("likes: {}", post.likes.len());
    println!("created_at: {}", post.created_at);
    for reply in &post.replies {
        println!("  @{}: {}", reply.username, reply.text);
    }
}

fn print_posts(title: &str, posts: &[Post]) {
    println!("{title}: {} posts", posts.len());

    for post in posts {
        println!(
            "- [{}] {} (by {}, {} likes, {} replies)",
            post.id,
            post.text,
            post.posted_by,
            post.likes.len(),
            post.replies.len()
        );
    }
}

fn print_profile(profile: &Profile) {
    println!("@{} ({})", profile.username, profile.name);
    println!("id: {}", profile.id);
    if !profile.bio.is_empty() {
        println!("bio: {}", profile.bio);
    }
    if !profile.profile_pic.is_empty() {
        println!("pic: {}", profile.profile_pic);
    }
    println!("following: {}", profile.following.len());
}
