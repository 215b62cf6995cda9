use std::path::PathBuf;

use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account, then sign in with it
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MINGLEKARI_PASSWORD")]
        password: String,
    },
    /// Start a session
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MINGLEKARI_PASSWORD")]
        password: String,
    },
    /// End the current session
    SignOut,
    /// Show the signed in user
    Whoami,
    /// Create, edit, delete or show posts
    #[command(subcommand)]
    Post(PostCommand),
    /// List posts, most recently updated first
    Feed {
        /// Only the latest posts, no paging
        #[arg(long, conflicts_with = "cursor")]
        recent: bool,
        /// Id of the last post of the previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Search post captions
    Search { term: String },
    /// Like a post, or take the like back
    Like { post_id: String },
    /// Bookmark a post
    Save { post_id: String },
    /// Remove a bookmark by its record id
    Unsave { record_id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PostCommand {
    Create {
        /// Image to publish
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
        #[arg(long)]
        location: Option<String>,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Edit a post; omitted fields keep their current value
    Update {
        post_id: String,
        /// Replacement image
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    Delete { post_id: String },
    Show { post_id: String },
}
