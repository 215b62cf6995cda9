use std::{error::Error, sync::Arc};

use log::info;
use minglekari::{
    api::{AppwriteClient, CookieFallback},
    config::{Cli, Command, PostCommand},
    gateway::{next_cursor, toggle_like, Gateway},
    models::{NewPost, NewUser, UpdatePost, UploadFile},
    session::{Entry, SessionCache, SessionUser},
    unit_short,
};
use serde::Serialize;

type AppGateway = Gateway<AppwriteClient, AppwriteClient, AppwriteClient>;
type AppSession = SessionCache<AppwriteClient, AppwriteClient, AppwriteClient>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    cli.config.init_logger();

    let fallback = Arc::new(CookieFallback::load(cli.config.fallback_path()).await?);
    let client = AppwriteClient::new(&cli.config, fallback.clone())?;
    let gateway = Arc::new(Gateway::new(
        client.clone(),
        client.clone(),
        client,
        cli.config.ids.clone(),
    ));
    let mut session = SessionCache::new(gateway.clone(), fallback);

    let result = run(cli.command, &gateway, &mut session).await;
    session.dispose();
    result
}

async fn run(
    command: Command,
    gateway: &AppGateway,
    session: &mut AppSession,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::SignUp {
            name,
            username,
            email,
            password,
        } => {
            let user = unit_short!(
                "Creating account",
                gateway
                    .create_user_account(NewUser {
                        name,
                        username,
                        email: email.clone(),
                        password: password.clone(),
                    })
                    .await?
            );
            info!("Created user {}", user.username);

            gateway.sign_in_account(&email, &password).await?;
            if !session.check_auth_user().await {
                return Err("Sign up failed, please try again".into());
            }
            print_json(session.user())
        }
        Command::SignIn { email, password } => {
            gateway.sign_in_account(&email, &password).await?;
            if !session.check_auth_user().await {
                return Err("Sign in failed, please try again".into());
            }
            print_json(session.user())
        }
        Command::SignOut => print_json(&gateway.sign_out_account().await?),
        Command::Whoami => print_json(&require_user(session).await?),
        Command::Post(command) => run_post(command, gateway, session).await,
        Command::Feed { recent: true, .. } => print_json(&gateway.get_recent_posts().await?),
        Command::Feed { cursor, .. } => {
            let page = gateway.get_infinite_posts(cursor.as_deref()).await?;
            info!("{} of {} posts", page.len(), page.total);
            if let Some(next) = next_cursor(&page) {
                info!("Next page: --cursor {}", next);
            }
            print_json(&page)
        }
        Command::Search { term } => {
            let found = gateway.search_posts(&term).await?;
            info!("{} posts match `{}`", found.len(), term);
            print_json(&found)
        }
        Command::Like { post_id } => {
            let user = require_user(session).await?;
            let post = gateway.get_post_by_id(&post_id).await?;
            let likes = toggle_like(&post.liker_ids(), &user.id);
            print_json(&gateway.like_post(&post.id, &likes).await?)
        }
        Command::Save { post_id } => {
            let user = require_user(session).await?;
            print_json(&gateway.save_post(&user.id, &post_id).await?)
        }
        Command::Unsave { record_id } => print_json(&gateway.delete_saved_post(&record_id).await?),
    }
}

async fn run_post(
    command: PostCommand,
    gateway: &AppGateway,
    session: &mut AppSession,
) -> Result<(), Box<dyn Error>> {
    match command {
        PostCommand::Create {
            file,
            caption,
            location,
            tags,
        } => {
            let user = require_user(session).await?;
            let file = UploadFile::from_path(&file).await?;
            let post = unit_short!(
                "Publishing post",
                gateway
                    .create_post(NewPost {
                        user_id: user.id,
                        caption,
                        file: vec![file],
                        location,
                        tags,
                    })
                    .await?
            );
            print_json(&post)
        }
        PostCommand::Update {
            post_id,
            file,
            caption,
            location,
            tags,
        } => {
            let user = require_user(session).await?;
            let existing = gateway.get_post_by_id(&post_id).await?;
            if existing.creator.id() != user.id {
                return Err("Only the creator can edit this post".into());
            }

            let file = match file {
                Some(path) => vec![UploadFile::from_path(&path).await?],
                None => vec![],
            };
            let post = unit_short!(
                "Updating post",
                gateway
                    .update_post(UpdatePost {
                        post_id: existing.id.clone(),
                        caption: caption.unwrap_or_else(|| existing.caption.clone()),
                        image_id: existing.image_id.clone(),
                        image_url: existing.image_url.clone(),
                        file,
                        location: location.or_else(|| existing.location.clone()),
                        tags: tags.unwrap_or_else(|| existing.tags.join(",")),
                    })
                    .await?
            );
            print_json(&post)
        }
        PostCommand::Delete { post_id } => {
            let user = require_user(session).await?;
            let post = gateway.get_post_by_id(&post_id).await?;
            if post.creator.id() != user.id {
                return Err("Only the creator can delete this post".into());
            }
            print_json(&gateway.delete_post(&post.id, &post.image_id).await?)
        }
        PostCommand::Show { post_id } => print_json(&gateway.get_post_by_id(&post_id).await?),
    }
}

async fn require_user(session: &mut AppSession) -> Result<SessionUser, Box<dyn Error>> {
    let outcome = session.init().await;
    if outcome.entry == Entry::SignIn {
        info!("No saved session");
    }
    if !outcome.authenticated {
        return Err("Not signed in, run `minglekari sign-in` first".into());
    }
    Ok(session.user().clone())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
