//! CLI module for Mirage.
//!
//! Each command opens the screen a user would, feeds it the same events the
//! UI sends, and prints the resulting state and queued messages.
//!
//! ```ignore
//! use mirage::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(&app, command).await?;
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::app::MirageApp;
use crate::state::{
    AccountEvent, CreatePostEvent, FeedEvent, LoginEvent, PostDetailEvent, ProfileEvent,
    RegisterEvent, SearchEvent, SessionEvent,
};
use output::{format_account, format_posts, format_profile, header, print_queue};

/// Run one command against `app`.
pub async fn run_cli_command(app: &MirageApp, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version_line()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Invalid(reason) => {
            eprintln!("{}\n\n{}", reason, USAGE);
            return Err(eyre!(reason));
        }
        CliCommand::Feed => {
            let feed = app.feed();
            feed.on_trigger_event(FeedEvent::Feed).await?;
            let state = feed.state();
            println!("{}", header("HOME"));
            println!("{}", format_posts(&state.posts));
            print_queue(&state.queue);
        }
        CliCommand::Post(id) => {
            let detail = app.post_detail();
            detail.on_trigger_event(PostDetailEvent::GetPost(id)).await?;
            let state = detail.state();
            if let Some(post) = &state.post {
                println!("{}", format_posts(std::slice::from_ref(post)));
            }
            print_queue(&state.queue);
        }
        CliCommand::Search(query) => {
            let search = app.search();
            search.on_trigger_event(SearchEvent::UpdateQuery(query)).await?;
            search.on_trigger_event(SearchEvent::NewSearch).await?;
            let state = search.state();
            println!("{}", header(&format!("SEARCH {}", state.query)));
            if state.is_post_search() {
                println!("{}", format_posts(&state.posts));
            } else if state.profiles.is_empty() {
                println!("  (no profiles)");
            } else {
                for profile in &state.profiles {
                    println!("{}", format_profile(profile));
                }
            }
            print_queue(&state.queue);
        }
        CliCommand::Profile(username) => {
            let profile = app.profile();
            profile.on_trigger_event(ProfileEvent::GetProfile(username)).await?;
            let state = profile.state();
            if let Some(p) = &state.profile {
                println!("{}", header(&format_profile(p)));
                println!("{}", format_posts(&state.tabs.posts));
            }
            print_queue(&state.queue);
        }
        CliCommand::Whoami => {
            let account = app.account();
            account.on_trigger_event(AccountEvent::GetAccount).await?;
            let state = account.state();
            if let Some(a) = &state.account {
                println!("{}", format_account(a));
            }
            print_queue(&state.queue);
        }
        CliCommand::Login { email, password } => {
            let login = app.login();
            login.on_trigger_event(LoginEvent::OnUpdateEmail(email)).await?;
            login.on_trigger_event(LoginEvent::OnUpdatePassword(password)).await?;
            let result = login.on_trigger_event(LoginEvent::Login).await;
            print_queue(&login.state().queue);
            result?;
            signed_in(app)?;
        }
        CliCommand::Register {
            email,
            username,
            display_name,
            password,
        } => {
            let register = app.register();
            register.on_trigger_event(RegisterEvent::OnUpdateEmail(email)).await?;
            register.on_trigger_event(RegisterEvent::OnUpdateUsername(username)).await?;
            register
                .on_trigger_event(RegisterEvent::OnUpdateDisplayName(display_name))
                .await?;
            register.on_trigger_event(RegisterEvent::OnUpdatePassword(password)).await?;
            let result = register.on_trigger_event(RegisterEvent::RegisterClicked).await;
            print_queue(&register.state().queue);
            result?;
            signed_in(app)?;
        }
        CliCommand::Logout => {
            app.session().on_trigger_event(SessionEvent::Logout).await?;
            println!("Signed out");
        }
        CliCommand::Publish(text) => {
            let uid = app.session().uid().ok_or_else(|| eyre!("not signed in"))?;
            let compose = app.create_post();
            compose.on_trigger_event(CreatePostEvent::LoadAccount(uid)).await?;
            compose.on_trigger_event(CreatePostEvent::OnUpdateText(text)).await?;
            let result = compose.on_trigger_event(CreatePostEvent::PublishPost).await;
            print_queue(&compose.state().queue);
            result?;
        }
        CliCommand::Like(id) => {
            let detail = app.post_detail();
            detail.on_trigger_event(PostDetailEvent::GetPost(id.clone())).await?;
            detail.on_trigger_event(PostDetailEvent::ToggleLike(id)).await?;
            print_post_detail(&detail.state());
        }
        CliCommand::Retweet(id) => {
            let detail = app.post_detail();
            detail.on_trigger_event(PostDetailEvent::GetPost(id.clone())).await?;
            detail.on_trigger_event(PostDetailEvent::ToggleRetweet(id)).await?;
            print_post_detail(&detail.state());
        }
        CliCommand::Delete(id) => {
            let detail = app.post_detail();
            detail.on_trigger_event(PostDetailEvent::GetPost(id.clone())).await?;
            detail.on_trigger_event(PostDetailEvent::DeletePost(id)).await?;
            // Answer the confirmation dialog the screen raised
            let pending = detail.state();
            if let Some(callback) = pending.queue.peek().and_then(|m| m.callback()) {
                callback.proceed();
            }
            detail.on_trigger_event(PostDetailEvent::OnRemoveHeadFromQueue).await?;
            detail.process_pending().await;
            print_queue(&detail.state().queue);
        }
        CliCommand::Follow(username) => {
            let profile = app.profile();
            profile.on_trigger_event(ProfileEvent::GetProfile(username)).await?;
            profile.on_trigger_event(ProfileEvent::OnToggleFollow).await?;
            let state = profile.state();
            if let Some(p) = &state.profile {
                println!("{}", format_profile(p));
            }
            print_queue(&state.queue);
        }
    }
    Ok(())
}

fn signed_in(app: &MirageApp) -> Result<()> {
    match app.session().uid() {
        Some(uid) => {
            println!("Signed in ({})", uid);
            Ok(())
        }
        None => Err(eyre!("sign in failed")),
    }
}

fn print_post_detail(state: &crate::state::PostDetailState) {
    if let Some(post) = &state.post {
        println!("{}", format_posts(std::slice::from_ref(post)));
    }
    print_queue(&state.queue);
}
