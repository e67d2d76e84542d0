//! Plain-text rendering of engine views.

use board_engine::{AuthForm, Composer, LoadState, Notice, View};

pub(crate) fn view(view: &View) {
    match view {
        View::Blank => {}
        View::Home(home) => {
            composer(&home.composer);
            match &home.threads {
                LoadState::Loaded(threads) if threads.is_empty() => println!("No threads yet."),
                LoadState::Loaded(threads) => {
                    for thread in threads {
                        let replies = thread
                            .reply_count
                            .map(|n| format!("  ({n} replies)"))
                            .unwrap_or_default();
                        println!(
                            "#{:<6} {}{}\n        by {} at {}",
                            thread.id,
                            thread.title,
                            replies,
                            thread.author.abbreviated(),
                            thread.created_at
                        );
                    }
                }
                other => load_state(other),
            }
        }
        View::Thread(thread) => {
            composer(&thread.composer);
            if let Some(title) = &thread.title {
                println!("# {title}  (thread {})", thread.thread_id);
            }
            match &thread.posts {
                LoadState::Loaded(posts) if posts.is_empty() => println!("No posts yet."),
                LoadState::Loaded(posts) => {
                    for post in posts {
                        println!(
                            "[{}] {}: {}",
                            post.created_at,
                            post.author.abbreviated(),
                            post.content
                        );
                    }
                }
                other => load_state(other),
            }
        }
        View::Register(form) | View::Login(form) => auth_form(form),
        View::UserInfo(info) => {
            if let Some(identity) = &info.identity {
                println!("Identity:   {}", identity.abbreviated());
            }
            if let LoadState::Loaded(details) = &info.details {
                let email = details.email.as_deref().unwrap_or("-");
                let registered = details
                    .registered_at
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                println!("Email:      {email}");
                println!("Registered: {registered}");
            }
        }
    }
}

pub(crate) fn auth_form(form: &AuthForm) {
    for (field, message) in &form.field_errors {
        eprintln!("{field}: {message}");
    }
    if let Some(notice) = &form.notice
        && form.field_errors.iter().all(|(_, m)| m != notice.text())
    {
        print_notice(notice);
    }
}

fn composer(composer: &Composer) {
    if let Some(notice) = &composer.notice {
        print_notice(notice);
    }
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Success(text) => println!("{text}"),
        Notice::Error(text) => eprintln!("error: {text}"),
    }
}

fn load_state<T>(state: &LoadState<T>) {
    match state {
        LoadState::Idle | LoadState::Loaded(_) => {}
        LoadState::Loading => println!("Loading..."),
        LoadState::Failed(message) => eprintln!("error: {message}"),
    }
}

/// True if the view is showing a failure.
pub(crate) fn has_error(view: &View) -> bool {
    let notice_failed = |notice: &Option<Notice>| notice.as_ref().is_some_and(Notice::is_error);
    match view {
        View::Blank => false,
        View::Home(home) => notice_failed(&home.composer.notice) || home.threads.error().is_some(),
        View::Thread(thread) => {
            notice_failed(&thread.composer.notice) || thread.posts.error().is_some()
        }
        View::Register(form) | View::Login(form) => {
            notice_failed(&form.notice) || !form.field_errors.is_empty()
        }
        View::UserInfo(_) => false,
    }
}
