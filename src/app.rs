use std::{env, path::Path};

use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain::{self, calendar::CalendarZone, ids::ChannelId, session_state::SessionState},
    infra::{self, error::AppError, memory_client::MemoryChatClient, transcript_file},
    ui,
    usecases::{
        self,
        bootstrap,
        channel_session::ChannelSession,
        compose::ComposeSession,
        context::AppContext,
        login::{login, Credentials},
    },
};

const TRANSCRIPT_REPLAYED: &str = "TRANSCRIPT_REPLAYED";
const SEND_SKIPPED: &str = "TRANSCRIPT_SEND_SKIPPED";
const LOGIN_SKIPPED: &str = "TRANSCRIPT_LOGIN_SKIPPED";
const PASSWORD_ENV: &str = "STOAT_PASSWORD";

/// What to do with the transcript besides replaying it.
#[derive(Debug, Default)]
struct RenderOptions {
    utc: bool,
    credentials: Option<Credentials>,
    send: Option<String>,
}

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command {
        Command::Render {
            file,
            utc,
            login,
            send,
        } => {
            let options = RenderOptions {
                utc,
                credentials: login.map(|email| Credentials {
                    email,
                    password: env::var(PASSWORD_ENV).unwrap_or_default(),
                }),
                send,
            };
            for line in render_transcript(&context, &file, &options)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Replays `path` through the in-memory SDK and returns the rendered view.
fn render_transcript(
    context: &AppContext,
    path: &Path,
    options: &RenderOptions,
) -> Result<Vec<String>> {
    let config = &context.config;
    let zone = if options.utc {
        CalendarZone::utc()
    } else {
        config.grouping.zone().map_err(AppError::from)?
    };
    let policy = config.grouping.policy();

    let transcript = transcript_file::load(path)?;
    let client = MemoryChatClient::new();
    transcript.seed(&client);

    let session_state = client
        .session_user()
        .map(SessionState::signed_in)
        .unwrap_or_default();
    let mut session = ChannelSession::open(
        &client,
        transcript.channel.clone(),
        session_state,
        config.messages.page_size,
    );

    if let Some(credentials) = &options.credentials {
        if let Err(error) = login(&client, credentials) {
            tracing::warn!(code = LOGIN_SKIPPED, error = %error, "continuing signed out");
        }
    }

    for event in transcript.events.iter().cloned() {
        client.deliver(event);
    }

    if let Some(text) = &options.send {
        send_as_self(&client, context, &transcript.channel.id, text);
    }

    let applied = session.pump();
    tracing::info!(
        code = TRANSCRIPT_REPLAYED,
        path = %path.display(),
        history = transcript.history.len(),
        applied,
        "transcript replayed"
    );

    let session_state = session.session().clone();
    let view = session.close();

    Ok(ui::render_channel(&view, &session_state, &zone, &policy))
}

/// Types `text` into a compose box, lets it go idle, then sends it.
fn send_as_self(
    client: &MemoryChatClient,
    context: &AppContext,
    channel_id: &ChannelId,
    text: &str,
) {
    let timings = context.config.typing.timings();
    let mut compose = ComposeSession::new(client, channel_id.clone(), timings);

    let typed_at = now_ms();
    compose.edit(text, typed_at);
    compose.tick(typed_at.saturating_add(timings.idle_timeout_ms));
    tracing::debug!(typing = compose.is_typing(), "compose box went idle");

    if let Err(error) = compose.submit() {
        tracing::warn!(
            code = SEND_SKIPPED,
            error = %error,
            draft_len = compose.draft().len(),
            "message was not sent"
        );
    }
    compose.close();
}

fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
