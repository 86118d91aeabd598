use std::sync::Arc;

use anyhow::Context;
use router_client::{ApiClient, RouterApi};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alert::needs_crisis_alert;
use crate::config::ConsoleSettings;
use crate::events::ViewEvent;
use crate::input::{parse_line, ConsoleInput, InputError, InputRejection};
use crate::render::{
    render_crisis, render_error, render_feedback, render_health, render_history, render_loading,
    render_result, render_status, Palette, BANNER, HELP,
};
use crate::runtime::{InputSubmission, RouterView, ViewOptions};
use crate::state::HealthIndicator;

const BUSY_NOTICE: &str = "Still routing the previous question; please wait for its answer.";

enum Flow {
    Continue,
    Quit,
}

pub(crate) async fn run_console(settings: ConsoleSettings, palette: Palette) -> anyhow::Result<()> {
    let client = ApiClient::new(&settings.base_url, settings.timeout)
        .with_context(|| format!("failed to create api client for {}", settings.base_url))?;
    let base_url = client.base_url().to_string();
    tracing::info!(
        base_url = %base_url,
        timeout_ms = client.timeout().as_millis() as u64,
        "api client ready"
    );
    let api: Arc<dyn RouterApi> = Arc::new(client);
    let mut view = RouterView::new(
        api,
        ViewOptions {
            health_interval: settings.health_interval,
            ordering: settings.ordering,
        },
    );
    let renderer = spawn_renderer(view.subscribe(), view.shutdown_token(), palette);
    view.start();

    println!("{BANNER}\nBackend: {base_url}\n\n{HELP}\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stdin");
                break;
            }
        };
        if let Flow::Quit = dispatch(&view, &line, palette).await {
            break;
        }
    }

    view.stop().await;
    if let Err(err) = renderer.await {
        tracing::warn!(error = %err, "renderer task ended abnormally");
    }
    Ok(())
}

async fn dispatch(view: &RouterView, line: &str, palette: Palette) -> Flow {
    let input = match parse_line(line) {
        Ok(input) => input,
        Err(InputError::Rejected(InputRejection::Empty)) => return Flow::Continue,
        Err(err) => {
            println!("{err}");
            return Flow::Continue;
        }
    };
    let controller = view.controller();
    match input {
        ConsoleInput::Query(query) => {
            match controller.submit_from_input(query).await {
                InputSubmission::Started(_) => {}
                InputSubmission::Busy => println!("{BUSY_NOTICE}"),
                InputSubmission::Stopped => tracing::debug!("query ignored after stop"),
            }
        }
        ConsoleInput::History => {
            let state = view.state();
            let state = state.read().await;
            print!("{}", render_history(state.history()));
        }
        ConsoleInput::Show(index) => {
            if !controller.select_history_at(index).await {
                println!("No history entry {}.", index + 1);
            }
        }
        ConsoleInput::ShowRequest(id) => {
            if !controller.select_history(&id).await {
                println!("No history entry for {id}.");
            }
        }
        ConsoleInput::Status => {
            let state = view.state();
            let state = state.read().await;
            println!("{}", render_status(&state, palette));
        }
        ConsoleInput::Feedback(rating) => {
            if controller.send_feedback(rating).await.is_none() {
                println!("Nothing to rate yet.");
            }
        }
        ConsoleInput::Help => println!("{HELP}"),
        ConsoleInput::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn spawn_renderer(
    mut events: broadcast::Receiver<ViewEvent>,
    shutdown: CancellationToken,
    palette: Palette,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_indicator = None;
        loop {
            let event = tokio::select! {
                _ = shutdown.cancelled() => break,
                event = events.recv() => event,
            };
            match event {
                Ok(event) => {
                    if let Some(text) = describe_event(&event, &mut last_indicator, palette) {
                        println!("{}", text.trim_end());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "renderer fell behind view events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn describe_event(
    event: &ViewEvent,
    last_indicator: &mut Option<HealthIndicator>,
    palette: Palette,
) -> Option<String> {
    match event {
        ViewEvent::HealthChanged { indicator, status } => {
            if *last_indicator == Some(*indicator) {
                return None;
            }
            *last_indicator = Some(*indicator);
            Some(render_health(*indicator, Some(status), palette))
        }
        ViewEvent::SubmissionStarted { query, in_flight } => {
            Some(render_loading(query, *in_flight))
        }
        ViewEvent::ResultChanged { item } | ViewEvent::HistorySelected { item } => {
            let mut text = render_result(&item.result, palette);
            if needs_crisis_alert(Some(&item.result)) {
                text.push('\n');
                text.push_str(&render_crisis(palette));
            }
            Some(text)
        }
        ViewEvent::ResultRecorded { item } => Some(format!(
            "(an earlier answer for \"{}\" was saved to history; :history to review)",
            item.query
        )),
        ViewEvent::SubmissionFailed { message } => Some(render_error(message, palette)),
        ViewEvent::FeedbackAccepted { request_id, rating } => {
            Some(render_feedback(*rating, request_id))
        }
    }
}
