use std::fmt::Write;

use router_protocol::{HealthStatus, Rating, RiskLevel, RouterResponse};

use crate::alert::{domain_tone, risk_tone, Tone, CRISIS_RESOURCES, HIGH_RISK_NOTICE};
use crate::state::{clock_time, HealthIndicator, HistoryItem, ViewState};

const LOADING_STEPS: [&str; 4] = [
    "Screening for safety signals",
    "Classifying intent and risk",
    "Routing to specialized agent",
    "Formatting final response",
];

pub(crate) const HELP: &str = "\
Type a medical or legal question and press enter.
  :history      list previous questions (newest first)
  :show <n|id>  show a history entry again, by number or request id
  :status       show backend status and pending requests
  :up / :down   rate the current answer
  :help         this text
  :quit         exit";

pub(crate) const BANNER: &str = "SochSamajh AI Router - Safety-Aware Medical and Legal Assistant\n\
This system provides educational information only and will refuse unsafe requests.";

#[derive(Clone, Copy, Debug)]
pub(crate) struct Palette {
    color: bool,
}

impl Palette {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }

    pub(crate) fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match tone {
            Tone::Danger => "31",
            Tone::Warning => "33",
            Tone::Success => "32",
            Tone::Neutral => "2",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn badge(&self, tone: Tone, label: &str) -> String {
        self.paint(tone, &format!("[{label}]"))
    }
}

pub(crate) fn render_result(result: &RouterResponse, palette: Palette) -> String {
    let classification = &result.classification;
    let mut badges = vec![
        palette.badge(
            domain_tone(classification.domain),
            classification.domain.as_str(),
        ),
        palette.badge(
            risk_tone(classification.risk_level),
            classification.risk_level.as_str(),
        ),
    ];
    if result.safety_flags.is_flagged() {
        badges.push(palette.badge(Tone::Danger, "Flagged"));
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", badges.join(" "));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.response.trim_end());
    if !result.disclaimers.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Disclaimers:");
        for disclaimer in &result.disclaimers {
            let _ = writeln!(out, "  - {disclaimer}");
        }
    }
    if classification.risk_level == RiskLevel::High {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", palette.paint(Tone::Danger, HIGH_RISK_NOTICE));
    }
    out
}

pub(crate) fn render_crisis(palette: Palette) -> String {
    palette.paint(Tone::Warning, CRISIS_RESOURCES)
}

pub(crate) fn render_health(
    indicator: HealthIndicator,
    status: Option<&HealthStatus>,
    palette: Palette,
) -> String {
    match indicator {
        HealthIndicator::Ready => {
            let model = status.map(|status| status.model.as_str()).unwrap_or("unknown");
            let dot = palette.paint(Tone::Success, "*");
            let mut line = format!("{dot} System Ready (model {model}");
            if let Some(project) = status.and_then(|status| status.langsmith_project.as_deref()) {
                let _ = write!(line, ", project {project}");
            }
            line.push(')');
            line
        }
        HealthIndicator::Unreachable | HealthIndicator::Pending => {
            format!("{} Backend Unavailable", palette.paint(Tone::Neutral, "*"))
        }
    }
}

pub(crate) fn render_status(state: &ViewState, palette: Palette) -> String {
    let mut out = render_health(state.health_indicator(), state.health(), palette);
    if state.is_loading() {
        let _ = write!(out, "\n  {} request(s) in flight", state.in_flight());
    }
    if let Some(current) = state.current() {
        let _ = write!(out, "\n  showing {}", current.request_id);
    }
    if let Some(message) = state.error() {
        let _ = write!(out, "\n  {}", render_error(message, palette));
    }
    out
}

pub(crate) fn render_loading(query: &str, in_flight: usize) -> String {
    let mut out = format!("Routing \"{}\"", preview(query, 60));
    if in_flight > 1 {
        let _ = write!(out, " ({in_flight} requests in flight)");
    }
    out.push('\n');
    for step in LOADING_STEPS {
        let _ = writeln!(out, "  ... {step}");
    }
    out
}

pub(crate) fn render_error(message: &str, palette: Palette) -> String {
    palette.paint(Tone::Danger, &format!("Warning: {message}"))
}

pub(crate) fn render_history<'a>(items: impl IntoIterator<Item = &'a HistoryItem>) -> String {
    let mut out = String::new();
    for (index, item) in items.into_iter().enumerate() {
        let marker = if index == 0 { "-> " } else { "   " };
        let _ = writeln!(
            out,
            "{:>3}. {marker}{}  ({} UTC)",
            index + 1,
            preview(&item.query, 70),
            clock_time(&item.timestamp)
        );
    }
    if out.is_empty() {
        out.push_str("No questions yet.\n");
    }
    out
}

pub(crate) fn render_feedback(rating: Rating, request_id: &str) -> String {
    let verdict = match rating {
        Rating::Up => "helpful",
        Rating::Down => "not helpful",
    };
    format!("Thanks, marked {request_id} as {verdict}.")
}

fn preview(text: &str, limit: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= limit {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_support::sample_response;
    use router_protocol::Domain;
    use std::sync::Arc;

    const PLAIN: Palette = Palette { color: false };

    #[test]
    fn result_shows_badges_disclaimers_and_high_risk_notice() {
        let mut result = sample_response("req-1");
        result.classification.domain = Domain::Medical;
        result.classification.risk_level = RiskLevel::High;
        result.safety_flags.self_harm = true;
        result.disclaimers = vec!["Not medical advice.".to_string()];

        let rendered = render_result(&result, PLAIN);
        assert!(rendered.starts_with("[medical] [high] [Flagged]\n"));
        assert!(rendered.contains("answer for req-1"));
        assert!(rendered.contains("  - Not medical advice."));
        assert!(rendered.contains(HIGH_RISK_NOTICE));
    }

    #[test]
    fn low_risk_result_has_no_extras() {
        let rendered = render_result(&sample_response("req-1"), PLAIN);
        assert!(rendered.starts_with("[general] [low]\n"));
        assert!(!rendered.contains("Disclaimers"));
        assert!(!rendered.contains(HIGH_RISK_NOTICE));
    }

    #[test]
    fn color_wraps_in_ansi() {
        let palette = Palette::new(true);
        assert_eq!(palette.paint(Tone::Danger, "x"), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn health_line_reflects_indicator() {
        let status = HealthStatus {
            status: "ok".to_string(),
            model: "mistral-7b".to_string(),
            langsmith_project: Some("router".to_string()),
        };
        assert_eq!(
            render_health(HealthIndicator::Ready, Some(&status), PLAIN),
            "* System Ready (model mistral-7b, project router)"
        );
        assert_eq!(
            render_health(HealthIndicator::Pending, None, PLAIN),
            "* Backend Unavailable"
        );
    }

    #[test]
    fn history_marks_newest_entry() {
        let items = vec![
            HistoryItem {
                id: "req-2".to_string(),
                query: "second\nquestion".to_string(),
                result: Arc::new(sample_response("req-2")),
                timestamp: "2026-10-19T09:15:02.000Z".to_string(),
            },
            HistoryItem {
                id: "req-1".to_string(),
                query: "first".to_string(),
                result: Arc::new(sample_response("req-1")),
                timestamp: "2026-10-19T09:14:00.000Z".to_string(),
            },
        ];
        let rendered = render_history(&items);
        assert_eq!(
            rendered,
            "  1. -> second question  (09:15:02 UTC)\n  2.    first  (09:14:00 UTC)\n"
        );
        assert_eq!(render_history(&Vec::<HistoryItem>::new()), "No questions yet.\n");
    }

    #[test]
    fn status_lists_pending_work_and_last_error() {
        let mut state = ViewState::default();
        assert_eq!(render_status(&state, PLAIN), "* Backend Unavailable");

        state.begin_submission();
        state.begin_submission();
        state.finish_submission();
        state.record_failure(crate::state::SUBMIT_ERROR_MESSAGE);
        assert_eq!(
            render_status(&state, PLAIN),
            "* Backend Unavailable\n  1 request(s) in flight\n  \
             Warning: Unable to process the request. Please try again."
        );
    }

    #[test]
    fn feedback_names_the_rated_request() {
        assert_eq!(
            render_feedback(Rating::Down, "req-9"),
            "Thanks, marked req-9 as not helpful."
        );
    }

    #[test]
    fn loading_lists_pipeline_steps() {
        let rendered = render_loading("what is bail?", 2);
        assert!(rendered.starts_with("Routing \"what is bail?\" (2 requests in flight)\n"));
        assert_eq!(rendered.matches("  ... ").count(), LOADING_STEPS.len());
    }
}
