//! Newsletter signup.
//!
//! Nothing is submitted anywhere: a valid address gets a thank-you toast and
//! a reset form, an invalid one keeps the form with an error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use suresh_core::{Email, Notice};
use tracing::instrument;

use crate::routes::toast::ToastView;
use crate::state::AppState;

/// Shown when an address fails validation.
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Newsletter form display data.
#[derive(Debug, Clone, Default)]
pub struct NewsletterView {
    pub email: String,
    pub error: Option<String>,
}

/// Re-rendered form plus an out-of-band toast.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/response.html")]
pub struct NewsletterResponseTemplate {
    pub newsletter: NewsletterView,
    pub toast: ToastView,
}

/// Subscribe to the newsletter (HTMX).
#[instrument(skip(state, form))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> NewsletterResponseTemplate {
    let duration = state.config().toast_duration;

    match Email::parse(&form.email) {
        Ok(email) => {
            tracing::info!(domain = email.domain(), "Newsletter signup");
            NewsletterResponseTemplate {
                newsletter: NewsletterView::default(),
                toast: ToastView::new(&Notice::new(Notice::SUBSCRIBED), duration),
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected newsletter address");
            NewsletterResponseTemplate {
                newsletter: NewsletterView {
                    email: form.email,
                    error: Some(INVALID_EMAIL.to_owned()),
                },
                toast: ToastView::new(&Notice::new(INVALID_EMAIL), duration),
            }
        }
    }
}
