//! Contact form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use suresh_core::{Email, Notice};
use tracing::instrument;

use crate::routes::newsletter::INVALID_EMAIL;
use crate::routes::toast::ToastView;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Please fill in your name and message.";

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact form display data.
#[derive(Debug, Clone, Default)]
pub struct ContactView {
    pub name: String,
    pub email: String,
    pub message: String,
    pub error: Option<String>,
}

/// Re-rendered form plus an out-of-band toast.
#[derive(Template, WebTemplate)]
#[template(path = "contact/response.html")]
pub struct ContactResponseTemplate {
    pub contact: ContactView,
    pub toast: ToastView,
}

fn validate(form: &ContactForm) -> Result<Email, &'static str> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(MISSING_FIELDS);
    }
    Email::parse(&form.email).map_err(|_| INVALID_EMAIL)
}

/// Accept a contact message (HTMX).
///
/// The message is only logged; a valid submission resets the form.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> ContactResponseTemplate {
    let duration = state.config().toast_duration;

    match validate(&form) {
        Ok(email) => {
            tracing::info!(
                domain = email.domain(),
                message_len = form.message.len(),
                "Contact message received"
            );
            ContactResponseTemplate {
                contact: ContactView::default(),
                toast: ToastView::new(&Notice::new(Notice::MESSAGE_SENT), duration),
            }
        }
        Err(reason) => ContactResponseTemplate {
            contact: ContactView {
                name: form.name,
                email: form.email,
                message: form.message,
                error: Some(reason.to_owned()),
            },
            toast: ToastView::new(&Notice::new(reason), duration),
        },
    }
}
