//! HTML rendering of the contact form view.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::types::FormSnapshot;
use crate::core::view::{FormView, form_view};

const FORM_TEMPLATE: &str = include_str!("templates/form.html");

/// Template engine wrapper around minijinja.
///
/// The template name ends in `.html`, so every interpolated value is escaped.
pub struct FormRenderer {
    env: Environment<'static>,
}

impl FormRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("form.html", FORM_TEMPLATE)
            .context("load form template")?;
        Ok(Self { env })
    }

    pub fn render(&self, snapshot: &FormSnapshot) -> Result<String> {
        self.render_view(&form_view(snapshot))
    }

    pub fn render_view(&self, view: &FormView) -> Result<String> {
        let template = self.env.get_template("form.html")?;
        let rendered = template
            .render(context! {
                phase => view.phase,
                show_form => view.show_form,
                fields => &view.fields,
                submit => &view.submit,
                focus => view.focus,
                notice => &view.notice,
            })
            .context("render form template")?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::focus::focus_target;
    use crate::core::types::{Phase, SubmissionRecord};
    use crate::core::validator::validate_record;
    use crate::test_support::record;

    fn rejected(record: SubmissionRecord) -> FormSnapshot {
        let errors = validate_record(&record);
        FormSnapshot {
            focus: focus_target(&errors),
            record,
            errors,
            phase: Phase::Idle,
        }
    }

    #[test]
    fn renders_error_linkage_and_focus() {
        let renderer = FormRenderer::new().expect("renderer");
        let html = renderer
            .render(&rejected(record("Ann", "ann@example", "new-website", "short")))
            .expect("render");

        assert!(html.contains(r#"aria-invalid="true" aria-describedby="email-error" autofocus"#));
        assert!(html.contains(
            r#"<p id="email-error" class="input-error" role="alert">Please enter a valid email address</p>"#
        ));
        assert!(html.contains(r#"aria-describedby="message-error""#));
        assert!(!html.contains("name-error"));
        assert!(html.contains(
            r#"placeholder="Your name" aria-required="true" aria-invalid="false">"#
        ));
        // Optional input carries no ARIA validity state.
        assert!(html.contains(r#"<select id="budget" name="budget" class="input-field">"#));
        assert!(html.contains(r#"data-focus="email""#));
        assert!(html.contains(r#"<option value="new-website" selected>New Website</option>"#));
    }

    #[test]
    fn escapes_user_input() {
        let renderer = FormRenderer::new().expect("renderer");
        let html = renderer
            .render(&rejected(record("<script>", "", "", "")))
            .expect("render");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn success_hides_form() {
        let renderer = FormRenderer::new().expect("renderer");
        let snapshot = FormSnapshot {
            phase: Phase::Success,
            ..FormSnapshot::default()
        };
        let html = renderer.render(&snapshot).expect("render");
        assert!(html.contains("Message sent!"));
        assert!(html.contains(r#"role="status""#));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn submitting_shows_busy_button() {
        let renderer = FormRenderer::new().expect("renderer");
        let snapshot = FormSnapshot {
            phase: Phase::Submitting,
            record: record("Ann", "ann@example.com", "other", "long enough message here"),
            ..FormSnapshot::default()
        };
        let html = renderer.render(&snapshot).expect("render");
        assert!(html.contains(r#"disabled aria-busy="true">Sending...</button>"#));
    }
}
