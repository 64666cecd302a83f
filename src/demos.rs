//! Reference forms shown by the terminal front end

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AppConfig;
use crate::state::{
    submit_fn, FieldKind, FieldSpec, FormCallbacks, FormEngine, FormOptions, FormSchema,
    FormValues, SelectOption, StepSpec, ValidationRules,
};

/// Simulated round-trip of the demo submit handler
const SUBMIT_LATENCY: Duration = Duration::from_millis(600);

/// Which form is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoKind {
    #[default]
    Contact,
    SignUp,
    Custom,
}

impl DemoKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "contact" | "simple" => Some(Self::Contact),
            "signup" | "wizard" | "multi" => Some(Self::SignUp),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Contact => "Contact Us",
            Self::SignUp => "Sign Up",
            Self::Custom => "Custom Form",
        }
    }

    /// Next demo in the cycle; custom is only included when configured
    pub fn next(&self, has_custom: bool) -> Self {
        match self {
            Self::Contact => Self::SignUp,
            Self::SignUp if has_custom => Self::Custom,
            Self::SignUp | Self::Custom => Self::Contact,
        }
    }
}

/// Messages the demo submit handler reports back to the app
#[derive(Debug, Clone)]
pub enum DemoEvent {
    Submitted { demo: DemoKind, values: FormValues },
    StepChanged { step: usize, total: usize },
    Reset { demo: DemoKind },
}

/// Flat contact form: three required fields
pub fn contact_schema() -> FormSchema {
    FormSchema::Flat(vec![
        FieldSpec::text("name", "Name")
            .required()
            .with_placeholder("Enter your name"),
        FieldSpec::email("email", "Email")
            .required()
            .with_placeholder("Enter your email"),
        FieldSpec::new("message", "Message", FieldKind::Textarea)
            .required()
            .with_placeholder("Type your message")
            .with_rules(ValidationRules::default().max_length(500)),
    ])
}

/// Three-step sign-up wizard
pub fn signup_schema() -> FormSchema {
    FormSchema::Stepped(vec![
        StepSpec::new(
            "Personal Info",
            vec![
                FieldSpec::text("firstName", "First Name").required(),
                FieldSpec::text("lastName", "Last Name").required(),
                FieldSpec::email("email", "Email").required(),
            ],
        )
        .with_description("Enter your personal details"),
        StepSpec::new(
            "Account Details",
            vec![
                FieldSpec::text("username", "Username").required().with_rules(
                    ValidationRules::default()
                        .min_length(3)
                        .custom(|value| {
                            (value.as_text().contains(' '))
                                .then(|| "Username cannot contain spaces".to_string())
                        }),
                ),
                FieldSpec::new("password", "Password", FieldKind::Password)
                    .required()
                    .with_rules(ValidationRules::default().min_length(8)),
            ],
        )
        .with_description("Set up your account"),
        StepSpec::new(
            "Preferences",
            vec![
                FieldSpec::checkbox("newsletter", "Subscribe to newsletter").with_default(true),
                FieldSpec::select(
                    "theme",
                    "Theme",
                    vec![
                        SelectOption::new("light", "Light"),
                        SelectOption::new("dark", "Dark"),
                    ],
                )
                .required(),
            ],
        )
        .with_description("Choose your preferences"),
    ])
}

/// Load the custom demo's schema from a JSON file
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading schema {}", path.display()))?;
    let schema = FormSchema::from_json(&json)
        .with_context(|| format!("loading schema {}", path.display()))?;
    Ok(schema)
}

/// Mount the engine for `demo`, wiring callbacks to `events`
pub fn build_engine(
    demo: DemoKind,
    config: &AppConfig,
    events: UnboundedSender<DemoEvent>,
) -> Result<FormEngine> {
    let (schema, submit_label) = match demo {
        DemoKind::Contact => (contact_schema(), "Send"),
        DemoKind::SignUp => (signup_schema(), "Finish"),
        DemoKind::Custom => {
            let Some(path) = config.schema_path.as_deref() else {
                bail!("no schema_path configured for the custom form");
            };
            (load_schema(path)?, "Submit")
        }
    };

    let options = FormOptions {
        submit_label: submit_label.to_string(),
        previous_label: "Back".to_string(),
        show_reset: config.show_reset(),
        show_step_indicator: config.show_step_indicator(),
        ..FormOptions::default()
    };

    let submit_events = events.clone();
    let on_submit = submit_fn(move |values: FormValues| {
        let events = submit_events.clone();
        async move {
            tokio::time::sleep(SUBMIT_LATENCY).await;
            if values.get("username").is_some_and(|u| u.as_text() == "admin") {
                bail!("username `admin` is reserved");
            }
            events
                .send(DemoEvent::Submitted { demo, values })
                .context("app stopped listening for submissions")?;
            anyhow::Ok(())
        }
    });

    let step_events = events.clone();
    let callbacks = FormCallbacks::new(on_submit)
        .on_reset(move || {
            let _ = events.send(DemoEvent::Reset { demo });
        })
        .on_step_change(move |step, total, _values| {
            let _ = step_events.send(DemoEvent::StepChanged { step, total });
        });

    Ok(FormEngine::new(schema, options, callbacks))
}
