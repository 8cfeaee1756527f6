use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldRule {
    pub selector: String,
    pub name: String,
    pub min: usize,
}

impl FieldRule {
    pub fn new(selector: impl Into<String>, name: impl Into<String>, min: usize) -> Self {
        Self {
            selector: selector.into(),
            name: name.into(),
            min,
        }
    }

    pub fn contact_defaults() -> Vec<Self> {
        vec![
            Self::new("#prenom", "Prénom", 1),
            Self::new("#nom", "Nom", 1),
            Self::new("#sujet", "Sujet", 1),
            Self::new("#message", "Message", 10),
        ]
    }
}

/// Message templates. `{name}` and `{min}` are substituted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FormMessages {
    pub required: String,
    pub min_length: String,
    pub success: String,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            required: "{name} est requis.".to_string(),
            min_length: "{name} doit contenir au moins {min} caractères.".to_string(),
            success: "Message envoyé ! Merci, je vous répondrai bientôt.".to_string(),
        }
    }
}

impl FormMessages {
    pub fn for_rule(&self, rule: &FieldRule) -> String {
        let template = if rule.min > 1 {
            &self.min_length
        } else {
            &self.required
        };
        template
            .replace("{name}", &rule.name)
            .replace("{min}", &rule.min.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOutcome {
    pub selector: String,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub fields: Vec<FieldOutcome>,
    pub skipped: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.fields
            .iter()
            .all(|field| field.verdict == Verdict::Valid)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|field| match &field.verdict {
            Verdict::Invalid { message } => Some((field.selector.as_str(), message.as_str())),
            Verdict::Valid => None,
        })
    }
}

/// Length as the browser reports it for a form value: UTF-16 code units of
/// the trimmed text.
pub fn field_length(raw: &str) -> usize {
    raw.trim().encode_utf16().count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    ShowingFeedback { submission: u64, success: bool },
}

#[derive(Clone, Debug)]
pub struct FormValidator {
    rules: Vec<FieldRule>,
    messages: FormMessages,
    phase: FormPhase,
    submissions: u64,
}

impl FormValidator {
    pub fn new(rules: Vec<FieldRule>, messages: FormMessages) -> Self {
        Self {
            rules,
            messages,
            phase: FormPhase::Idle,
            submissions: 0,
        }
    }

    pub fn messages(&self) -> &FormMessages {
        &self.messages
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Runs every rule against `value_of`. A `None` from the lookup means the
    /// field is absent from the form and the rule is skipped.
    pub fn submit<F>(&mut self, mut value_of: F) -> (u64, ValidationReport)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            let Some(raw) = value_of(&rule.selector) else {
                report.skipped.push(rule.selector.clone());
                continue;
            };
            let verdict = if field_length(&raw) < rule.min {
                Verdict::Invalid {
                    message: self.messages.for_rule(rule),
                }
            } else {
                Verdict::Valid
            };
            report.fields.push(FieldOutcome {
                selector: rule.selector.clone(),
                verdict,
            });
        }

        self.submissions += 1;
        self.phase = FormPhase::ShowingFeedback {
            submission: self.submissions,
            success: report.is_valid(),
        };
        (self.submissions, report)
    }

    /// Called when the success message timer for `submission` fires.
    /// Returns true when that message was still the current feedback.
    pub fn expire_success(&mut self, submission: u64) -> bool {
        match self.phase {
            FormPhase::ShowingFeedback {
                submission: current,
                success: true,
            } if current == submission => {
                self.phase = FormPhase::Idle;
                true
            }
            _ => false,
        }
    }
}
