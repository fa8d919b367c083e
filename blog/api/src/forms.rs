use std::collections::BTreeMap;

pub const REQUIRED_ERROR: &str = "This field is required.";
pub const INVALID_CHOICE_ERROR: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Per-field validation errors keyed by field name.
pub type FormErrors = BTreeMap<&'static str, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub initial: Option<String>,
}

/// A form described as plain data, what a GET form endpoint serializes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormDefinition {
    pub fields: Vec<FormField>,
}

/// Splits a request body into key/value pairs. JSON bodies must be objects;
/// null members count as absent. Everything else is read as an urlencoded
/// form.
pub fn parse_pairs(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Vec<(String, String)>, serde_json::Error> {
    if content_type
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
    {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;

        Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(value) => Some((key, value)),
                value => Some((key, value.to_string())),
            })
            .collect())
    } else {
        Ok(url::form_urlencoded::parse(body).into_owned().collect())
    }
}

/// The raw submitted values of the post form. Only known keys are picked up,
/// a submitted `pub_date` never reaches the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PostData {
    pub text: Option<String>,
    pub group: Option<String>,
}

impl PostData {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut data = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "text" => data.text = Some(value),
                "group" => data.group = Some(value),
                _ => {}
            }
        }

        data
    }

    /// Validates the submitted values. Leading/trailing whitespace is
    /// stripped from `text` before the required check, the only
    /// normalization performed. `group` must parse as an id here; whether it
    /// names an existing group is checked by the handler against the store.
    pub fn validate(&self) -> Result<PostForm, FormErrors> {
        let mut errors = FormErrors::new();

        let text = match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                errors
                    .entry("text")
                    .or_default()
                    .push(REQUIRED_ERROR.to_string());
                String::new()
            }
        };

        let group = match self.group.as_deref().filter(|group| !group.is_empty()) {
            Some(group) => match group.parse::<i64>() {
                Ok(group) => Some(group),
                Err(_) => {
                    errors
                        .entry("group")
                        .or_default()
                        .push(INVALID_CHOICE_ERROR.to_string());
                    None
                }
            },
            None => None,
        };

        if errors.is_empty() {
            Ok(PostForm { text, group })
        } else {
            Err(errors)
        }
    }
}

/// A validated post submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub text: String,
    pub group: Option<i64>,
}

impl PostForm {
    /// `initial` is `None` for every field, on the create and the edit form
    /// alike.
    pub fn definition() -> FormDefinition {
        FormDefinition {
            fields: vec![
                FormField {
                    name: "text",
                    kind: FieldKind::Text,
                    required: true,
                    initial: None,
                },
                FormField {
                    name: "group",
                    kind: FieldKind::Choice,
                    required: false,
                    initial: None,
                },
            ],
        }
    }
}

/// The raw submitted values of the comment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CommentData {
    pub text: Option<String>,
}

impl CommentData {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut data = Self::default();

        for (key, value) in pairs {
            if key == "text" {
                data.text = Some(value);
            }
        }

        data
    }

    pub fn validate(&self) -> Result<CommentForm, FormErrors> {
        let mut errors = FormErrors::new();

        let text = match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                errors
                    .entry("text")
                    .or_default()
                    .push(REQUIRED_ERROR.to_string());
                String::new()
            }
        };

        if errors.is_empty() {
            Ok(CommentForm { text })
        } else {
            Err(errors)
        }
    }
}

/// A validated comment submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn definition() -> FormDefinition {
        FormDefinition {
            fields: vec![FormField {
                name: "text",
                kind: FieldKind::Text,
                required: true,
                initial: None,
            }],
        }
    }
}

#[cfg(test)]
mod tests;
