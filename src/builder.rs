use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bytes left literal when encoding text: unreserved marks plus `/`.
const QUERY_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

pub const MODELS: [Model; 4] = [Model::ChatGpt, Model::Gemini, Model::Grok, Model::Perplexity];

pub const TEMPLATES: [Template; 4] = [
    Template::Explain,
    Template::Meaning,
    Template::TranslateArabic,
    Template::Verbatim,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Missing text. Provide the text to process.")]
    MissingText,
    #[error("Invalid action. Must be translate, pronounce, ai, or image.")]
    InvalidAction,
    #[error("Invalid template. Must be 1, 2, 3, or 4.")]
    InvalidTemplate,
    #[error("Invalid model. Must be chatgpt, gemini, grok, or perplexity.")]
    InvalidModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Translate,
    Pronounce,
    Ai,
    Image,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Pronounce => "pronounce",
            Self::Ai => "ai",
            Self::Image => "image",
        }
    }
}

impl FromStr for Action {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translate" => Ok(Self::Translate),
            "pronounce" => Ok(Self::Pronounce),
            "ai" => Ok(Self::Ai),
            "image" => Ok(Self::Image),
            _ => Err(BuildError::InvalidAction),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the fixed AI question phrasings, numbered 1 to 4 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Explain,
    Meaning,
    TranslateArabic,
    Verbatim,
}

impl Template {
    pub const fn number(self) -> u8 {
        match self {
            Self::Explain => 1,
            Self::Meaning => 2,
            Self::TranslateArabic => 3,
            Self::Verbatim => 4,
        }
    }

    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Explain),
            2 => Some(Self::Meaning),
            3 => Some(Self::TranslateArabic),
            4 => Some(Self::Verbatim),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Explain => "1 - Explain this",
            Self::Meaning => "2 - What does this mean",
            Self::TranslateArabic => "3 - Translate this in Arabic",
            Self::Verbatim => "4 - Just the selected text",
        }
    }

    pub fn question(self, text: &str) -> String {
        match self {
            Self::Explain => format!("explain this \"{text}\""),
            Self::Meaning => format!("what does this mean \"{text}\""),
            Self::TranslateArabic => format!("translate this in arabic \"{text}\""),
            Self::Verbatim => format!("\"{text}\""),
        }
    }
}

impl FromStr for Template {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or(BuildError::InvalidTemplate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Model {
    #[default]
    ChatGpt,
    Gemini,
    Grok,
    Perplexity,
}

impl Model {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChatGpt => "chatgpt",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
            Self::Perplexity => "perplexity",
        }
    }

    fn url(self, encoded_question: &str) -> String {
        match self {
            Self::ChatGpt => format!("https://chat.openai.com/?q={encoded_question}"),
            Self::Gemini => format!("https://gemini.google.com/?q={encoded_question}"),
            Self::Grok => format!("https://x.com/i/grok?text={encoded_question}"),
            Self::Perplexity => format!("https://www.perplexity.ai/search?q={encoded_question}"),
        }
    }
}

impl FromStr for Model {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MODELS
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(BuildError::InvalidModel)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request. The AI parameters only exist on the `Ai` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Translate(String),
    Pronounce(String),
    Image(String),
    Ai {
        text: String,
        template: Template,
        model: Model,
    },
}

impl ActionRequest {
    /// Validates raw wire parameters: action, then template and model for `ai`,
    /// then text. An empty `model` selects the default.
    pub fn parse(
        action: &str,
        text: &str,
        template: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, BuildError> {
        let required = || {
            if text.is_empty() {
                Err(BuildError::MissingText)
            } else {
                Ok(text.to_string())
            }
        };
        Ok(match action.parse::<Action>()? {
            Action::Translate => Self::Translate(required()?),
            Action::Pronounce => Self::Pronounce(required()?),
            Action::Image => Self::Image(required()?),
            Action::Ai => {
                let template = template
                    .ok_or(BuildError::InvalidTemplate)?
                    .parse::<Template>()?;
                let model = match model {
                    None | Some("") => Model::default(),
                    Some(name) => name.parse()?,
                };
                Self::Ai {
                    text: required()?,
                    template,
                    model,
                }
            }
        })
    }
}

pub fn encode(text: &str) -> String {
    utf8_percent_encode(text, QUERY_TEXT).to_string()
}

pub fn build_url(request: &ActionRequest) -> String {
    match request {
        ActionRequest::Pronounce(text) => {
            format!("https://www.google.com/search?q=pronounce+{}", encode(text))
        }
        ActionRequest::Image(text) => {
            format!("https://www.google.com/search?tbm=isch&q={}", encode(text))
        }
        ActionRequest::Translate(text) => format!(
            "https://translate.google.com/details?sl=en&tl=ar&text={}&op=translate",
            encode(text)
        ),
        ActionRequest::Ai {
            text,
            template,
            model,
        } => model.url(&encode(&template.question(text))),
    }
}

pub fn list_models() -> Vec<&'static str> {
    MODELS.iter().map(|m| m.as_str()).collect()
}
