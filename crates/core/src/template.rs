use crate::error::FormatError;
use crate::format::{self, Arg};
use crate::keys::{EXAMPLE, EXAMPLE_COLOR, EXAMPLE_FORMAT, EXAMPLE_LIST};
use indexmap::IndexMap;
use messenger_text::translate_color_codes;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

/// Separates the lines of a multi-line message while it is formatted as one text.
const SPLIT_TOKEN: &str = "\n";

/// Color marker used in message files.
pub const COLOR_CHAR: char = '&';

/// One message entry: a single line or an ordered list of lines.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Template {
    Line(String),
    Lines(Vec<String>),
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::Line(value.to_string())
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Template::Line(value)
    }
}

impl From<Vec<String>> for Template {
    fn from(value: Vec<String>) -> Self {
        Template::Lines(value)
    }
}

impl From<Vec<&str>> for Template {
    fn from(value: Vec<&str>) -> Self {
        Template::Lines(value.into_iter().map(String::from).collect())
    }
}

impl Template {
    /// Produces the colored output. `args` of `None` skips substitution
    /// entirely, so `%` in the text is kept as written.
    pub fn render(&self, args: Option<&[Arg]>) -> Result<Rendered, FormatError> {
        let substitute = |text: String| match args {
            Some(args) => format::format(&text, args),
            None => Ok(text),
        };
        match self {
            Template::Line(line) => {
                let text = substitute(line.clone())?;
                Ok(Rendered::Line(translate_color_codes(COLOR_CHAR, &text)))
            }
            Template::Lines(lines) => {
                let mut joined = String::new();
                for line in lines {
                    joined.push_str(line);
                    joined.push_str(SPLIT_TOKEN);
                }
                let text = translate_color_codes(COLOR_CHAR, &substitute(joined)?);
                Ok(Rendered::Lines(split_lines(&text)))
            }
        }
    }
}

/// Splits on [`SPLIT_TOKEN`] and drops trailing empty lines.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split(SPLIT_TOKEN).map(String::from).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Default messages, in the order they are written to a new message file.
pub type Defaults = IndexMap<String, Template>;

/// An easy way to create [`Defaults`]
#[macro_export]
macro_rules! defaults(
    { $($key:expr => $value:expr),* $(,)? } => {
        {
            #[allow(unused_mut)]
            let mut m = $crate::template::Defaults::new();
            $(
                m.insert($key.into(), $crate::template::Template::from($value));
            )*
            m
        }
     };
);

/// The bundled example messages.
pub fn example_defaults() -> Defaults {
    defaults! {
        EXAMPLE => "This is a string",
        EXAMPLE_FORMAT => "This is a string with some data in it: %s",
        EXAMPLE_COLOR => "This is a string with some &ccolor in it",
        EXAMPLE_LIST => vec!["This is the first message", "This is the second message"],
    }
}

/// The outcome of looking up and rendering a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Line(String),
    Lines(Vec<String>),
    /// Neither the message file nor the defaults have the key.
    Missing,
    /// The message file holds something other than a string or list of strings.
    Malformed { found: String },
}

impl Rendered {
    pub fn is_missing(&self) -> bool {
        matches!(self, Rendered::Missing)
    }

    /// The rendered text as lines, or `None` for a missing or malformed entry.
    pub fn lines(&self) -> Option<Vec<&str>> {
        match self {
            Rendered::Line(line) => Some(vec![line.as_str()]),
            Rendered::Lines(lines) => Some(lines.iter().map(String::as_str).collect()),
            Rendered::Missing | Rendered::Malformed { .. } => None,
        }
    }
}

/// A value read from the message file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(crate) enum Entry {
    Template(Template),
    Other(Value),
}

impl Entry {
    /// Short description of a value that is not a template.
    pub(crate) fn describe(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("boolean {}", b),
            Value::Number(n) => format!("number {}", n),
            Value::String(s) => format!("string {:?}", s),
            Value::Sequence(_) => "list with non-string items".to_string(),
            Value::Mapping(_) => "mapping".to_string(),
            Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
        }
    }
}

impl From<Template> for Entry {
    fn from(template: Template) -> Self {
        Entry::Template(template)
    }
}
