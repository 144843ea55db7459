use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};

/// Why a list cell could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("unbalanced brackets in `{0}`")]
    Unbalanced(String),

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("`{0}` is not finite")]
    NotFinite(String),
}

/// Numeric list as it is stored in a station table cell.
///
/// Spreadsheet exports carry the lists as text, while TOML tables may use native arrays.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListCell {
    Numbers(Vec<f64>),
    Number(f64),
    Text(String),
}

impl ListCell {
    pub fn parse(&self) -> Result<Vec<f64>, ListError> {
        match self {
            Self::Numbers(numbers) => {
                if let Some(number) = numbers.iter().find(|number| !number.is_finite()) {
                    return Err(ListError::NotFinite(number.to_string()));
                }
                Ok(numbers.clone())
            }
            Self::Number(number) if number.is_finite() => Ok(vec![*number]),
            Self::Number(number) => Err(ListError::NotFinite(number.to_string())),
            Self::Text(text) => parse(text),
        }
    }
}

impl From<&str> for ListCell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<f64>> for ListCell {
    fn from(numbers: Vec<f64>) -> Self {
        Self::Numbers(numbers)
    }
}

impl Display for ListCell {
    /// Normalized `[a, b, c]` form, or the raw text when it does not parse.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.parse(), self) {
            (Ok(numbers), _) => write!(f, "[{}]", numbers.iter().join(", ")),
            (Err(_), Self::Text(text)) => write!(f, "{text}"),
            (Err(_), Self::Numbers(numbers)) => write!(f, "[{}]", numbers.iter().join(", ")),
            (Err(_), Self::Number(number)) => write!(f, "{number}"),
        }
    }
}

impl Serialize for ListCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse `[0, 700, 1400]`, `(0, 700)`, `0, 700, 1400`, or a single number.
///
/// Empty items are skipped, and an empty cell is an empty list.
pub fn parse(text: &str) -> Result<Vec<f64>, ListError> {
    let text = text.trim();
    let inner = match (text.chars().next(), text.chars().last()) {
        (Some('['), Some(']')) | (Some('('), Some(')')) if text.len() >= 2 => {
            &text[1..text.len() - 1]
        }
        (Some('[' | '('), _) | (_, Some(']' | ')')) => {
            return Err(ListError::Unbalanced(text.to_string()));
        }
        _ => text,
    };
    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let number =
                item.parse::<f64>().map_err(|_| ListError::NotANumber(item.to_string()))?;
            if number.is_finite() {
                Ok(number)
            } else {
                Err(ListError::NotFinite(item.to_string()))
            }
        })
        .collect()
}
