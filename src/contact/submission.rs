//! Contact submission types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Operand used when `a` or `b` is missing or not a number.
pub(crate) const DEFAULT_OPERAND: i64 = 0;

/// Answer used when `answer` is missing or not a number.
///
/// Never equal to a sum of two default operands, so a submission without a
/// challenge always fails.
pub(crate) const MISSING_ANSWER: i64 = -999;

/// A raw submission, as posted by the contact form.
///
/// Every field is untrusted and may be absent. Text fields accept numbers
/// and booleans as their textual form; any other JSON type counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    /// Sender's name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Sender's email address.
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    /// Sender's phone number (optional, free-form).
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    /// Message body.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    /// Arithmetic challenge.
    #[serde(default)]
    pub antibot: Option<AntibotChallenge>,
    /// Honeypot field, kept raw. Genuine clients always send it empty.
    #[serde(default)]
    pub hp: Value,
}

impl Submission {
    /// Whether the honeypot field was filled in.
    ///
    /// Absent, `null` and blank strings are empty; any other value is a fill.
    pub fn honeypot_filled(&self) -> bool {
        match &self.hp {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_text(&Value::deserialize(deserializer)?))
}

/// Interpret a JSON value as text.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Arithmetic challenge sent with a submission.
///
/// Operands and answer are kept as raw JSON so numbers and numeric strings
/// are both accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AntibotChallenge {
    #[serde(default)]
    pub a: Value,
    #[serde(default)]
    pub b: Value,
    #[serde(default)]
    pub answer: Value,
    /// Signed challenge token issued by the server.
    #[serde(default)]
    pub token: Option<String>,
}

impl AntibotChallenge {
    /// Client-supplied operands, with non-numeric values coerced to zero.
    pub fn operands(&self) -> (i64, i64) {
        (
            coerce_int(&self.a).unwrap_or(DEFAULT_OPERAND),
            coerce_int(&self.b).unwrap_or(DEFAULT_OPERAND),
        )
    }

    /// Claimed answer, with non-numeric values coerced to a sentinel.
    pub fn answer(&self) -> i64 {
        coerce_int(&self.answer).unwrap_or(MISSING_ANSWER)
    }

    /// Signed token, if a non-blank one was sent.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Interpret a JSON value as an integer.
///
/// Accepts integers, integral floats and strings holding either. Anything
/// else yields `None`.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // Beyond 2^53 floats stop representing every integer.
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE).then_some(f as i64)
}

/// A submission that passed every check.
///
/// Required fields are trimmed and non-empty; `phone` is `None` when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}
