//! Three-state admin credential
//!
//! "Not logged in" and "logged in without a token" are different states and
//! are kept apart by the type instead of by string-emptiness conventions:
//!
//! | State | Logged in | `Authorization` header |
//! |---|---|---|
//! | [`Credential::NoCredential`] | no | none |
//! | [`Credential::NoAuthMode`] | yes | none |
//! | [`Credential::Token`] | yes | `Bearer <token>` |

use std::fmt;

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    /// No record exists: logged out.
    #[default]
    NoCredential,

    /// Logged in against a backend that runs without auth.
    NoAuthMode,

    /// Logged in with a non-blank, trimmed bearer token.
    Token(String),
}

impl Credential {
    /// Interpret operator input.
    ///
    /// `None` and blank strings mean "no credential"; anything else is trimmed
    /// and kept as a token. Use [`Credential::NoAuthMode`] explicitly to opt
    /// into no-auth mode.
    pub fn from_input(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(token) if !token.is_empty() => Self::Token(token.to_string()),
            _ => Self::NoCredential,
        }
    }

    /// Interpret a persisted record.
    ///
    /// A missing record is logged out. A present but blank record is the
    /// explicit no-auth marker.
    pub fn from_stored(record: Option<String>) -> Self {
        match record {
            None => Self::NoCredential,
            Some(raw) => match raw.trim() {
                "" => Self::NoAuthMode,
                token => Self::Token(token.to_string()),
            },
        }
    }

    /// The value as it is persisted: absent, empty, or the token.
    pub fn as_stored(&self) -> Option<&str> {
        match self {
            Self::NoCredential => None,
            Self::NoAuthMode => Some(""),
            Self::Token(token) => Some(token),
        }
    }

    /// True iff a record exists, including the empty no-auth record.
    pub fn is_logged_in(&self) -> bool {
        !matches!(self, Self::NoCredential)
    }

    /// Token to send as a bearer credential, if any.
    ///
    /// No-auth mode carries no bytes, so it yields `None` just like the
    /// logged-out state. So does a `Token` built directly around a blank string.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) if !token.trim().is_empty() => Some(token),
            _ => None,
        }
    }

    /// Apply the input rules to a directly constructed value.
    ///
    /// A `Token` is trimmed, and a blank one becomes [`Credential::NoCredential`].
    pub fn normalized(self) -> Self {
        match self {
            Self::Token(token) => Self::from_input(Some(&token)),
            other => other,
        }
    }

    /// Short description safe to write to logs.
    pub fn masked(&self) -> String {
        match self {
            Self::NoCredential => "logged out".to_string(),
            Self::NoAuthMode => "no-auth mode".to_string(),
            Self::Token(token) => {
                let tail: String = token
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                if token.chars().count() > 8 {
                    format!("token ...{tail}")
                } else {
                    "token ****".to_string()
                }
            }
        }
    }
}

// Tokens never end up in debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredential => f.write_str("NoCredential"),
            Self::NoAuthMode => f.write_str("NoAuthMode"),
            Self::Token(_) => f.write_str("Token(****)"),
        }
    }
}
