//! Classification views a task listing can be asked for.

use crate::model::task_list::ListId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Built-in classification or one user list.
///
/// - `Pending`: top-level, not completed, not trashed.
/// - `Completed`: completed and not trashed.
/// - `Trashed`: trashed, whatever the completion state.
/// - `List(id)`: pending-shaped filter restricted to one list's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListView {
    Pending,
    Completed,
    Trashed,
    List(ListId),
}

impl Display for ListView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Completed => f.write_str("completed"),
            Self::Trashed => f.write_str("trash"),
            Self::List(list_id) => write!(f, "{list_id}"),
        }
    }
}

/// Parses `pending`, `completed`, `trash`/`trashed` or a list id.
impl FromStr for ListView {
    type Err = ViewParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = value.trim();
        match token.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "trash" | "trashed" => Ok(Self::Trashed),
            _ => token
                .parse::<ListId>()
                .map(Self::List)
                .map_err(|_| ViewParseError(token.to_string())),
        }
    }
}

/// Token is neither a built-in view name nor an integer list id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParseError(pub String);

impl Display for ViewParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid list view `{}`; expected pending|completed|trash or a list id",
            self.0
        )
    }
}

impl Error for ViewParseError {}
