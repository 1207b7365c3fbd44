use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

/// Any status may replace any other; transitions are not validated.
#[derive(Debug, Default, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    #[default]
    Available,
    Borrowed,
    Reserved,
    Lost,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Borrowed => "BORROWED",
            BookStatus::Reserved => "RESERVED",
            BookStatus::Lost => "LOST",
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(BookStatus::Available),
            "BORROWED" => Ok(BookStatus::Borrowed),
            "RESERVED" => Ok(BookStatus::Reserved),
            "LOST" => Ok(BookStatus::Lost),
            _ => Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Unknown book status: {s}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::entity::BookStatus;

    #[test]
    fn parses_its_own_names() {
        for status in [
            BookStatus::Available,
            BookStatus::Borrowed,
            BookStatus::Reserved,
            BookStatus::Lost,
        ] {
            assert_eq!(status.as_str().parse::<BookStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_lowercase() {
        assert!("available".parse::<BookStatus>().is_err());
    }

    #[test]
    fn serializes_upper_case() {
        let json = serde_json::to_string(&BookStatus::Borrowed).unwrap();
        assert_eq!(json, r#""BORROWED""#);
        let status: BookStatus = serde_json::from_str(r#""LOST""#).unwrap();
        assert_eq!(status, BookStatus::Lost);
    }
}
