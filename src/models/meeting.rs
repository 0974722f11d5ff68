use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a meeting. The server only ever emits these four
/// values; anything else is a deserialization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingStatus {
    Upcoming,
    InReview,
    Cancelled,
    Completed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Upcoming => write!(f, "Upcoming"),
            MeetingStatus::InReview => write!(f, "In Review"),
            MeetingStatus::Cancelled => write!(f, "Cancelled"),
            MeetingStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl MeetingStatus {
    /// Parse a user-supplied status argument (CLI input, case-insensitive).
    pub fn parse_arg(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "upcoming" => Some(MeetingStatus::Upcoming),
            "in-review" | "review" => Some(MeetingStatus::InReview),
            "cancelled" => Some(MeetingStatus::Cancelled),
            "completed" => Some(MeetingStatus::Completed),
            _ => None,
        }
    }
}

/// A meeting record as the server returns it. The server is authoritative;
/// this is a transient copy refetched per listing with no local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub status: MeetingStatus,
    pub agenda: String,
    /// Wire format "YYYY-MM-DD"
    pub date: String,
    /// Wire format "HH:MM" or "HH:MM:SS"
    pub start_time: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// Body for create and update requests. Identical to `Meeting` minus the
/// server-assigned id. No client-side validation happens here - the server
/// rejects bad payloads and the error surfaces as `ApiError::Validation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingPayload {
    pub status: MeetingStatus,
    pub agenda: String,
    pub date: String,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Meeting {
    /// Date formatted for display: "Sep 01, 2026", falling back to the raw
    /// wire string if the server sent something unparsable.
    pub fn formatted_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(d) => d.format("%b %d, %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// Start time formatted for display: "07:00 PM".
    pub fn formatted_time(&self) -> String {
        let parsed = NaiveTime::parse_from_str(&self.start_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.start_time, "%H:%M"));
        match parsed {
            Ok(t) => t.format("%I:%M %p").to_string(),
            Err(_) => self.start_time.clone(),
        }
    }

    pub fn website_display(&self) -> &str {
        self.website.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_wire_format_is_kebab_case() {
        let json = serde_json::to_string(&MeetingStatus::InReview).unwrap();
        assert_eq!(json, "\"in-review\"");

        let status: MeetingStatus = serde_json::from_str("\"upcoming\"").unwrap();
        assert_eq!(status, MeetingStatus::Upcoming);
        let status: MeetingStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, MeetingStatus::Completed);
        let status: MeetingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, MeetingStatus::Cancelled);
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(serde_json::from_str::<MeetingStatus>("\"postponed\"").is_err());
    }

    #[test]
    fn parses_server_meeting() {
        let json = r#"{
            "id": 42,
            "status": "in-review",
            "agenda": "Quarterly planning",
            "date": "2026-09-01",
            "start_time": "19:00:00",
            "website": "https://meet.example.com/q3"
        }"#;
        let m: Meeting = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, 42);
        assert_eq!(m.status, MeetingStatus::InReview);
        assert_eq!(m.agenda, "Quarterly planning");
        assert_eq!(m.formatted_date(), "Sep 01, 2026");
        assert_eq!(m.formatted_time(), "07:00 PM");
    }

    #[test]
    fn website_is_optional() {
        let json = r#"{"id":1,"status":"upcoming","agenda":"Standup","date":"2026-09-02","start_time":"09:30"}"#;
        let m: Meeting = serde_json::from_str(json).unwrap();
        assert_eq!(m.website, None);
        assert_eq!(m.website_display(), "-");
        assert_eq!(m.formatted_time(), "09:30 AM");
    }

    #[test]
    fn payload_omits_absent_website() {
        let payload = MeetingPayload {
            status: MeetingStatus::Upcoming,
            agenda: "Standup".to_string(),
            date: "2026-09-02".to_string(),
            start_time: "09:30".to_string(),
            website: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("website").is_none());
        assert_eq!(json["status"], "upcoming");
        assert_eq!(json["start_time"], "09:30");
    }

    #[test]
    fn unparsable_date_falls_back_to_raw_string() {
        let m = Meeting {
            id: 1,
            status: MeetingStatus::Upcoming,
            agenda: String::new(),
            date: "soon".to_string(),
            start_time: "later".to_string(),
            website: None,
        };
        assert_eq!(m.formatted_date(), "soon");
        assert_eq!(m.formatted_time(), "later");
    }

    #[test]
    fn parse_arg_accepts_cli_spellings() {
        assert_eq!(MeetingStatus::parse_arg("Upcoming"), Some(MeetingStatus::Upcoming));
        assert_eq!(MeetingStatus::parse_arg("in-review"), Some(MeetingStatus::InReview));
        assert_eq!(MeetingStatus::parse_arg("review"), Some(MeetingStatus::InReview));
        assert_eq!(MeetingStatus::parse_arg("nope"), None);
    }
}
