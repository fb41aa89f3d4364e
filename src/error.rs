use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("malformed entry: field `{field}` {reason}")]
    MalformedEntry { field: &'static str, reason: String },

    #[error("Add your Nightscout URL to the config file")]
    NotConfigured,

    #[error("invalid Nightscout URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response code was {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl FeedError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        FeedError::MalformedEntry {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_matches_menu_text() {
        assert_eq!(FeedError::Status(502).to_string(), "response code was 502");
    }

    #[test]
    fn test_malformed_entry_names_field() {
        let err = FeedError::malformed("sgv", "is missing");
        assert_eq!(err.to_string(), "malformed entry: field `sgv` is missing");
    }
}
