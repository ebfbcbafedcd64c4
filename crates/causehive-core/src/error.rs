use std::fmt;

/// Machine-readable error codes surfaced by the CLI and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidCausePayload,
    StorageUnavailable,
    StorageCorrupt,
    SuggestionFetchFailed,
    SuggestionDecodeFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidCausePayload => "E2001",
            Self::StorageUnavailable => "E5001",
            Self::StorageCorrupt => "E5002",
            Self::SuggestionFetchFailed => "E6001",
            Self::SuggestionDecodeFailed => "E6002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidCausePayload => "Cause payload is not valid JSON",
            Self::StorageUnavailable => "Local storage unavailable",
            Self::StorageCorrupt => "Local storage holds unreadable data",
            Self::SuggestionFetchFailed => "Suggestion request failed",
            Self::SuggestionDecodeFailed => "Suggestion response could not be decoded",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => {
                Some("Fix syntax in ~/.config/causehive/config.toml and retry.")
            }
            Self::InvalidCausePayload => {
                Some("Pass a JSON array of causes or a paginated {\"results\": [...]} object.")
            }
            Self::StorageUnavailable => Some("Check [storage] path and write permissions."),
            Self::StorageCorrupt => Some("Run `hive history clear` to reset the stored value."),
            Self::SuggestionFetchFailed => {
                Some("Check [api] base_url or CAUSEHIVE_API_BASE and network access.")
            }
            Self::SuggestionDecodeFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 6] = [
        ErrorCode::ConfigParseError,
        ErrorCode::InvalidCausePayload,
        ErrorCode::StorageUnavailable,
        ErrorCode::StorageCorrupt,
        ErrorCode::SuggestionFetchFailed,
        ErrorCode::SuggestionDecodeFailed,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let code = code.code();
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::StorageCorrupt.to_string(), "E5002");
    }
}
