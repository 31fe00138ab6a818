use serde::{Deserialize, Serialize};

/// Environment variable the platform sets to the current trace header.
pub const TRACE_ID_ENV: &str = "_X_AMZN_TRACE_ID";

/// Root trace identifier of the current invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Extract the `Root=` segment from a trace header such as
    /// `Root=1-5759e988-bd862e3fe1be46a994272793;Parent=53995c3f42cd8ad8;Sampled=1`.
    ///
    /// A header without key/value segments is taken as the root id itself.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        if header.is_empty() {
            return None;
        }

        if !header.contains('=') {
            return Some(Self(header.to_string()));
        }

        header
            .split(';')
            .filter_map(|segment| segment.trim().split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case("root"))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
    }

    /// Read the trace header of the current invocation, if any.
    pub fn from_env() -> Option<Self> {
        std::env::var(TRACE_ID_ENV)
            .ok()
            .and_then(|header| Self::from_header(&header))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TraceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_root_segment() {
        let id = TraceId::from_header(
            "Root=1-5759e988-bd862e3fe1be46a994272793;Parent=53995c3f42cd8ad8;Sampled=1",
        )
        .unwrap();
        assert_eq!(id.as_str(), "1-5759e988-bd862e3fe1be46a994272793");
    }

    #[test]
    fn root_need_not_come_first() {
        let id = TraceId::from_header("Parent=53995c3f42cd8ad8; Root=1-abc ;Sampled=0").unwrap();
        assert_eq!(id.as_str(), "1-abc");
    }

    #[test]
    fn bare_value_is_the_root() {
        assert_eq!(TraceId::from_header("1-abc").unwrap().as_str(), "1-abc");
    }

    #[test]
    fn header_without_root_yields_none() {
        assert_eq!(TraceId::from_header(""), None);
        assert_eq!(TraceId::from_header("Parent=53995c3f42cd8ad8;Sampled=1"), None);
        assert_eq!(TraceId::from_header("Root=;Sampled=1"), None);
    }
}
