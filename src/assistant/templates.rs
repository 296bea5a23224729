//! Keyword classification and response templates.
//!
//! There is no model behind the assistant. A query is lowercased, checked
//! against a fixed keyword table in priority order, and answered with the
//! matching canned template.

use crate::error::ArkaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder replaced by the user's query.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Classification bucket for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SystemOptimization,
    SecurityScan,
    FileManagement,
    NetworkDiagnostics,
    HardwareInfo,
    General,
}

impl Intent {
    /// Intents in the order they are tested. Earlier entries win.
    pub const PRIORITY: [Intent; 6] = [
        Intent::SystemOptimization,
        Intent::SecurityScan,
        Intent::FileManagement,
        Intent::NetworkDiagnostics,
        Intent::HardwareInfo,
        Intent::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::SystemOptimization => "system_optimization",
            Intent::SecurityScan => "security_scan",
            Intent::FileManagement => "file_management",
            Intent::NetworkDiagnostics => "network_diagnostics",
            Intent::HardwareInfo => "hardware_info",
            Intent::General => "general",
        }
    }

    /// Parse a tag, falling back to `General` for anything unrecognised.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Intent::General)
    }

    /// Keywords that select this intent.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Intent::SystemOptimization => &[
                "optimize",
                "optimise",
                "optimization",
                "speed up",
                "faster",
                "boost",
                "performance",
                "free up",
                "clean up",
                "cleanup",
            ],
            Intent::SecurityScan => &[
                "security", "virus", "malware", "scan", "firewall", "threat", "protect",
            ],
            Intent::FileManagement => &[
                "file", "folder", "directory", "duplicate", "organize", "disk space", "storage",
            ],
            Intent::NetworkDiagnostics => &[
                "network", "internet", "wifi", "wi-fi", "ping", "connection", "bandwidth", "slow",
                "lag",
            ],
            Intent::HardwareInfo => &[
                "cpu", "processor", "ram", "memory", "temperature", "gpu", "hardware", "specs",
            ],
            Intent::General => &[],
        }
    }

    /// Response template for this intent.
    pub fn template(self) -> &'static str {
        match self {
            Intent::SystemOptimization => {
                "Optimization plan for \"{query}\":\n\
                 1. Clearing standby memory and trimming working sets\n\
                 2. Disabling non-essential startup programs\n\
                 3. Purging temporary files and prefetch caches\n\
                 4. Switching the power plan to high performance\n\
                 Run the Memory Optimization operation to apply these steps."
            }
            Intent::SecurityScan => {
                "Security review for \"{query}\":\n\
                 - Firewall: active on all profiles\n\
                 - Real-time protection: enabled\n\
                 - Definitions: up to date\n\
                 Start a Security Scan for a full sweep of system files."
            }
            Intent::FileManagement => {
                "File management for \"{query}\":\n\
                 - Large files over 1 GB are candidates for archiving\n\
                 - Duplicate detection groups files by size and hash\n\
                 - Temporary folders can be cleaned safely\n\
                 Run Disk Cleanup to reclaim space automatically."
            }
            Intent::NetworkDiagnostics => {
                "Network diagnostics for \"{query}\":\n\
                 - Adapter status: connected\n\
                 - DNS resolution: responding\n\
                 - Latency and throughput are shown on the network panel\n\
                 Run Network Optimization to flush DNS and reset the stack."
            }
            Intent::HardwareInfo => {
                "Hardware overview for \"{query}\":\n\
                 - CPU: 8 logical cores with dynamic boost\n\
                 - Memory: 32 GB\n\
                 - Storage: 1 TB NVMe\n\
                 Live usage and temperature are on the dashboard."
            }
            Intent::General => {
                "Arka here. You asked: \"{query}\"\n\
                 I can optimize performance, scan for threats, tidy files, \
                 diagnose the network, or report on hardware. \
                 Try asking about one of those."
            }
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ArkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::PRIORITY
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| ArkaError::unknown_intent(s))
    }
}

/// Pick the intent for a free-text query.
pub fn classify(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    Intent::PRIORITY
        .into_iter()
        .find(|intent| intent.keywords().iter().any(|k| lowered.contains(k)))
        .unwrap_or(Intent::General)
}

/// Every keyword that occurs in the query, in priority order.
pub fn matched_keywords(query: &str) -> Vec<&'static str> {
    let lowered = query.to_lowercase();
    Intent::PRIORITY
        .into_iter()
        .flat_map(|intent| intent.keywords().iter().copied())
        .filter(|k| lowered.contains(k))
        .collect()
}

/// Fill the intent's template with the query.
pub fn render(intent: Intent, query: &str) -> String {
    substitute(intent.template(), query)
}

/// Like [`render`] for a textual tag; unknown tags use the general template.
pub fn render_tag(tag: &str, query: &str) -> String {
    render(Intent::from_tag(tag), query)
}

/// Classify and render in one step.
pub fn respond(query: &str) -> (Intent, String) {
    let intent = classify(query);
    (intent, render(intent, query))
}

/// Replace the first placeholder only. A template without one is returned as is.
pub fn substitute(template: &str, query: &str) -> String {
    template.replacen(QUERY_PLACEHOLDER, query, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimization_wins_over_slow() {
        assert_eq!(
            classify("my system is slow and I need to optimize"),
            Intent::SystemOptimization
        );
        assert_eq!(classify("everything is slow"), Intent::NetworkDiagnostics);
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(classify("hello"), Intent::General);
        assert_eq!(classify(""), Intent::General);
        assert_eq!(classify("🙂🙂🙂"), Intent::General);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("RUN A VIRUS SCAN"), Intent::SecurityScan);
        assert_eq!(classify("Where did that FILE go"), Intent::FileManagement);
        assert_eq!(classify("cpu temperature?"), Intent::HardwareInfo);
    }

    #[test]
    fn test_every_template_has_one_placeholder() {
        for intent in Intent::PRIORITY {
            assert_eq!(intent.template().matches(QUERY_PLACEHOLDER).count(), 1, "{}", intent);
        }
    }

    #[test]
    fn test_render_substitutes_once() {
        let text = render(Intent::General, "say {query}");
        assert!(text.contains("\"say {query}\""));
        assert!(!text.starts_with("Arka here. You asked: \"say say"));
    }

    #[test]
    fn test_substitute_without_placeholder_is_noop() {
        assert_eq!(substitute("static reply", "anything"), "static reply");
    }

    #[test]
    fn test_parse_intent_tag() {
        assert_eq!("security_scan".parse::<Intent>().unwrap(), Intent::SecurityScan);
        assert!(matches!(
            "weather".parse::<Intent>(),
            Err(ArkaError::UnknownIntent(tag)) if tag == "weather"
        ));
    }

    #[test]
    fn test_unknown_tag_uses_general() {
        assert_eq!(Intent::from_tag("weather"), Intent::General);
        assert_eq!(render_tag("weather", "hi"), render(Intent::General, "hi"));
        assert_eq!(Intent::from_tag("security_scan"), Intent::SecurityScan);
    }

    #[test]
    fn test_matched_keywords() {
        assert_eq!(
            matched_keywords("Optimize my slow wifi"),
            vec!["optimize", "wifi", "slow"]
        );
        assert!(matched_keywords("hello").is_empty());
    }

    #[test]
    fn test_respond() {
        let (intent, text) = respond("check my firewall");
        assert_eq!(intent, Intent::SecurityScan);
        assert!(text.starts_with("Security review for \"check my firewall\""));
    }
}
