//! Contact-detail detection and scrubbing for free text pulled off listing pages.
//!
//! Scrubbing runs the patterns from most to least specific: a contact phrase
//! ("call me at 077...", "WhatsApp: +94 ...") is replaced as a whole before the
//! email and bare phone patterns see the text, so a number inside such a phrase
//! is only ever reported under [`PiiKind::Whatsapp`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Replacement written over every match.
pub const REDACTION_TOKEN: &str = "[REDACTED]";

/// Leading country code or zero, then 8-10 more digits with optional separators.
const PHONE: &str = r"(?:\+94|0)\s*\d(?:[\s\-]?\d){7,9}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    PhoneNumber,
    Email,
    /// Messaging-app handle or "call/contact me" redirect
    Whatsapp,
}

struct PiiPattern {
    kind: PiiKind,
    regex: Regex,
}

static PATTERNS: Lazy<Vec<PiiPattern>> = Lazy::new(|| {
    vec![
        PiiPattern {
            kind: PiiKind::Whatsapp,
            regex: Regex::new(&format!(
                r"(?i)\b(?:whats\s?app|viber|imo|call|contact|text|sms)(?:\s+(?:me|us))?(?:\s+(?:at|on|via))?\s*[:\-]?\s*{PHONE}"
            ))
            .expect("contact pattern is valid"),
        },
        PiiPattern {
            kind: PiiKind::Email,
            regex: Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
                .expect("email pattern is valid"),
        },
        PiiPattern {
            kind: PiiKind::PhoneNumber,
            regex: Regex::new(PHONE).expect("phone pattern is valid"),
        },
    ]
});

/// Result of scrubbing one piece of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scrubbed {
    pub text: String,
    pub kinds: BTreeSet<PiiKind>,
}

impl Scrubbed {
    pub fn detected(&self) -> bool {
        !self.kinds.is_empty()
    }
}

/// Detect and redact in one pass, most specific pattern first.
pub fn scrub(text: &str) -> Scrubbed {
    let mut current = text.to_string();
    let mut kinds = BTreeSet::new();

    for pattern in PATTERNS.iter() {
        if pattern.regex.is_match(&current) {
            kinds.insert(pattern.kind);
            current = pattern
                .regex
                .replace_all(&current, REDACTION_TOKEN)
                .into_owned();
        }
    }

    Scrubbed {
        text: current,
        kinds,
    }
}

pub fn detect(text: &str) -> BTreeSet<PiiKind> {
    scrub(text).kinds
}

pub fn redact(text: &str) -> String {
    scrub(text).text
}
