//! Label normalization shared by the ground-truth and detector-report parsers.

use std::sync::LazyLock;

use regex::Regex;

use crate::detect::{Label, MismatchKind};

/// Keyword patterns, checked in order. The auth-key pattern precedes the
/// plain auth pattern so "auth key" never falls through to `AuthMismatch`.
pub struct LabelPatterns {
    pub keywords: Vec<(Regex, MismatchKind)>,
    pub separators: Regex,
    pub trailing_colon: Regex,
    pub whitespace: Regex,
}

impl LabelPatterns {
    pub fn new() -> Self {
        let table = [
            (r"(?i)hello", MismatchKind::HelloMismatch),
            (r"(?i)dead", MismatchKind::DeadMismatch),
            (r"(?i)network\s*type", MismatchKind::NetworkTypeMismatch),
            (r"(?i)\barea\b", MismatchKind::AreaMismatch),
            (r"(?i)auth(entication)?\s*key|key\s*auth|authkey", MismatchKind::AuthKeyMismatch),
            (r"(?i)auth", MismatchKind::AuthMismatch),
            (r"(?i)\bmtu\b", MismatchKind::MtuMismatch),
            (r"(?i)passive", MismatchKind::PassiveMismatch),
            (r"(?i)redistribut", MismatchKind::RedistributeMismatch),
            (r"(?i)router\s*id|duplicate", MismatchKind::RouterIdMismatch),
        ];

        Self {
            keywords: table
                .into_iter()
                .map(|(pattern, kind)| (Regex::new(pattern).expect("Invalid label keyword regex"), kind))
                .collect(),
            separators: Regex::new(r"[_\-]+").expect("Invalid separators regex"),
            trailing_colon: Regex::new(r"\s*:\s*$").expect("Invalid trailing_colon regex"),
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace regex"),
        }
    }
}

impl Default for LabelPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LabelPatterns> = LazyLock::new(LabelPatterns::new);

/// Map free-form label text onto a canonical kind.
///
/// Text matching no keyword is kept as [`Label::Literal`].
pub fn normalize_label(raw: &str) -> Label {
    let cleaned = PATTERNS.separators.replace_all(raw.trim(), " ");
    let cleaned = PATTERNS.trailing_colon.replace(&cleaned, "");
    let cleaned = PATTERNS.whitespace.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();

    if let Ok(kind) = cleaned.parse::<MismatchKind>() {
        return Label::Kind(kind);
    }

    PATTERNS
        .keywords
        .iter()
        .find(|(pattern, _)| pattern.is_match(cleaned))
        .map(|(_, kind)| Label::Kind(*kind))
        .unwrap_or_else(|| Label::Literal(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> Option<MismatchKind> {
        normalize_label(raw).kind()
    }

    #[test]
    fn test_canonical_names() {
        for k in MismatchKind::ALL {
            assert_eq!(kind(k.as_str()), Some(k), "{}", k);
        }
    }

    #[test]
    fn test_report_fields() {
        for k in MismatchKind::ALL {
            let line = format!("{} Mismatch", k.report_field());
            assert_eq!(kind(&line), Some(k), "{}", line);
        }
    }

    #[test]
    fn test_keyword_variants() {
        assert_eq!(kind("hello interval"), Some(MismatchKind::HelloMismatch));
        assert_eq!(kind("Network-Type"), Some(MismatchKind::NetworkTypeMismatch));
        assert_eq!(kind("ospf auth Mismatch :"), Some(MismatchKind::AuthMismatch));
        assert_eq!(kind("auth_key Mismatch"), Some(MismatchKind::AuthKeyMismatch));
        assert_eq!(kind("key auth"), Some(MismatchKind::AuthKeyMismatch));
        assert_eq!(kind("authentication key"), Some(MismatchKind::AuthKeyMismatch));
        assert_eq!(kind("Duplicate RID"), Some(MismatchKind::RouterIdMismatch));
        assert_eq!(kind("router-id"), Some(MismatchKind::RouterIdMismatch));
        assert_eq!(kind("missing redistribution"), Some(MismatchKind::RedistributeMismatch));
    }

    #[test]
    fn test_unknown_label_kept_literally() {
        assert_eq!(
            normalize_label("  Cable Unplugged "),
            Label::Literal("Cable Unplugged".to_string())
        );
    }
}
