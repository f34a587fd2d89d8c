//! Native model label normalization

use crate::domain::PiiLabel;

/// Map a predictor's native label into the PII taxonomy
///
/// `B-`/`I-` prefixes are stripped first. Standard NER classes map onto the
/// taxonomy (person -> given name, location -> city, organization and misc ->
/// username); `O` becomes [`PiiLabel::None`]; anything else is passed through
/// by tag.
pub fn normalize_label(raw: &str) -> PiiLabel {
    let upper = raw.trim().to_uppercase();
    let stripped = upper
        .strip_prefix("B-")
        .or_else(|| upper.strip_prefix("I-"))
        .unwrap_or(&upper);

    match stripped {
        "PER" | "PERSON" => PiiLabel::GivenName,
        "LOC" | "LOCATION" => PiiLabel::City,
        "ORG" | "ORGANIZATION" | "MISC" => PiiLabel::Username,
        other => PiiLabel::from_tag(other),
    }
}
