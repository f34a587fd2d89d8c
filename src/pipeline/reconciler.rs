//! Span reconciliation
//!
//! Pattern and model candidates are reconciled in two passes: adjacent
//! same-label fragments are stitched together, then overlaps are resolved
//! greedily by confidence. The result never contains two overlapping spans.

use crate::domain::Span;

/// Stitch adjacent fragments of one entity
///
/// Candidates are stably sorted by start. A candidate is folded into the
/// previous span when that span ends exactly where the candidate starts and
/// both carry the same entity label. The merged span keeps the first
/// fragment's confidence and source.
pub fn merge_adjacent(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(last) = merged.last_mut() {
            if last.end == span.start && last.label == span.label && span.is_entity() {
                last.end = span.end;
                last.surface.push_str(&span.surface);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

/// Greedy non-overlap selection ordered by start offset
///
/// Candidates arrive in start order and accepted spans are disjoint, so the
/// only accepted span a candidate can overlap is the last one. If that span
/// has equal or higher confidence the candidate is dropped; otherwise the
/// candidate replaces it.
pub fn resolve_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);

    let mut accepted: Vec<Span> = Vec::with_capacity(spans.len());
    for candidate in spans {
        match accepted.last() {
            Some(last) if candidate.overlaps(last) => {
                if candidate.confidence <= last.confidence {
                    tracing::trace!(
                        label = %candidate.label,
                        start = candidate.start,
                        end = candidate.end,
                        "Candidate dropped by overlap"
                    );
                    continue;
                }
                if let Some(evicted) = accepted.pop() {
                    tracing::trace!(
                        label = %evicted.label,
                        start = evicted.start,
                        end = evicted.end,
                        "Accepted span evicted by higher-confidence overlap"
                    );
                }
                accepted.push(candidate);
            }
            _ => accepted.push(candidate),
        }
    }
    accepted
}

/// Full reconciliation: drop non-entities, merge, resolve overlaps
pub fn reconcile(spans: Vec<Span>) -> Vec<Span> {
    let entities: Vec<Span> = spans.into_iter().filter(Span::is_entity).collect();
    resolve_overlaps(merge_adjacent(entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionSource, PiiLabel};

    fn model(label: PiiLabel, start: usize, end: usize, confidence: f32) -> Span {
        Span::new(label, start, end, confidence, "", DetectionSource::Model)
    }

    fn pattern(label: PiiLabel, start: usize, end: usize) -> Span {
        Span::new(label, start, end, 1.0, "", DetectionSource::Pattern)
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_adjacent(vec![]).is_empty());
        assert!(resolve_overlaps(vec![]).is_empty());
        assert!(reconcile(vec![]).is_empty());
    }

    #[test]
    fn test_adjacent_same_label_merges() {
        let mut first = model(PiiLabel::GivenName, 8, 12, 0.99);
        first.surface = "Jane".to_string();
        let mut second = model(PiiLabel::GivenName, 12, 16, 0.97);
        second.surface = " Doe".to_string();

        let merged = merge_adjacent(vec![second, first]);

        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (8, 16));
        assert_eq!(merged[0].surface, "Jane Doe");
        assert_eq!(merged[0].confidence, 0.99);
    }

    #[test]
    fn test_gap_or_label_change_keeps_spans_distinct() {
        let spans = vec![
            model(PiiLabel::GivenName, 0, 4, 0.9),
            model(PiiLabel::GivenName, 5, 8, 0.9),
            model(PiiLabel::City, 8, 14, 0.9),
        ];
        assert_eq!(merge_adjacent(spans).len(), 3);
    }

    #[test]
    fn test_none_label_never_merges() {
        let spans = vec![model(PiiLabel::None, 0, 4, 0.9), model(PiiLabel::None, 4, 8, 0.9)];
        assert_eq!(merge_adjacent(spans).len(), 2);
    }

    #[test]
    fn test_higher_confidence_wins_overlap() {
        let low = model(PiiLabel::GivenName, 0, 10, 0.9);
        let high = model(PiiLabel::Username, 5, 15, 0.95);

        let resolved = resolve_overlaps(vec![low, high.clone()]);

        assert_eq!(resolved, vec![high]);
    }

    #[test]
    fn test_lower_confidence_later_span_dropped() {
        let high = model(PiiLabel::GivenName, 0, 10, 0.95);
        let low = model(PiiLabel::Username, 5, 15, 0.9);

        let resolved = resolve_overlaps(vec![low, high.clone()]);

        assert_eq!(resolved, vec![high]);
    }

    #[test]
    fn test_equal_confidence_first_by_start_wins() {
        let first = pattern(PiiLabel::TelephoneNum, 0, 19);
        let second = pattern(PiiLabel::CreditCardNumber, 0, 19);

        let resolved = resolve_overlaps(vec![first.clone(), second]);

        assert_eq!(resolved, vec![first]);
    }

    #[test]
    fn test_contained_span_treated_as_overlap() {
        let outer = model(PiiLabel::Username, 0, 20, 0.6);
        let inner = pattern(PiiLabel::Email, 5, 10);

        let resolved = resolve_overlaps(vec![outer, inner.clone()]);

        assert_eq!(resolved, vec![inner]);
    }

    #[test]
    fn test_chain_of_evictions() {
        let a = model(PiiLabel::GivenName, 0, 5, 0.5);
        let b = model(PiiLabel::City, 6, 10, 0.99);
        let candidate = model(PiiLabel::Username, 3, 8, 0.8);

        let resolved = resolve_overlaps(vec![a, b.clone(), candidate]);

        assert_eq!(resolved, vec![b]);
    }

    #[test]
    fn test_reconcile_merges_before_resolving() {
        let spans = vec![
            model(PiiLabel::GivenName, 0, 4, 0.99),
            model(PiiLabel::GivenName, 4, 8, 0.5),
            model(PiiLabel::None, 10, 12, 1.0),
            pattern(PiiLabel::Email, 20, 30),
        ];

        let resolved = reconcile(spans);

        assert_eq!(resolved.len(), 2);
        assert_eq!((resolved[0].start, resolved[0].end), (0, 8));
        assert_eq!(resolved[1].label, PiiLabel::Email);
    }

    #[test]
    fn test_result_is_non_overlapping() {
        let spans = vec![
            model(PiiLabel::GivenName, 0, 10, 0.3),
            model(PiiLabel::City, 2, 4, 0.8),
            model(PiiLabel::City, 3, 12, 0.7),
            pattern(PiiLabel::ZipCode, 11, 16),
            model(PiiLabel::Username, 15, 18, 0.2),
        ];

        let resolved = reconcile(spans);

        for (i, a) in resolved.iter().enumerate() {
            for b in &resolved[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }
}
