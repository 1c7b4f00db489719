//! Ordered rule tables
//!
//! Every band/threshold lookup in scoring is an ordered list of
//! (predicate, result) pairs evaluated top to bottom. The first rule whose
//! predicate holds wins; later rules are never consulted. Tables are declared
//! most-severe first, which is what makes "only the highest band counts" hold.

/// A single (predicate, result) pair
pub struct Rule<I, T> {
    pub when: fn(&I) -> bool,
    pub then: T,
}

/// Result of the first rule matching `input`, if any
pub fn first_match<'a, I, T>(rules: &'a [Rule<I, T>], input: &I) -> Option<&'a T> {
    rules.iter().find(|rule| (rule.when)(input)).map(|rule| &rule.then)
}

/// Like [`first_match`] but with a fallback for tables without a catch-all rule
pub fn first_match_or<'a, I, T>(rules: &'a [Rule<I, T>], input: &I, fallback: &'a T) -> &'a T {
    first_match(rules, input).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    static BANDS: &[Rule<f64, &str>] = &[
        Rule { when: |v| *v > 20.0, then: "severe" },
        Rule { when: |v| *v > 10.0, then: "strong" },
        Rule { when: |v| *v > 5.0, then: "moderate" },
    ];

    #[test]
    fn test_first_matching_rule_wins() {
        // 25 satisfies all three predicates; only the first applies
        assert_eq!(first_match(BANDS, &25.0), Some(&"severe"));
        assert_eq!(first_match(BANDS, &15.0), Some(&"strong"));
        assert_eq!(first_match(BANDS, &6.0), Some(&"moderate"));
    }

    #[test]
    fn test_no_match_and_fallback() {
        assert_eq!(first_match(BANDS, &1.0), None);
        assert_eq!(*first_match_or(BANDS, &1.0, &"calm"), "calm");
        assert_eq!(*first_match_or(BANDS, &11.0, &"calm"), "strong");
    }
}
