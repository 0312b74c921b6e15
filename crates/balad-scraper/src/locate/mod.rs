//! Structured-data locator.
//!
//! Tries extraction strategies in priority order (framework hydration block,
//! then schema.org JSON-LD) and returns the first document found. A block
//! that fails to parse only disqualifies its own strategy.

mod hydration;
mod jsonld;

use serde_json::Value;

/// Where a structured-data document was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `<script id="__NEXT_DATA__">` hydration payload.
    Hydration,
    /// `<script type="application/ld+json">` blocks.
    LinkedData,
}

impl Strategy {
    /// Strategies in the order they are tried.
    pub const ALL: [Strategy; 2] = [Strategy::Hydration, Strategy::LinkedData];

    #[must_use]
    pub fn extract(self, html: &str) -> ExtractionOutcome {
        match self {
            Strategy::Hydration => hydration::extract_hydration_data(html),
            Strategy::LinkedData => jsonld::extract_linked_data_list(html),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Hydration => write!(f, "hydration"),
            Strategy::LinkedData => write!(f, "jsonld"),
        }
    }
}

/// Why a strategy did or did not produce a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Found(Value),
    NotFound,
    ParseError(String),
}

impl std::fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionOutcome::Found(_) => write!(f, "found"),
            ExtractionOutcome::NotFound => write!(f, "not found"),
            ExtractionOutcome::ParseError(msg) => write!(f, "parse error ({msg})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub outcome: ExtractionOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedDocument {
    pub strategy: Strategy,
    /// For [`Strategy::Hydration`] the full hydration object; for
    /// [`Strategy::LinkedData`] the qualifying list of entity objects.
    pub document: Value,
}

/// Run every strategy and report each outcome, without short-circuiting.
#[must_use]
pub fn diagnose(html: &str) -> Vec<Attempt> {
    Strategy::ALL
        .into_iter()
        .map(|strategy| Attempt {
            strategy,
            outcome: strategy.extract(html),
        })
        .collect()
}

/// Find the embedded structured-data document in `html`.
///
/// # Errors
///
/// Returns every strategy's outcome when none of them found a document.
pub fn locate_structured_data(html: &str) -> Result<LocatedDocument, Vec<Attempt>> {
    let mut attempts = Vec::with_capacity(Strategy::ALL.len());

    for strategy in Strategy::ALL {
        match strategy.extract(html) {
            ExtractionOutcome::Found(document) => {
                return Ok(LocatedDocument { strategy, document });
            }
            outcome => {
                tracing::debug!(%strategy, %outcome, "structured-data strategy skipped");
                attempts.push(Attempt { strategy, outcome });
            }
        }
    }

    Err(attempts)
}

/// One-line summary of failed attempts, e.g. `hydration: not found; jsonld: parse error (..)`.
#[must_use]
pub fn summarize_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.strategy, a.outcome))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const HYDRATION_PAGE: &str = r#"<html><head>
        <script type="application/ld+json">[{"name": "From JSON-LD"}]</script>
        <script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"data":{"items":[{"name":"From hydration"}]}}}}</script>
        </head></html>"#;

    #[test]
    fn hydration_takes_priority_over_jsonld() {
        let located = locate_structured_data(HYDRATION_PAGE).unwrap();
        assert_eq!(located.strategy, Strategy::Hydration);
        assert_eq!(
            located.document["props"]["pageProps"]["data"]["items"][0]["name"],
            json!("From hydration")
        );
    }

    #[test]
    fn broken_hydration_falls_back_to_jsonld() {
        let html = r#"
            <script id="__NEXT_DATA__" type="application/json">{"props": {broken</script>
            <script type="application/ld+json">[{"name": "A"}, {"name": "B"}]</script>
        "#;
        let located = locate_structured_data(html).unwrap();
        assert_eq!(located.strategy, Strategy::LinkedData);
        assert_eq!(located.document, json!([{"name": "A"}, {"name": "B"}]));
    }

    #[test]
    fn reports_every_attempt_when_nothing_found() {
        let html = r#"<script id="__NEXT_DATA__">not json</script><p>plain page</p>"#;
        let attempts = locate_structured_data(html).unwrap_err();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].strategy, Strategy::Hydration);
        assert!(matches!(attempts[0].outcome, ExtractionOutcome::ParseError(_)));
        assert_eq!(attempts[1].strategy, Strategy::LinkedData);
        assert_eq!(attempts[1].outcome, ExtractionOutcome::NotFound);
    }

    #[test]
    fn diagnose_runs_all_strategies() {
        let attempts = diagnose(HYDRATION_PAGE);
        assert_eq!(attempts.len(), 2);
        assert!(attempts
            .iter()
            .all(|a| matches!(a.outcome, ExtractionOutcome::Found(_))));
    }

    #[test]
    fn summary_lists_strategy_and_outcome() {
        let attempts = vec![
            Attempt {
                strategy: Strategy::Hydration,
                outcome: ExtractionOutcome::NotFound,
            },
            Attempt {
                strategy: Strategy::LinkedData,
                outcome: ExtractionOutcome::ParseError("eof".to_string()),
            },
        ];
        assert_eq!(
            summarize_attempts(&attempts),
            "hydration: not found; jsonld: parse error (eof)"
        );
    }
}
