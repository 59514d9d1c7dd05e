use std::sync::Arc;

use chrono::Utc;
use scraper::Html;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::{
    AttemptOutcome, CaseQuery, CaseRecord, Diagnostics, ObstacleReport, Outcome, SubmissionAttempt,
};
use crate::engine::classifier::{Classification, ResponseClassifier};
use crate::engine::extractor::RecordExtractor;
use crate::engine::obstacle::ObstacleDetector;
use crate::engine::strategy::ParameterSet;
use crate::engine::{AttemptSpec, EngineConfig};
use crate::fetcher::{FetchRequest, Fetcher};

/// What a single 200 response turned out to be
#[derive(Debug)]
pub enum Evaluation {
    Obstructed(ObstacleReport),
    NotFound { phrase: String },
    Found(CaseRecord),
    /// Neither a record nor an explicit absence
    Unparsed,
}

/// Drives every {parameter set x method x path} combination against the
/// resolved endpoint.
///
/// Combinations run strictly in order. A challenge page ends the loop at
/// once, as does the first response that yields a record.
pub struct SubmissionExecutor {
    fetcher: Arc<dyn Fetcher>,
    config: EngineConfig,
    detector: ObstacleDetector,
    classifier: ResponseClassifier,
}

impl SubmissionExecutor {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: EngineConfig) -> Self {
        let classifier = ResponseClassifier::new(&config.not_found_phrases);
        Self {
            fetcher,
            config,
            detector: ObstacleDetector::new(),
            classifier,
        }
    }

    pub async fn submit(
        &self,
        base_url: &str,
        sets: &[ParameterSet],
        query: &CaseQuery,
        mut diagnostics: Diagnostics,
    ) -> Outcome {
        for (position, set) in sets.iter().enumerate() {
            info!("Trying strategy {}/{} ({})", set.priority, sets.len(), set.scheme);

            for attempt in &self.config.attempts {
                let (outcome, evaluation) = self.attempt(base_url, set, attempt, query).await;
                diagnostics.attempts.push(outcome);

                match evaluation {
                    Some(Evaluation::Obstructed(captcha)) => {
                        warn!("Verification challenge on strategy {}", set.priority);
                        diagnostics.step(format!(
                            "Challenge detected after {} {}; stopping",
                            attempt.method,
                            attempt.target(base_url)
                        ));
                        return Outcome::Obstructed {
                            captcha,
                            diagnostics,
                        };
                    }
                    Some(Evaluation::Found(record)) => {
                        info!("Case data extracted with strategy {}", set.priority);
                        diagnostics.step(format!("Record extracted with strategy {}", set.scheme));
                        return Outcome::Found {
                            record,
                            diagnostics,
                        };
                    }
                    Some(Evaluation::NotFound { .. }) | Some(Evaluation::Unparsed) | None => {}
                }
            }

            let pause = self.config.pause_between_strategies();
            if position + 1 < sets.len() && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        diagnostics.step("All strategies exhausted");
        Outcome::NotFound {
            reason: format!(
                "Case {} not found after trying {} submission strategies",
                query,
                sets.len()
            ),
            strategies_attempted: sets.len(),
            diagnostics,
        }
    }

    async fn attempt(
        &self,
        base_url: &str,
        set: &ParameterSet,
        pair: &AttemptSpec,
        query: &CaseQuery,
    ) -> (SubmissionAttempt, Option<Evaluation>) {
        let target = pair.target(base_url);
        let request = FetchRequest::get(&target, self.config.submit_timeout())
            .with_method(pair.method)
            .with_params(set.fields.clone())
            .with_header("Referer", self.config.base_url.as_str());

        let mut record = SubmissionAttempt {
            strategy_index: set.priority,
            strategy_name: set.scheme.clone(),
            method: pair.method,
            endpoint_suffix: pair.suffix.clone(),
            outcome: AttemptOutcome::Exception,
            status: None,
            detail: None,
            response_digest: None,
            at: Utc::now(),
        };

        let response = match self.fetcher.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", pair.method, target, e);
                record.detail = Some(e.to_string());
                return (record, None);
            }
        };

        record.status = Some(response.status);
        record.response_digest = Some(hex::encode(Sha256::digest(&response.body)));

        if !response.is_ok() {
            warn!("{} {} returned HTTP {}", pair.method, target, response.status);
            record.outcome = AttemptOutcome::HttpFailed;
            record.detail = Some(format!("HTTP {}", response.status));
            return (record, None);
        }

        let evaluation = self.evaluate(&response.text(), query);
        match &evaluation {
            Evaluation::Obstructed(report) => {
                record.outcome = AttemptOutcome::Obstructed;
                record.detail = report.kind.map(|kind| format!("{:?}", kind));
            }
            Evaluation::NotFound { phrase } => {
                record.outcome = AttemptOutcome::ParseFailed;
                record.detail = Some(format!("Site reports no record: \"{}\"", phrase));
            }
            Evaluation::Found(_) => record.outcome = AttemptOutcome::Success,
            Evaluation::Unparsed => {
                record.outcome = AttemptOutcome::ParseFailed;
                record.detail = Some("No case data in response".to_string());
            }
        }
        (record, Some(evaluation))
    }

    /// Obstacle check, then classification, then extraction.
    ///
    /// The parsed document never outlives this call.
    pub fn evaluate(&self, body: &str, query: &CaseQuery) -> Evaluation {
        let document = Html::parse_document(body);

        let report = self.detector.detect(&document);
        if report.blocked {
            return Evaluation::Obstructed(report);
        }

        if let Classification::DefinitelyNotFound { phrase } = self.classifier.classify(&document) {
            return Evaluation::NotFound { phrase };
        }

        match RecordExtractor::new(&self.config).extract(&document, query) {
            Some(record) => Evaluation::Found(record),
            None => Evaluation::Unparsed,
        }
    }
}
