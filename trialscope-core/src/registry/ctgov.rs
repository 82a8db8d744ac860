//! Classic ClinicalTrials.gov `study_fields` client.
//!
//! The classic API echoes the query expression back and returns every study
//! field as a list of strings keyed by rank; the first element is the value
//! and an absent or empty list means the field is unset. The v2 API
//! replaces this shape, which is why all of it stays behind `TrialRegistry`.

use super::{RegistryError, TrialRegistry};
use crate::domain::{CompanyRecord, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Base URL of the classic study_fields endpoint.
    pub base_url: String,
    /// Maximum number of ranked studies requested per query.
    pub max_ranks: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://classic.clinicaltrials.gov/api/query/study_fields".into(),
            max_ranks: 1000,
        }
    }
}

const QUERY_FIELDS: &str = "NCTId,OverallStatus,StudyFirstPostDate,StartDate,CompletionDate";

/// Wire shape of the classic study_fields response.
#[derive(Debug, Deserialize)]
struct StudyFieldsEnvelope {
    #[serde(rename = "StudyFieldsResponse")]
    response: StudyFieldsResponse,
}

#[derive(Debug, Deserialize)]
struct StudyFieldsResponse {
    #[serde(rename = "Expression", default)]
    expression: String,
    #[serde(rename = "StudyFields", default)]
    study_fields: Vec<StudyFields>,
}

/// One ranked study off the wire.
#[derive(Debug, Deserialize)]
struct StudyFields {
    #[serde(rename = "NCTId", default)]
    nct_id: Vec<String>,
    #[serde(rename = "OverallStatus", default)]
    overall_status: Vec<String>,
    #[serde(rename = "StudyFirstPostDate", default)]
    first_posted: Vec<String>,
    #[serde(rename = "StartDate", default)]
    start_date: Vec<String>,
    #[serde(rename = "CompletionDate", default)]
    completion_date: Vec<String>,
}

fn first_or_empty(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

/// Blocking client for the classic endpoint, with bounded retry.
pub struct ClassicCtgovRegistry {
    client: reqwest::blocking::Client,
    config: RegistryConfig,
    max_retries: u32,
    base_delay: Duration,
}

impl ClassicCtgovRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("trialscope/0.1")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            config,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Map a wire response onto trial records for one company.
    ///
    /// The echoed expression is preferred as the company label since it is
    /// what the registry actually searched for.
    fn to_trials(response: StudyFieldsResponse, company: &CompanyRecord) -> Vec<TrialRecord> {
        let company_name = if response.expression.is_empty() {
            company.name.clone()
        } else {
            response.expression.clone()
        };

        response
            .study_fields
            .iter()
            .map(|study| TrialRecord {
                nct_id: first_or_empty(&study.nct_id),
                status: first_or_empty(&study.overall_status),
                first_posted: first_or_empty(&study.first_posted),
                start_date: first_or_empty(&study.start_date),
                completion_date: first_or_empty(&study.completion_date),
                company_name: company_name.clone(),
                ticker: company.ticker.clone(),
            })
            .collect()
    }

    /// Execute the query with retry and exponential backoff.
    fn fetch_with_retry(&self, company: &CompanyRecord) -> Result<Vec<TrialRecord>, RegistryError> {
        let max_rnk = self.config.max_ranks.to_string();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            let request = self.client.get(&self.config.base_url).query(&[
                ("expr", company.name.as_str()),
                ("fields", QUERY_FIELDS),
                ("min_rnk", "1"),
                ("max_rnk", max_rnk.as_str()),
                ("fmt", "json"),
            ]);

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::RateLimited);
                        continue;
                    }

                    if status.is_server_error() {
                        last_error = Some(RegistryError::Status {
                            status: status.as_u16(),
                            expression: company.name.clone(),
                        });
                        continue;
                    }

                    if !status.is_success() {
                        return Err(RegistryError::Status {
                            status: status.as_u16(),
                            expression: company.name.clone(),
                        });
                    }

                    let envelope: StudyFieldsEnvelope = resp.json().map_err(|e| {
                        RegistryError::ResponseFormat(format!(
                            "failed to parse study_fields response for '{}': {e}",
                            company.name
                        ))
                    })?;

                    return Ok(Self::to_trials(envelope.response, company));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(RegistryError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(RegistryError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RegistryError::Other("max retries exceeded".into())))
    }
}

impl TrialRegistry for ClassicCtgovRegistry {
    fn query(&self, company: &CompanyRecord) -> Result<Vec<TrialRecord>, RegistryError> {
        self.fetch_with_retry(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_company() -> CompanyRecord {
        CompanyRecord {
            name: "Incannex Healthcare".into(),
            ticker: "IXHL".into(),
        }
    }

    #[test]
    fn parses_the_classic_wire_shape() {
        let body = r#"{
            "StudyFieldsResponse": {
                "Expression": "Incannex Healthcare",
                "NStudiesFound": 2,
                "FieldList": ["NCTId", "OverallStatus", "StudyFirstPostDate", "StartDate", "CompletionDate"],
                "StudyFields": [
                    {
                        "Rank": 1,
                        "NCTId": ["NCT05978193"],
                        "OverallStatus": ["Recruiting"],
                        "StudyFirstPostDate": ["August 07, 2023"],
                        "StartDate": ["February 14, 2024"],
                        "CompletionDate": ["December 2025"]
                    },
                    {
                        "Rank": 2,
                        "NCTId": ["NCT04600440"],
                        "OverallStatus": ["Completed"],
                        "StudyFirstPostDate": ["October 23, 2020"],
                        "StartDate": [],
                        "CompletionDate": ["June 30, 2022"]
                    }
                ]
            }
        }"#;

        let envelope: StudyFieldsEnvelope = serde_json::from_str(body).unwrap();
        let trials = ClassicCtgovRegistry::to_trials(envelope.response, &sample_company());

        assert_eq!(trials.len(), 2);
        assert_eq!(trials[0].nct_id, "NCT05978193");
        assert_eq!(trials[0].status, "Recruiting");
        assert_eq!(trials[0].start_date, "February 14, 2024");
        assert_eq!(trials[0].company_name, "Incannex Healthcare");
        assert_eq!(trials[0].ticker, "IXHL");
        // Absent list values collapse to empty strings.
        assert_eq!(trials[1].start_date, "");
    }

    #[test]
    fn missing_envelope_is_a_parse_error() {
        let body = r#"{"SomethingElse": {}}"#;
        assert!(serde_json::from_str::<StudyFieldsEnvelope>(body).is_err());
    }

    #[test]
    fn empty_expression_falls_back_to_the_company_name() {
        let body = r#"{
            "StudyFieldsResponse": {
                "StudyFields": [
                    { "NCTId": ["NCT00000001"] }
                ]
            }
        }"#;

        let envelope: StudyFieldsEnvelope = serde_json::from_str(body).unwrap();
        let trials = ClassicCtgovRegistry::to_trials(envelope.response, &sample_company());

        assert_eq!(trials[0].company_name, "Incannex Healthcare");
        assert_eq!(trials[0].status, "");
    }
}
