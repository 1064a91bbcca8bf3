#[cfg(test)]
#[path = "diagnosis_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ServiceError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnosis {
    pub pattern: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Vec<String>,
    pub explanation: Vec<String>,
    pub lifestyle: Vec<String>,
    pub diet: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub contagious: Option<bool>,
}

/// Terminal outcome of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosisResult {
    Found(Diagnosis),
    NotFound(Option<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Conclusion {
    One(String),
    Many(Vec<String>),
}

/// A rule the inference engine fired while reaching the diagnosis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredRule {
    pub layer: Option<u32>,
    pub rule_id: Option<String>,
    pub name: Option<String>,
    pub logic: Option<String>,
    pub conclusion: Option<Conclusion>,
}

/// Explanation entries arrive either as plain text or as fired rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExplanationEntry {
    Text(String),
    Rule(FiredRule),
}

impl ExplanationEntry {
    /// Renders a rule as `<name>: <logic> -> <conclusion>`, leaving out the
    /// parts the service did not send.
    pub fn to_text(&self) -> String {
        let rule = match self {
            ExplanationEntry::Text(text) => return text.to_string(),
            ExplanationEntry::Rule(rule) => rule,
        };

        let mut text = rule
            .name
            .clone()
            .or_else(|| return rule.rule_id.clone())
            .unwrap_or_default();

        if let Some(logic) = &rule.logic {
            if !text.is_empty() {
                text.push_str(": ");
            }
            text.push_str(logic);
        }

        let conclusion = match &rule.conclusion {
            Some(Conclusion::One(value)) => value.to_string(),
            Some(Conclusion::Many(values)) => values.join(", "),
            None => "".to_string(),
        };
        if !conclusion.is_empty() {
            if !text.is_empty() {
                text.push_str(" -> ");
            }
            text.push_str(&conclusion);
        }

        return text;
    }
}

/// Body of `POST /diagnose`. Every field is optional on the wire; `success`
/// is the only one required to pick a branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisPayload {
    pub success: Option<bool>,
    pub pattern: Option<String>,
    #[serde(alias = "disease")]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<Vec<ExplanationEntry>>,
    #[serde(default)]
    pub lifestyle: Option<Vec<String>>,
    #[serde(default)]
    pub diet: Option<Vec<String>>,
    pub llm_explanation: Option<String>,
    pub disease_description: Option<String>,
    pub contagious: Option<bool>,
    pub message: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    return value.filter(|text| return !text.trim().is_empty());
}

impl DiagnosisPayload {
    pub fn into_result(self) -> Result<DiagnosisResult, ServiceError> {
        let success = self.success.ok_or_else(|| {
            return ServiceError::Malformed("diagnose response has no 'success' field".to_string());
        })?;

        if !success {
            return Ok(DiagnosisResult::NotFound(non_blank(self.message)));
        }

        return Ok(DiagnosisResult::Found(Diagnosis {
            pattern: non_blank(self.pattern),
            diagnosis: non_blank(self.diagnosis),
            treatment: self.treatment.unwrap_or_default(),
            explanation: self
                .explanation
                .unwrap_or_default()
                .iter()
                .map(ExplanationEntry::to_text)
                .filter(|text| return !text.is_empty())
                .collect(),
            lifestyle: self.lifestyle.unwrap_or_default(),
            diet: self.diet.unwrap_or_default(),
            summary: non_blank(self.llm_explanation),
            description: non_blank(self.disease_description),
            contagious: self.contagious,
        }));
    }
}
