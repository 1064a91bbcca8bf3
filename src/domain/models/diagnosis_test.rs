use anyhow::Result;

use super::Diagnosis;
use super::DiagnosisPayload;
use super::DiagnosisResult;
use crate::domain::models::ServiceError;

fn parse(body: &str) -> Result<DiagnosisResult, ServiceError> {
    let payload: DiagnosisPayload = serde_json::from_str(body).unwrap();
    return payload.into_result();
}

#[test]
fn it_builds_a_found_result() {
    let res = parse(
        r#"{"success": true, "pattern": "P1", "diagnosis": "D1", "treatment": [], "explanation": ["r1"]}"#,
    );

    assert_eq!(
        res,
        Ok(DiagnosisResult::Found(Diagnosis {
            pattern: Some("P1".to_string()),
            diagnosis: Some("D1".to_string()),
            treatment: vec![],
            explanation: vec!["r1".to_string()],
            ..Diagnosis::default()
        }))
    );
}

#[test]
fn it_builds_a_not_found_result() {
    let res = parse(r#"{"success": false, "message": "no match"}"#);
    assert_eq!(res, Ok(DiagnosisResult::NotFound(Some("no match".to_string()))));
}

#[test]
fn it_drops_blank_messages() {
    let res = parse(r#"{"success": false, "message": "  "}"#);
    assert_eq!(res, Ok(DiagnosisResult::NotFound(None)));
}

#[test]
fn it_accepts_disease_as_the_diagnosis_label() {
    let res = parse(
        r#"{"success": true, "disease": "Tinea Corporis", "treatment": null, "lifestyle": ["Keep skin dry"], "llm_explanation": "Likely fungal."}"#,
    );

    assert_eq!(
        res,
        Ok(DiagnosisResult::Found(Diagnosis {
            diagnosis: Some("Tinea Corporis".to_string()),
            lifestyle: vec!["Keep skin dry".to_string()],
            summary: Some("Likely fungal.".to_string()),
            ..Diagnosis::default()
        }))
    );
}

#[test]
fn it_rejects_payloads_without_success() {
    let res = parse(r#"{"pattern": "P1"}"#);
    assert!(matches!(res, Err(ServiceError::Malformed(_))));
}

#[test]
fn it_renders_fired_rules_from_the_inference_engine() {
    let res = parse(
        r#"{
            "success": true,
            "disease": "Ringworm",
            "disease_description": "A fungal infection of the skin.",
            "contagious": true,
            "treatment": ["Antifungal cream"],
            "lifestyle": ["Keep skin dry"],
            "diet": [],
            "explanation": [
                {"layer": 1, "rule_id": "rule_3", "name": "Ringworm identification", "logic": "IF Itching AND (Circular OR Annular OR Scaly)", "conclusion": "Ringworm"},
                {"layer": 3, "rule_id": "rule_l1", "logic": "IF Ringworm", "conclusion": ["Keep skin dry", "Avoid sharing towels"]},
                "plain note"
            ]
        }"#,
    );

    assert_eq!(
        res,
        Ok(DiagnosisResult::Found(Diagnosis {
            diagnosis: Some("Ringworm".to_string()),
            treatment: vec!["Antifungal cream".to_string()],
            explanation: vec![
                "Ringworm identification: IF Itching AND (Circular OR Annular OR Scaly) -> Ringworm".to_string(),
                "rule_l1: IF Ringworm -> Keep skin dry, Avoid sharing towels".to_string(),
                "plain note".to_string(),
            ],
            lifestyle: vec!["Keep skin dry".to_string()],
            description: Some("A fungal infection of the skin.".to_string()),
            contagious: Some(true),
            ..Diagnosis::default()
        }))
    );
}

#[test]
fn it_accepts_the_engine_not_found_shape() {
    let res = parse(
        r#"{"success": false, "message": "No diagnosis found.", "disease": null, "contagious": null, "treatment": [], "lifestyle": [], "diet": [], "explanation": []}"#,
    );
    assert_eq!(res, Ok(DiagnosisResult::NotFound(Some("No diagnosis found.".to_string()))));
}
