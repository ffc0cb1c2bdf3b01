use super::*;

fn decode(value: serde_json::Value) -> PipelineEvent {
    KeptnEnvelope::decode(value.to_string().as_bytes())
        .expect("envelope")
        .to_event()
}

#[test]
fn recognizes_each_keptn_event_type() {
    assert_eq!(
        decode(serde_json::json!({ "type": NEW_ARTEFACT, "data": { "stage": "dev" } })),
        PipelineEvent::NewArtifact {
            stage: "dev".into()
        }
    );
    assert_eq!(
        decode(serde_json::json!({
            "type": DEPLOYMENT_FINISHED,
            "data": { "stage": "production" }
        })),
        PipelineEvent::DeploymentFinished {
            stage: "production".into()
        }
    );
    assert_eq!(
        decode(serde_json::json!({ "type": TESTS_FINISHED, "data": { "stage": "staging" } })),
        PipelineEvent::TestsFinished {
            stage: "staging".into()
        }
    );
    assert_eq!(
        decode(serde_json::json!({
            "type": EVALUATION_DONE,
            "data": { "stage": "production", "evaluationpassed": true }
        })),
        PipelineEvent::EvaluationDone {
            stage: "production".into(),
            passed: true
        }
    );
}

#[test]
fn unknown_type_becomes_other() {
    let event = decode(serde_json::json!({ "type": "sh.keptn.events.problem", "data": {} }));
    assert_eq!(
        event,
        PipelineEvent::Other {
            kind: "sh.keptn.events.problem".into()
        }
    );
    assert_eq!(event.stage(), None);
}

#[test]
fn missing_data_defaults_to_empty_stage_and_failed_evaluation() {
    let event = decode(serde_json::json!({ "type": EVALUATION_DONE }));
    assert_eq!(
        event,
        PipelineEvent::EvaluationDone {
            stage: String::new(),
            passed: false
        }
    );

    let event = decode(serde_json::json!({ "type": NEW_ARTEFACT, "data": null }));
    assert_eq!(event.stage(), Some(""));
}

#[test]
fn ignores_unrelated_wire_fields() {
    let envelope = KeptnEnvelope::decode(
        serde_json::json!({
            "specversion": "0.2",
            "type": TESTS_FINISHED,
            "source": "jmeter-service",
            "id": "c4d3a334",
            "time": "2019-06-07T07:02:15.64489Z",
            "datacontenttype": "application/json",
            "shkeptncontext": "f2b8f6c3",
            "data": {
                "githuborg": "keptn-tiger",
                "project": "sockshop",
                "teststrategy": "functional",
                "deploymentstrategy": "direct",
                "stage": "staging",
                "service": "carts",
                "image": "keptnexamples/carts",
                "tag": "0.8.1"
            }
        })
        .to_string()
        .as_bytes(),
    )
    .expect("envelope");

    assert_eq!(envelope.project(), Some("sockshop"));
    assert_eq!(envelope.service(), Some("carts"));
    assert_eq!(envelope.shkeptncontext.as_deref(), Some("f2b8f6c3"));
    assert_eq!(envelope.stage(), "staging");
}

#[test]
fn rejects_malformed_payloads() {
    assert!(KeptnEnvelope::decode(b"{not json").is_err());
    assert!(KeptnEnvelope::decode(br#"{"data":{"stage":"dev"}}"#).is_err());
    assert!(KeptnEnvelope::decode(br#"{"type":"x","data":{"stage":5}}"#).is_err());
}
