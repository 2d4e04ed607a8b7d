use serde_json::{json, Value};

pub(super) fn application_payload() -> Value {
    json!({
        "github_url": "https://github.com/angelatest",
        "background": "A".repeat(50),
        "full_name": "Angela Test",
        "email": "angela@example.com",
        "years_experience": 3,
        "skills": ["Python", "FastAPI"],
        "position_applied": "Developer"
    })
}

pub(super) fn technical_payload() -> Value {
    json!({
        "synopsis": "A".repeat(100),
        "key_concepts": ["Concept1", "Concept2", "Concept3"],
        "technical_details": ["Detail1", "Detail2", "Detail3"],
        "analysis": "A".repeat(200),
        "submitted_by": "angela@example.com"
    })
}

pub(super) fn with_field(mut payload: Value, field: &str, value: Value) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(field.to_string(), value);
    payload
}

pub(super) fn without_field(mut payload: Value, field: &str) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove(field);
    payload
}
