use rusoto_core::signature::{SignedRequest, SignedRequestPayload};

/// Splits the form-encoded query-protocol body of a mocked EC2 request.
pub fn form_fields(request: &SignedRequest) -> Vec<String> {
    match request.payload {
        Some(SignedRequestPayload::Buffer(ref body)) => String::from_utf8_lossy(body)
            .split('&')
            .map(str::to_string)
            .collect(),
        _ => panic!("EC2 request without a form body"),
    }
}

pub fn assert_form_contains(request: &SignedRequest, expected: &[&str]) {
    let fields = form_fields(request);
    for field in expected {
        assert!(
            fields.iter().any(|sent| sent == field),
            "{} missing from {:?}",
            field,
            fields
        );
    }
}
