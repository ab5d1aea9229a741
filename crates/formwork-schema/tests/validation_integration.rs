//! Integration tests for the schema engine.
//!
//! Covers:
//! 1. Flat forms with required, email and select fields
//! 2. Arrays of objects with count bounds
//! 3. Cross-field confirmation and coerced numbers

use formwork_core::ErrorKind;
use formwork_schema::prelude::*;

// ============================================================================
// Shared helpers
// ============================================================================

fn profile_schema() -> Schema {
    ObjectSchema::new()
        .field(
            "name",
            FieldSchema::string().error_message(ErrorKind::RequiredMissing, "name은 필수값입니다."),
        )
        .field("nickname", FieldSchema::string().required(false))
        .field(
            "email",
            FieldSchema::string().validator(EmailValidator::new().with_message("email 형식이 아닙니다.")),
        )
        .field(
            "bankName",
            FieldSchema::enumeration(["", "신한", "국민", "우리"])
                .error_message(ErrorKind::ValueNotInEnumeration, "은행을 올바르게 선택해주세요."),
        )
        .into()
}

fn industry_schema() -> Schema {
    let value = define_field(FieldType::String, vec![Box::new(MinLengthValidator::new(1))]);
    let element = define_object([("value", Schema::from(value))], vec![]);
    let industries = define_array(element, None, Some(2));
    define_object([("companyIndustry", Schema::from(industries))], vec![]).into()
}

fn signup_schema() -> Schema {
    ObjectSchema::new()
        .field(
            "password",
            FieldSchema::string()
                .trim(true)
                .validator(MinLengthValidator::new(6).with_message("6자 이상 입력해주세요.")),
        )
        .field("passwordConfirm", FieldSchema::string().trim(true))
        .field("age", FieldSchema::number().validator(MinValueValidator::new(0.0)))
        .cross_field(
            FieldsMatch::new("password", "passwordConfirm").with_message("비밀번호가 일치하지 않습니다."),
        )
        .into()
}

fn json(v: serde_json::Value) -> RawValue {
    RawValue::from(v)
}

// ============================================================================
// 1. Flat forms
// ============================================================================

#[test]
fn test_profile_all_valid() {
    let raw = json(serde_json::json!({
        "name": "홍길동",
        "nickname": "",
        "email": "hong@example.com",
        "bankName": "우리",
    }));
    let value = validate(&profile_schema(), &raw).into_result().unwrap();
    assert_eq!(value.get("name"), Some(&Value::from("홍길동")));
    assert_eq!(value.get("nickname"), Some(&Value::from("")));
}

#[test]
fn test_profile_reports_every_failure_at_once() {
    let raw = json(serde_json::json!({
        "name": "",
        "email": "not-an-email",
        "bankName": "에러 나는 은행",
    }));
    let errors = validate(&profile_schema(), &raw).into_result().unwrap_err();
    assert_eq!(errors.paths(), vec!["bankName", "email", "name"]);
    let messages = errors.messages();
    assert_eq!(messages["name"], "name은 필수값입니다.");
    assert_eq!(messages["email"], "email 형식이 아닙니다.");
    assert_eq!(messages["bankName"], "은행을 올바르게 선택해주세요.");
}

#[test]
fn test_profile_blank_bank_is_a_choice() {
    let raw = json(serde_json::json!({
        "name": "kim",
        "email": "kim@example.com",
        "bankName": "",
    }));
    assert!(validate(&profile_schema(), &raw).is_valid());
}

#[test]
fn test_every_required_field_missing_is_reported() {
    let schema = profile_schema();
    let errors = validate(&schema, &RawValue::Missing).into_result().unwrap_err();
    for path in ["name", "email"] {
        assert_eq!(errors.kind_at(path), Some(ErrorKind::RequiredMissing), "{path}");
    }
    assert!(!errors.contains("nickname"));
    assert!(!errors.contains("bankName"));
}

// ============================================================================
// 2. Arrays
// ============================================================================

#[test]
fn test_industry_empty_is_valid() {
    let raw = json(serde_json::json!({ "companyIndustry": [] }));
    let value = validate(&industry_schema(), &raw).into_result().unwrap();
    assert_eq!(value.get("companyIndustry"), Some(&Value::List(vec![])));
}

#[test]
fn test_industry_element_error_is_indexed() {
    let raw = json(serde_json::json!({
        "companyIndustry": [{"value": "IT"}, {"value": ""}],
    }));
    let errors = validate(&industry_schema(), &raw).into_result().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.kind_at("companyIndustry.1.value"),
        Some(ErrorKind::RequiredMissing)
    );
}

#[test]
fn test_industry_too_many_items() {
    let raw = json(serde_json::json!({
        "companyIndustry": [{"value": "IT"}, {"value": "Bio"}, {"value": ""}],
    }));
    let errors = validate(&industry_schema(), &raw).into_result().unwrap_err();
    assert_eq!(errors.kind_at("companyIndustry"), Some(ErrorKind::LengthOutOfRange));
    assert_eq!(
        errors.at("companyIndustry").unwrap().message,
        "Ensure this list has at most 2 items (it has 3)."
    );
    // Elements are still visited.
    assert!(errors.contains("companyIndustry.2.value"));
}

// ============================================================================
// 3. Cross-field rules and coercion
// ============================================================================

#[test]
fn test_signup_valid_coerces_age() {
    let raw = json(serde_json::json!({
        "password": "  secret1 ",
        "passwordConfirm": "secret1",
        "age": "20",
    }));
    let value = validate(&signup_schema(), &raw).into_result().unwrap();
    assert_eq!(value.get("password"), Some(&Value::from("secret1")));
    assert_eq!(value.get("age"), Some(&Value::Float(20.0)));
}

#[test]
fn test_signup_numeric_json_is_accepted_as_text() {
    let raw = json(serde_json::json!({
        "password": "secret1",
        "passwordConfirm": "secret1",
        "age": 20,
    }));
    assert!(validate(&signup_schema(), &raw).is_valid());
}

#[test]
fn test_signup_mismatch() {
    let raw = json(serde_json::json!({
        "password": "secret1",
        "passwordConfirm": "secret2",
        "age": "20",
    }));
    let errors = validate(&signup_schema(), &raw).into_result().unwrap_err();
    assert_eq!(errors.paths(), vec!["passwordConfirm"]);
    assert_eq!(errors.messages()["passwordConfirm"], "비밀번호가 일치하지 않습니다.");
}

#[test]
fn test_signup_field_errors_suppress_cross_field() {
    let raw = json(serde_json::json!({
        "password": "abc",
        "passwordConfirm": "xyz",
        "age": "스무살",
    }));
    let errors = validate(&signup_schema(), &raw).into_result().unwrap_err();
    assert_eq!(errors.paths(), vec!["age", "password"]);
    assert_eq!(errors.kind_at("age"), Some(ErrorKind::TypeCoercionFailed));
    assert_eq!(errors.messages()["password"], "6자 이상 입력해주세요.");
}

#[test]
fn test_valid_value_deserializes_into_user_type() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Signup {
        password: String,
        password_confirm: String,
        age: f64,
    }

    let raw = json(serde_json::json!({
        "password": "secret1",
        "passwordConfirm": "secret1",
        "age": "33",
    }));
    let value = validate(&signup_schema(), &raw).into_result().unwrap();
    let signup: Signup = value.deserialize().unwrap();
    assert_eq!(
        signup,
        Signup {
            password: "secret1".into(),
            password_confirm: "secret1".into(),
            age: 33.0,
        }
    );
}
