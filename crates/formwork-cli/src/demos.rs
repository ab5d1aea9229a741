//! The demo forms shipped with the CLI.
//!
//! - `basic`: text, email, select and required fields
//! - `basic2`: a dynamic array of industries, at most two
//! - `signup`: trimmed password with confirmation, a coerced number and a
//!   representatives array whose first entry is kept
//!
//! Demo forms produce plain JSON on success, so the CLI can print any of
//! them the same way.

use formwork_core::ErrorKind;
use formwork_forms::FormDefinition;
use formwork_schema::prelude::*;

/// One of the built-in demo forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoForm {
    /// Text, email and select fields.
    Basic,
    /// A dynamic field array.
    Basic2,
    /// Coercion, cross-field confirmation and a kept first array entry.
    Signup,
}

impl DemoForm {
    /// All demo forms, in display order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Basic2, Self::Signup];

    /// Looks a demo form up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == name)
    }

    /// Returns the name used on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Basic2 => "basic2",
            Self::Signup => "signup",
        }
    }

    /// Returns a one-line description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Basic => "문자, email, 셀렉트, 필수값",
            Self::Basic2 => "회사 업종 (dynamic field array, max 2)",
            Self::Signup => "coerce, password confirmation, representatives",
        }
    }

    fn basic_schema() -> Schema {
        ObjectSchema::new()
            .field(
                "name",
                FieldSchema::string().error_message(ErrorKind::RequiredMissing, "name은 필수값입니다."),
            )
            .field("nickname", FieldSchema::string().required(false))
            .field(
                "email",
                FieldSchema::string()
                    .error_message(ErrorKind::RequiredMissing, "email 형식이 아닙니다.")
                    .validator(EmailValidator::new().with_message("email 형식이 아닙니다.")),
            )
            .field(
                "bankName",
                FieldSchema::enumeration(["", "신한", "국민", "우리"])
                    .error_message(ErrorKind::ValueNotInEnumeration, "은행을 올바르게 선택해주세요."),
            )
            .into()
    }

    fn basic2_schema() -> Schema {
        let industry = ObjectSchema::new().field(
            "value",
            FieldSchema::string().validator(MinLengthValidator::new(1)),
        );
        ObjectSchema::new()
            .field("companyIndustry", ArraySchema::new(industry).max_count(2))
            .into()
    }

    fn signup_schema() -> Schema {
        let representative = ObjectSchema::new()
            .field("name", FieldSchema::string().trim(true))
            .field(
                "email",
                FieldSchema::string().required(false).validator(EmailValidator::new()),
            );
        ObjectSchema::new()
            .field(
                "password",
                FieldSchema::string()
                    .trim(true)
                    .validator(MinLengthValidator::new(6).with_message("비밀번호는 6자 이상이어야 합니다.")),
            )
            .field("passwordConfirm", FieldSchema::string().trim(true))
            .field(
                "age",
                FieldSchema::number()
                    .error_message(ErrorKind::TypeCoercionFailed, "나이는 숫자여야 합니다.")
                    .validator(MinValueValidator::new(0.0)),
            )
            .field(
                "representatives",
                ArraySchema::new(representative)
                    .min_count(1)
                    .keep_first(true)
                    .count_message("대표자를 한 명 이상 입력해주세요."),
            )
            .cross_field(
                FieldsMatch::new("password", "passwordConfirm")
                    .with_message("비밀번호가 일치하지 않습니다."),
            )
            .into()
    }
}

impl FormDefinition for DemoForm {
    type Output = serde_json::Value;

    fn schema(&self) -> Schema {
        match self {
            Self::Basic => Self::basic_schema(),
            Self::Basic2 => Self::basic2_schema(),
            Self::Signup => Self::signup_schema(),
        }
    }

    fn defaults(&self) -> RawValue {
        let defaults = match self {
            Self::Basic => serde_json::json!({
                "name": "",
                "nickname": "",
                "email": "",
                "bankName": "",
            }),
            Self::Basic2 => serde_json::json!({ "companyIndustry": [] }),
            Self::Signup => serde_json::json!({
                "password": "",
                "passwordConfirm": "",
                "representatives": [{}],
            }),
        };
        RawValue::from(defaults)
    }

    fn name(&self) -> &str {
        self.key()
    }
}
