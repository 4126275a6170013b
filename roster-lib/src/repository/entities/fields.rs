//! Declarative description of the member form.
//!
//! Every field has a [`FieldType`] that carries the constraints for its kind. The base fields
//! map one to one onto [`FieldName`] and are described by the constraint table in [`rule`].
//! [`CUSTOM_FIELDS`] is an example set of extra fields whose values live in a record's sparse
//! custom field map.

use getset::{CopyGetters, Getters};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Options offered for the `job` field.
pub const JOB_OPTIONS: [&str; 3] = ["개발자", "PO", "디자이너"];

/// Job preselected on an empty form.
pub const DEFAULT_JOB: &str = "개발자";

/// The built-in fields of a member record. Doubles as the set of table columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum FieldName {
    Name,
    Address,
    Memo,
    JoinDate,
    Job,
    EmailConsent,
}

impl FieldName {
    /// Human readable label, as shown in form labels and table headers.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Name => "이름",
            FieldName::Address => "주소",
            FieldName::Memo => "메모",
            FieldName::JoinDate => "가입일",
            FieldName::Job => "직업",
            FieldName::EmailConsent => "이메일 수신 동의",
        }
    }

    pub fn id(self) -> &'static str {
        self.into()
    }
}

/// Kind of a form field together with the constraints that apply to that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text { max_length: usize },
    TextArea { max_length: usize },
    Date,
    Select { options: &'static [&'static str] },
    Checkbox,
}

impl FieldType {
    /// Maximum number of characters, for text-like kinds.
    pub fn max_length(&self) -> Option<usize> {
        match self {
            FieldType::Text { max_length } | FieldType::TextArea { max_length } => {
                Some(*max_length)
            }
            _ => None,
        }
    }

    /// Selectable values, for enumerated kinds.
    pub fn select_options(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldType::Select { options } => Some(*options),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldType::Text { .. })
    }

    pub fn is_text_area(&self) -> bool {
        matches!(self, FieldType::TextArea { .. })
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FieldType::Date)
    }

    pub fn is_select(&self) -> bool {
        matches!(self, FieldType::Select { .. })
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self, FieldType::Checkbox)
    }

    /// Short name of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldType::Text { .. } => "text",
            FieldType::TextArea { .. } => "textarea",
            FieldType::Date => "date",
            FieldType::Select { .. } => "select",
            FieldType::Checkbox => "checkbox",
        }
    }
}

/// Validation rule for one base field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    /// Message shown when the rule is violated. Empty if the field has nothing to report.
    pub message: &'static str,
    pub field_type: FieldType,
}

/// The field constraint table.
pub const fn rule(field: FieldName) -> FieldRule {
    match field {
        FieldName::Name => FieldRule {
            required: true,
            message: "이름은 필수값입니다.",
            field_type: FieldType::Text { max_length: 100 },
        },
        FieldName::Address => FieldRule {
            required: false,
            message: "글자수 20을 초과할 수 없습니다.",
            field_type: FieldType::Text { max_length: 20 },
        },
        FieldName::Memo => FieldRule {
            required: false,
            message: "글자수 50을 초과할 수 없습니다.",
            field_type: FieldType::TextArea { max_length: 50 },
        },
        FieldName::JoinDate => FieldRule {
            required: true,
            message: "가입일을 선택해주세요",
            field_type: FieldType::Date,
        },
        FieldName::Job => FieldRule {
            required: false,
            message: "",
            field_type: FieldType::Select {
                options: &JOB_OPTIONS,
            },
        },
        FieldName::EmailConsent => FieldRule {
            required: false,
            message: "",
            field_type: FieldType::Checkbox,
        },
    }
}

/// A configurable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, CopyGetters)]
pub struct FieldDefinition {
    #[getset(get_copy = "pub")]
    id: &'static str,
    #[getset(get_copy = "pub")]
    label: &'static str,
    #[getset(get_copy = "pub")]
    required: bool,
    #[getset(get = "pub")]
    field_type: FieldType,
}

impl FieldDefinition {
    pub const fn new(
        id: &'static str,
        label: &'static str,
        required: bool,
        field_type: FieldType,
    ) -> Self {
        Self {
            id,
            label,
            required,
            field_type,
        }
    }
}

impl From<FieldName> for FieldDefinition {
    fn from(field: FieldName) -> Self {
        let rule = rule(field);
        Self::new(field.id(), field.label(), rule.required, rule.field_type)
    }
}

/// Example custom fields. Not shown by default; values are kept in a record's custom field map.
pub const CUSTOM_FIELDS: [FieldDefinition; 2] = [
    FieldDefinition::new("department", "부서", false, FieldType::Text { max_length: 100 }),
    FieldDefinition::new("phone", "연락처", false, FieldType::Text { max_length: 20 }),
];

/// Definitions of the always-active fields, in form order.
pub fn base_fields() -> Vec<FieldDefinition> {
    FieldName::iter().map(FieldDefinition::from).collect()
}
