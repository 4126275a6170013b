use std::{borrow::Cow, collections::BTreeMap};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::repository::entities::{fields::FieldName, record_id::RecordId};

/// Values of custom fields keyed by field id.
pub type CustomFields = BTreeMap<String, serde_json::Value>;

/// Represents one member of the roster.
///
/// The id is fixed at construction. Every other field changes only through
/// [`Record::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[getset(get = "pub")]
    id: RecordId,
    #[getset(get = "pub")]
    name: String,
    #[serde(default)]
    #[getset(get = "pub")]
    address: String,
    #[serde(default)]
    #[getset(get = "pub")]
    memo: String,
    #[getset(get_copy = "pub")]
    join_date: DateTime<Utc>,
    #[serde(default)]
    #[getset(get = "pub")]
    job: String,
    #[serde(default)]
    #[getset(get_copy = "pub")]
    email_consent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get = "pub")]
    custom_fields: Option<CustomFields>,
    /// Set by every update, absent on records that were never edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get_copy = "pub")]
    updated_at: Option<DateTime<Utc>>,
}

/// The user editable part of a [`Record`], as produced by a validated form.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub name: String,
    pub address: String,
    pub memo: String,
    pub join_date: DateTime<Utc>,
    pub job: String,
    pub email_consent: bool,
    pub custom_fields: Option<CustomFields>,
}

/// A partial update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub memo: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
    pub job: Option<String>,
    pub email_consent: Option<bool>,
    pub custom_fields: Option<CustomFields>,
}

impl Record {
    pub fn new(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            name: fields.name,
            address: fields.address,
            memo: fields.memo,
            join_date: fields.join_date,
            job: fields.job,
            email_consent: fields.email_consent,
            custom_fields: fields.custom_fields,
            updated_at: None,
        }
    }

    /// Merge `patch` into this record and stamp it as updated at `now`. An empty custom field
    /// map clears the record's custom fields.
    pub fn apply(&mut self, patch: RecordPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(memo) = patch.memo {
            self.memo = memo;
        }
        if let Some(join_date) = patch.join_date {
            self.join_date = join_date;
        }
        if let Some(job) = patch.job {
            self.job = job;
        }
        if let Some(email_consent) = patch.email_consent {
            self.email_consent = email_consent;
        }
        if let Some(custom_fields) = patch.custom_fields {
            self.custom_fields = (!custom_fields.is_empty()).then_some(custom_fields);
        }

        self.updated_at = Some(now);
    }

    /// Calendar day of the join date, in UTC.
    pub fn join_day(&self) -> NaiveDate {
        self.join_date.date_naive()
    }

    /// The value of `field` as displayed in the table. Dates are rendered as `YYYY-MM-DD` and
    /// the consent flag as `true`/`false`.
    pub fn cell(&self, field: FieldName) -> Cow<'_, str> {
        match field {
            FieldName::Name => Cow::Borrowed(&self.name),
            FieldName::Address => Cow::Borrowed(&self.address),
            FieldName::Memo => Cow::Borrowed(&self.memo),
            FieldName::JoinDate => Cow::Owned(day_key(self.join_day())),
            FieldName::Job => Cow::Borrowed(&self.job),
            FieldName::EmailConsent => Cow::Owned(self.email_consent.to_string()),
        }
    }

    /// The two example members a fresh roster starts with.
    pub fn seed() -> Vec<Record> {
        let department = CustomFields::from([("department".to_string(), "디자인팀".into())]);

        vec![
            Record::new(
                "1".into(),
                RecordFields {
                    name: "John Doe".into(),
                    address: "서울 강남구".into(),
                    memo: "외국인".into(),
                    join_date: start_of_day(seed_day(2)),
                    job: "개발자".into(),
                    email_consent: true,
                    custom_fields: None,
                },
            ),
            Record::new(
                "2".into(),
                RecordFields {
                    name: "Foo Bar".into(),
                    address: "서울 서초구".into(),
                    memo: "한국인".into(),
                    join_date: start_of_day(seed_day(1)),
                    job: "PO".into(),
                    email_consent: false,
                    custom_fields: Some(department),
                },
            ),
        ]
    }
}

impl From<RecordFields> for RecordPatch {
    fn from(fields: RecordFields) -> Self {
        Self {
            name: Some(fields.name),
            address: Some(fields.address),
            memo: Some(fields.memo),
            join_date: Some(fields.join_date),
            job: Some(fields.job),
            email_consent: Some(fields.email_consent),
            custom_fields: fields.custom_fields,
        }
    }
}

/// Midnight UTC at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// The `YYYY-MM-DD` form of a calendar day.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

fn seed_day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).expect("seed dates are valid calendar days")
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{CustomFields, Record, RecordFields, RecordPatch, start_of_day};
    use crate::repository::entities::FieldName;

    fn fields() -> RecordFields {
        RecordFields {
            name: "Kim".into(),
            address: "부산".into(),
            memo: "".into(),
            join_date: Utc.with_ymd_and_hms(2024, 10, 1, 23, 59, 0).unwrap(),
            job: "PO".into(),
            email_consent: false,
            custom_fields: None,
        }
    }

    #[test]
    fn test_seed() {
        let seed = Record::seed();

        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].id().as_str(), "1");
        assert_eq!(seed[0].join_day(), NaiveDate::from_ymd_opt(2024, 10, 2).unwrap());
        assert!(seed[0].custom_fields().is_none());
        assert_eq!(
            seed[1].custom_fields().as_ref().unwrap()["department"],
            "디자인팀"
        );
    }

    #[test]
    fn test_apply_merges_and_stamps() {
        let mut record = Record::new("7".into(), fields());
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        record.apply(
            RecordPatch {
                memo: Some("VIP".into()),
                email_consent: Some(true),
                ..RecordPatch::default()
            },
            now,
        );

        assert_eq!(record.memo(), "VIP");
        assert!(record.email_consent());
        assert_eq!(record.name(), "Kim");
        assert_eq!(record.id().as_str(), "7");
        assert_eq!(record.updated_at(), Some(now));
    }

    #[test]
    fn test_apply_empty_custom_fields_clears_them() {
        let mut record = Record::seed().remove(1);
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        record.apply(RecordPatch::default(), now);
        assert!(record.custom_fields().is_some());

        record.apply(
            RecordPatch {
                custom_fields: Some(CustomFields::new()),
                ..RecordPatch::default()
            },
            now,
        );
        assert!(record.custom_fields().is_none());
    }

    #[test]
    fn test_cell() {
        let record = Record::new("7".into(), fields());

        assert_eq!(record.cell(FieldName::JoinDate), "2024-10-01");
        assert_eq!(record.cell(FieldName::EmailConsent), "false");
        assert_eq!(record.cell(FieldName::Address), "부산");
    }

    #[test]
    fn test_json_layout() {
        let mut record = Record::new("7".into(), fields());
        record.join_date = start_of_day(NaiveDate::from_ymd_opt(2024, 10, 2).unwrap());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["joinDate"], "2024-10-02T00:00:00Z");
        assert_eq!(json["emailConsent"], false);
        assert!(json.get("customFields").is_none());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_parse_browser_json() {
        let json = r#"{"id":"1728000000000","name":"Lee","address":"","memo":"",
            "joinDate":"2024-10-03T09:30:00.000Z","job":"디자이너","emailConsent":true,
            "customFields":{}}"#;

        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.join_day(), NaiveDate::from_ymd_opt(2024, 10, 3).unwrap());
        assert_eq!(record.job(), "디자이너");
        assert!(record.custom_fields().as_ref().unwrap().is_empty());
    }
}
