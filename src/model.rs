//! Subscriber entity, creation candidate, and partial change set.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::collections::HashMap;

/// One persisted subscriber row. Zero values are omitted from the JSON form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub index: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub activation_flag: bool,
}

fn is_zero(n: &u16) -> bool {
    *n == 0
}

impl<'r> FromRow<'r, PgRow> for Subscriber {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let raw_index: i32 = row.try_get("index")?;
        let index = u16::try_from(raw_index).map_err(|e| sqlx::Error::ColumnDecode {
            index: "index".into(),
            source: Box::new(e),
        })?;
        let text = |name: &str| -> Result<String, sqlx::Error> {
            Ok(row.try_get::<Option<String>, _>(name)?.unwrap_or_default())
        };
        Ok(Subscriber {
            index,
            email_address: text("email_address")?,
            first_name: text("first_name")?,
            last_name: text("last_name")?,
            activation_flag: row.try_get::<Option<bool>, _>("activation_flag")?.unwrap_or(false),
        })
    }
}

/// Creation candidate; the index is assigned by storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscriber {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl NewSubscriber {
    /// Missing keys become empty strings; extra keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let get = |field: SubscriberField| params.get(field.key()).cloned().unwrap_or_default();
        NewSubscriber {
            email_address: get(SubscriberField::EmailAddress),
            first_name: get(SubscriberField::FirstName),
            last_name: get(SubscriberField::LastName),
        }
    }
}

/// Columns a change set may touch. Column names never come from callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriberField {
    EmailAddress,
    LastName,
    FirstName,
    ActivationFlag,
}

impl SubscriberField {
    pub const ALL: [SubscriberField; 4] = [
        SubscriberField::EmailAddress,
        SubscriberField::LastName,
        SubscriberField::FirstName,
        SubscriberField::ActivationFlag,
    ];

    pub fn column(self) -> &'static str {
        match self {
            SubscriberField::EmailAddress => "email_address",
            SubscriberField::LastName => "last_name",
            SubscriberField::FirstName => "first_name",
            SubscriberField::ActivationFlag => "activation_flag",
        }
    }

    /// Wire key; identical to the column name.
    pub fn key(self) -> &'static str {
        self.column()
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Partial update: only `Some` members are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriberChanges {
    pub email_address: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub activation_flag: Option<bool>,
}

impl SubscriberChanges {
    /// Reads the text fields from query pairs. Empty values count as unset.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let mut changes = SubscriberChanges::default();
        for (key, value) in params {
            if value.is_empty() {
                continue;
            }
            match SubscriberField::from_key(key) {
                Some(SubscriberField::EmailAddress) => changes.email_address = Some(value.clone()),
                Some(SubscriberField::FirstName) => changes.first_name = Some(value.clone()),
                Some(SubscriberField::LastName) => changes.last_name = Some(value.clone()),
                // flag changes go through activation
                Some(SubscriberField::ActivationFlag) | None => {}
            }
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.email_address.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.activation_flag.is_none()
    }

    pub fn apply_to(&self, subscriber: &mut Subscriber) {
        if let Some(v) = &self.email_address {
            subscriber.email_address = v.clone();
        }
        if let Some(v) = &self.first_name {
            subscriber.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            subscriber.last_name = v.clone();
        }
        if let Some(v) = self.activation_flag {
            subscriber.activation_flag = v;
        }
    }
}
