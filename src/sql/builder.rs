//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the subscribers table.

use crate::error::AppError;
use crate::model::{NewSubscriber, SubscriberChanges, SubscriberField};
use crate::sql::params::BindValue;

/// Backing table.
pub const TABLE: &str = "subscribers";

/// Primary key column. Reserved word in PostgreSQL, so always quoted.
pub const INDEX_COLUMN: &str = "index";

/// Quote identifier for PostgreSQL (safe: only from constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// Column list in row order: index, email_address, last_name, first_name, activation_flag.
fn select_column_list() -> String {
    std::iter::once(INDEX_COLUMN)
        .chain(SubscriberField::ALL.iter().map(|f| f.column()))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Present fields of a change set, in column order, with their bind values.
fn assignments(changes: &SubscriberChanges) -> Vec<(SubscriberField, BindValue)> {
    let mut out = Vec::new();
    if let Some(v) = &changes.email_address {
        out.push((SubscriberField::EmailAddress, BindValue::Text(v.clone())));
    }
    if let Some(v) = &changes.last_name {
        out.push((SubscriberField::LastName, BindValue::Text(v.clone())));
    }
    if let Some(v) = &changes.first_name {
        out.push((SubscriberField::FirstName, BindValue::Text(v.clone())));
    }
    if let Some(v) = changes.activation_flag {
        out.push((SubscriberField::ActivationFlag, BindValue::Bool(v)));
    }
    out
}

/// INSERT of the three text columns; the index and flag take their defaults.
pub fn insert(candidate: &NewSubscriber) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (field, value) in [
        (SubscriberField::EmailAddress, &candidate.email_address),
        (SubscriberField::LastName, &candidate.last_name),
        (SubscriberField::FirstName, &candidate.first_name),
    ] {
        let n = q.push_param(BindValue::Text(value.clone()));
        cols.push(quoted(field.column()));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list()
    );
    q
}

/// SELECT by primary key.
pub fn select_by_index(index: u16) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(index.into());
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(),
        quoted(TABLE),
        quoted(INDEX_COLUMN),
        n
    );
    q
}

/// SELECT all rows ordered by index.
pub fn select_list() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(),
        quoted(TABLE),
        quoted(INDEX_COLUMN)
    );
    q
}

/// UPDATE by index: SET only the fields present in `changes`.
/// An empty change set is rejected rather than producing an empty SET list.
pub fn update(index: u16, changes: &SubscriberChanges) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (field, value) in assignments(changes) {
        let n = q.push_param(value);
        sets.push(format!("{} = ${}", quoted(field.column()), n));
    }
    if sets.is_empty() {
        return Err(AppError::MalformedInput(
            "No recognized fields to update. Provide email_address, first_name or last_name.".into(),
        ));
    }
    let id_param = q.push_param(index.into());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(TABLE),
        sets.join(", "),
        quoted(INDEX_COLUMN),
        id_param,
        select_column_list()
    );
    Ok(q)
}

/// UPDATE of the activation flag alone.
pub fn activate(index: u16, flag: bool) -> QueryBuf {
    let mut q = QueryBuf::new();
    let flag_param = q.push_param(flag.into());
    let id_param = q.push_param(index.into());
    q.sql = format!(
        "UPDATE {} SET {} = ${} WHERE {} = ${}",
        quoted(TABLE),
        quoted(SubscriberField::ActivationFlag.column()),
        flag_param,
        quoted(INDEX_COLUMN),
        id_param
    );
    q
}

/// DELETE by index.
pub fn delete(index: u16) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(index.into());
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(TABLE),
        quoted(INDEX_COLUMN),
        n
    );
    q
}
