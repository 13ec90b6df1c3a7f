use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::ClientId;

/// A client record as persisted by the repository.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// National tax identification number.
    pub cpf: String,
    pub income: f64,
    pub birth_date: NaiveDate,
    pub children: i32,
}

/// Client data that has not been persisted yet and therefore has no id.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub cpf: String,
    pub income: f64,
    pub birth_date: NaiveDate,
    pub children: i32,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: String,
        cpf: String,
        income: f64,
        birth_date: NaiveDate,
        children: i32,
    ) -> Self {
        Self {
            name,
            cpf,
            income,
            birth_date,
            children,
        }
    }
}
