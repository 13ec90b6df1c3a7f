//! Transport representation of clients and the list query parameters.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::dto::errors::FieldMessage;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE};
use crate::repository::{ClientListQuery, ClientSort, ClientSortField, SortDirection};

pub const REQUIRED_MESSAGE: &str = "Campo requerido";

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("required", REQUIRED_MESSAGE));
    }
    Ok(())
}

/// Accepts 11 digits, either bare or formatted as `000.000.000-00`.
fn cpf_format(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;

    let value = value.trim();
    let bare = value.len() == 11 && value.bytes().all(|b| b.is_ascii_digit());
    let formatted = value.len() == 14
        && value.bytes().enumerate().all(|(i, b)| match i {
            3 | 7 => b == b'.',
            11 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    if bare || formatted {
        Ok(())
    } else {
        Err(validation_error("cpf", "CPF deve conter 11 dígitos"))
    }
}

fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(validation_error(
            "past_or_present",
            "Data de nascimento não pode ser futura",
        ));
    }
    Ok(())
}

/// Client as exchanged over HTTP, both in request and response bodies.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    /// Absent for clients that were not created yet; ignored on input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ClientId>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "cpf_format"))]
    pub cpf: String,
    #[validate(range(min = 0.0, message = "Renda não pode ser negativa"))]
    pub income: f64,
    #[validate(custom(function = "not_in_future"))]
    pub birth_date: NaiveDate,
    #[validate(range(min = 0, message = "Quantidade de filhos não pode ser negativa"))]
    pub children: i32,
}

impl ClientDto {
    /// Overwrites every mutable field of `client`; its id is left untouched.
    pub fn apply_to(self, client: &mut Client) {
        client.name = self.name;
        client.cpf = self.cpf;
        client.income = self.income;
        client.birth_date = self.birth_date;
        client.children = self.children;
    }
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: Some(client.id),
            name: client.name,
            cpf: client.cpf,
            income: client.income,
            birth_date: client.birth_date,
            children: client.children,
        }
    }
}

impl From<ClientDto> for NewClient {
    fn from(dto: ClientDto) -> Self {
        NewClient::new(dto.name, dto.cpf, dto.income, dto.birth_date, dto.children)
    }
}

/// Raw pagination parameters of `GET /clients`.
///
/// Values are kept as strings so that malformed numbers fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    /// `property[,property...][,asc|desc]`, may be repeated.
    #[serde(default)]
    pub sort: Vec<String>,
}

fn parse_sort(value: &str) -> Result<Vec<ClientSort>, String> {
    let mut tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let direction = match tokens.last().copied() {
        Some(t) if t.eq_ignore_ascii_case("asc") => {
            tokens.pop();
            SortDirection::Asc
        }
        Some(t) if t.eq_ignore_ascii_case("desc") => {
            tokens.pop();
            SortDirection::Desc
        }
        _ => SortDirection::Asc,
    };

    if tokens.is_empty() {
        return Err(format!("Nenhuma propriedade de ordenação em '{value}'"));
    }

    tokens
        .into_iter()
        .map(|property| {
            ClientSortField::from_property(property)
                .map(|field| ClientSort { field, direction })
                .ok_or_else(|| format!("Propriedade de ordenação desconhecida: {property}"))
        })
        .collect()
}

impl ClientsQuery {
    /// Applies defaults and limits, rejecting unknown sort properties.
    pub fn into_list_query(self) -> Result<ClientListQuery, Vec<FieldMessage>> {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let size = self
            .size
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .min(MAX_ITEMS_PER_PAGE);

        let mut query = ClientListQuery::new().paginate(page, size);
        let mut errors = Vec::new();

        for value in self.sort.iter().filter(|v| !v.trim().is_empty()) {
            match parse_sort(value) {
                Ok(keys) => query.sort.extend(keys),
                Err(message) => errors.push(FieldMessage::new("sort", message)),
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}
