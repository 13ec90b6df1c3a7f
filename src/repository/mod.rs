use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        client::{Client, NewClient},
        types::ClientId,
    },
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Zero-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows preceding the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.per_page)
    }
}

/// Columns a client list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSortField {
    Id,
    Name,
    Cpf,
    Income,
    BirthDate,
    Children,
}

impl ClientSortField {
    /// Resolves a property name as it appears in the JSON representation.
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "cpf" => Some(Self::Cpf),
            "income" => Some(Self::Income),
            "birthDate" => Some(Self::BirthDate),
            "children" => Some(Self::Children),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSort {
    pub field: ClientSortField,
    pub direction: SortDirection,
}

impl ClientSort {
    pub fn asc(field: ClientSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: ClientSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Parameters for listing clients. Results are always ordered by the
/// requested sort keys followed by ascending id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientListQuery {
    pub pagination: Option<Pagination>,
    pub sort: Vec<ClientSort>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    pub fn sort_by(mut self, sort: ClientSort) -> Self {
        self.sort.push(sort);
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Returns the total number of clients together with the requested page.
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    fn client_exists(&self, id: ClientId) -> RepositoryResult<bool>;
}

pub trait ClientWriter {
    /// Inserts a client, returning it with its storage-assigned id.
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    /// Overwrites the row identified by `client.id`. `None` when no such row exists.
    fn save_client(&self, client: &Client) -> RepositoryResult<Option<Client>>;
    /// Removes the client, returning the number of deleted rows.
    fn delete_client(&self, id: ClientId) -> RepositoryResult<usize>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
