//! Diesel implementation of the client repository traits.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        client::{Client, NewClient},
        types::ClientId,
    },
    models::client::{
        Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
    },
    repository::{
        ClientListQuery, ClientReader, ClientSort, ClientSortField, ClientWriter,
        DieselRepository, SortDirection, errors::RepositoryResult,
    },
    schema::clients,
};

macro_rules! then_order {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $query.then_order_by($column.asc()),
            SortDirection::Desc => $query.then_order_by($column.desc()),
        }
    };
}

fn apply_sort<'a>(
    mut query: clients::BoxedQuery<'a, Sqlite>,
    sort: &[ClientSort],
) -> clients::BoxedQuery<'a, Sqlite> {
    for key in sort {
        query = match key.field {
            ClientSortField::Id => then_order!(query, clients::id, key.direction),
            ClientSortField::Name => then_order!(query, clients::name, key.direction),
            ClientSortField::Cpf => then_order!(query, clients::cpf, key.direction),
            ClientSortField::Income => then_order!(query, clients::income, key.direction),
            ClientSortField::BirthDate => then_order!(query, clients::birth_date, key.direction),
            ClientSortField::Children => then_order!(query, clients::children, key.direction),
        };
    }
    // Stable order across pages.
    query.then_order_by(clients::id.asc())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(Client::try_from).transpose()?)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let total: i64 = clients::table.count().get_result(&mut conn)?;

        let mut items = apply_sort(clients::table.into_boxed(), &query.sort);

        if let Some(pagination) = &query.pagination {
            items = items
                .limit(to_i64(pagination.per_page))
                .offset(to_i64(pagination.offset()));
        }

        let items = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, items))
    }

    fn client_exists(&self, id: ClientId) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(clients::table.find(id.get())))
            .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let insertable: DbNewClient = new_client.into();
        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(created)?)
    }

    fn save_client(&self, client: &Client) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        let changes: DbUpdateClient = client.into();
        let updated = diesel::update(clients::table.find(client.id.get()))
            .set(&changes)
            .get_result::<DbClient>(&mut conn)
            .optional()?;

        Ok(updated.map(Client::try_from).transpose()?)
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(clients::table.find(id.get())).execute(&mut conn)?;

        Ok(deleted)
    }
}
