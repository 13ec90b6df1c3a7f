use crate::domain::client::NewClient;
use crate::domain::types::ClientId;
use crate::dto::client::ClientDto;
use crate::pagination::Page;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::errors::{NOT_FOUND_BY_ID_MESSAGE, NOT_FOUND_MESSAGE};
use crate::services::{ServiceError, ServiceResult};

/// Returns one page of clients with the total count of stored clients.
pub fn list_clients<R>(repo: &R, query: ClientListQuery) -> ServiceResult<Page<ClientDto>>
where
    R: ClientReader + ?Sized,
{
    let pagination = query.pagination;

    let (total, clients) = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;

    let (number, size) = match pagination {
        Some(p) => (p.page, p.per_page),
        None => (0, clients.len()),
    };

    Ok(Page::new(clients, number, size, total).map(ClientDto::from))
}

/// Fetches a single client.
pub fn get_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<ClientDto>
where
    R: ClientReader + ?Sized,
{
    let client = repo
        .get_client_by_id(client_id)
        .map_err(|err| {
            log::error!("Failed to get client {client_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_BY_ID_MESSAGE.to_string()))?;

    Ok(client.into())
}

/// Persists a new client. Any id present in `dto` is ignored.
pub fn create_client<R>(repo: &R, dto: ClientDto) -> ServiceResult<ClientDto>
where
    R: ClientWriter + ?Sized,
{
    let new_client = NewClient::from(dto);

    let created = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        err
    })?;

    log::info!("Created client {}", created.id);
    Ok(created.into())
}

/// Overwrites every mutable field of an existing client with `dto`.
pub fn update_client<R>(repo: &R, client_id: ClientId, dto: ClientDto) -> ServiceResult<ClientDto>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let mut client = repo
        .get_client_by_id(client_id)
        .map_err(|err| {
            log::error!("Failed to get client {client_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    dto.apply_to(&mut client);

    // The row may have been removed since it was read.
    let saved = repo
        .save_client(&client)
        .map_err(|err| {
            log::error!("Failed to update client {client_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(saved.into())
}

/// Removes a client. Fails with [`ServiceError::IntegrityViolation`] when other
/// records still reference it.
pub fn delete_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<()>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let exists = repo.client_exists(client_id).map_err(|err| {
        log::error!("Failed to check client {client_id}: {err}");
        err
    })?;

    if !exists {
        return Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let deleted = repo.delete_client(client_id).map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        err
    })?;

    if deleted == 0 {
        return Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    log::info!("Deleted client {client_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::client::Client;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::errors::INTEGRITY_VIOLATION_MESSAGE;

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    fn stored_client(value: i32) -> Client {
        Client {
            id: id(value),
            name: format!("Client #{value}"),
            cpf: "12345678901".to_string(),
            income: 1000.0 * f64::from(value),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            children: 2,
        }
    }

    fn alice_dto() -> ClientDto {
        ClientDto {
            id: None,
            name: "Alice".to_string(),
            cpf: "12345678901".to_string(),
            income: 2500.0,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            children: 1,
        }
    }

    #[test]
    fn list_converts_page_and_keeps_metadata() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| query.pagination.is_some_and(|p| p.page == 1 && p.per_page == 2))
            .times(1)
            .returning(|_| Ok((5, vec![stored_client(3), stored_client(4)])));

        let page = list_clients(&repo, ClientListQuery::new().paginate(1, 2)).unwrap();

        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 2);
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].id, Some(id(3)));
        assert_eq!(page.content[1].name, "Client #4");
    }

    #[test]
    fn get_returns_dto_or_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|client_id| Ok((client_id.get() == 1).then(|| stored_client(1))));

        let dto = get_client(&repo, id(1)).unwrap();
        assert_eq!(dto.id, Some(id(1)));
        assert_eq!(dto.name, "Client #1");

        assert_eq!(
            get_client(&repo, id(2)),
            Err(ServiceError::NotFound(NOT_FOUND_BY_ID_MESSAGE.to_string()))
        );
    }

    #[test]
    fn create_ignores_supplied_id_and_returns_assigned_one() {
        let mut repo = MockRepository::new();
        repo.expect_create_client()
            .withf(|new_client| new_client.name == "Alice" && new_client.children == 1)
            .times(1)
            .returning(|new_client| {
                Ok(Client {
                    id: ClientId::new(1).unwrap(),
                    name: new_client.name.clone(),
                    cpf: new_client.cpf.clone(),
                    income: new_client.income,
                    birth_date: new_client.birth_date,
                    children: new_client.children,
                })
            });

        let dto = ClientDto {
            id: Some(id(77)),
            ..alice_dto()
        };
        let created = create_client(&repo, dto).unwrap();

        assert_eq!(created.id, Some(id(1)));
        assert_eq!(ClientDto { id: None, ..created }, alice_dto());
    }

    #[test]
    fn update_overwrites_fields_and_preserves_identity() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(stored_client(5))));
        repo.expect_save_client()
            .withf(|client| client.id.get() == 5 && client.name == "Alice")
            .times(1)
            .returning(|client| Ok(Some(client.clone())));

        let updated = update_client(&repo, id(5), alice_dto()).unwrap();

        assert_eq!(updated.id, Some(id(5)));
        assert_eq!(ClientDto { id: None, ..updated }, alice_dto());
    }

    #[test]
    fn update_of_missing_client_never_writes() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_save_client().times(0);

        assert_eq!(
            update_client(&repo, id(9), alice_dto()),
            Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()))
        );
    }

    #[test]
    fn update_reports_row_removed_before_write() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Ok(Some(stored_client(5))));
        repo.expect_save_client().returning(|_| Ok(None));

        assert_eq!(
            update_client(&repo, id(5), alice_dto()),
            Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()))
        );
    }

    #[test]
    fn delete_of_missing_client_never_deletes() {
        let mut repo = MockRepository::new();
        repo.expect_client_exists().returning(|_| Ok(false));
        repo.expect_delete_client().times(0);

        assert_eq!(
            delete_client(&repo, id(999)),
            Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.to_string()))
        );
    }

    #[test]
    fn delete_maps_constraint_violation() {
        let mut repo = MockRepository::new();
        repo.expect_client_exists().returning(|_| Ok(true));
        repo.expect_delete_client().returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "Foreign key constraint violation".to_string(),
            ))
        });

        assert_eq!(
            delete_client(&repo, id(1)),
            Err(ServiceError::IntegrityViolation(
                INTEGRITY_VIOLATION_MESSAGE.to_string()
            ))
        );
    }

    #[test]
    fn delete_existing_client() {
        let mut repo = MockRepository::new();
        repo.expect_client_exists().returning(|_| Ok(true));
        repo.expect_delete_client()
            .withf(|client_id| client_id.get() == 1)
            .times(1)
            .returning(|_| Ok(1));

        assert_eq!(delete_client(&repo, id(1)), Ok(()));
    }

    #[test]
    fn storage_failures_become_internal_errors() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|_| Err(RepositoryError::ConnectionError("pool exhausted".to_string())));

        assert!(matches!(
            get_client(&repo, id(1)),
            Err(ServiceError::Internal(_))
        ));
    }
}
