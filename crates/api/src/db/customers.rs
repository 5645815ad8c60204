//! Customer aggregate persistence.
//!
//! The aggregate is stored across three tables (`customer`, `phone`,
//! `address`). Reads assemble the owned rows back onto their customer; writes
//! and deletes touch all three tables inside a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sushi_core::{AddressId, CustomerId, Email, Page, PageRequest, PhoneId};

use super::{RepositoryError, begin_snapshot, count_to_total, escape_like};
use crate::models::{Address, Customer, Phone};

/// Storage port for the customer aggregate.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// One page of customers ordered by name.
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Customer>, RepositoryError>;

    /// Every customer ordered by name.
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Look up a customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Look up a customer by (normalized) email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    /// Customers whose name contains `name`, ignoring case.
    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Customer>, RepositoryError>;

    /// Insert or update the whole aggregate.
    ///
    /// The stored phone and address set are made to match `customer` exactly:
    /// owned rows missing from it are deleted.
    async fn save(&self, customer: &Customer) -> Result<Customer, RepositoryError>;

    /// Delete the customer together with its phone and addresses.
    async fn delete(&self, customer: &Customer) -> Result<(), RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, sqlx::FromRow)]
struct PhoneRow {
    id: PhoneId,
    customer_id: CustomerId,
    number: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    customer_id: CustomerId,
    number: String,
    street: String,
    neighborhood: String,
}

const CUSTOMER_COLUMNS: &str = "SELECT id, name, email, password FROM sushi.customer";

/// `PostgreSQL` implementation of [`CustomerStore`].
pub struct PgCustomerStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCustomerStore<'a> {
    /// Create a new customer store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach phones and addresses to a batch of customer rows.
    async fn assemble(&self, rows: Vec<CustomerRow>) -> Result<Vec<Customer>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id.get()).collect();

        let phones = sqlx::query_as::<_, PhoneRow>(
            r"
            SELECT id, customer_id, number
            FROM sushi.phone
            WHERE customer_id = ANY($1)
            ",
        )
        .bind(ids.as_slice())
        .fetch_all(self.pool)
        .await?;

        let addresses = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, customer_id, number, street, neighborhood
            FROM sushi.address
            WHERE customer_id = ANY($1)
            ORDER BY street, number
            ",
        )
        .bind(ids.as_slice())
        .fetch_all(self.pool)
        .await?;

        let mut phones: HashMap<CustomerId, Phone> = phones
            .into_iter()
            .map(|p| {
                (
                    p.customer_id,
                    Phone {
                        id: p.id,
                        customer_id: p.customer_id,
                        number: p.number,
                    },
                )
            })
            .collect();

        let mut owned_addresses: HashMap<CustomerId, Vec<Address>> = HashMap::new();
        for a in addresses {
            owned_addresses
                .entry(a.customer_id)
                .or_default()
                .push(Address {
                    id: a.id,
                    customer_id: a.customer_id,
                    number: a.number,
                    street: a.street,
                    neighborhood: a.neighborhood,
                });
        }

        rows.into_iter()
            .map(|row| {
                let email = Email::parse(&row.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;

                Ok(Customer {
                    id: row.id,
                    name: row.name,
                    email,
                    password: row.password,
                    phone: phones.remove(&row.id),
                    addresses: owned_addresses.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn assemble_one(
        &self,
        row: Option<CustomerRow>,
    ) -> Result<Option<Customer>, RepositoryError> {
        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore<'_> {
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<Customer>, RepositoryError> {
        // Count and page from the same snapshot so the total matches the content.
        let mut tx = begin_snapshot(self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sushi.customer")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{CUSTOMER_COLUMNS} ORDER BY name, id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let customers = self.assemble(rows).await?;
        Ok(Page::new(customers, page, count_to_total(total)))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!("{CUSTOMER_COLUMNS} ORDER BY name, id"))
            .fetch_all(self.pool)
            .await?;

        self.assemble(rows).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{CUSTOMER_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        self.assemble_one(row).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{CUSTOMER_COLUMNS} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        self.assemble_one(row).await
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        name: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r"{CUSTOMER_COLUMNS} WHERE name ILIKE '%' || $1 || '%' ESCAPE '\' ORDER BY name, id"
        ))
        .bind(escape_like(name))
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn save(&self, customer: &Customer) -> Result<Customer, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO sushi.customer (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                updated_at = NOW()
            ",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(customer.email.as_str())
        .bind(&customer.password)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "email already exists"))?;

        // Drop any phone that is no longer the owned one before upserting,
        // phone.customer_id is unique.
        let kept_phone: Option<Uuid> = customer.phone.as_ref().map(|p| p.id.get());
        sqlx::query(
            r"
            DELETE FROM sushi.phone
            WHERE customer_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            ",
        )
        .bind(customer.id)
        .bind(kept_phone)
        .execute(&mut *tx)
        .await?;

        if let Some(phone) = &customer.phone {
            sqlx::query(
                r"
                INSERT INTO sushi.phone (id, customer_id, number)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO UPDATE SET number = EXCLUDED.number
                ",
            )
            .bind(phone.id)
            .bind(customer.id)
            .bind(&phone.number)
            .execute(&mut *tx)
            .await?;
        }

        let kept_addresses: Vec<Uuid> = customer.addresses.iter().map(|a| a.id.get()).collect();
        sqlx::query(
            r"
            DELETE FROM sushi.address
            WHERE customer_id = $1 AND NOT (id = ANY($2))
            ",
        )
        .bind(customer.id)
        .bind(kept_addresses.as_slice())
        .execute(&mut *tx)
        .await?;

        for address in &customer.addresses {
            sqlx::query(
                r"
                INSERT INTO sushi.address (id, customer_id, number, street, neighborhood)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE
                SET number = EXCLUDED.number,
                    street = EXCLUDED.street,
                    neighborhood = EXCLUDED.neighborhood
                ",
            )
            .bind(address.id)
            .bind(customer.id)
            .bind(&address.number)
            .bind(&address.street)
            .bind(&address.neighborhood)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(customer.clone())
    }

    async fn delete(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sushi.address WHERE customer_id = $1")
            .bind(customer.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sushi.phone WHERE customer_id = $1")
            .bind(customer.id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sushi.customer WHERE id = $1")
            .bind(customer.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
