//! Customer aggregate service.
//!
//! Owns the rules for creating, replacing, looking up and deleting customers
//! together with their phone and addresses. Persistence goes through a
//! [`CustomerStore`]; password hashing through a [`PasswordEncoder`].

mod error;

pub use error::CustomerError;

use tracing::instrument;

use sushi_core::{CustomerId, Email, Page, PageRequest};

use crate::db::{CustomerStore, RepositoryError};
use crate::models::{Address, Customer, Phone};
use crate::services::password::PasswordEncoder;

/// Phone data supplied by a client.
#[derive(Debug, Clone)]
pub struct PhoneInput {
    pub number: String,
}

/// Address data supplied by a client.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub number: String,
    pub street: String,
    pub neighborhood: String,
}

/// Data for registering a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    /// Plaintext; encoded before it reaches storage.
    pub password: String,
    pub phone: PhoneInput,
    pub addresses: Vec<AddressInput>,
}

/// Full replacement of an existing customer.
///
/// `addresses: None` and an empty list both leave the customer with no
/// addresses.
#[derive(Debug, Clone)]
pub struct CustomerUpdate {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    /// Plaintext; encoded before it reaches storage.
    pub password: String,
    pub phone: PhoneInput,
    pub addresses: Option<Vec<AddressInput>>,
}

/// Customer service.
pub struct CustomerService<S, E> {
    customers: S,
    encoder: E,
}

impl<S, E> CustomerService<S, E> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(customers: S, encoder: E) -> Self {
        Self { customers, encoder }
    }
}

impl<S: CustomerStore, E: PasswordEncoder> CustomerService<S, E> {
    /// One page of customers.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all_paged(&self, page: PageRequest) -> Result<Page<Customer>, CustomerError> {
        Ok(self.customers.find_all_paged(page).await?)
    }

    /// Every customer, unpaged.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.customers.find_all().await?)
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this id.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found("customer not found with this id"))
    }

    /// Customers whose name contains `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if nothing matches.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Customer>, CustomerError> {
        let customers = self.customers.find_by_name_containing_ignore_case(name).await?;

        if customers.is_empty() {
            return Err(CustomerError::not_found("no customers found with this name"));
        }

        Ok(customers)
    }

    /// Get a customer by email.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this email.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn find_by_email(&self, email: &Email) -> Result<Customer, CustomerError> {
        self.customers
            .find_by_email(email)
            .await?
            .ok_or_else(|| CustomerError::not_found("customer not found with this email"))
    }

    /// Register a new customer with one phone and any number of addresses.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::EmailTaken` if the email is already registered
    /// (nothing is written).
    /// Returns `CustomerError::PasswordHash` if the password cannot be encoded.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: NewCustomer) -> Result<Customer, CustomerError> {
        if self.customers.find_by_email(&request.email).await?.is_some() {
            tracing::info!("rejected registration, email already in use");
            return Err(CustomerError::EmailTaken);
        }

        let password_hash = self.encoder.encode(&request.password)?;

        let mut customer = Customer::new(request.name, request.email, password_hash);
        customer.phone = Some(Phone::new(customer.id, request.phone.number));
        customer.addresses = build_addresses(customer.id, request.addresses);

        // The unique constraint still wins a race with a concurrent create
        let customer = self.customers.save(&customer).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CustomerError::EmailTaken,
            other => CustomerError::Repository(other),
        })?;

        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Overwrite a customer's fields, phone number and address set.
    ///
    /// The existing phone keeps its identity; addresses are rebuilt from
    /// scratch. Email uniqueness against other customers is not pre-checked.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this id (nothing
    /// is written).
    /// Returns `CustomerError::Repository` if the store rejects the write,
    /// including a `Conflict` when the new email belongs to someone else.
    #[instrument(skip(self, update), fields(customer_id = %update.id))]
    pub async fn replace(&self, update: CustomerUpdate) -> Result<(), CustomerError> {
        let mut customer = self.find_by_id(update.id).await?;

        customer.name = update.name;
        customer.email = update.email;
        customer.password = self.encoder.encode(&update.password)?;

        match customer.phone.as_mut() {
            Some(phone) => phone.number = update.phone.number,
            None => customer.phone = Some(Phone::new(customer.id, update.phone.number)),
        }

        customer.addresses.clear();
        customer
            .addresses
            .extend(build_addresses(customer.id, update.addresses.unwrap_or_default()));

        self.customers.save(&customer).await?;

        tracing::info!("customer replaced");
        Ok(())
    }

    /// Delete a customer with its phone and addresses.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this id.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        let customer = self.find_by_id(id).await?;

        self.customers.delete(&customer).await?;

        tracing::info!("customer deleted");
        Ok(())
    }
}

fn build_addresses(owner: CustomerId, inputs: Vec<AddressInput>) -> Vec<Address> {
    inputs
        .into_iter()
        .map(|a| Address::new(owner, a.number, a.street, a.neighborhood))
        .collect()
}
