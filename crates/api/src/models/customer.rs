//! Customer aggregate: the customer record plus its owned phone and addresses.

use sushi_core::{AddressId, CustomerId, Email, PhoneId};

/// A registered customer (aggregate root).
///
/// The phone and addresses are owned by the customer: they are written and
/// deleted together with it and always carry its id as `customer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer ID, assigned when the customer is built.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Login email, unique across customers.
    pub email: Email,
    /// Encoded password hash. Never the plaintext.
    pub password: String,
    /// Contact phone.
    pub phone: Option<Phone>,
    /// Delivery addresses.
    pub addresses: Vec<Address>,
}

impl Customer {
    /// Build a new customer with a fresh id and no owned entities yet.
    #[must_use]
    pub fn new(name: String, email: Email, password_hash: String) -> Self {
        Self {
            id: CustomerId::generate(),
            name,
            email,
            password: password_hash,
            phone: None,
            addresses: Vec::new(),
        }
    }
}

/// A customer's phone (owned by exactly one customer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    /// Unique phone ID.
    pub id: PhoneId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Phone number as entered.
    pub number: String,
}

impl Phone {
    /// Build a phone owned by `customer_id`.
    #[must_use]
    pub fn new(customer_id: CustomerId, number: String) -> Self {
        Self {
            id: PhoneId::generate(),
            customer_id,
            number,
        }
    }
}

/// A delivery address (owned by exactly one customer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Street number.
    pub number: String,
    /// Street name.
    pub street: String,
    /// Neighborhood.
    pub neighborhood: String,
}

impl Address {
    /// Build an address owned by `customer_id`.
    #[must_use]
    pub fn new(customer_id: CustomerId, number: String, street: String, neighborhood: String) -> Self {
        Self {
            id: AddressId::generate(),
            customer_id,
            number,
            street,
            neighborhood,
        }
    }
}
