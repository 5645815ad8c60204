//! Customer routes.
//!
//! Responses never include the password hash.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use sushi_core::{AddressId, CustomerId, Email, Page, PhoneId};

use super::{ApiJson, ApiPath, ApiQuery, NameQuery, PageParams, require_non_blank};
use crate::error::{AppError, Result};
use crate::models::{Address, Customer, Phone};
use crate::services::customers::{AddressInput, CustomerUpdate, NewCustomer, PhoneInput};
use crate::state::AppState;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PhoneBody {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressBody {
    pub number: String,
    pub street: String,
    pub neighborhood: String,
}

/// `POST /api/customers` body.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: PhoneBody,
    #[serde(default)]
    pub addresses: Vec<AddressBody>,
}

/// `PUT /api/customers` body.
#[derive(Debug, Deserialize)]
pub struct ReplaceCustomerBody {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: PhoneBody,
    pub addresses: Option<Vec<AddressBody>>,
}

/// `?email=` lookup parameter.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

impl PhoneBody {
    fn validate(self) -> Result<PhoneInput> {
        Ok(PhoneInput {
            number: require_non_blank("phone.number", self.number)?,
        })
    }
}

impl AddressBody {
    fn validate(self) -> Result<AddressInput> {
        Ok(AddressInput {
            number: require_non_blank("address.number", self.number)?,
            street: require_non_blank("address.street", self.street)?,
            neighborhood: require_non_blank("address.neighborhood", self.neighborhood)?,
        })
    }
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("email: {e}")))
}

fn validate_password(password: String) -> Result<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(password)
}

fn validate_addresses(addresses: Vec<AddressBody>) -> Result<Vec<AddressInput>> {
    addresses.into_iter().map(AddressBody::validate).collect()
}

impl CreateCustomerBody {
    fn validate(self) -> Result<NewCustomer> {
        Ok(NewCustomer {
            name: require_non_blank("name", self.name)?,
            email: parse_email(&self.email)?,
            password: validate_password(self.password)?,
            phone: self.phone.validate()?,
            addresses: validate_addresses(self.addresses)?,
        })
    }
}

impl ReplaceCustomerBody {
    fn validate(self) -> Result<CustomerUpdate> {
        Ok(CustomerUpdate {
            id: self.id,
            name: require_non_blank("name", self.name)?,
            email: parse_email(&self.email)?,
            password: validate_password(self.password)?,
            phone: self.phone.validate()?,
            addresses: self.addresses.map(validate_addresses).transpose()?,
        })
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PhoneResponse {
    pub id: PhoneId,
    pub number: String,
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: AddressId,
    pub number: String,
    pub street: String,
    pub neighborhood: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<PhoneResponse>,
    pub addresses: Vec<AddressResponse>,
}

impl From<Phone> for PhoneResponse {
    fn from(phone: Phone) -> Self {
        Self {
            id: phone.id,
            number: phone.number,
        }
    }
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            number: address.number,
            street: address.street,
            neighborhood: address.neighborhood,
        }
    }
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone.map(PhoneResponse::from),
            addresses: customer
                .addresses
                .into_iter()
                .map(AddressResponse::from)
                .collect(),
        }
    }
}

fn to_responses(customers: Vec<Customer>) -> Vec<CustomerResponse> {
    customers.into_iter().map(CustomerResponse::from).collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/customers?page&size
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<CustomerResponse>>> {
    let page = state.customers().list_all_paged(params.into()).await?;
    Ok(Json(page.map(CustomerResponse::from)))
}

/// GET /api/customers/all
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<CustomerResponse>>> {
    let customers = state.customers().list_all().await?;
    Ok(Json(to_responses(customers)))
}

/// GET /api/customers/find?name=
pub async fn find_by_name(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<Vec<CustomerResponse>>> {
    let customers = state.customers().find_by_name(&query.name).await?;
    Ok(Json(to_responses(customers)))
}

/// GET /api/customers/by-email?email=
pub async fn find_by_email(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<CustomerResponse>> {
    let email = parse_email(&query.email)?;
    let customer = state.customers().find_by_email(&email).await?;
    Ok(Json(customer.into()))
}

/// GET /api/customers/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<CustomerResponse>> {
    let customer = state.customers().find_by_id(id).await?;
    Ok(Json(customer.into()))
}

/// GET /api/customers/{id}/phone
pub async fn phone(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<PhoneResponse>> {
    let customer = state.customers().find_by_id(id).await?;
    let phone = customer
        .phone
        .ok_or_else(|| AppError::NotFound("customer has no phone".to_string()))?;
    Ok(Json(phone.into()))
}

/// GET /api/customers/{id}/addresses
pub async fn addresses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<Vec<AddressResponse>>> {
    let customer = state.customers().find_by_id(id).await?;
    Ok(Json(
        customer
            .addresses
            .into_iter()
            .map(AddressResponse::from)
            .collect(),
    ))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCustomerBody>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    let request = body.validate()?;
    let customer = state.customers().create(request).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// PUT /api/customers
pub async fn replace(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReplaceCustomerBody>,
) -> Result<StatusCode> {
    let update = body.validate()?;
    state.customers().replace(update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<StatusCode> {
    state.customers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
