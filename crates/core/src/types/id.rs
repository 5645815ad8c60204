//! Newtype IDs for entity keys.
//!
//! Catalog rows get serial `i32` keys from the database, while the customer
//! aggregate mints its own UUIDs before anything is written. Each key type is
//! distinct, so a `PhoneId` can never be passed where a `CustomerId` is
//! expected.

/// Define a key newtype over a backing type (`i32` or `::uuid::Uuid`).
///
/// The generated type is `Copy`, serializes as its inner value, parses from
/// a string, converts to and from the inner type, and (with the `postgres`
/// feature) binds and decodes like the inner type. Passing `uuid` as a
/// third argument adds a `generate()` constructor.
///
/// ```rust
/// # use sushi_core::define_id;
/// define_id!(TableId, i32);
/// define_id!(ReservationId, ::uuid::Uuid, uuid);
///
/// let table = TableId::new(4);
/// assert_eq!(table.get(), 4);
/// assert_ne!(ReservationId::generate(), ReservationId::generate());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $inner:ty, uuid) => {
        $crate::define_id!($name, $inner);

        impl $name {
            /// A fresh random (v4) key.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// The raw key.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = <$inner as ::core::str::FromStr>::Err;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<$inner>().map(Self)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <$inner as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <$inner as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <$inner as ::sqlx::Decode<'r, ::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <$inner as ::sqlx::Encode<'_, ::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(CategoryId, i32);
define_id!(ProductId, i32);

define_id!(CustomerId, ::uuid::Uuid, uuid);
define_id!(PhoneId, ::uuid::Uuid, uuid);
define_id!(AddressId, ::uuid::Uuid, uuid);
