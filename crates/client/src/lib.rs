//! UniCart client - typed API client and client-side state mirrors.
//!
//! The mirrors ([`CartStore`], [`WishlistStore`], [`AuthStore`]) hold the
//! last-fetched authoritative collection plus loading/error flags. Every
//! mutation performs the request and then **re-fetches the full
//! collection** rather than patching locally; this trades bandwidth for
//! the guarantee that local state never diverges from server state due to
//! a missed partial update. A failed request surfaces a typed error and
//! leaves local state untouched.
//!
//! The stores are plain state containers passed explicitly alongside an
//! [`ApiClient`]; nothing here is a global singleton.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod types;
pub mod wishlist;

pub use api::{ApiClient, ClientError};
pub use auth::AuthStore;
pub use cart::CartStore;
pub use wishlist::WishlistStore;
