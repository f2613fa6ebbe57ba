//! Payment provider abstraction and the Stripe REST implementation.
//!
//! The API crate only talks to [`PaymentProvider`]; [`StripeClient`] is the
//! production implementation and tests substitute an in-memory fake.

pub mod provider;
pub mod stripe;

pub use provider::{
    BillingError, CheckoutRequest, CheckoutSession, Customer, PaymentIntent, PaymentProvider,
    Subscription, METADATA_ACCOUNT_ID, METADATA_PLAN,
};
pub use stripe::{StripeClient, StripeConfig};
