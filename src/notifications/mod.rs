//! Outbound notification delivery.
//!
//! A thin pass-through to a transactional email provider. Delivery never
//! raises: every outcome, including a missing API key, is reported as a
//! [`DeliveryOutcome`].

pub mod email;

pub use email::{DeliveryOutcome, EmailClient, EmailMessage};
