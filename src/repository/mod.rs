pub mod idempotency;
pub mod outbox;
pub mod payments;

pub use idempotency::IdempotencyRecord;
pub use outbox::OutboxEvent;
pub use payments::{CreatePaymentInput, Payment};
