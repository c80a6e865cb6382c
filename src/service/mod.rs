pub mod capture;
pub mod fee_calculator;
pub mod idempotency;
pub mod rates;
pub mod split_calculator;
pub mod validator;

pub use capture::{CaptureCoordinator, CaptureResponse};
pub use fee_calculator::FeeCalculator;
pub use rates::PlatformRates;
