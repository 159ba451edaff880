//! Progress rate-limiting for transfer events.

mod throttle;

pub use throttle::ProgressThrottle;
