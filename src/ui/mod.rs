pub mod progress;
pub mod reporter;

pub use progress::{create_spinner, with_spinner};
pub use reporter::Reporter;
