pub mod user;

pub use user::{signin, signup};
