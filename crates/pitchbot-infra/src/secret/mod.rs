//! Credential sources.

pub mod env;

pub use env::{EnvCredentialSource, load_dotenv};
