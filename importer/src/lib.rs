pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod record;
pub mod reshape;
pub mod writer;

pub use cli::Cli;
pub use config::{Config, Credentials, Protocol, V2AuthRule};
pub use error::{Error, ErrorKind, ParseError, Result};
pub use pipeline::{run, Report};
pub use record::Record;
pub use writer::{V1Writer, V2Writer, Writer};
