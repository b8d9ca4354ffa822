pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod extract;
pub mod generate;
pub mod resolve;
pub mod runtime;
pub mod serve;

pub use extract::{cmd_extract, ExtractArgs};
pub use generate::{cmd_generate, GenerateArgs};
pub use resolve::{cmd_resolve, ResolveArgs};
pub use serve::{cmd_serve, ServeArgs};
