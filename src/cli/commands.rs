use clap::Subcommand;

use super::extract::ExtractArgs;
use super::generate::GenerateArgs;
use super::resolve::ResolveArgs;
use super::serve::ServeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the HTTP service and web page
    Serve(ServeArgs),

    /// Generate one learning path and print it as JSON
    Generate(GenerateArgs),

    /// Look up a single resource through the search backend
    Resolve(ResolveArgs),

    /// Extract the structured document from saved model output
    Extract(ExtractArgs),
}
