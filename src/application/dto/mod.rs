/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod check_request;
mod check_response;
mod output_format;

pub use check_request::{
    CheckRequest, CheckRequestBuilder, ExclusionSpec, ReportMode, ResolverSpec, VALID_SCOPES,
};
pub use check_response::CheckResponse;
pub use output_format::OutputFormat;
