/// Use cases module containing application business logic orchestration
mod check_versions;

pub use check_versions::CheckVersionsUseCase;
