/// Graph snapshot adapter: resolution results exported by the build tool
mod model;
mod snapshot_resolver;

pub use snapshot_resolver::GraphSnapshotResolver;
