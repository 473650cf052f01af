use crate::shared::Result;
use crate::version_check::domain::{Project, ProjectKey};
use std::sync::Arc;

/// ProjectReader port for loading the project under check
///
/// This port abstracts where the root project model and the reactor
/// (the set of projects built together with it) come from.
pub trait ProjectReader {
    /// Reads the root project
    ///
    /// # Errors
    /// Returns an error if the project model is missing or malformed
    fn read_project(&self) -> Result<Project>;

    /// Reads the keys of all projects in the current reactor
    ///
    /// # Returns
    /// Group, artifact and version of each reactor project; the root project
    /// is usually among them
    ///
    /// # Errors
    /// Returns an error if the reactor description is malformed
    fn read_reactor_projects(&self) -> Result<Vec<ProjectKey>>;
}

/// Lets one adapter serve as both resolver and project reader.
impl<T: ProjectReader + ?Sized> ProjectReader for Arc<T> {
    fn read_project(&self) -> Result<Project> {
        (**self).read_project()
    }

    fn read_reactor_projects(&self) -> Result<Vec<ProjectKey>> {
        (**self).read_reactor_projects()
    }
}
