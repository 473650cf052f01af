use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
use crate::ports::outbound::OutputPresenter;
use std::path::PathBuf;

/// Where a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterType {
    Stdout,
    File(PathBuf),
}

impl PresenterType {
    /// Stdout unless an output file was requested
    pub fn for_output(output: Option<PathBuf>) -> Self {
        output.map_or(PresenterType::Stdout, PresenterType::File)
    }
}

/// Factory for creating output presenters
pub struct PresenterFactory;

impl PresenterFactory {
    /// Creates a presenter instance for the specified type
    ///
    /// # Examples
    /// ```
    /// use dependency_versions_check::application::factories::{PresenterFactory, PresenterType};
    ///
    /// let presenter = PresenterFactory::create(PresenterType::Stdout);
    /// ```
    pub fn create(presenter_type: PresenterType) -> Box<dyn OutputPresenter> {
        match presenter_type {
            PresenterType::Stdout => Box::new(StdoutPresenter::new()),
            PresenterType::File(path) => Box::new(FileSystemWriter::new(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_for_output() {
        assert_eq!(PresenterType::for_output(None), PresenterType::Stdout);
        assert_eq!(
            PresenterType::for_output(Some(PathBuf::from("report.json"))),
            PresenterType::File(PathBuf::from("report.json"))
        );
    }

    #[test]
    fn test_file_presenter_writes_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dvc-report.txt");

        PresenterFactory::create(PresenterType::File(path.clone()))
            .present("Checking all dependencies for 'test' scope")
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Checking all dependencies for 'test' scope"
        );
    }

    #[test]
    fn test_stdout_presenter() {
        let presenter = PresenterFactory::create(PresenterType::Stdout);
        assert!(presenter.present("").is_ok());
    }
}
