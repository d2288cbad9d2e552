use std::path::Path;

use storage::repository::Storage;

use crate::dataset::Dataset;
use crate::error::AppServicesError;

/// Everything a binary needs to run a review: the durable store and the
/// loaded dataset.
pub struct AppServices {
    pub storage: Storage,
    pub dataset: Dataset,
}

impl AppServices {
    /// Open + migrate the `SQLite` store and load the dataset.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the store cannot be opened or the
    /// dataset is missing, malformed, or empty.
    pub async fn init(
        db_url: &str,
        dataset_path: impl AsRef<Path>,
    ) -> Result<Self, AppServicesError> {
        let dataset = Dataset::load_json(dataset_path)?;
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self { storage, dataset })
    }
}
