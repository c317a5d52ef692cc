use crate::shared::sample::{imagedata_info, Partition, PartitionStats, Sample};

/// Domain interface for one loaded re-identification dataset.
///
/// Implementations materialize all three partitions up front; the lists are
/// read-only after construction. `source_identity` is the stable key (the
/// dataset's root directory) that disambiguates raw ids across datasets
/// during a composite merge.
pub trait ImageDataset {
    fn source_identity(&self) -> &str;

    fn train(&self) -> &[Sample];

    fn query(&self) -> &[Sample];

    fn gallery(&self) -> &[Sample];

    /// Summary statistics for one partition, recomputed on every call.
    fn statistics(&self, partition: Partition) -> PartitionStats {
        let samples = match partition {
            Partition::Train => self.train(),
            Partition::Query => self.query(),
            Partition::Gallery => self.gallery(),
        };
        imagedata_info(samples)
    }
}
