use std::collections::HashSet;
use std::path::PathBuf;

/// One labeled image: path plus person and camera ids.
///
/// Ids are raw (dataset-local) when produced by a loader and dense global
/// labels after a composite merge; the type does not distinguish the two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub image_path: PathBuf,
    pub person_id: u32,
    pub camera_id: u32,
}

impl Sample {
    pub fn new(image_path: impl Into<PathBuf>, person_id: u32, camera_id: u32) -> Self {
        Self {
            image_path: image_path.into(),
            person_id,
            camera_id,
        }
    }

    /// Base filename, used as the mask-table key during augmentation.
    pub fn image_name(&self) -> Option<&str> {
        self.image_path.file_name().and_then(|n| n.to_str())
    }
}

/// The three partitions of a re-identification dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
    Train,
    Query,
    Gallery,
}

impl Partition {
    pub fn label(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Query => "query",
            Partition::Gallery => "gallery",
        }
    }
}

/// Derived per-partition summary: unique person ids, images, unique cameras.
///
/// Always recomputed from the sample list; never stored independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub num_pids: usize,
    pub num_samples: usize,
    pub num_cams: usize,
}

/// Compute `(num_pids, num_samples, num_cams)` for one partition list.
pub fn imagedata_info(samples: &[Sample]) -> PartitionStats {
    let mut pids = HashSet::new();
    let mut cams = HashSet::new();
    for sample in samples {
        pids.insert(sample.person_id);
        cams.insert(sample.camera_id);
    }
    PartitionStats {
        num_pids: pids.len(),
        num_samples: samples.len(),
        num_cams: cams.len(),
    }
}

/// Format the three-partition summary table logged after loading.
pub fn format_statistics(train: &[Sample], query: &[Sample], gallery: &[Sample]) -> String {
    let rows = [
        (Partition::Train, imagedata_info(train)),
        (Partition::Query, imagedata_info(query)),
        (Partition::Gallery, imagedata_info(gallery)),
    ];

    let mut lines = Vec::with_capacity(7);
    lines.push("  ----------------------------------------".to_string());
    lines.push("  subset   | # ids | # images | # cameras".to_string());
    lines.push("  ----------------------------------------".to_string());
    for (partition, stats) in rows {
        lines.push(format!(
            "  {:<8} | {:>5} | {:>8} | {:>9}",
            partition.label(),
            stats.num_pids,
            stats.num_samples,
            stats.num_cams
        ));
    }
    lines.push("  ----------------------------------------".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, camid: u32) -> Sample {
        Sample::new(format!("{pid}_{camid}.jpg"), pid, camid)
    }

    #[test]
    fn test_imagedata_info_empty() {
        let stats = imagedata_info(&[]);
        assert_eq!(stats, PartitionStats::default());
    }

    #[test]
    fn test_imagedata_info_counts_unique_ids() {
        let samples = vec![sample(1, 0), sample(1, 1), sample(2, 0)];
        let stats = imagedata_info(&samples);
        assert_eq!(stats.num_pids, 2);
        assert_eq!(stats.num_samples, 3);
        assert_eq!(stats.num_cams, 2);
    }

    #[test]
    fn test_imagedata_info_idempotent() {
        let samples = vec![sample(1, 0), sample(2, 1), sample(2, 2)];
        let first = imagedata_info(&samples);
        let second = imagedata_info(&samples);
        assert_eq!(first, second);
    }

    #[test]
    fn test_image_name_is_base_filename() {
        let s = Sample::new("/data/market1501/bounding_box_train/0001_c1.jpg", 1, 0);
        assert_eq!(s.image_name(), Some("0001_c1.jpg"));
    }

    #[test]
    fn test_format_statistics_contains_all_partitions() {
        let train = vec![sample(1, 0)];
        let query = vec![sample(2, 0), sample(3, 1)];
        let gallery = vec![sample(2, 1)];
        let table = format_statistics(&train, &query, &gallery);
        assert!(table.contains("train"));
        assert!(table.contains("query"));
        assert!(table.contains("gallery"));
        assert!(table.contains("# ids"));
    }

    #[test]
    fn test_format_statistics_row_values() {
        let query = vec![sample(2, 0), sample(3, 1)];
        let table = format_statistics(&[], &query, &[]);
        let query_row = table
            .lines()
            .find(|l| l.contains("query"))
            .expect("query row present");
        assert!(query_row.contains('2'));
    }

    #[test]
    fn test_partition_labels() {
        assert_eq!(Partition::Train.label(), "train");
        assert_eq!(Partition::Query.label(), "query");
        assert_eq!(Partition::Gallery.label(), "gallery");
    }
}
