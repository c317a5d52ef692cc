use crate::datasets::domain::image_dataset::ImageDataset;
use crate::datasets::domain::label_unifier::LabelUnifier;
use crate::shared::sample::{format_statistics, Sample};

/// Which test list a pooled sample came from, carried through the merge so
/// the unified query+gallery sequence can be split back without relying on
/// positional slicing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TestOrigin {
    Query,
    Gallery,
}

/// Several datasets merged into one label space per partition group.
///
/// Train labels come from one unification pass over all train lists; query
/// and gallery share a second, independent pass (retrieval evaluation
/// compares identities across the two test lists, so they must agree on
/// labels, while train labels are unrelated to both). Sample order is the
/// concatenation order of the input datasets.
#[derive(Debug)]
pub struct CompositeDataset {
    train: Vec<Sample>,
    query: Vec<Sample>,
    gallery: Vec<Sample>,
}

impl CompositeDataset {
    /// Merge `datasets` into a single dataset view.
    ///
    /// An empty slice yields empty partitions and all-zero statistics.
    pub fn build(datasets: &[Box<dyn ImageDataset>]) -> Self {
        let train = Self::merge_train(datasets);
        let (query, gallery) = Self::merge_test(datasets);

        let composite = Self {
            train,
            query,
            gallery,
        };
        log::info!(
            "=> Composite dataset loaded ({} sources)\n{}",
            datasets.len(),
            format_statistics(&composite.train, &composite.query, &composite.gallery)
        );
        composite
    }

    fn merge_train(datasets: &[Box<dyn ImageDataset>]) -> Vec<Sample> {
        let mut unifier = LabelUnifier::new();
        let mut train = Vec::new();
        for dataset in datasets {
            let source = unifier.source(dataset.source_identity());
            for sample in dataset.train() {
                train.push(unifier.relabel(source, sample));
            }
        }
        train
    }

    /// Pool query and gallery into one tagged sequence, unify, then split
    /// the relabeled samples back by their origin tag.
    fn merge_test(datasets: &[Box<dyn ImageDataset>]) -> (Vec<Sample>, Vec<Sample>) {
        let mut unifier = LabelUnifier::new();
        let mut pooled: Vec<(TestOrigin, Sample)> = Vec::new();
        for dataset in datasets {
            let source = unifier.source(dataset.source_identity());
            for sample in dataset.query() {
                pooled.push((TestOrigin::Query, unifier.relabel(source, sample)));
            }
            for sample in dataset.gallery() {
                pooled.push((TestOrigin::Gallery, unifier.relabel(source, sample)));
            }
        }

        let mut query = Vec::new();
        let mut gallery = Vec::new();
        for (origin, sample) in pooled {
            match origin {
                TestOrigin::Query => query.push(sample),
                TestOrigin::Gallery => gallery.push(sample),
            }
        }
        (query, gallery)
    }
}

impl ImageDataset for CompositeDataset {
    fn source_identity(&self) -> &str {
        "composite"
    }

    fn train(&self) -> &[Sample] {
        &self.train
    }

    fn query(&self) -> &[Sample] {
        &self.query
    }

    fn gallery(&self) -> &[Sample] {
        &self.gallery
    }
}
