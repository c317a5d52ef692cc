pub mod augment_dataset_use_case;
pub mod infrastructure;
pub mod pipeline_executor;
