pub mod docgen;
pub mod gcloud_storage;
pub mod sendgrid_ops;
