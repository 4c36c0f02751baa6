pub mod asset;
pub mod policy;
pub mod profile;
pub mod report;
