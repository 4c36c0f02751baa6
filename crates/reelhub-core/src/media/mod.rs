//! Media asset module.
//!
//! # Module Structure
//!
//! - `model`: Asset kinds, upload files and storage path naming
//! - `codec`: Storage path ⇄ public URL mapping
//! - `progress`: Upload progress tracking
//! - `store`: Object store trait

mod codec;
mod model;
mod progress;
mod store;

pub use codec::{PublicUrlCodec, is_well_formed_path};
pub use model::{
    AssetKind, ReplacedAsset, UploadFile, is_owned_by, sanitize_file_name, sanitize_owner_id,
    storage_path,
};
pub use progress::{UploadProgress, percent_of};
pub use store::ObjectStore;
