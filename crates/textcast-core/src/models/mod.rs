pub mod outcome;
pub mod record;
pub mod request;

pub use outcome::{
    ExtendedUploadOutcome, SimpleUploadOutcome, NO_FILE_SELECTED, UPLOAD_ERROR,
    UPLOAD_SUCCESSFUL,
};
pub use record::{AssetKind, ExtendedUploadRecord, UploadRecord};
pub use request::{DeleteSubuploadRequest, DeleteUploadRequest, MessageResponse};
