//! Application-wide constants.

/// Content types accepted by the upload intake.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "video/mp4"];

/// Default number of records the gallery keeps in memory.
pub const DEFAULT_GALLERY_CAPACITY: usize = 100;

/// Logical folder uploads are placed in on the hosting service.
pub const DEFAULT_UPLOAD_FOLDER: &str = "personal_gallery";

/// Multipart field name carrying the uploaded files.
pub const UPLOAD_FIELD_NAME: &str = "media";

/// Default hosting API endpoint (Cloudinary REST API).
pub const DEFAULT_HOSTING_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
