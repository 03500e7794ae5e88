//! Constants used throughout the HealthRecs core crate.
//!
//! Endpoint paths, defaults and the local-store layout live here so the
//! client crate and the workflows agree on them.

/// Default origin of the records service.
pub const DEFAULT_RECORDS_URL: &str = "https://health-link-backend.vercel.app";

/// Default origin of the image data-extraction service.
pub const DEFAULT_EXTRACT_URL: &str = "https://cep-backend.onrender.com";

/// Default directory holding the persisted local store.
pub const DEFAULT_STATE_DIR: &str = ".healthrecs";

/// Simulated latency applied to demo logins, in milliseconds.
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

/// Number of patients shown in the dashboard's recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Path listing every patient record.
pub const RECORDS_PATH: &str = "records";

/// Path prefix for a single record lookup (`/record/{regNo}`).
pub const RECORD_PATH: &str = "record";

/// Path creating a patient record.
pub const NEW_RECORD_PATH: &str = "newRecord";

/// Path suffix appending a visit (`/{regNo}/visits`).
pub const VISITS_PATH: &str = "visits";

/// Path of the image extraction endpoint.
pub const EXTRACT_PATH: &str = "extract-data";

/// Multipart field carrying the uploaded image.
pub const EXTRACT_IMAGE_FIELD: &str = "image";

/// Filename of the JSON key/value local store inside the state directory.
pub const LOCAL_STORE_FILENAME: &str = "local_storage.json";

/// Local-store key of the persisted theme.
pub const THEME_KEY: &str = "theme";
