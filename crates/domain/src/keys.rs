//! Well-known cloud endpoints, device-record keys and store keys.

/// Device list endpoint.
pub const DEVICES_URL: &str = "https://my.arlo.com/hmsweb/users/devices";

/// Automation definitions endpoint (base-station mode lists).
pub const DEFINITIONS_URL: &str = "https://my.arlo.com/hmsweb/users/automation/definitions";

/// Store namespace for integration-wide attributes.
pub const ARLO_NAMESPACE: &str = "ARLO";

/// Number of cameras discovered at startup (under [`ARLO_NAMESPACE`]).
pub const TOTAL_CAMERAS_KEY: &str = "totalCameras";

/// Number of doorbells discovered at startup (under [`ARLO_NAMESPACE`]).
pub const TOTAL_BELLS_KEY: &str = "totalDoorbells";

/// Number of recordings a camera captured since local midnight.
pub const CAPTURED_TODAY_KEY: &str = "capturedToday";

/// Arlo time of the newest recording of a camera.
pub const LAST_CAPTURE_KEY: &str = "lastCapture";

/// Device state value meaning "registered and usable".
pub const PROVISIONED: &str = "provisioned";

// Raw device-record keys.
pub const DEVICE_ID_KEY: &str = "deviceId";
pub const DEVICE_NAME_KEY: &str = "deviceName";
pub const DEVICE_TYPE_KEY: &str = "deviceType";
pub const MODEL_ID_KEY: &str = "modelId";
pub const PARENT_ID_KEY: &str = "parentId";
pub const STATE_KEY: &str = "state";
pub const UNIQUE_ID_KEY: &str = "uniqueId";
pub const XCLOUD_ID_KEY: &str = "xCloudId";
pub const LAST_IMAGE_URL_KEY: &str = "presignedLastImageUrl";

/// Keys copied from every raw device record into the store.
pub const DEVICE_KEYS: &[&str] = &[
    DEVICE_ID_KEY,
    DEVICE_NAME_KEY,
    DEVICE_TYPE_KEY,
    "firmwareVersion",
    "hwVersion",
    "lastImageUploaded",
    "lastModified",
    "mediaObjectCount",
    MODEL_ID_KEY,
    PARENT_ID_KEY,
    LAST_IMAGE_URL_KEY,
    "presignedFullFrameSnapshotUrl",
    "presignedSnapshotUrl",
    STATE_KEY,
    UNIQUE_ID_KEY,
    "userId",
    "userRole",
    XCLOUD_ID_KEY,
];

/// Base64 of the image shown while a camera has no thumbnail yet (1x1 PNG).
pub const BLANK_IMAGE: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
