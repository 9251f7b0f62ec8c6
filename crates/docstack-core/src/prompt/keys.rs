//! Stable prompt keys, usable in the `[answers]` table of docstack.toml.

pub const DATABASE_INSTALL_LOCAL: &str = "database.install_local";
pub const DATABASE_HOST: &str = "database.host";
pub const DATABASE_PORT: &str = "database.port";
pub const DATABASE_NAME: &str = "database.name";
pub const DATABASE_USER: &str = "database.user";
pub const DATABASE_PASSWORD: &str = "database.password";
pub const DATABASE_REMOTE_READY: &str = "database.remote_ready";

pub const OCR_ADD_LANGUAGES: &str = "ocr.add_languages";
pub const OCR_LANGUAGES: &str = "ocr.languages";

pub const CONFIG_TIME_ZONE: &str = "config.time_zone";
pub const CONFIG_URL: &str = "config.url";

pub const FEATURE_RECURSIVE: &str = "features.recursive";
pub const FEATURE_SUBDIRS_AS_TAGS: &str = "features.subdirs_as_tags";
pub const FEATURE_DELETE_DUPLICATES: &str = "features.delete_duplicates";
pub const FEATURE_BARCODES: &str = "features.barcodes";

pub const ADMIN_USERNAME: &str = "admin.username";
pub const ADMIN_PASSWORD: &str = "admin.password";

pub const ADMINER_INSTALL: &str = "adminer.install";

pub const SERVICES_START: &str = "services.start";

/// Every key, in the order the pipeline may ask them.
pub const ALL: &[&str] = &[
    DATABASE_INSTALL_LOCAL,
    OCR_ADD_LANGUAGES,
    OCR_LANGUAGES,
    DATABASE_HOST,
    DATABASE_PORT,
    DATABASE_NAME,
    DATABASE_USER,
    DATABASE_PASSWORD,
    CONFIG_TIME_ZONE,
    CONFIG_URL,
    FEATURE_RECURSIVE,
    FEATURE_SUBDIRS_AS_TAGS,
    FEATURE_DELETE_DUPLICATES,
    FEATURE_BARCODES,
    DATABASE_REMOTE_READY,
    ADMIN_USERNAME,
    ADMIN_PASSWORD,
    ADMINER_INSTALL,
    SERVICES_START,
];
