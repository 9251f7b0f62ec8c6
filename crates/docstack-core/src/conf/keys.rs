//! Recognized `paperless.conf` keys and their sentinel defaults.
//!
//! The sentinel is the commented-out default line shipped in the upstream
//! template, e.g. `#PAPERLESS_DBHOST=localhost`. Upstream renaming a key or
//! changing its default makes activation a silent no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfKey {
    Redis,
    DbHost,
    DbPort,
    DbName,
    DbUser,
    DbPass,
    ConsumptionDir,
    DataDir,
    MediaRoot,
    StaticDir,
    SecretKey,
    Url,
    OcrLanguage,
    TimeZone,
    ConsumerRecursive,
    ConsumerSubdirsAsTags,
    ConsumerDeleteDuplicates,
    ConsumerEnableBarcodes,
}

impl ConfKey {
    pub const ALL: [ConfKey; 18] = [
        ConfKey::Redis,
        ConfKey::DbHost,
        ConfKey::DbPort,
        ConfKey::DbName,
        ConfKey::DbUser,
        ConfKey::DbPass,
        ConfKey::ConsumptionDir,
        ConfKey::DataDir,
        ConfKey::MediaRoot,
        ConfKey::StaticDir,
        ConfKey::SecretKey,
        ConfKey::Url,
        ConfKey::OcrLanguage,
        ConfKey::TimeZone,
        ConfKey::ConsumerRecursive,
        ConfKey::ConsumerSubdirsAsTags,
        ConfKey::ConsumerDeleteDuplicates,
        ConfKey::ConsumerEnableBarcodes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfKey::Redis => "PAPERLESS_REDIS",
            ConfKey::DbHost => "PAPERLESS_DBHOST",
            ConfKey::DbPort => "PAPERLESS_DBPORT",
            ConfKey::DbName => "PAPERLESS_DBNAME",
            ConfKey::DbUser => "PAPERLESS_DBUSER",
            ConfKey::DbPass => "PAPERLESS_DBPASS",
            ConfKey::ConsumptionDir => "PAPERLESS_CONSUMPTION_DIR",
            ConfKey::DataDir => "PAPERLESS_DATA_DIR",
            ConfKey::MediaRoot => "PAPERLESS_MEDIA_ROOT",
            ConfKey::StaticDir => "PAPERLESS_STATICDIR",
            ConfKey::SecretKey => "PAPERLESS_SECRET_KEY",
            ConfKey::Url => "PAPERLESS_URL",
            ConfKey::OcrLanguage => "PAPERLESS_OCR_LANGUAGE",
            ConfKey::TimeZone => "PAPERLESS_TIME_ZONE",
            ConfKey::ConsumerRecursive => "PAPERLESS_CONSUMER_RECURSIVE",
            ConfKey::ConsumerSubdirsAsTags => "PAPERLESS_CONSUMER_SUBDIRS_AS_TAGS",
            ConfKey::ConsumerDeleteDuplicates => "PAPERLESS_CONSUMER_DELETE_DUPLICATES",
            ConfKey::ConsumerEnableBarcodes => "PAPERLESS_CONSUMER_ENABLE_BARCODES",
        }
    }

    pub fn sentinel_default(self) -> &'static str {
        match self {
            ConfKey::Redis => "redis://localhost:6379",
            ConfKey::DbHost => "localhost",
            ConfKey::DbPort => "5432",
            ConfKey::DbName | ConfKey::DbUser | ConfKey::DbPass => "paperless",
            ConfKey::ConsumptionDir => "../consume",
            ConfKey::DataDir => "../data",
            ConfKey::MediaRoot => "../media",
            ConfKey::StaticDir => "../static",
            ConfKey::SecretKey => "change-me",
            ConfKey::Url => "https://example.com",
            ConfKey::OcrLanguage => "eng",
            ConfKey::TimeZone => "UTC",
            ConfKey::ConsumerRecursive
            | ConfKey::ConsumerSubdirsAsTags
            | ConfKey::ConsumerDeleteDuplicates
            | ConfKey::ConsumerEnableBarcodes => "false",
        }
    }

    /// The commented-out template line, e.g. `#PAPERLESS_DBPORT=5432`.
    pub fn sentinel_line(self) -> String {
        format!("#{}={}", self.name(), self.sentinel_default())
    }
}
