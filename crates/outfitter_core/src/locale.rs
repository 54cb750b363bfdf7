/// String lookup capability provided by the host environment.
///
/// Must never fail: an unknown key is returned as-is so the UI always has
/// something to show.
pub trait Localize: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Table-backed localizer with the built-in English strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticLocalizer;

const STRINGS: &[(&str, &str)] = &[
    ("progress.checking", "Checking availability"),
    ("progress.checking_availability", "Checking availability"),
    ("progress.queued", "Queued"),
    ("progress.downloading", "Downloading"),
    ("progress.processing", "Processing download"),
    ("progress.extracting", "Extracting files"),
    ("progress.installing", "Installing"),
    ("progress.working", "In progress"),
    ("progress.done", "Added successfully"),
    ("progress.failed", "Failed"),
    ("flow.title", "Adding content"),
    ("flow.starting", "Starting"),
    ("flow.start_failed", "Could not start the download"),
    ("credential.required", "A valid credential is required"),
    ("credential.empty", "Enter a credential"),
    ("credential.bad_prefix", "That does not look like a valid credential"),
    ("credential.rejected", "The credential was rejected"),
];

impl Localize for StaticLocalizer {
    fn translate(&self, key: &str) -> String {
        STRINGS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, text)| (*text).to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
