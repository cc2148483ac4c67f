use std::path::Path;

pub(crate) mod command;

/// Collaborator that may produce a background PNG for a theme.
///
/// Implementations report success only when a usable PNG now exists at
/// `output`; on `false` callers must not read `output`.
pub trait BackgroundFetcher: Send + Sync {
    fn fetch_background(&self, theme: &str, output: &Path) -> bool;
}

impl<F> BackgroundFetcher for F
where
    F: Fn(&str, &Path) -> bool + Send + Sync,
{
    fn fetch_background(&self, theme: &str, output: &Path) -> bool {
        self(theme, output)
    }
}

/// Never fetches; every template falls back to the procedural background.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFetch;

impl BackgroundFetcher for NoFetch {
    fn fetch_background(&self, theme: &str, _output: &Path) -> bool {
        tracing::debug!(theme, "background fetching disabled");
        false
    }
}
