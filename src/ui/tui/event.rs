use crate::sources::Fetched;
use crate::ui::preview::PreviewError;

/// Results flowing from background tasks back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A fetch finished; the data source decides whether it is still current
    Fetched(Fetched),
    /// A preview load finished for the frame generation it was started for
    PreviewLoaded {
        generation: u64,
        result: Result<String, PreviewError>,
    },
}
