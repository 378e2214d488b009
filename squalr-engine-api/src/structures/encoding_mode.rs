use serde::{Deserialize, Serialize};

/// Text encoding used by the `String` scan type. Threaded explicitly through
/// the codec rather than held as global state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum EncodingMode {
    #[default]
    Utf8,
    Latin1,
}
