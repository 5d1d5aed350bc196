//! URL validation and normalization.
//!
//! Input is parsed as a WHATWG URL. Anything that does not parse as an
//! absolute URL gets a second chance with `https://` in front of it, so bare
//! hosts such as `example.com` are accepted.

use crate::error::{Result, ShortenerError};
use crate::shortcode::LongUrl;
use url::Url;

/// Inputs shorter than this are rejected before parsing.
pub const MIN_LENGTH: usize = 3;
/// Inputs longer than this are rejected before parsing.
pub const MAX_LENGTH: usize = 2048;
/// Scheme assumed for inputs that carry none.
pub const INFERRED_SCHEME: &str = "https";

/// The outcome of a successful [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    long: LongUrl,
    scheme: String,
    scheme_inferred: bool,
}

impl NormalizedUrl {
    /// The canonical serialization, used as the long URL identity.
    pub fn long(&self) -> &LongUrl {
        &self.long
    }

    pub fn into_long(self) -> LongUrl {
        self.long
    }

    /// The scheme of the parsed URL.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether the scheme was [`INFERRED_SCHEME`] rather than part of the input.
    pub fn scheme_inferred(&self) -> bool {
        self.scheme_inferred
    }
}

/// Validates `raw` and returns its canonical form.
///
/// Length is counted in characters (Unicode scalar values) on the raw input,
/// not in UTF-16 code units. A character outside the Basic Multilingual Plane
/// counts once here where a UTF-16 length would count it twice, which matters
/// only right at the [`MIN_LENGTH`] and [`MAX_LENGTH`] bounds.
pub fn normalize(raw: &str) -> Result<NormalizedUrl> {
    let length = raw.chars().count();
    if length > MAX_LENGTH {
        return Err(ShortenerError::LinkTooLong {
            length,
            max: MAX_LENGTH,
        });
    }
    if length < MIN_LENGTH {
        return Err(ShortenerError::LinkTooShort {
            length,
            min: MIN_LENGTH,
        });
    }

    let (url, scheme_inferred) = match Url::parse(raw) {
        Ok(url) => (url, false),
        Err(absolute_err) => match Url::parse(&format!("{INFERRED_SCHEME}://{raw}")) {
            Ok(url) => (url, true),
            Err(_) => {
                return Err(ShortenerError::NotValidUrl(format!(
                    "{raw:?}: {absolute_err}"
                )))
            }
        },
    };

    Ok(NormalizedUrl {
        scheme: url.scheme().to_string(),
        long: LongUrl::from_canonical(String::from(url)),
        scheme_inferred,
    })
}
