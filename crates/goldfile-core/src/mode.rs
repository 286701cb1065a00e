use std::env;

use serde::{Deserialize, Serialize};

/// Environment variable that switches comparisons into update mode.
pub const UPDATE_ENV: &str = "GOLDFILE_UPDATE";

/// Whether gold files are rewritten from actual output before comparing.
///
/// Parsed once by the embedding application and handed to
/// [`Gold`](crate::gold::Gold); comparisons never re-read arguments or the
/// environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Verify,
    Update,
}

impl UpdateMode {
    #[must_use]
    pub fn from_flag(update: bool) -> Self {
        if update { Self::Update } else { Self::Verify }
    }

    #[must_use]
    pub fn is_update(self) -> bool {
        self == Self::Update
    }

    /// Scans arguments for `-update` / `--update`, optionally with `=<bool>`.
    /// The last occurrence wins; unrelated arguments are ignored.
    #[must_use]
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mode = Self::Verify;
        for arg in args {
            let arg = arg.as_ref();
            let Some(flag) = arg
                .strip_prefix("--")
                .or_else(|| arg.strip_prefix('-'))
            else {
                continue;
            };

            match flag.split_once('=') {
                None if flag == "update" => mode = Self::Update,
                Some(("update", value)) => {
                    if let Some(update) = parse_bool(value) {
                        mode = Self::from_flag(update);
                    }
                }
                _ => {}
            }
        }
        mode
    }

    /// Reads [`UPDATE_ENV`]; unset or unrecognised values mean [`UpdateMode::Verify`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::env_override().unwrap_or_default()
    }

    /// The mode [`UPDATE_ENV`] asks for, if it is set to a recognised value.
    #[must_use]
    pub fn env_override() -> Option<Self> {
        Self::from_env_value(env::var(UPDATE_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Option<Self> {
        value.and_then(parse_bool).map(Self::from_flag)
    }

    /// Update mode if either the process arguments or the environment ask for it.
    #[must_use]
    pub fn detect() -> Self {
        Self::combine(Self::from_args(env::args().skip(1)), Self::env_override())
    }

    fn combine(from_args: Self, from_env: Option<Self>) -> Self {
        if from_args.is_update() {
            Self::Update
        } else {
            from_env.unwrap_or_default()
        }
    }
}

/// Empty values count as unset.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "off" => Some(false),
        _ => None,
    }
}
