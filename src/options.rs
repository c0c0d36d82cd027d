//! # options.rs
//!
//! Configuration of a template set.
//!
//! Options are plain fields with defaults, and can also be applied from
//! `key=value` strings, which is convenient when they come from a config
//! file or a command line.

use crate::error::OptionError;

/// What a field lookup does when the map has no such key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingKey {
    /// Yield `Nil`, which prints as `<no value>`.
    #[default]
    Default,
    /// Fail the execution.
    Error,
}

/// Settings for parsing and executing the templates of one set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub left_delim: String,
    pub right_delim: String,
    pub missing_key: MissingKey,
    /// Accept calls to names that do not resolve at parse time.
    pub skip_func_check: bool,
    /// Log a warning when a registration replaces an existing function.
    pub warn_on_overwrite: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            left_delim: "{{".to_string(),
            right_delim: "}}".to_string(),
            missing_key: MissingKey::Default,
            skip_func_check: false,
            warn_on_overwrite: false,
        }
    }
}

impl Options {
    /// Applies one `key=value` option.
    ///
    /// Recognized options:
    /// - `missingkey=default`, `missingkey=zero`, `missingkey=invalid`,
    ///   `missingkey=error`
    /// - `funccheck=strict`, `funccheck=skip`
    /// - `overwrite=silent`, `overwrite=warn`
    ///
    /// # Examples
    ///
    /// ```
    /// use tmplfunc::{MissingKey, Options};
    ///
    /// let mut options = Options::default();
    /// options.apply("missingkey=error").unwrap();
    /// assert_eq!(options.missing_key, MissingKey::Error);
    /// assert!(options.apply("colour=blue").is_err());
    /// ```
    pub fn apply(&mut self, option: &str) -> Result<(), OptionError>
    {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| OptionError::Unknown(option.to_string()))?;
        let bad_value = || OptionError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key.trim() {
            "missingkey" => {
                self.missing_key = match value.trim() {
                    "default" | "zero" | "invalid" => MissingKey::Default,
                    "error" => MissingKey::Error,
                    _ => return Err(bad_value()),
                };
            },
            "funccheck" => {
                self.skip_func_check = match value.trim() {
                    "strict" => false,
                    "skip" => true,
                    _ => return Err(bad_value()),
                };
            },
            "overwrite" => {
                self.warn_on_overwrite = match value.trim() {
                    "silent" => false,
                    "warn" => true,
                    _ => return Err(bad_value()),
                };
            },
            _ => return Err(OptionError::Unknown(option.to_string())),
        }
        Ok(())
    }

    /// Applies every option in order, stopping at the first failure.
    pub fn apply_all<I, S>(&mut self, options: I) -> Result<(), OptionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for option in options {
            self.apply(option.as_ref())?;
        }
        Ok(())
    }
}
