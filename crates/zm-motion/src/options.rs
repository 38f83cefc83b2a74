//! Motion options: the `:set` layer.
//!
//! Arguments parse into [`SetDirective`]s exactly like Vim's `:set`, and
//! [`MotionOptions::apply`] interprets them.
//!
//! | Syntax          | Effect                        |
//! |-----------------|-------------------------------|
//! | `option`        | Enable boolean / show numeric |
//! | `nooption`      | Disable boolean               |
//! | `option!`       | Toggle boolean                |
//! | `option?`       | Query current value           |
//! | `option=N`      | Assign numeric value          |
//! | (empty)         | Show changed options          |
//! | `all`           | Show all options              |
//!
//! | Full name      | Abbrev | Type    | Default | Effect                                   |
//! |----------------|--------|---------|---------|------------------------------------------|
//! | `virtualedit`  | `ve`   | bool    | false   | keep one-past-end destinations           |
//! | `previewlimit` | `pvl`  | integer | 0       | preview length, 0 = rest of current line |
//! | `cachesize`    | `cs`   | integer | 4096    | segmentation cache lines, 0 = unbounded  |
//! | `unknownfreq`  | `uf`   | integer | 1       | frequency of chars not in the dictionary |

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option`: switch a boolean on.
    On(String),
    /// `nooption`: switch a boolean off.
    Off(String),
    /// `option!`: flip a boolean.
    Toggle(String),
    /// `option?`, or a bare numeric name: echo the value.
    Query(String),
    /// `option=value`.
    Assign(String, String),
    /// Empty argument list: echo options that differ from the defaults.
    ShowChanged,
    /// `all`: echo every option.
    ShowAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// No option has this name or abbreviation.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// Boolean syntax on a numeric option.
    #[error("invalid argument: {0} (not a boolean option)")]
    NotBoolean(String),

    /// Assignment to a boolean option.
    #[error("invalid argument: {0} (number required)")]
    NotNumeric(String),

    /// The assigned value is not a number that fits the option.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Full option name for a full name or abbreviation.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "virtualedit" | "ve" => Some("virtualedit"),
        "previewlimit" | "pvl" => Some("previewlimit"),
        "cachesize" | "cs" => Some("cachesize"),
        "unknownfreq" | "uf" => Some("unknownfreq"),
        _ => None,
    }
}

#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    canonical_name(name) == Some("virtualedit")
}

#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    canonical_name(name).is_some() && !is_bool_option(name)
}

/// Parse `:set` arguments. Empty input shows the changed options.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    match arg.char_indices().last() {
        Some((i, '?')) => SetDirective::Query(arg[..i].to_string()),
        Some((i, '!')) => SetDirective::Toggle(arg[..i].to_string()),
        // `no` only negates a known boolean.
        _ => match arg.strip_prefix("no").filter(|name| is_bool_option(name)) {
            Some(name) => SetDirective::Off(name.to_string()),
            None if is_numeric_option(arg) => SetDirective::Query(arg.to_string()),
            None => SetDirective::On(arg.to_string()),
        },
    }
}

#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// MotionOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionOptions {
    pub virtualedit: bool,
    pub preview_limit: usize,
    pub cache_size: usize,
    pub unknown_freq: u64,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            virtualedit: false,
            preview_limit: 0,
            cache_size: 4096,
            unknown_freq: 1,
        }
    }
}

impl MotionOptions {
    /// Apply a whole `:set` argument string in order, collecting what the
    /// queries and listings echo.
    ///
    /// # Errors
    ///
    /// The first directive that fails to apply. Earlier ones stay applied.
    pub fn apply_set(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut echoed = Vec::new();
        for directive in parse_set(args) {
            echoed.extend(self.apply(&directive)?);
        }
        Ok(echoed)
    }

    /// Apply one directive. Queries and show requests return the text Vim
    /// would echo; assignments return `None`.
    ///
    /// # Errors
    ///
    /// Unknown names, boolean syntax on a numeric option and vice versa, and
    /// values that do not parse.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => {
                self.set_bool(name, |_| true)?;
                Ok(None)
            }
            SetDirective::Off(name) => {
                self.set_bool(name, |_| false)?;
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                self.set_bool(name, |v| !v)?;
                Ok(None)
            }
            SetDirective::Query(name) => self.show(name).map(Some),
            SetDirective::Assign(name, value) => {
                let full = canonical_name(name).ok_or_else(|| OptionError::Unknown(name.clone()))?;
                if is_bool_option(full) {
                    return Err(OptionError::NotNumeric(name.clone()));
                }
                let n: u64 = value.parse().map_err(|_| OptionError::InvalidValue {
                    name: full.to_string(),
                    value: value.clone(),
                })?;
                let as_usize = || {
                    usize::try_from(n).map_err(|_| OptionError::InvalidValue {
                        name: full.to_string(),
                        value: value.clone(),
                    })
                };
                match full {
                    "previewlimit" => self.preview_limit = as_usize()?,
                    "cachesize" => self.cache_size = as_usize()?,
                    _ => self.unknown_freq = n,
                }
                Ok(None)
            }
            SetDirective::ShowChanged => Ok(Some(self.listing(false))),
            SetDirective::ShowAll => Ok(Some(self.listing(true))),
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        match canonical_name(name) {
            Some("virtualedit") => {
                self.virtualedit = f(self.virtualedit);
                Ok(())
            }
            Some(_) => Err(OptionError::NotBoolean(name.to_string())),
            None => Err(OptionError::Unknown(name.to_string())),
        }
    }

    /// `name=value` or `[no]name`, as `:set name?` prints it.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for unknown names.
    pub fn show(&self, name: &str) -> Result<String, OptionError> {
        match canonical_name(name) {
            Some("virtualedit") => Ok(format_bool("virtualedit", self.virtualedit)),
            Some("previewlimit") => Ok(format!("previewlimit={}", self.preview_limit)),
            Some("cachesize") => Ok(format!("cachesize={}", self.cache_size)),
            Some(full) => Ok(format!("{full}={}", self.unknown_freq)),
            None => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn listing(&self, all: bool) -> String {
        let defaults = Self::default();
        let mut out = Vec::new();
        if all || self.virtualedit != defaults.virtualedit {
            out.push(format_bool("virtualedit", self.virtualedit));
        }
        if all || self.preview_limit != defaults.preview_limit {
            out.push(format!("previewlimit={}", self.preview_limit));
        }
        if all || self.cache_size != defaults.cache_size {
            out.push(format!("cachesize={}", self.cache_size));
        }
        if all || self.unknown_freq != defaults.unknown_freq {
            out.push(format!("unknownfreq={}", self.unknown_freq));
        }
        out.join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── parse_set_arg ─────────────────────────────────────────────────────

    #[test]
    fn parse_boolean_forms() {
        assert_eq!(parse_set_arg("ve"), SetDirective::On("ve".into()));
        assert_eq!(parse_set_arg("novirtualedit"), SetDirective::Off("virtualedit".into()));
        assert_eq!(parse_set_arg("nove"), SetDirective::Off("ve".into()));
        assert_eq!(parse_set_arg("ve!"), SetDirective::Toggle("ve".into()));
    }

    #[test]
    fn parse_numeric_bare_is_query() {
        assert_eq!(parse_set_arg("cachesize"), SetDirective::Query("cachesize".into()));
        assert_eq!(parse_set_arg("pvl"), SetDirective::Query("pvl".into()));
    }

    #[test]
    fn parse_assign_and_query() {
        assert_eq!(parse_set_arg("pvl=3"), SetDirective::Assign("pvl".into(), "3".into()));
        assert_eq!(parse_set_arg("uf?"), SetDirective::Query("uf".into()));
        assert_eq!(parse_set_arg("all"), SetDirective::ShowAll);
        assert_eq!(parse_set("  "), vec![SetDirective::ShowChanged]);
    }

    #[test]
    fn no_prefix_needs_a_known_boolean() {
        assert_eq!(parse_set_arg("nocs"), SetDirective::On("nocs".into()));
    }

    // ── MotionOptions ────────────────────────────────────────────────────

    fn set(args: &str) -> Result<MotionOptions, OptionError> {
        let mut opts = MotionOptions::default();
        opts.apply_set(args)?;
        Ok(opts)
    }

    #[test]
    fn apply_set_runs_in_order() {
        let opts = set("ve pvl=3 cs=0 uf=5 nove").unwrap();
        assert_eq!(
            opts,
            MotionOptions {
                virtualedit: false,
                preview_limit: 3,
                cache_size: 0,
                unknown_freq: 5,
            }
        );
    }

    #[test]
    fn toggle_flips() {
        let mut opts = MotionOptions::default();
        opts.apply(&SetDirective::Toggle("ve".into())).unwrap();
        assert!(opts.virtualedit);
        opts.apply(&SetDirective::Toggle("virtualedit".into())).unwrap();
        assert!(!opts.virtualedit);
    }

    #[test]
    fn errors() {
        assert_eq!(set("bogus"), Err(OptionError::Unknown("bogus".into())));
        assert_eq!(set("cs!"), Err(OptionError::NotBoolean("cs".into())));
        assert_eq!(set("ve=1"), Err(OptionError::NotNumeric("ve".into())));
        assert_eq!(
            set("pvl=lots"),
            Err(OptionError::InvalidValue {
                name: "previewlimit".into(),
                value: "lots".into(),
            })
        );
    }

    #[test]
    fn apply_set_collects_echoes() {
        let mut opts = MotionOptions::default();
        let echoed = opts.apply_set("ve? pvl=2 all").unwrap();
        assert_eq!(
            echoed,
            vec![
                "novirtualedit".to_string(),
                "novirtualedit  previewlimit=2  cachesize=4096  unknownfreq=1".to_string(),
            ]
        );
        assert_eq!(opts.preview_limit, 2);
        assert_eq!(opts.apply_set("").unwrap(), vec!["previewlimit=2".to_string()]);
        assert!(opts.apply_set("ve cs=8").unwrap().is_empty());
    }

    #[test]
    fn failed_directive_keeps_earlier_ones() {
        let mut opts = MotionOptions::default();
        assert!(opts.apply_set("ve bogus uf=3").is_err());
        assert!(opts.virtualedit);
        assert_eq!(opts.unknown_freq, 1);
    }

    #[test]
    fn parse_lone_suffix() {
        assert_eq!(parse_set_arg("?"), SetDirective::Query(String::new()));
        assert_eq!(set("?"), Err(OptionError::Unknown(String::new())));
    }

    #[test]
    fn queries_and_listings() {
        let mut opts = MotionOptions::default();
        assert_eq!(opts.apply(&parse_set_arg("ve?")).unwrap().as_deref(), Some("novirtualedit"));
        assert_eq!(opts.apply(&parse_set_arg("cs")).unwrap().as_deref(), Some("cachesize=4096"));
        assert_eq!(opts.apply(&SetDirective::ShowChanged).unwrap().as_deref(), Some(""));
        opts.apply(&parse_set_arg("uf=7")).unwrap();
        assert_eq!(opts.apply(&SetDirective::ShowChanged).unwrap().as_deref(), Some("unknownfreq=7"));
        assert_eq!(
            opts.apply(&SetDirective::ShowAll).unwrap().as_deref(),
            Some("novirtualedit  previewlimit=0  cachesize=4096  unknownfreq=7")
        );
    }
}
