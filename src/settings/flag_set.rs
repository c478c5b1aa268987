//! Typed flag set backed by a runtime-built `clap` command.

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use super::{SettingError, SettingKind, SettingSet, SettingValue};

/// A declared flag and its runtime state.
#[derive(Debug, Clone)]
struct Flag {
    name: String,
    usage: String,
    default: SettingValue,
    value: SettingValue,
    explicit: bool,
}

/// A named group of typed flags.
///
/// Flags are declared with the builder methods and read back with the typed
/// getters. Every flag becomes a `--name[=value]` option when the set parses
/// a command line; single-letter flags also accept `-n`.
///
/// # Example
///
/// ```
/// use flagconf::settings::{FlagSet, SettingSet};
///
/// let mut set = FlagSet::new("app")
///     .float("rate", 1.5, "requests per second")
///     .bool("verbose", false, "chatty output");
///
/// set.parse_args(vec!["app".into(), "--verbose".into()]).unwrap();
///
/// assert_eq!(set.get_bool("verbose"), Some(true));
/// assert_eq!(set.get_float("rate"), Some(1.5));
/// assert!(!set.is_explicit("rate"));
/// ```
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
    parsed: bool,
}

impl FlagSet {
    /// Creates an empty flag set. `name` is used as the program name in
    /// command-line help output.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
            parsed: false,
        }
    }

    /// Returns the set's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a flag with the given default. Redeclaring a name replaces
    /// the earlier declaration.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>, default: SettingValue, usage: &str) -> Self {
        let name = name.into();
        let flag = Flag {
            name: name.clone(),
            usage: usage.to_string(),
            value: default.clone(),
            default,
            explicit: false,
        };

        match self.flags.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = flag,
            None => self.flags.push(flag),
        }
        self
    }

    /// Declares a boolean flag.
    #[must_use]
    pub fn bool(self, name: impl Into<String>, default: bool, usage: &str) -> Self {
        self.flag(name, SettingValue::Bool(default), usage)
    }

    /// Declares an integer flag.
    #[must_use]
    pub fn int(self, name: impl Into<String>, default: i64, usage: &str) -> Self {
        self.flag(name, SettingValue::Int(default), usage)
    }

    /// Declares a float flag.
    #[must_use]
    pub fn float(self, name: impl Into<String>, default: f64, usage: &str) -> Self {
        self.flag(name, SettingValue::Float(default), usage)
    }

    /// Declares a string flag.
    #[must_use]
    pub fn string(self, name: impl Into<String>, default: &str, usage: &str) -> Self {
        self.flag(name, SettingValue::Text(default.to_string()), usage)
    }

    /// Returns the typed current value of a flag.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&SettingValue> {
        self.find(name).map(|f| &f.value)
    }

    /// Returns the current value of a boolean flag.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the current value of an integer flag.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the current value of a float flag.
    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.value(name)? {
            SettingValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the current value of a string flag.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            SettingValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Builds the `clap` command that tokenizes this set's flags.
    ///
    /// A declared flag named `help` replaces the built-in `--help`.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone())
            .disable_version_flag(true)
            .disable_help_flag(self.find("help").is_some())
            .args_override_self(true);

        for flag in &self.flags {
            cmd = cmd.arg(build_arg(flag));
        }
        cmd
    }

    fn find(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Flag> {
        self.flags.iter_mut().find(|f| f.name == name)
    }
}

fn build_arg(flag: &Flag) -> Arg {
    let kind = flag.default.kind();
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .help(flag.usage.clone())
        .value_name(kind.to_string().to_uppercase());

    // -h stays reserved for help
    let mut chars = flag.name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c != 'h' {
            arg = arg.short(c);
        }
    }

    match kind {
        SettingKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        SettingKind::Int | SettingKind::Float => {
            arg.action(ArgAction::Set).allow_negative_numbers(true)
        }
        SettingKind::Text => arg.action(ArgAction::Set),
    }
}

impl SettingSet for FlagSet {
    fn declared(&self) -> Vec<String> {
        self.flags.iter().map(|f| f.name.clone()).collect()
    }

    fn is_explicit(&self, name: &str) -> bool {
        self.find(name).is_some_and(|f| f.explicit)
    }

    fn current_value(&self, name: &str) -> Option<String> {
        self.find(name).map(|f| f.value.to_string())
    }

    fn default_value(&self, name: &str) -> Option<String> {
        self.find(name).map(|f| f.default.to_string())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), SettingError> {
        let flag = self.find_mut(name).ok_or_else(|| SettingError::Unknown {
            name: name.to_string(),
        })?;

        flag.value = SettingValue::parse(flag.default.kind(), name, value)?;
        flag.explicit = true;
        Ok(())
    }

    fn is_parsed(&self) -> bool {
        self.parsed
    }

    fn parse_args(&mut self, args: Vec<OsString>) -> Result<(), SettingError> {
        let matches = self.command().try_get_matches_from(args)?;

        for name in self.declared() {
            if matches.value_source(&name) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Some(raw) = matches.get_one::<String>(&name) {
                self.assign(&name, raw)?;
            }
        }

        self.parsed = true;
        Ok(())
    }
}
