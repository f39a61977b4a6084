//! The UCI option table.
//!
//! A fixed set of names is registered at construction; assignments to
//! anything else are rejected without mutating the table. Lookups are
//! case-insensitive, matching common controller behavior.

use std::fmt;

#[derive(Debug, Clone)]
pub struct OptionEntry {
    pub name: &'static str,
    pub kind: &'static str,
    pub default: &'static str,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct OptionTable {
    entries: Vec<OptionEntry>,
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionTable {
    pub fn new() -> Self {
        let register = |name, kind, default, min, max| OptionEntry {
            name,
            kind,
            default,
            min,
            max,
            value: String::from(default),
        };

        Self {
            entries: vec![
                register("Hash", "spin", "16", Some(1), Some(131_072)),
                register("Threads", "spin", "1", Some(1), Some(512)),
                register("Ponder", "check", "false", None, None),
                register("MultiPV", "spin", "1", Some(1), Some(500)),
                register("Move Overhead", "spin", "30", Some(0), Some(5_000)),
                register("UCI_Chess960", "check", "false", None, None),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.value.as_str())
    }

    /// Overwrite a registered option, or reject the assignment entirely.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
        {
            Some(entry) => {
                entry.value = value.to_owned();
                Ok(())
            }
            None => Err(format!("No such option: {name}")),
        }
    }

    /// Read a check-type option as a boolean.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1")
    }
}

impl fmt::Display for OptionTable {
    /// The `uci` handshake listing, one `option name ...` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "option name {} type {} default {}",
                entry.name, entry.kind, entry.default
            )?;
            if let (Some(min), Some(max)) = (entry.min, entry.max) {
                write!(f, " min {min} max {max}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::OptionTable;

    #[test]
    fn registered_option_accepts_a_new_value() {
        let mut options = OptionTable::new();
        options.set("Hash", "128").expect("Hash is registered");
        assert_eq!(options.get("Hash"), Some("128"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut options = OptionTable::new();
        options.set("hash", "64").expect("case should not matter");
        assert_eq!(options.get("HASH"), Some("64"));
    }

    #[test]
    fn unregistered_option_is_rejected_without_mutation() {
        let mut options = OptionTable::new();
        let err = options
            .set("NoSuchOption", "1")
            .expect_err("unregistered names must be rejected");
        assert_eq!(err, "No such option: NoSuchOption");
        assert_eq!(options.get("NoSuchOption"), None);
        assert_eq!(options.get("Hash"), Some("16"));
    }

    #[test]
    fn check_options_read_as_booleans() {
        let mut options = OptionTable::new();
        assert!(!options.is_enabled("UCI_Chess960"));
        options
            .set("UCI_Chess960", "true")
            .expect("UCI_Chess960 is registered");
        assert!(options.is_enabled("UCI_Chess960"));
    }

    #[test]
    fn listing_prints_every_registered_name() {
        let listing = OptionTable::new().to_string();
        for name in ["Hash", "Threads", "Ponder", "MultiPV", "Move Overhead", "UCI_Chess960"] {
            assert!(listing.contains(&format!("option name {name} type")));
        }
        assert!(listing.contains("option name Hash type spin default 16 min 1 max 131072"));
    }
}
