use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Point in the allocation lifecycle a task is attached to.
///
/// The set of hooks is closed. Values that do not name a known hook are kept verbatim in
/// [`LifecycleHook::Unrecognized`] so the classifier can report them instead of failing to parse
/// the whole allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleHook {
    /// Runs before main tasks; either a sidecar or an ephemeral setup task.
    Prestart,
    /// Runs once main tasks have started.
    Poststart,
    /// Regular workload task.
    Main,
    /// Any hook value this version does not understand.
    Unrecognized(String),
}

impl LifecycleHook {
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleHook::Prestart => "prestart",
            LifecycleHook::Poststart => "poststart",
            LifecycleHook::Main => "main",
            LifecycleHook::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for LifecycleHook {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        Ok(match norm.as_str() {
            "prestart" => LifecycleHook::Prestart,
            "poststart" => LifecycleHook::Poststart,
            "main" => LifecycleHook::Main,
            _ => LifecycleHook::Unrecognized(s.to_string()),
        })
    }
}

impl From<String> for LifecycleHook {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(hook) => hook,
            Err(never) => match never {},
        }
    }
}

impl From<LifecycleHook> for String {
    fn from(hook: LifecycleHook) -> Self {
        match hook {
            LifecycleHook::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_hooks_case_insensitively() {
        assert_eq!("prestart".parse::<LifecycleHook>().unwrap(), LifecycleHook::Prestart);
        assert_eq!(" PostStart ".parse::<LifecycleHook>().unwrap(), LifecycleHook::Poststart);
        assert_eq!("Main".parse::<LifecycleHook>().unwrap(), LifecycleHook::Main);
    }

    #[test]
    fn unknown_hook_keeps_raw_value() {
        let hook: LifecycleHook = "poststop".parse().unwrap();
        assert_eq!(hook, LifecycleHook::Unrecognized("poststop".to_string()));
        assert_eq!(hook.to_string(), "poststop");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&LifecycleHook::Prestart).unwrap();
        assert_eq!(json, r#""prestart""#);

        let back: LifecycleHook = serde_json::from_str(r#""sometime""#).unwrap();
        assert_eq!(back, LifecycleHook::Unrecognized("sometime".to_string()));
        assert_eq!(serde_json::to_string(&back).unwrap(), r#""sometime""#);
    }
}
