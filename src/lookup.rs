//! Name lookups backing `${env:...}` and `${sys:...}` shortcuts.
//!
//! The resolver never reads the environment or the property registry
//! directly; it goes through a [`Lookup`] so callers and tests can supply
//! their own sources.
//!
//! Process properties are a process-wide, string-keyed registry seeded on
//! first use with facts about the host (`os.name`, `user.home`, ...).
//! Applications add their own with [`set_property`].
use std::collections::HashMap;
use std::path::MAIN_SEPARATOR_STR;
use std::sync::{LazyLock, PoisonError, RwLock};

/// A source of named string values.
#[cfg_attr(test, mockall::automock)]
pub trait Lookup {
    /// Return the value of `name`, or `None` if it is not defined.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var(name).ok()
    }
}

/// Reads the process property registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessProperties;

impl Lookup for ProcessProperties {
    fn lookup(&self, name: &str) -> Option<String> {
        property(name)
    }
}

impl<S: std::hash::BuildHasher> Lookup for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

static PROPERTIES: LazyLock<RwLock<HashMap<String, String>>> =
    LazyLock::new(|| RwLock::new(host_properties()));

/// Read a process property.
#[must_use]
pub fn property(name: &str) -> Option<String> {
    PROPERTIES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Define or replace a process property, returning the previous value.
pub fn set_property(name: &str, value: &str) -> Option<String> {
    tracing::trace!(target: "inikit::lookup", "set property {name}");
    PROPERTIES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), value.to_string())
}

/// Remove a process property, returning its value.
pub fn remove_property(name: &str) -> Option<String> {
    PROPERTIES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(name)
}

/// Facts about the host that seed the registry.
fn host_properties() -> HashMap<String, String> {
    let mut props = HashMap::new();
    let mut put = |name: &str, value: String| {
        props.insert(name.to_string(), value);
    };

    put("os.name", std::env::consts::OS.to_string());
    put("os.arch", std::env::consts::ARCH.to_string());
    put("os.family", std::env::consts::FAMILY.to_string());
    put("file.separator", MAIN_SEPARATOR_STR.to_string());
    put(
        "path.separator",
        if cfg!(windows) { ";" } else { ":" }.to_string(),
    );
    put(
        "line.separator",
        if cfg!(windows) { "\r\n" } else { "\n" }.to_string(),
    );
    put("tmp.dir", std::env::temp_dir().display().to_string());
    if let Ok(dir) = std::env::current_dir() {
        put("user.dir", dir.display().to_string());
    }
    if let Some(home) = ["HOME", "USERPROFILE"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
    {
        put("user.home", home);
    }
    if let Some(user) = ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
    {
        put("user.name", user);
    }
    props
}
