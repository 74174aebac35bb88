//! Request context shown in the variables panel of the diagnostic page.
//!
//! The host application supplies session, cookie, query, form and upload
//! data through a [`ContextProvider`]. [`ProcessContext`] fills in what the
//! process itself knows: server information and the environment.

use std::collections::BTreeMap;
use std::env;

/// The fixed set of collections listed on the diagnostic page, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Server,
    Env,
    Session,
    Cookie,
    Query,
    Form,
    Files,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Server,
        Collection::Env,
        Collection::Session,
        Collection::Cookie,
        Collection::Query,
        Collection::Form,
        Collection::Files,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Collection::Server => "server",
            Collection::Env => "env",
            Collection::Session => "session",
            Collection::Cookie => "cookie",
            Collection::Query => "query",
            Collection::Form => "form",
            Collection::Files => "files",
        }
    }
}

/// Key/value pairs per collection. Values are already stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    collections: BTreeMap<Collection, BTreeMap<String, String>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        collection: Collection,
        key: impl Into<String>,
        value: impl ToString,
    ) -> &mut Self {
        self.collections
            .entry(collection)
            .or_default()
            .insert(key.into(), value.to_string());
        self
    }

    pub fn with_entries<K, V, I>(mut self, collection: Collection, entries: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        let target = self.collections.entry(collection).or_default();
        for (key, value) in entries {
            target.insert(key.into(), value.to_string());
        }
        self
    }

    /// Entries of `collection`; `None` when absent or empty.
    pub fn get(&self, collection: Collection) -> Option<&BTreeMap<String, String>> {
        self.collections
            .get(&collection)
            .filter(|entries| !entries.is_empty())
    }

    /// Entries from `other` replace entries with the same key.
    pub fn merge(mut self, other: RequestContext) -> Self {
        for (collection, entries) in other.collections {
            self.collections.entry(collection).or_default().extend(entries);
        }
        self
    }
}

/// Source of the request context at the time a page is built.
pub trait ContextProvider: Send + Sync {
    fn request_context(&self) -> RequestContext;
}

impl ContextProvider for RequestContext {
    fn request_context(&self) -> RequestContext {
        self.clone()
    }
}

impl<F> ContextProvider for F
where
    F: Fn() -> RequestContext + Send + Sync,
{
    fn request_context(&self) -> RequestContext {
        self()
    }
}

/// Server information and environment of the running process, optionally
/// merged with a request context supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
    request: RequestContext,
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(request: RequestContext) -> Self {
        Self { request }
    }

    fn server_info() -> Vec<(&'static str, String)> {
        let mut info = vec![
            ("pid", std::process::id().to_string()),
            ("os", env::consts::OS.to_string()),
            ("arch", env::consts::ARCH.to_string()),
            ("args", env::args().collect::<Vec<_>>().join(" ")),
        ];
        if let Ok(exe) = env::current_exe() {
            info.push(("executable", exe.display().to_string()));
        }
        if let Ok(cwd) = env::current_dir() {
            info.push(("cwd", cwd.display().to_string()));
        }
        info
    }
}

impl ContextProvider for ProcessContext {
    fn request_context(&self) -> RequestContext {
        RequestContext::new()
            .with_entries(Collection::Server, Self::server_info())
            .with_entries(Collection::Env, env::vars())
            .merge(self.request.clone())
    }
}
