//! The core's view of a container: opaque beyond id/name/image/labels.

use std::collections::HashMap;

/// A container as seen by the chaos engine. The engine never inspects
/// anything beyond these fields; everything else is runtime-specific and
/// stays behind the [`super::client::RuntimeClient`] boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Stable runtime id (e.g. Docker's 64-char container id).
    pub id: String,
    /// Human name, with any leading `/` stripped.
    pub name: String,
    /// Image reference the container was created from.
    pub image: String,
    /// Runtime labels, passed through unexamined.
    pub labels: HashMap<String, String>,
}

impl Container {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Container {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            labels: HashMap::new(),
        }
    }
}
