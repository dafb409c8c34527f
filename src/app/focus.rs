use std::fmt;

type IssuedCallback = Box<dyn FnOnce(&str) + Send>;

/// "Please focus this node" from outside the graph view (search, note
/// cross-references, startup flag). The callback runs at most once, when the
/// camera command is issued; a request dropped unissued never calls it.
pub(in crate::app) struct FocusRequest {
    node_id: String,
    on_issued: Option<IssuedCallback>,
}

impl FocusRequest {
    pub(in crate::app) fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            on_issued: None,
        }
    }

    pub(in crate::app) fn on_issued(mut self, callback: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_issued = Some(Box::new(callback));
        self
    }

    pub(in crate::app) fn node_id(&self) -> &str {
        &self.node_id
    }

    pub(in crate::app) fn complete(self) {
        let Self { node_id, on_issued } = self;
        if let Some(callback) = on_issued {
            callback(&node_id);
        }
    }
}

impl fmt::Debug for FocusRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRequest")
            .field("node_id", &self.node_id)
            .field("has_callback", &self.on_issued.is_some())
            .finish()
    }
}
