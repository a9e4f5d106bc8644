//! Page runtime: document ownership, event dispatch and the task queue.
//!
//! The runtime mirrors a browser main thread. [`Page::dispatch`] runs every
//! matching listener to completion before returning, bubbling from the
//! target element up through its ancestors. Async continuations (the chat
//! request, speech capture) are queued with [`Page::spawn`] and driven by
//! [`Page::run_until_idle`].
//!
//! Components attach their listeners through a [`Mount`] and detach them
//! with [`Mount::dispose`].

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, join_all};
use tracing::debug;

use crate::dialog::Dialogs;
use crate::dom::{Document, Event, EventTarget, EventType};

type Handler = Arc<dyn Fn(&Page, &mut Event) + Send + Sync>;

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    target: EventTarget,
    kind: EventType,
    handler: Handler,
}

struct PageInner {
    document: Mutex<Document>,
    listeners: Mutex<Vec<Listener>>,
    next_listener: AtomicU64,
    dialogs: Arc<dyn Dialogs>,
    tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
}

/// Result of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether any listener called `prevent_default`.
    pub default_prevented: bool,
    /// Number of listeners that ran.
    pub handled: usize,
}

/// Shared handle to a page. Cloning is cheap.
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("listeners", &self.listener_count())
            .field("pending_tasks", &self.pending_tasks())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Wrap a document and the dialogs it should raise.
    pub fn new(document: Document, dialogs: Arc<dyn Dialogs>) -> Self {
        Self {
            inner: Arc::new(PageInner {
                document: Mutex::new(document),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
                dialogs,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Lock the document.
    ///
    /// The guard must not be held across an `.await` or while dispatching.
    pub fn document(&self) -> MutexGuard<'_, Document> {
        self.inner
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dialogs(&self) -> &dyn Dialogs {
        self.inner.dialogs.as_ref()
    }

    /// Register a listener. Listeners on the same target run in
    /// registration order.
    pub fn add_listener<F>(&self, target: EventTarget, kind: EventType, handler: F) -> ListenerId
    where
        F: Fn(&Page, &mut Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners().push(Listener {
            id,
            target,
            kind,
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a listener; returns `false` if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        before != listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Dispatch an event and run every matching listener to completion.
    ///
    /// Element events bubble to each ancestor. Listeners added during the
    /// dispatch do not see the current event.
    pub fn dispatch(&self, target: impl Into<EventTarget>, kind: EventType) -> DispatchOutcome {
        let target = target.into();
        let path: Vec<EventTarget> = match target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Node(id) => {
                let doc = self.document();
                std::iter::once(id)
                    .chain(doc.ancestors(id))
                    .map(EventTarget::Node)
                    .collect()
            }
        };

        let mut event = Event::new(kind, target);
        let mut handled = 0;
        for step in path {
            let handlers: Vec<Handler> = self
                .listeners()
                .iter()
                .filter(|l| l.target == step && l.kind == kind)
                .map(|l| Arc::clone(&l.handler))
                .collect();
            event.set_current_target(step);
            for handler in handlers {
                handler(self, &mut event);
                handled += 1;
            }
        }

        DispatchOutcome {
            default_prevented: event.default_prevented(),
            handled,
        }
    }

    /// Queue an async continuation.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.boxed());
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drive queued tasks until none are left.
    ///
    /// Tasks queued together run concurrently; tasks they queue in turn run
    /// in a later batch.
    pub async fn run_until_idle(&self) {
        loop {
            let batch: Vec<_> = std::mem::take(
                &mut *self
                    .inner
                    .tasks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
            if batch.is_empty() {
                return;
            }
            join_all(batch).await;
        }
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The listeners one component attached to a page.
#[must_use = "listeners stay attached until `dispose` is called"]
#[derive(Debug)]
pub struct Mount {
    page: Page,
    component: &'static str,
    listeners: Vec<ListenerId>,
}

impl Mount {
    pub fn new(page: &Page, component: &'static str) -> Self {
        Self {
            page: page.clone(),
            component,
            listeners: Vec::new(),
        }
    }

    /// Attach a listener owned by this mount.
    pub fn listen<F>(&mut self, target: impl Into<EventTarget>, kind: EventType, handler: F)
    where
        F: Fn(&Page, &mut Event) + Send + Sync + 'static,
    {
        let id = self.page.add_listener(target.into(), kind, handler);
        self.listeners.push(id);
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Detach every listener this mount registered.
    pub fn dispose(self) {
        let removed = self
            .listeners
            .iter()
            .filter(|&&id| self.page.remove_listener(id))
            .count();
        debug!(
            name: "page.mount.disposed",
            component = self.component,
            removed,
            "Component listeners removed"
        );
    }
}
