//! Observer registration for simulation notifications.

/// Identifier of a registered listener, returned by the `add_*_listener`
/// methods and accepted by the matching `remove_*_listener`.
///
/// Listener identity is this id: every registration is a distinct identity,
/// and removal succeeds exactly once per registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Notification data passed to clock-tick and simulation-paused listeners.
#[derive(Clone, Copy, Debug)]
pub struct EventInfo {
    /// The simulation time the notification refers to.
    pub time: f64,
}

pub(crate) struct ListenerRegistry<T> {
    next_id: u64,
    listeners: Vec<(u64, Box<dyn FnMut(&T)>)>,
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Box<dyn FnMut(&T)>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        ListenerId(id)
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let prev_len = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id.0);
        self.listeners.len() < prev_len
    }

    pub fn notify(&mut self, value: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }
}
