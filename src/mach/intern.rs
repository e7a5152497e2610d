use std::collections::HashSet;
use std::rc::Rc;

/// ## String intern table
///
/// Every string reachable from a value is registered here exactly once,
/// so handle identity implies content equality. The table retains its
/// strings for the machine's lifetime; dropping the machine releases each
/// of them once.
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Rc<str>>,
}

impl Interner {
    pub fn new() -> Interner {
        Interner::default()
    }

    /// Returns the unique handle for `text`, registering it on first use.
    pub fn intern(&mut self, text: &str) -> Rc<str> {
        match self.strings.get(text) {
            Some(handle) => handle.clone(),
            None => {
                let handle: Rc<str> = Rc::from(text);
                self.strings.insert(handle.clone());
                handle
            }
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }
}
