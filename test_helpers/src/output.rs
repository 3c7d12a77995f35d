//! In-memory writer for capturing help output.

use std::cell::RefCell;
use std::rc::Rc;

/// A shared byte buffer.
///
/// Hand [`Captured::handle`] to code that wants an `Rc<RefCell<impl Write>>`
/// and read it back with [`Captured::text`].
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use layered_cli_test_helpers::output::Captured;
///
/// let captured = Captured::default();
/// let handle = captured.handle();
/// write!(handle.borrow_mut(), "usage").expect("write to buffer");
/// assert_eq!(captured.text(), "usage");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Captured {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl Captured {
    /// Shared handle on the underlying buffer.
    #[must_use]
    pub fn handle(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.buffer)
    }

    /// Everything written so far, decoded lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}
